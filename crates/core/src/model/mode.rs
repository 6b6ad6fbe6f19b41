use std::fmt;

/// Screen the app is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AppMode {
    #[default]
    Home,
    Quiz,
    Review,
    Stats,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppMode::Home => "home",
            AppMode::Quiz => "quiz",
            AppMode::Review => "review",
            AppMode::Stats => "stats",
        };
        f.write_str(label)
    }
}
