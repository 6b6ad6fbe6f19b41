use pulldown_cmark::{Event, Parser, Tag, TagEnd};

const BOLD_ON: &str = "\x1b[1m";
const BOLD_OFF: &str = "\x1b[22m";
const ITALIC_ON: &str = "\x1b[3m";
const ITALIC_OFF: &str = "\x1b[23m";
const DIM_ON: &str = "\x1b[2m";
const GREEN_ON: &str = "\x1b[32m";
const RED_ON: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Whether escape codes go to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    color: bool,
}

impl Style {
    /// Colors on unless `NO_COLOR` is set to a non-empty value.
    #[must_use]
    pub fn from_env() -> Self {
        let color = std::env::var_os("NO_COLOR").is_none_or(|value| value.is_empty());
        Self { color }
    }

    #[must_use]
    pub fn plain() -> Self {
        Self { color: false }
    }

    #[must_use]
    pub fn ansi() -> Self {
        Self { color: true }
    }

    #[must_use]
    pub fn bold(self, text: &str) -> String {
        self.wrap(BOLD_ON, text, BOLD_OFF)
    }

    #[must_use]
    pub fn dim(self, text: &str) -> String {
        self.wrap(DIM_ON, text, RESET)
    }

    #[must_use]
    pub fn good(self, text: &str) -> String {
        self.wrap(GREEN_ON, text, RESET)
    }

    #[must_use]
    pub fn bad(self, text: &str) -> String {
        self.wrap(RED_ON, text, RESET)
    }

    fn wrap(self, on: &str, text: &str, off: &str) -> String {
        if self.color {
            format!("{on}{text}{off}")
        } else {
            text.to_string()
        }
    }

    fn push(self, out: &mut String, code: &str) {
        if self.color {
            out.push_str(code);
        }
    }
}

/// Render the inline markdown of an explanation for the terminal.
///
/// Only emphasis, paragraphs and list items are kept; everything else is
/// flattened to its text.
#[must_use]
pub fn render(markdown: &str, style: Style) -> String {
    let mut out = String::with_capacity(markdown.len());

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Strong) => style.push(&mut out, BOLD_ON),
            Event::End(TagEnd::Strong) => style.push(&mut out, BOLD_OFF),
            Event::Start(Tag::Emphasis) => style.push(&mut out, ITALIC_ON),
            Event::End(TagEnd::Emphasis) => style.push(&mut out, ITALIC_OFF),
            Event::Start(Tag::Item) => out.push_str("- "),
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::Paragraph) => out.push_str("\n\n"),
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            _ => {}
        }
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}
