mod emphasis;
mod terminal;

use std::fmt;

use leoula_core::model::{Category, ExplainerSettings};
use log::info;
use services::explain::settings_from_env;
use services::session::DeckSource;
use services::{AppServices, Clock};

use crate::emphasis::Style;
use crate::terminal::Terminal;

const DEFAULT_DB_URL: &str = "sqlite://leoula.sqlite3";
const MEMORY_DB_URL: &str = "sqlite::memory:";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCategory { raw: String },
    InvalidDbUrl { raw: String },
    ConflictingDeck,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCategory { raw } => write!(f, "invalid --category value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::ConflictingDeck => write!(f, "--review cannot be combined with --category"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  leoula [play] [--db <sqlite_url>] [--category <name>] [--review]");
    eprintln!("  leoula missed [--db <sqlite_url>]   # list words to review");
    eprintln!("  leoula reset  [--db <sqlite_url>]   # forget all missed words");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Categories:");
    let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    eprintln!("  {}", names.join(", "));
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEOULA_DB_URL");
    eprintln!("  LEOULA_AI_API_KEY, LEOULA_AI_MODEL, LEOULA_AI_BASE_URL, LEOULA_AI_TIMEOUT_SECS");
    eprintln!("  RUST_LOG, NO_COLOR");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Missed,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "missed" => Some(Self::Missed),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    start: Option<DeckSource>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("LEOULA_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut category = None;
        let mut review = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--category" if cmd == Command::Play => {
                    let value = require_value(args, "--category")?;
                    let parsed = value
                        .parse::<Category>()
                        .map_err(|_| ArgsError::InvalidCategory { raw: value.clone() })?;
                    category = Some(parsed);
                }
                "--review" if cmd == Command::Play => review = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let start = match (category, review) {
            (Some(_), true) => return Err(ArgsError::ConflictingDeck),
            (Some(category), false) => Some(DeckSource::Category(Some(category))),
            (None, true) => Some(DeckSource::Review),
            (None, false) => None,
        };

        Ok(Self { db_url, start })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == MEMORY_DB_URL || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Where the missed list lives for a given `--db` value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    /// Nothing survives the process.
    Memory,
    Sqlite(String),
}

impl Backend {
    fn from_url(db_url: &str) -> Self {
        if db_url == MEMORY_DB_URL {
            Self::Memory
        } else {
            Self::Sqlite(db_url.to_string())
        }
    }
}

async fn open_services(
    db_url: &str,
    settings: ExplainerSettings,
) -> Result<AppServices, Box<dyn std::error::Error>> {
    let services = match Backend::from_url(db_url) {
        Backend::Memory => {
            info!("using in-memory storage; missed words are not kept");
            AppServices::in_memory(Clock::system(), settings)?
        }
        Backend::Sqlite(url) => {
            prepare_sqlite_file(&url)?;
            info!("using database {url}");
            AppServices::new_sqlite(&url, Clock::system(), settings).await?
        }
    };
    Ok(services)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means play.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;


    match cmd {
        Command::Play => {
            let settings = settings_from_env()?;
            if !settings.is_configured() {
                info!("no LEOULA_AI_API_KEY set; explanations are disabled");
            }
            let services = open_services(&parsed.db_url, settings).await?;
            let missed = services.session_loop().load_missed().await;
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut terminal =
                Terminal::new(services, missed, input, std::io::stdout(), Style::from_env());
            terminal.run(parsed.start).await
        }
        Command::Missed => {
            let services = open_services(&parsed.db_url, ExplainerSettings::default()).await?;
            let catalog = services.catalog();
            let missed = services.session_loop().load_missed().await;
            if missed.is_empty() {
                println!("No missed words.");
            }
            for id in missed.ids() {
                match catalog.get(id) {
                    Some(word) => println!("{}  ({})", word.with_article(), word.translation()),
                    None => println!("{id}  (no longer in the word list)"),
                }
            }
            Ok(())
        }
        Command::Reset => {
            let services = open_services(&parsed.db_url, ExplainerSettings::default()).await?;
            let session_loop = services.session_loop();
            let mut missed = session_loop.load_missed().await;
            let count = missed.len();
            if missed.clear() {
                session_loop.save_missed(&missed).await?;
            }
            println!("Cleared {count} missed word(s).");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(cmd: Command, args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(cmd, &mut iter)
    }

    #[test]
    fn play_flags_pick_the_first_deck() {
        let args = parse(Command::Play, &["--category", "skiing", "--db", "sqlite::memory:"]).unwrap();
        assert_eq!(args.start, Some(DeckSource::Category(Some(Category::Skiing))));
        assert_eq!(args.db_url, "sqlite::memory:");

        let args = parse(Command::Play, &["--review"]).unwrap();
        assert_eq!(args.start, Some(DeckSource::Review));
    }

    #[test]
    fn review_and_category_conflict() {
        let err = parse(Command::Play, &["--review", "--category", "work"]).unwrap_err();
        assert!(matches!(err, ArgsError::ConflictingDeck));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            parse(Command::Play, &["--category", "beach"]),
            Err(ArgsError::InvalidCategory { .. })
        ));
        assert!(matches!(
            parse(Command::Play, &["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(Command::Missed, &["--review"]),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("data/leoula.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/leoula.sqlite3"));
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
    }

    #[test]
    fn memory_url_skips_sqlite() {
        assert_eq!(Backend::from_url("sqlite::memory:"), Backend::Memory);
        assert_eq!(
            Backend::from_url("sqlite:///tmp/leoula.sqlite3"),
            Backend::Sqlite("sqlite:///tmp/leoula.sqlite3".into())
        );
    }

    #[tokio::test]
    async fn memory_backend_keeps_missed_words_for_the_process() {
        let services = open_services(MEMORY_DB_URL, ExplainerSettings::default())
            .await
            .unwrap();
        let session_loop = services.session_loop();
        let word = services.catalog().all()[0].id().clone();
        let missed = leoula_core::model::MissedSet::from_ids([word.clone()]);

        session_loop.save_missed(&missed).await.unwrap();
        assert!(session_loop.load_missed().await.contains(&word));
    }
}
