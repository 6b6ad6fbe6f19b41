use std::error::Error;
use std::io::Write;
use std::ops::ControlFlow;

use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;

use leoula_core::model::{AppMode, Category, Gender, MissedSet, WordEntry, WordId};
use services::session::{DeckSource, QuizSession};
use services::{AppServices, ExplanationTracker, SessionError};

use crate::emphasis::{self, Style};

pub type TerminalResult<T> = Result<T, Box<dyn Error>>;

const BAR_WIDTH: usize = 20;

/// Where the loop goes after a screen is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Home,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HomeChoice {
    Play(DeckSource),
    Quit,
}

enum Input {
    Line(String),
    Closed,
    Explanation(WordId, String),
}

fn parse_home_choice(raw: &str) -> Option<HomeChoice> {
    let choice = raw.trim().to_ascii_lowercase();
    match choice.as_str() {
        "a" | "all" => Some(HomeChoice::Play(DeckSource::all_categories())),
        "r" | "review" => Some(HomeChoice::Play(DeckSource::Review)),
        "q" | "quit" => Some(HomeChoice::Quit),
        other => {
            let category = match other.parse::<usize>() {
                Ok(n) => n.checked_sub(1).and_then(|i| Category::ALL.get(i)).copied(),
                Err(_) => other.parse::<Category>().ok(),
            };
            category.map(|c| HomeChoice::Play(DeckSource::Category(Some(c))))
        }
    }
}

/// Line-oriented quiz front-end.
///
/// Reads commands from `R`, writes screens to `W`. Explanations are fetched on
/// spawned tasks and come back over a channel tagged with the word id; the
/// tracker decides whether a reply still belongs on screen.
pub struct Terminal<R, W> {
    services: AppServices,
    missed: MissedSet,
    tracker: ExplanationTracker,
    lines: Lines<R>,
    out: W,
    style: Style,
    replies_tx: mpsc::UnboundedSender<(WordId, String)>,
    replies_rx: mpsc::UnboundedReceiver<(WordId, String)>,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(services: AppServices, missed: MissedSet, input: R, out: W, style: Style) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            services,
            missed,
            tracker: ExplanationTracker::new(),
            lines: input.lines(),
            out,
            style,
            replies_tx,
            replies_rx,
        }
    }

    /// Run until the user quits or input ends, then flush the missed set.
    ///
    /// `start` skips the home screen for the first session.
    pub async fn run(&mut self, start: Option<DeckSource>) -> TerminalResult<()> {
        let mut flow = match start {
            Some(source) => self.play(source).await?,
            None => Flow::Home,
        };

        while flow == Flow::Home {
            self.render_home()?;
            let Some(line) = self.next_line().await? else {
                break;
            };
            flow = match parse_home_choice(&line) {
                Some(HomeChoice::Play(source)) => self.play(source).await?,
                Some(HomeChoice::Quit) => Flow::Quit,
                None => {
                    writeln!(self.out, "Unknown choice: {}", line.trim())?;
                    Flow::Home
                }
            };
        }

        self.services.session_loop().save_missed(&self.missed).await?;
        Ok(())
    }

    async fn play(&mut self, source: DeckSource) -> TerminalResult<Flow> {
        let session_loop = self.services.session_loop();
        let mut session = session_loop.start_session(source, &self.missed);

        while let Some(word) = session.current_word().cloned() {
            self.tracker.focus(word.id().clone());
            self.render_card(&session, &word)?;

            let chosen = match self.read_guess().await? {
                ControlFlow::Continue(chosen) => chosen,
                ControlFlow::Break(flow) => return Ok(self.leave(flow)),
            };
            let chosen = session.guess(chosen)?;
            self.render_reveal(&word, chosen)?;

            if let ControlFlow::Break(flow) = self.await_advance(&word).await? {
                return Ok(self.leave(flow));
            }

            match session_loop.answer_current(&mut session, &mut self.missed).await {
                Ok(_) => {}
                Err(SessionError::Storage(err)) => {
                    let warning = format!("Progress could not be saved: {err}");
                    writeln!(self.out, "{}", self.style.bad(&warning))?;
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.tracker.reset();
        self.render_stats(&session)?;
        match self.next_line().await? {
            Some(line) if line.trim().eq_ignore_ascii_case("q") => Ok(Flow::Quit),
            Some(_) => Ok(Flow::Home),
            None => Ok(Flow::Quit),
        }
    }

    fn leave(&mut self, flow: Flow) -> Flow {
        self.tracker.reset();
        flow
    }

    async fn read_guess(&mut self) -> TerminalResult<ControlFlow<Flow, Gender>> {
        loop {
            self.prompt("le or la? [m/f, q = home]")?;
            let Some(line) = self.next_line().await? else {
                return Ok(ControlFlow::Break(Flow::Quit));
            };
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                return Ok(ControlFlow::Break(Flow::Home));
            }
            match line.parse::<Gender>() {
                Ok(chosen) => return Ok(ControlFlow::Continue(chosen)),
                Err(err) => writeln!(self.out, "{err}; type m or f")?,
            }
        }
    }

    async fn await_advance(&mut self, word: &WordEntry) -> TerminalResult<ControlFlow<Flow>> {
        loop {
            self.prompt("[Enter] next  [e] explain  [q] home")?;
            let Some(line) = self.next_line().await? else {
                return Ok(ControlFlow::Break(Flow::Quit));
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(ControlFlow::Continue(())),
                "e" => self.request_explanation(word)?,
                "q" => return Ok(ControlFlow::Break(Flow::Home)),
                other => writeln!(self.out, "Unknown key: {other}")?,
            }
        }
    }

    fn request_explanation(&mut self, word: &WordEntry) -> TerminalResult<()> {
        if !self.tracker.begin(word.id()) {
            if let Some(text) = self.tracker.text() {
                writeln!(self.out, "{}", emphasis::render(text, self.style))?;
            } else {
                writeln!(self.out, "{}", self.style.dim("Still thinking..."))?;
            }
            return Ok(());
        }

        writeln!(self.out, "{}", self.style.dim("Asking for an explanation..."))?;
        let explainer = self.services.explainer();
        let replies = self.replies_tx.clone();
        let word = word.clone();
        tokio::spawn(async move {
            let text = explainer.explain(&word).await;
            if replies.send((word.id().clone(), text)).is_err() {
                debug!("terminal closed before the explanation for {} arrived", word.id());
            }
        });
        Ok(())
    }

    async fn next_input(&mut self) -> TerminalResult<Input> {
        tokio::select! {
            line = self.lines.next_line() => Ok(line?.map_or(Input::Closed, Input::Line)),
            Some((word_id, text)) = self.replies_rx.recv() => Ok(Input::Explanation(word_id, text)),
        }
    }

    /// Next line of user input; explanation replies arriving meanwhile are
    /// shown or dropped on the way.
    async fn next_line(&mut self) -> TerminalResult<Option<String>> {
        loop {
            match self.next_input().await? {
                Input::Line(line) => return Ok(Some(line)),
                Input::Closed => return Ok(None),
                Input::Explanation(word_id, text) => self.accept_explanation(&word_id, text)?,
            }
        }
    }

    fn accept_explanation(&mut self, word_id: &WordId, text: String) -> TerminalResult<()> {
        if !self.tracker.resolve(word_id, text) {
            return Ok(());
        }
        if let Some(text) = self.tracker.text() {
            writeln!(self.out, "\n{}\n", emphasis::render(text, self.style))?;
            self.out.flush()?;
        }
        Ok(())
    }

    //
    // ─── SCREENS ───────────────────────────────────────────────────────────────
    //

    fn render_home(&mut self) -> TerminalResult<()> {
        let catalog = self.services.catalog();
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}  {} words, {} to review",
            self.style.bold("Le ou La?"),
            catalog.len(),
            self.missed.len()
        )?;
        writeln!(self.out, "  [a] all words")?;
        for (index, category) in Category::ALL.iter().enumerate() {
            let count = catalog.in_category(*category).count();
            writeln!(self.out, "  [{}] {category} ({count})", index + 1)?;
        }
        writeln!(self.out, "  [r] review missed ({})", self.missed.len())?;
        writeln!(self.out, "  [q] quit")?;
        self.prompt("")
    }

    fn render_card(&mut self, session: &QuizSession, word: &WordEntry) -> TerminalResult<()> {
        let progress = session.progress();
        let label = match session.mode() {
            AppMode::Review => "Review",
            _ => "Quiz",
        };
        writeln!(self.out)?;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_precision_loss,
            clippy::cast_sign_loss
        )]
        let filled = (progress.fraction() * BAR_WIDTH as f64).round() as usize;
        writeln!(
            self.out,
            "{} {}/{}  [{}{}]  {} left",
            self.style.dim(label),
            progress.display_index(),
            progress.total,
            "#".repeat(filled.min(BAR_WIDTH)),
            ".".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
            progress.remaining
        )?;
        writeln!(
            self.out,
            "  {}  {}",
            self.style.bold(word.source_text()),
            self.style.dim(&format!("({})", word.translation()))
        )?;
        Ok(())
    }

    fn render_reveal(&mut self, word: &WordEntry, chosen: Gender) -> TerminalResult<()> {
        let verdict = if chosen == word.gender() {
            self.style.good("Correct!")
        } else {
            self.style.bad("Incorrect.")
        };
        writeln!(
            self.out,
            "{verdict} It is {}.",
            self.style.bold(&word.with_article())
        )?;
        if let Some(example) = word.example() {
            writeln!(self.out, "  {}", self.style.dim(example))?;
        }
        Ok(())
    }

    fn render_stats(&mut self, session: &QuizSession) -> TerminalResult<()> {
        let stats = session.stats();
        let filled = if stats.total == 0 {
            0
        } else {
            stats.correct * BAR_WIDTH / stats.total
        };
        let bar = format!(
            "{}{}",
            self.style.good(&"#".repeat(filled)),
            self.style.bad(&".".repeat(BAR_WIDTH - filled))
        );

        writeln!(self.out)?;
        writeln!(self.out, "{}", self.style.bold("Session complete"))?;
        writeln!(
            self.out,
            "Score: {} / {} ({}%)",
            stats.correct,
            stats.total,
            stats.percentage()
        )?;
        writeln!(self.out, "[{bar}]")?;

        let catalog = self.services.catalog();
        let wrong: Vec<String> = session
            .results()
            .iter()
            .filter(|record| !record.correct)
            .filter_map(|record| catalog.get(&record.word_id))
            .map(WordEntry::with_article)
            .collect();
        if !wrong.is_empty() {
            writeln!(self.out, "Missed this round: {}", wrong.join(", "))?;
        }
        writeln!(self.out, "Words to review: {}", self.missed.len())?;
        self.prompt("[Enter] home  [q] quit")
    }

    fn prompt(&mut self, text: &str) -> TerminalResult<()> {
        if !text.is_empty() {
            writeln!(self.out, "{text}")?;
        }
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
impl<R, W> Terminal<R, W> {
    fn missed(&self) -> &MissedSet {
        &self.missed
    }

    fn output(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leoula_core::model::ExplainerSettings;
    use leoula_core::time::fixed_now;
    use services::Clock;
    use services::session::QUIZ_DECK_CAP;
    use std::sync::Arc;
    use storage::{KeyValueRepository, Storage, StorageError};

    fn services() -> AppServices {
        AppServices::in_memory(Clock::fixed(fixed_now()), ExplainerSettings::default()).unwrap()
    }

    fn output_text<R>(terminal: &Terminal<R, Vec<u8>>) -> String {
        String::from_utf8(terminal.output().clone()).unwrap()
    }

    #[test]
    fn home_choices_parse() {
        assert_eq!(
            parse_home_choice("a"),
            Some(HomeChoice::Play(DeckSource::all_categories()))
        );
        assert_eq!(
            parse_home_choice(" 2 "),
            Some(HomeChoice::Play(DeckSource::Category(Some(Category::ALL[1]))))
        );
        assert_eq!(
            parse_home_choice("Skiing"),
            Some(HomeChoice::Play(DeckSource::Category(Some(Category::Skiing))))
        );
        assert_eq!(parse_home_choice("r"), Some(HomeChoice::Play(DeckSource::Review)));
        assert_eq!(parse_home_choice("q"), Some(HomeChoice::Quit));
        assert_eq!(parse_home_choice("0"), None);
        assert_eq!(parse_home_choice("9"), None);
        assert_eq!(parse_home_choice("beach"), None);
    }

    #[tokio::test]
    async fn always_masculine_misses_exactly_the_feminine_words() {
        let services = services();
        let catalog = services.catalog();
        let words: Vec<&WordEntry> = catalog.in_category(Category::Home).collect();
        assert!(words.len() <= QUIZ_DECK_CAP);

        let mut input = String::from("home\n");
        for _ in &words {
            input.push_str("m\n\n");
        }
        input.push_str("\nq\n");

        let mut terminal = Terminal::new(
            services.clone(),
            MissedSet::new(),
            input.as_bytes(),
            Vec::new(),
            Style::plain(),
        );
        terminal.run(None).await.unwrap();

        let feminine: Vec<&WordEntry> = words
            .iter()
            .copied()
            .filter(|w| w.gender() == Gender::Feminine)
            .collect();
        assert_eq!(terminal.missed().len(), feminine.len());
        for word in &feminine {
            assert!(terminal.missed().contains(word.id()));
        }

        let text = output_text(&terminal);
        let expected = format!(
            "Score: {} / {}",
            words.len() - feminine.len(),
            words.len()
        );
        assert!(text.contains(&expected), "{text}");

        let persisted = services.session_loop().load_missed().await;
        assert_eq!(&persisted, terminal.missed());
    }

    #[tokio::test]
    async fn empty_review_shows_zero_percent() {
        let mut terminal = Terminal::new(
            services(),
            MissedSet::new(),
            "q\n".as_bytes(),
            Vec::new(),
            Style::plain(),
        );
        terminal.run(Some(DeckSource::Review)).await.unwrap();

        let text = output_text(&terminal);
        assert!(text.contains("Score: 0 / 0 (0%)"), "{text}");
        assert!(!text.contains("[a] all words"));
    }

    #[tokio::test]
    async fn leaving_mid_card_scores_nothing() {
        let mut terminal = Terminal::new(
            services(),
            MissedSet::new(),
            "all\nf\nq\nq\n".as_bytes(),
            Vec::new(),
            Style::plain(),
        );
        terminal.run(None).await.unwrap();

        assert!(terminal.missed().is_empty());
        let text = output_text(&terminal);
        assert_eq!(text.matches("[a] all words").count(), 2);
        assert!(!text.contains("Session complete"));
    }

    #[tokio::test]
    async fn bad_guess_is_reprompted() {
        let mut terminal = Terminal::new(
            services(),
            MissedSet::new(),
            "1\nx\nq\nq\n".as_bytes(),
            Vec::new(),
            Style::plain(),
        );
        terminal.run(None).await.unwrap();

        let text = output_text(&terminal);
        assert!(text.contains("unknown gender: x; type m or f"), "{text}");
    }

    struct ReadOnlyRepository;

    #[async_trait::async_trait]
    impl KeyValueRepository for ReadOnlyRepository {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }
    }

    #[tokio::test]
    async fn failed_saves_warn_and_keep_playing() {
        let storage = Storage {
            kv: Arc::new(ReadOnlyRepository),
        };
        let services = AppServices::from_storage(
            &storage,
            Clock::fixed(fixed_now()),
            ExplainerSettings::default(),
        )
        .unwrap();
        let catalog = services.catalog();
        let words: Vec<&WordEntry> = catalog.in_category(Category::Home).collect();
        let feminine = words
            .iter()
            .filter(|w| w.gender() == Gender::Feminine)
            .count();
        assert!(feminine > 0);

        let mut input = String::from("home\n");
        for _ in &words {
            input.push_str("m\n\n");
        }
        input.push_str("\nq\n");

        let mut terminal = Terminal::new(
            services.clone(),
            MissedSet::new(),
            input.as_bytes(),
            Vec::new(),
            Style::plain(),
        );
        let result = terminal.run(None).await;

        let text = output_text(&terminal);
        assert_eq!(
            text.matches("Progress could not be saved: connection error: disk full")
                .count(),
            feminine
        );
        assert!(text.contains("Session complete"), "{text}");
        assert_eq!(terminal.missed().len(), feminine);
        // The exit flush hits the same backend and reports it.
        assert!(result.is_err());
    }
}
