pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keyor::{
    config::{Config, ConfigStore, FileConfigStore, MAX_WORDS_PER_ROUND},
    language::Catalog,
    logging,
    runtime::{CrosstermEventSource, Runner, TerminalEventSource},
    session::BackspacePolicy,
    speech::CommandSpeaker,
    trainer::Trainer,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, SystemTime},
};

const TICK_RATE_MS: u64 = 100;

/// vocabulary typing trainer with translations and voice-over
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type rounds of vocabulary words, see each word's translation, hear it spoken, and track words per minute and accuracy from round to round."
)]
pub struct Cli {
    /// number of words per round
    #[clap(
        short = 'w',
        long,
        value_parser = clap::value_parser!(u32).range(1..=MAX_WORDS_PER_ROUND as i64)
    )]
    words_per_round: Option<u32>,

    /// language code to practice, e.g. en
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// vocabulary category, `full` for every word of the language
    #[clap(short = 'c', long)]
    category: Option<String>,

    /// whether backspace may erase typed characters
    #[clap(long, value_enum)]
    backspace: Option<BackspacePolicy>,

    /// speak the active word aloud
    #[clap(long)]
    voice: bool,

    /// store the resulting settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// list languages and categories, then exit
    #[clap(long)]
    list: bool,
}

impl Cli {
    /// Command line values take precedence over the config file
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(words) = self.words_per_round {
            config.words_per_round = words as usize;
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(category) = &self.category {
            config.category = category.clone();
        }
        if let Some(backspace) = self.backspace {
            config.backspace = backspace;
        }
        if self.voice {
            config.voice_over = true;
        }
        config
    }
}

#[derive(Debug)]
pub struct App {
    pub trainer: Trainer,
    /// Clock used by the renderer for the elapsed timer
    pub now: SystemTime,
}

impl App {
    pub fn new(trainer: Trainer) -> Self {
        Self {
            trainer,
            now: SystemTime::now(),
        }
    }
}

fn catalog_listing(catalog: &Catalog) -> String {
    catalog
        .languages()
        .iter()
        .map(|vocab| {
            format!(
                "{:<4}{:<12}{}",
                vocab.code,
                vocab.name,
                vocab.category_ids().join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("keyor: logging disabled: {e}");
    }

    let catalog = Catalog::embedded()?;
    if cli.list {
        println!("{}", catalog_listing(&catalog));
        return Ok(());
    }

    let store = FileConfigStore::new();
    let config = cli.merge_into(store.load());
    if cli.save_config {
        store.save(&config)?;
        log::info!("saved config to {}", store.path().display());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let trainer = Trainer::new(catalog, config, Box::new(CommandSpeaker::detect()))?;
    let mut app = App::new(trainer);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: TerminalEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.now = SystemTime::now();
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        if runner.drive(&mut app.trainer).is_break() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use keyor::runtime::{TerminalEvent, TestEventSource};
    use keyor::speech::SilentSpeaker;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;

    fn app(config: Config) -> App {
        let catalog = Catalog::embedded().unwrap();
        App::new(Trainer::new(catalog, config, Box::new(SilentSpeaker)).unwrap())
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["keyor"]);

        assert_eq!(cli.words_per_round, None);
        assert_eq!(cli.language, None);
        assert_eq!(cli.category, None);
        assert_eq!(cli.backspace, None);
        assert!(!cli.voice);
        assert!(!cli.save_config);
        assert!(!cli.list);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "keyor",
            "-w",
            "13",
            "-l",
            "es",
            "-c",
            "hotel",
            "--backspace",
            "enabled",
            "--voice",
        ]);
        assert_eq!(cli.words_per_round, Some(13));
        assert_eq!(cli.language.as_deref(), Some("es"));
        assert_eq!(cli.category.as_deref(), Some("hotel"));
        assert_eq!(cli.backspace, Some(BackspacePolicy::Enabled));
        assert!(cli.voice);

        let cli = Cli::parse_from(["keyor", "--words-per-round", "5", "--language", "en"]);
        assert_eq!(cli.words_per_round, Some(5));
        assert_eq!(cli.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_cli_rejects_zero_words() {
        assert!(Cli::try_parse_from(["keyor", "-w", "0"]).is_err());
        assert!(Cli::try_parse_from(["keyor", "-w", "201"]).is_err());
        assert!(Cli::try_parse_from(["keyor", "-w", "4294967295"]).is_err());
        assert_eq!(
            Cli::parse_from(["keyor", "-w", "200"]).words_per_round,
            Some(200)
        );
        assert!(Cli::try_parse_from(["keyor", "--backspace", "sometimes"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let file = Config {
            words_per_round: 7,
            language: "es".to_string(),
            category: "hotel".to_string(),
            backspace: BackspacePolicy::Enabled,
            voice_over: true,
        };

        // nothing given keeps the file values
        assert_eq!(Cli::parse_from(["keyor"]).merge_into(file.clone()), file);

        let merged = Cli::parse_from(["keyor", "-w", "3", "-l", "en", "--backspace", "disabled"])
            .merge_into(file);
        assert_eq!(merged.words_per_round, 3);
        assert_eq!(merged.language, "en");
        assert_eq!(merged.category, "hotel");
        assert_eq!(merged.backspace, BackspacePolicy::Disabled);
        assert!(merged.voice_over);
    }

    #[test]
    fn test_catalog_listing() {
        let listing = catalog_listing(&Catalog::embedded().unwrap());
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("en"));
        assert!(lines[0].contains("full, common, hotel, restaurant"));
        assert!(lines[1].starts_with("es"));
    }

    #[test]
    fn test_ui_renders_round() {
        let app = app(Config {
            words_per_round: 3,
            ..Config::default()
        });

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|f| f.render_widget(&app, f.area()))
            .unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("keyor"));
        assert!(content.contains("English / Full Vocabulary"));
        assert!(content.contains("voice off"));
        assert!(content.contains("WPM: 0"));
        assert!(content.contains("00:00"));
        let first = app.trainer.session().displayed_word(0).unwrap();
        assert!(content.contains(&first));
    }

    #[test]
    fn test_ui_renders_on_tiny_terminal() {
        let app = app(Config::default());
        let mut terminal = Terminal::new(TestBackend::new(8, 4)).unwrap();
        terminal
            .draw(|f| f.render_widget(&app, f.area()))
            .unwrap();
    }

    #[test]
    fn test_start_tui_until_escape() {
        let mut app = app(Config {
            words_per_round: 2,
            ..Config::default()
        });
        let first = app.trainer.session().displayed_word(0).unwrap();

        let (tx, rx) = mpsc::channel();
        for c in first.chars().chain([' ']) {
            tx.send(TerminalEvent::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )))
            .unwrap();
        }
        tx.send(TerminalEvent::Resize).unwrap();
        tx.send(TerminalEvent::Key(KeyEvent::new(
            KeyCode::Esc,
            KeyModifiers::NONE,
        )))
        .unwrap();

        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        start_tui(&mut terminal, &mut app, &runner).unwrap();

        assert_eq!(app.trainer.session().active_index(), 1);
        assert_eq!(app.trainer.session().input(), "");
        assert!(app.trainer.elapsed(SystemTime::now()).is_some());
    }
}
