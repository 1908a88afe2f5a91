use crate::config::{Config, MAX_WORDS_PER_ROUND};
use crate::error::{KeyorError, Result};
use crate::language::{
    Catalog, DisplayFormatter, RandomSelector, StandardFormatter, Vocabulary, WordSelector,
    FULL_CATEGORY,
};
use crate::session::{Key, KeyOutcome, Session};
use crate::speech::{Speaker, VoiceOver};
use crate::stats::Statistics;
use crate::typing_policy;
use std::time::{Duration, SystemTime};

/// Everything the keyboard can ask the trainer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Type(Key),
    ToggleVoice,
    NextCategory,
    NextLanguage,
    NewRound,
    Quit,
}

/// Owns the session and everything around it. All keyboard input goes
/// through [`Trainer::handle`], one command at a time.
pub struct Trainer {
    catalog: Catalog,
    language: usize,
    category: String,
    config: Config,
    selector: Box<dyn WordSelector>,
    formatter: Box<dyn DisplayFormatter>,
    session: Session,
    statistics: Statistics,
    voice: VoiceOver,
}

impl Trainer {
    pub fn new(catalog: Catalog, config: Config, speaker: Box<dyn Speaker>) -> Result<Self> {
        Self::with_parts(
            catalog,
            config,
            Box::new(RandomSelector),
            Box::new(StandardFormatter),
            speaker,
        )
    }

    pub fn with_parts(
        catalog: Catalog,
        config: Config,
        selector: Box<dyn WordSelector>,
        formatter: Box<dyn DisplayFormatter>,
        speaker: Box<dyn Speaker>,
    ) -> Result<Self> {
        let config = config.clamped();
        let language = language_index(&catalog, &config.language)?;
        let vocab = &catalog.languages()[language];
        // same fallback as `select`, so a stale config still starts
        let category = if vocab.has_category(&config.category) {
            config.category.clone()
        } else {
            log::warn!(
                "language '{}' has no category '{}', using {FULL_CATEGORY}",
                vocab.code,
                config.category
            );
            FULL_CATEGORY.to_string()
        };
        let session = build_session(
            vocab,
            &category,
            &config,
            selector.as_ref(),
            formatter.as_ref(),
        )?;
        let voice = VoiceOver::new(config.voice_over, speaker);

        let mut trainer = Self {
            catalog,
            language,
            category,
            config,
            selector,
            formatter,
            session,
            statistics: Statistics::default(),
            voice,
        };
        trainer.announce_active();
        Ok(trainer)
    }

    pub fn handle(&mut self, command: Command, now: SystemTime) -> KeyOutcome {
        match command {
            Command::Type(key) => {
                let outcome = typing_policy::apply_key(&mut self.session, key, now);
                match outcome {
                    KeyOutcome::Advanced { .. } => self.announce_active(),
                    KeyOutcome::RoundComplete => self.complete_round(now),
                    _ => {}
                }
                outcome
            }
            Command::ToggleVoice => {
                if self.voice.toggle() {
                    self.announce_active();
                }
                KeyOutcome::Ignored
            }
            Command::NextCategory => {
                self.next_category();
                KeyOutcome::Ignored
            }
            Command::NextLanguage => {
                if let Some(next) = self.catalog.next_language(&self.vocabulary().code) {
                    let next = next.to_string();
                    let category = self.category.clone();
                    self.switch_or_log(&next, &category);
                }
                KeyOutcome::Ignored
            }
            Command::NewRound => {
                self.restart_round();
                KeyOutcome::Ignored
            }
            Command::Quit => KeyOutcome::Ignored,
        }
    }

    /// Switch vocabulary and start a fresh round. A category the new
    /// language lacks falls back to the full vocabulary.
    pub fn select(&mut self, language: &str, category: &str) -> Result<()> {
        let index = language_index(&self.catalog, language)?;
        let vocab = &self.catalog.languages()[index];
        let category = if vocab.has_category(category) {
            category
        } else {
            FULL_CATEGORY
        };

        self.session = build_session(
            vocab,
            category,
            &self.config,
            self.selector.as_ref(),
            self.formatter.as_ref(),
        )?;
        self.language = index;
        self.category = category.to_string();
        log::info!("switched to {} / {}", vocab.code, self.category);
        self.announce_active();
        Ok(())
    }

    /// Move to the next category that can hold a round
    fn next_category(&mut self) {
        let code = self.vocabulary().code.clone();
        let mut candidate = self.category.clone();
        for _ in 0..self.vocabulary().category_ids().len() {
            candidate = self.vocabulary().next_category(&candidate).to_string();
            if candidate == self.category {
                return;
            }
            match self.select(&code, &candidate) {
                Ok(()) => return,
                Err(e) => log::warn!("skipping category: {e}"),
            }
        }
    }

    fn switch_or_log(&mut self, language: &str, category: &str) {
        if let Err(e) = self.select(language, category) {
            log::warn!("keeping current vocabulary: {e}");
        }
    }

    fn complete_round(&mut self, now: SystemTime) {
        self.statistics.finalize(self.session.round_stats(), now);
        self.restart_round();
    }

    /// New words for the current vocabulary; per-round counters start over
    fn restart_round(&mut self) {
        match build_session(
            self.vocabulary(),
            &self.category,
            &self.config,
            self.selector.as_ref(),
            self.formatter.as_ref(),
        ) {
            Ok(session) => self.session = session,
            Err(e) => {
                log::error!("could not build a new round, repeating words: {e}");
                self.session = Session::new(
                    self.session.words().to_vec(),
                    self.formatter.as_ref(),
                    self.config.backspace,
                );
            }
        }
        self.announce_active();
    }

    fn announce_active(&mut self) {
        let vocab = &self.catalog.languages()[self.language];
        if let Some(word) = self.session.displayed_word(self.session.active_index()) {
            self.voice.announce(&word, &vocab.voice);
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.catalog.languages()[self.language]
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn category_title(&self) -> &str {
        self.vocabulary()
            .category_title(&self.category)
            .unwrap_or_default()
    }

    /// Translation of the active word, empty when unknown
    pub fn translation(&self) -> &str {
        self.session
            .active_word()
            .map_or("", |w| self.vocabulary().translate(w))
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice.is_enabled()
    }

    /// Time since the first keystroke of the current round
    pub fn elapsed(&self, now: SystemTime) -> Option<Duration> {
        self.session
            .round_stats()
            .started_at
            .map(|start| now.duration_since(start).unwrap_or_default())
    }
}

impl std::fmt::Debug for Trainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trainer")
            .field("language", &self.vocabulary().code)
            .field("category", &self.category)
            .field("session", &self.session)
            .field("statistics", &self.statistics)
            .field("voice", &self.voice)
            .finish()
    }
}

fn language_index(catalog: &Catalog, code: &str) -> Result<usize> {
    catalog
        .languages()
        .iter()
        .position(|l| l.code == code)
        .ok_or_else(|| KeyorError::UnknownLanguage(code.to_string()))
}

fn build_session(
    vocab: &Vocabulary,
    category: &str,
    config: &Config,
    selector: &dyn WordSelector,
    formatter: &dyn DisplayFormatter,
) -> Result<Session> {
    let pool = vocab.words(category)?;
    if pool.is_empty() {
        return Err(KeyorError::EmptyVocabulary {
            language: vocab.code.clone(),
            category: category.to_string(),
        });
    }
    let words = selector.select_words(&pool, config.words_per_round.clamp(1, MAX_WORDS_PER_ROUND));
    Ok(Session::new(words, formatter, config.backspace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Category;
    use crate::session::BackspacePolicy;
    use crate::speech::SilentSpeaker;
    use crate::stats::RoundStats;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    /// Takes the pool in order, cycling when needed
    struct InOrder;

    impl WordSelector for InOrder {
        fn select_words(&self, pool: &[&str], count: usize) -> Vec<String> {
            pool.iter().cycle().take(count).map(|w| w.to_string()).collect()
        }
    }

    #[derive(Clone, Default)]
    struct Spoken(Rc<RefCell<Vec<String>>>);

    impl Speaker for Spoken {
        fn speak(&mut self, word: &str, _voice: &str) {
            self.0.borrow_mut().push(word.to_string());
        }
        fn cancel(&mut self) {
            self.0.borrow_mut().push("<cancel>".to_string());
        }
    }

    fn category(title: &str, words: &[(&str, &str)]) -> Category {
        Category {
            title: title.to_string(),
            words: words
                .iter()
                .map(|(w, t)| (w.to_string(), t.to_string()))
                .collect(),
        }
    }

    fn catalog() -> Catalog {
        let mut en = BTreeMap::new();
        en.insert(
            "basics".to_string(),
            category("Basics", &[("and", "dan"), ("i", "saya"), ("world", "dunia")]),
        );
        en.insert("empty".to_string(), category("Empty", &[]));
        let mut es = BTreeMap::new();
        es.insert(
            "basics".to_string(),
            category("Basics", &[("hola", "halo"), ("mundo", "dunia")]),
        );
        es.insert("hotel".to_string(), category("Hotel", &[("cama", "tempat tidur")]));
        Catalog::from_vocabularies(vec![
            Vocabulary::new("en", "English", "en-us", en),
            Vocabulary::new("es", "Spanish", "es", es),
        ])
    }

    fn config(words: usize) -> Config {
        Config {
            words_per_round: words,
            language: "en".into(),
            category: "basics".into(),
            backspace: BackspacePolicy::Disabled,
            voice_over: false,
        }
    }

    fn trainer_with(cfg: Config, speaker: Box<dyn Speaker>) -> Trainer {
        Trainer::with_parts(
            catalog(),
            cfg,
            Box::new(InOrder),
            Box::new(StandardFormatter),
            speaker,
        )
        .unwrap()
    }

    fn trainer(words: usize) -> Trainer {
        trainer_with(config(words), Box::new(SilentSpeaker))
    }

    fn type_word(t: &mut Trainer, word: &str, now: SystemTime) -> KeyOutcome {
        for c in word.chars() {
            t.handle(Command::Type(Key::Char(c)), now);
        }
        t.handle(Command::Type(Key::Space), now)
    }

    #[test]
    fn test_new_trainer_builds_round() {
        let t = trainer(3);
        assert_eq!(t.session().words(), &["and", "i", "world"]);
        assert_eq!(t.session().displayed_word(1), Some("I".to_string()));
        assert_eq!(t.category(), "basics");
        assert_eq!(t.category_title(), "Basics");
        assert_eq!(t.translation(), "dan");
        assert!(!t.voice_enabled());
    }

    #[test]
    fn test_round_size_is_constant() {
        let t = trainer(7);
        assert_eq!(t.session().len(), 7);
    }

    #[test]
    fn test_translation_follows_active_word() {
        let now = SystemTime::now();
        let mut t = trainer(3);
        type_word(&mut t, "and", now);
        assert_eq!(t.translation(), "saya");
    }

    #[test]
    fn test_round_completion_finalizes_and_resets() {
        let start = SystemTime::now();
        let mut t = trainer(3);

        type_word(&mut t, "and", start);
        t.handle(Command::Type(Key::Char('x')), start);
        type_word(&mut t, "I", start);
        let outcome = type_word(&mut t, "world", start + Duration::from_secs(60));

        assert_eq!(outcome, KeyOutcome::RoundComplete);
        let summary = t.statistics().latest().unwrap();
        assert_eq!(summary.chars_typed, 10);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.correct_chars, 9);
        assert_eq!(summary.duration, Duration::from_secs(60));
        assert!((summary.wpm - 1.8).abs() < 1e-9);
        assert!((summary.accuracy - 90.0).abs() < 1e-9);

        // fresh round, counters zeroed
        assert_eq!(t.session().active_index(), 0);
        assert_eq!(t.session().input(), "");
        assert!(t.session().mistakes().is_empty());
        assert_eq!(t.session().round_stats(), &RoundStats::default());
        assert!(t.elapsed(start).is_none());
    }

    #[test]
    fn test_previous_round_retained() {
        let now = SystemTime::now();
        let mut t = trainer(1);

        type_word(&mut t, "and", now);
        assert!(t.statistics().previous().is_none());
        type_word(&mut t, "and", now + Duration::from_secs(1));
        assert!(t.statistics().previous().is_some());
        assert_eq!(t.statistics().rounds_completed(), 2);
    }

    #[test]
    fn test_category_change_resets_without_finalizing() {
        let now = SystemTime::now();
        let mut t = trainer(3);
        t.handle(Command::Type(Key::Char('x')), now);
        assert!(t.session().round_stats().has_started());

        // "empty" can't hold a round and is skipped
        t.handle(Command::NextCategory, now);
        assert_eq!(t.category(), FULL_CATEGORY);
        assert!(!t.session().round_stats().has_started());
        assert!(t.session().mistakes().is_empty());
        assert!(t.statistics().latest().is_none());
    }

    #[test]
    fn test_next_category_cycles() {
        let now = SystemTime::now();
        let mut t = trainer(2);
        t.select("es", "basics").unwrap();

        t.handle(Command::NextCategory, now);
        assert_eq!(t.category(), "hotel");
        assert_eq!(t.session().words(), &["cama", "cama"]);

        t.handle(Command::NextCategory, now);
        assert_eq!(t.category(), FULL_CATEGORY);
        assert_eq!(t.category_title(), "Full Vocabulary");
    }

    #[test]
    fn test_next_language_keeps_category_when_possible() {
        let now = SystemTime::now();
        let mut t = trainer(2);

        t.handle(Command::NextLanguage, now);
        assert_eq!(t.vocabulary().code, "es");
        assert_eq!(t.category(), "basics");
        assert_eq!(t.session().words(), &["hola", "mundo"]);

        t.select("es", "hotel").unwrap();
        t.handle(Command::NextLanguage, now);
        assert_eq!(t.vocabulary().code, "en");
        assert_eq!(t.category(), FULL_CATEGORY);
    }

    #[test]
    fn test_select_empty_category_keeps_round() {
        let now = SystemTime::now();
        let mut t = trainer(3);
        t.handle(Command::Type(Key::Char('a')), now);

        assert!(matches!(
            t.select("en", "empty"),
            Err(KeyorError::EmptyVocabulary { .. })
        ));
        assert_eq!(t.category(), "basics");
        assert_eq!(t.session().input(), "a");
    }

    #[test]
    fn test_unknown_language_rejected() {
        let mut cfg = config(3);
        cfg.language = "fr".into();
        let err = Trainer::with_parts(
            catalog(),
            cfg,
            Box::new(InOrder),
            Box::new(StandardFormatter),
            Box::new(SilentSpeaker),
        )
        .unwrap_err();
        assert!(matches!(err, KeyorError::UnknownLanguage(_)));
    }

    #[test]
    fn test_unknown_category_at_start_falls_back_to_full() {
        let mut cfg = config(3);
        cfg.category = "airport".into();
        let t = trainer_with(cfg, Box::new(SilentSpeaker));
        assert_eq!(t.category(), FULL_CATEGORY);
        assert_eq!(t.session().len(), 3);
    }

    #[test]
    fn test_word_count_is_capped() {
        let t = trainer(usize::MAX);
        assert_eq!(t.session().len(), MAX_WORDS_PER_ROUND);
        assert_eq!(t.config().words_per_round, MAX_WORDS_PER_ROUND);
    }

    #[test]
    fn test_empty_category_rejected_at_start() {
        let mut cfg = config(3);
        cfg.category = "empty".into();
        let err = Trainer::with_parts(
            catalog(),
            cfg,
            Box::new(InOrder),
            Box::new(StandardFormatter),
            Box::new(SilentSpeaker),
        )
        .unwrap_err();
        assert!(matches!(err, KeyorError::EmptyVocabulary { .. }));
    }

    #[test]
    fn test_voice_announces_active_word_changes() {
        let now = SystemTime::now();
        let spoken = Spoken::default();
        let mut t = trainer_with(config(3), Box::new(spoken.clone()));

        t.handle(Command::ToggleVoice, now);
        assert!(t.voice_enabled());
        type_word(&mut t, "and", now);
        t.handle(Command::Type(Key::Char('I')), now);
        assert_eq!(*spoken.0.borrow(), vec!["and", "I"]);

        // finishing the round announces the first word of the next one
        t.handle(Command::Type(Key::Space), now);
        assert_eq!(
            type_word(&mut t, "world", now),
            KeyOutcome::RoundComplete
        );
        t.handle(Command::ToggleVoice, now);

        assert_eq!(
            *spoken.0.borrow(),
            vec!["and", "I", "world", "and", "<cancel>"]
        );
    }

    #[test]
    fn test_voice_enabled_from_config_speaks_first_word() {
        let spoken = Spoken::default();
        let mut cfg = config(3);
        cfg.voice_over = true;
        let _t = trainer_with(cfg, Box::new(spoken.clone()));
        assert_eq!(*spoken.0.borrow(), vec!["and"]);
    }

    #[test]
    fn test_commands_never_touch_buffer() {
        let now = SystemTime::now();
        let mut t = trainer(3);
        t.handle(Command::Type(Key::Char('a')), now);

        for cmd in [Command::ToggleVoice, Command::ToggleVoice, Command::Quit] {
            assert_eq!(t.handle(cmd, now), KeyOutcome::Ignored);
            assert_eq!(t.session().input(), "a");
        }
    }

    #[test]
    fn test_new_round_discards_progress() {
        let now = SystemTime::now();
        let mut t = trainer(3);
        type_word(&mut t, "and", now);
        t.handle(Command::NewRound, now);
        assert_eq!(t.session().active_index(), 0);
        assert!(t.statistics().latest().is_none());
    }

    #[test]
    fn test_elapsed() {
        let start = SystemTime::now();
        let mut t = trainer(3);
        assert!(t.elapsed(start).is_none());
        t.handle(Command::Type(Key::Char('a')), start);
        assert_eq!(
            t.elapsed(start + Duration::from_secs(5)),
            Some(Duration::from_secs(5))
        );
    }
}
