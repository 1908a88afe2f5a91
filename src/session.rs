use crate::language::DisplayFormatter;
use crate::stats::RoundStats;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Whether backspace may remove accepted characters from the current word
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackspacePolicy {
    Enabled,
    #[default]
    Disabled,
}

/// A key as seen by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Backspace,
}

/// Result of feeding one key to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Character matched and was appended
    Accepted,
    /// Wrong character, or space before the word was complete
    Mismatch { word: usize, offset: usize },
    /// Character typed after the word was already complete
    Overflow { word: usize, offset: usize },
    /// Word completed, cursor moved to `index`
    Advanced { index: usize },
    /// Last word completed; the round is over
    RoundComplete,
    /// Backspace removed a character
    Erased,
    Ignored,
}

impl KeyOutcome {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            KeyOutcome::Mismatch { .. } | KeyOutcome::Overflow { .. }
        )
    }
}

/// State of one round: its words, the cursor and the per-round error records
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) words: Vec<String>,
    pub(crate) displayed: Vec<Vec<char>>,
    pub(crate) active: usize,
    pub(crate) input: String,
    pub(crate) is_error: bool,
    pub(crate) error_flash: u64,
    pub(crate) mistakes: BTreeMap<usize, BTreeSet<usize>>,
    pub(crate) round: RoundStats,
    pub(crate) backspace: BackspacePolicy,
}

impl Session {
    pub fn new(words: Vec<String>, formatter: &dyn DisplayFormatter, backspace: BackspacePolicy) -> Self {
        let displayed = words
            .iter()
            .map(|w| formatter.display(w).chars().collect())
            .collect();

        Self {
            words,
            displayed,
            active: 0,
            input: String::new(),
            is_error: false,
            error_flash: 0,
            mistakes: BTreeMap::new(),
            round: RoundStats::default(),
            backspace,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Stored form of the active word
    pub fn active_word(&self) -> Option<&str> {
        self.words.get(self.active).map(String::as_str)
    }

    pub fn displayed_word(&self, index: usize) -> Option<String> {
        self.displayed.get(index).map(|chars| chars.iter().collect())
    }

    pub fn displayed_chars(&self, index: usize) -> &[char] {
        self.displayed.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Bumped on every rejected key so a renderer can restart its flash
    pub fn error_flash(&self) -> u64 {
        self.error_flash
    }

    pub fn is_last_word(&self) -> bool {
        self.active + 1 >= self.words.len()
    }

    /// Buffer holds the whole displayed word; space will advance
    pub fn is_word_complete(&self) -> bool {
        self.input_len() == self.displayed_chars(self.active).len()
    }

    pub fn mistakes(&self) -> &BTreeMap<usize, BTreeSet<usize>> {
        &self.mistakes
    }

    pub fn is_mistake(&self, word: usize, offset: usize) -> bool {
        self.mistakes
            .get(&word)
            .is_some_and(|offsets| offsets.contains(&offset))
    }

    pub fn mistake_count(&self) -> usize {
        self.mistakes.values().map(BTreeSet::len).sum()
    }

    pub fn round_stats(&self) -> &RoundStats {
        &self.round
    }

    pub fn backspace_policy(&self) -> BackspacePolicy {
        self.backspace
    }

    pub(crate) fn record_error(&mut self, offset: usize) {
        self.is_error = true;
        self.error_flash += 1;
        self.round.errors += 1;
        self.mistakes.entry(self.active).or_default().insert(offset);
    }
}
