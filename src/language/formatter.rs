/// Maps a stored (lowercase) word to the form shown to and typed by the learner.
///
/// The session caches the displayed form of every word when a round starts and
/// the renderer reads those cached forms, so validation and display always go
/// through the same formatter.
pub trait DisplayFormatter {
    fn display(&self, word: &str) -> String;
}

/// Casing rules for English text
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormatter;

impl DisplayFormatter for StandardFormatter {
    fn display(&self, word: &str) -> String {
        // personal pronoun
        if word == "i" {
            return "I".to_string();
        }
        word.to_string()
    }
}
