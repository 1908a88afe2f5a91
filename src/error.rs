use thiserror::Error;

/// Errors raised while loading vocabularies or configuration
#[derive(Debug, Error)]
pub enum KeyorError {
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("language '{language}' has no category '{category}'")]
    UnknownCategory { language: String, category: String },

    #[error("invalid vocabulary file {file}: {source}")]
    InvalidVocabulary {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("category '{category}' of language '{language}' has no words")]
    EmptyVocabulary { language: String, category: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KeyorError>;
