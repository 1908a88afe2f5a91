pub mod core;
pub mod formatter;
pub mod selector;

// Re-export the main types for convenience
pub use self::core::{Catalog, Category, Vocabulary, FULL_CATEGORY};
pub use formatter::{DisplayFormatter, StandardFormatter};
pub use selector::{RandomSelector, WordSelector};
