// Library surface for headless/integration tests and reuse.
// Rendering and the CLI live in main.rs.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod keymap;
pub mod language;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod speech;
pub mod stats;
pub mod trainer;
pub mod typing_policy;

pub use error::{KeyorError, Result};
