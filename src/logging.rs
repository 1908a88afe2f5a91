use crate::app_dirs::AppDirs;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// Environment variable holding the log filter, e.g. `KEYOR_LOG=debug`
pub const LOG_ENV: &str = "KEYOR_LOG";

/// Start file logging when `KEYOR_LOG` is set. The terminal belongs to the
/// TUI, so records go to `keyor.log` in the state directory.
pub fn init() -> io::Result<bool> {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return Ok(false);
    };
    match AppDirs::log_path() {
        Some(path) => init_with(&filter, &path),
        None => Ok(false),
    }
}

pub fn init_with(filter: &str, path: &Path) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let installed = env_logger::Builder::new()
        .parse_filters(filter)
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .is_ok();

    Ok(installed)
}
