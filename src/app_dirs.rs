use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "keyor")
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|pd| pd.config_dir().join("config.json"))
    }

    /// Log file location; `$HOME/.local/state` when HOME is set
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("keyor");
            Some(state_dir.join("keyor.log"))
        } else {
            Self::project().map(|pd| pd.data_local_dir().join("keyor.log"))
        }
    }
}
