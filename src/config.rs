use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::language::FULL_CATEGORY;
use crate::session::BackspacePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORDS_PER_ROUND: usize = 20;
pub const DEFAULT_LANGUAGE: &str = "en";
/// Rounds are rendered on one screen; larger values are clamped
pub const MAX_WORDS_PER_ROUND: usize = 200;

/// Learner preferences. Missing fields in a config file fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub words_per_round: usize,
    pub language: String,
    pub category: String,
    pub backspace: BackspacePolicy,
    pub voice_over: bool,
}

impl Config {
    /// Pull out-of-range values back into `1..=MAX_WORDS_PER_ROUND`
    pub fn clamped(mut self) -> Self {
        let words = self.words_per_round.clamp(1, MAX_WORDS_PER_ROUND);
        if words != self.words_per_round {
            log::warn!(
                "words_per_round {} out of range, using {}",
                self.words_per_round,
                words
            );
            self.words_per_round = words;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            words_per_round: DEFAULT_WORDS_PER_ROUND,
            language: DEFAULT_LANGUAGE.to_string(),
            category: FULL_CATEGORY.to_string(),
            backspace: BackspacePolicy::default(),
            voice_over: false,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("keyor_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg.clamped(),
                Err(e) => {
                    log::warn!("ignoring invalid config {}: {}", self.path.display(), e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(io::Error::from)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
