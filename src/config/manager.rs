//! Configuration discovery.

use super::TtsConfig;
use crate::Result;
use std::path::{Path, PathBuf};

/// Searched in order when no explicit path is given; `~` is the user's home directory.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "./tts_config.json",
    "./tts_config.yaml",
    "~/.tts/config.json",
    "~/.tts/config.yaml",
];

/// Finds and loads the configuration file for the client.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    search_paths: Vec<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            search_paths: DEFAULT_CONFIG_PATHS.iter().map(|p| expand_home(p)).collect(),
        }
    }

    pub fn with_search_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths: paths,
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Load `path` if given, else the first existing search path, else defaults.
    pub fn load(&self, path: Option<&Path>) -> Result<TtsConfig> {
        if let Some(path) = path {
            return TtsConfig::from_file(path);
        }
        match self.search_paths.iter().find(|p| p.exists()) {
            Some(found) => {
                tracing::info!(path = %found.display(), "using configuration file");
                TtsConfig::from_file(found)
            }
            None => {
                tracing::debug!("no configuration file found, using defaults");
                Ok(TtsConfig::default())
            }
        }
    }

    /// Write the named preset to `path`.
    pub fn create_default_config(path: impl AsRef<Path>, preset: &str) -> Result<TtsConfig> {
        let config = TtsConfig::preset(preset)?;
        config.to_file(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), preset, "created configuration file");
        Ok(config)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
