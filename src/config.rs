use crate::block::ControlFlowBranch;
use crate::render::DEFAULT_COMMENT_PREFIX;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["macrostrip.config.json", "config/macrostrip.config.json"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,

    #[serde(default)]
    pub branch: ControlFlowBranch,

    #[serde(default)]
    pub remove: bool,

    /// Regex matched against paths found when walking directories.
    #[serde(default = "default_source_pattern")]
    pub source_pattern: String,
}

fn default_comment_prefix() -> String {
    DEFAULT_COMMENT_PREFIX.to_string()
}
fn default_source_pattern() -> String {
    r"(?i)\.(c|cc|cpp|cxx|h|hh|hpp|hxx|inl)$".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            comment_prefix: default_comment_prefix(),
            branch: ControlFlowBranch::Else,
            remove: false,
            source_pattern: default_source_pattern(),
        }
    }
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit path first, then the default locations, then built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        for p in &DEFAULT_CONFIG_PATHS {
            let path = Path::new(p);
            if path.is_file() {
                log::debug!("using config {}", path.display());
                return Self::load_from_path(path);
            }
        }
        Ok(Config::default())
    }
}
