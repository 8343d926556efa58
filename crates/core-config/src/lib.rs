//! Configuration loading and parsing.
//!
//! Parses `oxvi.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [insert]
//! tab = "  "
//!
//! [input]
//! max_pending = 32
//!
//! [history]
//! limit = 1000
//! ```
//!
//! Every field is optional. A missing file yields defaults; a file that fails
//! to parse also yields defaults, with a WARN on target `config`. Values below
//! their floor are clamped at load (`max_pending >= 3`, `limit >= 1`) and the
//! clamp is logged at INFO. Unknown fields are ignored so older binaries keep
//! reading newer files.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, io::ErrorKind, path::PathBuf};
use tracing::{info, warn};

/// Smallest pending chain that still fits a counted two-key command such as `2dd`.
pub const MIN_PENDING: usize = 3;
pub const MIN_HISTORY: usize = 1;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InsertConfig {
    #[serde(default = "InsertConfig::default_tab")]
    pub tab: String,
}

impl Default for InsertConfig {
    fn default() -> Self {
        Self {
            tab: Self::default_tab(),
        }
    }
}

impl InsertConfig {
    fn default_tab() -> String {
        "  ".to_owned()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_max_pending")]
    pub max_pending: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_pending: Self::default_max_pending(),
        }
    }
}

impl InputConfig {
    const fn default_max_pending() -> usize {
        32
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_limit")]
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: Self::default_limit(),
        }
    }
}

impl HistoryConfig {
    const fn default_limit() -> usize {
        1000
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub insert: InsertConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // file contents as read, when a file was found
    pub file: ConfigFile,    // parsed (or default) data, clamped
}

/// Config path: `oxvi.toml` in the working directory, else the platform
/// config dir (`$XDG_CONFIG_HOME/oxvi/oxvi.toml`, `%APPDATA%\oxvi\oxvi.toml`).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("oxvi.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxvi").join("oxvi.toml");
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(target: "config", path = %path.display(), "config_missing_using_defaults");
            return Ok(Config::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };
    let mut cfg = match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Config {
            raw: Some(content),
            file,
        },
        Err(err) => {
            warn!(target: "config", path = %path.display(), error = %err, "config_parse_failed_using_defaults");
            return Ok(Config::default());
        }
    };
    cfg.clamp();
    info!(target: "config", path = %path.display(), "config_loaded");
    Ok(cfg)
}

impl Config {
    /// Text inserted by Tab in Insert mode.
    pub fn tab(&self) -> &str {
        &self.file.insert.tab
    }

    pub fn max_pending(&self) -> usize {
        self.file.input.max_pending.max(MIN_PENDING)
    }

    pub fn history_limit(&self) -> usize {
        self.file.history.limit.max(MIN_HISTORY)
    }

    /// Raise out-of-range values to their floor, logging each change.
    pub fn clamp(&mut self) {
        let raw = self.file.input.max_pending;
        if raw < MIN_PENDING {
            self.file.input.max_pending = MIN_PENDING;
            info!(target: "config", raw, clamped = MIN_PENDING, "input_max_pending_clamped");
        }
        let raw = self.file.history.limit;
        if raw < MIN_HISTORY {
            self.file.history.limit = MIN_HISTORY;
            info!(target: "config", raw, clamped = MIN_HISTORY, "history_limit_clamped");
        }
    }
}
