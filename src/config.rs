//! Configuration for speakable-hook.
//!
//! Loads an optional YAML file, then applies environment overrides.
//! Resolved once at startup and passed down to the pipeline.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8766/api/speakable";
pub const DEFAULT_WINDOW_TURNS: usize = 4;
pub const DEFAULT_MAX_TURN_CHARS: usize = 2000;

pub const ENV_CONFIG: &str = "SPEAKABLE_CONFIG";
pub const ENV_URL: &str = "SPEAKABLE_URL";
pub const ENV_DEBUG: &str = "SPEAKABLE_DEBUG";
pub const ENV_DEBUG_LOG: &str = "SPEAKABLE_DEBUG_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yml::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Speech endpoint that receives the payload.
    pub endpoint: String,
    /// Write diagnostic records to `debug_log`.
    pub debug: bool,
    /// Diagnostic log file. Defaults to ~/.modlr/logs/speakable-hook.log.
    pub debug_log: Option<PathBuf>,
    pub window_turns: usize,
    pub max_turn_chars: usize,
    #[serde(skip)]
    pub home: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            debug: false,
            debug_log: None,
            window_turns: DEFAULT_WINDOW_TURNS,
            max_turn_chars: DEFAULT_MAX_TURN_CHARS,
            home: None,
        }
    }
}

impl Config {
    /// Resolve the full configuration from file and process environment.
    pub fn resolve(path: Option<&Path>) -> Self {
        Self::resolve_with(path, dirs::home_dir(), |key| std::env::var(key).ok())
    }

    /// Same as [`Config::resolve`] with the home directory and environment
    /// supplied by the caller.
    pub fn resolve_with<F>(path: Option<&Path>, home: Option<PathBuf>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = path
            .map(PathBuf::from)
            .or_else(|| env(ENV_CONFIG).filter(|p| !p.is_empty()).map(PathBuf::from));

        let mut config = Self::load(explicit.as_deref(), home.as_deref());
        config.home = home;
        config.apply_env(env);
        config
    }

    /// Load configuration from a YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./speakable.yaml
    /// 2. ~/.config/speakable-hook/config.yaml
    pub fn load(path: Option<&Path>, home: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("speakable.yaml")),
                home.map(|h| h.join(".config/speakable-hook/config.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let Some(config_path) = resolved else {
            debug!("No config file found, using defaults");
            return Self::default();
        };

        match Self::from_file(&config_path) {
            Ok(config) => {
                info!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty file deserializes to unit, not a mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env(ENV_URL).filter(|u| !u.trim().is_empty()) {
            self.endpoint = url.trim().to_string();
        }
        if let Some(flag) = env(ENV_DEBUG) {
            self.debug = parse_flag(&flag);
        }
        if let Some(path) = env(ENV_DEBUG_LOG).filter(|p| !p.is_empty()) {
            self.debug_log = Some(PathBuf::from(path));
        }
    }

    /// Path of the diagnostic log, with `~` expanded.
    pub fn debug_log_path(&self) -> PathBuf {
        match &self.debug_log {
            Some(path) => self.expand_home(&path.to_string_lossy()),
            None => self
                .home
                .clone()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".modlr/logs/speakable-hook.log"),
        }
    }

    /// Expand a leading `~` or `~/` to the configured home directory.
    ///
    /// `~user` forms and paths without a tilde are returned unchanged, as is
    /// everything when no home directory is known.
    pub fn expand_home(&self, raw: &str) -> PathBuf {
        let Some(home) = &self.home else {
            return PathBuf::from(raw);
        };
        if raw == "~" {
            return home.clone();
        }
        match raw.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => PathBuf::from(raw),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
