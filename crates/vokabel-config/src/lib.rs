use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::notes::NotesConfig;
use self::store::StoreConfig;
use self::translator::TranslatorConfig;
use self::ui::UiConfig;

pub mod notes;
pub mod store;
pub mod translator;
pub mod ui;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub translator: TranslatorConfig,
    pub ui: UiConfig,
    pub notes: NotesConfig,
}

/// Root directory for vocabulary and notes files
pub fn data_root() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vokabel")
}

/// Default location of the JSON config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vokabel").join("config.json"))
}

impl Config {
    /// Defaults overridden by the process environment
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load from `path` (or the default location), then apply env overrides.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {}", path.display());
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply `VOKABEL_*` overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("VOKABEL_API_KEY") {
            self.translator.api_key = key;
        }
        if let Some(url) = get("VOKABEL_API_URL") {
            self.translator.api_url = url;
        }
        if let Some(model) = get("VOKABEL_MODEL") {
            self.translator.model = model;
        }
        if let Some(lang) = get("VOKABEL_TARGET_LANG") {
            self.translator.target_lang = lang;
        }
        if let Some(timeout) = get("VOKABEL_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.translator.timeout_secs = timeout;
        }
        if let Some(path) = get("VOKABEL_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }
        if let Some(path) = get("VOKABEL_NOTES_PATH") {
            self.notes.path = PathBuf::from(path);
        }
    }
}
