use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_path() -> PathBuf {
    crate::data_root().join("vocabulary.tsv")
}

fn default_emphasize_context() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Wrap the looked-up word in `<b>` tags inside the stored context
    #[serde(default = "default_emphasize_context")]
    pub emphasize_context: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            emphasize_context: default_emphasize_context(),
        }
    }
}
