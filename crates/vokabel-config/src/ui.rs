use serde::{Deserialize, Serialize};

fn default_min_width() -> usize {
    20
}

fn default_max_width() -> usize {
    60
}

fn default_max_height() -> usize {
    12
}

fn default_context_radius() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_min_width")]
    pub min_width: usize,
    #[serde(default = "default_max_width")]
    pub max_width: usize,
    #[serde(default = "default_max_height")]
    pub max_height: usize,
    /// Lines above and below the cursor line captured as lookup context
    #[serde(default = "default_context_radius")]
    pub context_radius: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            max_width: default_max_width(),
            max_height: default_max_height(),
            context_radius: default_context_radius(),
        }
    }
}
