use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_target_lang() -> String {
    "English".to_string()
}

fn default_context_chars() -> usize {
    400
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Empty key means the lookup service is not configured
    #[serde(default)]
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Language translations and notes are written in
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Context excerpt sent with each lookup is cut to this many characters
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
            target_lang: default_target_lang(),
            context_chars: default_context_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
