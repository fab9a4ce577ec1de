use crate::{generation::GenerationMode, normalizer::Rule};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    /// Mode used when a request omits `mode` or sends an unknown value.
    /// Defaults to image; an explicit `null` rejects such requests.
    #[serde(default = "default_mode_fallback")]
    pub mode_fallback: Option<GenerationMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub text_parameters: TextParameters,
}

/// Sampling parameters forwarded with every text generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParameters {
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_true")]
    pub do_sample: bool,
    #[serde(default)]
    pub return_full_text: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<Rule>,
    #[serde(default = "default_echo_prefix_words")]
    pub echo_prefix_words: usize,
    #[serde(default = "default_meta_phrases")]
    pub meta_phrases: Vec<String>,
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,
}

impl InferenceConfig {
    /// Explicit key first, then the configured environment variable.
    /// Blank values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            mode_fallback: default_mode_fallback(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_key_env: default_api_key_env(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            timeout_secs: default_timeout_secs(),
            text_parameters: TextParameters::default(),
        }
    }
}

impl Default for TextParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            do_sample: true,
            return_full_text: false,
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            echo_prefix_words: default_echo_prefix_words(),
            meta_phrases: default_meta_phrases(),
            fallback_text: default_fallback_text(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_mode_fallback() -> Option<GenerationMode> {
    Some(GenerationMode::Image)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_api_key_env() -> String {
    "HUGGINGFACE_API_KEY".to_string()
}

fn default_text_model() -> String {
    "google/gemma-7b".to_string()
}

fn default_image_model() -> String {
    "stabilityai/stable-diffusion-xl-base-1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_new_tokens() -> u32 {
    250
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.95
}

fn default_true() -> bool {
    true
}

fn default_rules() -> Vec<Rule> {
    Rule::ALL.to_vec()
}

fn default_echo_prefix_words() -> usize {
    4
}

fn default_meta_phrases() -> Vec<String> {
    [
        "note how",
        "note that",
        "for example",
        "you should",
        "keep in mind",
        "remember that",
        "as an ai",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_fallback_text() -> String {
    "No response generated.".to_string()
}
