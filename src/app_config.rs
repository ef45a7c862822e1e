use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration: languages, pack layout, batching and the
/// translation providers, read from and written to a JSON file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or `auto` to let the service detect it
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Pack layout settings
    #[serde(default)]
    pub pack: PackConfig,

    /// Extraction and batching settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google web translation
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                model: String::new(),
                endpoint: default_google_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_ollama_timeout_secs(),
            },
        }
    }
}

/// Pack layout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PackConfig {
    /// Path of the content document inside the archive
    #[serde(default = "default_content_file")]
    pub content_file: String,

    /// Suffix appended to the input path when no output path is given
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            content_file: default_content_file(),
            output_suffix: default_output_suffix(),
        }
    }
}

/// Extraction and batching configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Number of text fragments per translation request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause after every translation request, in milliseconds
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,

    /// Regular expression matching text that still needs translation.
    /// Cyrillic letters are looked for when unset.
    #[serde(default)]
    pub source_pattern: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            pacing_delay_ms: default_pacing_delay_ms(),
            source_pattern: None,
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for LLM providers
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_content_file() -> String {
    "content.xml".to_string()
}

fn default_output_suffix() -> String {
    ".translation.siq".to_string()
}

fn default_batch_size() -> usize {
    crate::translation::batch::DEFAULT_BATCH_SIZE
}

fn default_pacing_delay_ms() -> u64 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_google_endpoint() -> String {
    crate::providers::google::DEFAULT_ENDPOINT.to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator of quiz questions. Translate the following text from {source_language} to {target_language}. \
     Every input line is a separate fragment: answer with exactly one translated line per input line, in the same order. \
     Only respond with the translated lines, without any explanations or notes."
        .to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !crate::language_utils::is_auto(&self.source_language) {
            crate::language_utils::get_language_name(&self.source_language)?;
        }
        crate::language_utils::get_language_name(&self.target_language)?;

        if self.pipeline.batch_size == 0 {
            return Err(anyhow!("Batch size must be a positive number"));
        }

        if let Some(pattern) = &self.pipeline.source_pattern {
            regex::Regex::new(pattern)
                .map_err(|e| anyhow!("Invalid source pattern '{}': {}", pattern, e))?;
        }

        if self.pack.content_file.trim().is_empty() {
            return Err(anyhow!("Content file name cannot be empty"));
        }

        crate::translation::core::parse_endpoint(&self.translation.get_endpoint())?;

        if self.translation.provider == TranslationProvider::Ollama && self.translation.get_model().is_empty() {
            return Err(anyhow!("A model name is required for the Ollama provider"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            pack: PackConfig::default(),
            pipeline: PipelineConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::Google => String::new(),
            TranslationProvider::Ollama => default_ollama_model(),
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Google => default_google_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(provider_config) if provider_config.timeout_secs > 0 => provider_config.timeout_secs,
            _ => match self.provider {
                TranslationProvider::Google => default_timeout_secs(),
                TranslationProvider::Ollama => default_ollama_timeout_secs(),
            },
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Ollama),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
