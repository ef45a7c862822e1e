/*!
 * Core translation service implementation.
 *
 * This module contains the `TextTranslator` seam the batcher talks to and the
 * `TranslationService`, which implements it on top of the configured provider.
 */

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, info};
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::google::{Google, GoogleRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};

/// A service that translates line-delimited text.
///
/// Implementations must answer with the same number of lines, in the same
/// order, as they were given.
#[async_trait]
pub trait TextTranslator: Send + Sync {
    async fn translate_text(&self, text: &str) -> Result<String, ProviderError>;
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Google web translation
    Google {
        /// Client instance
        client: Google,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },
}

/// Main translation service for pack content
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Source language code, or `auto`
    source_language: String,

    /// Target language code
    target_language: String,
}

/// Check that an endpoint string is a usable base URL
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(url)
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(
        config: TranslationConfig,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = parse_endpoint(&config.get_endpoint())?;
        let timeout = Duration::from_secs(config.get_timeout_secs());
        let retry_count = config.common.retry_count;
        let retry_backoff_ms = config.common.retry_backoff_ms;

        let provider = match config.provider {
            ConfigTranslationProvider::Google => TranslationProviderImpl::Google {
                client: Google::new_with_config(endpoint.as_str(), timeout, retry_count, retry_backoff_ms),
            },
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(endpoint.as_str(), timeout, retry_count, retry_backoff_ms),
            },
        };

        Ok(Self {
            provider,
            config,
            source_language: source_language.into(),
            target_language: target_language.into(),
        })
    }

    /// Human-readable provider name and model, for logs
    pub fn provider_label(&self) -> String {
        match &self.provider {
            TranslationProviderImpl::Google { .. } => self.config.provider.display_name().to_string(),
            TranslationProviderImpl::Ollama { .. } => {
                format!("{} ({})", self.config.provider.display_name(), self.config.get_model())
            }
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        info!("Testing connection to {}", self.provider_label());

        let result = match &self.provider {
            TranslationProviderImpl::Google { client } => client.test_connection().await,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
        };

        result.map_err(|e| anyhow!("Failed to connect to {}: {}", self.config.provider.display_name(), e))?;
        debug!("Successfully connected to {}", self.config.provider.display_name());
        Ok(())
    }

    /// System prompt with the language placeholders filled in
    fn system_prompt(&self) -> String {
        let source = if crate::language_utils::is_auto(&self.source_language) {
            "the detected source language".to_string()
        } else {
            language_display_name(&self.source_language)
        };

        self.config
            .common
            .system_prompt
            .replace("{source_language}", &source)
            .replace("{target_language}", &language_display_name(&self.target_language))
    }
}

fn language_display_name(code: &str) -> String {
    crate::language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string())
}

#[async_trait]
impl TextTranslator for TranslationService {
    async fn translate_text(&self, text: &str) -> Result<String, ProviderError> {
        match &self.provider {
            TranslationProviderImpl::Google { client } => {
                let request = GoogleRequest::new(text, &self.source_language, &self.target_language);
                let response = client.complete(request).await?;
                if let Some(detected) = &response.detected_language {
                    debug!("Google Translate detected source language: {}", detected);
                }
                Ok(Google::extract_text(&response))
            }
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(self.config.get_model(), text)
                    .system(self.system_prompt())
                    .temperature(self.config.common.temperature);
                let response = client.complete(request).await?;
                Ok(Ollama::extract_text(&response))
            }
        }
    }
}
