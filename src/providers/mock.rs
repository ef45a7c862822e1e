/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Tags every line with the target language
 * - `MockProvider::dictionary(..)` - Looks every line up in a fixed table
 * - `MockProvider::dropping_last_line()` - Answers with one line too few
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::intermittent(n)` - Fails every n-th request
 *
 * Every request text is recorded so tests can inspect what was sent.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::translation::batch::LINE_SEPARATOR;
use crate::translation::core::TextTranslator;

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Target language
    pub target_language: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Prefixes every line with the target language in brackets
    Working,
    /// Replaces every line found in the table; other lines come back unchanged
    Dictionary(HashMap<String, String>),
    /// Translates like `Working` but loses the last line of every answer
    DropLastLine,
    /// Fails every Nth request, works otherwise
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Target language passed along with every request
    target_language: String,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Texts of all requests, in order, shared between clones
    requests: Arc<Mutex<Vec<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            target_language: "en".to_string(),
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that translates through a fixed table
    pub fn dictionary<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = entries
            .into_iter()
            .map(|(source, target)| (source.into(), target.into()))
            .collect();
        Self::new(MockBehavior::Dictionary(table))
    }

    /// Create a mock provider whose answers are one line short
    pub fn dropping_last_line() -> Self {
        Self::new(MockBehavior::DropLastLine)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Set the target language
    pub fn with_target_language(mut self, target_language: impl Into<String>) -> Self {
        self.target_language = target_language.into();
        self
    }

    /// Set a custom response generator, used instead of the behavior when it succeeds
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts of all requests received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    fn tag_lines(request: &MockRequest) -> Vec<String> {
        request
            .text
            .split(LINE_SEPARATOR)
            .map(|line| format!("[{}] {}", request.target_language, line))
            .collect()
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.text.clone());

        let lines = match &self.behavior {
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    message: "Simulated provider failure".to_string(),
                    status_code: 500,
                });
            }
            MockBehavior::Intermittent { fail_every } if *fail_every > 0 && count % fail_every == fail_every - 1 => {
                return Err(ProviderError::ApiError {
                    message: format!("Simulated intermittent failure (request #{})", count + 1),
                    status_code: 503,
                });
            }
            _ if self.custom_response.is_some() => {
                let text = self
                    .custom_response
                    .map(|generator| generator(&request))
                    .unwrap_or_default();
                return Ok(MockResponse { text });
            }
            MockBehavior::Working | MockBehavior::Intermittent { .. } => Self::tag_lines(&request),
            MockBehavior::Dictionary(table) => request
                .text
                .split(LINE_SEPARATOR)
                .map(|line| table.get(line).cloned().unwrap_or_else(|| line.to_string()))
                .collect(),
            MockBehavior::DropLastLine => {
                let mut lines = Self::tag_lines(&request);
                lines.pop();
                lines
            }
        };

        Ok(MockResponse {
            text: lines.join(LINE_SEPARATOR),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}

#[async_trait]
impl TextTranslator for MockProvider {
    async fn translate_text(&self, text: &str) -> Result<String, ProviderError> {
        let request = MockRequest {
            text: text.to_string(),
            target_language: self.target_language.clone(),
        };
        let response = self.complete(request).await?;
        Ok(Self::extract_text(&response))
    }
}
