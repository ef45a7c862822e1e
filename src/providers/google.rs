/*!
 * Client for the public Google Translate web endpoint.
 *
 * The endpoint takes the text as a form field and answers with a nested JSON
 * array. The first element holds one entry per sentence segment, each entry
 * starting with the translated segment; the third element is the detected
 * source language. Line breaks in the input survive inside the segments.
 */

use std::time::Duration;

use async_trait::async_trait;
use log::{error, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::Provider;
use crate::errors::ProviderError;

/// Default endpoint of the web translation service
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com";

/// Client identifier accepted by the public endpoint
const CLIENT_ID: &str = "gtx";

/// Google Translate client with retry and exponential backoff
#[derive(Debug)]
pub struct Google {
    /// Base URL of the service
    endpoint: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// A translation request
#[derive(Debug, Clone)]
pub struct GoogleRequest {
    /// Text to translate, possibly several lines
    pub text: String,
    /// Source language code, or `auto`
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl GoogleRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// A parsed translation response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleResponse {
    /// Translated sentence segments in order
    pub segments: Vec<String>,
    /// Source language reported by the service
    pub detected_language: Option<String>,
}

impl Google {
    /// Create a client for the given endpoint
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self::new_with_config(endpoint, timeout, 3, 1000)
    }

    /// Create a client with explicit retry settings
    pub fn new_with_config(
        endpoint: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            endpoint.trim_end_matches('/').to_string()
        };

        Self {
            endpoint,
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    fn translate_url(&self) -> String {
        format!("{}/translate_a/single", self.endpoint)
    }

    /// Send one request, without retrying
    async fn send_once(&self, request: &GoogleRequest) -> Result<GoogleResponse, ProviderError> {
        let response = self
            .client
            .post(self.translate_url())
            .query(&[
                ("client", CLIENT_ID),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
            ])
            .form(&[("q", request.text.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to reach Google Translate: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(status_error(status, error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read response body: {}", e)))?;
        parse_response(&body)
    }
}

fn status_error(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    }
}

fn is_retryable(error: &ProviderError) -> bool {
    match error {
        ProviderError::ConnectionError(_) | ProviderError::RateLimitExceeded(_) => true,
        ProviderError::ApiError { status_code, .. } => *status_code >= 500,
        _ => false,
    }
}

/// Parse the nested-array answer of the web endpoint
pub fn parse_response(body: &str) -> Result<GoogleResponse, ProviderError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("Invalid JSON from Google Translate: {}", e)))?;

    let entries = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::ParseError("Response has no translation segments".to_string()))?;

    let segments = entries
        .iter()
        .filter_map(|entry| entry.get(0).and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    let detected_language = value
        .get(2)
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(GoogleResponse {
        segments,
        detected_language,
    })
}

#[async_trait]
impl Provider for Google {
    type Request = GoogleRequest;
    type Response = GoogleResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let mut attempt = 0;

        loop {
            match self.send_once(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if is_retryable(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                    warn!(
                        "Google Translate request failed: {} - retrying in {} ms (attempt {}/{})",
                        e,
                        backoff_ms,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => {
                    error!("Google Translate request failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = GoogleRequest::new("Привет", "auto", "en");
        let response = self.send_once(&request).await?;
        if response.segments.is_empty() {
            return Err(ProviderError::ParseError(
                "Test translation returned no text".to_string(),
            ));
        }
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.segments.concat()
    }
}
