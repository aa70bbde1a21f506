//! HTTP synthesis client.

use super::synthesizer::Synthesizer;
use super::types::AudioFormat;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Environment variable consulted when no API key is given to the builder.
pub const DEFAULT_API_KEY_ENV: &str = "TTS_API_KEY";

/// Synthesizer that POSTs each unit to a JSON speech endpoint and returns the response body.
pub struct HttpSynthesizer {
    http_client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
    api_key: Option<String>,
    format: AudioFormat,
}

impl HttpSynthesizer {
    pub fn builder() -> HttpSynthesizerBuilder {
        HttpSynthesizerBuilder::new()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let mut body = serde_json::json!({
            "input": text,
            "voice": voice,
            "response_format": self.format.extension(),
        });
        if let Some(model) = &self.model {
            body["model"] = serde_json::Value::String(model.clone());
        }

        let mut request = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(endpoint = %self.endpoint, voice, chars = text.len(), "sending synthesis request");
        let response = request.send().await.map_err(|e| {
            let what = if e.is_timeout() { "timed out" } else { "failed" };
            Error::network_with_context(
                format!("TTS request {}: {}", what, e),
                ErrorContext::new().with_source("http_synthesizer"),
            )
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            Error::network_with_context(
                format!("Failed to read TTS response: {}", e),
                ErrorContext::new().with_source("http_synthesizer"),
            )
        })?;
        if !status.is_success() {
            let body_str = String::from_utf8_lossy(&bytes);
            return Err(Error::remote(status.as_u16(), body_str.trim().to_string()));
        }
        if bytes.is_empty() {
            return Err(Error::backend_with_context(
                "No audio data generated",
                ErrorContext::new().with_source("http_synthesizer"),
            ));
        }
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

pub struct HttpSynthesizerBuilder {
    endpoint: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    api_key_env: String,
    format: AudioFormat,
    timeout: Duration,
}

impl HttpSynthesizerBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            model: None,
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            format: AudioFormat::Mp3,
            timeout: Duration::from_secs(60),
        }
    }
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }
    pub fn format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpSynthesizer> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| Error::configuration("Synthesis endpoint must be specified"))?;
        url::Url::parse(&endpoint).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid synthesis endpoint '{}': {}", endpoint, e),
                ErrorContext::new().with_field_path("endpoint"),
            )
        })?;
        // The key is optional: local and proxy endpoints often run without auth.
        let api_key = self
            .api_key
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.is_empty());
        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(HttpSynthesizer {
            http_client,
            endpoint,
            model: self.model,
            api_key,
            format: self.format,
        })
    }
}

impl Default for HttpSynthesizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
