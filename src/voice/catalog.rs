//! Voice catalog sources.

use super::model::Voice;
use crate::{Error, ErrorContext, Result};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Public Edge read-aloud voice list.
pub const DEFAULT_VOICES_URL: &str = "https://speech.platform.bing.com/consumer/speech/synthesize/readaloud/voices/list?trustedclienttoken=6A5AA1D4EAFF4E9FB37E23D68491D6F4";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36 Edg/130.0.0.0";

/// Source of the voices a synthesizer accepts.
#[async_trait]
pub trait VoiceCatalog: Send + Sync {
    async fn list_voices(&self) -> Result<Vec<Voice>>;

    /// Drop any cached list so the next call refreshes it. No-op for uncached catalogs.
    fn clear_cache(&self) {}
}

#[async_trait]
impl<C: VoiceCatalog + ?Sized> VoiceCatalog for Arc<C> {
    async fn list_voices(&self) -> Result<Vec<Voice>> {
        (**self).list_voices().await
    }

    fn clear_cache(&self) {
        (**self).clear_cache()
    }
}

/// Voice entry as returned by the Edge voice list endpoint.
#[derive(Debug, Deserialize)]
struct EdgeVoiceData {
    #[serde(rename = "ShortName")]
    short_name: String,
    #[serde(rename = "FriendlyName")]
    friendly_name: String,
    #[serde(rename = "Locale")]
    locale: String,
    #[serde(rename = "Gender")]
    gender: String,
}

impl From<EdgeVoiceData> for Voice {
    fn from(v: EdgeVoiceData) -> Self {
        Voice::new(v.short_name, v.friendly_name, v.locale, v.gender)
    }
}

/// Fetches the voice list over HTTP on every call.
pub struct HttpVoiceCatalog {
    http_client: reqwest::Client,
    url: String,
}

impl HttpVoiceCatalog {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        url::Url::parse(&url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid voices URL '{}': {}", url, e),
                ErrorContext::new().with_field_path("voices_url"),
            )
        })?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http_client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl VoiceCatalog for HttpVoiceCatalog {
    async fn list_voices(&self) -> Result<Vec<Voice>> {
        tracing::debug!(url = %self.url, "fetching voice list");
        let response = self.http_client.get(&self.url).send().await.map_err(|e| {
            Error::network_with_context(
                format!("Failed to list voices: {}", e),
                ErrorContext::new().with_source("voice_catalog"),
            )
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::remote(
                status.as_u16(),
                format!("Failed to fetch voices: {}", body.trim()),
            ));
        }
        let body = response.bytes().await.map_err(|e| {
            Error::network_with_context(
                format!("Failed to read voice list: {}", e),
                ErrorContext::new().with_source("voice_catalog"),
            )
        })?;
        let data: Vec<EdgeVoiceData> = serde_json::from_slice(&body)?;
        Ok(data.into_iter().map(Voice::from).collect())
    }
}

/// Caches the first successful listing of an inner catalog until [`VoiceCatalog::clear_cache`].
pub struct CachedVoiceCatalog<C> {
    inner: C,
    cache: ArcSwapOption<Vec<Voice>>,
}

impl<C: VoiceCatalog> CachedVoiceCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: ArcSwapOption::empty(),
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cache.load().is_some()
    }
}

#[async_trait]
impl<C: VoiceCatalog> VoiceCatalog for CachedVoiceCatalog<C> {
    async fn list_voices(&self) -> Result<Vec<Voice>> {
        if let Some(voices) = self.cache.load_full() {
            return Ok(voices.as_ref().clone());
        }
        let voices = self.inner.list_voices().await?;
        self.cache.store(Some(Arc::new(voices.clone())));
        Ok(voices)
    }

    fn clear_cache(&self) {
        self.cache.store(None);
        self.inner.clear_cache();
    }
}
