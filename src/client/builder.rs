use crate::client::core::TtsClient;
use crate::config::TtsConfig;
use crate::tts::{
    CommandSynthesizer, HttpSynthesizer, RetryConfig, RetryingSynthesizer, Synthesizer,
};
use crate::voice::{CachedVoiceCatalog, HttpVoiceCatalog, VoiceCatalog};
use crate::Result;
use std::sync::Arc;

/// Builder for [`TtsClient`].
///
/// Without explicit collaborators the client is wired from its [`TtsConfig`]:
/// an [`HttpSynthesizer`] when `endpoint` is set, otherwise the `edge-tts`
/// command line, wrapped in a [`RetryingSynthesizer`]; and the Edge voice list,
/// cached when `cache_voices` is on.
pub struct TtsClientBuilder {
    config: TtsConfig,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    voice_catalog: Option<Arc<dyn VoiceCatalog>>,
}

impl TtsClientBuilder {
    pub fn new() -> Self {
        Self {
            config: TtsConfig::default(),
            synthesizer: None,
            voice_catalog: None,
        }
    }

    pub fn with_config(mut self, config: TtsConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom synthesis capability. It is used as given, without the retry wrapper.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn with_voice_catalog(mut self, catalog: Arc<dyn VoiceCatalog>) -> Self {
        self.voice_catalog = Some(catalog);
        self
    }

    pub fn build(self) -> Result<TtsClient> {
        self.config.validate()?;

        let synthesizer = match self.synthesizer {
            Some(s) => s,
            None => default_synthesizer(&self.config)?,
        };
        let voice_catalog = match self.voice_catalog {
            Some(c) => c,
            None => default_catalog(&self.config)?,
        };
        tracing::debug!(
            synthesizer = synthesizer.name(),
            voice = %self.config.default_voice,
            max_concurrent = self.config.max_concurrent,
            "TTS client ready"
        );

        Ok(TtsClient {
            config: self.config,
            synthesizer,
            voice_catalog,
        })
    }
}

impl Default for TtsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn retry_config(config: &TtsConfig) -> RetryConfig {
    RetryConfig::new()
        .with_max_retries(config.max_retries)
        .with_attempt_timeout(Some(config.timeout()))
}

fn default_synthesizer(config: &TtsConfig) -> Result<Arc<dyn Synthesizer>> {
    let retry = retry_config(config);
    let synthesizer: Arc<dyn Synthesizer> = match &config.endpoint {
        Some(endpoint) => {
            let http = HttpSynthesizer::builder()
                .endpoint(endpoint.clone())
                .api_key_env(config.api_key_env.clone())
                .format(config.output_format)
                .timeout(config.timeout())
                .build()?;
            Arc::new(RetryingSynthesizer::new(http, retry))
        }
        None => Arc::new(RetryingSynthesizer::new(CommandSynthesizer::new(), retry)),
    };
    Ok(synthesizer)
}

fn default_catalog(config: &TtsConfig) -> Result<Arc<dyn VoiceCatalog>> {
    let http = HttpVoiceCatalog::new(config.voices_url.clone(), config.timeout())?;
    if config.cache_voices {
        Ok(Arc::new(CachedVoiceCatalog::new(http)))
    } else {
        Ok(Arc::new(http))
    }
}
