use crate::audio;
use crate::batch::{BatchStrategy, BatchSynthesizer, SynthesisResult, SynthesisUnit};
use crate::client::builder::TtsClientBuilder;
use crate::config::TtsConfig;
use crate::ssml::{self, SsmlBuilder};
use crate::tts::Synthesizer;
use crate::voice::{self, Voice, VoiceCatalog};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Client facade for synthesis, voice discovery and audio output.
pub struct TtsClient {
    pub(crate) config: TtsConfig,
    pub(crate) synthesizer: Arc<dyn Synthesizer>,
    pub(crate) voice_catalog: Arc<dyn VoiceCatalog>,
}

impl TtsClient {
    pub fn builder() -> TtsClientBuilder {
        TtsClientBuilder::new()
    }

    /// Client wired from `config` with the default collaborators.
    pub fn new(config: TtsConfig) -> Result<Self> {
        TtsClientBuilder::new().with_config(config).build()
    }

    pub fn config(&self) -> &TtsConfig {
        &self.config
    }

    fn voice_or_default<'a>(&'a self, voice: Option<&'a str>) -> &'a str {
        voice.unwrap_or(&self.config.default_voice)
    }

    /// Synthesize one unit. With `use_ssml` the markup is validated before any call is made.
    pub async fn synthesize_text(
        &self,
        text: &str,
        voice: Option<&str>,
        use_ssml: bool,
    ) -> Result<Vec<u8>> {
        if use_ssml {
            ssml::validate_ssml(text)?;
        }
        let voice = self.voice_or_default(voice);
        tracing::debug!(voice, chars = text.len(), "synthesizing text");
        let audio = self.synthesizer.synthesize(text, voice).await?;
        if audio.is_empty() {
            return Err(Error::backend(format!(
                "No audio data generated for text: {}...",
                crate::utils::preview(text, 50)
            )));
        }
        Ok(audio)
    }

    pub async fn synthesize_ssml(&self, ssml: &str, voice: Option<&str>) -> Result<Vec<u8>> {
        self.synthesize_text(ssml, voice, true).await
    }

    fn batch(&self, voice: Option<&str>, use_ssml: bool) -> BatchSynthesizer<Arc<dyn Synthesizer>> {
        BatchSynthesizer::new(Arc::clone(&self.synthesizer), self.voice_or_default(voice))
            .with_ssml(use_ssml)
    }

    /// Synthesize texts one at a time, in order.
    pub async fn batch_synthesize(
        &self,
        texts: &[String],
        voice: Option<&str>,
        use_ssml: bool,
    ) -> Result<Vec<Vec<u8>>> {
        self.batch(voice, use_ssml)
            .with_strategy(BatchStrategy::Sequential)
            .synthesize_texts(texts.iter().cloned())
            .await
    }

    /// Synthesize texts with at most `max_concurrent` calls in flight
    /// (config `max_concurrent` when `None`). Output order matches `texts`.
    pub async fn batch_synthesize_concurrent(
        &self,
        texts: &[String],
        voice: Option<&str>,
        use_ssml: bool,
        max_concurrent: Option<usize>,
    ) -> Result<Vec<Vec<u8>>> {
        let limit = max_concurrent.unwrap_or(self.config.max_concurrent);
        self.batch(voice, use_ssml)
            .with_max_concurrency(limit)
            .synthesize_texts(texts.iter().cloned())
            .await
    }

    /// Synthesize texts in consecutive chunks of `chunk_size` (config `batch_size` when `None`).
    ///
    /// With `use_ssml` every text is validated before the first chunk is sent. Errors
    /// carry the index of the text in `texts`, not within its chunk.
    pub async fn batch_synthesize_chunked(
        &self,
        texts: &[String],
        voice: Option<&str>,
        use_ssml: bool,
        strategy: BatchStrategy,
        chunk_size: Option<usize>,
    ) -> Result<Vec<Vec<u8>>> {
        let chunk_size = chunk_size.unwrap_or(self.config.batch_size);
        let results = self
            .batch(voice, use_ssml)
            .with_strategy(strategy)
            .execute_chunked(SynthesisUnit::from_texts(texts.iter().cloned()), chunk_size)
            .await?;
        Ok(results.into_iter().map(SynthesisResult::into_audio).collect())
    }

    /// Try each voice in order and return the audio with the voice that produced it.
    ///
    /// If every voice fails, the error lists each voice's failure.
    pub async fn synthesize_with_fallback(
        &self,
        text: &str,
        voices: &[&str],
    ) -> Result<(Vec<u8>, String)> {
        let mut failures = Vec::new();
        for voice in voices {
            match self.synthesize_text(text, Some(voice), false).await {
                Ok(audio) => return Ok((audio, voice.to_string())),
                Err(e) => {
                    tracing::warn!(voice = *voice, error = %e, "voice failed, trying next");
                    failures.push(format!("{}: {}", voice, e));
                }
            }
        }
        if failures.is_empty() {
            return Err(Error::configuration("No voices given"));
        }
        Err(Error::backend(format!("all voices failed: {}", failures.join("; "))))
    }

    pub async fn list_voices(&self) -> Result<Vec<Voice>> {
        self.voice_catalog.list_voices().await
    }

    /// Voices for a language (`en`) or a full locale (`en-US`).
    pub async fn voices_by_language(&self, language: &str) -> Result<Vec<Voice>> {
        let voices = self.list_voices().await?;
        Ok(voice::filter_by_language(&voices, language))
    }

    pub fn clear_voice_cache(&self) {
        self.voice_catalog.clear_cache();
    }

    /// Markup builder for `voice` (default voice when `None`).
    pub fn ssml_builder(&self, voice: Option<&str>) -> SsmlBuilder {
        SsmlBuilder::new(self.voice_or_default(voice))
    }

    /// Prosody markup; unset values fall back to the configured rate, pitch and volume.
    pub fn create_prosody_ssml(
        &self,
        text: &str,
        voice: Option<&str>,
        rate: Option<&str>,
        pitch: Option<&str>,
        volume: Option<&str>,
    ) -> String {
        ssml::create_prosody_ssml(
            text,
            self.voice_or_default(voice),
            Some(rate.unwrap_or(&self.config.rate)),
            Some(pitch.unwrap_or(&self.config.pitch)),
            Some(volume.unwrap_or(&self.config.volume)),
        )
    }

    pub fn create_emphasis_ssml(&self, text: &str, voice: Option<&str>, level: Option<&str>) -> String {
        ssml::create_emphasis_ssml(
            text,
            self.voice_or_default(voice),
            level.unwrap_or(ssml::DEFAULT_EMPHASIS_LEVEL),
        )
    }

    pub fn create_break_ssml(&self, parts: &[&str], voice: Option<&str>, break_time: Option<&str>) -> String {
        ssml::create_break_ssml(
            parts,
            self.voice_or_default(voice),
            break_time.unwrap_or(ssml::DEFAULT_BREAK_TIME),
        )
    }

    /// Path under the configured output directory with the configured format's extension.
    pub fn output_path(&self, stem: &str) -> PathBuf {
        self.config
            .output_directory
            .join(format!("{}.{}", stem, self.config.output_format.extension()))
    }

    pub async fn save_audio(&self, audio: &[u8], path: impl AsRef<Path>) -> Result<()> {
        audio::save_audio(audio, path).await
    }

    pub async fn batch_save_audio(&self, audio_list: &[Vec<u8>], template: &str) -> Result<Vec<PathBuf>> {
        audio::batch_save_audio(audio_list, template).await
    }
}
