//! Batch executor.

use super::unit::{SynthesisResult, SynthesisUnit};
use crate::ssml::SsmlValidator;
use crate::tts::Synthesizer;
use crate::{Error, Result};
use futures::{StreamExt, TryStreamExt};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    /// One call at a time, in input order. Progress is reported per item.
    Sequential,
    /// Up to `max_concurrency` calls in flight; results are reordered afterwards.
    Concurrent { max_concurrency: usize },
}

impl Default for BatchStrategy {
    fn default() -> Self {
        BatchStrategy::Concurrent { max_concurrency: 3 }
    }
}

impl BatchStrategy {
    /// Number of admission slots for a batch of `n` units; never zero, never more than `n`.
    pub fn effective_limit(&self, n: usize) -> usize {
        let requested = match self {
            BatchStrategy::Sequential => 1,
            BatchStrategy::Concurrent { max_concurrency } => (*max_concurrency).max(1),
        };
        requested.min(n.max(1))
    }
}

/// Fail-fast batch synthesizer with bounded concurrency and ordered reassembly.
///
/// - With `use_ssml` set, every unit is validated before anything is dispatched.
/// - At most `K` synthesis calls are outstanding at any instant.
/// - The output has the input's length and order, whatever the completion order was.
/// - The first unit to report failure aborts the batch; outstanding calls are dropped.
pub struct BatchSynthesizer<S> {
    synthesizer: S,
    voice: String,
    use_ssml: bool,
    strategy: BatchStrategy,
}

impl<S: Synthesizer> BatchSynthesizer<S> {
    pub fn new(synthesizer: S, voice: impl Into<String>) -> Self {
        Self {
            synthesizer,
            voice: voice.into(),
            use_ssml: false,
            strategy: BatchStrategy::default(),
        }
    }

    pub fn with_ssml(mut self, use_ssml: bool) -> Self {
        self.use_ssml = use_ssml;
        self
    }

    pub fn with_strategy(mut self, strategy: BatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_concurrency(self, k: usize) -> Self {
        self.with_strategy(BatchStrategy::Concurrent { max_concurrency: k })
    }

    pub fn strategy(&self) -> BatchStrategy {
        self.strategy
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Synthesize texts numbered in submission order and return the audio in that order.
    pub async fn synthesize_texts<I, T>(&self, texts: I) -> Result<Vec<Vec<u8>>>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let results = self.execute(SynthesisUnit::from_texts(texts)).await?;
        Ok(results.into_iter().map(SynthesisResult::into_audio).collect())
    }

    /// Run the batch with the configured strategy.
    pub async fn execute(&self, units: Vec<SynthesisUnit>) -> Result<Vec<SynthesisResult>> {
        match self.strategy {
            BatchStrategy::Sequential => self.execute_sequential(units).await,
            BatchStrategy::Concurrent { max_concurrency } => {
                self.execute_concurrent(units, max_concurrency).await
            }
        }
    }

    pub async fn execute_sequential(&self, units: Vec<SynthesisUnit>) -> Result<Vec<SynthesisResult>> {
        if units.is_empty() {
            return Ok(Vec::new());
        }
        self.validate_units(&units)?;

        let start = Instant::now();
        let total = units.len();
        let mut results = Vec::with_capacity(total);
        for (pos, unit) in units.iter().enumerate() {
            tracing::info!(
                "Processing batch item {}/{}: {}...",
                pos + 1,
                total,
                unit.preview()
            );
            results.push(self.synthesize_unit(unit).await?);
        }
        tracing::debug!(items = total, elapsed_ms = start.elapsed().as_millis() as u64, "sequential batch finished");
        Ok(reassemble(results))
    }

    pub async fn execute_concurrent(
        &self,
        units: Vec<SynthesisUnit>,
        max_concurrency: usize,
    ) -> Result<Vec<SynthesisResult>> {
        let n = units.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        self.validate_units(&units)?;

        let limit = BatchStrategy::Concurrent { max_concurrency }.effective_limit(n);
        let start = Instant::now();
        tracing::debug!(items = n, limit, voice = %self.voice, "dispatching concurrent batch");

        // buffer_unordered keeps at most `limit` calls in flight; dropping the collected
        // stream on the first error drops (cancels) every call still outstanding.
        let results: Vec<SynthesisResult> = futures::stream::iter(units.iter())
            .map(|unit| async move {
                tracing::info!("Processing concurrent item {}/{}: {}...", unit.index() + 1, n, unit.preview());
                self.synthesize_unit(unit).await
            })
            .buffer_unordered(limit)
            .try_collect()
            .await?;

        tracing::debug!(items = n, elapsed_ms = start.elapsed().as_millis() as u64, "concurrent batch finished");
        Ok(reassemble(results))
    }

    /// Run the batch in consecutive chunks of at most `chunk_size` units.
    ///
    /// Every unit is validated before the first chunk is dispatched, and units keep
    /// their own indices, so errors name the position in the full input.
    pub async fn execute_chunked(
        &self,
        units: Vec<SynthesisUnit>,
        chunk_size: usize,
    ) -> Result<Vec<SynthesisResult>> {
        self.validate_units(&units)?;
        let chunk_size = chunk_size.max(1);
        let chunks = units.len().div_ceil(chunk_size);
        let mut results = Vec::with_capacity(units.len());
        for (n, chunk) in units.chunks(chunk_size).enumerate() {
            tracing::info!(chunk = n + 1, chunks, items = chunk.len(), "dispatching batch chunk");
            results.extend(self.execute(chunk.to_vec()).await?);
        }
        Ok(reassemble(results))
    }

    /// With SSML checking on, reject the batch at the first invalid unit by index.
    pub fn validate_units(&self, units: &[SynthesisUnit]) -> Result<()> {
        if !self.use_ssml {
            return Ok(());
        }
        for unit in units {
            let diagnostics = SsmlValidator::validate(unit.text());
            if !diagnostics.is_empty() {
                return Err(Error::MarkupValidation {
                    index: Some(unit.index()),
                    diagnostics,
                });
            }
        }
        Ok(())
    }

    async fn synthesize_unit(&self, unit: &SynthesisUnit) -> Result<SynthesisResult> {
        self.synthesizer
            .synthesize(unit.text(), &self.voice)
            .await
            .map(|audio| SynthesisResult::new(unit.index(), audio))
            .map_err(|e| {
                tracing::debug!(index = unit.index(), error = %e, "batch item failed");
                Error::Synthesis {
                    index: unit.index(),
                    message: e.to_string(),
                }
            })
    }
}

/// Put results back in ascending index order.
fn reassemble(mut results: Vec<SynthesisResult>) -> Vec<SynthesisResult> {
    results.sort_by_key(|r| r.index);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl Synthesizer for Echo {
        async fn synthesize(&self, text: &str, _voice: &str) -> Result<Vec<u8>> {
            Ok(text.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(BatchStrategy::Sequential.effective_limit(10), 1);
        assert_eq!(BatchStrategy::Concurrent { max_concurrency: 4 }.effective_limit(10), 4);
        assert_eq!(BatchStrategy::Concurrent { max_concurrency: 40 }.effective_limit(3), 3);
        assert_eq!(BatchStrategy::Concurrent { max_concurrency: 0 }.effective_limit(3), 1);
        assert_eq!(BatchStrategy::Concurrent { max_concurrency: 5 }.effective_limit(0), 1);
    }

    #[test]
    fn test_empty_batch_returns_empty() {
        let batch = BatchSynthesizer::new(Echo, "v").with_max_concurrency(3);
        let out = tokio_test::block_on(batch.execute(Vec::new())).unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_preserves_order() {
        let batch = BatchSynthesizer::new(Echo, "en-US-AriaNeural").with_strategy(BatchStrategy::Sequential);
        let out = batch.synthesize_texts(["a", "b", "c"]).await.unwrap();
        assert_eq!(out, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[tokio::test]
    async fn test_out_of_order_indices_are_sorted() {
        let batch = BatchSynthesizer::new(Echo, "v").with_max_concurrency(2);
        let units = vec![
            SynthesisUnit::new(2, "c"),
            SynthesisUnit::new(0, "a"),
            SynthesisUnit::new(1, "b"),
        ];
        let out = batch.execute(units).await.unwrap();
        let indices: Vec<usize> = out.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(out[0].audio, b"a");
    }

    struct FailOn(&'static str);

    #[async_trait]
    impl Synthesizer for FailOn {
        async fn synthesize(&self, text: &str, _voice: &str) -> Result<Vec<u8>> {
            if text == self.0 {
                Err(Error::backend("refused"))
            } else {
                Ok(text.as_bytes().to_vec())
            }
        }
    }

    #[tokio::test]
    async fn test_chunked_keeps_input_order() {
        let batch = BatchSynthesizer::new(Echo, "v").with_max_concurrency(2);
        let texts: Vec<String> = (0..7).map(|i| format!("t{}", i)).collect();
        let out = batch
            .execute_chunked(SynthesisUnit::from_texts(texts.clone()), 5)
            .await
            .unwrap();
        let indices: Vec<usize> = out.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
        assert_eq!(out[6].audio, b"t6");
    }

    #[tokio::test]
    async fn test_chunked_failure_names_index_in_full_input() {
        let batch = BatchSynthesizer::new(FailOn("fail"), "v").with_max_concurrency(2);
        let mut texts = vec!["ok"; 6];
        texts.push("fail");
        let err = batch
            .execute_chunked(SynthesisUnit::from_texts(texts), 5)
            .await
            .unwrap_err();
        assert_eq!(err.batch_index(), Some(6));
        assert!(err.to_string().contains("batch item 6"), "{}", err);
    }

    #[tokio::test]
    async fn test_invalid_ssml_unit_aborts_before_dispatch() {
        let valid = crate::ssml::SsmlBuilder::new("en-US-AriaNeural").add_text("ok").build();
        let invalid = crate::ssml::SsmlBuilder::new("en-US-AriaNeural").add_break("5").build();
        let batch = BatchSynthesizer::new(Echo, "en-US-AriaNeural").with_ssml(true);
        let err = batch.synthesize_texts([valid, invalid]).await.unwrap_err();
        assert_eq!(err.batch_index(), Some(1));
        assert!(matches!(err, Error::MarkupValidation { .. }));
    }
}
