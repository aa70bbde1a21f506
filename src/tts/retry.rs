//! Retry and timeout policy around a synthesizer.
//!
//! Retries belong to the synthesis capability, not to the batch core: the batch
//! synthesizer sees a single call that either succeeds or fails for good.

use super::synthesizer::Synthesizer;
use crate::{Error, Result};
use async_trait::async_trait;
use tokio::time::Duration;

/// Configuration for retry logic
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Per-attempt deadline; `None` disables the timeout.
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            attempt_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }
    pub fn with_delays(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max;
        self
    }
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Exponential backoff: min_delay * 2^attempt, capped at max_delay.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = self.min_delay.as_millis() as u64;
        let cap = self.max_delay.as_millis() as u64;
        let delay = base.saturating_mul(1u64 << attempt.min(32)).min(cap);
        Duration::from_millis(delay)
    }
}

/// Wraps a synthesizer with a per-attempt timeout and retries on retryable errors.
pub struct RetryingSynthesizer<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: Synthesizer> RetryingSynthesizer<S> {
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn attempt(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        match self.config.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, self.inner.synthesize(text, voice))
                .await
                .map_err(|_| Error::Timeout {
                    after_ms: limit.as_millis() as u64,
                })?,
            None => self.inner.synthesize(text, voice).await,
        }
    }
}

#[async_trait]
impl<S: Synthesizer> Synthesizer for RetryingSynthesizer<S> {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let mut attempt = 0u32;
        loop {
            match self.attempt(text, voice).await {
                Ok(audio) => return Ok(audio),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff(attempt);
                    attempt += 1;
                    tracing::warn!(
                        synthesizer = self.inner.name(),
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "synthesis attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        calls: AtomicU32,
        fail_times: u32,
        error: fn() -> Error,
    }

    #[async_trait]
    impl Synthesizer for Flaky {
        async fn synthesize(&self, _text: &str, _voice: &str) -> Result<Vec<u8>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_times {
                Err((self.error)())
            } else {
                Ok(vec![1, 2, 3])
            }
        }
    }

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig::new()
            .with_max_retries(max_retries)
            .with_delays(Duration::from_millis(1), Duration::from_millis(2))
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = RetryConfig::new()
            .with_delays(Duration::from_millis(100), Duration::from_millis(500));
        assert_eq!(config.backoff(0), Duration::from_millis(100));
        assert_eq!(config.backoff(1), Duration::from_millis(200));
        assert_eq!(config.backoff(2), Duration::from_millis(400));
        assert_eq!(config.backoff(3), Duration::from_millis(500));
        assert_eq!(config.backoff(40), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_retries_retryable_errors() {
        let synth = RetryingSynthesizer::new(
            Flaky {
                calls: AtomicU32::new(0),
                fail_times: 2,
                error: || Error::remote(503, "busy"),
            },
            fast_config(3),
        );
        assert_eq!(synth.synthesize("hi", "v").await.unwrap(), vec![1, 2, 3]);
        assert_eq!(synth.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let synth = RetryingSynthesizer::new(
            Flaky {
                calls: AtomicU32::new(0),
                fail_times: 10,
                error: || Error::remote(500, "down"),
            },
            fast_config(2),
        );
        assert!(synth.synthesize("hi", "v").await.is_err());
        assert_eq!(synth.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_errors() {
        let synth = RetryingSynthesizer::new(
            Flaky {
                calls: AtomicU32::new(0),
                fail_times: 10,
                error: || Error::remote(400, "unknown voice"),
            },
            fast_config(5),
        );
        assert!(synth.synthesize("hi", "v").await.is_err());
        assert_eq!(synth.inner().calls.load(Ordering::SeqCst), 1);
    }

    struct Stuck;

    #[async_trait]
    impl Synthesizer for Stuck {
        async fn synthesize(&self, _text: &str, _voice: &str) -> Result<Vec<u8>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_attempt_timeout() {
        let synth = RetryingSynthesizer::new(
            Stuck,
            fast_config(0).with_attempt_timeout(Some(Duration::from_millis(20))),
        );
        let err = synth.synthesize("hi", "v").await.unwrap_err();
        assert!(matches!(err, Error::Timeout { after_ms: 20 }));
    }
}
