//! The synthesis capability seam.

use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Converts one text or SSML unit into audio bytes.
///
/// Implementations own their transport and any retry policy; callers treat each
/// call as a single opaque request that either yields audio or fails.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "synthesizer"
    }
}

#[async_trait]
impl<S: Synthesizer + ?Sized> Synthesizer for Arc<S> {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        (**self).synthesize(text, voice).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[async_trait]
impl<S: Synthesizer + ?Sized> Synthesizer for Box<S> {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        (**self).synthesize(text, voice).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
