//! # edge-tts-client
//!
//! 这是云端文字转语音（TTS）服务的 Rust 客户端库，提供 SSML 构建与校验、有界并发批量合成及音频输出。
//!
//! Client library for cloud text-to-speech: compose and validate SSML, synthesize
//! single texts or whole batches with bounded concurrency, then save or play the audio.
//!
//! ## Overview
//!
//! The synthesis transport itself sits behind the [`tts::Synthesizer`] trait. The
//! library's own logic lives in two places:
//!
//! - **SSML composer/validator**: [`ssml::SsmlBuilder`] produces well-formed markup,
//!   [`ssml::SsmlValidator`] reports every structural or attribute-domain problem.
//! - **Batch synthesizer**: [`batch::BatchSynthesizer`] keeps at most `K` calls in
//!   flight and returns results in input order, or one error naming the failing unit.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edge_tts_client::{TtsClient, TtsConfig};
//!
//! #[tokio::main]
//! async fn main() -> edge_tts_client::Result<()> {
//!     let client = TtsClient::new(TtsConfig::default())?;
//!
//!     let audio = client.synthesize_text("Hello, world!", None, false).await?;
//!     client.save_audio(&audio, client.output_path("hello")).await?;
//!
//!     let texts = vec!["One".to_string(), "Two".to_string(), "Three".to_string()];
//!     let clips = client.batch_synthesize_concurrent(&texts, None, false, Some(2)).await?;
//!     client.batch_save_audio(&clips, "output/clip_{}.mp3").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`ssml`] | SSML builder, validator and templates |
//! | [`batch`] | Bounded-concurrency batch synthesis with ordered reassembly |
//! | [`tts`] | Synthesizer trait and its HTTP, command-line and retrying implementations |
//! | [`voice`] | Voice model, catalogs and filters |
//! | [`audio`] | Saving audio files and local playback |
//! | [`config`] | Configuration, presets and file loading |
//! | [`client`] | [`TtsClient`] facade and builder |
//! | [`utils`] | File-name helpers |

pub mod audio;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod ssml;
pub mod tts;
pub mod utils;
pub mod voice;

pub use client::{TtsClient, TtsClientBuilder};
pub use config::TtsConfig;
pub use error::{Diagnostic, Error, ErrorContext};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::audio::{save_audio, AudioPlayer};
    pub use crate::batch::{BatchStrategy, BatchSynthesizer, SynthesisResult, SynthesisUnit};
    pub use crate::config::{ConfigManager, TtsConfig};
    pub use crate::ssml::{SsmlBuilder, SsmlTemplate, SsmlValidator};
    pub use crate::tts::{AudioFormat, Synthesizer};
    pub use crate::voice::{Voice, VoiceCatalog};
    pub use crate::{Error, Result, TtsClient};
}
