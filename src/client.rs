//! High-level TTS client.
//!
//! [`TtsClient`] ties a configured [`Synthesizer`](crate::tts::Synthesizer), a
//! [`VoiceCatalog`](crate::voice::VoiceCatalog) and the SSML helpers together.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;

pub use builder::TtsClientBuilder;
pub use core::TtsClient;
