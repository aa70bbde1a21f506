//! 批量合成模块：有界并发地合成多段文本，并按输入顺序返回结果。
//!
//! # Batch Synthesis Module
//!
//! Converts a sequence of text/SSML units into audio with at most `K` synthesis
//! calls in flight, then reassembles the results in submission order.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`SynthesisUnit`] | A text plus its original index |
//! | [`SynthesisResult`] | Audio bytes tagged with the unit index |
//! | [`BatchSynthesizer`] | Fail-fast executor over an injected [`Synthesizer`](crate::tts::Synthesizer) |
//! | [`BatchStrategy`] | Sequential or bounded-concurrent dispatch |
//!
//! ## Example
//!
//! ```rust,no_run
//! use edge_tts_client::batch::BatchSynthesizer;
//! use edge_tts_client::tts::CommandSynthesizer;
//!
//! # async fn run() -> edge_tts_client::Result<()> {
//! let batch = BatchSynthesizer::new(CommandSynthesizer::new(), "en-US-AriaNeural")
//!     .with_max_concurrency(3);
//! let audio = batch.synthesize_texts(["one", "two", "three"]).await?;
//! assert_eq!(audio.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure policy
//!
//! The batch is all-or-nothing: an invalid unit (when SSML checking is on) or a
//! failed synthesis call returns one error carrying that unit's index. Callers that
//! want best-effort behavior loop over units themselves.

mod executor;
mod unit;

pub use executor::{BatchStrategy, BatchSynthesizer};
pub use unit::{SynthesisResult, SynthesisUnit};
