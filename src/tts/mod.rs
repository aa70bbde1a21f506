//! TTS（文字转语音）模块：合成能力接口及其 HTTP / 命令行实现。
//!
//! # Synthesis Capability
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Synthesizer`] | Async seam: one text/SSML unit in, audio bytes out |
//! | [`HttpSynthesizer`] | JSON speech endpoint over HTTP |
//! | [`CommandSynthesizer`] | `edge-tts` command line with launcher fallback |
//! | [`RetryingSynthesizer`] | Per-attempt timeout and bounded retries around any synthesizer |

mod command;
mod http;
mod retry;
mod synthesizer;
mod types;

pub use command::{default_launchers, CommandSynthesizer, Launcher};
pub use http::{HttpSynthesizer, HttpSynthesizerBuilder, DEFAULT_API_KEY_ENV};
pub use retry::{RetryConfig, RetryingSynthesizer};
pub use synthesizer::Synthesizer;
pub use types::AudioFormat;
