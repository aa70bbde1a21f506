//! SSML 模块：构建并校验语音合成标记语言（SSML）文档。
//!
//! # SSML Composition and Validation
//!
//! This module builds Speech Synthesis Markup Language documents from structured
//! inputs and checks serialized markup before it is submitted for synthesis.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`SsmlBuilder`] | Incremental composer: text, prosody, emphasis, breaks, say-as, phonemes, substitutions |
//! | [`SsmlValidator`] | Well-formedness and attribute-domain checks returning all [`Diagnostic`](crate::error::Diagnostic)s |
//! | [`SsmlTemplate`] | Predefined speaking styles (whisper, excited, calm, ...) |
//!
//! ## Example
//!
//! ```rust
//! use edge_tts_client::ssml::{SsmlBuilder, SsmlValidator};
//!
//! let ssml = SsmlBuilder::new("en-US-AriaNeural")
//!     .add_prosody("Take it slow.", Some("slow"), None, None)
//!     .add_break("1s")
//!     .build();
//! assert!(SsmlValidator::validate(&ssml).is_empty());
//! ```

mod builder;
mod templates;
mod validator;

pub use builder::{
    create_break_ssml, create_emphasis_ssml, create_prosody_ssml, language_from_voice, Fragment,
    SsmlBuilder, DEFAULT_BREAK_TIME, DEFAULT_EMPHASIS_LEVEL, DEFAULT_LANGUAGE, SSML_NAMESPACE,
    SSML_VERSION,
};
pub use templates::{create_ssml_from_template, SsmlTemplate};
pub use validator::{validate_ssml, SsmlValidator};
