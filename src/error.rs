use std::fmt;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.batch_size")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_loader", "command_synthesizer")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A single human-readable SSML validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Unified error type for the client, the batch core and the collaborators behind it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("SSML validation failed{}: {}", format_index(.index), join_diagnostics(.diagnostics))]
    MarkupValidation {
        index: Option<usize>,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("Failed to synthesize batch item {index}: {message}")]
    Synthesis { index: usize, message: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Synthesis backend error: {message}{}", format_context(.context))]
    Backend {
        message: String,
        context: ErrorContext,
    },

    #[error("Remote error: HTTP {status}: {message}")]
    Remote {
        status: u16,
        message: String,
        retryable: bool,
    },

    #[error("Network error: {message}{}", format_context(.context))]
    Network {
        message: String,
        context: ErrorContext,
    },

    #[error("Synthesis timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("Audio playback error: {message}")]
    Playback { message: String },

    #[error("Unknown template '{name}'. Available: {available}")]
    UnknownTemplate { name: String, available: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn format_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" for batch item {}", i),
        None => String::new(),
    }
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a configuration error naming the offending field.
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::backend_with_context(msg, ErrorContext::new())
    }

    pub fn backend_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Backend {
            message: msg.into(),
            context,
        }
    }

    pub fn network_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Network {
            message: msg.into(),
            context,
        }
    }

    pub fn playback(msg: impl Into<String>) -> Self {
        Error::Playback {
            message: msg.into(),
        }
    }

    /// Build a remote error, classifying request timeouts, throttling and server faults as retryable.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Error::Remote {
            status,
            message: message.into(),
            retryable: status == 408 || status == 429 || (500..600).contains(&status),
        }
    }

    /// Whether a synthesis attempt that failed with this error may succeed when repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Remote { retryable, .. } => *retryable,
            Error::Network { .. } | Error::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Original batch index carried by the error, if any.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            Error::Synthesis { index, .. } => Some(*index),
            Error::MarkupValidation { index, .. } => *index,
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Backend { context, .. }
            | Error::Network { context, .. } => Some(context),
            _ => None,
        }
    }
}
