//! 配置模块：TTS 客户端配置、预设与配置文件加载。
//!
//! # Configuration
//!
//! [`TtsConfig`] holds every client option. It can be defaulted, taken from a named
//! preset, or loaded from a JSON/YAML file; numeric bounds are checked at load time.
//!
//! ```rust
//! use edge_tts_client::config::TtsConfig;
//!
//! let config = TtsConfig::preset("batch_processing")?;
//! assert_eq!(config.max_concurrent, 8);
//! # Ok::<(), edge_tts_client::Error>(())
//! ```

mod manager;

pub use manager::{ConfigManager, DEFAULT_CONFIG_PATHS};

use crate::tts::{AudioFormat, DEFAULT_API_KEY_ENV};
use crate::voice::DEFAULT_VOICES_URL;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PRESET_NAMES: &[&str] = &[
    "default",
    "fast",
    "slow",
    "high_quality",
    "batch_processing",
    "whisper",
    "excited",
];

/// Client configuration. Missing keys take their defaults and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub default_voice: String,
    pub output_format: AudioFormat,
    pub output_directory: PathBuf,
    pub auto_play: bool,
    pub cache_voices: bool,
    pub max_retries: u32,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    pub rate: String,
    pub pitch: String,
    pub volume: String,
    pub ssml: bool,
    pub batch_size: usize,
    pub max_concurrent: usize,
    /// HTTP synthesis endpoint; when unset the `edge-tts` command line is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub api_key_env: String,
    pub voices_url: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            default_voice: "en-US-AriaNeural".to_string(),
            output_format: AudioFormat::Mp3,
            output_directory: PathBuf::from("./output"),
            auto_play: true,
            cache_voices: true,
            max_retries: 3,
            timeout_ms: 30_000,
            rate: "0%".to_string(),
            pitch: "+0Hz".to_string(),
            volume: "+0dB".to_string(),
            ssml: false,
            batch_size: 5,
            max_concurrent: 3,
            endpoint: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            voices_url: DEFAULT_VOICES_URL.to_string(),
        }
    }
}

fn invalid(field: &str, msg: impl Into<String>) -> Error {
    Error::configuration_with_context(msg, ErrorContext::new().with_field_path(field))
}

impl TtsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check declared bounds; the first violation is reported with its field name.
    pub fn validate(&self) -> Result<()> {
        if self.default_voice.trim().is_empty() {
            return Err(invalid("default_voice", "default_voice cannot be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "timeout_ms must be positive"));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "batch_size must be positive"));
        }
        if self.max_concurrent == 0 {
            return Err(invalid("max_concurrent", "max_concurrent must be positive"));
        }
        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint)
                .map_err(|e| invalid("endpoint", format!("invalid endpoint URL: {}", e)))?;
        }
        url::Url::parse(&self.voices_url)
            .map_err(|e| invalid("voices_url", format!("invalid voices URL: {}", e)))?;
        Ok(())
    }

    /// Named preset configuration; see [`PRESET_NAMES`].
    pub fn preset(name: &str) -> Result<Self> {
        let base = Self::default();
        let config = match name {
            "default" => base,
            "fast" => Self {
                rate: "+20%".to_string(),
                max_concurrent: 5,
                batch_size: 10,
                ..base
            },
            "slow" => Self {
                rate: "-20%".to_string(),
                max_concurrent: 2,
                batch_size: 3,
                ..base
            },
            "high_quality" => Self {
                output_format: AudioFormat::Wav,
                cache_voices: true,
                max_retries: 5,
                ..base
            },
            "batch_processing" => Self {
                max_concurrent: 8,
                batch_size: 20,
                cache_voices: true,
                ..base
            },
            "whisper" => Self {
                rate: "-10%".to_string(),
                volume: "x-soft".to_string(),
                pitch: "-2st".to_string(),
                ..base
            },
            "excited" => Self {
                rate: "+15%".to_string(),
                pitch: "+2st".to_string(),
                volume: "+3dB".to_string(),
                ..base
            },
            other => {
                return Err(invalid(
                    "preset",
                    format!(
                        "Unknown preset '{}'. Available: {}",
                        other,
                        PRESET_NAMES.join(", ")
                    ),
                ))
            }
        };
        Ok(config)
    }

    pub fn preset_names() -> &'static [&'static str] {
        PRESET_NAMES
    }

    /// Load from `.json`, `.yaml` or `.yml` and validate.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            invalid(
                "path",
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;
        let config = Self::from_str_with_format(&content, format).map_err(|e| match e {
            Error::Configuration { .. } => e,
            other => invalid(
                "path",
                format!("Invalid config file {}: {}", path.display(), other),
            ),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn from_str_with_format(content: &str, format: FileFormat) -> Result<Self> {
        let config: TtsConfig = match format {
            FileFormat::Json => serde_json::from_str(content)?,
            // An empty YAML document means "all defaults".
            FileFormat::Yaml if content.trim().is_empty() => TtsConfig::default(),
            FileFormat::Yaml => serde_yaml::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON or YAML depending on the extension, creating parent directories.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = match FileFormat::from_path(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Yaml => serde_yaml::to_string(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `TTS_DEFAULT_VOICE`, `TTS_MAX_CONCURRENT` and `TTS_OUTPUT_DIR`, then re-validate.
    ///
    /// Unparseable numbers are ignored.
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(voice) = std::env::var("TTS_DEFAULT_VOICE") {
            if !voice.trim().is_empty() {
                self.default_voice = voice;
            }
        }
        if let Some(n) = std::env::var("TTS_MAX_CONCURRENT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            self.max_concurrent = n;
        }
        if let Ok(dir) = std::env::var("TTS_OUTPUT_DIR") {
            if !dir.is_empty() {
                self.output_directory = PathBuf::from(dir);
            }
        }
        self.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(invalid(
                "path",
                format!("Unsupported configuration file format: '{}'", ext),
            )),
        }
    }
}
