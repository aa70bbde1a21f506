//! Synthesis through the `edge-tts` command line tool.

use super::synthesizer::Synthesizer;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// One way of starting the `edge-tts` tool: a program plus the arguments that precede ours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub program: String,
    pub prefix_args: Vec<String>,
}

impl Launcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn describe(&self) -> String {
        if self.prefix_args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.prefix_args.join(" "))
        }
    }
}

/// Launchers tried in order: the installed script, then the Python module.
pub fn default_launchers() -> Vec<Launcher> {
    vec![
        Launcher::new("edge-tts"),
        Launcher::new("python3").with_args(["-m", "edge_tts"]),
        Launcher::new("python").with_args(["-m", "edge_tts"]),
    ]
}

/// edge-tts always writes MP3.
const OUTPUT_EXTENSION: &str = "mp3";

/// Synthesizer that shells out to `edge-tts --write-media` and reads the produced file back.
///
/// Launchers form an explicit fallback chain. When every launcher fails, the returned
/// error lists each attempt so the first real failure is never masked by a later one.
pub struct CommandSynthesizer {
    launchers: Vec<Launcher>,
}

impl CommandSynthesizer {
    pub fn new() -> Self {
        Self {
            launchers: default_launchers(),
        }
    }

    pub fn with_launchers(mut self, launchers: Vec<Launcher>) -> Self {
        self.launchers = launchers;
        self
    }

    pub fn launchers(&self) -> &[Launcher] {
        &self.launchers
    }

    async fn run(&self, launcher: &Launcher, text: &str, voice: &str, out: &str) -> Result<()> {
        let output = Command::new(&launcher.program)
            .args(&launcher.prefix_args)
            .args(["--voice", voice, "--text", text, "--write-media", out])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::backend(format!("failed to launch: {}", e)))?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::backend(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )))
        }
    }
}

impl Default for CommandSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Synthesizer for CommandSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        // Removed on drop on every exit path; explicit close below only adds logging.
        let temp = tempfile::Builder::new()
            .prefix("tts_output_")
            .suffix(&format!(".{}", OUTPUT_EXTENSION))
            .tempfile()?
            .into_temp_path();
        let out = temp.to_string_lossy().into_owned();

        let mut failures = Vec::new();
        let mut produced = false;
        for launcher in &self.launchers {
            match self.run(launcher, text, voice, &out).await {
                Ok(()) => {
                    tracing::debug!(launcher = %launcher.describe(), "edge-tts succeeded");
                    produced = true;
                    break;
                }
                Err(e) => {
                    tracing::debug!(launcher = %launcher.describe(), error = %e, "edge-tts launcher failed, trying next");
                    failures.push(format!("{}: {}", launcher.describe(), e));
                }
            }
        }

        let result = if produced {
            match tokio::fs::read(&temp).await {
                Ok(audio) if audio.is_empty() => Err(Error::backend_with_context(
                    "No audio data generated",
                    ErrorContext::new().with_source("command_synthesizer"),
                )),
                Ok(audio) => Ok(audio),
                Err(e) => Err(Error::backend_with_context(
                    format!("Failed to read audio file: {}", e),
                    ErrorContext::new().with_source("command_synthesizer"),
                )),
            }
        } else if failures.is_empty() {
            Err(Error::configuration("No edge-tts launchers configured"))
        } else {
            Err(Error::backend_with_context(
                format!("all edge-tts launchers failed: {}", failures.join("; ")),
                ErrorContext::new().with_source("command_synthesizer"),
            ))
        };

        if let Err(e) = temp.close() {
            tracing::warn!(path = %out, error = %e, "failed to remove temporary audio file");
        }
        result
    }

    fn name(&self) -> &'static str {
        "edge-tts-command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_launcher_order() {
        let synth = CommandSynthesizer::new();
        let names: Vec<String> = synth.launchers().iter().map(|l| l.describe()).collect();
        assert_eq!(
            names,
            vec!["edge-tts", "python3 -m edge_tts", "python -m edge_tts"]
        );
    }

    #[tokio::test]
    async fn test_all_launchers_failing_reports_every_attempt() {
        let synth = CommandSynthesizer::new().with_launchers(vec![
            Launcher::new("definitely-not-a-real-tts-binary-1"),
            Launcher::new("definitely-not-a-real-tts-binary-2"),
        ]);
        let err = synth.synthesize("hello", "en-US-AriaNeural").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("definitely-not-a-real-tts-binary-1"), "{}", msg);
        assert!(msg.contains("definitely-not-a-real-tts-binary-2"), "{}", msg);
    }

    #[tokio::test]
    async fn test_no_launchers_is_a_configuration_error() {
        let synth = CommandSynthesizer::new().with_launchers(Vec::new());
        let err = synth.synthesize("hello", "en-US-AriaNeural").await.unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_falls_back_to_next_launcher() {
        // $6 is the --write-media path.
        let writer = Launcher::new("sh").with_args(["-c", "printf 'ID3fake' > \"$6\"", "sh"]);
        let synth = CommandSynthesizer::new()
            .with_launchers(vec![Launcher::new("definitely-not-a-real-tts-binary"), writer]);
        let audio = synth.synthesize("hello", "en-US-AriaNeural").await.unwrap();
        assert_eq!(audio, b"ID3fake");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_media_path_has_mp3_extension() {
        let writer = Launcher::new("sh").with_args([
            "-c",
            "case \"$6\" in *.mp3) printf ID3 > \"$6\";; esac",
            "sh",
        ]);
        let synth = CommandSynthesizer::new().with_launchers(vec![writer]);
        let audio = synth.synthesize("hello", "en-US-AriaNeural").await.unwrap();
        assert_eq!(audio, b"ID3");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_output_is_an_error() {
        let silent = Launcher::new("sh").with_args(["-c", "true", "sh"]);
        let synth = CommandSynthesizer::new().with_launchers(vec![silent]);
        let err = synth.synthesize("hello", "en-US-AriaNeural").await.unwrap_err();
        assert!(err.to_string().contains("No audio data generated"));
    }
}
