//! Audio playback through locally installed command-line players.

use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// One way of playing an audio file to completion.
#[async_trait]
pub trait PlaybackBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn play(&self, path: &Path) -> Result<()>;
}

/// Backend that runs `program [args..] <file>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
}

impl CommandBackend {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_available(&self) -> bool {
        find_in_path(&self.program).is_some()
    }
}

#[async_trait]
impl PlaybackBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.program
    }

    async fn play(&self, path: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::playback(format!("failed to launch: {}", e)))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::playback(format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// Candidate players in priority order for the current platform.
pub fn default_backends() -> Vec<CommandBackend> {
    let mut backends = Vec::new();
    if cfg!(target_os = "macos") {
        backends.push(CommandBackend::new("afplay", Vec::<String>::new()));
    }
    backends.push(CommandBackend::new(
        "ffplay",
        ["-nodisp", "-autoexit", "-loglevel", "error"],
    ));
    backends.push(CommandBackend::new("mpv", ["--no-video", "--really-quiet"]));
    backends.push(CommandBackend::new("mpg123", ["-q"]));
    if cfg!(target_os = "linux") {
        backends.push(CommandBackend::new("paplay", Vec::<String>::new()));
        backends.push(CommandBackend::new("aplay", ["-q"]));
    }
    backends
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .flat_map(|dir| {
            let plain = dir.join(program);
            let exe = dir.join(format!("{}.exe", program));
            [plain, exe]
        })
        .find(|candidate| candidate.is_file())
}

/// Plays files with the first backend that succeeds.
///
/// Backends are tried in order; a failure moves on to the next one. If all of them
/// fail, the error lists every backend's failure.
pub struct AudioPlayer {
    backends: Vec<Box<dyn PlaybackBackend>>,
}

impl AudioPlayer {
    /// Detect installed players, putting `preferred` first when it is available.
    pub fn detect(preferred: Option<&str>) -> Result<Self> {
        let mut available: Vec<CommandBackend> = default_backends()
            .into_iter()
            .filter(CommandBackend::is_available)
            .collect();
        if let Some(name) = preferred {
            if let Some(pos) = available.iter().position(|b| b.program == name) {
                let backend = available.remove(pos);
                available.insert(0, backend);
            } else {
                tracing::warn!(backend = name, "preferred audio backend not available");
            }
        }
        let backends: Vec<Box<dyn PlaybackBackend>> = available
            .into_iter()
            .map(|b| Box::new(b) as Box<dyn PlaybackBackend>)
            .collect();
        Self::with_backends(backends)
    }

    pub fn with_backends(backends: Vec<Box<dyn PlaybackBackend>>) -> Result<Self> {
        if backends.is_empty() {
            return Err(Error::playback(
                "No audio backends available. Install ffplay, mpv or mpg123.",
            ));
        }
        Ok(Self { backends })
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub async fn play_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::playback(format!(
                "Audio file not found: {}",
                path.display()
            )));
        }
        let mut failures = Vec::new();
        for backend in &self.backends {
            match backend.play(path).await {
                Ok(()) => {
                    tracing::debug!(backend = backend.name(), path = %path.display(), "playback completed");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name(), error = %e, "playback failed, trying next backend");
                    failures.push(format!("{}: {}", backend.name(), e));
                }
            }
        }
        Err(Error::playback(format!(
            "all backends failed: {}",
            failures.join("; ")
        )))
    }
}
