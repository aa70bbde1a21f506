//! Writing synthesized audio to disk.

use crate::Result;
use std::path::{Path, PathBuf};

/// Write audio bytes to `path`, creating missing parent directories.
pub async fn save_audio(audio: &[u8], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, audio).await?;
    tracing::debug!(path = %path.display(), bytes = audio.len(), "saved audio");
    Ok(())
}

/// Save each item under `template` with `{}` replaced by its 1-based position.
///
/// Stops at the first failing item; files already written are left in place.
pub async fn batch_save_audio(audio_list: &[Vec<u8>], template: &str) -> Result<Vec<PathBuf>> {
    let mut saved = Vec::with_capacity(audio_list.len());
    for (i, audio) in audio_list.iter().enumerate() {
        let path = PathBuf::from(template.replace("{}", &(i + 1).to_string()));
        if let Err(e) = save_audio(audio, &path).await {
            tracing::error!("Failed to save batch item {}: {}", i + 1, e);
            return Err(e);
        }
        tracing::info!("Saved batch item {}: {}", i + 1, path.display());
        saved.push(path);
    }
    Ok(saved)
}
