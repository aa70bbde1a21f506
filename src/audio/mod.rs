//! 音频模块：保存合成音频，并通过本地播放器回放。

mod output;
mod player;

pub use output::{batch_save_audio, save_audio};
pub use player::{default_backends, AudioPlayer, CommandBackend, PlaybackBackend};
