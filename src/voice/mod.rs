//! 语音目录模块：获取、缓存与筛选可用的合成语音。

mod catalog;
mod model;

pub use catalog::{CachedVoiceCatalog, HttpVoiceCatalog, VoiceCatalog, DEFAULT_VOICES_URL};
pub use model::{
    filter_by_gender, filter_by_language, find_voice_by_name, languages, locales, Voice,
};
