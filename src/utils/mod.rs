//! Utility modules

pub mod filename;

pub use filename::{preview, safe_filename};
