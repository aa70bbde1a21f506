//! Batch units and results.

/// One text or SSML string together with its position in the submitted sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisUnit {
    index: usize,
    text: String,
}

impl SynthesisUnit {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Number a sequence of texts in submission order.
    pub fn from_texts<I, S>(texts: I) -> Vec<SynthesisUnit>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, t)| SynthesisUnit::new(i, t))
            .collect()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// First characters of the text, for progress logs.
    pub fn preview(&self) -> &str {
        crate::utils::preview(&self.text, 50)
    }
}

/// Audio produced for the unit with the same index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    pub index: usize,
    pub audio: Vec<u8>,
}

impl SynthesisResult {
    pub fn new(index: usize, audio: Vec<u8>) -> Self {
        Self { index, audio }
    }

    pub fn into_audio(self) -> Vec<u8> {
        self.audio
    }
}
