//! SSML composer.

use quick_xml::escape::escape;
use std::fmt::Write;

/// Namespace carried by the `<speak>` root element.
pub const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";
/// Schema version carried by the `<speak>` root element.
pub const SSML_VERSION: &str = "1.0";
/// Language used when it cannot be derived from the voice id.
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_EMPHASIS_LEVEL: &str = "moderate";
pub const DEFAULT_BREAK_TIME: &str = "1s";

/// One piece of markup content, stored exactly as it was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Prosody {
        text: String,
        rate: Option<String>,
        pitch: Option<String>,
        volume: Option<String>,
    },
    Emphasis {
        text: String,
        level: String,
    },
    Break {
        time: String,
    },
    SayAs {
        text: String,
        interpret_as: String,
        format: Option<String>,
    },
    Phoneme {
        text: String,
        alphabet: String,
        ph: String,
    },
    Substitution {
        text: String,
        alias: String,
    },
}

impl Fragment {
    fn write_to(&self, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = match self {
            Fragment::Text(text) => write!(out, "{}", escape(text.as_str())),
            Fragment::Prosody {
                text,
                rate,
                pitch,
                volume,
            } => {
                out.push_str("<prosody");
                for (name, value) in [("rate", rate), ("pitch", pitch), ("volume", volume)] {
                    if let Some(v) = value {
                        let _ = write!(out, " {}=\"{}\"", name, escape(v.as_str()));
                    }
                }
                write!(out, ">{}</prosody>", escape(text.as_str()))
            }
            Fragment::Emphasis { text, level } => write!(
                out,
                "<emphasis level=\"{}\">{}</emphasis>",
                escape(level.as_str()),
                escape(text.as_str())
            ),
            Fragment::Break { time } => write!(out, "<break time=\"{}\"/>", escape(time.as_str())),
            Fragment::SayAs {
                text,
                interpret_as,
                format,
            } => {
                let _ = write!(out, "<say-as interpret-as=\"{}\"", escape(interpret_as.as_str()));
                if let Some(f) = format {
                    let _ = write!(out, " format=\"{}\"", escape(f.as_str()));
                }
                write!(out, ">{}</say-as>", escape(text.as_str()))
            }
            Fragment::Phoneme { text, alphabet, ph } => write!(
                out,
                "<phoneme alphabet=\"{}\" ph=\"{}\">{}</phoneme>",
                escape(alphabet.as_str()),
                escape(ph.as_str()),
                escape(text.as_str())
            ),
            Fragment::Substitution { text, alias } => write!(
                out,
                "<sub alias=\"{}\">{}</sub>",
                escape(alias.as_str()),
                escape(text.as_str())
            ),
        };
    }
}

/// Incremental builder for an SSML document targeting one voice.
///
/// Fragments are not validated when appended; run the output of [`SsmlBuilder::build`]
/// through [`crate::ssml::SsmlValidator`] before submitting it.
///
/// ```rust
/// use edge_tts_client::ssml::SsmlBuilder;
///
/// let ssml = SsmlBuilder::new("en-US-AriaNeural")
///     .add_text("Hello")
///     .add_break("500ms")
///     .add_emphasis("world", "strong")
///     .build();
/// assert!(ssml.contains(r#"xml:lang="en-US""#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsmlBuilder {
    voice: String,
    language: String,
    fragments: Vec<Fragment>,
}

impl SsmlBuilder {
    /// Create a builder whose language is derived from the voice id
    /// (`en-US-AriaNeural` -> `en-US`).
    pub fn new(voice: impl Into<String>) -> Self {
        let voice = voice.into();
        let language = language_from_voice(&voice);
        Self {
            voice,
            language,
            fragments: Vec::new(),
        }
    }

    pub fn with_language(voice: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            language: language.into(),
            fragments: Vec::new(),
        }
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    fn push(mut self, fragment: Fragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    pub fn add_text(self, text: impl Into<String>) -> Self {
        self.push(Fragment::Text(text.into()))
    }

    /// Wrap text in `<prosody>`; only the given attributes are emitted.
    pub fn add_prosody(
        self,
        text: impl Into<String>,
        rate: Option<&str>,
        pitch: Option<&str>,
        volume: Option<&str>,
    ) -> Self {
        self.push(Fragment::Prosody {
            text: text.into(),
            rate: rate.map(str::to_string),
            pitch: pitch.map(str::to_string),
            volume: volume.map(str::to_string),
        })
    }

    pub fn add_emphasis(self, text: impl Into<String>, level: impl Into<String>) -> Self {
        self.push(Fragment::Emphasis {
            text: text.into(),
            level: level.into(),
        })
    }

    pub fn add_break(self, time: impl Into<String>) -> Self {
        self.push(Fragment::Break { time: time.into() })
    }

    pub fn add_say_as(
        self,
        text: impl Into<String>,
        interpret_as: impl Into<String>,
        format: Option<&str>,
    ) -> Self {
        self.push(Fragment::SayAs {
            text: text.into(),
            interpret_as: interpret_as.into(),
            format: format.map(str::to_string),
        })
    }

    pub fn add_phoneme(
        self,
        text: impl Into<String>,
        alphabet: impl Into<String>,
        ph: impl Into<String>,
    ) -> Self {
        self.push(Fragment::Phoneme {
            text: text.into(),
            alphabet: alphabet.into(),
            ph: ph.into(),
        })
    }

    pub fn add_substitution(self, text: impl Into<String>, alias: impl Into<String>) -> Self {
        self.push(Fragment::Substitution {
            text: text.into(),
            alias: alias.into(),
        })
    }

    /// Serialize all fragments, in append order, inside `<speak><voice>`.
    pub fn build(&self) -> String {
        let mut content = String::new();
        for fragment in &self.fragments {
            fragment.write_to(&mut content);
        }
        format!(
            r#"<speak version="{}" xmlns="{}" xml:lang="{}">
    <voice name="{}">
        {}
    </voice>
</speak>"#,
            SSML_VERSION,
            SSML_NAMESPACE,
            escape(self.language.as_str()),
            escape(self.voice.as_str()),
            content
        )
    }
}

/// Derive a language tag from the first two hyphen-delimited segments of a voice id.
pub fn language_from_voice(voice: &str) -> String {
    let mut parts = voice.split('-');
    match (parts.next(), parts.next()) {
        (Some(lang), Some(region)) => format!("{}-{}", lang, region),
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}

/// SSML wrapping the whole text in one `<prosody>` element.
pub fn create_prosody_ssml(
    text: &str,
    voice: &str,
    rate: Option<&str>,
    pitch: Option<&str>,
    volume: Option<&str>,
) -> String {
    SsmlBuilder::new(voice)
        .add_prosody(text, rate, pitch, volume)
        .build()
}

pub fn create_emphasis_ssml(text: &str, voice: &str, level: &str) -> String {
    SsmlBuilder::new(voice).add_emphasis(text, level).build()
}

/// SSML with a `<break>` between consecutive text parts.
pub fn create_break_ssml(text_parts: &[&str], voice: &str, break_time: &str) -> String {
    let mut builder = SsmlBuilder::new(voice);
    for (i, part) in text_parts.iter().enumerate() {
        if i > 0 {
            builder = builder.add_break(break_time);
        }
        builder = builder.add_text(*part);
    }
    builder.build()
}
