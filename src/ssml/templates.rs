//! Predefined SSML templates.

use super::builder::SsmlBuilder;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Named speaking styles that render a text into a complete SSML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsmlTemplate {
    SlowSpeech,
    FastSpeech,
    Whisper,
    Excited,
    Calm,
    EmphasisStrong,
    WithPauses,
}

impl SsmlTemplate {
    pub const ALL: [SsmlTemplate; 7] = [
        SsmlTemplate::SlowSpeech,
        SsmlTemplate::FastSpeech,
        SsmlTemplate::Whisper,
        SsmlTemplate::Excited,
        SsmlTemplate::Calm,
        SsmlTemplate::EmphasisStrong,
        SsmlTemplate::WithPauses,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SlowSpeech => "slow_speech",
            Self::FastSpeech => "fast_speech",
            Self::Whisper => "whisper",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::EmphasisStrong => "emphasis_strong",
            Self::WithPauses => "with_pauses",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.name()).collect()
    }

    pub fn render(&self, text: &str, voice: &str) -> String {
        let builder = SsmlBuilder::new(voice);
        let builder = match self {
            Self::SlowSpeech => builder.add_prosody(text, Some("slow"), None, None),
            Self::FastSpeech => builder.add_prosody(text, Some("fast"), None, None),
            Self::Whisper => builder.add_prosody(text, Some("slow"), None, Some("x-soft")),
            Self::Excited => builder.add_prosody(text, Some("fast"), Some("high"), Some("loud")),
            Self::Calm => builder.add_prosody(text, Some("slow"), Some("low"), Some("soft")),
            Self::EmphasisStrong => builder.add_emphasis(text, "strong"),
            // Pause once, after the first sentence.
            Self::WithPauses => match text.split_once('.') {
                Some((first, rest)) => builder.add_text(first).add_break("1s").add_text(rest),
                None => builder.add_text(text),
            },
        };
        builder.build()
    }
}

impl fmt::Display for SsmlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SsmlTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::UnknownTemplate {
                name: s.to_string(),
                available: Self::names().join(", "),
            })
    }
}

/// Render `text` with the template called `template_name`.
pub fn create_ssml_from_template(template_name: &str, text: &str, voice: &str) -> Result<String> {
    Ok(template_name.parse::<SsmlTemplate>()?.render(text, voice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssml::SsmlValidator;

    #[test]
    fn test_every_template_renders_valid_ssml() {
        for template in SsmlTemplate::ALL {
            let ssml = template.render("Hello there. How are you?", "en-US-AriaNeural");
            assert!(
                SsmlValidator::is_valid(&ssml),
                "{} rendered invalid SSML: {}",
                template,
                ssml
            );
        }
    }

    #[test]
    fn test_template_names_round_trip() {
        for name in SsmlTemplate::names() {
            assert_eq!(name.parse::<SsmlTemplate>().unwrap().name(), name);
        }
    }

    #[test]
    fn test_with_pauses_splits_first_sentence() {
        let ssml = SsmlTemplate::WithPauses.render("One. Two. Three", "en-US-AriaNeural");
        assert!(ssml.contains(r#"One<break time="1s"/> Two. Three"#), "{}", ssml);

        let ssml = SsmlTemplate::WithPauses.render("No pause here", "en-US-AriaNeural");
        assert!(!ssml.contains("<break"));
    }

    #[test]
    fn test_unknown_template() {
        let err = create_ssml_from_template("shouting", "hi", "en-US-AriaNeural").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unknown template 'shouting'"));
        assert!(msg.contains("with_pauses"));
    }
}
