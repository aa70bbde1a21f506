//! Voice descriptors and filters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A synthesis voice as advertised by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Identifier passed to synthesis (e.g. `en-US-AriaNeural`).
    pub name: String,
    pub display_name: String,
    pub locale: String,
    pub gender: String,
}

impl Voice {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        locale: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            locale: locale.into(),
            gender: gender.into(),
        }
    }

    /// Language code from locale (e.g., `en` from `en-US`).
    pub fn language_code(&self) -> &str {
        self.locale.split('-').next().unwrap_or(&self.locale)
    }

    /// Country code from locale (e.g., `US` from `en-US`).
    pub fn country_code(&self) -> Option<&str> {
        self.locale.split('-').nth(1)
    }

    /// Matches either the full locale (`en-US`) or its language (`en`).
    pub fn matches_language(&self, language: &str) -> bool {
        self.locale == language || self.language_code() == language
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.display_name, self.locale, self.gender)
    }
}

pub fn filter_by_language(voices: &[Voice], language: &str) -> Vec<Voice> {
    voices
        .iter()
        .filter(|v| v.matches_language(language))
        .cloned()
        .collect()
}

pub fn filter_by_gender(voices: &[Voice], gender: &str) -> Vec<Voice> {
    voices
        .iter()
        .filter(|v| v.gender.eq_ignore_ascii_case(gender))
        .cloned()
        .collect()
}

pub fn find_voice_by_name<'a>(voices: &'a [Voice], name: &str) -> Option<&'a Voice> {
    voices.iter().find(|v| v.name == name)
}

/// Sorted, de-duplicated language codes.
pub fn languages(voices: &[Voice]) -> Vec<String> {
    voices
        .iter()
        .map(|v| v.language_code().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated locales.
pub fn locales(voices: &[Voice]) -> Vec<String> {
    voices
        .iter()
        .map(|v| v.locale.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Voice> {
        vec![
            Voice::new("en-US-AriaNeural", "Aria", "en-US", "Female"),
            Voice::new("en-GB-RyanNeural", "Ryan", "en-GB", "Male"),
            Voice::new("fr-FR-DeniseNeural", "Denise", "fr-FR", "Female"),
        ]
    }

    #[test]
    fn test_voice_codes() {
        let voice = &sample()[0];
        assert_eq!(voice.language_code(), "en");
        assert_eq!(voice.country_code(), Some("US"));
        assert!(voice.matches_language("en"));
        assert!(voice.matches_language("en-US"));
        assert!(!voice.matches_language("fr"));
        assert_eq!(voice.to_string(), "Aria (en-US, Female)");
    }

    #[test]
    fn test_filters() {
        let voices = sample();
        assert_eq!(filter_by_language(&voices, "en").len(), 2);
        assert_eq!(filter_by_language(&voices, "en-GB").len(), 1);
        assert_eq!(filter_by_gender(&voices, "female").len(), 2);
        assert_eq!(
            find_voice_by_name(&voices, "fr-FR-DeniseNeural").map(|v| v.display_name.as_str()),
            Some("Denise")
        );
        assert!(find_voice_by_name(&voices, "missing").is_none());
        assert_eq!(languages(&voices), vec!["en", "fr"]);
        assert_eq!(locales(&voices), vec!["en-GB", "en-US", "fr-FR"]);
    }
}
