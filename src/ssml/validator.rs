//! SSML structural and attribute-domain validation.

use super::builder::{SSML_NAMESPACE, SSML_VERSION};
use crate::error::Diagnostic;
use crate::{Error, Result};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const VALID_PROSODY_RATES: &[&str] = &["x-slow", "slow", "medium", "fast", "x-fast"];
const VALID_PROSODY_PITCHES: &[&str] = &["x-low", "low", "medium", "high", "x-high"];
const VALID_PROSODY_VOLUMES: &[&str] = &["silent", "x-soft", "soft", "medium", "loud", "x-loud"];
const VALID_EMPHASIS_LEVELS: &[&str] = &["strong", "moderate", "reduced"];
const VALID_BREAK_STRENGTHS: &[&str] = &["none", "x-weak", "weak", "medium", "strong", "x-strong"];

/// Parsed element: local name, raw attribute names with unescaped values, child elements.
#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Validator for serialized SSML, independent of how the markup was produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct SsmlValidator;

impl SsmlValidator {
    /// Validate markup and return every diagnostic found; an empty list means valid.
    ///
    /// A parse failure produces exactly one diagnostic and skips the remaining checks.
    pub fn validate(ssml: &str) -> Vec<Diagnostic> {
        let root = match parse(ssml) {
            Ok(root) => root,
            Err(message) => return vec![Diagnostic::new(format!("XML parsing error: {}", message))],
        };

        let mut diagnostics = Vec::new();

        if root.name != "speak" {
            diagnostics.push(Diagnostic::new(format!(
                "Root element must be <speak>, found <{}>",
                root.name
            )));
        }
        match root.attr("version") {
            None => diagnostics.push(Diagnostic::new("Missing version attribute in <speak> element")),
            Some(v) if v != SSML_VERSION => diagnostics.push(Diagnostic::new(format!(
                "Unsupported SSML version: {}",
                v
            ))),
            Some(_) => {}
        }
        match root.attr("xmlns") {
            None => diagnostics.push(Diagnostic::new("Missing xmlns attribute in <speak> element")),
            Some(ns) if ns != SSML_NAMESPACE => diagnostics.push(Diagnostic::new(format!(
                "Invalid xmlns namespace: {}",
                ns
            ))),
            Some(_) => {}
        }

        validate_element(&root, &mut diagnostics);
        diagnostics
    }

    pub fn is_valid(ssml: &str) -> bool {
        Self::validate(ssml).is_empty()
    }
}

/// Validate markup, turning a non-empty diagnostic set into [`Error::MarkupValidation`].
pub fn validate_ssml(ssml: &str) -> Result<()> {
    let diagnostics = SsmlValidator::validate(ssml);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(Error::MarkupValidation {
            index: None,
            diagnostics,
        })
    }
}

fn validate_element(element: &Element, diagnostics: &mut Vec<Diagnostic>) {
    match element.name.as_str() {
        "prosody" => validate_prosody(element, diagnostics),
        "emphasis" => {
            if let Some(level) = element.attr("level") {
                if !VALID_EMPHASIS_LEVELS.contains(&level) {
                    diagnostics.push(Diagnostic::new(format!("Invalid emphasis level: {}", level)));
                }
            }
        }
        "break" => {
            if let Some(time) = element.attr("time") {
                if !(time.ends_with("ms") || time.ends_with('s')) {
                    diagnostics.push(Diagnostic::new(format!("Invalid break time format: {}", time)));
                }
            }
            if let Some(strength) = element.attr("strength") {
                if !VALID_BREAK_STRENGTHS.contains(&strength) {
                    diagnostics.push(Diagnostic::new(format!(
                        "Invalid break strength: {}",
                        strength
                    )));
                }
            }
        }
        "say-as" => {
            if element.attr("interpret-as").is_none() {
                diagnostics.push(Diagnostic::new("say-as element missing interpret-as attribute"));
            }
        }
        _ => {}
    }

    for child in &element.children {
        validate_element(child, diagnostics);
    }
}

fn validate_prosody(element: &Element, diagnostics: &mut Vec<Diagnostic>) {
    if let Some(rate) = element.attr("rate") {
        if !(VALID_PROSODY_RATES.contains(&rate) || rate.ends_with('%') || rate.ends_with("Hz")) {
            diagnostics.push(Diagnostic::new(format!("Invalid prosody rate: {}", rate)));
        }
    }
    if let Some(pitch) = element.attr("pitch") {
        if !(VALID_PROSODY_PITCHES.contains(&pitch) || pitch.ends_with("Hz") || pitch.ends_with("st")) {
            diagnostics.push(Diagnostic::new(format!("Invalid prosody pitch: {}", pitch)));
        }
    }
    if let Some(volume) = element.attr("volume") {
        if !(VALID_PROSODY_VOLUMES.contains(&volume) || volume.ends_with("dB")) {
            diagnostics.push(Diagnostic::new(format!("Invalid prosody volume: {}", volume)));
        }
    }
}

fn open_element(start: &BytesStart<'_>) -> std::result::Result<Element, String> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = std::str::from_utf8(&attr.value).map_err(|e| e.to_string())?;
        let value = unescape(raw).map_err(|e| e.to_string())?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

const PREDEFINED_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "apos"];

/// Accept the predefined entities and well-formed character references; no DTD is read.
fn check_reference(name: &str) -> std::result::Result<(), String> {
    if PREDEFINED_ENTITIES.contains(&name) {
        return Ok(());
    }
    let Some(num) = name.strip_prefix('#') else {
        return Err(format!("undefined entity &{};", name));
    };
    let code = match num.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => num.parse::<u32>(),
    };
    match code.ok().and_then(char::from_u32) {
        Some(c) if c != '\0' => Ok(()),
        _ => Err(format!("invalid character reference &{};", name)),
    }
}

/// Parse a single-rooted document into an element tree.
fn parse(ssml: &str) -> std::result::Result<Element, String> {
    let mut reader = Reader::from_str(ssml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| format!("{} at position {}", e, position))?;
        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err("junk after document element".to_string());
                }
                stack.push(open_element(&start)?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err("junk after document element".to_string());
                }
                let element = open_element(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::End(end) => {
                let closed = stack
                    .pop()
                    .ok_or_else(|| format!("unexpected closing tag at position {}", position))?;
                let end_name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                if end_name != closed.name {
                    return Err(format!(
                        "mismatched tag: expected </{}>, found </{}>",
                        closed.name, end_name
                    ));
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(closed),
                    None => root = Some(closed),
                }
            }
            Event::Text(text) => {
                if stack.is_empty() && !text.iter().all(u8::is_ascii_whitespace) {
                    return Err("text outside of the document element".to_string());
                }
            }
            Event::CData(_) => {
                if stack.is_empty() {
                    return Err("text outside of the document element".to_string());
                }
            }
            Event::GeneralRef(reference) => {
                if stack.is_empty() {
                    return Err("text outside of the document element".to_string());
                }
                let name = String::from_utf8_lossy(&reference).into_owned();
                check_reference(&name).map_err(|e| format!("{} at position {}", e, position))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.name));
    }
    root.ok_or_else(|| "no element found".to_string())
}
