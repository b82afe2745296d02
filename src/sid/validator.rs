//! Acceptance grammar for SIDs supplied by callers.

use super::generator::sanitize;
use super::SEGMENT_CHARS;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn sid_grammar() -> &'static Regex {
    static SID_GRAMMAR: OnceLock<Regex> = OnceLock::new();
    SID_GRAMMAR.get_or_init(|| {
        Regex::new(&format!(
            "^(?:/[{SEGMENT_CHARS}]+(?:-[{SEGMENT_CHARS}]+)*)+$"
        ))
        .expect("valid sid grammar regex")
    })
}

fn segment_char() -> &'static Regex {
    static SEGMENT_CHAR: OnceLock<Regex> = OnceLock::new();
    SEGMENT_CHAR.get_or_init(|| {
        Regex::new(&format!("^[{SEGMENT_CHARS}]$")).expect("valid segment char regex")
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Outcome of checking a string against the SID grammar.
pub struct SidValidation {
    /// Whether the string is a well-formed SID.
    pub is_valid: bool,
    /// First problem found, when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Well-formed SIDs close to the input.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

#[must_use]
/// Whether `sid` satisfies the SID grammar.
pub fn is_valid_sid(sid: &str) -> bool {
    sid_grammar().is_match(sid)
}

#[must_use]
/// Check `sid` against the grammar, explaining the first violation and suggesting fixes.
pub fn validate_sid(sid: &str) -> SidValidation {
    if is_valid_sid(sid) {
        return SidValidation {
            is_valid: true,
            error: None,
            suggestions: Vec::new(),
        };
    }
    SidValidation {
        is_valid: false,
        error: Some(diagnose(sid)),
        suggestions: suggest(sid),
    }
}

fn is_segment_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    segment_char().is_match(c.encode_utf8(&mut buf))
}

fn diagnose(sid: &str) -> String {
    if sid.is_empty() {
        return "section id is empty".to_string();
    }
    let Some(path) = sid.strip_prefix('/') else {
        return "section id must start with '/'".to_string();
    };
    for (idx, segment) in path.split('/').enumerate() {
        if segment.is_empty() {
            return format!("segment {} is empty", idx + 1);
        }
        if let Some(c) = segment.chars().find(|c| c.is_uppercase()) {
            return format!("segment '{segment}' contains uppercase character '{c}'");
        }
        if segment.starts_with('-') || segment.ends_with('-') {
            return format!("segment '{segment}' starts or ends with a hyphen");
        }
        if segment.contains("--") {
            return format!("segment '{segment}' contains consecutive hyphens");
        }
        if let Some(c) = segment.chars().find(|&c| c != '-' && !is_segment_char(c)) {
            return format!("segment '{segment}' contains disallowed character '{c}'");
        }
    }
    "section id does not match the identifier grammar".to_string()
}

fn suggest(sid: &str) -> Vec<String> {
    let segments: Vec<String> = sid.split('/').filter_map(sanitize).collect();
    if segments.is_empty() {
        return Vec::new();
    }
    let candidate = format!("/{}", segments.join("/"));
    if candidate != sid && is_valid_sid(&candidate) {
        vec![candidate]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
#[path = "../tests/validator.rs"]
mod tests;
