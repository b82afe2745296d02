//! Title sanitisation and SID assignment with deterministic collision suffixes.

use super::SEGMENT_CHARS;
use crate::text::strip_leading_markup;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::OnceLock;

const MAX_SLUG_CHARS: usize = 80;
const FALLBACK_HASH_BYTES: usize = 4;

fn disallowed_run() -> &'static Regex {
    static DISALLOWED_RUN: OnceLock<Regex> = OnceLock::new();
    DISALLOWED_RUN.get_or_init(|| {
        Regex::new(&format!("[^{SEGMENT_CHARS}]+")).expect("valid disallowed-run regex")
    })
}

fn emoji() -> &'static Regex {
    static EMOJI: OnceLock<Regex> = OnceLock::new();
    EMOJI.get_or_init(|| {
        Regex::new(
            r"[\p{Extended_Pictographic}\p{Variation_Selector}\x{200D}\x{20E3}\x{E0020}-\x{E007F}]",
        )
        .expect("valid emoji regex")
    })
}

fn markdown_link() -> &'static Regex {
    static MARKDOWN_LINK: OnceLock<Regex> = OnceLock::new();
    MARKDOWN_LINK
        .get_or_init(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid markdown link regex"))
}

/// Whitelist-only slug for a title, or `None` when nothing survives sanitisation.
pub(crate) fn sanitize(title: &str) -> Option<String> {
    let lowered = title.trim().to_lowercase();
    let unmarked = strip_leading_markup(&lowered);
    let unlinked = markdown_link().replace_all(&unmarked, "$1");
    let without_emoji = emoji().replace_all(&unlinked, "");
    let hyphenated = disallowed_run().replace_all(&without_emoji, "-");
    let slug = truncate(hyphenated.trim_matches('-'));
    (!slug.is_empty()).then_some(slug)
}

fn truncate(slug: &str) -> String {
    if slug.chars().count() <= MAX_SLUG_CHARS {
        return slug.to_string();
    }
    let cut: String = slug.chars().take(MAX_SLUG_CHARS).collect();
    cut.trim_end_matches('-').to_string()
}

fn fallback_slug(title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    digest
        .iter()
        .take(FALLBACK_HASH_BYTES)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[must_use]
/// Map a heading title to a non-empty slug made only of whitelisted characters.
///
/// Titles with no usable characters at all (`@@@`, a lone emoji) fall back to a short hex
/// digest of the original title.
pub fn slugify(title: &str) -> String {
    sanitize(title).unwrap_or_else(|| fallback_slug(title))
}

#[must_use]
/// Append a slug to a parent SID, or start a new path at the root.
pub fn compose(parent: Option<&str>, slug: &str) -> String {
    format!("{}/{slug}", parent.unwrap_or_default())
}

#[derive(Debug, Default)]
/// Hands out document-unique SIDs in document order.
///
/// The first section to claim a path keeps it; later sections with the same path get `-2`,
/// `-3`, ... appended to their slug, skipping any candidate already taken.
pub struct SidGenerator {
    used: HashSet<String>,
}

impl SidGenerator {
    #[must_use]
    /// Generator with no SIDs claimed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a SID for a section titled `title` under `parent`.
    pub fn assign(&mut self, parent: Option<&str>, title: &str) -> String {
        let slug = slugify(title);
        let mut sid = compose(parent, &slug);
        let mut counter = 2usize;
        while self.used.contains(&sid) {
            sid = compose(parent, &format!("{slug}-{counter}"));
            counter += 1;
        }
        self.used.insert(sid.clone());
        sid
    }

    #[must_use]
    /// Whether `sid` has already been handed out.
    pub fn is_claimed(&self, sid: &str) -> bool {
        self.used.contains(sid)
    }
}

#[cfg(test)]
#[path = "../tests/generator.rs"]
mod tests;
