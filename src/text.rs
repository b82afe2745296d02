//! Line-addressed text buffer and the string matching used to find content inside sections.
//!
//! All line numbers here are 1-based and ranges inclusive. Columns are byte offsets within a
//! line, the same convention tree-sitter uses for its points.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Inclusive range of 1-based line numbers.
pub struct LineRange {
    /// First line of the range.
    pub start: usize,
    /// Last line of the range (inclusive).
    pub end: usize,
}

impl LineRange {
    #[must_use]
    /// Range covering `start..=end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    /// Number of lines covered; zero when `end < start`.
    pub fn line_count(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    #[must_use]
    /// Whether `line` falls inside the range.
    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// A point in the document: 1-based line and byte column within that line.
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// Byte offset from the start of the line.
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Character-precise span of text, end exclusive; may cross line boundaries.
pub struct TextSpan {
    /// First byte of the span.
    pub start: Position,
    /// Byte just past the span.
    pub end: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Document text held as lines, remembering how each one was terminated.
pub struct LineBuffer {
    lines: Vec<String>,
    /// Per line: terminated by `\r\n` rather than `\n`.
    crlf: Vec<bool>,
    trailing_newline: bool,
}

impl LineBuffer {
    #[must_use]
    /// Split text into lines, noting each line ending and the final newline.
    ///
    /// An unterminated last line takes the ending of the line before it, in case an edit later
    /// needs to terminate it.
    pub fn from_text(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut crlf = Vec::new();
        for segment in text.split_inclusive('\n') {
            if let Some(line) = segment.strip_suffix('\n') {
                let (line, ends_crlf) = line
                    .strip_suffix('\r')
                    .map_or((line, false), |line| (line, true));
                lines.push(line.to_string());
                crlf.push(ends_crlf);
            } else {
                lines.push(segment.to_string());
                crlf.push(crlf.last().copied().unwrap_or(false));
            }
        }
        Self {
            lines,
            crlf,
            trailing_newline: text.ends_with('\n'),
        }
    }

    #[must_use]
    /// Join the lines back into text, each with its own line ending.
    pub fn to_text(&self) -> String {
        let last = self.lines.len().saturating_sub(1);
        let mut out = String::new();
        for (idx, (line, &crlf)) in self.lines.iter().zip(&self.crlf).enumerate() {
            out.push_str(line);
            if idx < last || self.trailing_newline {
                out.push_str(if crlf { "\r\n" } else { "\n" });
            }
        }
        out
    }

    #[must_use]
    /// Number of lines in the buffer.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    /// Whether the buffer holds no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    /// All lines, without line terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    /// The text of a 1-based line.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    #[must_use]
    /// Lines covered by `range`, clipped to the buffer.
    pub fn slice(&self, range: LineRange) -> &[String] {
        let (start, end) = self.bounds(range);
        &self.lines[start..end]
    }

    /// Replace the lines in `range` with `replacement`.
    ///
    /// New lines take the ending of the first replaced line, or of their neighbours when the
    /// range is empty.
    pub fn splice(&mut self, range: LineRange, replacement: Vec<String>) {
        let (start, end) = self.bounds(range);
        let crlf = if start < end {
            self.crlf[start]
        } else {
            self.ending_near(start)
        };
        let endings = vec![crlf; replacement.len()];
        self.lines.splice(start..end, replacement);
        self.crlf.splice(start..end, endings);
    }

    /// Insert `insertion` before 1-based line `before`; `len() + 1` appends.
    pub fn insert(&mut self, before: usize, insertion: Vec<String>) {
        let idx = before.saturating_sub(1).min(self.lines.len());
        let endings = vec![self.ending_near(idx); insertion.len()];
        self.lines.splice(idx..idx, insertion);
        self.crlf.splice(idx..idx, endings);
    }

    /// Replace the text covered by `span`.
    ///
    /// When the rewritten lines end up blank and the replacement is empty, the lines are
    /// dropped altogether rather than left behind as empty lines.
    pub fn replace_span(&mut self, span: TextSpan, replacement: &str) {
        let range = LineRange::new(span.start.line, span.end.line);
        let first = self.line(span.start.line).unwrap_or_default();
        let last = self.line(span.end.line).unwrap_or_default();
        let prefix = first.get(..span.start.column).unwrap_or(first);
        let suffix = last.get(span.end.column..).unwrap_or_default();
        let rewritten = format!("{prefix}{replacement}{suffix}");

        let new_lines = if replacement.is_empty() && rewritten.trim().is_empty() {
            Vec::new()
        } else {
            rewritten.split('\n').map(str::to_string).collect()
        };
        self.splice(range, new_lines);
    }

    /// Ending for a line inserted at 0-based `idx`: the line above, else the line below.
    fn ending_near(&self, idx: usize) -> bool {
        idx.checked_sub(1)
            .and_then(|above| self.crlf.get(above))
            .or_else(|| self.crlf.get(idx))
            .copied()
            .unwrap_or(false)
    }

    fn bounds(&self, range: LineRange) -> (usize, usize) {
        let start = range.start.saturating_sub(1).min(self.lines.len());
        let end = range.end.min(self.lines.len()).max(start);
        (start, end)
    }
}

/// Split intent content into lines, ignoring a single trailing newline.
///
/// Empty content yields no lines.
pub(crate) fn content_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    let body = content.strip_suffix('\n').unwrap_or(content);
    let body = body.strip_suffix('\r').unwrap_or(body);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// End offset of a case-insensitive match of `needle` starting at byte `start`.
fn match_at(haystack: &str, start: usize, needle: &str) -> Option<usize> {
    let mut hay = haystack[start..].char_indices();
    let mut end = start;
    for n in needle.chars() {
        let (offset, h) = hay.next()?;
        if !chars_eq_ignore_case(h, n) {
            return None;
        }
        end = start + offset + h.len_utf8();
    }
    Some(end)
}

/// Byte range of the first case-insensitive occurrence of `needle`.
pub(crate) fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .char_indices()
        .find_map(|(i, _)| match_at(haystack, i, needle).map(|end| (i, end)))
}

/// Byte ranges of every non-overlapping case-insensitive occurrence of `needle`.
pub(crate) fn find_all_ignore_case(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    let mut matches = Vec::new();
    if needle.is_empty() {
        return matches;
    }
    let mut resume = 0;
    for (i, _) in haystack.char_indices() {
        if i < resume {
            continue;
        }
        if let Some(end) = match_at(haystack, i, needle) {
            matches.push((i, end));
            resume = end;
        }
    }
    matches
}

fn leading_markup() -> &'static Regex {
    static LEADING_MARKUP: OnceLock<Regex> = OnceLock::new();
    LEADING_MARKUP.get_or_init(|| {
        Regex::new(r"^\s*(?:>\s*)*(?:#{1,6}(?:\s+|$)|[-*+]\s+(?:\[[ xX]\]\s+)?|\d+[.)]\s+)?")
            .expect("valid leading markup regex")
    })
}

/// Drop heading markers, list bullets, task boxes and quote prefixes from the start of a line.
pub(crate) fn strip_leading_markup(line: &str) -> Cow<'_, str> {
    leading_markup().replace(line, "")
}

/// Lowercased, markup-free, punctuation-free form of a line used for fuzzy line matching.
pub(crate) fn normalize_for_match(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: Vec<Cow<'_, str>> = lowered.lines().map(strip_leading_markup).collect();
    let cleaned: String = stripped
        .join(" ")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse internal whitespace runs to single spaces and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove an ATX closing sequence (`## Title ##` becomes `## Title`).
///
/// The run of `#` only counts as a closing sequence when preceded by whitespace, so titles
/// such as `C#` survive.
pub(crate) fn strip_closing_hashes(text: &str) -> &str {
    let trimmed = text.trim_end();
    let without = trimmed.trim_end_matches('#');
    if without.len() == trimmed.len() {
        return trimmed;
    }
    if without.is_empty() {
        return "";
    }
    if without.ends_with(char::is_whitespace) {
        without.trim_end()
    } else {
        trimmed
    }
}

/// Last line (1-based) of a front-matter block opening on line 1, if any.
pub(crate) fn frontmatter_end(lines: &[String]) -> Option<usize> {
    let delimiter = lines.first()?.trim_end();
    if delimiter != "---" && delimiter != "+++" {
        return None;
    }
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| {
            let line = line.trim_end();
            line == delimiter || (delimiter == "---" && line == "...")
        })
        .map(|(idx, _)| idx + 1)
}

#[cfg(test)]
#[path = "tests/text.rs"]
mod tests;
