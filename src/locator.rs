//! Semantic locator: turns a SID plus an optional content target into a concrete position in
//! the current document text.
//!
//! Section-level lookups return a line range or an insertion point derived from the parsed
//! section boundaries. Content-level lookups search the section after its heading (subsections
//! included), optionally narrowed to a window following a context anchor.

use crate::config::{Config, DEFAULT_ANCHOR_WINDOW};
use crate::document::Document;
use crate::edit_plan::{FailureDetail, InsertionPosition};
use crate::error::EditError;
use crate::section::Section;
use crate::sid::validate_sid;
use crate::text::{
    find_all_ignore_case, find_ignore_case, normalize_for_match, LineRange, Position, TextSpan,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Knobs for content search.
pub struct LocatorOptions {
    /// Lines after an anchor line (inclusive of the anchor line itself) searched for a target.
    pub anchor_window: usize,
    /// Fail with [`EditError::AmbiguousTarget`] rather than taking the first of several matches.
    pub strict: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            anchor_window: DEFAULT_ANCHOR_WINDOW,
            strict: false,
        }
    }
}

impl From<&Config> for LocatorOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            anchor_window: cfg.anchor_window,
            strict: cfg.strict_matching,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Section-level positions a caller can ask for.
pub enum SectionOperation {
    /// The whole section, heading through end line.
    Replace,
    /// Directly above the heading.
    Before,
    /// At the next same-or-higher-level heading, or after the section's last line.
    After,
    /// After the last content line of the section's own body.
    Append,
    /// Directly after the heading.
    Prepend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A resolved position in the document.
pub enum Location {
    /// Whole lines.
    Range(LineRange),
    /// Character-precise text.
    Span(TextSpan),
    /// Insert before this 1-based line; one past the last line appends.
    Insertion(usize),
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Where a resolved section sits in the document outline.
pub struct LocationContext {
    /// Title of the resolved section.
    pub section_title: String,
    /// Title of its parent section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_title: Option<String>,
    /// Title of the preceding sibling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_sibling: Option<String>,
    /// Title of the following sibling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_sibling: Option<String>,
    /// Titles from the outermost ancestor down to the section.
    pub breadcrumb: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Successful lookup.
pub struct Located {
    /// The concrete position.
    pub location: Location,
    /// Arena index of the section the lookup resolved to.
    pub section_index: usize,
    /// Outline context of that section.
    pub context: LocationContext,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Lookup request for probing a target without editing.
///
/// `targetContent` takes precedence over `afterContent`, which takes precedence over
/// `beforeContent`; with none of them the section-level `operation` is resolved.
pub struct LocateRequest {
    /// Section identifier.
    pub sid: String,
    /// Section-level position, `replace` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<SectionOperation>,
    /// Text to find inside the section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_content: Option<String>,
    /// Line to find; the result is the point just after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_content: Option<String>,
    /// Line to find; the result is the point just before it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_content: Option<String>,
    /// Text that narrows content searches to the window after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_anchor: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Serialisable outcome of a lookup.
pub struct LocationResult {
    /// Whether the target was resolved.
    pub found: bool,
    /// Line range, for whole-section lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<LineRange>,
    /// Text span, for content lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TextSpan>,
    /// Line before which new content would go.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion_point: Option<usize>,
    /// Outline context of the resolved section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<LocationContext>,
    /// Why the lookup failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureDetail>,
}

impl From<Result<Located, EditError>> for LocationResult {
    fn from(result: Result<Located, EditError>) -> Self {
        match result {
            Ok(located) => {
                let mut out = Self {
                    found: true,
                    context: Some(located.context),
                    ..Self::default()
                };
                match located.location {
                    Location::Range(range) => out.range = Some(range),
                    Location::Span(span) => out.span = Some(span),
                    Location::Insertion(line) => out.insertion_point = Some(line),
                }
                out
            }
            Err(error) => Self {
                found: false,
                error: Some(FailureDetail::from(&error)),
                ..Self::default()
            },
        }
    }
}

/// Reject a SID that does not satisfy the identifier grammar.
///
/// # Errors
///
/// Returns [`EditError::InvalidSid`] with the validator's explanation and suggestions.
pub fn check_sid(sid: &str) -> Result<(), EditError> {
    let validation = validate_sid(sid);
    if validation.is_valid {
        return Ok(());
    }
    Err(EditError::InvalidSid {
        sid: sid.to_string(),
        message: validation.error.unwrap_or_default(),
        suggestions: validation.suggestions,
    })
}

/// Lines a content search runs over, with the document line number of the first one.
struct Scope<'s> {
    first_line: usize,
    lines: Vec<&'s str>,
}

impl Scope<'_> {
    fn last_line(&self) -> usize {
        self.first_line + self.lines.len() - 1
    }

    /// Document position of a byte offset into the lines joined with `\n`.
    fn position(&self, offset: usize) -> Position {
        let mut line_start = 0;
        for (idx, line) in self.lines.iter().enumerate() {
            let line_end = line_start + line.len();
            if offset <= line_end {
                return Position {
                    line: self.first_line + idx,
                    column: offset - line_start,
                };
            }
            line_start = line_end + 1;
        }
        let last = self.lines.last().map_or(0, |line| line.len());
        Position {
            line: self.last_line(),
            column: last,
        }
    }
}

/// Resolves targets against one parsed document snapshot.
pub struct Locator<'a> {
    document: &'a Document,
    options: LocatorOptions,
}

impl<'a> Locator<'a> {
    #[must_use]
    /// Locator with default options.
    pub fn new(document: &'a Document) -> Self {
        Self::with_options(document, LocatorOptions::default())
    }

    #[must_use]
    /// Locator with explicit options.
    pub fn with_options(document: &'a Document, options: LocatorOptions) -> Self {
        Self { document, options }
    }

    /// Arena index of the section named by `sid`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidSid`] for malformed SIDs, checked before any lookup, and
    /// [`EditError::SectionNotFound`] when no section carries the SID.
    pub fn resolve(&self, sid: &str) -> Result<usize, EditError> {
        check_sid(sid)?;
        self.document
            .section_index(sid)
            .ok_or_else(|| EditError::SectionNotFound {
                sid: sid.to_string(),
            })
    }

    /// Section-level position for `operation`.
    ///
    /// # Errors
    ///
    /// Fails when the SID is malformed or names no section.
    pub fn locate_section(
        &self,
        sid: &str,
        operation: SectionOperation,
    ) -> Result<Located, EditError> {
        let index = self.resolve(sid)?;
        let section = self.section(index);
        let location = match operation {
            SectionOperation::Replace => Location::Range(section.range()),
            SectionOperation::Before => Location::Insertion(section.line_start),
            SectionOperation::After => Location::Insertion(
                self.document
                    .next_boundary(index)
                    .map_or(section.line_end + 1, |next| self.section(next).line_start),
            ),
            SectionOperation::Append => Location::Insertion(append_point(section)),
            SectionOperation::Prepend => Location::Insertion(section.heading_end + 1),
        };
        Ok(self.located(location, index))
    }

    /// Span of `target` inside the section, optionally narrowed by `anchor`.
    ///
    /// Matching is case-insensitive and may cross line boundaries.
    ///
    /// # Errors
    ///
    /// Fails with [`EditError::MalformedIntent`] for an empty target,
    /// [`EditError::ContentNotFound`] when the anchor or the target is missing, and
    /// [`EditError::AmbiguousTarget`] in strict mode when the target occurs more than once.
    pub fn locate_content(
        &self,
        sid: &str,
        target: &str,
        anchor: Option<&str>,
    ) -> Result<Located, EditError> {
        let normalized = target.replace("\r\n", "\n");
        // Lines are searched without terminators, so a final newline cannot match.
        let target = normalized.strip_suffix('\n').unwrap_or(&normalized);
        if target.is_empty() {
            return Err(EditError::malformed("target content must not be empty"));
        }
        let index = self.resolve(sid)?;
        let scope = self.search_scope(index, sid, anchor)?;
        let what = format!("content {target:?}");

        let haystack = scope.lines.join("\n");
        let matches = find_all_ignore_case(&haystack, target);
        let (start, end) = self.pick(sid, &what, &matches)?;
        let span = TextSpan {
            start: scope.position(start),
            end: scope.position(end),
        };
        Ok(self.located(Location::Span(span), index))
    }

    /// Insertion point next to the first line whose normalised text contains `line`.
    ///
    /// # Errors
    ///
    /// Fails with [`EditError::MalformedIntent`] when `line` has no matchable text,
    /// [`EditError::ContentNotFound`] when the anchor or the line is missing, and
    /// [`EditError::AmbiguousTarget`] in strict mode when several lines match.
    pub fn locate_relative(
        &self,
        sid: &str,
        line: &str,
        side: InsertionPosition,
        anchor: Option<&str>,
    ) -> Result<Located, EditError> {
        let needle = normalize_for_match(line);
        if needle.is_empty() {
            return Err(EditError::malformed(format!(
                "{line:?} has no text to match against"
            )));
        }
        let index = self.resolve(sid)?;
        let scope = self.search_scope(index, sid, anchor)?;
        let what = format!("line {line:?}");

        let matches: Vec<usize> = scope
            .lines
            .iter()
            .enumerate()
            .filter(|(_, text)| normalize_for_match(text).contains(&needle))
            .map(|(idx, _)| scope.first_line + idx)
            .collect();
        let found = self.pick(sid, &what, &matches)?;
        let point = match side {
            InsertionPosition::Before => found,
            InsertionPosition::After => found + 1,
        };
        Ok(self.located(Location::Insertion(point), index))
    }

    /// Index of the section and the lines of its own body, if it has any.
    ///
    /// # Errors
    ///
    /// Fails when the SID is malformed or names no section.
    pub fn own_body(&self, sid: &str) -> Result<(usize, Option<LineRange>), EditError> {
        let index = self.resolve(sid)?;
        Ok((index, self.section(index).own_body()))
    }

    #[must_use]
    /// Resolve a lookup request into its serialisable result.
    pub fn probe(&self, request: &LocateRequest) -> LocationResult {
        let sid = request.sid.as_str();
        let anchor = request.context_anchor.as_deref();
        let result = if let Some(target) = &request.target_content {
            self.locate_content(sid, target, anchor)
        } else if let Some(line) = &request.after_content {
            self.locate_relative(sid, line, InsertionPosition::After, anchor)
        } else if let Some(line) = &request.before_content {
            self.locate_relative(sid, line, InsertionPosition::Before, anchor)
        } else {
            self.locate_section(sid, request.operation.unwrap_or(SectionOperation::Replace))
        };
        LocationResult::from(result)
    }

    #[must_use]
    /// Outline context of the section at `index`.
    pub fn context(&self, index: usize) -> LocationContext {
        let section = self.section(index);
        let siblings = self.document.siblings(index);
        let position = siblings.iter().position(|&idx| idx == index);
        let title_at = |idx: usize| self.section(idx).title.clone();

        LocationContext {
            section_title: section.title.clone(),
            parent_title: section.parent_index.map(title_at),
            previous_sibling: position
                .and_then(|pos| pos.checked_sub(1))
                .map(|pos| title_at(siblings[pos])),
            next_sibling: position
                .and_then(|pos| siblings.get(pos + 1))
                .map(|&idx| title_at(idx)),
            breadcrumb: self
                .document
                .breadcrumb(index)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    fn section(&self, index: usize) -> &'a Section {
        &self.document.sections()[index]
    }

    fn located(&self, location: Location, index: usize) -> Located {
        Located {
            location,
            section_index: index,
            context: self.context(index),
        }
    }

    /// Lines after the heading through the section end, narrowed to the anchor window.
    fn search_scope(
        &self,
        index: usize,
        sid: &str,
        anchor: Option<&str>,
    ) -> Result<Scope<'a>, EditError> {
        let section = self.section(index);
        let body_offset = section.heading_end + 1 - section.line_start;
        let lines: Vec<&'a str> = section.content.split('\n').skip(body_offset).collect();
        if lines.is_empty() {
            return Err(EditError::ContentNotFound {
                sid: sid.to_string(),
                what: "any content".to_string(),
            });
        }
        let scope = Scope {
            first_line: section.heading_end + 1,
            lines,
        };
        let Some(anchor) = anchor else {
            return Ok(scope);
        };

        let anchor_idx = scope
            .lines
            .iter()
            .position(|line| find_ignore_case(line, anchor).is_some())
            .ok_or_else(|| EditError::ContentNotFound {
                sid: sid.to_string(),
                what: format!("context anchor {anchor:?}"),
            })?;
        let window_end = anchor_idx
            .saturating_add(self.options.anchor_window)
            .saturating_add(1)
            .min(scope.lines.len());
        tracing::trace!(
            sid,
            anchor,
            line = scope.first_line + anchor_idx,
            "narrowed search to anchor window"
        );
        Ok(Scope {
            first_line: scope.first_line + anchor_idx,
            lines: scope.lines[anchor_idx..window_end].to_vec(),
        })
    }

    /// First match, or an error when there is none or strict mode sees several.
    fn pick<T: Copy>(&self, sid: &str, what: &str, matches: &[T]) -> Result<T, EditError> {
        match matches {
            [] => Err(EditError::ContentNotFound {
                sid: sid.to_string(),
                what: what.to_string(),
            }),
            [only] => Ok(*only),
            [first, ..] if !self.options.strict => {
                tracing::debug!(
                    sid,
                    what,
                    matches = matches.len(),
                    "taking first of several matches"
                );
                Ok(*first)
            }
            _ => Err(EditError::AmbiguousTarget {
                sid: sid.to_string(),
                what: what.to_string(),
                matches: matches.len(),
            }),
        }
    }
}

/// Line just after the last non-blank line of the own body, or just after the heading.
fn append_point(section: &Section) -> usize {
    let Some(body) = section.own_body() else {
        return section.heading_end + 1;
    };
    let body_offset = body.start - section.line_start;
    section
        .content
        .split('\n')
        .skip(body_offset)
        .take(body.line_count())
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .last()
        .map_or(section.heading_end + 1, |(idx, _)| body.start + idx + 1)
}

#[cfg(test)]
#[path = "tests/locator.rs"]
mod tests;
