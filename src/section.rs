//! Section representation for tree-sitter parsed documents.
//!
//! A section represents a hierarchical division of a document, corresponding to a heading in
//! markdown. Sections live in a flat arena ordered as in the source; the tree is expressed by
//! parent/child indices and the parent's SID, never by references between sections.

use crate::text::LineRange;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Hierarchical document division with line coordinates and its stable identifier.
pub struct Section {
    /// Stable hierarchical identifier, e.g. `/guide/install`.
    pub sid: String,
    /// Section heading text without markup symbols, before slug sanitisation.
    pub title: String,
    /// Nesting depth in the document hierarchy (1 for `#`).
    pub level: usize,
    /// Line holding the heading.
    pub line_start: usize,
    /// Last line of the heading itself (differs from `line_start` for setext headings).
    pub heading_end: usize,
    /// Last line before the next heading of the same or a higher level, or the last line.
    pub line_end: usize,
    /// Last line of this section's own body, before its first subsection.
    pub body_end: usize,
    /// Literal text of `line_start..=line_end`.
    pub content: String,
    /// SID of the containing section.
    pub parent_sid: Option<String>,
    /// Index of the containing section in the arena.
    pub parent_index: Option<usize>,
    /// Indices of directly nested subsections.
    pub children_indices: Vec<usize>,
}

impl Section {
    #[must_use]
    /// Heading line through the computed end line.
    pub fn range(&self) -> LineRange {
        LineRange::new(self.line_start, self.line_end)
    }

    #[must_use]
    /// Lines after the heading up to the first subsection; `None` when there are none.
    pub fn own_body(&self) -> Option<LineRange> {
        (self.heading_end < self.body_end)
            .then(|| LineRange::new(self.heading_end + 1, self.body_end))
    }

    #[must_use]
    /// Lines after the heading through the end of the section, subsections included.
    pub fn full_body(&self) -> Option<LineRange> {
        (self.heading_end < self.line_end)
            .then(|| LineRange::new(self.heading_end + 1, self.line_end))
    }
}
