//! Document parsing: heading extraction, section ranges and SID assignment.
//!
//! Every parse starts from raw text and recomputes the whole section arena, so identical text
//! always yields identical SIDs. Nothing is cached between parses.

use crate::error::ParseError;
use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use crate::section::Section;
use crate::sid::SidGenerator;
use crate::text::{frontmatter_end, LineBuffer, LineRange};
use serde::Serialize;
use std::collections::HashMap;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One node of the table of contents handed to callers for SID discovery.
pub struct TocEntry {
    /// Identifier to use in edit intents.
    pub sid: String,
    /// Heading text.
    pub title: String,
    /// Heading level.
    pub level: usize,
    /// Directly nested sections, in document order.
    pub children: Vec<TocEntry>,
}

struct Heading {
    level: usize,
    title: String,
    line: usize,
    heading_end: usize,
}

#[derive(Clone, Debug)]
/// A parsed document: its sections in source order plus a SID lookup table.
pub struct Document {
    sections: Vec<Section>,
    by_sid: HashMap<String, usize>,
    line_count: usize,
}

impl Document {
    /// Parse markdown text into sections with SIDs attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or no syntax tree is produced.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_with(text, &MarkdownFormat)
    }

    /// Parse text using the heading rules of `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded, the heading query is invalid, or
    /// no syntax tree is produced.
    pub fn parse_with(text: &str, format: &impl Format) -> Result<Self, ParseError> {
        let buffer = LineBuffer::from_text(text);
        let headings = extract_headings(text, format, frontmatter_end(buffer.lines()))?;
        let sections = build_sections(&buffer, &headings);
        let by_sid = sections
            .iter()
            .enumerate()
            .map(|(idx, section)| (section.sid.clone(), idx))
            .collect();

        tracing::trace!(sections = sections.len(), lines = buffer.len(), "parsed document");
        Ok(Self {
            sections,
            by_sid,
            line_count: buffer.len(),
        })
    }

    #[must_use]
    /// All sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    /// Number of lines in the parsed text.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    #[must_use]
    /// Section at an arena index.
    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    #[must_use]
    /// Arena index of the section with this exact SID.
    pub fn section_index(&self, sid: &str) -> Option<usize> {
        self.by_sid.get(sid).copied()
    }

    #[must_use]
    /// Section with this exact SID.
    pub fn section(&self, sid: &str) -> Option<&Section> {
        self.section_index(sid).map(|idx| &self.sections[idx])
    }

    #[must_use]
    /// Titles from the outermost ancestor down to the section itself.
    pub fn breadcrumb(&self, index: usize) -> Vec<&str> {
        let mut titles = Vec::new();
        let mut current = self.sections.get(index);
        while let Some(section) = current {
            titles.push(section.title.as_str());
            current = section.parent_index.map(|parent| &self.sections[parent]);
        }
        titles.reverse();
        titles
    }

    /// Indices of top-level sections.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, section)| section.parent_index.is_none())
            .map(|(idx, _)| idx)
    }

    #[must_use]
    /// Indices of the sections sharing a parent with `index`, itself included.
    pub fn siblings(&self, index: usize) -> Vec<usize> {
        match self.sections.get(index).and_then(|s| s.parent_index) {
            Some(parent) => self.sections[parent].children_indices.clone(),
            None => self.roots().collect(),
        }
    }

    #[must_use]
    /// First later section whose level is the same as or higher than this one's.
    pub fn next_boundary(&self, index: usize) -> Option<usize> {
        let level = self.sections.get(index)?.level;
        self.sections
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, section)| section.level <= level)
            .map(|(idx, _)| idx)
    }

    #[must_use]
    /// Nested table of contents.
    pub fn toc(&self) -> Vec<TocEntry> {
        self.roots().map(|idx| self.toc_entry(idx)).collect()
    }

    /// Table of contents as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_toc_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.toc())
    }

    // Nesting is bounded by the six heading levels, so this recursion is shallow.
    fn toc_entry(&self, index: usize) -> TocEntry {
        let section = &self.sections[index];
        TocEntry {
            sid: section.sid.clone(),
            title: section.title.clone(),
            level: section.level,
            children: section
                .children_indices
                .iter()
                .map(|&child| self.toc_entry(child))
                .collect(),
        }
    }
}

fn extract_headings(
    text: &str,
    format: &impl Format,
    frontmatter: Option<usize>,
) -> Result<Vec<Heading>, ParseError> {
    let language = format.language();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParseError::Language(e.to_string()))?;
    let tree = parser.parse(text, None).ok_or(ParseError::NoTree)?;
    let query = Query::new(&language, format.heading_query())
        .map_err(|e| ParseError::Query(e.to_string()))?;

    let source = text.as_bytes();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source);
    let mut headings = Vec::new();

    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            let Some(level) = format.heading_level(&node) else {
                continue;
            };
            let start = node.start_position();
            let line = start.row + 1;
            if frontmatter.is_some_and(|end| line <= end) {
                continue;
            }
            // Heading nodes usually swallow their newline, ending at column 0 of the next row.
            let end = node.end_position();
            let last_row = if end.column == 0 && end.row > start.row {
                end.row - 1
            } else {
                end.row
            };
            headings.push(Heading {
                level,
                title: format.heading_title(&node, source),
                line,
                heading_end: last_row + 1,
            });
        }
    }

    headings.sort_by_key(|heading| heading.line);
    headings.dedup_by_key(|heading| heading.line);
    Ok(headings)
}

fn build_sections(buffer: &LineBuffer, headings: &[Heading]) -> Vec<Section> {
    let last_line = buffer.len();
    let mut sections: Vec<Section> = Vec::with_capacity(headings.len());
    let mut generator = SidGenerator::new();
    // Open ancestors, innermost last. Depth never exceeds the six heading levels.
    let mut open: Vec<usize> = Vec::new();

    for (idx, heading) in headings.iter().enumerate() {
        while open
            .last()
            .is_some_and(|&ancestor| sections[ancestor].level >= heading.level)
        {
            open.pop();
        }
        let parent_index = open.last().copied();
        let parent_sid = parent_index.map(|parent| sections[parent].sid.clone());
        let sid = generator.assign(parent_sid.as_deref(), &heading.title);

        let line_end = headings[idx + 1..]
            .iter()
            .find(|next| next.level <= heading.level)
            .map_or(last_line, |next| next.line - 1)
            .max(heading.heading_end);
        let body_end = headings
            .get(idx + 1)
            .filter(|next| next.line <= line_end)
            .map_or(line_end, |next| next.line - 1);
        let content = buffer
            .slice(LineRange::new(heading.line, line_end))
            .join("\n");

        if let Some(parent) = parent_index {
            sections[parent].children_indices.push(idx);
        }
        sections.push(Section {
            sid,
            title: heading.title.clone(),
            level: heading.level,
            line_start: heading.line,
            heading_end: heading.heading_end,
            line_end,
            body_end,
            content,
            parent_sid,
            parent_index,
            children_indices: Vec::new(),
        });
        open.push(idx);
    }

    sections
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
