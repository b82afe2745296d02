//! Markdown format implementation using tree-sitter-md.
//!
//! This module provides the tree-sitter query for parsing markdown documents and extracting
//! section structure from both ATX-style (`#` syntax) and setext-style (underlined) headings.

use crate::formats::Format;
use crate::text::{collapse_whitespace, strip_closing_hashes};

/// Tree-sitter heading rules for markdown documents.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        "[(atx_heading) (setext_heading)] @heading"
    }

    fn heading_level(&self, heading: &tree_sitter::Node) -> Option<usize> {
        // Headings nested in block quotes or list items are body content. Every heading sits in
        // its own `section` node, so the container can be any ancestor.
        let mut ancestor = heading.parent();
        while let Some(node) = ancestor {
            if matches!(node.kind(), "block_quote" | "list_item") {
                return None;
            }
            ancestor = node.parent();
        }

        let mut cursor = heading.walk();
        let level = heading
            .children(&mut cursor)
            .find_map(|child| match child.kind() {
                "atx_h1_marker" | "setext_h1_underline" => Some(1),
                "atx_h2_marker" | "setext_h2_underline" => Some(2),
                "atx_h3_marker" => Some(3),
                "atx_h4_marker" => Some(4),
                "atx_h5_marker" => Some(5),
                "atx_h6_marker" => Some(6),
                _ => None,
            });
        level
    }

    fn heading_title(&self, heading: &tree_sitter::Node, source: &[u8]) -> String {
        let mut cursor = heading.walk();
        let content = heading
            .children(&mut cursor)
            .find(|child| matches!(child.kind(), "inline" | "paragraph"));

        let Some(content) = content else {
            return String::new();
        };
        let raw = content.utf8_text(source).unwrap_or_default();

        if heading.kind() == "atx_heading" {
            strip_closing_hashes(raw.trim()).to_string()
        } else {
            collapse_whitespace(raw)
        }
    }
}
