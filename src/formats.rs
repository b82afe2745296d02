//! Format trait and implementations for different document types.
//!
//! This module defines the `Format` trait which abstracts over heading syntax by providing
//! a tree-sitter grammar, a query that captures heading nodes, and the rules for reading a
//! heading's level and title off a captured node.

pub mod markdown;

/// Heading extraction rules for one tree-sitter grammar.
pub trait Format {
    /// Grammar used to parse documents of this format.
    fn language(&self) -> tree_sitter::Language;

    /// Query whose `@heading` captures are candidate section headings.
    fn heading_query(&self) -> &str;

    /// Level (1 = outermost) of a captured heading, or `None` if the node is not a
    /// document-level heading and should be treated as plain content.
    fn heading_level(&self, heading: &tree_sitter::Node) -> Option<usize>;

    /// Heading text without markup symbols.
    fn heading_title(&self, heading: &tree_sitter::Node, source: &[u8]) -> String;
}
