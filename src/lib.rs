//! locus: stable section identifiers and semantic edits for markdown documents.
//!
//! Documents are parsed with tree-sitter into a flat arena of sections, each carrying a
//! hierarchical SID such as `/requirements/data-privacy`. Callers discover SIDs through the
//! table of contents, then submit batches of edit intents addressed by SID. Every intent is
//! re-resolved against the current text, so a batch behaves the same whatever order its
//! targets appear in the document.
//!
//! ```no_run
//! use locus::{EditIntent, Executor};
//!
//! let text = "# Notes\n\n## Todo\n\n- write docs\n";
//! let batch = Executor::new().execute(text, &[EditIntent::append("/notes/todo", "- ship")]);
//! assert!(batch.response.success);
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod document;
pub mod edit_plan;
pub mod error;
pub mod executor;
pub mod formats;
pub mod locator;
pub mod logging;
pub mod section;
pub mod sid;
pub mod store;
pub mod text;

pub use config::Config;
pub use document::{Document, TocEntry};
pub use edit_plan::{EditIntent, EditRequest, EditResponse, InsertionPosition, Priority};
pub use error::{EditError, Error, ErrorKind};
pub use executor::{BatchResult, Executor};
pub use locator::{LocateRequest, LocationResult, Locator, SectionOperation};
pub use section::Section;
pub use sid::{is_valid_sid, validate_sid};
pub use store::{apply_request, read_toc, DocumentStore, FsStore};
