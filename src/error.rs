//! Error types for parsing, editing, configuration and document storage.
//!
//! Edit failures are recovered per intent: the executor turns an [`EditError`] into a
//! structured failure entry and carries on with the rest of the batch. The other error
//! types belong to the host-facing helpers around the core.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Failure to resolve or apply a single edit intent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    /// The supplied SID does not satisfy the identifier grammar.
    #[error("invalid section id '{sid}': {message}")]
    InvalidSid {
        /// The SID exactly as supplied.
        sid: String,
        /// What the grammar check rejected.
        message: String,
        /// Sanitised alternatives the caller may have meant.
        suggestions: Vec<String>,
    },

    /// A well-formed SID that names no section of the current document.
    #[error("no section with id '{sid}' in the current document")]
    SectionNotFound {
        /// The SID that failed to resolve.
        sid: String,
    },

    /// Text targeted inside a section could not be found.
    #[error("{what} not found in section '{sid}'")]
    ContentNotFound {
        /// Section searched.
        sid: String,
        /// Description of the missing target, e.g. `targetContent "foo"`.
        what: String,
    },

    /// Several equally valid matches and strict matching is enabled.
    #[error("{what} matches {matches} locations in section '{sid}'; add a contextAnchor")]
    AmbiguousTarget {
        /// Section searched.
        sid: String,
        /// Description of the ambiguous target.
        what: String,
        /// Number of matches found in the search scope.
        matches: usize,
    },

    /// The intent is missing required fields or carries inconsistent ones.
    #[error("malformed intent: {message}")]
    MalformedIntent {
        /// Which field is missing or inconsistent.
        message: String,
    },

    /// The document text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl EditError {
    /// Shorthand for a [`EditError::MalformedIntent`].
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedIntent {
            message: message.into(),
        }
    }

    #[must_use]
    /// Coarse classification used in serialised failure reports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSid { .. } => ErrorKind::InvalidSid,
            Self::SectionNotFound { .. } => ErrorKind::SectionNotFound,
            Self::ContentNotFound { .. } => ErrorKind::ContentNotFound,
            Self::AmbiguousTarget { .. } => ErrorKind::AmbiguousTarget,
            Self::MalformedIntent { .. } => ErrorKind::MalformedIntent,
            Self::Parse(_) => ErrorKind::ParseFailure,
        }
    }
}

/// Serialisable classification of an [`EditError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// See [`EditError::InvalidSid`].
    InvalidSid,
    /// See [`EditError::SectionNotFound`].
    SectionNotFound,
    /// See [`EditError::ContentNotFound`].
    ContentNotFound,
    /// See [`EditError::AmbiguousTarget`].
    AmbiguousTarget,
    /// See [`EditError::MalformedIntent`].
    MalformedIntent,
    /// See [`EditError::Parse`].
    ParseFailure,
}

/// Failure to build a syntax tree for a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load markdown grammar: {0}")]
    Language(String),

    /// The heading query does not compile against the grammar.
    #[error("invalid heading query: {0}")]
    Query(String),

    /// The parser returned no tree.
    #[error("parser produced no syntax tree")]
    NoTree,
}

/// Failure of the filesystem collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document could not be read.
    #[error("failed to read document {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be written back.
    #[error("failed to write document {path}: {source}")]
    Write {
        /// Path that was written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Failure to load `locus.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`crate::config::Config`].
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Umbrella error for host-facing helpers that touch several concerns.
#[derive(Debug, Error)]
pub enum Error {
    /// Document parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Reading or writing a document failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Loading configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
