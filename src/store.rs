//! Document storage collaborator and the host helpers that wrap the pure core with I/O.
//!
//! The core never touches storage. Hosts hand it text read through a [`DocumentStore`] and
//! write back the text it returns.

use crate::document::{Document, TocEntry};
use crate::edit_plan::{EditRequest, EditResponse};
use crate::error::{Error, StoreError};
use crate::executor::Executor;
use std::fs;
use std::path::Path;

/// Reads and writes whole documents.
pub trait DocumentStore {
    /// Full text of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn read_document(&self, path: &Path) -> Result<String, StoreError>;

    /// Replace the document at `path` with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn write_document(&self, path: &Path, text: &str) -> Result<(), StoreError>;
}

#[derive(Clone, Copy, Debug, Default)]
/// Store backed by the local filesystem; paths are used as given.
pub struct FsStore;

impl DocumentStore for FsStore {
    fn read_document(&self, path: &Path) -> Result<String, StoreError> {
        fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_document(&self, path: &Path, text: &str) -> Result<(), StoreError> {
        fs::write(path, text).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read the request's target, apply its intents and write the result back.
///
/// The document is only written when at least one intent changed its text.
///
/// # Errors
///
/// Returns an error if the document cannot be read or written. Intent failures are reported
/// in the response instead.
pub fn apply_request(
    store: &impl DocumentStore,
    executor: &Executor,
    request: &EditRequest,
) -> Result<EditResponse, StoreError> {
    let path = Path::new(&request.target_file);
    let original = store.read_document(path)?;
    let result = executor.execute(&original, &request.intents);

    if result.content == original {
        tracing::debug!(path = %path.display(), "no changes to write");
    } else {
        store.write_document(path, &result.content)?;
        tracing::info!(path = %path.display(), "wrote edited document");
    }
    Ok(result.response)
}

/// Table of contents of the document at `path`, for discovering SIDs.
///
/// # Errors
///
/// Returns an error if the document cannot be read or parsed.
pub fn read_toc(store: &impl DocumentStore, path: &Path) -> Result<Vec<TocEntry>, Error> {
    let text = store.read_document(path)?;
    Ok(Document::parse(&text)?.toc())
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
