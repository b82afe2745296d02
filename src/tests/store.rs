use super::*;
use crate::edit_plan::EditIntent;
use crate::error::ErrorKind;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

const DOC: &str = "# Guide\n\n## Install\n\nRun it.\n";

fn temp_doc(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{text}").unwrap();
    file
}

fn request(file: &NamedTempFile, intents: Vec<EditIntent>) -> EditRequest {
    EditRequest {
        target_file: file.path().to_string_lossy().to_string(),
        intents,
    }
}

#[test]
fn test_fs_store_round_trip() {
    let file = temp_doc(DOC);
    let store = FsStore;
    assert_eq!(store.read_document(file.path()).unwrap(), DOC);

    store.write_document(file.path(), "# New\n").unwrap();
    assert_eq!(fs::read_to_string(file.path()).unwrap(), "# New\n");
}

#[test]
fn test_read_missing_document() {
    let dir = tempfile::tempdir().unwrap();
    let err = FsStore
        .read_document(&dir.path().join("absent.md"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Read { .. }));
}

#[test]
fn test_apply_request_writes_back() {
    let file = temp_doc(DOC);
    let req = request(
        &file,
        vec![EditIntent::replace_content("/guide/install", "Run it.", "Run it twice.")],
    );

    let response = apply_request(&FsStore, &Executor::new(), &req).unwrap();
    assert!(response.success);
    assert_eq!(
        fs::read_to_string(file.path()).unwrap(),
        "# Guide\n\n## Install\n\nRun it twice.\n"
    );
}

#[test]
fn test_apply_request_reports_failures_without_writing() {
    let file = temp_doc(DOC);
    let req = request(&file, vec![EditIntent::append("/guide/missing", "x")]);

    let response = apply_request(&FsStore, &Executor::new(), &req).unwrap();
    assert!(!response.success);
    assert_eq!(response.failed_intents[0].error.kind, ErrorKind::SectionNotFound);
    assert_eq!(fs::read_to_string(file.path()).unwrap(), DOC);
}

#[test]
fn test_apply_request_on_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let req = EditRequest {
        target_file: dir.path().join("absent.md").to_string_lossy().to_string(),
        intents: vec![EditIntent::append("/a", "x")],
    };
    let err = apply_request(&FsStore, &Executor::new(), &req).unwrap_err();
    assert!(matches!(err, StoreError::Read { .. }));
}

#[test]
fn test_read_toc() {
    let file = temp_doc(DOC);
    let toc = read_toc(&FsStore, file.path()).unwrap();
    assert_eq!(toc.len(), 1);
    assert_eq!(toc[0].sid, "/guide");
    assert_eq!(toc[0].children[0].sid, "/guide/install");
}
