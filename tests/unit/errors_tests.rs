/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use catalog_maint::errors::{AppError, DocumentError, RecordError};

#[test]
fn test_documentError_notFound_shouldDisplayPath() {
    let error = DocumentError::NotFound { path: PathBuf::from("frontend/locales/ko.json") };
    let display = format!("{}", error);
    assert!(display.contains("Document not found"));
    assert!(display.contains("ko.json"));
    assert!(error.is_not_found());
}

#[test]
fn test_documentError_parse_shouldDisplayPathAndMessage() {
    let error = DocumentError::Parse {
        path: PathBuf::from("ja.json"),
        message: "EOF while parsing".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("ja.json"));
    assert!(display.contains("EOF while parsing"));
    assert!(!error.is_not_found());
}

#[test]
fn test_documentError_write_shouldExposePath() {
    let error = DocumentError::Write {
        path: PathBuf::from("/readonly/de.json"),
        message: "Permission denied".to_string(),
    };
    assert_eq!(error.path(), PathBuf::from("/readonly/de.json").as_path());
    assert!(error.to_string().contains("Permission denied"));
}

#[test]
fn test_recordError_missingField_shouldDisplayIndexAndField() {
    let error = RecordError::MissingField { index: 12, field: "fromCategory" };
    let display = format!("{}", error);
    assert!(display.contains("#12"));
    assert!(display.contains("fromCategory"));
}

#[test]
fn test_appError_fromDocumentError_shouldWrapCorrectly() {
    let error: AppError = DocumentError::NotFound { path: PathBuf::from("x.json") }.into();
    let display = format!("{}", error);
    assert!(display.contains("Document error"));
    assert!(display.contains("x.json"));
}

#[test]
fn test_appError_fromRecordError_shouldWrapCorrectly() {
    let error: AppError = RecordError::NotAnArray.into();
    assert!(format!("{}", error).contains("Record error"));
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let anyhow_error = anyhow::anyhow!("Something went wrong");
    let app_error: AppError = anyhow_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Unknown error"));
    assert!(display.contains("Something went wrong"));
}

#[test]
fn test_appError_config_shouldDisplayCorrectly() {
    let error = AppError::Config("indent too large".to_string());
    assert!(format!("{}", error).contains("Configuration error"));
}

#[test]
fn test_appError_debug_shouldBeImplemented() {
    let error: AppError = RecordError::NotAnObject { index: 0 }.into();
    let debug = format!("{:?}", error);
    assert!(debug.contains("NotAnObject"));
}
