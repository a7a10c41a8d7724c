/*!
 * End-to-end tests for merging locale payloads through the controller
 */

use anyhow::Result;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use catalog_maint::app_config::Config;
use catalog_maint::app_controller::Controller;
use catalog_maint::document_merger::MergePayload;
use catalog_maint::errors::{AppError, DocumentError};
use crate::common;

fn modal(title: &str) -> Value {
    json!({
        "cancelConversion": {"title": title, "buttonCancel": "Cancel"},
        "deleteFile": {"title": "Delete"}
    })
}

/// Locale dir with ja and de documents, and a payload for ja, fr and de
fn setup(root: &Path) -> Result<Config> {
    let locales = root.join("locales");
    fs::create_dir(&locales)?;
    common::write_json(&locales, "ja.json", &json!({"greeting": "こんにちは", "nav": {"home": "ホーム"}}))?;
    common::write_json(&locales, "de.json", &json!({"greeting": "Hallo", "modal": {"stale": true}}))?;
    common::write_json(&locales, "ko.json", &json!({"greeting": "안녕하세요"}))?;
    common::write_json(
        root,
        "payload.json",
        &json!({
            "ja": modal("変換の停止"),
            "fr": modal("Arrêter la Conversion"),
            "de": modal("Konvertierung Stoppen")
        }),
    )?;
    Ok(common::test_config(root))
}

#[test]
fn test_run_merge_withPartialCoverage_shouldUpdateExistingAndSkipMissing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let controller = Controller::with_config(setup(root)?)?;

    let run = controller.run_merge(&[], false)?;

    assert!(run.is_success());
    let updated: Vec<&str> = run.outcome.updated.iter().map(String::as_str).collect();
    assert_eq!(updated, vec!["de", "ja"]);
    assert!(run.outcome.skipped.contains("fr"));
    assert!(run.outcome.untouched.contains("ko"));
    assert_eq!(run.written, run.outcome.updated);
    assert_eq!(run.backups.len(), 2);

    let ja = common::read_json(&root.join("locales/ja.json"))?;
    assert_eq!(ja["greeting"], json!("こんにちは"));
    assert_eq!(ja["nav"], json!({"home": "ホーム"}));
    assert_eq!(ja["modal"], modal("変換の停止"));

    // Full overwrite of the existing field
    let de = common::read_json(&root.join("locales/de.json"))?;
    assert_eq!(de["modal"], modal("Konvertierung Stoppen"));

    // No document is created for fr, and ko stays as it was
    assert!(!root.join("locales/fr.json").exists());
    assert_eq!(common::read_json(&root.join("locales/ko.json"))?, json!({"greeting": "안녕하세요"}));
    assert_eq!(common::count_backups(&root.join("locales/ko.json"))?, 0);
    Ok(())
}

#[test]
fn test_run_merge_withExistingKeyOrder_shouldAppendFieldAtEnd() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let controller = Controller::with_config(setup(root)?)?;

    controller.run_merge(&["ja".to_string()], false)?;

    let content = fs::read_to_string(root.join("locales/ja.json"))?;
    let greeting = content.find("\"greeting\"").unwrap_or(usize::MAX);
    let nav = content.find("\"nav\"").unwrap_or(usize::MAX);
    let modal = content.find("\"modal\"").unwrap_or(0);
    assert!(greeting < nav && nav < modal);
    assert!(content.contains("変換の停止"));
    assert!(content.ends_with("}\n"));
    Ok(())
}

#[test]
fn test_run_merge_withLocaleFilter_shouldOnlyTouchRequestedLocales() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let controller = Controller::with_config(setup(root)?)?;
    let de_before = fs::read_to_string(root.join("locales/de.json"))?;

    let run = controller.run_merge(&["ja".to_string(), "es".to_string()], false)?;

    assert_eq!(run.written.len(), 1);
    assert!(run.written.contains("ja"));
    assert!(run.outcome.untouched.contains("de"));
    assert_eq!(fs::read_to_string(root.join("locales/de.json"))?, de_before);
    Ok(())
}

#[test]
fn test_run_merge_withDryRun_shouldReportWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let controller = Controller::with_config(setup(root)?)?;
    let ja_before = fs::read_to_string(root.join("locales/ja.json"))?;

    let run = controller.run_merge(&[], true)?;

    assert!(run.dry_run);
    assert_eq!(run.outcome.updated.len(), 2);
    assert!(run.written.is_empty());
    assert!(run.backups.is_empty());
    assert_eq!(fs::read_to_string(root.join("locales/ja.json"))?, ja_before);
    Ok(())
}

#[test]
fn test_run_merge_withBrokenDocument_shouldContinueAndCollectFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let config = setup(root)?;
    common::create_test_file(&root.join("locales"), "fr.json", "{ \"greeting\": ")?;
    common::write_json(&root.join("locales"), "de.json", &json!(["not", "an", "object"]))?;
    let controller = Controller::with_config(config)?;

    let run = controller.run_merge(&[], false)?;

    assert!(!run.is_success());
    assert_eq!(run.failures.len(), 2);
    assert!(run.failures.iter().any(|f| matches!(
        f.error,
        AppError::Document(DocumentError::Parse { .. })
    )));
    assert!(run.failures.iter().any(|f| matches!(
        f.error,
        AppError::Document(DocumentError::Shape { .. })
    )));

    // The healthy locale is still written, broken ones are neither skipped nor untouched
    assert!(run.written.contains("ja"));
    assert!(!run.outcome.skipped.contains("fr"));
    assert!(!run.outcome.untouched.contains("fr"));
    assert_eq!(fs::read_to_string(root.join("locales/fr.json"))?, "{ \"greeting\": ");
    Ok(())
}

#[test]
fn test_run_merge_withEmptyPayload_shouldModifyNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let controller = Controller::with_config(setup(root)?)?;

    let run = controller.run_merge_with_payload(MergePayload::new(), &[], false)?;

    assert!(run.outcome.updated.is_empty());
    assert!(run.written.is_empty());
    assert_eq!(run.outcome.untouched.len(), 3);
    assert_eq!(common::count_backups(&root.join("locales/ja.json"))?, 0);
    Ok(())
}

#[test]
fn test_run_merge_withBackupDisabled_shouldNotCreateBackups() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let mut config = setup(root)?;
    config.backup.enabled = false;
    let controller = Controller::with_config(config)?;

    let run = controller.run_merge(&[], false)?;

    assert_eq!(run.written.len(), 2);
    assert!(run.backups.is_empty());
    assert_eq!(common::count_backups(&root.join("locales/ja.json"))?, 0);
    Ok(())
}

#[test]
fn test_run_merge_withMissingPayload_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let mut config = setup(root)?;
    config.locales.payload_path = root.join("absent.json");
    let controller = Controller::with_config(config)?;

    let error = controller.run_merge(&[], false).unwrap_err();

    assert!(format!("{:#}", error).contains("Failed to load merge payload"));
    Ok(())
}

#[test]
fn test_run_merge_withMissingLocalesDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let mut config = setup(root)?;
    config.locales.dir = root.join("nowhere");
    let controller = Controller::with_config(config)?;

    assert!(controller.run_merge(&[], false).is_err());
    Ok(())
}
