/*!
 * Common test utilities for the catalog-maint test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use catalog_maint::app_config::Config;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Writes a JSON value as a file in the specified directory
pub fn write_json(dir: &Path, filename: &str, value: &Value) -> Result<PathBuf> {
    create_test_file(dir, filename, &serde_json::to_string_pretty(value)?)
}

/// Reads a JSON file back
pub fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

/// A single catalog entry
pub fn conversion(from: &str, to: &str, from_category: &str, to_category: &str) -> Value {
    json!({
        "from": from,
        "to": to,
        "fromCategory": from_category,
        "toCategory": to_category,
    })
}

/// A small catalog mixing every category
pub fn sample_catalog() -> Value {
    json!([
        conversion("mp4", "gif", "video", "image"),
        conversion("png", "jpg", "image", "image"),
        conversion("mp3", "wav", "audio", "audio"),
        conversion("jpg", "pdf", "image", "document"),
        conversion("mov", "mp4", "video", "video"),
        conversion("docx", "pdf", "document", "document"),
    ])
}

/// Config pointing at a temp directory, with progress bars disabled
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.catalog.paths = vec![root.join("conversions.json")];
    config.locales.dir = root.join("locales");
    config.locales.payload_path = root.join("payload.json");
    config.show_progress = false;
    config
}

/// Number of backup files next to `path`
pub fn count_backups(path: &Path) -> Result<usize> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let prefix = format!(
        "{}.backup-",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        if entry?.file_name().to_string_lossy().starts_with(&prefix) {
            count += 1;
        }
    }
    Ok(count)
}
