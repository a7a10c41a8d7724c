use anyhow::{Context, Result};
use chrono::Local;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::errors::DocumentError;

// @module: JSON document persistence and file helpers

const MAX_BACKUP_ATTEMPTS: usize = 1000;

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Load a JSON document.
    ///
    /// Fails with `NotFound` when the path does not exist and `Parse` when
    /// the content cannot be read as JSON.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Value, DocumentError> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DocumentError::NotFound { path: path.to_path_buf() });
            }
            Err(e) => {
                return Err(DocumentError::Parse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        // Editors on Windows like to prepend a BOM
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        serde_json::from_str(content).map_err(|e| DocumentError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write a JSON document with the given indent and a trailing newline.
    ///
    /// The content goes to a temporary file next to the target which then
    /// replaces it, so a failed write leaves the previous file untouched.
    pub fn save_json<P: AsRef<Path>>(path: P, value: &Value, indent: usize) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let write_error = |e: io::Error| DocumentError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;

        // Keep the permissions of the file being replaced
        if let Ok(metadata) = fs::metadata(path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_error)?;
        }

        Self::write_pretty(temp.as_file_mut(), value, indent).map_err(write_error)?;

        temp.persist(path).map_err(|e| write_error(e.error))?;
        debug!("Saved {:?}", path);

        Ok(())
    }

    fn write_pretty<W: Write>(writer: W, value: &Value, indent: usize) -> io::Result<()> {
        let indent = " ".repeat(indent);
        let mut writer = BufWriter::new(writer);
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        value.serialize(&mut serializer)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    // @generates: Backup path, e.g. conversions.json.backup-before-prune-20250101120000
    pub fn backup_path<P: AsRef<Path>>(path: P, label: &str) -> PathBuf {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let timestamp = Local::now().format("%Y%m%d%H%M%S");

        let backup_name = if label.is_empty() {
            format!("{}.backup-{}", file_name, timestamp)
        } else {
            format!("{}.backup-{}-{}", file_name, label, timestamp)
        };

        path.with_file_name(backup_name)
    }

    /// Copy `path` aside before it gets rewritten.
    ///
    /// An existing backup is never replaced: when the timestamped name is
    /// taken, a numeric suffix is appended (`.1`, `.2`, ...).
    pub fn backup_file<P: AsRef<Path>>(path: P, label: &str) -> Result<PathBuf, DocumentError> {
        let path = path.as_ref();
        let base = Self::backup_path(path, label);

        let mut source = fs::File::open(path).map_err(|e| DocumentError::Write {
            path: base.clone(),
            message: format!("Failed to open {:?} for backup: {}", path, e),
        })?;

        for attempt in 0..MAX_BACKUP_ATTEMPTS {
            let backup = if attempt == 0 {
                base.clone()
            } else {
                let mut name = base.clone().into_os_string();
                name.push(format!(".{}", attempt));
                PathBuf::from(name)
            };

            let mut target = match fs::OpenOptions::new().write(true).create_new(true).open(&backup) {
                Ok(target) => target,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(DocumentError::Write { path: backup, message: e.to_string() });
                }
            };

            if let Err(e) = io::copy(&mut source, &mut target).and_then(|_| target.sync_all()) {
                drop(target);
                let _ = fs::remove_file(&backup);
                return Err(DocumentError::Write { path: backup, message: e.to_string() });
            }

            debug!("Backed up {:?} to {:?}", path, backup);
            return Ok(backup);
        }

        Err(DocumentError::Write {
            path: base,
            message: format!("{} backups with this name already exist", MAX_BACKUP_ATTEMPTS),
        })
    }

    // @generates: Locale document path, e.g. frontend/locales/ja.json
    pub fn locale_path<P: AsRef<Path>>(dir: P, key: &str, extension: &str) -> PathBuf {
        let extension = extension.trim_start_matches('.');
        dir.as_ref().join(format!("{}.{}", key, extension))
    }

    /// Locale keys of the documents directly inside `dir`, sorted
    pub fn discover_locales<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<String>> {
        let extension = extension.trim_start_matches('.');
        let mut keys = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let matches_ext = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension));
            if !matches_ext {
                continue;
            }

            if let Some(stem) = path.file_stem() {
                keys.push(stem.to_string_lossy().to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
