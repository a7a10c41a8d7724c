use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;
use crate::record_filter::{CategoryPredicate, MatchMode};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and defaulting configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Conversion catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Locale document settings
    #[serde(default)]
    pub locales: LocalesConfig,

    /// Backup-before-write policy
    #[serde(default)]
    pub backup: BackupConfig,

    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,

    /// Show a progress bar while processing several documents
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Conversion catalog configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Catalog documents to prune
    #[serde(default = "default_catalog_paths")]
    pub paths: Vec<PathBuf>,

    /// Categories whose conversions are removed
    #[serde(default = "default_remove_categories")]
    pub remove_categories: Vec<String>,

    /// Which side of a conversion has to match
    #[serde(default)]
    pub match_mode: MatchMode,
}

impl CatalogConfig {
    /// Predicate matching the conversions to remove
    pub fn predicate(&self) -> CategoryPredicate {
        CategoryPredicate::new(self.remove_categories.iter().cloned(), self.match_mode)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            paths: default_catalog_paths(),
            remove_categories: default_remove_categories(),
            match_mode: MatchMode::default(),
        }
    }
}

/// Locale documents configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LocalesConfig {
    /// Directory holding one document per locale
    #[serde(default = "default_locales_dir")]
    pub dir: PathBuf,

    /// File extension of locale documents
    #[serde(default = "default_locale_extension")]
    pub extension: String,

    /// JSON file of `locale -> fragment`
    #[serde(default = "default_payload_path")]
    pub payload_path: PathBuf,

    /// Top-level field the fragment is written to
    #[serde(default = "default_target_field")]
    pub target_field: String,
}

impl LocalesConfig {
    // @returns: Document path for a locale key
    pub fn path_for(&self, key: &str) -> PathBuf {
        FileManager::locale_path(&self.dir, key, &self.extension)
    }
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            dir: default_locales_dir(),
            extension: default_locale_extension(),
            payload_path: default_payload_path(),
            target_field: default_target_field(),
        }
    }
}

/// Backup policy applied before any document is rewritten
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackupConfig {
    /// Copy each document aside before writing it
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Label embedded in backup file names
    #[serde(default = "default_backup_label")]
    pub label: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            label: default_backup_label(),
        }
    }
}

/// Output formatting of rewritten documents
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Spaces per indentation level
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "conf.json";

const MAX_INDENT: usize = 8;

fn default_true() -> bool {
    true
}

fn default_catalog_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("frontend/_scripts/conversions.json")]
}

fn default_remove_categories() -> Vec<String> {
    // MediaRecorder and AudioContext cannot encode these in the browser
    vec!["video".to_string(), "audio".to_string()]
}

fn default_locales_dir() -> PathBuf {
    PathBuf::from("frontend/locales")
}

fn default_locale_extension() -> String {
    "json".to_string()
}

fn default_payload_path() -> PathBuf {
    PathBuf::from("locale-payload.json")
}

fn default_target_field() -> String {
    "modal".to_string()
}

fn default_backup_label() -> String {
    "before-maintenance".to_string()
}

fn default_indent() -> usize {
    2
}

impl Config {
    /// Load the configuration from `path`, falling back to defaults when
    /// the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !FileManager::file_exists(path) {
            warn!("Config file not found at {:?}, using defaults.", path);
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Load the configuration from `path`; a missing file is an error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !FileManager::file_exists(path) {
            return Err(anyhow!("Config file not found: {:?}", path));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.catalog.remove_categories.is_empty() {
            return Err(anyhow!("At least one category to remove is required"));
        }

        if self.catalog.remove_categories.iter().any(|c| c.trim().is_empty()) {
            return Err(anyhow!("Categories to remove must not be blank"));
        }

        if self.locales.target_field.trim().is_empty() {
            return Err(anyhow!("Locale target field must not be empty"));
        }

        if self.locales.extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("Locale file extension must not be empty"));
        }

        if self.output.indent > MAX_INDENT {
            return Err(anyhow!(
                "Output indent {} is too large (max {})",
                self.output.indent,
                MAX_INDENT
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            catalog: CatalogConfig::default(),
            locales: LocalesConfig::default(),
            backup: BackupConfig::default(),
            output: OutputConfig::default(),
            show_progress: true,
            log_level: LogLevel::default(),
        }
    }
}
