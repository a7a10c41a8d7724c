use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::document_merger::{self, DocumentStore, LocaleKey, MergeOutcome, MergePayload};
use crate::errors::{AppError, DocumentError};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::record_filter::{self, FilterSummary, RecordCollection};

// @module: Application controller for catalog and locale maintenance

/// A document that could not be processed
#[derive(Debug)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: AppError,
}

/// Result of pruning one catalog document
#[derive(Debug, Clone)]
pub struct CatalogRun {
    pub path: PathBuf,
    pub summary: FilterSummary,
    /// "from → to" labels of removed conversions, in catalog order
    pub removed: Vec<String>,
    pub backup: Option<PathBuf>,
    pub written: bool,
}

/// Result of a prune over all configured catalogs
#[derive(Debug, Default)]
pub struct PruneRun {
    pub catalogs: Vec<CatalogRun>,
    pub failures: Vec<DocumentFailure>,
    pub dry_run: bool,
    pub elapsed: Duration,
}

impl PruneRun {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of merging a payload into the locale documents
#[derive(Debug, Default)]
pub struct MergeRun {
    pub target_field: String,
    pub outcome: MergeOutcome,
    /// Updated keys whose document was saved
    pub written: BTreeSet<LocaleKey>,
    pub backups: Vec<PathBuf>,
    pub failures: Vec<DocumentFailure>,
    pub dry_run: bool,
    pub elapsed: Duration,
}

impl MergeRun {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn progress_bar(&self, len: usize, what: &str) -> ProgressBar {
        if !self.config.show_progress || len < 2 {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style.progress_chars("█▓▒░"));
        pb.set_message(what.to_string());
        pb
    }

    /// Remove matching conversions from every configured catalog.
    ///
    /// A catalog that fails to load, validate or save is recorded and the
    /// remaining catalogs are still processed.
    pub fn run_prune(&self, dry_run: bool) -> PruneRun {
        let start_time = Instant::now();
        let paths = &self.config.catalog.paths;
        let pb = self.progress_bar(paths.len(), "catalogs");

        let mut run = PruneRun {
            dry_run,
            ..Default::default()
        };

        for path in paths {
            pb.set_message(path.display().to_string());
            match self.prune_catalog(path, dry_run) {
                Ok(catalog) => run.catalogs.push(catalog),
                Err(e) => {
                    error!("Error processing catalog {:?}: {}", path, e);
                    run.failures.push(DocumentFailure {
                        path: path.clone(),
                        error: e,
                    });
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        run.elapsed = start_time.elapsed();
        run
    }

    fn prune_catalog(&self, path: &Path, dry_run: bool) -> Result<CatalogRun, AppError> {
        let predicate = self.config.catalog.predicate();
        info!(
            "Pruning {:?} (categories: {}, mode: {})",
            path,
            predicate.categories().join(", "),
            predicate.mode()
        );

        let records = RecordCollection::from_value(FileManager::load_json(path)?)?;
        debug!("Loaded {} conversions from {:?}", records.len(), path);

        let result = record_filter::filter(records, |record| predicate.matches(record));
        let summary = FilterSummary::from_result(&result);
        let removed = result.removed.iter().map(ToString::to_string).collect();

        let mut catalog = CatalogRun {
            path: path.to_path_buf(),
            summary,
            removed,
            backup: None,
            written: false,
        };

        if catalog.summary.removed == 0 {
            info!("Nothing to remove from {:?}", path);
            return Ok(catalog);
        }

        if dry_run {
            info!("Dry run, not writing {:?}", path);
            return Ok(catalog);
        }

        if self.config.backup.enabled {
            catalog.backup = Some(FileManager::backup_file(path, &self.config.backup.label)?);
        }

        FileManager::save_json(path, &result.kept.into_value(), self.config.output.indent)?;
        catalog.written = true;

        Ok(catalog)
    }

    /// Load the payload file configured for merging
    pub fn load_payload(&self) -> Result<MergePayload> {
        let path = &self.config.locales.payload_path;
        let value = FileManager::load_json(path)
            .with_context(|| format!("Failed to load merge payload {:?}", path))?;
        Ok(MergePayload::from_document(path, value)?)
    }

    /// Merge the configured payload into the locale documents.
    ///
    /// `only` restricts the run to the given locale keys when non-empty.
    /// Locales without a document are skipped; documents that fail to
    /// load or save are recorded without stopping the batch.
    pub fn run_merge(&self, only: &[String], dry_run: bool) -> Result<MergeRun> {
        let payload = self.load_payload()?;
        self.run_merge_with_payload(payload, only, dry_run)
    }

    pub fn run_merge_with_payload(&self, mut payload: MergePayload, only: &[String], dry_run: bool) -> Result<MergeRun> {
        let start_time = Instant::now();
        let locales = &self.config.locales;

        if !FileManager::dir_exists(&locales.dir) {
            return Err(anyhow!("Locales directory does not exist: {:?}", locales.dir));
        }

        if !only.is_empty() {
            for key in only.iter().filter(|key| payload.get(key).is_none()) {
                warn!("{}: requested but absent from the payload", key);
            }
            payload.retain_keys(|key| only.iter().any(|wanted| wanted == key));
        }

        for key in payload.keys().filter(|key| !language_utils::is_well_formed_locale(key)) {
            warn!("{}: does not look like a locale key", key);
        }

        let mut run = MergeRun {
            target_field: locales.target_field.clone(),
            dry_run,
            ..Default::default()
        };

        // Load the documents the payload refers to
        let mut store = DocumentStore::new();
        let mut unreadable = BTreeSet::new();
        for key in payload.keys() {
            let path = locales.path_for(key);
            match FileManager::load_json(&path) {
                Ok(Value::Object(document)) => {
                    store.insert(key.clone(), document);
                }
                Ok(_) => {
                    let error = DocumentError::Shape {
                        path: path.clone(),
                        expected: "a JSON object",
                    };
                    error!("{}: {}", key, error);
                    unreadable.insert(key.clone());
                    run.failures.push(DocumentFailure { path, error: error.into() });
                }
                Err(e) if e.is_not_found() => {
                    debug!("{}: no document at {:?}", key, path);
                }
                Err(e) => {
                    error!("{}: {}", key, e);
                    unreadable.insert(key.clone());
                    run.failures.push(DocumentFailure { path, error: e.into() });
                }
            }
        }
        payload.retain_keys(|key| !unreadable.contains(key));

        run.outcome = document_merger::merge(&mut store, &payload, &locales.target_field);

        // Documents on disk that the payload does not mention
        let on_disk = FileManager::discover_locales(&locales.dir, &locales.extension)?;
        run.outcome.untouched.extend(
            on_disk
                .into_iter()
                .filter(|key| payload.get(key).is_none() && !unreadable.contains(key)),
        );

        if dry_run {
            info!("Dry run, not writing {} locale documents", run.outcome.updated.len());
            run.elapsed = start_time.elapsed();
            return Ok(run);
        }

        let pb = self.progress_bar(run.outcome.updated.len(), "locales");
        for key in &run.outcome.updated {
            pb.set_message(key.clone());
            let path = locales.path_for(key);
            let Some(document) = store.remove(key) else {
                continue;
            };

            match self.write_locale(&path, document) {
                Ok(backup) => {
                    info!("{} updated", language_utils::display_locale(key));
                    run.backups.extend(backup);
                    run.written.insert(key.clone());
                }
                Err(e) => {
                    error!("{}: {}", key, e);
                    run.failures.push(DocumentFailure { path, error: e.into() });
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        run.elapsed = start_time.elapsed();
        Ok(run)
    }

    fn write_locale(&self, path: &Path, document: document_merger::Document) -> Result<Option<PathBuf>, DocumentError> {
        let backup = if self.config.backup.enabled {
            Some(FileManager::backup_file(path, &self.config.backup.label)?)
        } else {
            None
        };

        FileManager::save_json(path, &Value::Object(document), self.config.output.indent)?;
        Ok(backup)
    }
}
