/*!
 * # catalog-maint
 *
 * Maintenance tooling for the JSON data files of the converter frontend.
 *
 * ## Features
 *
 * - Remove conversions from the conversion catalog by category
 * - Merge localized string bundles into per-locale translation files
 * - Atomic writes with optional backups
 * - Best-effort batches: one broken document never stops the others
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `record_filter`: Catalog records and order-preserving filtering
 * - `document_merger`: Merging payload fragments into locale documents
 * - `file_utils`: JSON load/save, backups and locale discovery
 * - `app_config`: Configuration management
 * - `app_controller`: Batch orchestration over documents
 * - `report`: Human-readable run summaries
 * - `language_utils`: Locale key helpers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document_merger;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod record_filter;
pub mod report;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use document_merger::{merge, DocumentStore, MergeOutcome, MergePayload};
pub use errors::{AppError, DocumentError, RecordError};
pub use record_filter::{filter, CategoryPredicate, FilterResult, Record, RecordCollection};
