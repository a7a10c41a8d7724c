/*!
 * Merging of per-locale payload fragments into locale documents.
 *
 * A [`DocumentStore`] maps locale keys to JSON objects. [`merge`] writes
 * each payload fragment under a single top-level field of the matching
 * document, replacing whatever was there. Keys that only exist in the
 * payload are reported as skipped; keys that only exist in the store are
 * left alone.
 */

use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::DocumentError;

/// Opaque locale identifier such as "ja" or "pt-BR"
pub type LocaleKey = String;

/// A locale document: a JSON object
pub type Document = Map<String, Value>;

/// Documents keyed by locale
pub type DocumentStore = BTreeMap<LocaleKey, Document>;

/// Fragments to insert, keyed by locale
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergePayload {
    fragments: BTreeMap<LocaleKey, Value>,
}

impl MergePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a payload from a JSON object of `locale -> fragment`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                fragments: map.into_iter().collect(),
            }),
            _ => None,
        }
    }

    /// Like [`MergePayload::from_value`], attributing a shape error to `path`
    pub fn from_document(path: &std::path::Path, value: Value) -> Result<Self, DocumentError> {
        Self::from_value(value).ok_or_else(|| DocumentError::Shape {
            path: path.to_path_buf(),
            expected: "an object of locale -> fragment",
        })
    }

    pub fn insert(&mut self, key: impl Into<LocaleKey>, fragment: Value) -> Option<Value> {
        self.fragments.insert(key.into(), fragment)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fragments.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &LocaleKey> {
        self.fragments.keys()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Keep only the fragments whose key satisfies `keep`
    pub fn retain_keys<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.fragments.retain(|key, _| keep(key));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocaleKey, &Value)> {
        self.fragments.iter()
    }
}

impl FromIterator<(LocaleKey, Value)> for MergePayload {
    fn from_iter<T: IntoIterator<Item = (LocaleKey, Value)>>(iter: T) -> Self {
        Self {
            fragments: iter.into_iter().collect(),
        }
    }
}

/// What a merge did to the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Keys whose document received the fragment
    pub updated: BTreeSet<LocaleKey>,
    /// Payload keys with no document in the store
    pub skipped: BTreeSet<LocaleKey>,
    /// Store keys with no fragment in the payload
    pub untouched: BTreeSet<LocaleKey>,
}

/// Overwrite `target_field` of a single document with `fragment`.
///
/// Returns the previous value, if any. An existing field keeps its
/// position; a new one is appended.
pub fn merge_into(document: &mut Document, target_field: &str, fragment: Value) -> Option<Value> {
    document.insert(target_field.to_string(), fragment)
}

/// Merge every payload fragment into the matching document of `store`.
pub fn merge(store: &mut DocumentStore, payload: &MergePayload, target_field: &str) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for (key, fragment) in payload.iter() {
        match store.get_mut(key) {
            Some(document) => {
                let replaced = merge_into(document, target_field, fragment.clone());
                debug!(
                    "{}: {} '{}'",
                    key,
                    if replaced.is_some() { "replaced" } else { "added" },
                    target_field
                );
                outcome.updated.insert(key.clone());
            }
            None => {
                warn!("{}: not found, skipping", key);
                outcome.skipped.insert(key.clone());
            }
        }
    }

    outcome.untouched = store
        .keys()
        .filter(|key| payload.get(key).is_none())
        .cloned()
        .collect();

    outcome
}
