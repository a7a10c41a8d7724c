use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::RecordError;

// @module: Catalog record filtering

// @const: Required catalog field names
pub const FIELD_FROM: &str = "from";
pub const FIELD_TO: &str = "to";
pub const FIELD_FROM_CATEGORY: &str = "fromCategory";
pub const FIELD_TO_CATEGORY: &str = "toCategory";

const REQUIRED_FIELDS: [&str; 4] = [FIELD_FROM, FIELD_TO, FIELD_FROM_CATEGORY, FIELD_TO_CATEGORY];

/// A single catalog entry.
///
/// The four required fields are validated on load; every other field is
/// kept verbatim so the record can be written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    // @field: Original JSON object
    fields: Map<String, Value>,
}

impl Record {
    /// Build a record from the entry at `index`, failing on missing fields
    pub fn from_value(index: usize, value: Value) -> Result<Self, RecordError> {
        let Value::Object(fields) = value else {
            return Err(RecordError::NotAnObject { index });
        };

        for field in REQUIRED_FIELDS {
            if !matches!(fields.get(field), Some(Value::String(_))) {
                return Err(RecordError::MissingField { index, field });
            }
        }

        Ok(Self { fields })
    }

    fn str_field(&self, name: &str) -> &str {
        // Presence is checked in from_value
        self.fields.get(name).and_then(Value::as_str).unwrap_or_default()
    }

    /// Source label, e.g. "mp4"
    pub fn source_label(&self) -> &str {
        self.str_field(FIELD_FROM)
    }

    /// Target label, e.g. "gif"
    pub fn target_label(&self) -> &str {
        self.str_field(FIELD_TO)
    }

    /// Source category, e.g. "video"
    pub fn source_category(&self) -> &str {
        self.str_field(FIELD_FROM_CATEGORY)
    }

    /// Target category, e.g. "image"
    pub fn target_category(&self) -> &str {
        self.str_field(FIELD_TO_CATEGORY)
    }

    /// The (source, target) category pair
    pub fn category_pair(&self) -> CategoryPair {
        CategoryPair {
            from: self.source_category().to_string(),
            to: self.target_category().to_string(),
        }
    }

    /// Read access to the raw fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source_label(), self.target_label())
    }
}

/// An ordered sequence of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCollection {
    records: Vec<Record>,
}

impl RecordCollection {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Validate a catalog document; the first malformed entry aborts the load
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let Value::Array(entries) = value else {
            return Err(RecordError::NotAnArray);
        };

        let records = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Record::from_value(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }

    pub fn into_value(self) -> Value {
        Value::Array(self.records.into_iter().map(Record::into_value).collect())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl IntoIterator for RecordCollection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Result of partitioning a collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    /// Records that did not match, in input order
    pub kept: RecordCollection,
    /// Records that matched, in input order
    pub removed: RecordCollection,
}

/// Partition `records` into kept and removed, preserving relative order
/// within each side.
pub fn filter<P>(records: RecordCollection, predicate: P) -> FilterResult
where
    P: Fn(&Record) -> bool,
{
    let (removed, kept): (Vec<Record>, Vec<Record>) =
        records.into_iter().partition(|record| predicate(record));

    FilterResult {
        kept: RecordCollection::new(kept),
        removed: RecordCollection::new(removed),
    }
}

/// Which side of a record a category must appear on to match
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Source or target category is in the set
    #[default]
    Either,
    /// Both categories are in the set
    Both,
    /// Only the source category is checked
    Source,
    /// Only the target category is checked
    Target,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Either => "either",
            Self::Both => "both",
            Self::Source => "source",
            Self::Target => "target",
        };
        write!(f, "{}", name)
    }
}

/// Predicate over the two classification fields
#[derive(Debug, Clone)]
pub struct CategoryPredicate {
    categories: Vec<String>,
    mode: MatchMode,
}

impl CategoryPredicate {
    pub fn new<I, S>(categories: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn matches(&self, record: &Record) -> bool {
        let from = self.contains(record.source_category());
        let to = self.contains(record.target_category());
        match self.mode {
            MatchMode::Either => from || to,
            MatchMode::Both => from && to,
            MatchMode::Source => from,
            MatchMode::Target => to,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

/// (fromCategory, toCategory) used for summary breakdowns
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryPair {
    pub from: String,
    pub to: String,
}

impl fmt::Display for CategoryPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.from, self.to)
    }
}

/// Counts describing a filter run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub total: usize,
    pub kept: usize,
    pub removed: usize,
    pub kept_by_pair: BTreeMap<CategoryPair, usize>,
    pub removed_by_pair: BTreeMap<CategoryPair, usize>,
}

impl FilterSummary {
    pub fn from_result(result: &FilterResult) -> Self {
        Self {
            total: result.kept.len() + result.removed.len(),
            kept: result.kept.len(),
            removed: result.removed.len(),
            kept_by_pair: count_pairs(&result.kept),
            removed_by_pair: count_pairs(&result.removed),
        }
    }
}

fn count_pairs(records: &RecordCollection) -> BTreeMap<CategoryPair, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.category_pair()).or_insert(0) += 1;
    }
    counts
}
