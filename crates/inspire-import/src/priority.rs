//! Cross-source conflict resolution.
//!
//! The table lists, per field, the sources allowed to supply it in order of
//! trust. The first listed source that is present and has a value wins.
//! Fields missing from the table are never merged.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{FieldId, FieldMapping};

const DOI: &str = "doi";
const ARXIV: &str = "arxiv";
const ISBN: &str = "isbn";

static DEFAULT_TABLE: &[(FieldId, &[&str])] = &[
    (FieldId::Title, &[DOI, ARXIV, ISBN]),
    (FieldId::Authors, &[DOI, ARXIV, ISBN]),
    (FieldId::Abstract, &[ARXIV, DOI]),
    (FieldId::JournalTitle, &[DOI, ARXIV]),
    (FieldId::BookTitle, &[DOI]),
    (FieldId::ConferenceTitle, &[DOI]),
    (FieldId::Volume, &[DOI, ARXIV]),
    (FieldId::Issue, &[DOI]),
    (FieldId::PageRange, &[DOI, ARXIV]),
    (FieldId::Year, &[DOI, ARXIV, ISBN]),
    (FieldId::PublicationDate, &[DOI, ARXIV, ISBN]),
    (FieldId::Publisher, &[ISBN, DOI]),
    (FieldId::Institution, &[DOI, ISBN]),
    (FieldId::DegreeType, &[DOI]),
    (FieldId::NumPages, &[ISBN]),
    (FieldId::Doi, &[DOI, ARXIV]),
    (FieldId::ArxivId, &[ARXIV]),
    (FieldId::Isbn, &[ISBN, DOI]),
    (FieldId::Categories, &[ARXIV]),
    (FieldId::License, &[ARXIV]),
    (FieldId::Note, &[ARXIV]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityMapper {
    table: BTreeMap<FieldId, Vec<String>>,
}

impl Default for PriorityMapper {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE.iter().map(|(field, labels)| {
            (*field, labels.iter().map(|l| l.to_string()).collect())
        }))
    }
}

impl PriorityMapper {
    pub fn new(rows: impl IntoIterator<Item = (FieldId, Vec<String>)>) -> Self {
        Self {
            table: rows.into_iter().collect(),
        }
    }

    /// Built-in table with rows replaced by `overrides` (field id → labels).
    pub fn with_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut mapper = Self::default();
        for (field, labels) in overrides {
            mapper.table.insert(field.parse()?, labels.clone());
        }
        Ok(mapper)
    }

    pub fn priorities(&self, field: FieldId) -> Option<&[String]> {
        self.table.get(&field).map(Vec::as_slice)
    }

    /// Merges per-source mappings keyed by source label into one mapping.
    pub fn map(&self, sources: &BTreeMap<String, FieldMapping>) -> FieldMapping {
        let mut merged = FieldMapping::new();
        for (field, labels) in &self.table {
            let winner = labels
                .iter()
                .filter_map(|label| sources.get(label))
                .find_map(|mapping| mapping.get(*field).filter(|v| !v.is_empty()));
            if let Some(value) = winner {
                merged.insert(*field, value.clone());
            }
        }
        merged
    }
}
