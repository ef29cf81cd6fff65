//! Preview of a merged import and its confirmed write-back into form fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::manager::MergedResult;
use crate::types::{FieldId, FieldMapping, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub field: FieldId,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    mapping: FieldMapping,
}

impl Preview {
    /// `None` when the run produced no mapping; nothing should be rendered then.
    pub fn from_result(result: &MergedResult) -> Option<Self> {
        result.mapping.as_ref().map(|mapping| Self {
            mapping: mapping.clone(),
        })
    }

    /// Rows in vocabulary order.
    pub fn rows(&self) -> Vec<PreviewRow> {
        self.mapping
            .iter()
            .map(|(field, value)| PreviewRow {
                field,
                label: field.label(),
                value: value.to_string(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Writes every previewed value into `form` if accepted. Returns the fields written.
    pub fn accept(self, confirmation: Confirmation, form: &mut FormFields) -> Vec<FieldId> {
        if confirmation == Confirmation::Rejected {
            return Vec::new();
        }
        let mut written = Vec::with_capacity(self.mapping.len());
        for (field, value) in self.mapping {
            form.set(field, value);
            written.push(field);
        }
        written
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        for row in rows {
            writeln!(f, "{:<width$}  {}", row.label, row.value)?;
        }
        Ok(())
    }
}

/// Form inputs the import writes into.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<FieldId, FieldValue>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FieldId, value: FieldValue) {
        self.0.insert(field, value);
    }

    pub fn get(&self, field: FieldId) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
