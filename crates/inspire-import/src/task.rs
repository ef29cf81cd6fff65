use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::identifiers::Identifier;
use crate::sources::DataSource;
use crate::status::StatusMessage;
use crate::types::{DocumentType, FieldMapping};

/// Outcome of one settled import task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    /// Id of the source that produced it.
    pub label: String,
    /// Absent on failure or when nothing was found.
    pub mapping: Option<FieldMapping>,
    pub message: StatusMessage,
}

impl TaskResult {
    pub fn success(label: impl Into<String>, mapping: FieldMapping, message: StatusMessage) -> Self {
        Self {
            label: label.into(),
            mapping: Some(mapping),
            message,
        }
    }

    pub fn failure(label: impl Into<String>, message: StatusMessage) -> Self {
        Self {
            label: label.into(),
            mapping: None,
            message,
        }
    }
}

/// One (source, identifier, document type) import attempt.
#[derive(Clone)]
pub struct ImportTask {
    source: Arc<dyn DataSource>,
    identifier: Identifier,
    document_type: DocumentType,
}

impl ImportTask {
    pub fn new(
        source: Arc<dyn DataSource>,
        identifier: Identifier,
        document_type: DocumentType,
    ) -> Self {
        Self {
            source,
            identifier,
            document_type,
        }
    }

    pub fn label(&self) -> &str {
        self.source.id()
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub async fn run(&self) -> TaskResult {
        self.source
            .import_data(&self.identifier, self.document_type)
            .await
    }
}

impl fmt::Debug for ImportTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportTask")
            .field("source", &self.source.id())
            .field("identifier", &self.identifier.value)
            .field("document_type", &self.document_type)
            .finish()
    }
}
