use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::identifiers::{Identifier, IdentifierKind};
use crate::manager::{MergedResult, TaskManager};
use crate::priority::PriorityMapper;
use crate::sources::{self, DataSource};
use crate::task::ImportTask;
use crate::types::DocumentType;

/// Identifiers entered on the form, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub doi: Option<String>,
    pub arxiv: Option<String>,
    pub isbn: Option<String>,
    pub document_type: DocumentType,
}

impl ImportRequest {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            ..Default::default()
        }
    }

    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn with_arxiv(mut self, arxiv: impl Into<String>) -> Self {
        self.arxiv = Some(arxiv.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    /// Non-empty identifiers in fixed doi, arxiv, isbn order.
    pub fn identifiers(&self) -> Vec<Identifier> {
        [
            (IdentifierKind::Doi, &self.doi),
            (IdentifierKind::Arxiv, &self.arxiv),
            (IdentifierKind::Isbn, &self.isbn),
        ]
        .into_iter()
        .filter_map(|(kind, raw)| raw.as_deref().map(|r| Identifier::new(kind, r)))
        .filter(|id| !id.is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers().is_empty()
    }
}

/// Builds import tasks from form input and runs them.
#[derive(Clone)]
pub struct Importer {
    sources: Vec<Arc<dyn DataSource>>,
    priority: Arc<PriorityMapper>,
}

impl Importer {
    /// Source ids key the merge, so they must be unique.
    pub fn new(sources: Vec<Arc<dyn DataSource>>, priority: PriorityMapper) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for source in &sources {
            if !seen.insert(source.id()) {
                return Err(ImportError::DuplicateSource(source.id().to_string()));
            }
        }
        Ok(Self {
            sources,
            priority: Arc::new(priority),
        })
    }

    pub fn from_config(config: &ImportConfig) -> Result<Self> {
        config.validate()?;
        let priority = PriorityMapper::with_overrides(&config.priority)?;
        Self::new(sources::from_config(config)?, priority)
    }

    /// One task per non-empty identifier and matching source.
    pub fn build_tasks(&self, request: &ImportRequest) -> Vec<ImportTask> {
        let mut tasks = Vec::new();
        for identifier in request.identifiers() {
            let mut matched = false;
            for source in self.sources.iter().filter(|s| s.kind() == identifier.kind) {
                tasks.push(ImportTask::new(
                    Arc::clone(source),
                    identifier.clone(),
                    request.document_type,
                ));
                matched = true;
            }
            if !matched {
                debug!(kind = %identifier.kind, "no enabled source for identifier");
            }
        }
        tasks
    }

    pub async fn import(&self, request: &ImportRequest) -> MergedResult {
        TaskManager::with_tasks(self.build_tasks(request))
            .run_multiple_tasks_merge(&self.priority)
            .await
    }
}
