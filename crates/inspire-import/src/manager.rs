//! Concurrent fan-out of import tasks and merge of their settled results.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::priority::PriorityMapper;
use crate::status::{Severity, StatusMessage};
use crate::task::{ImportTask, TaskResult};
use crate::types::FieldMapping;

/// Outcome of one import run, handed to the preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedResult {
    /// Absent when no task produced a mapping.
    pub mapping: Option<FieldMapping>,
    /// One message per task, in submission order.
    pub status_messages: Vec<StatusMessage>,
}

impl MergedResult {
    pub fn has_mapping(&self) -> bool {
        self.mapping.is_some()
    }
}

/// Owns the tasks of a single import run.
#[derive(Debug, Default)]
pub struct TaskManager {
    tasks: Vec<ImportTask>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<ImportTask>) -> Self {
        Self { tasks }
    }

    pub fn add_task(&mut self, task: ImportTask) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Runs every task concurrently, waits for all of them to settle and
    /// merges the mappings through `priority`.
    pub async fn run_multiple_tasks_merge(self, priority: &PriorityMapper) -> MergedResult {
        if self.tasks.is_empty() {
            return MergedResult::default();
        }

        let submitted = self.tasks.len();
        // join_all yields in submission order regardless of completion order
        let results = join_all(self.tasks.iter().map(settle)).await;

        let mut sources: BTreeMap<String, FieldMapping> = BTreeMap::new();
        let mut status_messages = Vec::with_capacity(results.len());
        for result in results {
            if let Some(mapping) = result.mapping {
                sources.insert(result.label, mapping);
            }
            status_messages.push(result.message);
        }

        let mapping = if sources.is_empty() {
            None
        } else {
            Some(priority.map(&sources))
        };

        info!(
            submitted,
            succeeded = sources.len(),
            merged_fields = mapping.as_ref().map_or(0, FieldMapping::len),
            "import run settled"
        );

        MergedResult {
            mapping,
            status_messages,
        }
    }
}

/// Runs one task; a panicking source still yields a result.
async fn settle(task: &ImportTask) -> TaskResult {
    match AssertUnwindSafe(task.run()).catch_unwind().await {
        Ok(result) => result,
        Err(_) => {
            warn!(source = task.label(), "import task panicked");
            TaskResult::failure(
                task.label(),
                StatusMessage::new(
                    Severity::Warning,
                    format!("Importing from {} failed unexpectedly.", task.label()),
                ),
            )
        }
    }
}

/// Convenience wrapper over [`TaskManager::run_multiple_tasks_merge`].
pub async fn run_multiple_tasks_merge(
    tasks: Vec<ImportTask>,
    priority: &PriorityMapper,
) -> MergedResult {
    TaskManager::with_tasks(tasks)
        .run_multiple_tasks_merge(priority)
        .await
}
