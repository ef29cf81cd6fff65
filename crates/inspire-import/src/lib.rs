//! INSPIRE import: multi-source metadata lookup and merge for deposit forms.

pub mod config;
pub mod error;
pub mod http;
pub mod identifiers;
pub mod importer;
pub mod manager;
pub mod mapper;
pub mod preview;
pub mod priority;
pub mod session;
pub mod sources;
pub mod status;
pub mod task;
pub mod types;

pub use config::ImportConfig;
pub use error::{ImportError, Result};
pub use identifiers::{Identifier, IdentifierKind};
pub use importer::{ImportRequest, Importer};
pub use manager::{MergedResult, TaskManager, run_multiple_tasks_merge};
pub use preview::{Confirmation, FormFields, Preview};
pub use priority::PriorityMapper;
pub use session::{ImportSession, RunOutcome};
pub use sources::DataSource;
pub use status::{Severity, StatusMessage};
pub use task::{ImportTask, TaskResult};
pub use types::{Contributor, DocumentType, FieldId, FieldMapping, FieldValue};
