//! Import runs re-triggered from the same form.
//!
//! Each run takes a new generation number. A run whose generation is no
//! longer the latest when it settles is reported as superseded and its
//! result is dropped. In-flight requests of a superseded run are not aborted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{Instrument, info_span, warn};

use crate::importer::{ImportRequest, Importer};
use crate::manager::MergedResult;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(MergedResult),
    /// A newer run was started, or the session was cancelled, before this one settled.
    Superseded,
}

impl RunOutcome {
    pub fn into_result(self) -> Option<MergedResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Superseded => None,
        }
    }
}

pub struct ImportSession {
    importer: Arc<Importer>,
    generation: AtomicU64,
}

impl ImportSession {
    pub fn new(importer: Arc<Importer>) -> Self {
        Self {
            importer,
            generation: AtomicU64::new(0),
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Supersedes every run still in flight.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn run(&self, request: &ImportRequest) -> RunOutcome {
        let run = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self
            .importer
            .import(request)
            .instrument(info_span!("import_run", run))
            .await;

        if self.current_generation() != run {
            warn!(run, latest = self.current_generation(), "discarding stale import result");
            return RunOutcome::Superseded;
        }
        RunOutcome::Completed(result)
    }
}
