//! Where source projects and tasks come from.

pub mod rest;
pub mod snapshot;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Result;
use crate::model::{Snapshot, SourceProject, SourceTask};

pub use rest::RestClient;
pub use snapshot::SnapshotSource;

pub trait TaskSource {
    fn projects(&self) -> Result<Vec<SourceProject>>;
    fn tasks(&self) -> Result<Vec<SourceTask>>;
}

/// What to do when one of the source fetches fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum FetchPolicy {
    /// Stop the run; nothing is written.
    #[default]
    Abort,
    /// Carry on with an empty result for the failed resource and flag the
    /// run as partial.
    Warn,
}

#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub snapshot: Snapshot,
    /// Resources that failed under [`FetchPolicy::Warn`].
    pub failed: Vec<&'static str>,
}

impl FetchOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Fetch projects, then tasks.
pub fn fetch_all(source: &dyn TaskSource, policy: FetchPolicy) -> Result<FetchOutcome> {
    let mut outcome = FetchOutcome::default();

    outcome.snapshot.projects = settle(source.projects(), "projects", policy, &mut outcome.failed)?;
    outcome.snapshot.tasks = settle(source.tasks(), "tasks", policy, &mut outcome.failed)?;

    tracing::info!(
        projects = outcome.snapshot.projects.len(),
        tasks = outcome.snapshot.tasks.len(),
        partial = outcome.is_partial(),
        "fetched source data"
    );
    Ok(outcome)
}

fn settle<T>(
    result: Result<Vec<T>>,
    resource: &'static str,
    policy: FetchPolicy,
    failed: &mut Vec<&'static str>,
) -> Result<Vec<T>> {
    match (result, policy) {
        (Ok(items), _) => Ok(items),
        (Err(err), FetchPolicy::Abort) => Err(err),
        (Err(err), FetchPolicy::Warn) => {
            tracing::warn!(
                resource,
                error = %err,
                "FETCH FAILED: continuing without {resource}; the output will be incomplete"
            );
            failed.push(resource);
            Ok(Vec::new())
        }
    }
}
