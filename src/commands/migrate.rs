use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::document::BackupDocument;
use crate::error::{MigrateError, Result};
use crate::mapper::{CollectionProjects, MapInput, MappingWarning, map_entities};
use crate::merge::{MergeReport, merge_into};
use crate::output::{self, Format};
use crate::source::{FetchPolicy, TaskSource, fetch_all};
use crate::store::backup;
use crate::store::template::ProjectTemplate;
use crate::tags::TagResolver;

#[derive(Debug, Clone)]
pub struct MigrateOptions {
    pub backup: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output: PathBuf,
    pub collections: CollectionProjects,
    pub fetch_policy: FetchPolicy,
    /// Fail instead of skipping tasks that cannot be mapped cleanly.
    pub strict: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub dry_run: bool,
    pub partial: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_fetches: Vec<&'static str>,
    pub source_projects: usize,
    pub source_tasks: usize,
    pub skipped_completed: usize,
    #[serde(flatten)]
    pub merged: MergeReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MappingWarning>,
}

/// Fetch, map and merge. Returns the merged document without writing it.
pub fn migrate(
    source: &dyn TaskSource,
    options: &MigrateOptions,
) -> Result<(BackupDocument, MigrationReport)> {
    let fetched = fetch_all(source, options.fetch_policy)?;
    let mut document = backup::load(options.backup.as_deref())?;
    let template = ProjectTemplate::resolve(options.template.as_deref())?;
    let tags = TagResolver::from_document(document.content());
    tracing::debug!(tags = tags.len(), "tag lookup built");

    let mapping = map_entities(&MapInput {
        projects: &fetched.snapshot.projects,
        tasks: &fetched.snapshot.tasks,
        collections: &options.collections,
        tags: &tags,
    })?;

    if options.strict && !mapping.warnings.is_empty() {
        return Err(MigrateError::UnresolvedReferences(mapping.warnings.len()));
    }

    let merged = merge_into(&mut document, &template, &mapping)?;

    let report = MigrationReport {
        output: None,
        dry_run: options.dry_run,
        partial: fetched.is_partial(),
        failed_fetches: fetched.failed,
        source_projects: fetched.snapshot.projects.len(),
        source_tasks: fetched.snapshot.tasks.len(),
        skipped_completed: mapping.skipped_completed,
        merged,
        warnings: mapping.warnings,
    };
    Ok((document, report))
}

pub fn run(source: &dyn TaskSource, options: &MigrateOptions, format: Format) -> Result<()> {
    let (document, mut report) = migrate(source, options)?;

    if options.dry_run {
        tracing::info!("dry run; not writing {}", options.output.display());
    } else {
        write_document(&options.output, &document)?;
        report.output = Some(options.output.display().to_string());
    }

    output::print_migration_report(&report, format)
}

fn write_document(path: &Path, document: &BackupDocument) -> Result<()> {
    backup::write_json_atomic(path, document.as_value())?;
    tracing::info!(path = %path.display(), "wrote backup");
    Ok(())
}
