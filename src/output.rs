use clap::ValueEnum;
use colored::Colorize;

use crate::commands::fetch::FetchReport;
use crate::commands::migrate::MigrationReport;
use crate::error::Result;
use crate::mapper::MappingWarning;
use crate::merge::SectionCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
}

pub fn print_migration_report(report: &MigrationReport, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(report)?),
        Format::Pretty => {
            match (&report.output, report.dry_run) {
                (Some(path), _) => println!("{} {}", "wrote".green().bold(), path),
                (None, true) => println!("{}", "dry run, nothing written".yellow().bold()),
                (None, false) => {}
            }
            println!(
                "  source: {} projects, {} tasks ({} completed skipped)",
                report.source_projects, report.source_tasks, report.skipped_completed
            );
            println!("  projects: {}", counts_line(report.merged.projects));
            println!("  notes:    {}", counts_line(report.merged.notes));
            println!("  tasks:    {}", counts_line(report.merged.tasks));
            if report.partial {
                println!(
                    "{} failed to fetch {}; output is incomplete",
                    "partial:".red().bold(),
                    report.failed_fetches.join(", ")
                );
            }
            for warning in &report.warnings {
                println!("{} {}", "warning:".yellow(), describe_warning(warning));
            }
        }
    }
    Ok(())
}

pub fn print_fetch_report(report: &FetchReport, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(report)?),
        Format::Pretty => println!(
            "{} {} ({} projects, {} tasks)",
            "wrote".green().bold(),
            report.output,
            report.projects,
            report.tasks
        ),
    }
    Ok(())
}

fn counts_line(counts: SectionCounts) -> String {
    format!("{} created, {} updated", counts.created, counts.updated)
}

pub fn describe_warning(warning: &MappingWarning) -> String {
    match warning {
        MappingWarning::UnresolvedProject {
            task_id,
            project_id,
        } => format!("task {task_id} skipped: project {project_id} was not migrated"),
        MappingWarning::MissingParent { task_id, parent_id } => {
            format!("task {task_id} kept at top level: parent {parent_id} was not migrated")
        }
    }
}
