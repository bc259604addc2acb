use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tdsp::commands::migrate::MigrateOptions;
use tdsp::error::Result;
use tdsp::mapper::CollectionProjects;
use tdsp::output::Format;
use tdsp::source::rest::DEFAULT_API_BASE_URL;
use tdsp::source::{FetchPolicy, RestClient, SnapshotSource, TaskSource};
use tdsp::store::backup::DEFAULT_OUTPUT_PATH;

#[derive(Parser)]
#[command(
    name = "tdsp",
    version,
    long_version = tdsp::build_info::LONG_VERSION,
    about = "Migrate open tasks from a hosted task service into a productivity-app backup"
)]
struct Cli {
    /// Report format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    format: Format,
    /// Debug logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RemoteArgs {
    /// API token of the task service (developer settings)
    #[arg(
        long,
        alias = "todoist_api_token",
        env = "TODOIST_API_TOKEN",
        hide_env_values = true
    )]
    token: Option<String>,
    /// Base URL of the task service REST API
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,
}

impl RemoteArgs {
    fn client(self) -> Result<RestClient> {
        RestClient::new(self.token.unwrap_or_default(), self.api_base_url)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, map and merge into a new backup file
    Migrate {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Read source data from a snapshot file instead of the API
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Existing backup to merge into
        #[arg(long, alias = "super_productivity_json_file")]
        backup: Option<PathBuf>,
        /// Default fields for new projects (JSON object)
        #[arg(long)]
        template: Option<PathBuf>,
        /// Where to write the merged backup
        #[arg(long, short, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,
        /// Comma-separated collection project names; `__` stands for a space
        #[arg(long, alias = "collection_projects", default_value = "")]
        collection_projects: String,
        /// Behaviour when fetching projects or tasks fails
        #[arg(long, value_enum, default_value = "abort")]
        on_fetch_failure: FetchPolicy,
        /// Fail instead of skipping tasks that cannot be placed
        #[arg(long)]
        strict: bool,
        /// Do everything except writing the output file
        #[arg(long)]
        dry_run: bool,
    },
    /// Save the current source data to a snapshot file
    Fetch {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Snapshot file to write
        #[arg(long, short)]
        output: PathBuf,
    },
}

fn run(cli: Cli) -> Result<()> {
    let format = cli.format;
    match cli.command {
        Commands::Migrate {
            remote,
            snapshot,
            backup,
            template,
            output,
            collection_projects,
            on_fetch_failure,
            strict,
            dry_run,
        } => {
            let source: Box<dyn TaskSource> = match snapshot {
                Some(path) => Box::new(SnapshotSource::open(&path)?),
                None => Box::new(remote.client()?),
            };
            let options = MigrateOptions {
                backup,
                template,
                output,
                collections: CollectionProjects::parse(&collection_projects),
                fetch_policy: on_fetch_failure,
                strict,
                dry_run,
            };
            tdsp::commands::migrate::run(source.as_ref(), &options, format)
        }
        Commands::Fetch { remote, output } => {
            tdsp::commands::fetch::run(&remote.client()?, &output, format)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    tdsp::logging::init(cli.verbose);

    let format = cli.format;
    if let Err(e) = run(cli) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            Format::Pretty => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
