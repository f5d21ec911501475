//! `goctx` — drive the gocontext service from a shell.
//!
//! The production transport (an MCP-style request loop) lives outside this
//! repository; this binary exercises the same three facade operations and
//! prints their JSON responses.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use goctx_config::Config;
use goctx_service::{
    ContextService, IndexCodebaseRequest, SearchCodeRequest, SearchFiltersRequest, StatusRequest,
};

#[derive(Parser)]
#[command(name = "goctx", about = "Semantic code context for Go repositories")]
struct Cli {
    /// Project root (defaults to the current directory).
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Log debug detail.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log errors only.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index (or re-index) the project.
    Index {
        #[arg(long)]
        force: bool,
        #[arg(long)]
        skip_tests: bool,
        #[arg(long)]
        include_vendor: bool,
    },
    /// Search the indexed project.
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: i64,
        /// vector | keyword | hybrid
        #[arg(long, default_value = "hybrid")]
        mode: String,
        /// Restrict to symbol kinds (repeatable).
        #[arg(long = "kind")]
        kinds: Vec<String>,
        /// Restrict to packages (repeatable).
        #[arg(long = "package")]
        packages: Vec<String>,
        /// Restrict to file paths matching a glob.
        #[arg(long)]
        file_pattern: Option<String>,
        /// Restrict to DDD roles (repeatable).
        #[arg(long = "ddd")]
        ddd: Vec<String>,
        #[arg(long)]
        min_relevance: Option<f64>,
    },
    /// Show index status and health.
    Status,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("goctx error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let root = match &cli.project {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let config = Config::load(&root).context("failed to load configuration")?;
    let service = ContextService::open(&root, &config)
        .await
        .context("failed to open gocontext service")?;
    let path = service.root().display().to_string();
    let cancel = CancellationToken::new();

    match cli.command {
        Commands::Index {
            force,
            skip_tests,
            include_vendor,
        } => {
            let response = service
                .index_codebase(
                    &IndexCodebaseRequest {
                        path,
                        force_reindex: force,
                        include_tests: !skip_tests,
                        include_vendor,
                    },
                    &cancel,
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Search {
            query,
            limit,
            mode,
            kinds,
            packages,
            file_pattern,
            ddd,
            min_relevance,
        } => {
            let has_filters = !kinds.is_empty()
                || !packages.is_empty()
                || file_pattern.is_some()
                || !ddd.is_empty()
                || min_relevance.is_some();
            let filters = has_filters.then_some(SearchFiltersRequest {
                symbol_types: kinds,
                packages,
                file_pattern,
                ddd_patterns: ddd,
                min_relevance,
            });
            let response = service
                .search_code(
                    &SearchCodeRequest {
                        path,
                        query,
                        limit,
                        search_mode: mode,
                        filters,
                    },
                    &cancel,
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Status => {
            let response = service.get_status(&StatusRequest { path }).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GOCTX_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
