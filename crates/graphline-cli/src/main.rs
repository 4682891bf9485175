//! graphline - SPARQL to search index ingest
//!
//! Lists the entities of one kind from a SPARQL endpoint, describes and
//! projects each one into a search document, writes an Elasticsearch bulk
//! file and optionally publishes it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "graphline")]
#[command(about = "Harvest SPARQL entities into a search index")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path (default: ./graphline.toml or ~/.config/graphline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Harvest one entity kind into a bulk file
    Harvest(cmd::harvest::HarvestArgs),
    /// Publish an existing bulk file
    Publish(cmd::publish::PublishArgs),
    /// Show per-kind queries, index names and mappings
    Kinds,
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = Arc::new(graphline_core::ProgressContext::new());

    // TTY: progress bars show activity, so only warnings unless --debug
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = cli.quiet || (is_tty && !cli.debug);
    graphline_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    graphline_core::set_http_config(config.http_config(cli.timeout));

    match cli.command {
        Command::Harvest(args) => cmd::harvest::run(args, &config, &progress),
        Command::Publish(args) => cmd::publish::run(args, &config),
        Command::Kinds => {
            cmd::kinds::run(&config);
            Ok(())
        }
        Command::Config => {
            let http = config.http_config(cli.timeout);
            cmd::print_summary(
                "Setting",
                &[
                    ("SPARQL endpoint", config.sparql.endpoint.clone()),
                    ("Index endpoint", config.index.endpoint.clone()),
                    ("Query/mapping root", config.paths.root.display().to_string()),
                    (
                        "Workers",
                        format!("{} (max: {})", config.workers.default, config.workers.max),
                    ),
                    ("Connect timeout", format!("{}s", http.connect_timeout.as_secs())),
                    ("Request timeout", format!("{}s", http.request_timeout.as_secs())),
                    ("Kind overrides", config.kinds.len().to_string()),
                ],
            );
            Ok(())
        }
    }
}
