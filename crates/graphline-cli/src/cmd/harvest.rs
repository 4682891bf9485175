//! Harvest subcommand - list, describe and project one kind, optionally publish

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use graphline_core::{SharedProgress, fmt_num};
use graphline_ingest::{PublishTarget, RunOptions, Summary};
use graphline_kinds::Kind;

use super::{parse_kind, print_summary};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// Entity kind (dataset, person, project, publication, instrument, datatype, sample-repository)
    #[arg(value_parser = parse_kind)]
    pub kind: Kind,

    /// Bulk file to write
    pub out: PathBuf,

    /// Publish the bulk file to the search index
    #[arg(long)]
    pub publish: bool,

    /// Delete and recreate the index before publishing
    #[arg(long)]
    pub rebuild: bool,

    /// Mapping document (overrides the kind's configured mapping)
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Search index service URL
    #[arg(long)]
    pub es: Option<String>,

    /// SPARQL endpoint
    #[arg(long)]
    pub sparql: Option<String>,

    /// Number of parallel harvest workers
    #[arg(short, long)]
    pub threads: Option<usize>,
}

pub fn run(args: HarvestArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let mut kind_config = config.kind_config(args.kind);
    if let Some(mapping) = args.mapping {
        kind_config.mapping = mapping;
    }
    if args.rebuild && !args.publish {
        log::warn!("--rebuild has no effect without --publish");
    }

    let options = RunOptions {
        sparql_endpoint: args.sparql.unwrap_or_else(|| config.sparql.endpoint.clone()),
        concurrency: config.workers.resolve(args.threads),
        out: args.out,
        publish: args.publish.then(|| PublishTarget {
            endpoint: args.es.unwrap_or_else(|| config.index.endpoint.clone()),
            rebuild: args.rebuild,
        }),
    };
    log::info!(
        "Harvesting {} from {} ({} workers)",
        args.kind,
        options.sparql_endpoint,
        options.concurrency
    );

    let summary = graphline_ingest::run(&kind_config, &options, progress)?;
    if !progress.is_tty() {
        summary.log();
    }
    print_summary(&format!("{} harvest", summary.kind), &summary_rows(&summary));
    Ok(())
}

fn summary_rows(summary: &Summary) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Listed", fmt_num(summary.listed)),
        ("Records written", fmt_num(summary.published_records)),
        ("Missing label", fmt_num(summary.skipped_missing_label)),
        ("Missing identifier", fmt_num(summary.dropped_missing_id)),
        ("Describe failures", fmt_num(summary.failed)),
        ("Bulk file", summary.bulk_file.display().to_string()),
    ];
    if let Some(report) = &summary.publish {
        rows.push(("Published items", fmt_num(report.items)));
        rows.push(("Rejected items", fmt_num(report.item_errors)));
        rows.push((
            "Mapping",
            if report.mapping_retried { "replaced" } else { "updated" }.to_string(),
        ));
    }
    rows.push(("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())));
    rows
}
