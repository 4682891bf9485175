//! Publish subcommand - push an existing bulk file to the search index

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use graphline_core::fmt_num;
use graphline_ingest::{HttpIndexTransport, PublishTarget, republish};
use graphline_kinds::Kind;

use super::{parse_kind, print_summary};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Entity kind the bulk file was harvested for
    #[arg(value_parser = parse_kind)]
    pub kind: Kind,

    /// Bulk file written by `graphline harvest`
    pub bulk_file: PathBuf,

    /// Delete and recreate the index first
    #[arg(long)]
    pub rebuild: bool,

    /// Mapping document (overrides the kind's configured mapping)
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Search index service URL
    #[arg(long)]
    pub es: Option<String>,
}

pub fn run(args: PublishArgs, config: &Config) -> Result<()> {
    let mut kind_config = config.kind_config(args.kind);
    if let Some(mapping) = args.mapping {
        kind_config.mapping = mapping;
    }
    let target = PublishTarget {
        endpoint: args.es.unwrap_or_else(|| config.index.endpoint.clone()),
        rebuild: args.rebuild,
    };
    log::info!(
        "Publishing {} to {}/{}",
        args.bulk_file.display(),
        target.endpoint,
        kind_config.index
    );

    let report = republish(&kind_config, &target, &args.bulk_file, &HttpIndexTransport)?;
    print_summary(
        &format!("{} publish", args.kind),
        &[
            ("Index", kind_config.index.clone()),
            ("Items", fmt_num(report.items)),
            ("Rejected items", fmt_num(report.item_errors)),
            ("HTTP calls", report.calls.to_string()),
        ],
    );
    Ok(())
}
