//! One kind's pipeline: list, harvest, write the bulk file, publish

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use graphline_core::{ProgressContext, fmt_num};
use graphline_kinds::Kind;
use graphline_rdf::{HttpSparqlClient, SparqlClient, list_entities};

use crate::bulk::read_payload;
use crate::harvester::{HarvestPlan, harvest};
use crate::kind::KindConfig;
use crate::publisher::{
    HttpIndexTransport, IndexTransport, PublishReport, PublishRequest, publish,
};

/// Index server to publish to
#[derive(Debug, Clone)]
pub struct PublishTarget {
    pub endpoint: String,
    /// Delete and recreate the index before pushing the mapping
    pub rebuild: bool,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub sparql_endpoint: String,
    /// Harvest workers
    pub concurrency: usize,
    /// Bulk file to write
    pub out: PathBuf,
    pub publish: Option<PublishTarget>,
}

/// Run the pipeline for one kind against the configured HTTP endpoints.
pub fn run(
    config: &KindConfig,
    options: &RunOptions,
    progress: &ProgressContext,
) -> anyhow::Result<Summary> {
    let client = HttpSparqlClient::new(options.sparql_endpoint.as_str());
    run_with(config, options, &client, &HttpIndexTransport, progress)
}

/// [`run`] with explicit SPARQL and index transports.
///
/// The bulk file is written before any publish attempt, so a publish failure
/// leaves the harvested records on disk.
pub fn run_with(
    config: &KindConfig,
    options: &RunOptions,
    client: &dyn SparqlClient,
    transport: &dyn IndexTransport,
    progress: &ProgressContext,
) -> anyhow::Result<Summary> {
    let start = Instant::now();
    let queries = config.load_queries()?;
    let mapping = match options.publish {
        Some(_) => Some(config.load_mapping()?),
        None => None,
    };

    let stage = progress.stage_line("list");
    stage.set_message(format!("listing {}", config.kind));
    let entities = list_entities(client, &queries.list, &config.variable)
        .with_context(|| format!("failed to list {} entities", config.kind))?;
    stage.finish_and_clear();
    let listed = entities.len();
    log::info!("Listed {} {} entities", fmt_num(listed), config.kind);

    let plan = HarvestPlan {
        describe_query: &queries.describe,
        variable: &config.variable,
        index: &config.index,
        type_name: &config.type_name,
        projector: config.projector(),
    };
    let pb = progress.entity_bar(config.kind.name(), listed);
    let harvested = harvest(client, &plan, entities, options.concurrency, &pb)?;
    pb.finish_and_clear();

    harvested
        .records
        .write_to(&options.out)
        .with_context(|| format!("failed to write bulk file {}", options.out.display()))?;
    log::info!(
        "Wrote {} records to {}",
        fmt_num(harvested.records.len()),
        options.out.display()
    );

    let mut summary = Summary {
        kind: config.kind,
        listed,
        published_records: harvested.records.len(),
        skipped_missing_label: harvested.stats.skipped_missing_label,
        dropped_missing_id: harvested.stats.dropped_missing_id,
        failed: harvested.stats.failed,
        bulk_file: options.out.clone(),
        publish: None,
        elapsed: Duration::ZERO,
    };

    if let (Some(target), Some(mapping)) = (&options.publish, &mapping) {
        let stage = progress.stage_line("publish");
        stage.set_message(format!("{}/{}", target.endpoint, config.index));
        let payload = harvested.records.payload();
        let report = publish(
            transport,
            &PublishRequest {
                endpoint: &target.endpoint,
                index: &config.index,
                type_name: &config.type_name,
                mapping,
                payload: &payload,
                rebuild: target.rebuild,
            },
        );
        stage.finish_and_clear();
        summary.publish = Some(report.with_context(|| {
            format!(
                "failed to publish {}; bulk file kept at {}",
                config.kind,
                options.out.display()
            )
        })?);
    }

    summary.elapsed = start.elapsed();
    Ok(summary)
}

/// Publish an existing bulk file, e.g. after a failed publish step.
pub fn republish(
    config: &KindConfig,
    target: &PublishTarget,
    bulk_file: &Path,
    transport: &dyn IndexTransport,
) -> anyhow::Result<PublishReport> {
    let payload = read_payload(bulk_file)
        .with_context(|| format!("failed to read bulk file {}", bulk_file.display()))?;
    let mapping = config.load_mapping()?;
    let report = publish(
        transport,
        &PublishRequest {
            endpoint: &target.endpoint,
            index: &config.index,
            type_name: &config.type_name,
            mapping: &mapping,
            payload: &payload,
            rebuild: target.rebuild,
        },
    )
    .with_context(|| format!("failed to publish {}", bulk_file.display()))?;
    Ok(report)
}

/// Counts for one kind's run
#[derive(Debug, Clone)]
pub struct Summary {
    pub kind: Kind,
    pub listed: usize,
    /// Record pairs in the bulk file
    pub published_records: usize,
    pub skipped_missing_label: usize,
    pub dropped_missing_id: usize,
    pub failed: usize,
    pub bulk_file: PathBuf,
    pub publish: Option<PublishReport>,
    pub elapsed: Duration,
}

impl Summary {
    pub fn log(&self) {
        log::info!("=== {} Summary ===", self.kind);
        log::info!(
            "Entities: {} listed, {} records written",
            fmt_num(self.listed),
            fmt_num(self.published_records)
        );
        log::info!(
            "Dropped: {} missing label, {} missing identifier, {} failed",
            fmt_num(self.skipped_missing_label),
            fmt_num(self.dropped_missing_id),
            fmt_num(self.failed)
        );
        log::info!("Bulk file: {}", self.bulk_file.display());
        if let Some(report) = &self.publish {
            log::info!(
                "Published: {} items, {} rejected, {} calls{}",
                fmt_num(report.items),
                fmt_num(report.item_errors),
                report.calls,
                if report.mapping_retried { " (mapping retried)" } else { "" }
            );
        }
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_log_does_not_panic() {
        let summary = Summary {
            kind: Kind::Dataset,
            listed: 1200,
            published_records: 1100,
            skipped_missing_label: 50,
            dropped_missing_id: 40,
            failed: 10,
            bulk_file: PathBuf::from("datasets.bulk"),
            publish: Some(PublishReport {
                calls: 4,
                mapping_retried: true,
                items: 1100,
                item_errors: 0,
            }),
            elapsed: Duration::from_secs(42),
        };
        summary.log();
    }
}
