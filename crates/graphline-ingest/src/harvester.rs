//! Parallel harvester: DESCRIBE + project every listed entity on a worker pool
//!
//! The entity list is split into fixed per-worker shares up front (see
//! [`WorkQueue`]). Each worker runs the DESCRIBE query for every entity in its
//! share and projects the resulting graph. Per-entity faults
//! stay inside the worker: they are logged and the entity contributes no
//! records. Results are put back into listing order before they are returned.

use std::sync::Mutex;

use anyhow::Context;
use graphline_core::{WorkQueue, into_input_order};
use graphline_kinds::{Projection, Projector};
use graphline_rdf::{SparqlClient, bind_entity};
use indicatif::ProgressBar;

use crate::bulk::{BulkPair, BulkRecordSet, MetadataRecord};

/// Everything a worker needs to turn one entity URI into a bulk pair
pub struct HarvestPlan<'a> {
    pub describe_query: &'a str,
    pub variable: &'a str,
    pub index: &'a str,
    pub type_name: &'a str,
    pub projector: &'a dyn Projector,
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Entities whose DESCRIBE call returned
    pub described: usize,
    pub skipped_missing_label: usize,
    pub dropped_missing_id: usize,
    /// DESCRIBE calls that failed
    pub failed: usize,
}

#[derive(Debug)]
pub struct Harvest {
    pub records: BulkRecordSet,
    pub stats: HarvestStats,
}

enum Outcome {
    Pair(Box<BulkPair>),
    Skipped,
    NoId,
    Failed,
}

/// Describe and project `entities` using `concurrency` workers.
///
/// The returned record set follows the order of `entities` regardless of the
/// order in which workers finish.
pub fn harvest(
    client: &dyn SparqlClient,
    plan: &HarvestPlan<'_>,
    entities: Vec<String>,
    concurrency: usize,
    pb: &ProgressBar,
) -> anyhow::Result<Harvest> {
    let workers = concurrency.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("harvest-{i}"))
        .build()
        .context("failed to build harvester thread pool")?;

    let queue = WorkQueue::new(entities, workers);
    log::info!(
        "Harvesting {} {} entities with {} workers",
        queue.total(),
        plan.type_name,
        workers
    );

    let results: Mutex<Vec<(usize, Outcome)>> = Mutex::new(Vec::with_capacity(queue.total()));

    pool.scope(|s| {
        for worker in 0..queue.workers() {
            let (queue, results) = (&queue, &results);
            s.spawn(move |_| {
                for (idx, uri) in queue.share(worker) {
                    let outcome = process(client, plan, uri);
                    pb.inc(1);
                    results
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .push((idx, outcome));
                }
            });
        }
    });

    let results = results.into_inner().unwrap_or_else(|e| e.into_inner());
    let mut stats = HarvestStats::default();
    let mut records = BulkRecordSet::new();
    for outcome in into_input_order(results) {
        match outcome {
            Outcome::Pair(pair) => {
                stats.described += 1;
                records.push(*pair);
            }
            Outcome::Skipped => {
                stats.described += 1;
                stats.skipped_missing_label += 1;
            }
            Outcome::NoId => {
                stats.described += 1;
                stats.dropped_missing_id += 1;
            }
            Outcome::Failed => stats.failed += 1,
        }
    }

    Ok(Harvest { records, stats })
}

fn process(client: &dyn SparqlClient, plan: &HarvestPlan<'_>, uri: &str) -> Outcome {
    let query = bind_entity(plan.describe_query, plan.variable, uri);
    let graph = match client.describe(&query) {
        Ok(graph) => graph.unwrap_or_default(),
        Err(e) => {
            log::warn!("describe failed for {uri}: {e}");
            return Outcome::Failed;
        }
    };

    let doc = match plan.projector.project(&graph, uri) {
        Projection::Document(doc) => doc,
        Projection::Skipped(reason) => {
            log::debug!("skipped {uri}: {reason}");
            return Outcome::Skipped;
        }
    };

    match MetadataRecord::for_document(plan.index, plan.type_name, &doc) {
        Some(metadata) => Outcome::Pair(Box::new(BulkPair {
            metadata,
            document: doc,
        })),
        None => Outcome::NoId,
    }
}
