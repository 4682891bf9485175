//! Graphline ingest: harvest one entity kind from SPARQL into a search index
//!
//! ```text
//! list (SELECT) -> harvest (DESCRIBE + project, parallel) -> bulk file -> publish
//! ```

pub mod bulk;
pub mod harvester;
pub mod kind;
pub mod publisher;
pub mod runner;

pub use bulk::{BulkPair, BulkRecordSet, MetadataRecord, read_payload};
pub use harvester::{Harvest, HarvestPlan, HarvestStats, harvest};
pub use kind::{DEFAULT_INDEX, KindConfig, KindOverrides, Queries};
pub use publisher::{
    HttpIndexTransport, IndexRequest, IndexTransport, PublishError, PublishReport, PublishRequest,
    PublishStage, inspect_bulk_response, publish,
};
pub use runner::{PublishTarget, RunOptions, Summary, republish, run, run_with};
