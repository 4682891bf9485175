//! Graphline Core - Common infrastructure for graph-to-index pipelines
//!
//! Blocking HTTP over a shared async client, logging, progress reporting,
//! and the work queue used by the parallel harvester.

pub mod http;
pub mod logging;
pub mod progress;
pub mod work_queue;

// Re-exports for convenience
pub use http::{
    HttpConfig, HttpError, HttpResponse, SHARED_RUNTIME, execute, http_client, http_config,
    set_http_config,
};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use work_queue::{WorkQueue, into_input_order};
