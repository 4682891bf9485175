//! Bulk publisher: index rebuild, mapping push with one retry, bulk write
//!
//! The publish sequence is
//! `Idle -> (RebuildIndex) -> PushMapping -> (RetryMapping) -> BulkWrite -> Done`.
//! Any fatal step moves to `Failed` and later steps are not attempted. Nothing
//! is rolled back: a failure after a rebuild leaves an empty index behind.

use std::fmt;

use graphline_core::{HttpError, HttpResponse, execute, http_client};
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

pub const JSON: &str = "application/json";
pub const NDJSON: &str = "application/x-ndjson";

/// One call against the index REST surface
#[derive(Debug, Clone)]
pub struct IndexRequest<'a> {
    pub method: Method,
    pub url: String,
    pub body: Option<&'a str>,
    pub content_type: &'static str,
}

/// Sends index requests. Non-2xx statuses come back as responses.
pub trait IndexTransport: Send + Sync {
    fn send(&self, request: IndexRequest<'_>) -> Result<HttpResponse, HttpError>;
}

/// [`IndexTransport`] over the shared HTTP client
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpIndexTransport;

impl IndexTransport for HttpIndexTransport {
    fn send(&self, request: IndexRequest<'_>) -> Result<HttpResponse, HttpError> {
        let mut builder = http_client().request(request.method, &request.url);
        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, request.content_type)
                .body(body.to_string());
        }
        execute(builder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    Idle,
    RebuildIndex,
    PushMapping,
    RetryMapping,
    BulkWrite,
    Done,
    Failed,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::RebuildIndex => "rebuild index",
            Self::PushMapping => "push mapping",
            Self::RetryMapping => "retry mapping",
            Self::BulkWrite => "bulk write",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Fatal failure of one publish step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishError {
    /// Step that failed
    pub stage: PublishStage,
    pub url: String,
    /// `None` when no response was received
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(s) => write!(f, "{} failed ({}): HTTP {s}: {}", self.stage, self.url, self.message),
            None => write!(f, "{} failed ({}): {}", self.stage, self.url, self.message),
        }
    }
}

impl std::error::Error for PublishError {}

/// What to publish and where
#[derive(Debug, Clone, Copy)]
pub struct PublishRequest<'a> {
    /// Index server base URL; a trailing `/` is ignored
    pub endpoint: &'a str,
    pub index: &'a str,
    pub type_name: &'a str,
    /// Mapping document for `type_name`
    pub mapping: &'a str,
    /// Newline-delimited bulk body
    pub payload: &'a str,
    /// Delete and recreate the index first
    pub rebuild: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// HTTP calls issued
    pub calls: usize,
    pub mapping_retried: bool,
    /// Items in the bulk response
    pub items: usize,
    /// Items the index rejected inside a successful bulk response
    pub item_errors: usize,
}

/// Run the publish sequence through `transport`.
pub fn publish(
    transport: &dyn IndexTransport,
    request: &PublishRequest<'_>,
) -> Result<PublishReport, PublishError> {
    let mut session = Session {
        transport,
        stage: PublishStage::Idle,
        report: PublishReport::default(),
    };
    match session.run(request) {
        Ok(()) => {
            session.enter(PublishStage::Done);
            Ok(session.report)
        }
        Err(e) => {
            session.enter(PublishStage::Failed);
            log::error!("publish to {} aborted: {e}", request.index);
            Err(e)
        }
    }
}

struct Session<'t> {
    transport: &'t dyn IndexTransport,
    stage: PublishStage,
    report: PublishReport,
}

impl Session<'_> {
    fn enter(&mut self, stage: PublishStage) {
        log::debug!("publish: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn run(&mut self, req: &PublishRequest<'_>) -> Result<(), PublishError> {
        let base = req.endpoint.trim_end_matches('/');
        let index_url = format!("{base}/{}", req.index);
        let mapping_url = format!("{index_url}/{}/_mapping", req.type_name);

        if req.rebuild {
            self.enter(PublishStage::RebuildIndex);
            // a missing index is fine here
            if let Err(e) = self.call(Method::DELETE, &index_url, None, JSON) {
                log::warn!("{e}");
            }
            self.call(Method::PUT, &index_url, None, JSON)?;
            log::info!("Recreated index {index_url}");
        }

        self.enter(PublishStage::PushMapping);
        if let Err(first) = self.call(Method::PUT, &mapping_url, Some(req.mapping), JSON) {
            log::warn!("{first}; deleting mapping and retrying once");
            self.enter(PublishStage::RetryMapping);
            self.report.mapping_retried = true;
            if let Err(e) = self.call(Method::DELETE, &mapping_url, None, JSON) {
                log::warn!("{e}");
            }
            self.call(Method::PUT, &mapping_url, Some(req.mapping), JSON)?;
        }
        log::info!("Pushed mapping {mapping_url}");

        self.enter(PublishStage::BulkWrite);
        if req.payload.is_empty() {
            log::warn!("No records to publish to {}", req.index);
            return Ok(());
        }
        let response = self.call(Method::POST, &format!("{base}/_bulk"), Some(req.payload), NDJSON)?;
        let (items, item_errors) = inspect_bulk_response(&response.body);
        self.report.items = items;
        self.report.item_errors = item_errors;
        if item_errors > 0 {
            log::warn!("{item_errors} of {items} bulk items rejected by {}", req.index);
        } else {
            log::info!("Bulk wrote {items} items to {}", req.index);
        }
        Ok(())
    }

    /// One request; anything but a 2xx response fails the current stage
    fn call(
        &mut self,
        method: Method,
        url: &str,
        body: Option<&str>,
        content_type: &'static str,
    ) -> Result<HttpResponse, PublishError> {
        self.report.calls += 1;
        log::debug!("{method} {url}");
        let request = IndexRequest {
            method,
            url: url.to_string(),
            body,
            content_type,
        };
        let stage = self.stage;
        let fail = |status, message| PublishError {
            stage,
            url: url.to_string(),
            status,
            message,
        };
        let response = self
            .transport
            .send(request)
            .map_err(|e| fail(e.status, e.message))?;
        response
            .error_for_status()
            .map_err(|e| fail(e.status, e.message))
    }
}

/// Count items, and items carrying an `error`, in a `_bulk` response body.
///
/// Unparseable bodies count as zero items.
pub fn inspect_bulk_response(body: &str) -> (usize, usize) {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        log::debug!("bulk response is not JSON");
        return (0, 0);
    };
    let items = value
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if value.get("errors").and_then(Value::as_bool) != Some(true) {
        return (items.len(), 0);
    }
    let mut errors = 0;
    for item in items {
        let failure = item
            .as_object()
            .and_then(|actions| actions.values().find_map(|a| a.get("error")));
        if let Some(error) = failure {
            if errors == 0 {
                log::warn!("first rejected bulk item: {error}");
            }
            errors += 1;
        }
    }
    (items.len(), errors)
}
