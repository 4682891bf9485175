//! SPARQL endpoint client: SELECT → bindings, DESCRIBE → resource graph

use graphline_core::{HttpError, execute, http_client};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::graph::ResourceGraph;

const SELECT_ACCEPT: &str = "application/sparql-results+json";
const DESCRIBE_ACCEPT: &str = "application/rdf+json";

/// Kind of a bound value in a SELECT result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Uri,
    #[serde(alias = "typed-literal")]
    Literal,
    Bnode,
}

/// One bound variable: value string plus its kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BindingValue {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    pub value: String,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(default, rename = "xml:lang")]
    pub lang: Option<String>,
}

/// One result row: variable name → value
pub type Binding = FxHashMap<String, BindingValue>;

#[derive(Debug, Deserialize)]
struct SelectEnvelope {
    results: SelectResults,
}

#[derive(Debug, Deserialize)]
struct SelectResults {
    bindings: Vec<Binding>,
}

/// Failure of a SPARQL operation
#[derive(Debug)]
pub enum QueryError {
    /// Transport or HTTP failure talking to the endpoint
    Endpoint(HttpError),
    /// A result row is missing the expected variable binding
    MalformedResult { message: String },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Endpoint(e) => write!(f, "SPARQL endpoint: {e}"),
            Self::MalformedResult { message } => write!(f, "malformed SPARQL result: {message}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Endpoint(e) => Some(e),
            Self::MalformedResult { .. } => None,
        }
    }
}

impl From<HttpError> for QueryError {
    fn from(e: HttpError) -> Self {
        Self::Endpoint(e)
    }
}

/// The two operations the pipeline needs from a SPARQL endpoint.
///
/// Implementations must be shareable across harvester workers.
pub trait SparqlClient: Send + Sync {
    /// Run a SELECT query and return its result rows.
    fn select(&self, query: &str) -> Result<Vec<Binding>, QueryError>;

    /// Run a DESCRIBE query.
    ///
    /// `Ok(None)` means the endpoint answered but had nothing usable to say
    /// about the resource; callers treat it like an empty description.
    fn describe(&self, query: &str) -> Result<Option<ResourceGraph>, QueryError>;
}

/// SPARQL protocol client over HTTP POST (form-encoded `query`).
///
/// No caching; every call is a fresh round trip on the shared client, which
/// carries the configured request timeout.
#[derive(Debug, Clone)]
pub struct HttpSparqlClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSparqlClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: http_client().clone(),
        }
    }

    fn post(&self, query: &str, accept: &str) -> Result<graphline_core::HttpResponse, HttpError> {
        let request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, accept)
            .form(&[("query", query)]);
        execute(request)?.error_for_status()
    }
}

impl SparqlClient for HttpSparqlClient {
    fn select(&self, query: &str) -> Result<Vec<Binding>, QueryError> {
        let response = self.post(query, SELECT_ACCEPT)?;
        parse_select(&response.body)
    }

    fn describe(&self, query: &str) -> Result<Option<ResourceGraph>, QueryError> {
        let response = self.post(query, DESCRIBE_ACCEPT)?;
        Ok(parse_describe(response.status, &response.body))
    }
}

/// Parse a SPARQL JSON results envelope into its binding rows.
///
/// A body that is not an envelope is an endpoint fault, same as a bad status.
pub fn parse_select(body: &str) -> Result<Vec<Binding>, QueryError> {
    serde_json::from_str::<SelectEnvelope>(body)
        .map(|env| env.results.bindings)
        .map_err(|e| {
            QueryError::Endpoint(HttpError {
                status: None,
                message: format!("invalid results envelope: {e}"),
            })
        })
}

/// Interpret a DESCRIBE response body; unusable bodies become `None`.
pub fn parse_describe(status: u16, body: &str) -> Option<ResourceGraph> {
    if status == 204 || body.trim().is_empty() {
        log::debug!("DESCRIBE returned no content");
        return None;
    }
    match ResourceGraph::from_rdf_json(body) {
        Ok(graph) => Some(graph),
        Err(e) => {
            log::warn!("DESCRIBE result ignored: {e}");
            None
        }
    }
}
