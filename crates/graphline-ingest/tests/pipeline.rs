//! End-to-end runs over an in-memory SPARQL endpoint and index.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, Once};

use graphline_core::{HttpError, HttpResponse, ProgressContext};
use graphline_ingest::{
    IndexRequest, IndexTransport, KindConfig, PublishTarget, RunOptions, run_with,
};
use graphline_kinds::Kind;
use graphline_rdf::vocab::{dco, rdfs};
use graphline_rdf::{Binding, BindingValue, QueryError, ResourceGraph, SparqlClient, Term, ValueKind};
use rustc_hash::FxHashMap;
use serde_json::Value;

const BASE: &str = "http://info.deepcarbon.net/individual/";

/// SELECT returns `listed` bound to `variable`; DESCRIBE looks the bound IRI
/// up in `graphs`, failing for IRIs in `failing`.
struct FakeSparql {
    variable: &'static str,
    listed: Vec<String>,
    graphs: FxHashMap<String, ResourceGraph>,
    failing: Vec<String>,
}

impl FakeSparql {
    fn new() -> Self {
        Self::for_kind(Kind::Dataset)
    }

    fn for_kind(kind: Kind) -> Self {
        Self {
            variable: kind.variable(),
            listed: Vec::new(),
            graphs: FxHashMap::default(),
            failing: Vec::new(),
        }
    }

    fn entity(mut self, name: &str, label: Option<&str>, id: Option<&str>) -> Self {
        let uri = format!("{BASE}{name}");
        let mut g = ResourceGraph::new();
        if let Some(label) = label {
            g.insert(Term::iri(&uri), rdfs::LABEL, Term::literal(label));
        }
        if let Some(id) = id {
            g.insert(
                Term::iri(&uri),
                dco::HAS_DCO_ID,
                Term::iri(format!("http://dx.deepcarbon.net/11121/{id}")),
            );
        }
        self.listed.push(uri.clone());
        self.graphs.insert(uri, g);
        self
    }

    fn failing(mut self, name: &str) -> Self {
        let uri = format!("{BASE}{name}");
        self.listed.push(uri.clone());
        self.failing.push(uri);
        self
    }
}

impl SparqlClient for FakeSparql {
    fn select(&self, _query: &str) -> Result<Vec<Binding>, QueryError> {
        Ok(self
            .listed
            .iter()
            .map(|uri| {
                let mut row = Binding::default();
                row.insert(
                    self.variable.to_string(),
                    BindingValue {
                        kind: ValueKind::Uri,
                        value: uri.clone(),
                        datatype: None,
                        lang: None,
                    },
                );
                row
            })
            .collect())
    }

    fn describe(&self, query: &str) -> Result<Option<ResourceGraph>, QueryError> {
        let start = query.find('<').expect("bound IRI") + 1;
        let end = query.find('>').expect("bound IRI");
        let uri = &query[start..end];
        if self.failing.iter().any(|f| f == uri) {
            return Err(QueryError::Endpoint(HttpError {
                status: Some(502),
                message: "bad gateway".into(),
            }));
        }
        Ok(self.graphs.get(uri).cloned())
    }
}

/// Records every call and answers with scripted statuses (200 once exhausted)
struct RecordingIndex {
    calls: Mutex<Vec<String>>,
    statuses: Mutex<VecDeque<u16>>,
}

impl RecordingIndex {
    fn new(statuses: &[u16]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            statuses: Mutex::new(statuses.iter().copied().collect()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl IndexTransport for RecordingIndex {
    fn send(&self, request: IndexRequest<'_>) -> Result<HttpResponse, HttpError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", request.method, request.url));
        let status = self.statuses.lock().unwrap().pop_front().unwrap_or(200);
        Ok(HttpResponse {
            status,
            body: r#"{"errors":false,"items":[]}"#.to_string(),
        })
    }
}

fn kind_config(root: &Path, kind: Kind) -> KindConfig {
    let config = KindConfig::defaults(kind, root);
    let var = kind.variable();
    fs::create_dir_all(root.join("queries")).unwrap();
    fs::create_dir_all(root.join("mappings")).unwrap();
    fs::write(&config.list_query, format!("SELECT ?{var} WHERE {{ ?{var} a <http://x/T> }}")).unwrap();
    fs::write(&config.describe_query, format!("DESCRIBE ?{var}")).unwrap();
    fs::write(&config.mapping, format!(r#"{{"{}":{{"properties":{{}}}}}}"#, kind.type_name())).unwrap();
    config
}

fn dataset_config(root: &Path) -> KindConfig {
    kind_config(root, Kind::Dataset)
}

fn options(root: &Path, publish: Option<PublishTarget>) -> RunOptions {
    RunOptions {
        sparql_endpoint: "http://unused".into(),
        concurrency: 3,
        out: root.join("out/datasets.bulk"),
        publish,
    }
}

/// Log sink shared by every test in this binary
struct CapturedLog(Mutex<Vec<(log::Level, String)>>);

static CAPTURED: CapturedLog = CapturedLog(Mutex::new(Vec::new()));

impl log::Log for CapturedLog {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.0
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

fn captured_log() -> &'static CapturedLog {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURED).unwrap();
        log::set_max_level(log::LevelFilter::Debug);
    });
    &CAPTURED
}

impl CapturedLog {
    fn warnings_mentioning(&self, needle: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, line)| *level == log::Level::Warn && line.contains(needle))
            .count()
    }
}

fn bulk_lines(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn describe_failure_drops_only_that_entity() {
    let dir = tempfile::tempdir().unwrap();
    let config = dataset_config(dir.path());
    let sparql = FakeSparql::new()
        .entity("d1", Some("First"), Some("D1"))
        .failing("d-broken")
        .entity("d2", Some("Second"), Some("D2"));

    let summary = run_with(
        &config,
        &options(dir.path(), None),
        &sparql,
        &RecordingIndex::new(&[]),
        &ProgressContext::hidden(),
    )
    .unwrap();

    assert_eq!(summary.listed, 3);
    assert_eq!(summary.published_records, 2);
    assert_eq!(summary.failed, 1);

    let lines = bulk_lines(&summary.bulk_file);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["index"]["_id"], "D1");
    assert_eq!(lines[0]["index"]["_index"], "dco");
    assert_eq!(lines[0]["index"]["_type"], "dataset");
    assert_eq!(lines[1]["title"], "First");
    assert_eq!(lines[2]["index"]["_id"], "D2");
    assert_eq!(lines[3]["uri"], format!("{BASE}d2"));
}

#[test]
fn entity_without_identifier_is_left_out() {
    let dir = tempfile::tempdir().unwrap();
    let config = dataset_config(dir.path());
    let sparql = FakeSparql::new()
        .entity("d1", Some("Has id"), Some("D1"))
        .entity("d2", Some("No id"), None)
        .entity("d3", None, Some("D3"));

    let summary = run_with(
        &config,
        &options(dir.path(), None),
        &sparql,
        &RecordingIndex::new(&[]),
        &ProgressContext::hidden(),
    )
    .unwrap();

    assert_eq!(summary.published_records, 1);
    assert_eq!(summary.dropped_missing_id, 1);
    assert_eq!(summary.skipped_missing_label, 1);
    let lines = bulk_lines(&summary.bulk_file);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["title"], "Has id");
}

#[test]
fn every_id_is_local_name_of_document_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let config = dataset_config(dir.path());
    let mut sparql = FakeSparql::new();
    for i in 0..12 {
        sparql = sparql.entity(&format!("d{i}"), Some("T"), Some(&format!("6200-{i}")));
    }

    let summary = run_with(
        &config,
        &options(dir.path(), None),
        &sparql,
        &RecordingIndex::new(&[]),
        &ProgressContext::hidden(),
    )
    .unwrap();

    let lines = bulk_lines(&summary.bulk_file);
    assert_eq!(lines.len(), 24);
    for (i, pair) in lines.chunks(2).enumerate() {
        let dco_id = pair[1]["dcoId"].as_str().unwrap();
        let local = dco_id.rsplit('/').next().unwrap();
        assert_eq!(pair[0]["index"]["_id"], local);
        assert_eq!(local, format!("6200-{i}"));
    }
}

#[test]
fn every_unlabeled_entity_is_reported() {
    let log = captured_log();
    let dir = tempfile::tempdir().unwrap();
    let config = dataset_config(dir.path());
    let sparql = FakeSparql::new()
        .entity("unlabeled-1", None, Some("U1"))
        .entity("labeled-2", Some("Kept"), Some("L2"))
        .entity("unlabeled-3", None, None);

    let summary = run_with(
        &config,
        &options(dir.path(), None),
        &sparql,
        &RecordingIndex::new(&[]),
        &ProgressContext::hidden(),
    )
    .unwrap();

    assert_eq!(summary.skipped_missing_label, 2);
    assert_eq!(summary.published_records, 1);
    for name in ["unlabeled-1", "unlabeled-3"] {
        let uri = format!("{BASE}{name}");
        assert_eq!(log.warnings_mentioning(&uri), 1, "{uri}");
        assert!(
            bulk_lines(&summary.bulk_file)
                .iter()
                .all(|line| line["uri"] != uri.as_str()),
            "{uri} must not be in the bulk file"
        );
    }
    assert_eq!(log.warnings_mentioning(&format!("{BASE}labeled-2")), 0);
}

#[test]
fn ids_are_local_names_for_every_kind() {
    for &kind in Kind::all() {
        let dir = tempfile::tempdir().unwrap();
        let config = kind_config(dir.path(), kind);
        let mut sparql = FakeSparql::for_kind(kind);
        for i in 0..4 {
            sparql = sparql.entity(
                &format!("{}-{i}", kind.name()),
                Some("Label"),
                Some(&format!("7{i}-{}", kind.type_name())),
            );
        }
        let opts = RunOptions {
            out: dir.path().join(format!("out/{}.bulk", kind.name())),
            ..options(dir.path(), None)
        };

        let summary = run_with(&config, &opts, &sparql, &RecordingIndex::new(&[]), &ProgressContext::hidden())
            .unwrap();

        assert_eq!(summary.published_records, 4, "{kind:?}");
        let lines = bulk_lines(&summary.bulk_file);
        assert_eq!(lines.len(), 8, "{kind:?}");
        for (i, pair) in lines.chunks(2).enumerate() {
            let dco_id = pair[1]["dcoId"].as_str().unwrap();
            assert_eq!(dco_id, format!("http://dx.deepcarbon.net/11121/7{i}-{}", kind.type_name()));
            assert_eq!(pair[0]["index"]["_id"], dco_id.rsplit('/').next().unwrap());
            assert_eq!(pair[0]["index"]["_type"], kind.type_name());
            assert_eq!(pair[1][kind.label_field()], "Label");
        }
    }
}

#[test]
fn publish_sends_bulk_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let config = dataset_config(dir.path());
    let sparql = FakeSparql::new().entity("d1", Some("First"), Some("D1"));
    let index = RecordingIndex::new(&[]);
    let target = PublishTarget {
        endpoint: "http://es:9200/".into(),
        rebuild: false,
    };

    let summary = run_with(
        &config,
        &options(dir.path(), Some(target)),
        &sparql,
        &index,
        &ProgressContext::hidden(),
    )
    .unwrap();

    assert_eq!(
        index.calls(),
        vec![
            "PUT http://es:9200/dco/dataset/_mapping",
            "POST http://es:9200/_bulk",
        ]
    );
    assert_eq!(summary.publish.unwrap().calls, 2);
}

#[test]
fn publish_failure_keeps_bulk_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dataset_config(dir.path());
    let sparql = FakeSparql::new().entity("d1", Some("First"), Some("D1"));
    // mapping accepted, bulk rejected
    let index = RecordingIndex::new(&[200, 500]);
    let opts = options(
        dir.path(),
        Some(PublishTarget {
            endpoint: "http://es:9200".into(),
            rebuild: false,
        }),
    );

    let err = run_with(&config, &opts, &sparql, &index, &ProgressContext::hidden()).unwrap_err();

    assert!(format!("{err:#}").contains("bulk file kept at"));
    assert_eq!(bulk_lines(&opts.out).len(), 2);
}

#[test]
fn listing_failure_is_fatal() {
    struct Down;
    impl SparqlClient for Down {
        fn select(&self, _query: &str) -> Result<Vec<Binding>, QueryError> {
            Err(QueryError::Endpoint(HttpError {
                status: None,
                message: "connection refused".into(),
            }))
        }
        fn describe(&self, _query: &str) -> Result<Option<ResourceGraph>, QueryError> {
            unreachable!("nothing listed")
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let config = dataset_config(dir.path());
    let opts = options(dir.path(), None);
    let err = run_with(&config, &opts, &Down, &RecordingIndex::new(&[]), &ProgressContext::hidden())
        .unwrap_err();
    assert!(format!("{err:#}").contains("failed to list dataset entities"));
    assert!(!opts.out.exists());
}
