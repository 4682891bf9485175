//! In-memory RDF resource graph built from a DESCRIBE response.
//!
//! Triples are indexed by subject and keep the order in which the endpoint
//! serialized them. [`Node`] is a cheap view of one term inside the graph,
//! used by projectors to walk outgoing and incoming edges.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::vocab::{rdf, rdfs};

/// RDF literal with optional datatype / language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    pub datatype: Option<String>,
    pub lang: Option<String>,
}

impl Literal {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype.into()),
            lang: None,
        }
    }

    /// Integer value, whatever the declared datatype
    pub fn as_i64(&self) -> Option<i64> {
        self.value.trim().parse().ok()
    }
}

/// Subject or object position of a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(s: impl Into<String>) -> Self {
        Self::Iri(s.into())
    }

    pub fn blank(s: impl Into<String>) -> Self {
        Self::Blank(s.into())
    }

    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(Literal::plain(s))
    }

    /// Subject key as written in RDF/JSON (`_:id` for blank nodes)
    fn from_subject_key(key: &str) -> Self {
        match key.strip_prefix("_:") {
            Some(id) => Self::Blank(id.to_string()),
            None => Self::Iri(key.to_string()),
        }
    }

    /// IRI, blank id, or literal lexical value
    pub fn as_str(&self) -> &str {
        match self {
            Self::Iri(s) | Self::Blank(s) => s,
            Self::Literal(l) => &l.value,
        }
    }
}

/// Substring after the last `/` (whole string when there is none)
pub fn local_name(s: &str) -> &str {
    s.rsplit('/').next().unwrap_or(s)
}

/// Response body could not be read as RDF/JSON
#[derive(Debug)]
pub struct GraphParseError(pub String);

impl std::fmt::Display for GraphParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid RDF/JSON: {}", self.0)
    }
}

impl std::error::Error for GraphParseError {}

/// One object entry of an RDF/JSON predicate array
#[derive(Debug, Deserialize)]
struct RdfJsonObject {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    datatype: Option<String>,
}

impl RdfJsonObject {
    fn into_term(self) -> Result<Term, GraphParseError> {
        match self.kind.as_str() {
            "uri" => Ok(Term::Iri(self.value)),
            "bnode" => Ok(Term::Blank(
                self.value
                    .strip_prefix("_:")
                    .unwrap_or(&self.value)
                    .to_string(),
            )),
            "literal" => Ok(Term::Literal(Literal {
                value: self.value,
                datatype: self.datatype,
                lang: self.lang,
            })),
            other => Err(GraphParseError(format!("unknown object type '{other}'"))),
        }
    }
}

/// Triples of one DESCRIBE result, indexed by subject.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    /// Subjects in first-seen order
    subjects: Vec<Term>,
    edges: FxHashMap<Term, Vec<(String, Term)>>,
    triple_count: usize,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an RDF/JSON document: `{subject: {predicate: [{type, value, ...}]}}`
    pub fn from_rdf_json(body: &str) -> Result<Self, GraphParseError> {
        let root: serde_json::Value =
            serde_json::from_str(body).map_err(|e| GraphParseError(e.to_string()))?;
        let subjects = root
            .as_object()
            .ok_or_else(|| GraphParseError("top level is not an object".to_string()))?;

        let mut graph = Self::new();
        for (subject, predicates) in subjects {
            let predicates = predicates.as_object().ok_or_else(|| {
                GraphParseError(format!("predicates of {subject} are not an object"))
            })?;
            let subject = Term::from_subject_key(subject);
            for (predicate, objects) in predicates {
                let objects: Vec<RdfJsonObject> = serde_json::from_value(objects.clone())
                    .map_err(|e| GraphParseError(format!("{predicate}: {e}")))?;
                for object in objects {
                    graph.insert(subject.clone(), predicate, object.into_term()?);
                }
            }
        }
        Ok(graph)
    }

    /// Add one triple; duplicates are ignored
    pub fn insert(&mut self, subject: Term, predicate: &str, object: Term) {
        if !self.edges.contains_key(&subject) {
            self.subjects.push(subject.clone());
        }
        let edges = self.edges.entry(subject).or_default();
        if edges.iter().any(|(p, o)| p == predicate && *o == object) {
            return;
        }
        edges.push((predicate.to_string(), object));
        self.triple_count += 1;
    }

    /// Builder-style [`insert`](Self::insert) for IRIs and literals
    pub fn with(mut self, subject: &str, predicate: &str, object: Term) -> Self {
        self.insert(Term::from_subject_key(subject), predicate, object);
        self
    }

    /// Number of distinct triples
    pub fn len(&self) -> usize {
        self.triple_count
    }

    pub fn is_empty(&self) -> bool {
        self.triple_count == 0
    }

    /// View of the resource named by `iri` (it need not occur in the graph)
    pub fn resource(&self, iri: &str) -> Node<'_> {
        Node {
            graph: self,
            term: Term::iri(iri),
        }
    }

    fn objects_of<'g>(&'g self, subject: &Term, predicate: &str) -> impl Iterator<Item = &'g Term> {
        let predicate = predicate.to_string();
        self.edges
            .get(subject)
            .into_iter()
            .flatten()
            .filter(move |(p, _)| *p == predicate)
            .map(|(_, o)| o)
    }

    fn subjects_of<'g>(&'g self, predicate: &str, object: &Term) -> Vec<&'g Term> {
        self.subjects
            .iter()
            .filter(|s| self.objects_of(s, predicate).any(|o| o == object))
            .collect()
    }
}

/// A term positioned inside a [`ResourceGraph`].
#[derive(Debug, Clone)]
pub struct Node<'g> {
    graph: &'g ResourceGraph,
    term: Term,
}

impl<'g> Node<'g> {
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// IRI, blank id, or literal value
    pub fn identifier(&self) -> &str {
        self.term.as_str()
    }

    pub fn iri(&self) -> Option<&str> {
        match &self.term {
            Term::Iri(s) => Some(s),
            _ => None,
        }
    }

    pub fn literal(&self) -> Option<&Literal> {
        match &self.term {
            Term::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.term, Term::Literal(_))
    }

    /// Objects of outgoing `predicate` edges, in graph order
    pub fn objects(&self, predicate: &str) -> Vec<Node<'g>> {
        if self.is_literal() {
            return Vec::new();
        }
        self.graph
            .objects_of(&self.term, predicate)
            .map(|t| Node {
                graph: self.graph,
                term: t.clone(),
            })
            .collect()
    }

    /// First object of `predicate`, if any
    pub fn object(&self, predicate: &str) -> Option<Node<'g>> {
        self.objects(predicate).into_iter().next()
    }

    /// Subjects of incoming `predicate` edges pointing at this node
    pub fn subjects(&self, predicate: &str) -> Vec<Node<'g>> {
        self.graph
            .subjects_of(predicate, &self.term)
            .into_iter()
            .map(|t| Node {
                graph: self.graph,
                term: t.clone(),
            })
            .collect()
    }

    /// First non-empty `rdfs:label` literal
    pub fn label(&self) -> Option<String> {
        self.objects(rdfs::LABEL)
            .into_iter()
            .filter_map(|n| n.literal().map(|l| l.value.clone()))
            .find(|s| !s.trim().is_empty())
    }

    /// Whether an `rdf:type` edge points at `class`
    pub fn has_type(&self, class: &str) -> bool {
        self.graph
            .objects_of(&self.term, rdf::TYPE)
            .any(|t| t.as_str() == class)
    }

    /// Local name of the identifier (after the last `/`)
    pub fn local_name(&self) -> &str {
        local_name(self.identifier())
    }
}
