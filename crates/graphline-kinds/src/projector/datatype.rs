//! Data type documents

use graphline_rdf::vocab::{dco, prov};
use graphline_rdf::{Node, ResourceGraph};
use serde_json::{Value, json};

use super::Projector;
use super::common::{begin, literal, typed_refs};
use crate::document::{Projection, SkipReason};
use crate::kind::Kind;

pub struct DataTypeProjector;

impl Projector for DataTypeProjector {
    fn kind(&self) -> Kind {
        Kind::DataType
    }

    fn project(&self, graph: &ResourceGraph, uri: &str) -> Projection {
        let Some((dt, mut doc)) = begin(Kind::DataType, graph, uri) else {
            return Projection::Skipped(SkipReason::MissingLabel);
        };

        doc.insert_opt("creationYear", literal(&dt, dco::CREATED_AT_TIME));
        doc.insert_opt("sourceDataType", titled_ref(&dt, dco::SOURCE_DATA_TYPE));
        doc.insert_opt("sourceStandard", titled_ref(&dt, dco::SOURCE_STANDARD));
        doc.insert_list(
            "authors",
            typed_refs(&dt, prov::WAS_ATTRIBUTED_TO, prov::AGENT, "author"),
        );
        doc.insert_list("subjectAreas", titled_refs(&dt, dco::DATA_TYPE_SUBJECT_AREA));

        Projection::Document(doc)
    }
}

/// `{uri, title?}`: the reference is kept even when its target has no label
fn titled(node: &Node<'_>) -> Value {
    match node.label() {
        Some(title) => json!({"uri": node.identifier(), "title": title}),
        None => json!({"uri": node.identifier()}),
    }
}

fn titled_ref(dt: &Node<'_>, predicate: &str) -> Option<Value> {
    dt.object(predicate).map(|o| titled(&o))
}

fn titled_refs(dt: &Node<'_>, predicate: &str) -> Vec<Value> {
    dt.objects(predicate).iter().map(titled).collect()
}
