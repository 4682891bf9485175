//! Graphline kinds - per-kind document projection
//!
//! Each entity kind maps the RDF description of one entity onto a
//! search document. Selection happens once, through [`Kind::projector`].
//!
//! # Example
//!
//! ```
//! use graphline_kinds::{Kind, Projection};
//! use graphline_rdf::ResourceGraph;
//!
//! let graph = ResourceGraph::from_rdf_json(r#"{
//!     "http://example.org/ds/1": {
//!         "http://www.w3.org/2000/01/rdf-schema#label": [{"type": "literal", "value": "Rocks"}]
//!     }
//! }"#).unwrap();
//!
//! let projection = Kind::Dataset.projector().project(&graph, "http://example.org/ds/1");
//! let doc = projection.document().unwrap();
//! assert_eq!(doc.to_string(), r#"{"uri":"http://example.org/ds/1","title":"Rocks","dcoId":null}"#);
//! ```

pub mod document;
pub mod kind;
pub mod projector;

// Re-exports for convenience
pub use document::{DCO_ID_FIELD, Document, Projection, SkipReason};
pub use kind::Kind;
pub use projector::Projector;
