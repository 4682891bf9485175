//! RDF side of graphline: SPARQL access, resource graphs, vocabulary.

pub mod graph;
pub mod lister;
pub mod maybe;
pub mod sparql;
pub mod template;
pub mod vocab;

pub use graph::{GraphParseError, Literal, Node, ResourceGraph, Term, local_name};
pub use lister::list_entities;
pub use maybe::Maybe;
pub use sparql::{
    Binding, BindingValue, HttpSparqlClient, QueryError, SparqlClient, ValueKind, parse_describe,
    parse_select,
};
pub use template::{bind_entity, variable_name};
