//! Resource graph → document projection, one projector per kind

pub mod common;
pub mod datatype;
pub mod dataset;
pub mod instrument;
pub mod person;
pub mod project;
pub mod publication;
pub mod sample_repository;

use graphline_rdf::ResourceGraph;

use crate::document::Projection;
use crate::kind::Kind;

/// Pure mapping from one entity's described graph to its document.
///
/// Implementations resolve the display label first and return
/// [`Projection::Skipped`] without it. Every other field is optional.
pub trait Projector: Send + Sync {
    fn kind(&self) -> Kind;

    fn project(&self, graph: &ResourceGraph, uri: &str) -> Projection;
}

// Re-exports
pub use dataset::DatasetProjector;
pub use datatype::DataTypeProjector;
pub use instrument::InstrumentProjector;
pub use person::PersonProjector;
pub use project::ProjectProjector;
pub use publication::PublicationProjector;
pub use sample_repository::SampleRepositoryProjector;
