//! Entity kinds known to the pipeline

use std::fmt;

use crate::projector::{
    DataTypeProjector, DatasetProjector, InstrumentProjector, PersonProjector, Projector,
    ProjectProjector, PublicationProjector, SampleRepositoryProjector,
};

/// Kinds of DCO entities that can be harvested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Datasets with authors and distributions
    Dataset,
    /// People, their roles and affiliations
    Person,
    /// Field and research projects
    Project,
    /// Articles and other publications
    Publication,
    /// Instruments and field studies
    Instrument,
    /// Data type definitions
    DataType,
    /// Physical sample repositories
    SampleRepository,
}

impl Kind {
    /// Parse kind from its name; accepts plurals and `-`/`_` spellings
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "dataset" | "datasets" => Some(Self::Dataset),
            "person" | "people" => Some(Self::Person),
            "project" | "projects" => Some(Self::Project),
            "publication" | "publications" => Some(Self::Publication),
            "instrument" | "instruments" => Some(Self::Instrument),
            "datatype" | "datatypes" | "data-type" | "data-types" => Some(Self::DataType),
            "sample-repository" | "sample-repositories" => Some(Self::SampleRepository),
            _ => None,
        }
    }

    /// CLI / config name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Person => "person",
            Self::Project => "project",
            Self::Publication => "publication",
            Self::Instrument => "instrument",
            Self::DataType => "datatype",
            Self::SampleRepository => "sample-repository",
        }
    }

    /// Default search index type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SampleRepository => "sample_repository",
            other => other.name(),
        }
    }

    /// SPARQL variable the listing query binds to the entity
    pub fn variable(&self) -> &'static str {
        match self {
            Self::DataType => "dataType",
            Self::SampleRepository => "sampleRepository",
            other => other.name(),
        }
    }

    /// Document field holding the display label
    pub fn label_field(&self) -> &'static str {
        match self {
            Self::Person => "name",
            _ => "title",
        }
    }

    /// Projector for this kind
    pub fn projector(&self) -> &'static dyn Projector {
        match self {
            Self::Dataset => &DatasetProjector,
            Self::Person => &PersonProjector,
            Self::Project => &ProjectProjector,
            Self::Publication => &PublicationProjector,
            Self::Instrument => &InstrumentProjector,
            Self::DataType => &DataTypeProjector,
            Self::SampleRepository => &SampleRepositoryProjector,
        }
    }

    /// All kinds, in display order
    pub fn all() -> &'static [Kind] {
        &[
            Self::Dataset,
            Self::Person,
            Self::Project,
            Self::Publication,
            Self::Instrument,
            Self::DataType,
            Self::SampleRepository,
        ]
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
