//! Dataset documents

use graphline_rdf::ResourceGraph;
use graphline_rdf::vocab::{bibo, dco};

use super::Projector;
use super::common::{
    authors, begin, distributions, labeled_refs, literal, most_specific_type,
};
use crate::document::{Projection, SkipReason};
use crate::kind::Kind;

pub struct DatasetProjector;

impl Projector for DatasetProjector {
    fn kind(&self) -> Kind {
        Kind::Dataset
    }

    fn project(&self, graph: &ResourceGraph, uri: &str) -> Projection {
        let Some((ds, mut doc)) = begin(Kind::Dataset, graph, uri) else {
            return Projection::Skipped(SkipReason::MissingLabel);
        };

        doc.insert_opt("doi", literal(&ds, bibo::DOI));
        doc.insert_opt("abstract", literal(&ds, bibo::ABSTRACT));
        doc.insert_opt("mostSpecificType", most_specific_type(&ds));
        doc.insert_opt("publicationYear", literal(&ds, dco::YEAR_OF_PUBLICATION));
        doc.insert_list("dcoCommunities", labeled_refs(&ds, dco::ASSOCIATED_DCO_COMMUNITY));
        doc.insert_list("portalGroups", labeled_refs(&ds, dco::ASSOCIATED_DCO_PORTAL_GROUP));
        doc.insert_list("projects", labeled_refs(&ds, dco::IS_DATASET_OF));
        doc.insert_list("dataTypes", labeled_refs(&ds, dco::HAS_DATA_TYPE));
        doc.insert_list("citations", labeled_refs(&ds, bibo::CITES));
        doc.insert_list("authors", authors(&ds));
        doc.insert_list("distributions", distributions(&ds));

        Projection::Document(doc)
    }
}
