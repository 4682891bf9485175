//! Instrument documents

use graphline_rdf::ResourceGraph;
use graphline_rdf::vocab::{dco, vivo};

use super::Projector;
use super::common::{begin, literal, most_specific_type, single_ref, thumbnail, typed_refs};
use crate::document::{Projection, SkipReason};
use crate::kind::Kind;

pub struct InstrumentProjector;

impl Projector for InstrumentProjector {
    fn kind(&self) -> Kind {
        Kind::Instrument
    }

    fn project(&self, graph: &ResourceGraph, uri: &str) -> Projection {
        let Some((ins, mut doc)) = begin(Kind::Instrument, graph, uri) else {
            return Projection::Skipped(SkipReason::MissingLabel);
        };

        doc.insert_opt("mostSpecificType", most_specific_type(&ins));
        doc.insert_opt("description", literal(&ins, vivo::DESCRIPTION));
        doc.insert_opt("initiative", single_ref(&ins, dco::BUILT_DURING_INITIATIVE, "initiative"));
        doc.insert_opt("org", single_ref(&ins, vivo::EQUIPMENT_FOR, "org"));
        doc.insert_list(
            "dcoCommunities",
            typed_refs(&ins, dco::ASSOCIATED_DCO_COMMUNITY, dco::RESEARCH_COMMUNITY, "community"),
        );
        doc.insert_opt("project", single_ref(&ins, dco::INSTRUMENT_CREATED_BY, "project"));
        doc.insert_opt("thumbnail", thumbnail(&ins));

        Projection::Document(doc)
    }
}
