//! Sample repository documents

use graphline_rdf::ResourceGraph;
use graphline_rdf::vocab::{dco, dco_sample, vivo};
use serde_json::{Value, json};

use super::Projector;
use super::common::{begin, first_value, most_specific_type, thumbnail, typed_refs};
use crate::document::{Projection, SkipReason};
use crate::kind::Kind;

pub struct SampleRepositoryProjector;

impl Projector for SampleRepositoryProjector {
    fn kind(&self) -> Kind {
        Kind::SampleRepository
    }

    fn project(&self, graph: &ResourceGraph, uri: &str) -> Projection {
        let Some((repo, mut doc)) = begin(Kind::SampleRepository, graph, uri) else {
            return Projection::Skipped(SkipReason::MissingLabel);
        };

        doc.insert_opt("mostSpecificType", most_specific_type(&repo));
        let descriptions: Vec<Value> = repo
            .objects(vivo::DESCRIPTION)
            .iter()
            .filter_map(|d| d.literal())
            .filter(|l| !l.value.trim().is_empty())
            .map(|l| json!({"description": l.value}))
            .collect();
        doc.insert_list("repositoryDescriptions", descriptions);
        doc.insert_list(
            "dcoCommunities",
            typed_refs(&repo, dco::ASSOCIATED_DCO_COMMUNITY, dco::RESEARCH_COMMUNITY, "community"),
        );
        doc.insert_opt("onlineCatalog", first_value(&repo, dco::REPOSITORY_ONLINE_CATALOG));
        doc.insert_opt("website", first_value(&repo, dco::REPOSITORY_WEBSITE));
        doc.insert_opt(
            "sampleCurationPractice",
            first_value(&repo, dco_sample::SAMPLE_CURATION_PRACTICE),
        );
        doc.insert_opt("thumbnail", thumbnail(&repo));

        Projection::Document(doc)
    }
}
