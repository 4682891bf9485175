//! Publication documents

use graphline_rdf::vocab::{bibo, dco, vivo};
use graphline_rdf::{Node, ResourceGraph};

use super::Projector;
use super::common::{authors, begin, labeled_refs, literal, most_specific_type, single_ref};
use crate::document::{Projection, SkipReason};
use crate::kind::Kind;

pub struct PublicationProjector;

impl Projector for PublicationProjector {
    fn kind(&self) -> Kind {
        Kind::Publication
    }

    fn project(&self, graph: &ResourceGraph, uri: &str) -> Projection {
        let Some((publication, mut doc)) = begin(Kind::Publication, graph, uri) else {
            return Projection::Skipped(SkipReason::MissingLabel);
        };

        doc.insert_opt("doi", doi(&publication));
        doc.insert_opt("abstract", literal(&publication, bibo::ABSTRACT));
        doc.insert_opt("publicationYear", publication_year(&publication));
        doc.insert_opt("mostSpecificType", most_specific_type(&publication));
        doc.insert_opt(
            "community",
            single_ref(&publication, dco::ASSOCIATED_DCO_COMMUNITY, "community"),
        );
        doc.insert_opt("presentedAt", single_ref(&publication, bibo::PRESENTED_AT, "venue"));
        // one entry per area IRI; the graph already drops repeated triples
        doc.insert_list("subjectArea", labeled_refs(&publication, vivo::HAS_SUBJECT_AREA));
        doc.insert_list("authors", authors(&publication));

        Projection::Document(doc)
    }
}

/// DOI with any `doi:` prefix removed
fn doi(publication: &Node<'_>) -> Option<String> {
    literal(publication, bibo::DOI).map(|d| d.trim_start_matches("doi:").to_string())
}

fn publication_year(publication: &Node<'_>) -> Option<i64> {
    let year = literal(publication, dco::YEAR_OF_PUBLICATION)?;
    let parsed = year.get(..4).and_then(|y| y.parse().ok());
    if parsed.is_none() {
        log::debug!("unparseable publication year '{year}': {}", publication.identifier());
    }
    parsed
}
