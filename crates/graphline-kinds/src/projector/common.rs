//! Field extractors shared by several projectors

use graphline_rdf::vocab::{dcat, dco, foaf, vitro, vitro_pub, vivo};
use graphline_rdf::{Maybe, Node, ResourceGraph};
use serde_json::{Map, Value, json};

use crate::document::Document;
use crate::kind::Kind;

/// Resolve the entity and its label, and start its document.
///
/// `None` (after a diagnostic) when the entity has no label.
pub fn begin<'g>(kind: Kind, graph: &'g ResourceGraph, uri: &str) -> Option<(Node<'g>, Document)> {
    let entity = graph.resource(uri);
    let Some(label) = entity.label() else {
        log::warn!("missing {}: {uri}", kind.label_field());
        return None;
    };
    let doc = Document::new(uri, kind.label_field(), label, dco_id(&entity));
    Some((entity, doc))
}

/// `{uri, name}` for a labeled node
pub fn named_ref(node: &Node<'_>) -> Option<Value> {
    node.label()
        .map(|name| json!({"uri": node.identifier(), "name": name}))
}

/// Domain identifier: `dco:hasDcoId` object, else a `dco:dcoIdFor` subject.
///
/// Literal identifiers give their value, resource identifiers their IRI.
pub fn dco_id(entity: &Node<'_>) -> Option<String> {
    Maybe::of(entity.clone())
        .flat_map(|e| e.objects(dco::HAS_DCO_ID))
        .or_else(|| entity.subjects(dco::DCO_ID_FOR))
        .map(|id| id.identifier().to_string())
        .filter(|id| !id.is_empty())
        .first()
}

/// First non-empty literal object of `predicate`
pub fn literal(entity: &Node<'_>, predicate: &str) -> Option<String> {
    Maybe::of(entity.clone())
        .flat_map(|e| e.objects(predicate))
        .filter_map(|o| o.literal().map(|l| l.value.trim().to_string()))
        .filter(|s| !s.is_empty())
        .first()
}

/// Identifier (IRI or literal value) of the first object of `predicate`
pub fn first_value(entity: &Node<'_>, predicate: &str) -> Option<String> {
    entity
        .object(predicate)
        .map(|o| o.identifier().to_string())
        .filter(|s| !s.is_empty())
}

/// Label of the entity's `vitro:mostSpecificType`
pub fn most_specific_type(entity: &Node<'_>) -> Option<String> {
    Maybe::of(entity.clone())
        .flat_map(|e| e.objects(vitro::MOST_SPECIFIC_TYPE))
        .filter_map(|t| t.label())
        .first()
}

/// Download location of the main image's thumbnail
pub fn thumbnail(entity: &Node<'_>) -> Option<String> {
    Maybe::of(entity.clone())
        .flat_map(|e| e.objects(vitro_pub::MAIN_IMAGE))
        .flat_map(|i| i.objects(vitro_pub::THUMBNAIL_IMAGE))
        .flat_map(|t| t.objects(vitro_pub::DOWNLOAD_LOCATION))
        .map(|l| l.identifier().to_string())
        .first()
}

/// `{uri, name}` for every labeled object of `predicate`; unlabeled ones are dropped
pub fn labeled_refs(entity: &Node<'_>, predicate: &str) -> Vec<Value> {
    Maybe::of(entity.clone())
        .flat_map(|e| e.objects(predicate))
        .filter_map(|o| named_ref(&o))
        .into_vec()
}

/// `{uri, name}` for objects of `predicate` typed `class`.
///
/// Typed objects without a label are reported as `"<what> label missing"` and dropped.
pub fn typed_refs(entity: &Node<'_>, predicate: &str, class: &str, what: &str) -> Vec<Value> {
    entity
        .objects(predicate)
        .into_iter()
        .filter(|o| o.has_type(class))
        .filter_map(|o| {
            let named = named_ref(&o);
            if named.is_none() {
                log::debug!("{what} label missing: {}", o.identifier());
            }
            named
        })
        .collect()
}

/// `{uri, name}` for the first object of `predicate`, reporting a missing label
pub fn single_ref(entity: &Node<'_>, predicate: &str, what: &str) -> Option<Value> {
    let target = entity.object(predicate)?;
    let named = named_ref(&target);
    if named.is_none() {
        log::debug!("{what} label missing: {}", target.identifier());
    }
    named
}

/// Person entry shared by authors and project participants:
/// `{uri, name, researchArea?, organization?}`
pub fn person_entry(person: &Node<'_>) -> Option<Map<String, Value>> {
    let Some(name) = person.label() else {
        log::debug!("person label missing: {}", person.identifier());
        return None;
    };
    let mut entry = Map::new();
    entry.insert("uri".into(), person.identifier().into());
    entry.insert("name".into(), name.into());

    let areas: Vec<Value> = person
        .objects(vivo::HAS_RESEARCH_AREA)
        .iter()
        .filter_map(|a| a.label())
        .map(Value::String)
        .collect();
    if !areas.is_empty() {
        entry.insert("researchArea".into(), Value::Array(areas));
    }

    let organization = Maybe::of(person.clone())
        .flat_map(|p| p.objects(dco::IN_ORGANIZATION))
        .map(|o| named_ref(&o))
        .first()
        .flatten();
    if let Some(org) = organization {
        entry.insert("organization".into(), org);
    }
    Some(entry)
}

/// Authors linked through `vivo:relatedBy` authorships.
///
/// Sorted ascending by `vivo:rank` when every author carries one; otherwise
/// graph order is kept and a diagnostic is logged.
pub fn authors(entity: &Node<'_>) -> Vec<Value> {
    let mut ranked: Vec<(Option<i64>, Map<String, Value>)> = Vec::new();

    for authorship in entity.objects(vivo::RELATED_BY) {
        if !authorship.has_type(vivo::AUTHORSHIP) {
            continue;
        }
        let Some(person) = authorship
            .objects(vivo::RELATES)
            .into_iter()
            .find(|p| p.has_type(foaf::PERSON))
        else {
            log::debug!("authorship without a person: {}", authorship.identifier());
            continue;
        };
        let Some(mut entry) = person_entry(&person) else {
            continue;
        };
        let rank = authorship
            .object(vivo::RANK)
            .and_then(|r| r.literal().and_then(|l| l.as_i64()));
        if let Some(rank) = rank {
            entry.insert("rank".into(), rank.into());
        }
        ranked.push((rank, entry));
    }

    order_by_rank(&mut ranked, entity.identifier());
    ranked.into_iter().map(|(_, e)| Value::Object(e)).collect()
}

/// Stable ascending sort by rank, only when every member has one
pub fn order_by_rank<T>(members: &mut [(Option<i64>, T)], owner: &str) {
    if members.iter().all(|(rank, _)| rank.is_some()) {
        members.sort_by_key(|(rank, _)| *rank);
    } else if members.len() > 1 {
        log::warn!("missing rank for one or more authors of: {owner}");
    }
}

/// `dco:hasDistribution` entries typed `dcat:Distribution`, with their files
pub fn distributions(entity: &Node<'_>) -> Vec<Value> {
    entity
        .objects(dco::HAS_DISTRIBUTION)
        .into_iter()
        .filter(|d| d.has_type(dcat::DISTRIBUTION))
        .map(|dist| {
            let mut doc = Map::new();
            doc.insert("uri".into(), dist.identifier().into());
            if let Some(access) = first_value(&dist, dco::ACCESS_URL) {
                doc.insert("accessURL".into(), access.into());
            }
            if let Some(name) = dist.label() {
                doc.insert("name".into(), name.into());
            }
            let files: Vec<Value> = dist
                .objects(dco::HAS_FILE)
                .iter()
                .map(|file| {
                    let mut f = Map::new();
                    f.insert("uri".into(), file.identifier().into());
                    if let Some(name) = file.label() {
                        f.insert("name".into(), name.into());
                    }
                    if let Some(url) = first_value(file, dco::DOWNLOAD_URL) {
                        f.insert("downloadURL".into(), url.into());
                    }
                    Value::Object(f)
                })
                .collect();
            if !files.is_empty() {
                doc.insert("files".into(), Value::Array(files));
            }
            Value::Object(doc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphline_rdf::vocab::{rdf, rdfs};
    use graphline_rdf::{Literal, Term};

    const E: &str = "http://example.org/e/1";

    fn authorship(g: ResourceGraph, id: &str, person: &str, name: &str, rank: Option<&str>) -> ResourceGraph {
        let auth = format!("http://example.org/a/{id}");
        let mut g = g
            .with(E, vivo::RELATED_BY, Term::iri(&auth))
            .with(&auth, rdf::TYPE, Term::iri(vivo::AUTHORSHIP))
            .with(&auth, vivo::RELATES, Term::iri(person))
            .with(&auth, vivo::RELATES, Term::iri(E))
            .with(person, rdf::TYPE, Term::iri(foaf::PERSON))
            .with(person, rdfs::LABEL, Term::literal(name));
        if let Some(r) = rank {
            g = g.with(
                &auth,
                vivo::RANK,
                Term::Literal(Literal::typed(r, "http://www.w3.org/2001/XMLSchema#int")),
            );
        }
        g
    }

    fn names(authors: &[Value]) -> Vec<&str> {
        authors.iter().map(|a| a["name"].as_str().unwrap()).collect()
    }

    #[test]
    fn dco_id_prefers_has_dco_id() {
        let g = ResourceGraph::new()
            .with(E, dco::HAS_DCO_ID, Term::iri("http://dx.deepcarbon.net/11121/1"))
            .with("http://dx.deepcarbon.net/11121/2", dco::DCO_ID_FOR, Term::iri(E));
        assert_eq!(
            dco_id(&g.resource(E)).as_deref(),
            Some("http://dx.deepcarbon.net/11121/1")
        );
    }

    #[test]
    fn dco_id_falls_back_to_reverse_edge() {
        let g = ResourceGraph::new()
            .with("http://dx.deepcarbon.net/11121/2", dco::DCO_ID_FOR, Term::iri(E));
        assert_eq!(
            dco_id(&g.resource(E)).as_deref(),
            Some("http://dx.deepcarbon.net/11121/2")
        );
    }

    #[test]
    fn dco_id_literal_value() {
        let g = ResourceGraph::new().with(E, dco::HAS_DCO_ID, Term::literal("11121/abc"));
        assert_eq!(dco_id(&g.resource(E)).as_deref(), Some("11121/abc"));
    }

    #[test]
    fn dco_id_absent() {
        let g = ResourceGraph::new().with(E, rdfs::LABEL, Term::literal("x"));
        assert_eq!(dco_id(&g.resource(E)), None);
    }

    #[test]
    fn authors_sorted_when_all_ranked() {
        let g = ResourceGraph::new();
        let g = authorship(g, "1", "http://example.org/p/c", "Carol", Some("3"));
        let g = authorship(g, "2", "http://example.org/p/a", "Alice", Some("1"));
        let g = authorship(g, "3", "http://example.org/p/b", "Bob", Some("2"));
        let out = authors(&g.resource(E));
        assert_eq!(names(&out), vec!["Alice", "Bob", "Carol"]);
        assert_eq!(out[0]["rank"], json!(1));
    }

    #[test]
    fn authors_keep_graph_order_when_rank_missing() {
        let g = ResourceGraph::new();
        let g = authorship(g, "1", "http://example.org/p/c", "Carol", Some("3"));
        let g = authorship(g, "2", "http://example.org/p/a", "Alice", None);
        let g = authorship(g, "3", "http://example.org/p/b", "Bob", Some("1"));
        let out = authors(&g.resource(E));
        assert_eq!(names(&out), vec!["Carol", "Alice", "Bob"]);
        assert!(out[1].get("rank").is_none());
    }

    #[test]
    fn ranks_compare_numerically() {
        let g = ResourceGraph::new();
        let g = authorship(g, "1", "http://example.org/p/x", "Ten", Some("10"));
        let g = authorship(g, "2", "http://example.org/p/y", "Two", Some("2"));
        assert_eq!(names(&authors(&g.resource(E))), vec!["Two", "Ten"]);
    }

    #[test]
    fn equal_ranks_are_stable() {
        let mut members = vec![(Some(1), "a"), (Some(0), "b"), (Some(1), "c")];
        order_by_rank(&mut members, E);
        let order: Vec<&str> = members.iter().map(|(_, m)| *m).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn author_carries_area_and_organization() {
        let person = "http://example.org/p/a";
        let g = authorship(ResourceGraph::new(), "1", person, "Alice", Some("1"))
            .with(person, vivo::HAS_RESEARCH_AREA, Term::iri("http://example.org/area/1"))
            .with("http://example.org/area/1", rdfs::LABEL, Term::literal("Geochemistry"))
            .with(person, dco::IN_ORGANIZATION, Term::iri("http://example.org/org/1"))
            .with("http://example.org/org/1", rdfs::LABEL, Term::literal("RPI"));
        let out = authors(&g.resource(E));
        assert_eq!(out[0]["researchArea"], json!(["Geochemistry"]));
        assert_eq!(
            out[0]["organization"],
            json!({"uri": "http://example.org/org/1", "name": "RPI"})
        );
    }

    #[test]
    fn thumbnail_chain() {
        let g = ResourceGraph::new()
            .with(E, vitro_pub::MAIN_IMAGE, Term::iri("http://example.org/img"))
            .with("http://example.org/img", vitro_pub::THUMBNAIL_IMAGE, Term::iri("http://example.org/thumb"))
            .with(
                "http://example.org/thumb",
                vitro_pub::DOWNLOAD_LOCATION,
                Term::iri("http://example.org/thumb.jpg"),
            );
        assert_eq!(thumbnail(&g.resource(E)).as_deref(), Some("http://example.org/thumb.jpg"));

        let broken = ResourceGraph::new().with(E, vitro_pub::MAIN_IMAGE, Term::iri("http://example.org/img"));
        assert_eq!(thumbnail(&broken.resource(E)), None);
    }

    #[test]
    fn typed_refs_filter_by_class_and_label() {
        let g = ResourceGraph::new()
            .with(E, dco::ASSOCIATED_DCO_COMMUNITY, Term::iri("http://example.org/c/1"))
            .with(E, dco::ASSOCIATED_DCO_COMMUNITY, Term::iri("http://example.org/c/2"))
            .with(E, dco::ASSOCIATED_DCO_COMMUNITY, Term::iri("http://example.org/c/3"))
            .with("http://example.org/c/1", rdf::TYPE, Term::iri(dco::RESEARCH_COMMUNITY))
            .with("http://example.org/c/1", rdfs::LABEL, Term::literal("Deep Life"))
            .with("http://example.org/c/2", rdf::TYPE, Term::iri(dco::RESEARCH_COMMUNITY))
            .with("http://example.org/c/3", rdfs::LABEL, Term::literal("Untyped"));
        let refs = typed_refs(
            &g.resource(E),
            dco::ASSOCIATED_DCO_COMMUNITY,
            dco::RESEARCH_COMMUNITY,
            "community",
        );
        assert_eq!(refs, vec![json!({"uri": "http://example.org/c/1", "name": "Deep Life"})]);
    }

    #[test]
    fn distributions_with_files() {
        let d = "http://example.org/dist/1";
        let f = "http://example.org/file/1";
        let g = ResourceGraph::new()
            .with(E, dco::HAS_DISTRIBUTION, Term::iri(d))
            .with(d, rdf::TYPE, Term::iri(dcat::DISTRIBUTION))
            .with(d, rdfs::LABEL, Term::literal("CSV"))
            .with(d, dco::ACCESS_URL, Term::literal("http://example.org/access"))
            .with(d, dco::HAS_FILE, Term::iri(f))
            .with(f, rdfs::LABEL, Term::literal("data.csv"))
            .with(f, dco::DOWNLOAD_URL, Term::iri("http://example.org/data.csv"));
        let out = distributions(&g.resource(E));
        assert_eq!(
            out,
            vec![json!({
                "uri": d,
                "accessURL": "http://example.org/access",
                "name": "CSV",
                "files": [{"uri": f, "name": "data.csv", "downloadURL": "http://example.org/data.csv"}]
            })]
        );
    }
}
