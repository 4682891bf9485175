//! Person documents

use graphline_rdf::vocab::{dco, foaf, net_id, obo, vcard, vivo};
use graphline_rdf::{Maybe, Node, ResourceGraph};
use serde_json::{Value, json};

use super::Projector;
use super::common::{begin, labeled_refs, literal, most_specific_type, named_ref, thumbnail};
use crate::document::{Projection, SkipReason};
use crate::kind::Kind;

pub struct PersonProjector;

impl Projector for PersonProjector {
    fn kind(&self) -> Kind {
        Kind::Person
    }

    fn project(&self, graph: &ResourceGraph, uri: &str) -> Projection {
        let Some((per, mut doc)) = begin(Kind::Person, graph, uri) else {
            return Projection::Skipped(SkipReason::MissingLabel);
        };

        doc.insert_opt("orcid", orcid(&per));
        match literal(&per, net_id::NETWORK_ID) {
            Some(network_id) => {
                doc.insert("network_id", network_id);
                doc.insert("isDcoMember", true);
            }
            None => doc.insert("isDcoMember", false),
        }
        doc.insert_opt("mostSpecificType", most_specific_type(&per));
        doc.insert_opt("givenName", vcard_name(&per, vcard::GIVEN_NAME));
        doc.insert_opt("familyName", vcard_name(&per, vcard::FAMILY_NAME));
        doc.insert_opt("email", work_email(&per));
        doc.insert_list("researchArea", labeled_refs(&per, vivo::HAS_RESEARCH_AREA));
        doc.insert_opt(
            "homeCountry",
            Maybe::of(per.clone())
                .flat_map(|p| p.objects(dco::HOME_COUNTRY))
                .filter_map(|c| named_ref(&c))
                .first(),
        );
        doc.insert_list("organizations", organizations(&per));
        doc.insert_list(
            "teams",
            member_roles(&per, dco::TEAM, "teamrole", "team"),
        );
        doc.insert_list(
            "dcoCommunities",
            member_roles(&per, dco::RESEARCH_COMMUNITY, "commrole", "community"),
        );
        doc.insert_opt("thumbnail", thumbnail(&per));

        Projection::Document(doc)
    }
}

/// ORCID iD without the `https://orcid.org/` prefix
fn orcid(per: &Node<'_>) -> Option<String> {
    Maybe::of(per.clone())
        .flat_map(|p| p.objects(vivo::ORCID_ID))
        .map(|o| o.local_name().to_string())
        .filter(|id| !id.is_empty())
        .first()
}

/// vCard name component reached through the contact info individual
fn vcard_name(per: &Node<'_>, part: &str) -> Option<String> {
    Maybe::of(per.clone())
        .flat_map(|p| p.objects(obo::ARG_2000028))
        .flat_map(|v| v.objects(vcard::HAS_NAME))
        .filter_map(|n| literal(&n, part))
        .first()
}

/// Only the address typed `vcard:Work` counts
fn work_email(per: &Node<'_>) -> Option<String> {
    Maybe::of(per.clone())
        .flat_map(|p| p.objects(obo::ARG_2000028))
        .flat_map(|v| v.objects(vcard::HAS_EMAIL))
        .filter(|e| e.has_type(vcard::WORK))
        .filter_map(|e| literal(&e, vcard::EMAIL))
        .first()
}

/// Positions linking the person to a labeled organization
fn organizations(per: &Node<'_>) -> Vec<Value> {
    per.objects(vivo::RELATED_BY)
        .into_iter()
        .filter(|r| r.has_type(vivo::POSITION))
        .filter_map(|position| {
            let org = Maybe::of(position.clone())
                .flat_map(|r| r.objects(vivo::RELATES))
                .filter(|o| o.has_type(foaf::ORGANIZATION))
                .filter_map(|o| named_ref(&o))
                .first()?;
            Some(role_entry(&position, "orgrole", "organization", org))
        })
        .collect()
}

/// Member roles contributing to something typed `class` (teams, communities)
fn member_roles(per: &Node<'_>, class: &str, role_field: &str, target_field: &str) -> Vec<Value> {
    per.objects(obo::RO_0000053)
        .into_iter()
        .filter(|r| r.has_type(vivo::MEMBER_ROLE))
        .filter_map(|role| {
            let target = Maybe::of(role.clone())
                .flat_map(|r| r.objects(vivo::ROLE_CONTRIBUTES_TO))
                .filter(|t| t.has_type(class))
                .filter_map(|t| named_ref(&t))
                .first()?;
            Some(role_entry(&role, role_field, target_field, target))
        })
        .collect()
}

fn role_entry(role: &Node<'_>, role_field: &str, target_field: &str, target: Value) -> Value {
    match role.label() {
        Some(label) => json!({ role_field: label, target_field: target }),
        None => json!({ target_field: target }),
    }
}
