//! Project documents

use chrono::NaiveDate;
use graphline_rdf::vocab::{dco, foaf, obo, vivo};
use graphline_rdf::{Node, ResourceGraph};
use serde_json::{Map, Value, json};

use super::Projector;
use super::common::{
    begin, literal, most_specific_type, person_entry, single_ref, thumbnail, typed_refs,
};
use crate::document::{Projection, SkipReason};
use crate::kind::Kind;

pub struct ProjectProjector;

impl Projector for ProjectProjector {
    fn kind(&self) -> Kind {
        Kind::Project
    }

    fn project(&self, graph: &ResourceGraph, uri: &str) -> Projection {
        let Some((prj, mut doc)) = begin(Kind::Project, graph, uri) else {
            return Projection::Skipped(SkipReason::MissingLabel);
        };

        doc.insert_opt("mostSpecificType", most_specific_type(&prj));
        doc.insert_opt("submittedBy", single_ref(&prj, dco::SUBMITTED_BY, "submitted-by"));
        doc.insert_opt("leader", single_ref(&prj, dco::FIELDWORK_LEADER, "leader"));
        doc.insert_opt("dateTimeInterval", date_time_interval(&prj));
        doc.insert_list(
            "dcoCommunities",
            typed_refs(&prj, dco::ASSOCIATED_DCO_COMMUNITY, dco::RESEARCH_COMMUNITY, "community"),
        );
        doc.insert_list(
            "dcoPortalGroups",
            typed_refs(&prj, dco::ASSOCIATED_DCO_PORTAL_GROUP, dco::PORTAL_GROUP, "portal group"),
        );
        doc.insert_list("participants", participants(&prj));
        doc.insert_list("reportingYear", reporting_years(&prj));
        doc.insert_list(
            "grants",
            typed_refs(&prj, vivo::HAS_FUNDING_VEHICLE, vivo::GRANT, "grant"),
        );
        doc.insert_opt("thumbnail", thumbnail(&prj));

        Projection::Document(doc)
    }
}

/// `(YYYY-MM-DD, YYYY)` for an `xsd:dateTime` lexical value
fn date_parts(value: &str) -> (String, String) {
    let head = value.get(..10).unwrap_or(value);
    match NaiveDate::parse_from_str(head, "%Y-%m-%d") {
        Ok(date) => (date.format("%Y-%m-%d").to_string(), date.format("%Y").to_string()),
        Err(_) => {
            log::debug!("unparseable project date: {value}");
            (head.to_string(), value.get(..4).unwrap_or(value).to_string())
        }
    }
}

fn interval_end(interval: &Node<'_>, predicate: &str) -> Option<String> {
    let point = interval.object(predicate)?;
    literal(&point, vivo::DATE_TIME)
}

/// `{uri, startDate?, startYear?, endDate?, endYear?}`; absent when neither end resolves
fn date_time_interval(prj: &Node<'_>) -> Option<Value> {
    let interval = prj.object(vivo::DATE_TIME_INTERVAL)?;
    let start = interval_end(&interval, vivo::START);
    let end = interval_end(&interval, vivo::END);
    if start.is_none() && end.is_none() {
        return None;
    }

    let mut out = Map::new();
    out.insert("uri".into(), interval.identifier().into());
    if let Some(start) = start {
        let (date, year) = date_parts(&start);
        out.insert("startDate".into(), date.into());
        out.insert("startYear".into(), year.into());
    }
    if let Some(end) = end {
        let (date, year) = date_parts(&end);
        out.insert("endDate".into(), date.into());
        out.insert("endYear".into(), year.into());
    }
    Some(Value::Object(out))
}

/// People bearing a `vivo:Role` in the project, via either role predicate
fn participants(prj: &Node<'_>) -> Vec<Value> {
    [obo::BFO_0000055, vivo::CONTRIBUTING_ROLE]
        .into_iter()
        .flat_map(|predicate| prj.objects(predicate))
        .filter(|role| role.has_type(vivo::ROLE))
        .filter_map(|role| {
            role.objects(obo::RO_0000052)
                .into_iter()
                .find(|p| p.has_type(foaf::PERSON))
        })
        .filter_map(|person| person_entry(&person))
        .map(Value::Object)
        .collect()
}

/// `{uri, year}` for every project update's reporting year
fn reporting_years(prj: &Node<'_>) -> Vec<Value> {
    prj.objects(dco::HAS_PROJECT_UPDATE)
        .into_iter()
        .filter(|u| u.has_type(dco::PROJECT_UPDATE))
        .filter_map(|u| u.object(dco::FOR_REPORTING_YEAR))
        .filter_map(|year| {
            let label = year.label()?;
            Some(json!({"uri": year.identifier(), "year": label}))
        })
        .collect()
}
