//! Per-kind pipeline configuration

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use graphline_kinds::{Kind, Projector};
use serde::Deserialize;

/// Default search index shared by all kinds
pub const DEFAULT_INDEX: &str = "dco";

/// Everything that parameterizes the pipeline for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindConfig {
    pub kind: Kind,
    /// SELECT query listing the entities
    pub list_query: PathBuf,
    /// DESCRIBE query template, parameterized by `variable`
    pub describe_query: PathBuf,
    /// SPARQL variable bound to the entity (without `?`)
    pub variable: String,
    pub index: String,
    pub type_name: String,
    /// Search index mapping document for `type_name`
    pub mapping: PathBuf,
}

impl KindConfig {
    /// Built-in configuration, with query and mapping files relative to `root`
    pub fn defaults(kind: Kind, root: &Path) -> Self {
        let name = kind.name();
        Self {
            kind,
            list_query: root.join("queries").join(format!("list-{name}.rq")),
            describe_query: root.join("queries").join(format!("describe-{name}.rq")),
            variable: kind.variable().to_string(),
            index: DEFAULT_INDEX.to_string(),
            type_name: kind.type_name().to_string(),
            mapping: root.join("mappings").join(format!("{}.json", kind.type_name())),
        }
    }

    pub fn projector(&self) -> &'static dyn Projector {
        self.kind.projector()
    }

    /// Read both query texts
    pub fn load_queries(&self) -> anyhow::Result<Queries> {
        Ok(Queries {
            list: read_text(&self.list_query, "listing query")?,
            describe: read_text(&self.describe_query, "describe query")?,
        })
    }

    /// Read the mapping document
    pub fn load_mapping(&self) -> anyhow::Result<String> {
        read_text(&self.mapping, "mapping document")
    }

    /// Apply overrides from the config file
    pub fn apply(&mut self, overrides: &KindOverrides) {
        if let Some(p) = &overrides.list_query {
            self.list_query = p.clone();
        }
        if let Some(p) = &overrides.describe_query {
            self.describe_query = p.clone();
        }
        if let Some(v) = &overrides.variable {
            self.variable = graphline_rdf::variable_name(v).to_string();
        }
        if let Some(i) = &overrides.index {
            self.index = i.clone();
        }
        if let Some(t) = &overrides.type_name {
            self.type_name = t.clone();
        }
        if let Some(m) = &overrides.mapping {
            self.mapping = m.clone();
        }
    }
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {what} {}", path.display()))
}

/// Query texts of one kind
#[derive(Debug, Clone)]
pub struct Queries {
    pub list: String,
    pub describe: String,
}

/// `[kinds.<name>]` table of the config file; every key optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct KindOverrides {
    pub list_query: Option<PathBuf>,
    pub describe_query: Option<PathBuf>,
    pub variable: Option<String>,
    pub index: Option<String>,
    pub type_name: Option<String>,
    pub mapping: Option<PathBuf>,
}
