//! Where catalog definitions come from.
//!
//! Definitions are JSON arrays, one file per role and catalog kind. The
//! bundled source compiles the shipped data into the binary; the directory
//! source reads `<dir>/<kind>/<role>.json` so deployments can replace it.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::Role;

/// Which catalog a definition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Scenarios,
    Archetypes,
}

impl CatalogKind {
    /// Directory name under a catalog data dir.
    pub fn dir_name(&self) -> &'static str {
        match self {
            CatalogKind::Scenarios => "scenarios",
            CatalogKind::Archetypes => "archetypes",
        }
    }

    /// Singular label used in errors and logs.
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Scenarios => "scenario",
            CatalogKind::Archetypes => "archetype",
        }
    }
}

/// Origin of catalog definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogSource {
    /// Definitions compiled into the binary.
    #[default]
    Bundled,
    /// Definitions read from a data directory.
    Directory(PathBuf),
}

impl CatalogSource {
    /// Build from an optional configured data directory.
    pub fn from_data_dir(data_dir: Option<&str>) -> Self {
        match data_dir {
            Some(dir) if !dir.trim().is_empty() => CatalogSource::Directory(PathBuf::from(dir)),
            _ => CatalogSource::Bundled,
        }
    }

    /// Raw definition text, or `None` when the role has no definition.
    pub fn read(&self, kind: CatalogKind, role: Role) -> Result<Option<String>> {
        let content = match self {
            CatalogSource::Bundled => bundled(kind, role).map(str::to_string),
            CatalogSource::Directory(dir) => {
                let path = dir.join(kind.dir_name()).join(format!("{}.json", role.slug()));
                match fs::read_to_string(&path) {
                    Ok(content) => {
                        debug!(path = %path.display(), "Read catalog definition");
                        Some(content)
                    }
                    Err(e) if e.kind() == ErrorKind::NotFound => None,
                    Err(source) => {
                        return Err(Error::CatalogLoad {
                            kind: kind.label(),
                            role,
                            source,
                        })
                    }
                }
            }
        };

        Ok(content.filter(|c| !c.trim().is_empty()))
    }

    /// Read and parse a definition list. Missing or blank definitions are empty.
    pub fn load<T: DeserializeOwned>(&self, kind: CatalogKind, role: Role) -> Result<Vec<T>> {
        match self.read(kind, role)? {
            Some(content) => {
                serde_json::from_str(&content).map_err(|source| Error::CatalogMalformed {
                    kind: kind.label(),
                    role,
                    source,
                })
            }
            None => Ok(Vec::new()),
        }
    }
}

fn bundled(kind: CatalogKind, role: Role) -> Option<&'static str> {
    match (kind, role) {
        (CatalogKind::Scenarios, Role::Engineer) => {
            Some(include_str!("../../data/scenarios/engineer.json"))
        }
        (CatalogKind::Archetypes, Role::Engineer) => {
            Some(include_str!("../../data/archetypes/engineer.json"))
        }
        (_, Role::ProductManager) | (_, Role::Founder) => None,
    }
}
