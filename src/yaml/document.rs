//! WireViz diagram document
//!
//! Top-level sections `connectors`, `cables` and `connections`; the first two
//! are mappings keyed by entity name in reconciliation order. Empty sections
//! are left out.

use std::fs;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::core::reconcile::Reconciled;
use crate::entities::{Cable, Connection, Connector};
use crate::export::ExportError;

/// Borrowed view over one reconciled entity set
#[derive(Debug, Clone, Copy)]
pub struct HarnessDocument<'a> {
    pub connectors: &'a [Connector],
    pub cables: &'a [Cable],
    pub connections: &'a [Connection],
}

impl<'a> From<&'a Reconciled> for HarnessDocument<'a> {
    fn from(r: &'a Reconciled) -> Self {
        Self {
            connectors: &r.connectors,
            cables: &r.cables,
            connections: &r.connections,
        }
    }
}

/// Ordered `name -> entity` mapping
struct Keyed<'a, T> {
    items: &'a [T],
    key: fn(&T) -> &str,
}

impl<T: Serialize> Serialize for Keyed<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in self.items {
            map.serialize_entry((self.key)(item), item)?;
        }
        map.end()
    }
}

impl Serialize for HarnessDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sections = [
            !self.connectors.is_empty(),
            !self.cables.is_empty(),
            !self.connections.is_empty(),
        ];
        let len = sections.iter().filter(|s| **s).count();

        let mut map = serializer.serialize_map(Some(len))?;
        if !self.connectors.is_empty() {
            map.serialize_entry(
                "connectors",
                &Keyed {
                    items: self.connectors,
                    key: |c| c.name.as_str(),
                },
            )?;
        }
        if !self.cables.is_empty() {
            map.serialize_entry(
                "cables",
                &Keyed {
                    items: self.cables,
                    key: |c| c.name.as_str(),
                },
            )?;
        }
        if !self.connections.is_empty() {
            map.serialize_entry("connections", self.connections)?;
        }
        map.end()
    }
}

impl HarnessDocument<'_> {
    pub fn to_yaml(&self) -> Result<String, serde_yml::Error> {
        serde_yml::to_string(self)
    }
}

/// Write the document for one reconciled set to `path`
pub fn write_document(path: &Path, reconciled: &Reconciled) -> Result<(), ExportError> {
    let yaml = HarnessDocument::from(reconciled).to_yaml()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, yaml)?;
    Ok(())
}
