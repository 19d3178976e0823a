//! Typed table records and the row mapping rules
//!
//! Every record is built from a [`RawRow`] with [`Record::from_row`]. Mapping
//! never fails: missing or NULL text columns become empty strings, numeric
//! columns that cannot be coerced become `None`.

use std::collections::HashSet;

use crate::core::entity::Record;
use crate::core::store::{RawRow, Table};
use crate::entities::connection::Pin;

/// Display name of a connector endpoint: `{comp}-{conn}`, or just `{comp}`
/// when the connector designator is empty.
pub fn endpoint_name(comp_des: &str, conn_des: &str) -> String {
    if conn_des.is_empty() {
        comp_des.to_string()
    } else {
        format!("{}-{}", comp_des, conn_des)
    }
}

/// One physical wire between two connector pins
#[derive(Debug, Clone, PartialEq)]
pub struct NetRow {
    /// Cable the wire belongs to (grouping key)
    pub cable_des: String,
    pub comp_des_1: String,
    pub conn_des_1: String,
    pub pin_1: Pin,
    pub comp_des_2: String,
    pub conn_des_2: String,
    pub pin_2: Pin,
    /// Signal name, also used for wire colour classification
    pub net_name: String,
}

impl NetRow {
    /// Endpoint identity of the first side
    pub fn from_key(&self) -> (&str, &str) {
        (&self.comp_des_1, &self.conn_des_1)
    }

    /// Endpoint identity of the second side
    pub fn to_key(&self) -> (&str, &str) {
        (&self.comp_des_2, &self.conn_des_2)
    }

    pub fn from_name(&self) -> String {
        endpoint_name(&self.comp_des_1, &self.conn_des_1)
    }

    pub fn to_name(&self) -> String {
        endpoint_name(&self.comp_des_2, &self.conn_des_2)
    }
}

impl Record for NetRow {
    const TABLE: Table = Table::Net;

    fn from_row(row: &RawRow) -> Self {
        Self {
            cable_des: row.text("cable_des"),
            comp_des_1: row.text("comp_des_1"),
            conn_des_1: row.text("conn_des_1"),
            pin_1: row.pin("pin_1"),
            comp_des_2: row.text("comp_des_2"),
            conn_des_2: row.text("conn_des_2"),
            pin_2: row.pin("pin_2"),
            net_name: row.text("net_name"),
        }
    }
}

/// A physical connector instance and the part number mounted there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignatorRow {
    pub comp_des: String,
    pub conn_des: String,
    pub conn_mpn: String,
}

impl DesignatorRow {
    pub fn key(&self) -> (&str, &str) {
        (&self.comp_des, &self.conn_des)
    }

    pub fn name(&self) -> String {
        endpoint_name(&self.comp_des, &self.conn_des)
    }
}

impl Record for DesignatorRow {
    const TABLE: Table = Table::Designator;

    fn from_row(row: &RawRow) -> Self {
        Self {
            comp_des: row.text("comp_des"),
            conn_des: row.text("conn_des"),
            conn_mpn: row.text("conn_mpn"),
        }
    }
}

/// Connector catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorRow {
    /// Manufacturer part number (catalog key)
    pub mpn: String,
    pub pincount: Option<u32>,
    /// Part that plugs into this connector
    pub mate_mpn: Option<String>,
    /// Crimp contact used with the mating part
    pub pin_mpn: Option<String>,
    pub description: String,
    pub manufacturer: String,
}

impl Record for ConnectorRow {
    const TABLE: Table = Table::Connector;

    fn from_row(row: &RawRow) -> Self {
        Self {
            mpn: row.text("mpn"),
            pincount: row
                .integer("pincount")
                .and_then(|n| u32::try_from(n).ok()),
            mate_mpn: row.opt_text("mate_mpn"),
            pin_mpn: row.opt_text("pin_mpn"),
            description: row.text("description"),
            manufacturer: row.text("manufacturer"),
        }
    }
}

/// Cable catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct CableRow {
    pub cable_des: String,
    /// Conductor cross-section in mm2
    pub wire_gauge: Option<f64>,
    /// Length in millimeters
    pub length: Option<f64>,
    pub note: Option<String>,
}

impl Record for CableRow {
    const TABLE: Table = Table::Cable;

    fn from_row(row: &RawRow) -> Self {
        Self {
            cable_des: row.text("cable_des"),
            wire_gauge: row.real("wire_gauge"),
            length: row.real("length"),
            note: row.opt_text("note"),
        }
    }
}

/// All four tables as loaded for one run
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub nets: Vec<NetRow>,
    pub designators: Vec<DesignatorRow>,
    pub connectors: Vec<ConnectorRow>,
    pub cables: Vec<CableRow>,
}

impl Tables {
    /// Keep only the net and cable catalog rows whose designator is in `cables`
    pub fn restrict_to_cables(mut self, cables: &[String]) -> Self {
        let wanted: HashSet<&str> = cables.iter().map(String::as_str).collect();
        self.nets.retain(|n| wanted.contains(n.cable_des.as_str()));
        self.cables.retain(|c| wanted.contains(c.cable_des.as_str()));
        self
    }
}
