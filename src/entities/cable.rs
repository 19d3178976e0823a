//! Cable entity - the wires sharing one cable designator

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cable {
    /// Cable designator, used as the document key
    #[serde(skip)]
    pub name: String,

    pub category: String,

    /// Number of net rows aggregated into this cable
    pub wirecount: usize,

    /// Net names in net-table order; duplicates are separate wires
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wirelabels: Vec<String>,

    pub gauge: f64,
    pub gauge_unit: String,
    pub length: f64,
    pub length_unit: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
