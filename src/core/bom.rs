//! Bill of Materials aggregation
//!
//! Three kinds of lines, in this order:
//! 1. Mating connectors, counted per physical connector instance
//! 2. Wire by gauge and colour, summed in meters across cables
//! 3. Miscellaneous items from the external list, appended verbatim

use std::collections::{HashMap, HashSet};

use crate::core::diagnostics::{codes, Diagnostics};
use crate::core::reconcile::{endpoint_keys, index_cables, NOT_FOUND_MPN};
use crate::entities::{BomLine, CableRow, ConnectorRow, DesignatorRow, NetRow, Quantity, Tables};

pub const CONNECTOR_UNIT: &str = "pcs";
pub const WIRE_UNIT: &str = "meter";
pub const WIRE_DESCRIPTION: &str = "Radox 125";
pub const WIRE_MANUFACTURER: &str = "";

/// Wire insulation colour, derived from the net name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WireColor {
    Red,
    Black,
    White,
}

impl WireColor {
    /// Bucket order used when emitting lines for one cable
    pub const ALL: [WireColor; 3] = [WireColor::Red, WireColor::Black, WireColor::White];

    /// Classify by literal, case-sensitive substring: "24V" is red, "gnd" is
    /// black, everything else white.
    pub fn classify(net_name: &str) -> Self {
        if net_name.contains("24V") {
            WireColor::Red
        } else if net_name.contains("gnd") {
            WireColor::Black
        } else {
            WireColor::White
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WireColor::Red => "Red",
            WireColor::Black => "Black",
            WireColor::White => "White",
        }
    }
}

impl std::fmt::Display for WireColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gauge as written in a wire part number: always at least one decimal
/// ("0.5", "1.0", "2.5")
fn format_gauge(gauge: f64) -> String {
    if gauge.fract() == 0.0 {
        format!("{:.1}", gauge)
    } else {
        gauge.to_string()
    }
}

/// Synthesized wire part number, e.g. `0.5mm2-Red`
pub fn wire_mpn(gauge: f64, color: WireColor) -> String {
    format!("{}mm2-{}", format_gauge(gauge), color)
}

/// Mating connector lines for every designator reachable from the nets.
///
/// Instances are counted per receptacle part number; lines follow catalog
/// order and carry the mating part number.
pub fn connector_lines(
    nets: &[NetRow],
    designators: &[DesignatorRow],
    catalog: &[ConnectorRow],
    diags: &mut Diagnostics,
) -> Vec<BomLine> {
    let endpoints = endpoint_keys(nets);

    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    // a repeated designator row is the same physical connector
    let mut instances: HashSet<String> = HashSet::new();
    for d in designators
        .iter()
        .filter(|d| endpoints.contains(&d.key()))
        .filter(|d| instances.insert(d.name()))
    {
        let count = counts.entry(d.conn_mpn.as_str()).or_insert_with(|| {
            first_seen.push(d.conn_mpn.as_str());
            0
        });
        *count += 1;
    }

    let mut emitted: HashSet<&str> = HashSet::new();
    let mut lines = Vec::new();
    for part in catalog {
        let Some(&count) = counts.get(part.mpn.as_str()) else {
            continue;
        };
        if !emitted.insert(part.mpn.as_str()) {
            continue;
        }
        lines.push(BomLine {
            description: part.description.clone(),
            mpn: part
                .mate_mpn
                .clone()
                .unwrap_or_else(|| NOT_FOUND_MPN.to_string()),
            manufacturer: part.manufacturer.clone(),
            quantity: Quantity::Count(count),
            unit: CONNECTOR_UNIT.to_string(),
        });
    }

    for mpn in first_seen.into_iter().filter(|m| !emitted.contains(m)) {
        diags.warn(
            codes::BOM_PART_NOT_IN_CATALOG,
            mpn,
            format!("{} instance(s) left out of the BOM", counts[mpn]),
        );
    }

    lines
}

/// Wire lines, one per distinct (gauge, colour).
///
/// Length accumulates by part number only, so cables of equal gauge and
/// colour merge into one line even when their lengths differ.
pub fn wire_lines(nets: &[NetRow], cables: &[CableRow], diags: &mut Diagnostics) -> Vec<BomLine> {
    let mut occurrences: HashMap<(&str, WireColor), u64> = HashMap::new();
    let mut cable_order: Vec<&str> = Vec::new();
    for net in nets {
        let cable = net.cable_des.as_str();
        if !cable_order.contains(&cable) {
            cable_order.push(cable);
        }
        *occurrences
            .entry((cable, WireColor::classify(&net.net_name)))
            .or_insert(0) += 1;
    }

    let index = index_cables(cables);
    let mut visited: HashSet<&str> = HashSet::new();
    let mut totals: Vec<(String, f64)> = Vec::new();

    for cable in cables {
        // first catalog row wins
        if !visited.insert(cable.cable_des.as_str()) {
            continue;
        }
        let (Some(gauge), Some(length)) = (cable.wire_gauge, cable.length) else {
            if cable_order.contains(&cable.cable_des.as_str()) {
                diags.warn(
                    codes::BOM_CABLE_NOT_IN_CATALOG,
                    cable.cable_des.clone(),
                    "catalog row has no gauge or length, wire left out of the BOM",
                );
            }
            continue;
        };

        for color in WireColor::ALL {
            let count = occurrences
                .get(&(cable.cable_des.as_str(), color))
                .copied()
                .unwrap_or(0);
            if count == 0 {
                continue;
            }
            let mpn = wire_mpn(gauge, color);
            let mm = length * count as f64;
            match totals.iter_mut().find(|(m, _)| *m == mpn) {
                Some((_, total)) => *total += mm,
                None => totals.push((mpn, mm)),
            }
        }
    }

    for cable in cable_order {
        if !index.contains_key(cable) {
            diags.warn(
                codes::BOM_CABLE_NOT_IN_CATALOG,
                cable,
                "not found in CableTable, wire left out of the BOM",
            );
        }
    }

    totals
        .into_iter()
        .map(|(mpn, mm)| BomLine {
            description: WIRE_DESCRIPTION.to_string(),
            mpn,
            manufacturer: WIRE_MANUFACTURER.to_string(),
            quantity: Quantity::Amount(mm / 1000.0),
            unit: WIRE_UNIT.to_string(),
        })
        .collect()
}

/// Full BOM for an already cable-restricted set of tables
pub fn build_bom(tables: &Tables, misc: Vec<BomLine>, diags: &mut Diagnostics) -> Vec<BomLine> {
    let mut lines = connector_lines(&tables.nets, &tables.designators, &tables.connectors, diags);
    lines.extend(wire_lines(&tables.nets, &tables.cables, diags));
    lines.extend(misc);
    lines
}
