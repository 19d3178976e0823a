//! Reconciliation engine
//!
//! Joins the four harness tables into the three diagram entity sets:
//!
//! - **Connectors**: one per designator row (restricted to the endpoints of
//!   the selected cable), naturally sorted, with the mating part resolved
//!   through the connector catalog
//! - **Cables**: one per cable designator, wires in net-table order, catalog
//!   data merged in, ordered by the natural order of each cable's first net
//! - **Connections**: one per net row, with a per-cable wire index
//!
//! Catalog misses never abort: they fall back to sentinel values and are
//! recorded in [`Diagnostics`].

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::core::diagnostics::{codes, Diagnostics};
use crate::core::natural;
use crate::entities::{
    Cable, CableRow, Connection, Connector, ConnectorRow, DesignatorRow, Endpoint, Image, NetRow,
    Tables, ViaPin,
};

/// Pin count used when a connector's part is not in the catalog
pub const DEFAULT_PINCOUNT: u32 = 99;
/// Mating part number used when a connector's part is not in the catalog
pub const NOT_FOUND_MPN: &str = "NotFound";
/// Directory prefix for connector images, relative to the diagram document
pub const IMAGE_DIR: &str = "../resources";
pub const IMAGE_CAPTION: &str = "Mating connector";

pub const CABLE_CATEGORY: &str = "bundle";
pub const DEFAULT_GAUGE: f64 = 0.5;
pub const GAUGE_UNIT: &str = "mm2";
pub const DEFAULT_LENGTH: f64 = 100.0;
pub const LENGTH_UNIT: &str = "mm";

/// Which part of the harness to reconcile
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every designator, every net row
    #[default]
    All,
    /// Only what is reachable from the net rows of one cable
    Cable(String),
}

impl Selection {
    pub fn cable(cable_des: impl Into<String>) -> Self {
        Selection::Cable(cable_des.into())
    }

    fn accepts(&self, net: &NetRow) -> bool {
        match self {
            Selection::All => true,
            Selection::Cable(c) => net.cable_des == *c,
        }
    }
}

/// The derived entity sets for one selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    pub connectors: Vec<Connector>,
    pub cables: Vec<Cable>,
    pub connections: Vec<Connection>,
}

/// Part number -> catalog row, first occurrence wins
pub fn index_connectors(rows: &[ConnectorRow]) -> HashMap<&str, &ConnectorRow> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(row.mpn.as_str()).or_insert(row);
    }
    index
}

/// Cable designator -> catalog row, first occurrence wins
pub fn index_cables(rows: &[CableRow]) -> HashMap<&str, &CableRow> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(row.cable_des.as_str()).or_insert(row);
    }
    index
}

/// Every endpoint identity (component, connector) touched by the nets
pub fn endpoint_keys(nets: &[NetRow]) -> HashSet<(&str, &str)> {
    nets.iter()
        .flat_map(|n| [n.from_key(), n.to_key()])
        .collect()
}

/// Reconcile all three entity sets for a selection
pub fn reconcile(
    tables: &Tables,
    selection: &Selection,
    images: &BTreeSet<String>,
    diags: &mut Diagnostics,
) -> Reconciled {
    let nets: Vec<NetRow> = tables
        .nets
        .iter()
        .filter(|n| selection.accepts(n))
        .cloned()
        .collect();

    let designators: Vec<&DesignatorRow> = match selection {
        Selection::All => tables.designators.iter().collect(),
        Selection::Cable(_) => {
            let wanted = endpoint_keys(&nets);
            tables
                .designators
                .iter()
                .filter(|d| wanted.contains(&d.key()))
                .collect()
        }
    };

    Reconciled {
        connectors: resolve_connectors(&designators, &tables.connectors, images, diags),
        cables: resolve_cables(&nets, &tables.cables, diags),
        connections: resolve_connections(&nets),
    }
}

/// Resolve one connector per endpoint name, in natural
/// (component, connector) order.
///
/// Designator rows that repeat an endpoint name are dropped with a warning;
/// the first row in table order wins.
pub fn resolve_connectors(
    designators: &[&DesignatorRow],
    catalog: &[ConnectorRow],
    images: &BTreeSet<String>,
    diags: &mut Diagnostics,
) -> Vec<Connector> {
    let index = index_connectors(catalog);

    let mut seen: HashSet<String> = HashSet::with_capacity(designators.len());
    let mut unique: Vec<&DesignatorRow> = Vec::with_capacity(designators.len());
    for &d in designators {
        let name = d.name();
        if seen.insert(name.clone()) {
            unique.push(d);
        } else {
            diags.warn(
                codes::DUPLICATE_DESIGNATOR,
                name,
                format!("repeated DesignatorTable row (part '{}') ignored", d.conn_mpn),
            );
        }
    }

    unique.sort_by(|a, b| {
        natural::compare_all(
            &[a.comp_des.as_str(), a.conn_des.as_str()],
            &[b.comp_des.as_str(), b.conn_des.as_str()],
        )
    });

    unique
        .into_iter()
        .map(|d| {
            let name = d.name();
            match index.get(d.conn_mpn.as_str()) {
                Some(part) => {
                    let mate = part.mate_mpn.clone().unwrap_or_default();
                    let mut connector =
                        Connector::new(name, mate.clone(), part.pincount.unwrap_or(DEFAULT_PINCOUNT));
                    if !mate.is_empty() && images.contains(&format!("{}.png", mate)) {
                        connector.image = Some(Image {
                            src: format!("{}/{}.png", IMAGE_DIR, mate),
                            caption: Some(IMAGE_CAPTION.to_string()),
                        });
                    }
                    if !part.description.is_empty() {
                        connector.notes = Some(part.description.clone());
                    }
                    connector
                }
                None => {
                    diags.warn(
                        codes::CONNECTOR_MPN_NOT_FOUND,
                        name.clone(),
                        format!(
                            "part '{}' not found in ConnectorTable, using defaults",
                            d.conn_mpn
                        ),
                    );
                    let mut connector = Connector::new(name, NOT_FOUND_MPN, DEFAULT_PINCOUNT);
                    // the sentinel pin count is not a real part property
                    connector.show_pincount = Some(false);
                    connector.hide_disconnected_pins = true;
                    connector.notes = Some(format!("Unknown part {}", d.conn_mpn));
                    connector
                }
            }
        })
        .collect()
}

/// Group nets into cables and merge in the cable catalog
pub fn resolve_cables(nets: &[NetRow], catalog: &[CableRow], diags: &mut Diagnostics) -> Vec<Cable> {
    // (first net of the cable, wire labels)
    let mut groups: Vec<(&NetRow, Vec<String>)> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for net in nets {
        let idx = *by_name.entry(net.cable_des.as_str()).or_insert_with(|| {
            groups.push((net, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(net.net_name.clone());
    }

    groups.sort_by(|(a, _), (b, _)| natural::compare_all(&sort_key(a), &sort_key(b)));

    let index = index_cables(catalog);

    groups
        .into_iter()
        .map(|(first, wirelabels)| {
            let name = first.cable_des.clone();
            let mut cable = Cable {
                name: name.clone(),
                category: CABLE_CATEGORY.to_string(),
                wirecount: wirelabels.len(),
                wirelabels,
                gauge: DEFAULT_GAUGE,
                gauge_unit: GAUGE_UNIT.to_string(),
                length: DEFAULT_LENGTH,
                length_unit: LENGTH_UNIT.to_string(),
                notes: None,
            };

            match index.get(name.as_str()) {
                Some(row) => {
                    cable.gauge = row.wire_gauge.unwrap_or(DEFAULT_GAUGE);
                    cable.length = row.length.unwrap_or(DEFAULT_LENGTH);
                    cable.notes = row.note.clone();
                }
                None => diags.warn(
                    codes::CABLE_NOT_IN_CATALOG,
                    name,
                    format!(
                        "not found in CableTable, using {} {} / {} {}",
                        DEFAULT_GAUGE, GAUGE_UNIT, DEFAULT_LENGTH, LENGTH_UNIT
                    ),
                ),
            }

            cable
        })
        .collect()
}

/// Endpoint pair of a net row, in cable ordering precedence
fn sort_key(net: &NetRow) -> [&str; 4] {
    [
        net.comp_des_1.as_str(),
        net.conn_des_1.as_str(),
        net.comp_des_2.as_str(),
        net.conn_des_2.as_str(),
    ]
}

/// One connection per net row, numbering wires 1.. within each cable
pub fn resolve_connections(nets: &[NetRow]) -> Vec<Connection> {
    let mut counters: HashMap<&str, u32> = HashMap::new();

    nets.iter()
        .map(|net| {
            let counter = counters.entry(net.cable_des.as_str()).or_insert(0);
            *counter += 1;

            Connection {
                from: Endpoint {
                    name: net.from_name(),
                    pin: net.pin_1.clone(),
                },
                via: ViaPin {
                    cable: net.cable_des.clone(),
                    pin: *counter,
                },
                to: Endpoint {
                    name: net.to_name(),
                    pin: net.pin_2.clone(),
                },
                net_name: net.net_name.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Pin;

    fn net(cable: &str, c1: &str, k1: &str, p1: &str, c2: &str, k2: &str, p2: &str, name: &str) -> NetRow {
        NetRow {
            cable_des: cable.into(),
            comp_des_1: c1.into(),
            conn_des_1: k1.into(),
            pin_1: Pin::Name(p1.into()),
            comp_des_2: c2.into(),
            conn_des_2: k2.into(),
            pin_2: Pin::Name(p2.into()),
            net_name: name.into(),
        }
    }

    fn designator(comp: &str, conn: &str, mpn: &str) -> DesignatorRow {
        DesignatorRow {
            comp_des: comp.into(),
            conn_des: conn.into(),
            conn_mpn: mpn.into(),
        }
    }

    fn part(mpn: &str, mate: &str, pincount: u32) -> ConnectorRow {
        ConnectorRow {
            mpn: mpn.into(),
            pincount: Some(pincount),
            mate_mpn: Some(mate.into()),
            pin_mpn: Some("PIN-001".into()),
            description: "Desc".into(),
            manufacturer: "Mfg".into(),
        }
    }

    fn cable_row(des: &str, gauge: f64, length: f64) -> CableRow {
        CableRow {
            cable_des: des.into(),
            wire_gauge: Some(gauge),
            length: Some(length),
            note: Some("Note".into()),
        }
    }

    fn sample() -> Tables {
        Tables {
            nets: vec![
                net("W1", "J1", "X1", "1", "J2", "", "1", "SignalA"),
                net("W1", "J1", "X1", "2", "J2", "", "2", "+24V"),
            ],
            designators: vec![designator("J1", "X1", "MPN-123"), designator("J2", "", "MPN-456")],
            connectors: vec![part("MPN-123", "MATE-123", 10), part("MPN-456", "MATE-456", 4)],
            cables: vec![cable_row("W1", 0.5, 1000.0)],
        }
    }

    fn images(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_connector_resolves_mate_and_image() {
        let mut diags = Diagnostics::new();
        let out = reconcile(&sample(), &Selection::cable("W1"), &images(&["MATE-123.png"]), &mut diags);

        assert_eq!(out.connectors.len(), 2);
        let j1 = out.connectors.iter().find(|c| c.name == "J1-X1").unwrap();
        assert_eq!(j1.mpn, "MATE-123");
        assert_eq!(j1.pincount, 10);
        assert_eq!(
            j1.image.as_ref().map(|i| i.src.as_str()),
            Some("../resources/MATE-123.png")
        );

        assert_eq!(j1.notes.as_deref(), Some("Desc"));

        let j2 = out.connectors.iter().find(|c| c.name == "J2").unwrap();
        assert_eq!(j2.mpn, "MATE-456");
        assert!(j2.image.is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_catalog_entry_degrades_to_sentinels() {
        let mut tables = sample();
        tables.designators.push(designator("J9", "X1", "UNKNOWN"));
        let mut diags = Diagnostics::new();
        let out = reconcile(&tables, &Selection::All, &BTreeSet::new(), &mut diags);

        let j9 = out.connectors.iter().find(|c| c.name == "J9-X1").unwrap();
        assert_eq!(j9.pincount, DEFAULT_PINCOUNT);
        assert_eq!(j9.mpn, NOT_FOUND_MPN);
        assert!(j9.hide_disconnected_pins);
        assert_eq!(j9.show_pincount, Some(false));
        assert_eq!(j9.notes.as_deref(), Some("Unknown part UNKNOWN"));
        assert!(diags.has_code(codes::CONNECTOR_MPN_NOT_FOUND));
    }

    #[test]
    fn test_connectors_sorted_naturally() {
        let designators = vec![
            designator("J10", "X1", "A"),
            designator("J2", "X10", "A"),
            designator("J2", "X2", "A"),
            designator("J1", "", "A"),
        ];
        let refs: Vec<&DesignatorRow> = designators.iter().collect();
        let mut diags = Diagnostics::new();
        let out = resolve_connectors(&refs, &[part("A", "B", 2)], &BTreeSet::new(), &mut diags);
        let names: Vec<_> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["J1", "J2-X2", "J2-X10", "J10-X1"]);
    }

    #[test]
    fn test_zero_padded_designators_sort_by_value() {
        let designators = vec![
            designator("J010", "", "A"),
            designator("J9", "", "A"),
            designator("J02", "", "A"),
        ];
        let refs: Vec<&DesignatorRow> = designators.iter().collect();
        let mut diags = Diagnostics::new();
        let out = resolve_connectors(&refs, &[part("A", "B", 2)], &BTreeSet::new(), &mut diags);
        let names: Vec<_> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["J02", "J9", "J010"]);
    }

    #[test]
    fn test_repeated_designator_keeps_first_row() {
        let designators = vec![
            designator("J1", "X1", "MPN-123"),
            designator("J2", "", "MPN-456"),
            designator("J1", "X1", "MPN-456"),
        ];
        let refs: Vec<&DesignatorRow> = designators.iter().collect();
        let catalog = vec![part("MPN-123", "MATE-123", 10), part("MPN-456", "MATE-456", 4)];
        let mut diags = Diagnostics::new();
        let out = resolve_connectors(&refs, &catalog, &BTreeSet::new(), &mut diags);

        let names: Vec<_> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["J1-X1", "J2"]);
        assert_eq!(out[0].mpn, "MATE-123");
        assert!(diags.has_code(codes::DUPLICATE_DESIGNATOR));

        let reconciled = Reconciled {
            connectors: out,
            ..Default::default()
        };
        let yaml = crate::yaml::HarnessDocument::from(&reconciled).to_yaml().unwrap();
        assert_eq!(yaml.matches("J1-X1:").count(), 1);
    }

    #[test]
    fn test_zero_padded_cables_sort_by_value() {
        let nets = vec![
            net("W010", "J010", "", "1", "J11", "", "1", "a"),
            net("W009", "J9", "", "1", "J11", "", "2", "b"),
        ];
        let mut diags = Diagnostics::new();
        let cables = resolve_cables(&nets, &[], &mut diags);
        let names: Vec<_> = cables.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["W009", "W010"]);
    }

    #[test]
    fn test_cable_aggregates_wires_in_row_order() {
        let mut diags = Diagnostics::new();
        let out = reconcile(&sample(), &Selection::All, &BTreeSet::new(), &mut diags);

        assert_eq!(out.cables.len(), 1);
        let w1 = &out.cables[0];
        assert_eq!(w1.name, "W1");
        assert_eq!(w1.wirecount, 2);
        assert_eq!(w1.wirelabels, vec!["SignalA", "+24V"]);
        assert_eq!(w1.length, 1000.0);
        assert_eq!(w1.notes.as_deref(), Some("Note"));
    }

    #[test]
    fn test_duplicate_net_names_are_separate_wires() {
        let nets = vec![
            net("W1", "J1", "", "1", "J2", "", "1", "gnd"),
            net("W1", "J1", "", "2", "J2", "", "2", "gnd"),
        ];
        let mut diags = Diagnostics::new();
        let cables = resolve_cables(&nets, &[], &mut diags);
        assert_eq!(cables[0].wirecount, 2);
        assert_eq!(cables[0].wirelabels, vec!["gnd", "gnd"]);
    }

    #[test]
    fn test_uncatalogued_cable_keeps_defaults() {
        let nets = vec![net("W5", "J1", "", "1", "J2", "", "1", "S")];
        let mut diags = Diagnostics::new();
        let cables = resolve_cables(&nets, &[cable_row("W6", 1.5, 10.0)], &mut diags);
        assert_eq!(cables[0].gauge, DEFAULT_GAUGE);
        assert_eq!(cables[0].length, DEFAULT_LENGTH);
        assert_eq!(cables[0].length_unit, "mm");
        assert!(diags.has_code(codes::CABLE_NOT_IN_CATALOG));
    }

    #[test]
    fn test_cables_ordered_by_first_connection() {
        let nets = vec![
            net("WB", "J10", "X1", "1", "J11", "", "1", "a"),
            net("WA", "J2", "X1", "1", "J3", "", "1", "b"),
            net("WB", "J1", "X1", "2", "J11", "", "2", "c"),
        ];
        let mut diags = Diagnostics::new();
        let cables = resolve_cables(&nets, &[], &mut diags);
        let names: Vec<_> = cables.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["WA", "WB"]);
    }

    #[test]
    fn test_via_pins_count_per_cable() {
        let nets = vec![
            net("W1", "J1", "", "1", "J2", "", "1", "a"),
            net("W1", "J1", "", "2", "J2", "", "2", "b"),
            net("W2", "J3", "", "1", "J4", "", "1", "c"),
            net("W1", "J1", "", "3", "J2", "", "3", "d"),
        ];
        let conns = resolve_connections(&nets);
        let vias: Vec<_> = conns.iter().map(|c| (c.via.cable.as_str(), c.via.pin)).collect();
        assert_eq!(vias, vec![("W1", 1), ("W1", 2), ("W2", 1), ("W1", 3)]);
        assert_eq!(conns[0].from.pin, Pin::Name("1".into()));
        assert_eq!(conns[0].to.name, "J2");
    }

    #[test]
    fn test_filter_restricts_every_entity_set() {
        let mut tables = sample();
        tables.nets.push(net("W2", "J7", "X1", "1", "J8", "", "1", "Other"));
        tables.designators.push(designator("J7", "X1", "MPN-123"));
        tables.designators.push(designator("J8", "", "MPN-456"));
        tables.cables.push(cable_row("W2", 1.0, 500.0));

        let mut diags = Diagnostics::new();
        let out = reconcile(&tables, &Selection::cable("W1"), &BTreeSet::new(), &mut diags);

        let names: Vec<_> = out.connectors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["J1-X1", "J2"]);
        assert!(out.cables.iter().all(|c| c.name == "W1"));
        assert!(out.connections.iter().all(|c| c.via.cable == "W1"));

        let all = reconcile(&tables, &Selection::All, &BTreeSet::new(), &mut diags);
        assert_eq!(all.connectors.len(), 4);
        assert_eq!(all.cables.len(), 2);
    }

    #[test]
    fn test_first_catalog_row_wins() {
        let catalog = vec![part("A", "FIRST", 2), part("A", "SECOND", 3)];
        let index = index_connectors(&catalog);
        assert_eq!(index["A"].mate_mpn.as_deref(), Some("FIRST"));
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let mut diags = Diagnostics::new();
        let a = reconcile(&sample(), &Selection::All, &BTreeSet::new(), &mut diags);
        let b = reconcile(&sample(), &Selection::All, &BTreeSet::new(), &mut diags);
        assert_eq!(a, b);
    }
}
