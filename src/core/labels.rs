//! Label lists for the harness shop floor
//!
//! - Cable and connector labels: per cable, the endpoint names it connects
//! - Wire labels: one per physical wire (net row)

use std::collections::{HashMap, HashSet};

use crate::entities::NetRow;

pub const CABLE_LABELS_HEADING: &str = "Cable and Connector Labels:";
pub const WIRE_LABELS_HEADING: &str = "Wire Labels:";

/// A titled run of labels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelGroup {
    pub title: Option<String>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelList {
    pub heading: String,
    pub groups: Vec<LabelGroup>,
}

impl LabelList {
    /// Flatten into the printed sequence: heading, then each group title
    /// followed by its labels
    pub fn rows(&self) -> Vec<String> {
        let mut rows = vec![self.heading.clone()];
        for group in &self.groups {
            rows.extend(group.title.iter().cloned());
            rows.extend(group.labels.iter().cloned());
        }
        rows
    }

    pub fn label_count(&self) -> usize {
        self.groups.iter().map(|g| g.labels.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.label_count() == 0
    }
}

/// Endpoint labels grouped by cable. Cables appear in first-appearance order
/// in the net table; within a cable, endpoint names are de-duplicated and
/// keep first-appearance order.
pub fn cable_labels(nets: &[NetRow]) -> LabelList {
    let mut groups: Vec<LabelGroup> = Vec::new();
    let mut seen: Vec<HashSet<String>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for net in nets {
        let idx = *index.entry(net.cable_des.as_str()).or_insert_with(|| {
            groups.push(LabelGroup {
                title: Some(net.cable_des.clone()),
                labels: Vec::new(),
            });
            seen.push(HashSet::new());
            groups.len() - 1
        });

        for name in [net.from_name(), net.to_name()] {
            if seen[idx].insert(name.clone()) {
                groups[idx].labels.push(name);
            }
        }
    }

    LabelList {
        heading: CABLE_LABELS_HEADING.to_string(),
        groups,
    }
}

/// Text printed on one wire marker
pub fn wire_label(net: &NetRow) -> String {
    format!(
        "{}:{} - {}:{}",
        net.from_name(),
        net.pin_1,
        net.to_name(),
        net.pin_2
    )
}

/// One label per wire, in net-table order
pub fn wire_labels(nets: &[NetRow]) -> LabelList {
    LabelList {
        heading: WIRE_LABELS_HEADING.to_string(),
        groups: vec![LabelGroup {
            title: None,
            labels: nets.iter().map(wire_label).collect(),
        }],
    }
}
