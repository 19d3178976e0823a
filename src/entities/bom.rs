//! Bill of Materials line

use serde::Serialize;

/// Quantity column of a BOM line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Quantity {
    /// Whole pieces (connectors, fasteners)
    Count(u64),
    /// Measured amount (wire in meters)
    Amount(f64),
    /// Free text carried over from the misc item list
    Text(String),
}

impl Quantity {
    /// Parse a free-text quantity, keeping it verbatim if it is not numeric
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u64>() {
            Quantity::Count(n)
        } else if let Ok(x) = trimmed.parse::<f64>() {
            Quantity::Amount(x)
        } else {
            Quantity::Text(s.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Quantity::Count(n) => Some(*n as f64),
            Quantity::Amount(x) => Some(*x),
            Quantity::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantity::Count(n) => write!(f, "{}", n),
            Quantity::Amount(x) => write!(f, "{}", x),
            Quantity::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Column order matches the BOM sheet: description, mpn, manufacturer,
/// quantity, unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomLine {
    pub description: String,
    pub mpn: String,
    pub manufacturer: String,
    pub quantity: Quantity,
    pub unit: String,
}
