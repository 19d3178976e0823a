//! Entity type definitions
//!
//! **Table records** (one per database row, see [`rows`]):
//! - [`NetRow`] - One point-to-point wire between two connector pins
//! - [`DesignatorRow`] - Binds a physical connector instance to a part number
//! - [`ConnectorRow`] - Connector catalog entry with its mating part
//! - [`CableRow`] - Cable catalog entry (gauge, length, note)
//!
//! **Diagram entities** (derived by the reconciliation engine):
//! - [`Connector`] - A physical connector as drawn in the diagram
//! - [`Cable`] - A bundle of wires sharing one cable designator
//! - [`Connection`] - One wire path: endpoint, cable, endpoint
//!
//! **Reports:**
//! - [`BomLine`] - One Bill of Materials line

pub mod bom;
pub mod cable;
pub mod connection;
pub mod connector;
pub mod rows;

pub use bom::{BomLine, Quantity};
pub use cable::Cable;
pub use connection::{Connection, Endpoint, Pin, ViaPin};
pub use connector::{Connector, Image};
pub use rows::{endpoint_name, CableRow, ConnectorRow, DesignatorRow, NetRow, Tables};
