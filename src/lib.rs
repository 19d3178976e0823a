//! sqlwire: wiring-harness database to diagrams and shop-floor reports
//!
//! Reads the four harness tables (nets, designators, connectors, cables) from
//! a SQLite database and produces WireViz diagram documents, a Bill of
//! Materials and label lists.

pub mod cli;
pub mod core;
pub mod entities;
pub mod export;
pub mod yaml;
