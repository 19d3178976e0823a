//! Core module - store access, reconciliation and report aggregation

pub mod bom;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod labels;
pub mod natural;
pub mod pipeline;
pub mod reconcile;
pub mod renderer;
pub mod store;

pub use config::{Config, ConfigError};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use entity::Record;
pub use pipeline::{Pipeline, PipelineError};
pub use reconcile::{Reconciled, Selection};
pub use renderer::{DiagramRenderer, RenderOutcome, WireViz};
pub use store::{RawRow, SqliteStore, StoreError, Table};
