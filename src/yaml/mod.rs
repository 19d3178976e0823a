//! YAML output and YAML error diagnostics

pub mod diagnostics;
pub mod document;

pub use diagnostics::YamlSyntaxError;
pub use document::{write_document, HarnessDocument};
