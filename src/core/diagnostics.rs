//! Recoverable per-item diagnostics
//!
//! Unresolved catalog references, failed renderer runs and missing optional
//! inputs degrade the output but never abort a run. They are collected here
//! and reported to the operator once the run is over.

use console::style;
use serde::Serialize;

/// Stable diagnostic codes
pub mod codes {
    pub const CONNECTOR_MPN_NOT_FOUND: &str = "CONNECTOR_MPN_NOT_FOUND";
    pub const DUPLICATE_DESIGNATOR: &str = "DUPLICATE_DESIGNATOR";
    pub const CABLE_NOT_IN_CATALOG: &str = "CABLE_NOT_IN_CATALOG";
    pub const BOM_PART_NOT_IN_CATALOG: &str = "BOM_PART_NOT_IN_CATALOG";
    pub const BOM_CABLE_NOT_IN_CATALOG: &str = "BOM_CABLE_NOT_IN_CATALOG";
    pub const MISC_BOM_MISSING: &str = "MISC_BOM_MISSING";
    pub const MISC_BOM_ROW_INVALID: &str = "MISC_BOM_ROW_INVALID";
    pub const RENDERER_FAILED: &str = "RENDERER_FAILED";
    pub const RENDERER_NOT_FOUND: &str = "RENDERER_NOT_FOUND";
    pub const CABLE_HAS_NO_NETS: &str = "CABLE_HAS_NO_NETS";
    pub const EMPTY_OUTPUT: &str = "EMPTY_OUTPUT";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One recorded degradation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    /// The designator, part number or file the diagnostic is about
    pub subject: String,
    pub message: String,
}

/// Ordered collection of diagnostics for one run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    fn record(
        &mut self,
        severity: Severity,
        code: &'static str,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic {
            severity,
            code,
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn info(&mut self, code: &'static str, subject: impl Into<String>, message: impl Into<String>) {
        self.record(Severity::Info, code, subject, message);
    }

    pub fn warn(&mut self, code: &'static str, subject: impl Into<String>, message: impl Into<String>) {
        self.record(Severity::Warning, code, subject, message);
    }

    pub fn error(&mut self, code: &'static str, subject: impl Into<String>, message: impl Into<String>) {
        self.record(Severity::Error, code, subject, message);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics at warning level or above
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity >= Severity::Warning)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    /// Print diagnostics to stderr. Info entries are only shown when `verbose`.
    pub fn report(&self, quiet: bool, verbose: bool) {
        if quiet {
            return;
        }
        for d in &self.entries {
            let marker = match d.severity {
                Severity::Info if !verbose => continue,
                Severity::Info => style("i").blue(),
                Severity::Warning => style("!").yellow(),
                Severity::Error => style("✗").red(),
            };
            eprintln!(
                "{} {} {}: {}",
                marker,
                style(d.code).dim(),
                style(&d.subject).cyan(),
                d.message
            );
        }

        let warnings = self.count(Severity::Warning);
        let errors = self.count(Severity::Error);
        if warnings + errors > 0 {
            eprintln!(
                "{} {} warning(s), {} error(s)",
                style("→").blue(),
                warnings,
                errors
            );
        }
    }
}
