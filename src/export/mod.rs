//! Report emitters: spreadsheets, text renderings and the misc item list

pub mod misc;
pub mod text;
pub mod xlsx;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    #[diagnostic(code(sqlwire::export::xlsx))]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    #[diagnostic(code(sqlwire::export::csv))]
    Csv(#[from] csv::Error),

    #[error("YAML serialization error: {0}")]
    #[diagnostic(code(sqlwire::export::yaml))]
    Yaml(#[from] serde_yml::Error),

    #[error("JSON serialization error: {0}")]
    #[diagnostic(code(sqlwire::export::json))]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(sqlwire::export::io))]
    Io(#[from] std::io::Error),
}
