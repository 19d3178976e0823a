//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    bom::BomArgs, build::BuildArgs, completions::CompletionsArgs, init::InitArgs,
    labels::LabelsArgs, yaml::YamlArgs,
};
use crate::export::text::TextFormat;

#[derive(Parser)]
#[command(name = "sqlwire")]
#[command(author, version, about = "Wiring harness diagrams, BOM and labels from SQLite")]
#[command(long_about = "Reads the NetTable, DesignatorTable, ConnectorTable and CableTable of a harness database and produces WireViz documents, a Bill of Materials and label lists.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Configuration file (default: ./sqlwire.yaml)
    #[arg(long, short = 'c', global = true, env = "SQLWIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter sqlwire.yaml
    Init(InitArgs),

    /// Build attachments and drawings for the configured cables
    Build(BuildArgs),

    /// Write the WireViz document for one cable
    Yaml(YamlArgs),

    /// Print or export the Bill of Materials
    Bom(BomArgs),

    /// Print or export cable and wire labels
    Labels(LabelsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown table
    #[default]
    Md,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
}

impl From<OutputFormat> for TextFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Md => TextFormat::Markdown,
            OutputFormat::Csv => TextFormat::Csv,
            OutputFormat::Json => TextFormat::Json,
            OutputFormat::Yaml => TextFormat::Yaml,
        }
    }
}
