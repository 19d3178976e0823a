//! `sqlwire init` command - write a starter configuration

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::config::{Config, DEFAULT_CONFIG_FILE};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing sqlwire.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = args.path;

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let config_path = path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !args.force {
        println!(
            "{} Configuration already exists at {}",
            style("!").yellow(),
            style(config_path.display()).cyan()
        );
        println!();
        println!("Use {} to overwrite", style("sqlwire init --force").yellow());
        return Ok(());
    }

    std::fs::write(&config_path, Config::starter()).into_diagnostic()?;
    println!(
        "{} Wrote {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!();
    println!("Next steps:");
    println!(
        "  {} Point db_path at your harness database",
        style("edit sqlwire.yaml").yellow()
    );
    println!(
        "  {} Preview the BOM",
        style("sqlwire bom").yellow()
    );
    println!(
        "  {} Write attachments and drawings",
        style("sqlwire build").yellow()
    );
    Ok(())
}
