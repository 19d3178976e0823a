//! CLI command implementations

pub mod bom;
pub mod build;
pub mod completions;
pub mod init;
pub mod labels;
pub mod yaml;

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::{Config, Diagnostics};

/// Load the configuration named by the global options
pub(crate) fn load_config(global: &GlobalOpts) -> Result<Config> {
    Ok(Config::load(global.config.as_deref())?)
}

/// Cables named on the command line, or the configured range
pub(crate) fn resolve_filters(config: &Config, cables: &[String]) -> Vec<String> {
    if cables.is_empty() {
        config.cable_filters()
    } else {
        cables.to_vec()
    }
}

/// Write to a file, or to stdout when no path is given
pub(crate) fn write_output(content: &str, output_path: Option<&Path>, global: &GlobalOpts) -> Result<()> {
    match output_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).into_diagnostic()?;
            }
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            print_written(path, global);
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

pub(crate) fn print_written(path: &Path, global: &GlobalOpts) {
    if !global.quiet {
        eprintln!("{} Wrote {}", style("✓").green(), style(path.display()).cyan());
    }
}

/// Print collected diagnostics at the end of a command
pub(crate) fn finish(diags: &Diagnostics, global: &GlobalOpts) {
    diags.report(global.quiet, global.verbose);
}

/// True when the path asks for a spreadsheet
pub(crate) fn is_xlsx(path: Option<&PathBuf>) -> bool {
    path.and_then(|p| p.extension())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}
