//! `sqlwire yaml` command - WireViz document for one cable

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::{Diagnostics, Pipeline};
use crate::yaml::{write_document, HarnessDocument};

use super::{finish, load_config, print_written};

#[derive(clap::Args, Debug)]
pub struct YamlArgs {
    /// Cable designator, e.g. W001
    pub cable: String,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: YamlArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let pipeline = Pipeline::new(&config);
    let mut diags = Diagnostics::new();

    // a cable without nets is reported, not failed
    let Some(reconciled) = pipeline.reconcile_cable(&args.cable, &mut diags)? else {
        if !global.quiet {
            eprintln!(
                "{} {} has no net rows, no document written",
                style("!").yellow(),
                style(&args.cable).cyan()
            );
        }
        finish(&diags, global);
        return Ok(());
    };

    match args.output {
        Some(path) => {
            write_document(&path, &reconciled)?;
            print_written(&path, global);
        }
        None => {
            let yaml = HarnessDocument::from(&reconciled).to_yaml().into_diagnostic()?;
            print!("{}", yaml);
        }
    }

    finish(&diags, global);
    Ok(())
}
