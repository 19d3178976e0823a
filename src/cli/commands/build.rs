//! `sqlwire build` command - attachments and drawings for the harness

use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::config::Outputs;
use crate::core::{Diagnostics, Pipeline, WireViz};

use super::{finish, load_config, print_written, resolve_filters};

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Build only these cables (default: configured range)
    #[arg(long = "cable", value_name = "CABLE")]
    pub cables: Vec<String>,

    /// Skip BOM.xlsx
    #[arg(long)]
    pub no_bom: bool,

    /// Skip the label workbooks
    #[arg(long)]
    pub no_labels: bool,

    /// Skip diagram documents and rendering
    #[arg(long)]
    pub no_drawings: bool,
}

pub fn run(args: BuildArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let pipeline = Pipeline::new(&config);
    let filters = resolve_filters(&config, &args.cables);
    let mut diags = Diagnostics::new();

    if filters.is_empty() {
        if !global.quiet {
            println!("{} No cables selected, nothing to build", style("!").yellow());
        }
        return Ok(());
    }

    let outputs = Outputs {
        bom: config.outputs.bom && !args.no_bom,
        labels: config.outputs.labels && !args.no_labels,
        drawings: config.outputs.drawings && !args.no_drawings,
    };

    if !global.quiet {
        println!(
            "{} Building {} cable(s) from {}",
            style("→").blue(),
            filters.len(),
            style(config.db_path.display()).cyan()
        );
    }

    if outputs.bom || outputs.labels {
        for path in pipeline.write_attachments(&filters, outputs, &mut diags)? {
            print_written(&path, global);
        }
    }

    if outputs.drawings {
        let renderer = WireViz::new(config.renderer.as_str(), config.drawings_path.as_path());
        let summary = pipeline.write_drawings(&filters, &renderer, &mut diags)?;

        if !global.quiet {
            for cable in &summary.rendered {
                println!("{} Diagram generated for {}", style("✓").green(), style(cable).cyan());
            }
            for cable in &summary.failed {
                println!("{} Renderer failed for {}", style("✗").red(), style(cable).cyan());
            }
            println!(
                "{} {} document(s) written to {}, {} cable(s) skipped",
                style("→").blue(),
                summary.documents.len(),
                style(config.output_path.display()).cyan(),
                summary.skipped.len()
            );
        }
    }

    finish(&diags, global);
    Ok(())
}
