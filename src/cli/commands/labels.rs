//! `sqlwire labels` command - cable/connector and wire labels

use miette::Result;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::pipeline::{CABLE_LABELS_FILE, WIRE_LABELS_FILE};
use crate::core::Pipeline;
use crate::export::{text, xlsx};

use super::{load_config, print_written, resolve_filters};

#[derive(clap::Args, Debug)]
pub struct LabelsArgs {
    /// Restrict to these cables (default: configured range)
    #[arg(long = "cable", value_name = "CABLE")]
    pub cables: Vec<String>,

    /// Write CableLabels.xlsx and WireLabels.xlsx into this directory
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

pub fn run(args: LabelsArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let pipeline = Pipeline::new(&config);
    let filters = resolve_filters(&config, &args.cables);

    let (cables, wires) = pipeline.labels(&filters)?;

    match args.output_dir {
        Some(dir) => {
            for (list, file, sheet) in [
                (&cables, CABLE_LABELS_FILE, xlsx::CABLE_LABELS_SHEET_NAME),
                (&wires, WIRE_LABELS_FILE, xlsx::WIRE_LABELS_SHEET_NAME),
            ] {
                let path = dir.join(file);
                xlsx::write_labels(&path, sheet, list)?;
                print_written(&path, global);
            }
        }
        None => {
            print!("{}", text::render_labels(&cables));
            println!();
            print!("{}", text::render_labels(&wires));
        }
    }

    Ok(())
}
