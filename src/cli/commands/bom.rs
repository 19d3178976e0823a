//! `sqlwire bom` command - Bill of Materials

use miette::Result;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Diagnostics, Pipeline};
use crate::export::{text, xlsx};

use super::{finish, is_xlsx, load_config, print_written, resolve_filters, write_output};

#[derive(clap::Args, Debug)]
pub struct BomArgs {
    /// Restrict to these cables (default: configured range)
    #[arg(long = "cable", value_name = "CABLE")]
    pub cables: Vec<String>,

    /// Text format for stdout or a non-xlsx file
    #[arg(long, short = 'f', value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Output file; a .xlsx extension writes the BOM workbook
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: BomArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let pipeline = Pipeline::new(&config);
    let filters = resolve_filters(&config, &args.cables);
    let mut diags = Diagnostics::new();

    let lines = pipeline.bom(&filters, &mut diags)?;

    match args.output.as_deref() {
        Some(path) if is_xlsx(args.output.as_ref()) => {
            xlsx::write_bom(path, &lines)?;
            print_written(path, global);
        }
        path => {
            let content = text::render_bom(&lines, args.format.into())?;
            write_output(&content, path, global)?;
        }
    }

    finish(&diags, global);
    Ok(())
}
