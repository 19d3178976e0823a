//! Text renderings of reports for stdout or plain files

use tabled::{builder::Builder, settings::Style};

use crate::core::labels::LabelList;
use crate::entities::BomLine;
use crate::export::xlsx::BOM_HEADERS;
use crate::export::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Markdown,
    Csv,
    Json,
    Yaml,
}

/// Render BOM lines in the requested format
pub fn render_bom(lines: &[BomLine], format: TextFormat) -> Result<String, ExportError> {
    match format {
        TextFormat::Markdown => Ok(bom_markdown(lines)),
        TextFormat::Csv => bom_csv(lines),
        TextFormat::Json => Ok(serde_json::to_string_pretty(lines)? + "\n"),
        TextFormat::Yaml => Ok(serde_yml::to_string(lines)?),
    }
}

fn bom_markdown(lines: &[BomLine]) -> String {
    let mut table = Builder::default();
    table.push_record(BOM_HEADERS);
    for line in lines {
        table.push_record([
            line.description.clone(),
            line.mpn.clone(),
            line.manufacturer.clone(),
            line.quantity.to_string(),
            line.unit.clone(),
        ]);
    }
    let mut out = table.build().with(Style::markdown()).to_string();
    out.push('\n');
    out
}

fn bom_csv(lines: &[BomLine]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for line in lines {
        wtr.serialize(line)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One label per line: heading, then each group title followed by its labels
pub fn render_labels(list: &LabelList) -> String {
    let mut out = String::new();
    for row in list.rows() {
        out.push_str(&row);
        out.push('\n');
    }
    out
}
