//! Spreadsheet output
//!
//! Workbooks carry a fixed creation timestamp so that re-running on an
//! unchanged database produces identical files.

use std::fs;
use std::path::Path;

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet, XlsxError};

use crate::core::labels::LabelList;
use crate::entities::{BomLine, Quantity};
use crate::export::ExportError;

pub const BOM_SHEET_NAME: &str = "BOM";
pub const CABLE_LABELS_SHEET_NAME: &str = "CableLabels";
pub const WIRE_LABELS_SHEET_NAME: &str = "WireLabels";

pub const BOM_HEADERS: [&str; 5] = ["description", "mpn", "manufacturer", "quantity", "unit"];

fn new_workbook() -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    let properties = DocProperties::new()
        .set_title("sqlwire")
        .set_creation_datetime(&created);
    workbook.set_properties(&properties);
    Ok(workbook)
}

fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, format)?;
    }
    Ok(())
}

/// Write the BOM sheet
pub fn write_bom(path: &Path, lines: &[BomLine]) -> Result<(), ExportError> {
    let mut workbook = new_workbook()?;
    let header_format = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(BOM_SHEET_NAME)?;
        write_headers(sheet, &BOM_HEADERS, &header_format)?;

        for (i, line) in lines.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, &line.description)?;
            sheet.write_string(row, 1, &line.mpn)?;
            sheet.write_string(row, 2, &line.manufacturer)?;
            match &line.quantity {
                Quantity::Text(s) => {
                    sheet.write_string(row, 3, s)?;
                }
                q => {
                    sheet.write_number(row, 3, q.as_f64().unwrap_or_default())?;
                }
            }
            sheet.write_string(row, 4, &line.unit)?;
        }
        sheet.autofit();
    }

    ensure_parent(path)?;
    workbook.save(path)?;
    Ok(())
}

/// Write one label list as a single-column sheet. Headings and group
/// titles are bold.
pub fn write_labels(path: &Path, sheet_name: &str, list: &LabelList) -> Result<(), ExportError> {
    let mut workbook = new_workbook()?;
    let bold = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name)?;
        sheet.write_string_with_format(0, 0, &list.heading, &bold)?;

        let mut row: u32 = 1;
        for group in &list.groups {
            if let Some(title) = &group.title {
                sheet.write_string_with_format(row, 0, title, &bold)?;
                row += 1;
            }
            for label in &group.labels {
                sheet.write_string(row, 0, label)?;
                row += 1;
            }
        }
        sheet.autofit();
    }

    ensure_parent(path)?;
    workbook.save(path)?;
    Ok(())
}
