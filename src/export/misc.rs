//! Miscellaneous BOM items (fasteners, tape, sleeving) from a CSV file
//!
//! The file has the same columns as the BOM sheet. Items are appended to the
//! computed BOM without transformation.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::core::diagnostics::{codes, Diagnostics};
use crate::entities::{BomLine, Quantity};
use crate::export::ExportError;

/// Build a map from header name to column index
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_lowercase(), i))
        .collect()
}

fn get_field(record: &StringRecord, header_map: &HashMap<String, usize>, field: &str) -> String {
    header_map
        .get(field)
        .and_then(|&idx| record.get(idx))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Read the misc item list. A missing file is not an error: it is recorded as
/// a warning and no items are added.
pub fn read_misc_bom(path: &Path, diags: &mut Diagnostics) -> Result<Vec<BomLine>, ExportError> {
    if !path.is_file() {
        diags.warn(
            codes::MISC_BOM_MISSING,
            path.display().to_string(),
            "misc BOM file not found, no extra items added",
        );
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)?;
    parse_misc_bom(&contents, &path.display().to_string(), diags)
}

/// Parse misc items from CSV text
pub fn parse_misc_bom(
    contents: &str,
    source: &str,
    diags: &mut Diagnostics,
) -> Result<Vec<BomLine>, ExportError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers = rdr.headers()?.clone();
    let header_map = build_header_map(&headers);

    let mut lines = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let row_num = row_idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                diags.warn(
                    codes::MISC_BOM_ROW_INVALID,
                    format!("{}:{}", source, row_num),
                    format!("CSV parse error: {}", e),
                );
                continue;
            }
        };

        lines.push(BomLine {
            description: get_field(&record, &header_map, "description"),
            mpn: get_field(&record, &header_map, "mpn"),
            manufacturer: get_field(&record, &header_map, "manufacturer"),
            quantity: Quantity::parse(&get_field(&record, &header_map, "quantity")),
            unit: get_field(&record, &header_map, "unit"),
        });
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_misc_items() {
        let csv = "\u{feff}description,mpn,manufacturer,quantity,unit\n\
                   Cable tie,CT-100,Acme,50,pcs\n\
                   Tape,T-19,,as needed,roll\n";
        let mut diags = Diagnostics::new();
        let lines = parse_misc_bom(csv, "MiscBOM.csv", &mut diags).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].description, "Cable tie");
        assert_eq!(lines[0].quantity, Quantity::Count(50));
        assert_eq!(lines[1].quantity, Quantity::Text("as needed".into()));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_rows_are_kept_verbatim() {
        let csv = "description,mpn,manufacturer,quantity,unit\n,,Acme,1,pcs\n Heat shrink , HS-6 ,,2, m\n";
        let mut diags = Diagnostics::new();
        let lines = parse_misc_bom(csv, "MiscBOM.csv", &mut diags).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].description, "");
        assert_eq!(lines[0].manufacturer, "Acme");
        assert_eq!(lines[1].description, " Heat shrink ");
        assert_eq!(lines[1].mpn, " HS-6 ");
        assert_eq!(lines[1].unit, " m");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_file_is_a_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let mut diags = Diagnostics::new();
        let lines = read_misc_bom(&tmp.path().join("MiscBOM.csv"), &mut diags).unwrap();
        assert!(lines.is_empty());
        assert!(diags.has_code(codes::MISC_BOM_MISSING));
    }
}
