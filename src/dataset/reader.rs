// src/dataset/reader.rs

//! CSV / XLSX parsing into a [`Dataset`].

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use tracing::{debug, info};

use crate::dataset::table::Dataset;
use crate::errors::{ProcureError, Result};
use crate::pricing::numeric::CellValue;

/// File formats the reader understands, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Xlsx,
}

impl DatasetFormat {
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(DatasetFormat::Csv),
            "xlsx" | "xlsm" => Ok(DatasetFormat::Xlsx),
            other => Err(ProcureError::UnsupportedFormat(if other.is_empty() {
                name.to_string()
            } else {
                other.to_string()
            })),
        }
    }
}

/// Parse already-read file contents; `file_name` only selects the format.
pub fn parse_dataset(file_name: &str, bytes: &[u8], sheet_name: Option<&str>) -> Result<Dataset> {
    let dataset = match DatasetFormat::from_file_name(file_name)? {
        DatasetFormat::Csv => parse_csv(bytes)?,
        DatasetFormat::Xlsx => parse_xlsx(bytes, sheet_name)?,
    };
    info!(
        file = %file_name,
        rows = dataset.len(),
        columns = dataset.headers().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Comma or semicolon separated, picked from whichever occurs more often on
/// the header line. Every field is kept as text; coercion happens later.
fn parse_csv(bytes: &[u8]) -> Result<Dataset> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let delimiter = sniff_delimiter(bytes);
    debug!(delimiter = %(delimiter as char), "parsing csv");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::text).collect());
    }

    Ok(Dataset::new(headers, rows))
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let commas = header.iter().filter(|b| **b == b',').count();
    let semicolons = header.iter().filter(|b| **b == b';').count();
    if semicolons > commas { b';' } else { b',' }
}

fn parse_xlsx(bytes: &[u8], sheet_name: Option<&str>) -> Result<Dataset> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ProcureError::Spreadsheet("workbook has no worksheet".to_string()))?,
    };
    debug!(sheet = %sheet, "parsing xlsx");

    let range = workbook.worksheet_range(&sheet)?;
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Ok(Dataset::default());
    };
    let headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
    let rows = rows.map(|row| row.iter().map(cell_value).collect()).collect();

    Ok(Dataset::new(headers, rows))
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::text(s),
        other => CellValue::text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(DatasetFormat::from_file_name("a.CSV").unwrap(), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::from_file_name("b.xlsm").unwrap(), DatasetFormat::Xlsx);
        assert!(matches!(
            DatasetFormat::from_file_name("c.ods"),
            Err(ProcureError::UnsupportedFormat(ext)) if ext == "ods"
        ));
    }

    #[test]
    fn semicolon_csv_with_bom() {
        let text = "\u{feff}Composants;CU pour 100;MOQ\nPCB;2,50;100\n;;\nBoitier;;\n";
        let ds = parse_dataset("input.csv", text.as_bytes(), None).unwrap();
        assert_eq!(ds.headers(), ["Composants", "CU pour 100", "MOQ"]);
        assert_eq!(ds.len(), 2);
        let first = ds.rows().next().unwrap();
        assert_eq!(first.cell("CU pour 100"), CellValue::text("2,50"));
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let text = "Composants,MOQ,Lot\nPCB,10\nVis,1,5,extra\n";
        let ds = parse_dataset("input.csv", text.as_bytes(), None).unwrap();
        assert_eq!(ds.len(), 2);
        let rows: Vec<_> = ds.rows().collect();
        assert_eq!(rows[0].cell("Lot"), CellValue::Empty);
        assert_eq!(rows[1].cell("Lot"), CellValue::text("5"));
    }
}
