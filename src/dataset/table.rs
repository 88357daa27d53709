// src/dataset/table.rs

//! In-memory table of spreadsheet rows with header-based lookup.

use std::collections::HashMap;

use crate::pricing::CellValue;

/// Headers plus rows of raw cells, as read from a CSV or XLSX sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    index: HashMap<String, usize>,
}

impl Dataset {
    /// Build a table from raw headers and rows.
    ///
    /// - Headers are trimmed; on duplicate headers the first column wins.
    /// - Short rows are padded with empty cells, long rows truncated.
    /// - Rows where every cell is blank are dropped.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();

        let mut index = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            index.entry(h.clone()).or_insert(i);
        }

        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, CellValue::Empty);
                cells
            })
            .filter(|cells| !cells.iter().all(CellValue::is_blank))
            .collect();

        Self {
            headers,
            rows,
            index,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name.trim())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            index: &self.index,
            cells,
        })
    }
}

/// Borrowed view of one dataset row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: &'a HashMap<String, usize>,
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell under `column`, or `None` if the dataset has no such column.
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let i = *self.index.get(column)?;
        self.cells.get(i)
    }

    /// Owned cell under `column`; missing columns read as empty.
    pub fn cell(&self, column: &str) -> CellValue {
        self.get(column).cloned().unwrap_or_default()
    }
}
