// src/dataset/record.rs

//! Component lookups over a dataset through a resolved [`ColumnMapping`].

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::model::AssemblySection;
use crate::dataset::columns::ColumnMapping;
use crate::dataset::table::{Dataset, Row};
use crate::errors::{ProcureError, Result};
use crate::pricing::numeric::{CellValue, parse_integer_lenient};
use crate::pricing::offer::ComponentRecord;
use crate::pricing::tier::TierTable;
use crate::types::ComponentName;

impl Dataset {
    /// Sorted, de-duplicated names in the selection column (supplier or
    /// product identifier) of every non-blank row.
    pub fn component_names(&self, mapping: &ColumnMapping) -> Vec<ComponentName> {
        let column = mapping.selection_column();
        self.rows()
            .map(|row| row.cell(column).to_string())
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// First row whose selection column equals `name` (after trimming).
    pub fn find_row(&self, mapping: &ColumnMapping, name: &str) -> Option<Row<'_>> {
        self.find_row_in(mapping.selection_column(), name)
    }

    fn find_row_in(&self, column: &str, name: &str) -> Option<Row<'_>> {
        let name = name.trim();
        self.rows().find(|row| row.cell(column).to_string() == name)
    }

    /// Raw record for `name`, cells uncoerced.
    pub fn record(&self, mapping: &ColumnMapping, name: &str) -> Result<ComponentRecord> {
        let row = self
            .find_row(mapping, name)
            .ok_or_else(|| ProcureError::UnknownComponent(name.trim().to_string()))?;
        Ok(record_from_row(&row, mapping, name.trim()))
    }

    /// Assembly duration in days.
    ///
    /// The assembly row is always looked up by product identifier. Reads `duration_weeks_column` on the assembly row when both exist; an
    /// unparsable cell falls back to `duration_weeks`. Negative weeks clamp
    /// to 0.
    pub fn assembly_days(&self, mapping: &ColumnMapping, assembly: &AssemblySection) -> i64 {
        let fallback = assembly.duration_weeks;

        let weeks = match assembly.duration_weeks_column.as_deref().map(str::trim) {
            Some(column) if !column.is_empty() && self.has_column(column) => {
                match self.find_row_in(&mapping.product_code, &assembly.component_name) {
                    Some(row) => {
                        let parsed = parse_integer_lenient(&row.cell(column), fallback);
                        if parsed.defaulted {
                            warn!(
                                column = %column,
                                fallback_weeks = fallback,
                                "assembly duration cell unparsable; using configured weeks"
                            );
                        }
                        parsed.value
                    }
                    None => fallback,
                }
            }
            _ => fallback,
        };

        let days = weeks.max(0).saturating_mul(7);
        debug!(weeks, days, "assembly duration");
        days
    }
}

fn record_from_row(row: &Row<'_>, mapping: &ColumnMapping, name: &str) -> ComponentRecord {
    let optional = |column: &Option<String>| -> CellValue {
        column.as_deref().map(|c| row.cell(c)).unwrap_or_default()
    };
    let tiered = |columns: &TierTable<String>| -> TierTable<CellValue> { columns.map(|c| row.cell(c)) };

    ComponentRecord {
        name: name.to_string(),
        production_unit_cost: tiered(&mapping.production_unit_cost),
        air_transport_unit_cost: tiered(&mapping.air_transport_unit_cost),
        sea_transport_unit_cost: tiered(&mapping.sea_transport_unit_cost),
        production_weeks: tiered(&mapping.production_time),
        air_transport_weeks: mapping.air_transport_time.as_deref().map(|c| row.cell(c)),
        sea_transport_weeks: mapping.sea_transport_time.as_deref().map(|c| row.cell(c)),
        moq: optional(&mapping.moq),
        lot_size: optional(&mapping.lot_size),
        currency: optional(&mapping.currency),
    }
}
