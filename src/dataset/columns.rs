// src/dataset/columns.rs

//! Mapping from configured roles to the headers present in a dataset.

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::model::ConfigFile;
use crate::dataset::table::Dataset;
use crate::errors::{ProcureError, Result};
use crate::pricing::numeric::parse_number_text;
use crate::pricing::tier::TierTable;

/// Headers matching `pattern`, keyed by the quantity breakpoint held in the
/// pattern's last capture group.
///
/// Headers whose group did not participate or does not parse as a
/// non-negative number are skipped. When two headers yield the same
/// breakpoint, the later one wins. An empty pattern matches nothing.
pub fn find_tier_columns(headers: &[String], pattern: &str) -> Result<TierTable<String>> {
    let mut table = TierTable::new();
    if pattern.trim().is_empty() {
        return Ok(table);
    }

    let re = Regex::new(pattern)
        .map_err(|e| ProcureError::ConfigError(format!("invalid tier pattern '{pattern}': {e}")))?;
    let last_group = re.captures_len().saturating_sub(1);

    for header in headers {
        let Some(caps) = re.captures(header) else {
            continue;
        };
        let Some(group) = caps.get(last_group) else {
            continue;
        };
        match parse_number_text(group.as_str()) {
            Some(qty) if qty >= 0.0 && qty.is_finite() => {
                table.insert(qty.trunc() as u64, header.clone());
            }
            _ => debug!(header = %header, "tier header without usable breakpoint; skipped"),
        }
    }

    Ok(table)
}

/// First header when it names suppliers ("Fournisseur", "Fournisseurs",
/// "Nom fournisseur", ...) and is not already the identifier column.
///
/// Such sheets list one supplier offer per row: rows are picked by supplier
/// name while `product_code` still names the component being priced.
pub fn detect_supplier_column(headers: &[String], product_code: &str) -> Option<String> {
    let first = headers.first()?.trim();
    if first != product_code.trim() && first.to_lowercase().contains("fournisseur") {
        Some(first.to_string())
    } else {
        None
    }
}

/// Resolved role → header mapping for one dataset.
///
/// Optional roles are `None` (or an empty tier table) when the dataset has no
/// matching header; the corresponding values then read as blank.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnMapping {
    pub product_code: String,
    /// Supplier column rows are selected by, when the sheet is keyed by
    /// supplier rather than by component.
    pub supplier: Option<String>,
    pub moq: Option<String>,
    pub lot_size: Option<String>,
    pub currency: Option<String>,
    pub production_unit_cost: TierTable<String>,
    pub air_transport_unit_cost: TierTable<String>,
    pub sea_transport_unit_cost: TierTable<String>,
    pub production_time: TierTable<String>,
    pub air_transport_time: Option<String>,
    pub sea_transport_time: Option<String>,
}

impl ColumnMapping {
    /// Column whose values name the selectable items.
    pub fn selection_column(&self) -> &str {
        self.supplier.as_deref().unwrap_or(&self.product_code)
    }

    /// Match the configured roles against `dataset`'s headers.
    ///
    /// Fails with [`ProcureError::MissingColumn`] when the identifier column
    /// is absent; every other role is optional.
    pub fn resolve(dataset: &Dataset, cfg: &ConfigFile) -> Result<Self> {
        let columns = cfg.columns();
        let tiers = cfg.tiers();

        if !dataset.has_column(&columns.product_code) {
            return Err(ProcureError::MissingColumn {
                role: "product_code".to_string(),
                column: columns.product_code.clone(),
            });
        }

        let optional = |name: &str| {
            let name = name.trim();
            if name.is_empty() || !dataset.has_column(name) {
                None
            } else {
                Some(name.to_string())
            }
        };

        let headers = dataset.headers();
        let mapping = Self {
            product_code: columns.product_code.trim().to_string(),
            supplier: detect_supplier_column(headers, &columns.product_code),
            moq: optional(&columns.moq),
            lot_size: optional(&columns.lot_size),
            currency: optional(&columns.currency),
            production_unit_cost: find_tier_columns(headers, &tiers.production_unit_cost_pattern)?,
            air_transport_unit_cost: find_tier_columns(headers, &tiers.air_transport_unit_cost_pattern)?,
            sea_transport_unit_cost: find_tier_columns(headers, &tiers.sea_transport_unit_cost_pattern)?,
            production_time: find_tier_columns(headers, &tiers.production_time_pattern)?,
            air_transport_time: optional(&tiers.air_transport_time_column),
            sea_transport_time: optional(&tiers.sea_transport_time_column),
        };

        if mapping.production_unit_cost.is_empty() {
            warn!(
                pattern = %tiers.production_unit_cost_pattern,
                "no production cost tier columns found; unit costs will be 0"
            );
        }
        if mapping.production_time.is_empty() {
            warn!(
                pattern = %tiers.production_time_pattern,
                "no production time tier columns found; production times will be 0"
            );
        }

        if let Some(supplier) = &mapping.supplier {
            info!(column = %supplier, "supplier-keyed sheet; rows are selected by supplier");
        }

        debug!(
            production_tiers = ?mapping.production_unit_cost.breakpoints().collect::<Vec<_>>(),
            air_tiers = ?mapping.air_transport_unit_cost.breakpoints().collect::<Vec<_>>(),
            sea_tiers = ?mapping.sea_transport_unit_cost.breakpoints().collect::<Vec<_>>(),
            time_tiers = ?mapping.production_time.breakpoints().collect::<Vec<_>>(),
            "resolved column mapping"
        );

        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tier_columns_keyed_by_breakpoint() {
        let h = headers(&["Composants", "CU pour 1000", "CU pour 200", "CTA pour 200", "CU pour x"]);
        let t = find_tier_columns(&h, r"^CU pour (\d+)$").unwrap();
        assert_eq!(t.breakpoints().collect::<Vec<_>>(), vec![200, 1000]);
        assert_eq!(t.resolve_entry(500).unwrap().1, "CU pour 200");
    }

    #[test]
    fn last_capture_group_holds_quantity() {
        let h = headers(&["Prix air (lot) 500", "Prix air (lot) 1 000"]);
        let t = find_tier_columns(&h, r"^Prix (air|mer) \(lot\) ([\d ]+)$").unwrap();
        assert_eq!(t.breakpoints().collect::<Vec<_>>(), vec![500, 1000]);
    }

    #[test]
    fn later_duplicate_breakpoint_wins() {
        let h = headers(&["CU pour 100", "CU pour 0100"]);
        let t = find_tier_columns(&h, r"^CU pour (\d+)$").unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.resolve_entry(100).unwrap().1, "CU pour 0100");
    }

    #[test]
    fn supplier_sheet_is_detected_from_first_header() {
        let h = headers(&["Fournisseurs", "Composants", "CU pour 100"]);
        assert_eq!(detect_supplier_column(&h, "Composants").as_deref(), Some("Fournisseurs"));

        let h = headers(&[" Nom fournisseur ", "Composants"]);
        assert_eq!(detect_supplier_column(&h, "Composants").as_deref(), Some("Nom fournisseur"));

        let h = headers(&["Composants", "Fournisseur"]);
        assert_eq!(detect_supplier_column(&h, "Composants"), None);

        // Already the identifier column: nothing to switch to.
        let h = headers(&["Fournisseur", "CU pour 100"]);
        assert_eq!(detect_supplier_column(&h, "Fournisseur"), None);
        assert_eq!(detect_supplier_column(&[], "Composants"), None);
    }

    #[test]
    fn empty_pattern_matches_nothing() {
        let h = headers(&["CU pour 100"]);
        assert!(find_tier_columns(&h, "  ").unwrap().is_empty());
    }
}
