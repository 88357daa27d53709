// src/pricing/tier.rs

//! Step-priced tier tables.
//!
//! A [`TierTable`] maps quantity breakpoints to values. Resolution uses the
//! "tranche inférieure" rule: the largest breakpoint at or below the requested
//! quantity wins; quantities below every breakpoint use the smallest one.

use std::collections::BTreeMap;

use crate::pricing::numeric::{CellValue, Lenient, parse_numeric_lenient};

/// Ordered mapping from quantity breakpoint to value.
///
/// Breakpoints are unique by construction (inserting an existing breakpoint
/// replaces its value). The table is usually built once per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable<V> {
    tiers: BTreeMap<u64, V>,
}

impl<V> Default for TierTable<V> {
    fn default() -> Self {
        Self {
            tiers: BTreeMap::new(),
        }
    }
}

impl<V> TierTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, breakpoint: u64, value: V) -> Option<V> {
        self.tiers.insert(breakpoint, value)
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Breakpoints in ascending order.
    pub fn breakpoints(&self) -> impl Iterator<Item = u64> + '_ {
        self.tiers.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &V)> + '_ {
        self.tiers.iter().map(|(bp, v)| (*bp, v))
    }

    /// Breakpoint that applies to `quantity`, or `None` for an empty table.
    pub fn select_breakpoint(&self, quantity: u64) -> Option<u64> {
        self.tiers
            .range(..=quantity)
            .next_back()
            .or_else(|| self.tiers.iter().next())
            .map(|(bp, _)| *bp)
    }

    /// Breakpoint and value that apply to `quantity`.
    pub fn resolve_entry(&self, quantity: u64) -> Option<(u64, &V)> {
        let bp = self.select_breakpoint(quantity)?;
        self.tiers.get(&bp).map(|v| (bp, v))
    }

    /// Transform every value, keeping breakpoints.
    pub fn map<U>(&self, mut f: impl FnMut(&V) -> U) -> TierTable<U> {
        TierTable {
            tiers: self.tiers.iter().map(|(bp, v)| (*bp, f(v))).collect(),
        }
    }
}

impl TierTable<f64> {
    /// Value at the applicable breakpoint; an empty table resolves to 0.
    pub fn resolve(&self, quantity: u64) -> f64 {
        self.resolve_entry(quantity).map(|(_, v)| *v).unwrap_or(0.0)
    }
}

impl TierTable<CellValue> {
    /// Coerce the cell at the applicable breakpoint, falling back to `default`
    /// when that cell is blank or unparsable.
    ///
    /// An empty table is not bad input: it resolves to a clean 0.
    pub fn resolve_lenient(&self, quantity: u64, default: f64) -> Lenient<f64> {
        match self.resolve_entry(quantity) {
            Some((_, cell)) => parse_numeric_lenient(cell, default),
            None => Lenient {
                value: 0.0,
                defaulted: false,
            },
        }
    }
}

impl<V> FromIterator<(u64, V)> for TierTable<V> {
    fn from_iter<I: IntoIterator<Item = (u64, V)>>(iter: I) -> Self {
        Self {
            tiers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production() -> TierTable<f64> {
        [(200, 5.50), (1000, 5.00), (5000, 4.50)].into_iter().collect()
    }

    #[test]
    fn picks_largest_breakpoint_at_or_below_quantity() {
        let t = production();
        assert_eq!(t.resolve(800), 5.50);
        assert_eq!(t.resolve(1000), 5.00);
        assert_eq!(t.resolve(4999), 5.00);
        assert_eq!(t.resolve(10_000), 4.50);
    }

    #[test]
    fn quantity_below_all_breakpoints_uses_smallest() {
        let t = production();
        assert_eq!(t.select_breakpoint(10), Some(200));
        assert_eq!(t.resolve(0), 5.50);
    }

    #[test]
    fn empty_table_resolves_to_zero() {
        let t: TierTable<f64> = TierTable::new();
        assert_eq!(t.resolve(123), 0.0);
        assert_eq!(t.select_breakpoint(123), None);

        let cells: TierTable<CellValue> = TierTable::new();
        let r = cells.resolve_lenient(5, 9.0);
        assert_eq!(r.value, 0.0);
        assert!(!r.defaulted);
    }

    #[test]
    fn blank_cell_at_selected_tier_does_not_fall_through() {
        let cells: TierTable<CellValue> = [
            (100, CellValue::Number(3.0)),
            (500, CellValue::Empty),
        ]
        .into_iter()
        .collect();

        let r = cells.resolve_lenient(600, 0.0);
        assert_eq!(r.value, 0.0);
        assert!(r.defaulted);
        assert_eq!(cells.resolve_lenient(200, 0.0).value, 3.0);
    }

    #[test]
    fn map_keeps_breakpoints() {
        let names: TierTable<String> = [(200, "CU pour 200".to_string())].into_iter().collect();
        let lens = names.map(|s| s.len());
        assert_eq!(lens.breakpoints().collect::<Vec<_>>(), vec![200]);
    }
}
