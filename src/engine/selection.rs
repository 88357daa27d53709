// src/engine/selection.rs

//! Per-component quantity and transport-mode choices for a planning run.

use std::collections::HashMap;

use serde::Serialize;

use crate::pricing::offer::Offer;
use crate::types::{ComponentName, TransportMode};

/// User choices shared by plan and track runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Quantity used when a component has no override (or an override of 0).
    pub default_qty: u64,
    pub quantities: HashMap<ComponentName, u64>,
    /// Requested modes; only honoured when the choice actually matters.
    pub modes: HashMap<ComponentName, TransportMode>,
    pub default_mode: TransportMode,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            default_qty: 100,
            quantities: HashMap::new(),
            modes: HashMap::new(),
            default_mode: TransportMode::default(),
        }
    }
}

impl SelectionOptions {
    pub fn with_default_qty(default_qty: u64) -> Self {
        Self {
            default_qty,
            ..Self::default()
        }
    }

    /// Override for `component`, or the default when absent or 0.
    pub fn quantity_for(&self, component: &str) -> u64 {
        match self.quantities.get(component) {
            Some(&qty) if qty > 0 => qty,
            _ => self.default_qty,
        }
    }
}

/// Transport mode retained for one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeChoice {
    pub mode: TransportMode,
    /// `true` when there was nothing to choose: the component is the
    /// terminal, or both modes take equally long.
    pub fixed: bool,
}

/// Pick the mode for `offer`.
///
/// The terminal and components whose lead times do not differ get the
/// cheaper mode (air on a cost tie). Others get `requested`, else `default`.
pub fn choose_mode(
    offer: &Offer,
    is_terminal: bool,
    requested: Option<TransportMode>,
    default: TransportMode,
) -> ModeChoice {
    if is_terminal || !offer.lead_times_differ() {
        return ModeChoice {
            mode: offer.cheapest_mode(),
            fixed: true,
        };
    }
    ModeChoice {
        mode: requested.unwrap_or(default),
        fixed: false,
    }
}

/// Order-preserving de-duplication of a user selection (names trimmed,
/// blanks dropped).
pub fn normalise_selection<I, S>(names: I) -> Vec<ComponentName>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<ComponentName> = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::PricingConfig;
    use crate::pricing::numeric::CellValue;
    use crate::pricing::offer::{ComponentRecord, compute_offer};
    use chrono::NaiveDate;

    fn offer(air_cost: f64, sea_cost: f64, air_weeks: f64, sea_weeks: f64) -> Offer {
        let record = ComponentRecord {
            name: "PCB".to_string(),
            air_transport_unit_cost: [(1, CellValue::Number(air_cost))].into_iter().collect(),
            sea_transport_unit_cost: [(1, CellValue::Number(sea_cost))].into_iter().collect(),
            air_transport_weeks: Some(CellValue::Number(air_weeks)),
            sea_transport_weeks: Some(CellValue::Number(sea_weeks)),
            ..ComponentRecord::default()
        };
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        compute_offer(&record, 10, date, &PricingConfig::default())
    }

    #[test]
    fn zero_override_falls_back_to_default() {
        let mut opts = SelectionOptions::with_default_qty(250);
        opts.quantities.insert("PCB".to_string(), 0);
        opts.quantities.insert("Vis".to_string(), 40);
        assert_eq!(opts.quantity_for("PCB"), 250);
        assert_eq!(opts.quantity_for("Vis"), 40);
        assert_eq!(opts.quantity_for("Boitier"), 250);
    }

    #[test]
    fn user_choice_applies_when_lead_times_differ() {
        let o = offer(2.0, 1.0, 1.0, 6.0);
        let c = choose_mode(&o, false, Some(TransportMode::Sea), TransportMode::Air);
        assert_eq!(c, ModeChoice { mode: TransportMode::Sea, fixed: false });
        let c = choose_mode(&o, false, None, TransportMode::Air);
        assert_eq!(c.mode, TransportMode::Air);
    }

    #[test]
    fn equal_lead_times_fix_the_cheaper_mode() {
        let o = offer(2.0, 1.0, 3.0, 3.0);
        let c = choose_mode(&o, false, Some(TransportMode::Air), TransportMode::Air);
        assert_eq!(c, ModeChoice { mode: TransportMode::Sea, fixed: true });
    }

    #[test]
    fn terminal_is_fixed_and_air_wins_ties() {
        let o = offer(1.0, 1.0, 1.0, 6.0);
        let c = choose_mode(&o, true, Some(TransportMode::Sea), TransportMode::Sea);
        assert_eq!(c, ModeChoice { mode: TransportMode::Air, fixed: true });
    }

    #[test]
    fn selection_is_deduplicated_in_order() {
        assert_eq!(normalise_selection(["B", " A", "B ", ""]), vec!["B", "A"]);
    }
}
