// src/pricing/offer.rs

//! Cost and lead-time offers for one component at one quantity.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::model::PricingConfig;
use crate::dates::sub_days;
use crate::pricing::numeric::{CellValue, Lenient, parse_integer_lenient};
use crate::pricing::tier::TierTable;
use crate::types::{ComponentName, TransportMode};

/// Raw attributes of one component/supplier row.
///
/// Cells stay raw here: coercion happens when an offer is computed, so a
/// malformed cell only matters if its tier is actually selected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentRecord {
    pub name: ComponentName,
    pub production_unit_cost: TierTable<CellValue>,
    pub air_transport_unit_cost: TierTable<CellValue>,
    pub sea_transport_unit_cost: TierTable<CellValue>,
    /// Production time in weeks, tiered by quantity.
    pub production_weeks: TierTable<CellValue>,
    /// Fixed air transport time in weeks; `None` when the column is absent.
    pub air_transport_weeks: Option<CellValue>,
    /// Fixed sea transport time in weeks; `None` when the column is absent.
    pub sea_transport_weeks: Option<CellValue>,
    pub moq: CellValue,
    pub lot_size: CellValue,
    pub currency: CellValue,
}

/// Inputs that fell back to their default while computing an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferField {
    ProductionUnitCost,
    AirTransportUnitCost,
    SeaTransportUnitCost,
    ProductionWeeks,
    AirTransportWeeks,
    SeaTransportWeeks,
    Moq,
    LotSize,
}

/// Cost and timing for one transport mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeOffer {
    pub mode: TransportMode,
    /// Production plus transport unit cost.
    pub unit_price: f64,
    pub production_unit_cost: f64,
    pub transport_unit_cost: f64,
    pub production_total_pre_overhead: f64,
    pub transport_total_pre_overhead: f64,
    /// Order total after handling overheads.
    pub total_cost: f64,
    pub lead_time_days: i64,
    /// Latest date to order and still receive by the target date.
    pub order_by: NaiveDate,
}

/// Result of [`compute_offer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    pub component: ComponentName,
    pub requested_qty: u64,
    /// Quantity after MOQ and lot-size rounding.
    pub qty_ordered: u64,
    pub currency: String,
    pub air: ModeOffer,
    pub sea: ModeOffer,
    pub defaulted: Vec<OfferField>,
}

impl Offer {
    pub fn mode(&self, mode: TransportMode) -> &ModeOffer {
        match mode {
            TransportMode::Air => &self.air,
            TransportMode::Sea => &self.sea,
        }
    }

    /// Cheaper mode; air wins a tie.
    pub fn cheapest_mode(&self) -> TransportMode {
        if self.air.total_cost <= self.sea.total_cost {
            TransportMode::Air
        } else {
            TransportMode::Sea
        }
    }

    pub fn lead_times_differ(&self) -> bool {
        self.air.lead_time_days != self.sea.lead_time_days
    }
}

/// Round `quantity` up to the next multiple of `lot_size`. Lots of 0 or 1
/// leave the quantity unchanged.
pub fn ceil_to_lot(quantity: u64, lot_size: u64) -> u64 {
    if lot_size <= 1 {
        return quantity;
    }
    quantity.div_ceil(lot_size).saturating_mul(lot_size)
}

/// Quantity actually ordered: MOQ first, then lot rounding.
pub fn quantity_to_order(requested: u64, moq: u64, lot_size: u64) -> u64 {
    ceil_to_lot(requested.max(moq), lot_size)
}

/// `(amount + handling_flat) * (1 + handling_percent / 100)`.
pub fn apply_overheads(amount: f64, pricing: &PricingConfig) -> f64 {
    (amount + pricing.handling_flat) * (1.0 + pricing.handling_percent / 100.0)
}

/// Compute the air and sea offer for `record` at `requested_qty`, with
/// order-by dates counted back from `target_date`.
///
/// Never fails: blank or malformed cells resolve to their defaults and are
/// listed in [`Offer::defaulted`].
pub fn compute_offer(
    record: &ComponentRecord,
    requested_qty: u64,
    target_date: NaiveDate,
    pricing: &PricingConfig,
) -> Offer {
    let mut defaulted = Vec::new();
    let mut track = |field: OfferField, lenient: Lenient<f64>| {
        if lenient.defaulted {
            defaulted.push(field);
        }
        lenient.value
    };

    let production_unit_cost = track(
        OfferField::ProductionUnitCost,
        record.production_unit_cost.resolve_lenient(requested_qty, 0.0),
    );
    let air_unit_cost = track(
        OfferField::AirTransportUnitCost,
        record.air_transport_unit_cost.resolve_lenient(requested_qty, 0.0),
    );
    let sea_unit_cost = track(
        OfferField::SeaTransportUnitCost,
        record.sea_transport_unit_cost.resolve_lenient(requested_qty, 0.0),
    );

    let production_weeks = tiered_weeks(&record.production_weeks, requested_qty, &mut defaulted);
    let air_weeks = fixed_weeks(
        record.air_transport_weeks.as_ref(),
        OfferField::AirTransportWeeks,
        &mut defaulted,
    );
    let sea_weeks = fixed_weeks(
        record.sea_transport_weeks.as_ref(),
        OfferField::SeaTransportWeeks,
        &mut defaulted,
    );

    let moq = order_multiple(&record.moq, OfferField::Moq, &mut defaulted);
    let lot_size = order_multiple(&record.lot_size, OfferField::LotSize, &mut defaulted);
    let qty_ordered = quantity_to_order(requested_qty, moq, lot_size);

    let currency = match &record.currency {
        CellValue::Empty => pricing.default_currency.clone(),
        other => other.to_string(),
    };

    let lead_days = |transport_weeks: i64| production_weeks.saturating_add(transport_weeks).saturating_mul(7);

    let build = |mode: TransportMode, transport_unit_cost: f64, lead_time_days: i64| {
        let unit_price = production_unit_cost + transport_unit_cost;
        let qty = qty_ordered as f64;
        ModeOffer {
            mode,
            unit_price,
            production_unit_cost,
            transport_unit_cost,
            production_total_pre_overhead: qty * production_unit_cost,
            transport_total_pre_overhead: qty * transport_unit_cost,
            total_cost: apply_overheads(qty * unit_price, pricing),
            lead_time_days,
            order_by: sub_days(target_date, lead_time_days),
        }
    };

    let air = build(TransportMode::Air, air_unit_cost, lead_days(air_weeks));
    let sea = build(TransportMode::Sea, sea_unit_cost, lead_days(sea_weeks));

    defaulted.sort();
    defaulted.dedup();

    debug!(
        component = %record.name,
        requested_qty,
        qty_ordered,
        air_lead_days = air.lead_time_days,
        sea_lead_days = sea.lead_time_days,
        air_total = air.total_cost,
        sea_total = sea.total_cost,
        ?defaulted,
        "computed offer"
    );
    // MOQ and lot defaults are not reported.
    if defaulted
        .iter()
        .any(|f| !matches!(f, OfferField::Moq | OfferField::LotSize))
    {
        warn!(component = %record.name, ?defaulted, "offer built from defaulted cells");
    }

    Offer {
        component: record.name.clone(),
        requested_qty,
        qty_ordered,
        currency,
        air,
        sea,
        defaulted,
    }
}

/// Whole weeks at the applicable production tier (fractions truncate).
fn tiered_weeks(table: &TierTable<CellValue>, qty: u64, defaulted: &mut Vec<OfferField>) -> i64 {
    match table.resolve_entry(qty) {
        Some((_, cell)) => {
            let weeks = parse_integer_lenient(cell, 0);
            if weeks.defaulted {
                defaulted.push(OfferField::ProductionWeeks);
            }
            weeks.value
        }
        None => 0,
    }
}

/// Fixed transport weeks. A missing column is a clean 0; there is no
/// fallback to the tiered production columns.
fn fixed_weeks(cell: Option<&CellValue>, field: OfferField, defaulted: &mut Vec<OfferField>) -> i64 {
    match cell {
        Some(cell) => {
            let weeks = parse_integer_lenient(cell, 0);
            if weeks.defaulted {
                defaulted.push(field);
            }
            weeks.value
        }
        None => 0,
    }
}

/// MOQ and lot size: at least 1, whatever the cell holds.
fn order_multiple(cell: &CellValue, field: OfferField, defaulted: &mut Vec<OfferField>) -> u64 {
    let parsed = parse_integer_lenient(cell, 1);
    if parsed.defaulted {
        defaulted.push(field);
    }
    parsed.value.max(1) as u64
}
