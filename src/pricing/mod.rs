// src/pricing/mod.rs

//! Tiered pricing and lead-time resolution.
//!
//! - [`numeric`] coerces free-form spreadsheet cells to numbers.
//! - [`tier`] holds quantity-breakpoint tables and the tier selection rule.
//! - [`offer`] composes tiers, MOQ/lot rounding and overheads into per-mode offers.

pub mod numeric;
pub mod offer;
pub mod tier;

pub use numeric::{CellValue, Lenient, parse_integer_lenient, parse_numeric_lenient};
pub use offer::{
    ComponentRecord, ModeOffer, Offer, OfferField, apply_overheads, ceil_to_lot, compute_offer,
    quantity_to_order,
};
pub use tier::TierTable;
