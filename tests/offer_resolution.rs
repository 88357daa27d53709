// tests/offer_resolution.rs

use procureplan::config::PricingConfig;
use procureplan::pricing::{CellValue, OfferField, TierTable, compute_offer};
use procureplan::types::TransportMode;
use procureplan_test_utils::builders::ComponentRecordBuilder;
use procureplan_test_utils::{date, init_tracing};

#[test]
fn tier_below_request_is_selected() {
    let table: TierTable<f64> = [(200, 5.50), (1000, 5.00), (5000, 4.50)].into_iter().collect();
    assert_eq!(table.resolve(800), 5.50);
    assert_eq!(table.resolve(1000), 5.00);
    assert_eq!(table.resolve(99_999), 4.50);
    // Below every breakpoint: the smallest tier applies, never zero.
    assert_eq!(table.resolve(10), 5.50);
    assert_eq!(TierTable::<f64>::new().resolve(10), 0.0);
}

#[test]
fn offer_composes_cost_and_lead_time_per_mode() {
    init_tracing();

    let record = ComponentRecordBuilder::new("PCB")
        .production_cost(&[(200, 5.50), (1000, 5.00), (5000, 4.50)])
        .air_cost(&[(200, 0.50)])
        .sea_cost(&[(200, 0.20)])
        .production_weeks(&[(200, 2.0)])
        .air_weeks(1.0)
        .sea_weeks(4.0)
        .moq(100.0)
        .lot_size(50.0)
        .build();

    let pricing = PricingConfig {
        handling_flat: 25.0,
        handling_percent: 10.0,
        ..PricingConfig::default()
    };
    let target = date(2025, 9, 1);
    let offer = compute_offer(&record, 800, target, &pricing);

    assert_eq!(offer.qty_ordered, 800);
    assert_eq!(offer.air.unit_price, 5.50 + 0.50);
    assert!((offer.air.total_cost - (800.0 * 6.0 + 25.0) * 1.1).abs() < 1e-9);
    assert!((offer.sea.total_cost - (800.0 * 5.70 + 25.0) * 1.1).abs() < 1e-9);

    assert_eq!(offer.air.lead_time_days, 21);
    assert_eq!(offer.air.order_by, date(2025, 8, 11));
    assert_eq!(offer.sea.lead_time_days, 42);
    assert_eq!(offer.sea.order_by, date(2025, 7, 21));

    assert_eq!(offer.mode(TransportMode::Sea).mode, TransportMode::Sea);
    assert_eq!(offer.cheapest_mode(), TransportMode::Sea);
    assert!(offer.lead_times_differ());
}

#[test]
fn moq_then_lot_rounding() {
    let record = ComponentRecordBuilder::new("Vis").moq(100.0).lot_size(50.0).build();
    let offer = compute_offer(&record, 30, date(2025, 1, 1), &PricingConfig::default());
    assert_eq!(offer.requested_qty, 30);
    assert_eq!(offer.qty_ordered, 100);

    let offer = compute_offer(&record, 101, date(2025, 1, 1), &PricingConfig::default());
    assert_eq!(offer.qty_ordered, 150);
}

#[test]
fn french_formatted_cells_are_parsed() {
    let mut record = ComponentRecordBuilder::new("Boitier").moq(1.0).build();
    record.production_unit_cost = [(1, CellValue::text("1 234,56 €"))].into_iter().collect();
    record.production_weeks = [(1, CellValue::text("3 semaines"))].into_iter().collect();
    record.lot_size = CellValue::text("0");

    let offer = compute_offer(&record, 2, date(2025, 1, 1), &PricingConfig::default());
    assert!((offer.air.production_unit_cost - 1234.56).abs() < 1e-9);
    assert_eq!(offer.air.lead_time_days, 21);
    // A lot of 0 is clamped to 1 rather than reported as bad input.
    assert_eq!(offer.qty_ordered, 2);
    assert!(offer.defaulted.is_empty());
}

#[test]
fn garbage_cells_default_to_zero_and_are_flagged() {
    let mut record = ComponentRecordBuilder::new("Câble")
        .air_weeks(1.0)
        .moq(1.0)
        .lot_size(1.0)
        .build();
    record.production_unit_cost = [(1, CellValue::text("sur devis"))].into_iter().collect();
    record.air_transport_unit_cost = [(1, CellValue::Empty)].into_iter().collect();

    let offer = compute_offer(&record, 10, date(2025, 1, 1), &PricingConfig::default());
    assert_eq!(offer.air.total_cost, 0.0);
    assert_eq!(
        offer.defaulted,
        vec![OfferField::ProductionUnitCost, OfferField::AirTransportUnitCost]
    );
}

#[test]
fn blank_moq_and_lot_count_as_one() {
    let record = ComponentRecordBuilder::new("Vis").build();
    let offer = compute_offer(&record, 7, date(2025, 1, 1), &PricingConfig::default());
    assert_eq!(offer.qty_ordered, 7);
    assert_eq!(offer.defaulted, vec![OfferField::Moq, OfferField::LotSize]);
}

#[test]
fn blank_currency_uses_configured_default() {
    let record = ComponentRecordBuilder::new("PCB").build();
    let pricing = PricingConfig {
        default_currency: "CHF".to_string(),
        ..PricingConfig::default()
    };
    let offer = compute_offer(&record, 1, date(2025, 1, 1), &pricing);
    assert_eq!(offer.currency, "CHF");

    let record = ComponentRecordBuilder::new("PCB").currency("USD").build();
    let offer = compute_offer(&record, 1, date(2025, 1, 1), &pricing);
    assert_eq!(offer.currency, "USD");
}
