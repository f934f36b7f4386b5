// [libs/core/pricing/tests/engine_test.rs]
use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use tollgate_core_pricing::{amount_for_credits, credits_for_amount, operation_cost};
use tollgate_domain_models::{OperationCost, OperationCostOptions, PricingConfig};

#[test]
fn scenario_one_purchase_of_one_hbar_yields_fifty_credits() {
    // 1.0 HBAR @ 0.05 USD/HBAR = 0.05 USD, primer tramo a 1000 créditos/USD.
    let config = PricingConfig::default();
    let amount_usd = 1.0 * 0.05;

    let credits = credits_for_amount(amount_usd, &config);

    assert_eq!(credits, 50);
}

#[test]
fn non_positive_amounts_yield_zero_credits() {
    let config = PricingConfig::default();
    assert_eq!(credits_for_amount(0.0, &config), 0);
    assert_eq!(credits_for_amount(-5.0, &config), 0);
}

#[test]
fn credits_accrue_at_higher_rate_once_tier_boundary_crossed() {
    let config = PricingConfig::default();
    // 50 USD straddles the 0 -> 50_000 credit tier (50usd*1000=50_000 exactly)
    // and the 50_000 -> 250_000 tier (1_100 credits/usd).
    let at_boundary = credits_for_amount(50.0, &config);
    assert_eq!(at_boundary, 50_000);

    let past_boundary = credits_for_amount(50.1, &config);
    // 50usd fills the first tier to exactly 50_000, the remaining 0.1usd
    // spills into the second tier at 1_100 credits/usd.
    assert_eq!(past_boundary, 50_000 + 110);
}

#[test]
fn amount_for_credits_is_a_reasonable_inverse_of_credits_for_amount() {
    let config = PricingConfig::default();
    let credits = credits_for_amount(12.34, &config);
    let amount_back = amount_for_credits(credits, &config);

    // Flooring then ceiling can only ever overestimate the inverse, and only
    // by less than the price of one credit in the active tier plus one tick.
    assert!(amount_back >= 12.0);
    assert!(amount_back < 12.34 + 0.01);
}

#[test]
fn amount_for_credits_rounds_up_to_the_sub_unit_tick() {
    let config = PricingConfig::default();
    let amount = amount_for_credits(1, &config);
    // 1 credit / 1000 credits-per-usd = 0.001, rounded up to the 1e-8 tick
    // lands back on 0.001 exactly since it is already tick-aligned.
    assert!((amount - 0.001).abs() < 1e-9);
}

#[test]
fn empty_purchase_tiers_fall_back_to_flat_conversion_rate() {
    let mut config = PricingConfig::default();
    config.purchase_tiers = vec![];

    let credits = credits_for_amount(2.0, &config);

    assert_eq!(credits, (2.0 * config.conversion_rate).floor() as i64);
}

#[test]
fn unknown_operation_name_is_free_and_not_an_error() {
    let catalog: HashMap<String, OperationCost> = HashMap::new();
    let config = PricingConfig::default();
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();

    let cost = operation_cost(
        &catalog,
        "does.not.exist",
        &config,
        OperationCostOptions::default(),
        now,
    );

    assert_eq!(cost, 0);
}

#[test]
fn operation_cost_applies_modifiers_in_fixed_order() {
    let mut catalog = HashMap::new();
    catalog.insert(
        "transfer.token".to_string(),
        OperationCost {
            name: "transfer.token".to_string(),
            base_cost: 100,
            category: "transfer".to_string(),
            network_class_multiplier: Some(2.0),
            size_multiplier: Some(1.0),
        },
    );
    let config = PricingConfig::default();
    let off_peak = Utc.with_ymd_and_hms(2026, 1, 1, 2, 0, 0).unwrap();

    let options = OperationCostOptions {
        is_bulk: true,
        payload_size_kb: 10.0,
        user_total_consumed: 0,
    };

    let cost = operation_cost(&catalog, "transfer.token", &config, options, off_peak);

    // (100 * 2.0 + 10.0) * 0.85 bulk, no loyalty tier at 0 consumed, off-peak.
    let expected = ((100.0 * 2.0 + 10.0) * 0.85f64).ceil() as i64;
    assert_eq!(cost, expected);
}

#[test]
fn operation_cost_applies_peak_hour_multiplier_within_window() {
    let mut catalog = HashMap::new();
    catalog.insert(
        "contract.call".to_string(),
        OperationCost {
            name: "contract.call".to_string(),
            base_cost: 100,
            category: "contract".to_string(),
            network_class_multiplier: None,
            size_multiplier: None,
        },
    );
    let config = PricingConfig::default();
    let peak_hour = Utc.with_ymd_and_hms(2026, 1, 1, 14, 0, 0).unwrap();

    let cost = operation_cost(
        &catalog,
        "contract.call",
        &config,
        OperationCostOptions::default(),
        peak_hour,
    );

    assert_eq!(cost, (100.0 * config.peak_multiplier).ceil() as i64);
}

#[test]
fn operation_cost_applies_best_loyalty_tier_for_consumption_history() {
    let mut catalog = HashMap::new();
    catalog.insert(
        "transfer.native".to_string(),
        OperationCost {
            name: "transfer.native".to_string(),
            base_cost: 100,
            category: "transfer".to_string(),
            network_class_multiplier: None,
            size_multiplier: None,
        },
    );
    let config = PricingConfig::default();
    let off_peak = Utc.with_ymd_and_hms(2026, 1, 1, 2, 0, 0).unwrap();

    let options = OperationCostOptions {
        is_bulk: false,
        payload_size_kb: 0.0,
        user_total_consumed: 150_000,
    };

    let cost = operation_cost(&catalog, "transfer.native", &config, options, off_peak);

    // 150_000 consumed qualifies for the 100_000 threshold tier at 20% off.
    assert_eq!(cost, (100.0 * 0.80f64).ceil() as i64);
}
