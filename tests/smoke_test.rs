//! End-to-end walk through the public SDK surface with the sample sales.
//!
//! Run with:
//! ```sh
//! cargo test --test smoke_test -- --nocapture
//! ```

mod common;

use card_market_sdk::models::{Card, Condition, GradingCosts, ProfitInputs, TradeCard};
use card_market_sdk::queries::SalesFilter;

/// Print a section header to stderr.
fn section(name: &str) {
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  {}", name);
    eprintln!("{}", "=".repeat(60));
}

#[test]
fn full_pipeline() {
    let sdk = common::setup_sample_sdk();
    eprintln!("{}", sdk);

    section("Sales");
    let variations = sdk.sales().variations().unwrap();
    eprintln!("variations: {:?}", variations);
    assert_eq!(variations.len(), 3);
    let summary = sdk.sales().price_summary(&SalesFilter::default()).unwrap();
    assert_eq!(summary.total_sales, 10);

    section("Aggregate");
    let market = sdk.analyze(common::as_of()).unwrap();
    eprintln!("{}", serde_json::to_string_pretty(&market).unwrap());
    assert!(market.metrics.is_some());

    section("Report");
    let card = Card {
        title: common::REFRACTOR_TITLE.to_string(),
        price: 32.0,
        date: common::as_of(),
        image_url: None,
    };
    let report = sdk.report(&card, &market).unwrap();
    for rec in &report.recommendations {
        eprintln!("- {}", rec.message);
    }
    eprintln!("{}", report.outlook.commentary);
    assert_eq!(report.forecast.points.len(), 12);

    section("Segments");
    let segments = sdk
        .segments(&SalesFilter::variation("Base"), common::as_of())
        .unwrap();
    for window in &segments.windows {
        eprintln!("{}d: {} sales, {:+.1}%", window.days, window.sales_volume, window.price_change * 100.0);
    }
    assert_eq!(segments.terciles.len(), 3);

    section("Profit");
    let mut inputs = ProfitInputs::new(32.0, Condition::Raw);
    inputs.shipping_cost = 4.0;
    let costs = GradingCosts::for_service("economy").unwrap();
    let profit = sdk
        .profit(&card.title, Some(&market), &inputs, &costs)
        .unwrap();
    eprintln!("{:?}", profit.verdict.map(|v| v.message()));
    assert_eq!(profit.grading_scenarios.len(), 2);

    section("Trade");
    let giving = TradeCard::from_report(&report, Condition::Raw);
    let receiving = TradeCard::new(common::SILVER_TITLE, 20.0, Condition::Psa9);
    let trade = sdk.trade(&[giving], &[receiving]).unwrap();
    eprintln!("{}", trade.details);
    assert!(trade.fairness_score > 0.0);

    section("Grading simulation");
    let odds = card_market_sdk::grading::grade_odds("near mint", card.price);
    let summary = sdk.grading().simulate(
        &odds,
        &card_market_sdk::grading::OutcomePrices {
            psa10: 96.0,
            psa9: 64.0,
            lower: 30.0,
        },
        100,
    );
    eprintln!("{:?}", summary);
    assert_eq!(summary.submissions, 100);

    section("Raw SQL");
    let rows = sdk
        .sql(
            "SELECT grade, COUNT(*) AS n FROM sales GROUP BY grade ORDER BY grade",
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
}
