//! Market report assembly tests.

mod common;

use card_market_sdk::models::{Card, MarketData, MarketScores};
use card_market_sdk::{CardMarketSdk, MarketError, Sale};
use common::assert_close;

fn card(title: &str, price: f64) -> Card {
    Card {
        title: title.to_string(),
        price,
        date: common::as_of(),
        image_url: None,
    }
}

#[test]
fn report_for_variation_card() {
    let sdk = common::setup_sample_sdk();
    let market = sdk.analyze(common::as_of()).unwrap();

    let report = sdk
        .report(&card(common::REFRACTOR_TITLE, 33.0), &market)
        .unwrap();
    assert_eq!(report.variation.as_deref(), Some("Refractor"));
    assert_close(report.metrics.median_price, 32.0);
    // Graded prices come from the Refractor metrics, which have no graded sales.
    assert_eq!(report.graded_prices.psa9, None);
    // Scores and grades come from the Refractor entry too.
    let refractor = &market.variations["Refractor"];
    assert_eq!(Some(report.scores), refractor.scores);
    assert_eq!(Some(report.grades), refractor.grades);
    assert_ne!(Some(report.scores), market.scores);
    assert_close(report.scores.volatility, 2.0 / 32.0 * 10.0);
    assert_close(report.forecast.current_price, 33.0);
    assert_eq!(report.forecast.points.len(), 12);
}

#[test]
fn variation_without_scores_falls_back_to_top_level() {
    let sdk = common::setup_sample_sdk();
    let mut market = sdk.analyze(common::as_of()).unwrap();
    if let Some(refractor) = market.variations.get_mut("Refractor") {
        refractor.scores = None;
        refractor.grades = None;
    }

    let report = sdk
        .report(&card(common::REFRACTOR_TITLE, 33.0), &market)
        .unwrap();
    assert_eq!(report.variation.as_deref(), Some("Refractor"));
    assert_eq!(Some(report.scores), market.scores);
    assert_eq!(Some(report.grades), market.grades);
}

#[test]
fn report_resolves_the_variation_its_sales_were_bucketed_under() {
    let prizm_silver = "2023 Prizm Silver Herbert #5";
    let select_silver = "2023 Select Silver Herbert #5";
    let sdk = CardMarketSdk::builder().build().unwrap();
    sdk.load_sales(&[
        Sale::new(prizm_silver, 50.0, common::day(2024, 6, 1)),
        Sale::new(select_silver, 20.0, common::day(2024, 6, 2)),
        Sale::new(select_silver, 22.0, common::day(2024, 6, 3)),
    ])
    .unwrap();

    assert_eq!(
        sdk.sales().variations().unwrap(),
        vec![("Silver".to_string(), 2), ("Prizm".to_string(), 1)]
    );

    let market = sdk.analyze(common::as_of()).unwrap();
    let report = sdk.report(&card(prizm_silver, 50.0), &market).unwrap();
    assert_eq!(report.variation.as_deref(), Some("Prizm"));
    assert_close(report.metrics.median_price, 50.0);

    let report = sdk.report(&card(select_silver, 21.0), &market).unwrap();
    assert_eq!(report.variation.as_deref(), Some("Silver"));
    assert_close(report.metrics.median_price, 21.0);
}

#[test]
fn report_outlook_carries_health_score() {
    let sdk = common::setup_sample_sdk();
    let market = sdk.analyze(common::as_of()).unwrap();

    let report = sdk.report(&card(common::BASE_TITLE, 11.0), &market).unwrap();
    let health = report.outlook.health_score;
    assert!((1.0..=10.0).contains(&health));
    assert_eq!((health * 10.0).round() / 10.0, health);
}

#[test]
fn report_for_base_card() {
    let sdk = common::setup_sample_sdk();
    let market = sdk.analyze(common::as_of()).unwrap();

    let report = sdk.report(&card(common::BASE_TITLE, 11.0), &market).unwrap();
    assert_eq!(report.variation, None);
    assert_close(report.graded_prices.psa10.unwrap(), 11.0 * 40.0 / 10.5);
    // Trend 6.7 and liquidity 0.5 fire; the C sell grade does not.
    let messages: Vec<&str> = report
        .recommendations
        .iter()
        .map(|r| r.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Moderate upward trend - good buying opportunity",
            "Low liquidity - sales may take time",
        ]
    );
}

#[test]
fn missing_records_short_circuit() {
    let sdk = common::setup_sample_sdk();
    let full = sdk.analyze(common::as_of()).unwrap();
    let c = card(common::BASE_TITLE, 11.0);

    let no_metrics = MarketData {
        metrics: None,
        ..full.clone()
    };
    assert!(matches!(
        sdk.report(&c, &no_metrics),
        Err(MarketError::MissingData(ref name)) if name == "metrics"
    ));

    let no_scores = MarketData {
        scores: None,
        ..full.clone()
    };
    assert!(matches!(
        sdk.report(&c, &no_scores),
        Err(MarketError::MissingData(ref name)) if name == "scores"
    ));

    let no_grades = MarketData {
        grades: None,
        ..full
    };
    assert!(matches!(
        sdk.report(&c, &no_grades),
        Err(MarketError::MissingData(ref name)) if name == "grades"
    ));
}

#[test]
fn empty_market_reports_metrics_missing_first() {
    let sdk = common::setup_sample_sdk();
    let err = sdk
        .report(&card(common::BASE_TITLE, 1.0), &MarketData::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing market data: metrics");
}

#[test]
fn market_data_deserializes_from_json() {
    let json = r#"{
        "metrics": {"median_price": 20.0, "avg_price": 21.0, "low_price": 15.0,
                    "high_price": 30.0, "total_sales": 12, "psa10_multiplier": 3.5},
        "scores": {"trend": 7.5, "volatility": 2.0, "liquidity": 8.0},
        "grades": {"buy_grade": "A", "sell_grade": "B"},
        "variations": {}
    }"#;
    let market: MarketData = serde_json::from_str(json).unwrap();
    assert_eq!(market.scores, Some(MarketScores::new(7.5, 2.0, 8.0)));

    let sdk = card_market_sdk::CardMarketSdk::builder().build().unwrap();
    let report = sdk.report(&card("Any Card", 20.0), &market).unwrap();
    assert_close(report.graded_prices.psa10.unwrap(), 70.0);
    assert_eq!(report.graded_prices.psa9, None);
    assert_eq!(report.recommendations.len(), 5);
}
