//! Sales query integration tests: counts, history, summaries, grade medians.

mod common;

use card_market_sdk::queries::SalesFilter;
use common::assert_close;

// ---------------------------------------------------------------------------
// count / history / latest
// ---------------------------------------------------------------------------

#[test]
fn count_all_and_filtered() {
    let sdk = common::setup_sample_sdk();
    let sales = sdk.sales();

    assert_eq!(sales.count(&SalesFilter::default()).unwrap(), 10);
    assert_eq!(sales.count(&SalesFilter::variation("Base")).unwrap(), 6);

    let graded = SalesFilter {
        graded: Some(true),
        ..SalesFilter::default()
    };
    assert_eq!(sales.count(&graded).unwrap(), 2);
}

#[test]
fn history_is_oldest_first_and_respects_limit() {
    let sdk = common::setup_sample_sdk();

    let filter = SalesFilter {
        variation: Some("Refractor".into()),
        limit: Some(2),
        ..SalesFilter::default()
    };
    let history = sdk.sales().history(&filter).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].date, common::day(2024, 3, 10));
    assert_eq!(history[1].date, common::day(2024, 6, 1));
}

#[test]
fn history_filters_by_date_and_price() {
    let sdk = common::setup_sample_sdk();

    let filter = SalesFilter {
        date_from: Some(common::day(2024, 6, 1)),
        date_to: Some(common::day(2024, 6, 30)),
        min_price: Some(20.0),
        max_price: Some(30.0),
        ..SalesFilter::default()
    };
    let prices: Vec<f64> = sdk
        .sales()
        .history(&filter)
        .unwrap()
        .into_iter()
        .map(|s| s.price)
        .collect();
    assert_eq!(prices, vec![25.0, 20.0, 30.0]);
}

#[test]
fn latest_returns_most_recent_sale() {
    let sdk = common::setup_sample_sdk();

    let latest = sdk.sales().latest(&SalesFilter::default()).unwrap().unwrap();
    assert_eq!(latest.title, common::REFRACTOR_TITLE);
    assert_eq!(latest.price, 30.0);

    let none = sdk
        .sales()
        .latest(&SalesFilter::variation("Gold"))
        .unwrap();
    assert!(none.is_none());
}

// ---------------------------------------------------------------------------
// variations
// ---------------------------------------------------------------------------

#[test]
fn variations_are_ordered_by_count() {
    let sdk = common::setup_sample_sdk();

    let variations = sdk.sales().variations().unwrap();
    assert_eq!(
        variations,
        vec![
            ("Base".to_string(), 6),
            ("Refractor".to_string(), 3),
            ("Silver".to_string(), 1),
        ]
    );
}

// ---------------------------------------------------------------------------
// summaries
// ---------------------------------------------------------------------------

#[test]
fn price_summary_includes_outliers() {
    let sdk = common::setup_sample_sdk();

    let summary = sdk
        .sales()
        .price_summary(&SalesFilter::variation("Base"))
        .unwrap();
    assert_eq!(summary.total_sales, 6);
    assert_close(summary.high_price.unwrap(), 40.0);
    assert_eq!(summary.first_date.as_deref(), Some("2024-04-01"));
    assert_eq!(summary.last_date.as_deref(), Some("2024-06-20"));
}

#[test]
fn clean_summary_drops_values_outside_fences() {
    let sdk = common::setup_sample_sdk();

    // Quartiles of 9, 10, 11, 12, 25, 40 are 10.25 and 21.75; 40 lies above the upper fence.
    let summary = sdk
        .sales()
        .clean_summary(&SalesFilter::variation("Base"), 1.5)
        .unwrap();
    assert_eq!(summary.total_sales, 5);
    assert_close(summary.median_price.unwrap(), 11.0);
    assert_close(summary.avg_price.unwrap(), 13.4);
    assert_close(summary.low_price.unwrap(), 9.0);
    assert_close(summary.high_price.unwrap(), 25.0);
}

#[test]
fn clean_summary_without_outliers_matches_plain_summary() {
    let sdk = common::setup_sample_sdk();
    let filter = SalesFilter::variation("Refractor");

    let plain = sdk.sales().price_summary(&filter).unwrap();
    let clean = sdk.sales().clean_summary(&filter, 1.5).unwrap();
    assert_eq!(plain, clean);
}

#[test]
fn recent_split_counts_recent_and_averages_older() {
    let sdk = common::setup_sample_sdk();

    let (recent, older) = sdk
        .sales()
        .recent_split(
            &SalesFilter::variation("Base"),
            1.5,
            common::day(2024, 5, 31),
        )
        .unwrap();
    assert_eq!(recent, 3);
    assert_close(older.unwrap(), 10.0);
}

#[test]
fn recent_split_without_older_sales() {
    let sdk = common::setup_sample_sdk();

    let (recent, older) = sdk
        .sales()
        .recent_split(
            &SalesFilter::variation("Silver"),
            1.5,
            common::day(2024, 5, 31),
        )
        .unwrap();
    assert_eq!(recent, 1);
    assert!(older.is_none());
}

// ---------------------------------------------------------------------------
// window / segments
// ---------------------------------------------------------------------------

#[test]
fn window_counts_clean_sales_since_cutoff() {
    let sdk = common::setup_sample_sdk();

    // The PSA 10 outlier on 2024-05-01 is excluded.
    let (volume, avg) = sdk
        .sales()
        .window(&SalesFilter::variation("Base"), 1.5, common::day(2024, 4, 20))
        .unwrap();
    assert_eq!(volume, 3);
    assert_close(avg.unwrap(), 47.0 / 3.0);

    let (volume, avg) = sdk
        .sales()
        .window(&SalesFilter::variation("Base"), 1.5, common::day(2024, 6, 25))
        .unwrap();
    assert_eq!(volume, 0);
    assert!(avg.is_none());
}

#[test]
fn tercile_segments_split_by_price() {
    let sdk = common::setup_sample_sdk();

    // Clean Base prices 9, 10, 11, 12, 25 fill buckets of 2, 2 and 1.
    let segments = sdk
        .sales()
        .segments(&SalesFilter::variation("Base"), 1.5, &["Low", "Medium", "High"])
        .unwrap();
    let labels: Vec<&str> = segments.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Low", "Medium", "High"]);

    assert_close(segments[0].low_price, 9.0);
    assert_close(segments[0].high_price, 10.0);
    assert_close(segments[0].avg_price, 9.5);
    assert_eq!(segments[0].sales_volume, 2);
    assert_close(segments[0].market_share, 40.0);

    assert_close(segments[2].low_price, 25.0);
    assert_eq!(segments[2].sales_volume, 1);
    assert_close(segments[2].market_share, 20.0);
}

#[test]
fn segments_need_a_sale_per_bucket() {
    let sdk = common::setup_sample_sdk();

    let segments = sdk
        .sales()
        .segments(
            &SalesFilter::variation("Refractor"),
            1.5,
            &["Low", "Medium-Low", "Medium-High", "High"],
        )
        .unwrap();
    assert!(segments.is_empty());
}

// ---------------------------------------------------------------------------
// grade_medians / has_graded
// ---------------------------------------------------------------------------

#[test]
fn grade_medians_cover_every_grade() {
    let sdk = common::setup_sample_sdk();

    let medians = sdk
        .sales()
        .grade_medians(&SalesFilter::variation("Base"))
        .unwrap();
    assert_eq!(medians.len(), 3);
    assert_close(medians["Raw"], 10.5);
    assert_close(medians["PSA 9"], 25.0);
    assert_close(medians["PSA 10"], 40.0);
}

#[test]
fn has_graded_per_variation() {
    let sdk = common::setup_sample_sdk();

    assert!(sdk.sales().has_graded(&SalesFilter::variation("Base")).unwrap());
    assert!(!sdk
        .sales()
        .has_graded(&SalesFilter::variation("Refractor"))
        .unwrap());
}

#[test]
fn queries_fail_before_any_load() {
    let sdk = card_market_sdk::CardMarketSdk::builder().build().unwrap();
    assert!(sdk.sales().count(&SalesFilter::default()).is_err());
}
