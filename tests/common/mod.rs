//! Shared test fixtures for the card market SDK integration tests.
//!
//! Provides `setup_sample_sdk()` which builds an SDK with a small set of
//! comparable sales for one card across three variations, dated relative to
//! a fixed analysis day so the recent/older split is stable.

#![allow(dead_code)]

use card_market_sdk::{CardMarketSdk, Connection, Sale};
use chrono::NaiveDate;

pub const BASE_TITLE: &str = "2023 Donruss Justin Herbert #5";
pub const REFRACTOR_TITLE: &str = "2023 Donruss Justin Herbert Refractor #5";
pub const SILVER_TITLE: &str = "2023 Donruss Justin Herbert Silver #5";

/// The analysis day. Sales on or after 2024-05-31 are recent.
pub fn as_of() -> NaiveDate {
    day(2024, 6, 30)
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Ten sales: six Base (four raw, one PSA 9, one PSA 10 that is an
/// outlier), three Refractor and one Silver.
pub fn sample_sales() -> Vec<Sale> {
    vec![
        Sale::new(BASE_TITLE, 10.0, day(2024, 6, 20)),
        Sale::new(BASE_TITLE, 12.0, day(2024, 6, 10)),
        Sale::new(BASE_TITLE, 11.0, day(2024, 4, 15)),
        Sale::new(BASE_TITLE, 9.0, day(2024, 4, 1)),
        Sale::new(&format!("{} PSA 9", BASE_TITLE), 25.0, day(2024, 6, 5)),
        Sale::new(&format!("{} PSA 10 Gem Mint", BASE_TITLE), 40.0, day(2024, 5, 1)),
        Sale::new(REFRACTOR_TITLE, 30.0, day(2024, 6, 25)),
        Sale::new(REFRACTOR_TITLE, 34.0, day(2024, 6, 1)),
        Sale::new(REFRACTOR_TITLE, 32.0, day(2024, 3, 10)),
        Sale::new(SILVER_TITLE, 20.0, day(2024, 6, 15)),
    ]
}

/// An SDK with `sample_sales()` loaded.
pub fn setup_sample_sdk() -> CardMarketSdk {
    let sdk = CardMarketSdk::builder().simulation_seed(42).build().unwrap();
    let loaded = sdk.load_sales(&sample_sales()).unwrap();
    assert_eq!(loaded, 10);
    sdk
}

/// A bare connection with `sample_sales()` loaded.
pub fn setup_sample_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.load_sales(&sample_sales(), "Base").unwrap();
    conn
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
