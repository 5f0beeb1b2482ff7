//! Sports-card market analysis SDK for Rust.
//!
//! Loads comparable sales into an in-memory DuckDB table, aggregates them
//! into a market record, and derives what a market view needs from it:
//! graded prices, recommendations, a twelve-month forecast, resale profit
//! projections and trade evaluations.
//!
//! # Quick start
//!
//! ```no_run
//! use card_market_sdk::{CardMarketSdk, Card, Sale};
//! use chrono::NaiveDate;
//!
//! let sdk = CardMarketSdk::builder().build().unwrap();
//! let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//!
//! sdk.load_sales(&[Sale::new("2023 Prizm Refractor #5", 42.0, day)]).unwrap();
//! let market = sdk.analyze(day).unwrap();
//!
//! let card = Card::from(Sale::new("2023 Prizm Refractor #5", 45.0, day));
//! let report = sdk.report(&card, &market).unwrap();
//! println!("{:?}", report.forecast.predicted_price);
//! ```

pub mod analysis;
pub mod config;
pub mod connection;
pub mod error;
pub mod grading;
pub mod models;
pub mod parse;
pub mod queries;

pub use config::AnalyzerSettings;
pub use connection::Connection;
pub use error::{MarketError, Result};
pub use models::{Card, Condition, MarketData, Sale};

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use analysis::{MarketAnalyzer, ProfitMultipliers};
use models::{
    GradingCosts, MarketReport, MarketSegments, ProfitAnalysis, ProfitInputs, TradeAnalysis,
    TradeCard,
};
use queries::SalesFilter;

// ---------------------------------------------------------------------------
// CardMarketSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CardMarketSdk`] instance.
///
/// Use [`CardMarketSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CardMarketSdkBuilder::build) to create the SDK.
#[derive(Default)]
pub struct CardMarketSdkBuilder {
    settings: AnalyzerSettings,
}

impl CardMarketSdkBuilder {
    /// Calculator fallback multipliers for markets without graded sales.
    ///
    /// Defaults to 2.0 (PSA 9) and 3.0 (PSA 10).
    pub fn default_multipliers(mut self, psa9: f64, psa10: f64) -> Self {
        self.settings.psa9_multiplier = psa9;
        self.settings.psa10_multiplier = psa10;
        self
    }

    /// Days before the analysis date that count as recent. Defaults to 30.
    pub fn recent_window_days(mut self, days: i64) -> Self {
        self.settings.recent_window_days = days;
        self
    }

    /// IQR multiplier for outlier fences. Defaults to 1.5.
    pub fn outlier_fence(mut self, fence: f64) -> Self {
        self.settings.outlier_fence = fence;
        self
    }

    /// Seed the grading simulator for reproducible runs.
    pub fn simulation_seed(mut self, seed: u64) -> Self {
        self.settings.simulation_seed = Some(seed);
        self
    }

    /// Build the SDK, opening an empty in-memory database.
    pub fn build(self) -> Result<CardMarketSdk> {
        if !(self.settings.outlier_fence.is_finite() && self.settings.outlier_fence >= 0.0) {
            return Err(MarketError::InvalidArgument(format!(
                "outlier fence must be a non-negative number, got {}",
                self.settings.outlier_fence
            )));
        }
        if self.settings.recent_window_days < 0 {
            return Err(MarketError::InvalidArgument(format!(
                "recent window must not be negative, got {} days",
                self.settings.recent_window_days
            )));
        }
        let conn = Connection::open_in_memory()?;
        Ok(CardMarketSdk {
            conn,
            settings: self.settings,
        })
    }
}

// ---------------------------------------------------------------------------
// CardMarketSdk
// ---------------------------------------------------------------------------

/// The main entry point for the SDK.
///
/// Owns a [`Connection`] and the [`AnalyzerSettings`], and exposes query
/// and analysis interfaces as lightweight borrowing wrappers.
///
/// Created via [`CardMarketSdk::builder()`].
#[derive(Debug)]
pub struct CardMarketSdk {
    conn: Connection,
    settings: AnalyzerSettings,
}

impl CardMarketSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> CardMarketSdkBuilder {
        CardMarketSdkBuilder::default()
    }

    /// Replace the loaded sales. Returns how many were kept.
    pub fn load_sales(&self, sales: &[Sale]) -> Result<usize> {
        self.conn.load_sales(sales, config::BASE_VARIATION)
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the sales query interface.
    pub fn sales(&self) -> queries::SalesQuery<'_> {
        queries::SalesQuery::new(&self.conn)
    }

    /// Access the market aggregator.
    pub fn analyzer(&self) -> MarketAnalyzer<'_> {
        MarketAnalyzer::new(&self.conn, &self.settings)
    }

    /// A grading simulator, seeded from the settings when a seed is set.
    pub fn grading(&self) -> grading::GradingSimulator {
        grading::GradingSimulator::new(self.settings.simulation_seed)
    }

    // -- Analysis ----------------------------------------------------------

    /// Aggregate the loaded sales as of `as_of`.
    pub fn analyze(&self, as_of: NaiveDate) -> Result<MarketData> {
        self.analyzer().analyze(as_of)
    }

    /// Price segments and recent windows over the sales matching `filter`.
    pub fn segments(&self, filter: &SalesFilter, as_of: NaiveDate) -> Result<MarketSegments> {
        self.analyzer().segments(filter, as_of)
    }

    /// Full market report for `card`.
    pub fn report(&self, card: &Card, market: &MarketData) -> Result<MarketReport> {
        analysis::market_report(card, market)
    }

    /// Profit breakdown for reselling a card, plus grading scenarios when it is raw.
    ///
    /// Multipliers come from the market metrics that apply to `title`
    /// (variation first), falling back to the configured defaults.
    pub fn profit(
        &self,
        title: &str,
        market: Option<&MarketData>,
        inputs: &ProfitInputs,
        costs: &GradingCosts,
    ) -> Result<ProfitAnalysis> {
        let metrics = market
            .and_then(|m| analysis::resolve_metrics(title, m).ok())
            .map(|resolved| resolved.metrics);
        let defaults = ProfitMultipliers {
            psa9: self.settings.psa9_multiplier,
            psa10: self.settings.psa10_multiplier,
        };
        let multipliers = ProfitMultipliers::from_metrics(metrics, defaults);
        analysis::profit_analysis(inputs, costs, &multipliers)
    }

    /// Weigh the cards given up against the cards received.
    pub fn trade(&self, giving: &[TradeCard], receiving: &[TradeCard]) -> Result<TradeAnalysis> {
        analysis::analyze_trade(giving, receiving)
    }

    // -- Utility methods ---------------------------------------------------

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// The settings this SDK was built with.
    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CardMarketSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CardMarketSdk(tables=[{}], recent_window_days={}, outlier_fence={})",
            self.conn.tables().join(", "),
            self.settings.recent_window_days,
            self.settings.outlier_fence
        )
    }
}
