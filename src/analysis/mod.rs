//! The market metrics engine.
//!
//! Pure functions that turn a selected [`Card`](crate::models::Card) and an
//! aggregated [`MarketData`](crate::models::MarketData) record into the values
//! a market view shows: graded prices, recommendations, a price forecast and
//! a profit breakdown. [`MarketAnalyzer`] builds the `MarketData` record from
//! loaded sales, and [`analyze_trade`] weighs two sets of cards against each
//! other.

pub mod aggregate;
pub mod forecast;
pub mod pricing;
pub mod profit;
pub mod recommendation;
pub mod report;
pub mod trade;
pub mod variation;

pub use aggregate::{market_grades, market_scores, MarketAnalyzer};
pub use forecast::forecast;
pub use pricing::{graded_price, graded_prices};
pub use profit::{
    break_even_price, calculate_profit, grading_scenarios, grading_verdict, profit_analysis, roi,
    ProfitMultipliers,
};
pub use recommendation::{market_health, market_outlook, recommendations};
pub use report::market_report;
pub use trade::analyze_trade;
pub use variation::{resolve_metrics, resolve_variation, ResolvedMetrics};
