//! Graded-price derivation for the market view.

use crate::models::{GradedPrices, MarketMetrics};

/// `base * multiplier`, or `None` when the market has no multiplier.
pub fn graded_price(base_price: f64, multiplier: Option<f64>) -> Option<f64> {
    multiplier.map(|m| base_price * m)
}

/// PSA 9 and PSA 10 prices derived from the median price.
///
/// Missing multipliers stay missing here. The profit calculator substitutes
/// defaults instead (see [`ProfitMultipliers`](super::ProfitMultipliers)).
pub fn graded_prices(metrics: &MarketMetrics) -> GradedPrices {
    GradedPrices {
        psa9: graded_price(metrics.median_price, metrics.psa9_multiplier),
        psa10: graded_price(metrics.median_price, metrics.psa10_multiplier),
    }
}
