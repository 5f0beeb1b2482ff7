//! Linear price forecast with volatility bands.

use crate::config::{
    FORECAST_MONTHS, MAX_BAND_FRACTION, NEUTRAL_TREND, SCORE_MAX, TREND_SENSITIVITY,
};
use crate::models::{ForecastPoint, MarketScores, PriceForecast};

/// `1 + (trend - 5) * 0.1`: neutral trend predicts no change.
pub fn trend_factor(trend: f64) -> f64 {
    1.0 + (trend - NEUTRAL_TREND) * TREND_SENSITIVITY
}

pub fn predicted_price(current_price: f64, trend: f64) -> f64 {
    current_price * trend_factor(trend)
}

/// Half-width of the confidence band as a fraction of price.
pub fn band_fraction(volatility: f64) -> f64 {
    (volatility / SCORE_MAX) * MAX_BAND_FRACTION
}

/// Forecast confidence in percent, clamped to `[0, 100]`.
pub fn confidence(liquidity: f64) -> f64 {
    (liquidity * 10.0).max(0.0).min(100.0)
}

/// Twelve monthly points stepping linearly from `current_price` to the
/// predicted price, each with upper and lower bands.
pub fn forecast(current_price: f64, scores: &MarketScores) -> PriceForecast {
    let factor = trend_factor(scores.trend);
    let predicted = current_price * factor;
    let monthly_change = (predicted - current_price) / FORECAST_MONTHS as f64;
    let band = band_fraction(scores.volatility);

    let mut points = Vec::with_capacity(FORECAST_MONTHS as usize);
    let mut price = current_price;
    for month in 1..=FORECAST_MONTHS {
        price += monthly_change;
        points.push(ForecastPoint {
            month,
            price,
            lower: price * (1.0 - band),
            upper: price * (1.0 + band),
        });
    }

    PriceForecast {
        current_price,
        trend_factor: factor,
        predicted_price: predicted,
        monthly_change,
        band_fraction: band,
        confidence: confidence(scores.liquidity),
        points,
    }
}
