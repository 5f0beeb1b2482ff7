//! Assembly of everything the market view shows for one card.

use tracing::warn;

use super::{forecast, graded_prices, market_outlook, recommendations, resolve_metrics};
use crate::error::{MarketError, Result};
use crate::models::{Card, MarketData, MarketReport};

/// Build the full report for `card` against an aggregated market record.
///
/// All three top-level blocks (`metrics`, `scores`, `grades`) are required;
/// the first one missing fails the call and nothing is computed. When the
/// title matches a variation, its metrics, scores and grades are used, with
/// the top-level scores and grades filling in for a variation that has none.
pub fn market_report(card: &Card, market: &MarketData) -> Result<MarketReport> {
    if market.metrics.is_none() {
        return Err(missing("metrics"));
    }
    let scores = market.scores.ok_or_else(|| missing("scores"))?;
    let grades = market.grades.ok_or_else(|| missing("grades"))?;

    let resolved = resolve_metrics(&card.title, market)?;
    let scores = resolved.scores.unwrap_or(scores);
    let grades = resolved.grades.unwrap_or(grades);

    Ok(MarketReport {
        card_title: card.title.clone(),
        variation: resolved.variation.map(str::to_string),
        metrics: resolved.metrics.clone(),
        scores,
        grades,
        graded_prices: graded_prices(resolved.metrics),
        recommendations: recommendations(&scores, &grades),
        outlook: market_outlook(&scores),
        forecast: forecast(card.price, &scores),
    })
}

fn missing(record: &str) -> MarketError {
    warn!("Market data has no '{}' record", record);
    MarketError::MissingData(record.to_string())
}
