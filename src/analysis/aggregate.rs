//! Aggregation of loaded sales into a [`MarketData`] record.
//!
//! Prices are cleaned of IQR outliers per group before the metrics are
//! computed. Graded multipliers are the exception: they compare per-grade
//! medians over the unfiltered group, since graded sales are exactly the
//! high prices the fences would drop.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::config::{
    AnalyzerSettings, NEUTRAL_TREND, QUARTILE_LABELS, SCORE_MAX, TEMPORAL_WINDOWS, TERCILE_LABELS,
};
use crate::connection::Connection;
use crate::error::{MarketError, Result};
use crate::models::{
    Grade, MarketData, MarketGrades, MarketMetrics, MarketScores, MarketSegments, TemporalWindow,
    VariationData,
};
use crate::parse::RAW_LABEL;
use crate::queries::{SalesFilter, SalesQuery};

/// Builds market records from the `sales` table.
pub struct MarketAnalyzer<'a> {
    conn: &'a Connection,
    settings: &'a AnalyzerSettings,
}

impl<'a> MarketAnalyzer<'a> {
    /// Create a new `MarketAnalyzer` bound to the given connection.
    pub fn new(conn: &'a Connection, settings: &'a AnalyzerSettings) -> Self {
        Self { conn, settings }
    }

    /// Aggregate every loaded sale as of `as_of`.
    ///
    /// Each variation gets its own entry. The top-level record is the most
    /// common variation's, ties broken by label.
    pub fn analyze(&self, as_of: NaiveDate) -> Result<MarketData> {
        let variations = SalesQuery::new(self.conn).variations()?;
        let Some((primary, _)) = variations.first().cloned() else {
            return Err(MarketError::NotFound("no sales loaded".to_string()));
        };

        let mut by_label = BTreeMap::new();
        for (label, count) in &variations {
            debug!("Aggregating {} sales for variation '{}'", count, label);
            by_label.insert(label.clone(), self.analyze_variation(label, as_of)?);
        }

        let top = by_label
            .get(&primary)
            .cloned()
            .ok_or_else(|| MarketError::NotFound(format!("variation '{}'", primary)))?;

        info!(
            "Aggregated {} variations, primary '{}' with {} sales",
            by_label.len(),
            primary,
            top.metrics.total_sales
        );

        Ok(MarketData {
            metrics: Some(top.metrics),
            scores: top.scores,
            grades: top.grades,
            variations: by_label,
        })
    }

    /// Metrics, scores and grades for one variation.
    pub fn analyze_variation(&self, variation: &str, as_of: NaiveDate) -> Result<VariationData> {
        let filter = SalesFilter::variation(variation);
        if SalesQuery::new(self.conn).count(&filter)? == 0 {
            return Err(MarketError::NotFound(format!(
                "no sales for variation '{}'",
                variation
            )));
        }
        let metrics = self.metrics_for(&filter, as_of)?;
        let scores = market_scores(&metrics);
        let grades = market_grades(&scores);
        Ok(VariationData {
            metrics,
            scores: Some(scores),
            grades: Some(grades),
        })
    }

    /// Price metrics over the sales matching `filter`.
    pub fn metrics_for(&self, filter: &SalesFilter, as_of: NaiveDate) -> Result<MarketMetrics> {
        let query = SalesQuery::new(self.conn);
        let fence = self.settings.outlier_fence;

        let summary = query.clean_summary(filter, fence)?;
        if summary.total_sales == 0 {
            return Ok(MarketMetrics::default());
        }
        let avg_price = summary.avg_price.unwrap_or(0.0);

        let cutoff = as_of - Duration::days(self.settings.recent_window_days);
        let (recent, older_avg) = query.recent_split(filter, fence, cutoff)?;
        let price_trend = match older_avg {
            Some(older) if recent > 0 && older != 0.0 => (avg_price - older) / older,
            _ => 0.0,
        };

        let medians = query.grade_medians(filter)?;
        let multiplier = |grade: &str| -> Option<f64> {
            let raw = *medians.get(RAW_LABEL)?;
            if raw <= 0.0 {
                return None;
            }
            medians.get(grade).map(|graded| graded / raw)
        };

        Ok(MarketMetrics {
            median_price: summary.median_price.unwrap_or(0.0),
            avg_price,
            low_price: summary.low_price.unwrap_or(0.0),
            high_price: summary.high_price.unwrap_or(0.0),
            total_sales: summary.total_sales,
            std_price: summary.std_price,
            price_trend: Some(price_trend),
            psa9_multiplier: multiplier("PSA 9"),
            psa10_multiplier: multiplier("PSA 10"),
            has_graded_data: Some(query.has_graded(filter)?),
        })
    }

    /// Price terciles, quartiles and 7/30/90-day windows over the outlier-free
    /// sales matching `filter`.
    pub fn segments(&self, filter: &SalesFilter, as_of: NaiveDate) -> Result<MarketSegments> {
        let query = SalesQuery::new(self.conn);
        let fence = self.settings.outlier_fence;
        let overall = query.clean_summary(filter, fence)?.avg_price.unwrap_or(0.0);

        let mut windows = Vec::new();
        for days in TEMPORAL_WINDOWS {
            let (volume, avg) = query.window(filter, fence, as_of - Duration::days(days))?;
            let Some(avg_price) = avg.filter(|_| volume > 0) else {
                debug!("No sales in the last {} days", days);
                continue;
            };
            let price_change = if overall != 0.0 {
                (avg_price - overall) / overall
            } else {
                0.0
            };
            windows.push(TemporalWindow {
                days,
                avg_price,
                sales_volume: volume,
                price_change,
            });
        }

        Ok(MarketSegments {
            terciles: query.segments(filter, fence, &TERCILE_LABELS)?,
            quartiles: query.segments(filter, fence, &QUARTILE_LABELS)?,
            windows,
        })
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Trend, volatility and liquidity scores on the 0-10 scale.
///
/// An empty group scores neutral trend and volatility with no liquidity.
pub fn market_scores(metrics: &MarketMetrics) -> MarketScores {
    if metrics.total_sales == 0 {
        return MarketScores::new(NEUTRAL_TREND, SCORE_MAX / 2.0, 0.0);
    }

    let trend = (NEUTRAL_TREND + metrics.price_trend.unwrap_or(0.0) * 5.0).clamp(0.0, SCORE_MAX);
    let volatility = if metrics.avg_price > 0.0 {
        let std = metrics.std_price.unwrap_or(0.0);
        (std / metrics.avg_price * SCORE_MAX).min(SCORE_MAX)
    } else {
        SCORE_MAX / 2.0
    };
    let liquidity = (metrics.total_sales as f64 / 10.0).min(SCORE_MAX);

    MarketScores::new(trend, volatility, liquidity)
}

/// Buy and sell letter grades.
///
/// Buying favours a calm, not-yet-risen market; selling favours the reverse.
/// Liquidity helps both.
pub fn market_grades(scores: &MarketScores) -> MarketGrades {
    let buy = ((SCORE_MAX - scores.volatility) * 0.3
        + (SCORE_MAX - scores.trend) * 0.4
        + scores.liquidity * 0.3)
        / SCORE_MAX;
    let sell = (scores.volatility * 0.3 + scores.trend * 0.4 + scores.liquidity * 0.3) / SCORE_MAX;

    MarketGrades {
        buy_grade: Grade::from_score(buy),
        sell_grade: Grade::from_score(sell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_metrics_score_neutral() {
        let scores = market_scores(&MarketMetrics::default());
        assert_eq!(scores, MarketScores::new(5.0, 5.0, 0.0));
    }

    #[test]
    fn trend_score_is_clamped() {
        let metrics = MarketMetrics {
            avg_price: 10.0,
            total_sales: 250,
            price_trend: Some(3.0),
            ..MarketMetrics::default()
        };
        let scores = market_scores(&metrics);
        assert_eq!(scores.trend, 10.0);
        assert_eq!(scores.liquidity, 10.0);
        assert_eq!(scores.volatility, 0.0);
    }

    #[test]
    fn calm_flat_liquid_market_grades() {
        let grades = market_grades(&MarketScores::new(0.0, 0.0, 10.0));
        assert_eq!(grades.buy_grade, Grade::A);
        assert_eq!(grades.sell_grade, Grade::D);
    }
}
