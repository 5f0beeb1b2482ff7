//! Variation resolution: pick the per-variation metrics that apply to a title.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{MarketError, Result};
use crate::models::{MarketData, MarketGrades, MarketMetrics, MarketScores, VariationData};
use crate::parse;

/// Metrics chosen for a card, and the variation they came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMetrics<'a> {
    /// `None` when the top-level metrics were used.
    pub variation: Option<&'a str>,
    pub metrics: &'a MarketMetrics,
    /// The variation's scores, else the top-level ones.
    pub scores: Option<MarketScores>,
    /// The variation's grades, else the top-level ones.
    pub grades: Option<MarketGrades>,
}

/// Find the variation whose label occurs in `title`.
///
/// Matching is a case-sensitive substring test with the same precedence
/// used to bucket sales by variation: the label that starts earliest wins,
/// then the longer label, then map order. Empty labels never match.
pub fn resolve_variation<'a>(
    title: &str,
    variations: &'a BTreeMap<String, VariationData>,
) -> Option<(&'a str, &'a VariationData)> {
    let label = parse::earliest_label(title, variations.keys().map(String::as_str))?;
    variations
        .get_key_value(label)
        .map(|(label, data)| (label.as_str(), data))
}

/// Metrics to display for `title`: the matching variation's, else the top level.
///
/// Scores and grades follow the same choice, falling back to the top-level
/// blocks when the variation carries none.
///
/// Fails with [`MarketError::MissingData`] when the record has no top-level
/// metrics, even if a variation would match.
pub fn resolve_metrics<'a>(title: &str, market: &'a MarketData) -> Result<ResolvedMetrics<'a>> {
    let top = market
        .metrics
        .as_ref()
        .ok_or_else(|| MarketError::MissingData("metrics".to_string()))?;

    match resolve_variation(title, &market.variations) {
        Some((label, data)) => {
            debug!("Using '{}' variation metrics for '{}'", label, title);
            Ok(ResolvedMetrics {
                variation: Some(label),
                metrics: &data.metrics,
                scores: data.scores.or(market.scores),
                grades: data.grades.or(market.grades),
            })
        }
        None => {
            debug!(
                "No variation matched '{}' ({} known), using top-level metrics",
                title,
                market.variations.len()
            );
            Ok(ResolvedMetrics {
                variation: None,
                metrics: top,
                scores: market.scores,
                grades: market.grades,
            })
        }
    }
}
