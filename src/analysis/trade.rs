//! Trade evaluation: the value, risk and momentum of two sets of cards.

use tracing::{debug, warn};

use crate::config::{trade_condition_multipliers, SCORE_MAX};
use crate::error::{MarketError, Result};
use crate::models::{SideMetrics, TradeAnalysis, TradeCard, TradeVerdict};

/// Stand-in for a volatility or liquidity score the caller did not supply.
const UNKNOWN_SCORE: f64 = 5.0;

/// Compare what is given up against what is received.
///
/// Values are scaled by condition and market trend before they are summed.
/// An empty side is worth nothing and carries no risk.
pub fn analyze_trade(giving: &[TradeCard], receiving: &[TradeCard]) -> Result<TradeAnalysis> {
    for card in giving.iter().chain(receiving) {
        validate_card(card)?;
    }

    let giving_value = side_value(giving);
    let receiving_value = side_value(receiving);
    let value_difference = receiving_value - giving_value;
    let (value_ratio, percentage_difference) = if giving_value > 0.0 {
        (
            receiving_value / giving_value,
            value_difference / giving_value * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    let giving_risk = side_risk(giving);
    let receiving_risk = side_risk(receiving);
    let giving_metrics = side_metrics(giving);
    let receiving_metrics = side_metrics(receiving);

    let (verdict, closing) = trade_verdict(value_ratio, receiving_risk - giving_risk);
    let details = details(
        verdict,
        closing,
        value_ratio,
        value_difference,
        percentage_difference,
        receiving_risk - giving_risk,
        &giving_metrics,
        &receiving_metrics,
    );

    debug!(
        "Trade of {} for {} cards: {:.2} vs {:.2}, {}",
        giving.len(),
        receiving.len(),
        giving_value,
        receiving_value,
        verdict
    );

    Ok(TradeAnalysis {
        giving_value,
        receiving_value,
        value_difference,
        percentage_difference,
        fairness_score: fairness_score(giving_value, receiving_value),
        giving_risk,
        receiving_risk,
        giving_metrics,
        receiving_metrics,
        verdict,
        details,
    })
}

// ---------------------------------------------------------------------------
// Value and risk
// ---------------------------------------------------------------------------

/// Market value scaled by condition and trend.
pub fn card_value(card: &TradeCard) -> f64 {
    let condition = trade_condition_multipliers()
        .get(card.condition.label())
        .copied()
        .unwrap_or(1.0);
    card.market_value * condition * card.market_trend.value_multiplier()
}

fn side_value(cards: &[TradeCard]) -> f64 {
    cards.iter().map(card_value).sum()
}

/// Smaller side over larger side, on the 0-10 scale. 0 if either side is worthless.
pub fn fairness_score(giving_value: f64, receiving_value: f64) -> f64 {
    if giving_value == 0.0 || receiving_value == 0.0 {
        return 0.0;
    }
    round1(giving_value.min(receiving_value) / giving_value.max(receiving_value) * SCORE_MAX)
}

/// Risk of holding one card: volatility 0.4, illiquidity 0.4, trend 0.2.
pub fn card_risk(card: &TradeCard) -> f64 {
    let volatility = card.volatility.unwrap_or(UNKNOWN_SCORE);
    let liquidity = card.liquidity.unwrap_or(UNKNOWN_SCORE);
    volatility * 0.4 + (SCORE_MAX - liquidity) * 0.4 + card.market_trend.risk() * 0.2
}

/// Mean card risk, clamped to `[0, 10]` and rounded to one decimal.
pub fn side_risk(cards: &[TradeCard]) -> f64 {
    if cards.is_empty() {
        return 0.0;
    }
    let total: f64 = cards.iter().map(card_risk).sum();
    round1((total / cards.len() as f64).clamp(0.0, SCORE_MAX))
}

pub fn side_metrics(cards: &[TradeCard]) -> SideMetrics {
    if cards.is_empty() {
        return SideMetrics::default();
    }
    let n = cards.len() as f64;
    let mean = |f: &dyn Fn(&TradeCard) -> f64| round1(cards.iter().map(f).sum::<f64>() / n);
    SideMetrics {
        avg_trend: mean(&card_trend),
        avg_volatility: mean(&|c: &TradeCard| c.volatility.unwrap_or(UNKNOWN_SCORE)),
        avg_liquidity: mean(&|c: &TradeCard| c.liquidity.unwrap_or(UNKNOWN_SCORE)),
    }
}

/// Expected change in percent from the 30 and 90 day forecasts.
fn card_trend(card: &TradeCard) -> f64 {
    let current = card.market_value;
    if current <= 0.0 {
        return 0.0;
    }
    let change = |forecast: Option<f64>| (forecast.unwrap_or(current) - current) / current * 100.0;
    change(card.forecast_30d) * 0.7 + change(card.forecast_90d) * 0.3
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// The first matching rule decides, along with its closing sentence.
///
/// `risk_difference` is receiving risk minus giving risk.
pub fn trade_verdict(value_ratio: f64, risk_difference: f64) -> (TradeVerdict, &'static str) {
    if value_ratio >= 1.2 && risk_difference <= 2.0 {
        (
            TradeVerdict::StrongAccept,
            "This trade presents a significant opportunity for value appreciation with manageable risk.",
        )
    } else if value_ratio >= 1.1 && risk_difference <= 1.0 {
        (
            TradeVerdict::Accept,
            "This trade offers good value with reasonable risk.",
        )
    } else if value_ratio >= 0.9 && risk_difference <= 0.0 {
        (
            TradeVerdict::Consider,
            "This trade is fair but may not offer significant advantages.",
        )
    } else if value_ratio >= 0.8 && risk_difference <= -2.0 {
        (
            TradeVerdict::Consider,
            "The lower risk profile may justify the slight value difference.",
        )
    } else if value_ratio < 0.8 {
        (
            TradeVerdict::Decline,
            "The significant value loss makes this trade unfavorable.",
        )
    } else if risk_difference > 2.0 {
        (
            TradeVerdict::Decline,
            "The high risk profile outweighs any potential value gains.",
        )
    } else {
        (
            TradeVerdict::Consider,
            "This trade presents a balanced opportunity that requires careful consideration.",
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn details(
    verdict: TradeVerdict,
    closing: &str,
    value_ratio: f64,
    value_difference: f64,
    percentage_difference: f64,
    risk_difference: f64,
    giving: &SideMetrics,
    receiving: &SideMetrics,
) -> String {
    let gain = format!("${:.2} ({:+.1}%)", value_difference, percentage_difference);
    let loss = format!(
        "${:.2} ({:+.1}%)",
        value_difference.abs(),
        percentage_difference
    );
    let (value, impact) = if value_ratio >= 1.2 {
        ("Receiving significantly more value", format!("Potential gain: {}", gain))
    } else if value_ratio >= 1.1 {
        ("Receiving more value", format!("Potential gain: {}", gain))
    } else if value_ratio >= 0.9 {
        ("Fair value", format!("Minimal financial impact: {}", gain))
    } else if value_ratio >= 0.8 {
        ("Receiving slightly less value", format!("Potential loss: {}", loss))
    } else {
        (
            "Receiving significantly less value",
            format!("Significant potential loss: {}", loss),
        )
    };

    let risk = if risk_difference <= -2.0 {
        "with much lower risk"
    } else if risk_difference <= -1.0 {
        "with lower risk"
    } else if risk_difference <= 1.0 {
        "with similar risk"
    } else {
        "but with higher risk"
    };

    let mut sentences = vec![format!("{} - {} {}", verdict, value, risk), impact];

    let trend_difference = receiving.avg_trend - giving.avg_trend;
    if trend_difference.abs() >= 5.0 {
        let side = if trend_difference > 0.0 {
            "receiving"
        } else {
            "giving"
        };
        sentences.push(format!("Cards you're {} show stronger price trends", side));
    }

    let mut notes = Vec::new();
    let volatility_difference = receiving.avg_volatility - giving.avg_volatility;
    if volatility_difference.abs() >= 2.0 {
        let word = if volatility_difference > 0.0 { "Higher" } else { "Lower" };
        notes.push(format!("{} price volatility", word));
    }
    let liquidity_difference = receiving.avg_liquidity - giving.avg_liquidity;
    if liquidity_difference.abs() >= 2.0 {
        let word = if liquidity_difference > 0.0 { "Better" } else { "Worse" };
        notes.push(format!("{} market liquidity", word));
    }
    if !notes.is_empty() {
        sentences.push(format!(
            "Note: {} in cards you're receiving",
            notes.join(", ")
        ));
    }

    sentences.push(closing.to_string());
    sentences.join(". ")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn validate_card(card: &TradeCard) -> Result<()> {
    if !card.market_value.is_finite() || card.market_value < 0.0 {
        warn!(
            "Rejected trade card '{}' with value {}",
            card.title, card.market_value
        );
        return Err(MarketError::InvalidArgument(format!(
            "market value for '{}' must be a non-negative number, got {}",
            card.title, card.market_value
        )));
    }
    let scores = [
        card.volatility,
        card.liquidity,
        card.forecast_30d,
        card.forecast_90d,
    ];
    if scores.iter().flatten().any(|v| !v.is_finite()) {
        warn!("Rejected trade card '{}' with a non-finite score", card.title);
        return Err(MarketError::InvalidArgument(format!(
            "scores and forecasts for '{}' must be finite",
            card.title
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, MarketTrend};

    #[test]
    fn value_scales_by_condition_and_trend() {
        let mut card = TradeCard::new("Raw Card", 100.0, Condition::Raw);
        card.market_trend = MarketTrend::Hot;
        assert!((card_value(&card) - 36.0).abs() < 1e-9);
    }

    #[test]
    fn fairness_is_zero_when_a_side_is_empty() {
        assert_eq!(fairness_score(0.0, 50.0), 0.0);
        assert_eq!(fairness_score(30.0, 50.0), 6.0);
    }

    #[test]
    fn default_scores_give_mid_risk() {
        // 5 * 0.4 + 5 * 0.4 + 5 * 0.2
        let card = TradeCard::new("Card", 10.0, Condition::Psa10);
        assert_eq!(side_risk(&[card]), 5.0);
        assert_eq!(side_risk(&[]), 0.0);
    }

    #[test]
    fn verdict_rules_apply_in_order() {
        assert_eq!(trade_verdict(1.3, 2.0).0, TradeVerdict::StrongAccept);
        assert_eq!(trade_verdict(1.15, 0.5).0, TradeVerdict::Accept);
        assert_eq!(trade_verdict(1.0, 0.0).0, TradeVerdict::Consider);
        assert_eq!(trade_verdict(0.85, -2.5).0, TradeVerdict::Consider);
        assert_eq!(trade_verdict(0.5, -5.0).0, TradeVerdict::Decline);
        assert_eq!(trade_verdict(1.0, 2.5).0, TradeVerdict::Decline);
        // Strong value with too much added risk is declined.
        assert_eq!(
            trade_verdict(1.3, 2.2),
            (
                TradeVerdict::Decline,
                "The high risk profile outweighs any potential value gains."
            )
        );
        assert_eq!(trade_verdict(0.85, 0.0).0, TradeVerdict::Consider);
    }
}
