//! Rule-table recommendations and the overall market outlook.

use crate::config::SCORE_MAX;
use crate::models::{
    Grade, MarketGrades, MarketOutlook, MarketScores, OutlookTier, Recommendation, Signal,
};

/// Every rule that fires for these scores and grades.
///
/// Rules are independent, so several can fire at once. Output order is
/// trend, volatility, liquidity, buy grade, sell grade. A trend strictly
/// between 3 and 5 produces no trend message.
pub fn recommendations(scores: &MarketScores, grades: &MarketGrades) -> Vec<Recommendation> {
    let mut out = Vec::new();
    let mut push = |signal: Signal, message: &str| {
        out.push(Recommendation {
            signal,
            message: message.to_string(),
        })
    };

    if scores.trend >= 7.0 {
        push(Signal::Trend, "Strong upward trend - consider buying");
    } else if scores.trend >= 5.0 {
        push(Signal::Trend, "Moderate upward trend - good buying opportunity");
    } else if scores.trend <= 3.0 {
        push(Signal::Trend, "Downward trend - consider waiting or selling");
    }

    if scores.volatility >= 7.0 {
        push(
            Signal::Volatility,
            "High volatility - expect significant price swings",
        );
    } else if scores.volatility <= 3.0 {
        push(Signal::Volatility, "Low volatility - prices are stable");
    }

    if scores.liquidity >= 7.0 {
        push(Signal::Liquidity, "High liquidity - easy to buy and sell");
    } else if scores.liquidity <= 3.0 {
        push(Signal::Liquidity, "Low liquidity - sales may take time");
    }

    match grades.buy_grade {
        Grade::A => push(Signal::BuyGrade, "Excellent buying opportunity"),
        Grade::B => push(Signal::BuyGrade, "Good buying opportunity"),
        _ => {}
    }
    match grades.sell_grade {
        Grade::A => push(Signal::SellGrade, "Excellent selling opportunity"),
        Grade::B => push(Signal::SellGrade, "Good selling opportunity"),
        _ => {}
    }

    out
}

/// Mean of trend, stability and liquidity on the 0-10 scale.
pub fn overall_score(scores: &MarketScores) -> f64 {
    (scores.trend + (SCORE_MAX - scores.volatility) + scores.liquidity) / 3.0
}

/// Weighted market health: stability 0.3, trend 0.4, liquidity 0.3.
///
/// Clamped to `[1, 10]` and rounded to one decimal.
pub fn market_health(scores: &MarketScores) -> f64 {
    let health = 0.3 * (SCORE_MAX - scores.volatility) + 0.4 * scores.trend + 0.3 * scores.liquidity;
    (health.clamp(1.0, SCORE_MAX) * 10.0).round() / 10.0
}

/// Overall and health scores, buyer and seller tiers, and a commentary paragraph.
pub fn market_outlook(scores: &MarketScores) -> MarketOutlook {
    let overall = overall_score(scores);
    let stability = SCORE_MAX - scores.volatility;

    let buyer = if overall >= 6.0 && stability >= 5.0 {
        OutlookTier::Strong
    } else if overall >= 4.5 {
        OutlookTier::Moderate
    } else {
        OutlookTier::Cautious
    };

    let seller = if overall >= 6.0 && scores.liquidity >= 5.0 {
        OutlookTier::Strong
    } else if overall >= 4.5 {
        OutlookTier::Moderate
    } else {
        OutlookTier::Hold
    };

    MarketOutlook {
        overall_score: overall,
        health_score: market_health(scores),
        buyer,
        seller,
        commentary: commentary(scores),
    }
}

/// Plain-language reading of the three scores.
pub fn commentary(scores: &MarketScores) -> String {
    let momentum = if scores.trend >= 7.0 {
        "strong upward"
    } else if scores.trend >= 5.0 {
        "moderate upward"
    } else if scores.trend >= 3.0 {
        "stable"
    } else {
        "downward"
    };

    let liquidity = if scores.liquidity >= 7.0 {
        "the market is highly liquid"
    } else if scores.liquidity >= 5.0 {
        "there is moderate market liquidity"
    } else {
        "market liquidity is limited"
    };

    let volatility = if scores.volatility <= 3.0 {
        "low"
    } else if scores.volatility <= 7.0 {
        "moderate"
    } else {
        "high"
    };

    format!(
        "The card shows a trend score of {:.1}/10, indicating {} momentum. \
         With a liquidity score of {:.1}/10, {}. \
         The volatility score of {:.1}/10 suggests {} price volatility.",
        scores.trend, momentum, scores.liquidity, liquidity, scores.volatility, volatility
    )
}
