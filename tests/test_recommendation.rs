//! Recommendation rule and market outlook tests.

use card_market_sdk::analysis::recommendation::overall_score;
use card_market_sdk::analysis::{market_outlook, recommendations};
use card_market_sdk::models::{Grade, MarketGrades, MarketScores, OutlookTier, Signal};

fn grades(buy: Grade, sell: Grade) -> MarketGrades {
    MarketGrades {
        buy_grade: buy,
        sell_grade: sell,
    }
}

fn messages(scores: MarketScores, g: MarketGrades) -> Vec<String> {
    recommendations(&scores, &g)
        .into_iter()
        .map(|r| r.message)
        .collect()
}

#[test]
fn every_matching_rule_fires_in_order() {
    let recs = recommendations(
        &MarketScores::new(8.0, 2.0, 8.0),
        &grades(Grade::A, Grade::A),
    );
    let signals: Vec<Signal> = recs.iter().map(|r| r.signal).collect();
    assert_eq!(
        signals,
        vec![
            Signal::Trend,
            Signal::Volatility,
            Signal::Liquidity,
            Signal::BuyGrade,
            Signal::SellGrade,
        ]
    );
    assert_eq!(recs[0].message, "Strong upward trend - consider buying");
    assert_eq!(recs[1].message, "Low volatility - prices are stable");
    assert_eq!(recs[2].message, "High liquidity - easy to buy and sell");
    assert_eq!(recs[3].message, "Excellent buying opportunity");
    assert_eq!(recs[4].message, "Excellent selling opportunity");
}

#[test]
fn middling_market_only_reports_grades() {
    let msgs = messages(MarketScores::new(4.0, 5.0, 5.0), grades(Grade::B, Grade::B));
    assert_eq!(
        msgs,
        vec!["Good buying opportunity", "Good selling opportunity"]
    );
}

#[test]
fn trend_gap_between_three_and_five_is_silent() {
    for trend in [3.01, 4.0, 4.99] {
        let recs = recommendations(
            &MarketScores::new(trend, 5.0, 5.0),
            &grades(Grade::C, Grade::D),
        );
        assert!(recs.is_empty(), "trend {} produced {:?}", trend, recs);
    }
}

#[test]
fn threshold_boundaries_are_inclusive() {
    let msgs = messages(MarketScores::new(5.0, 7.0, 3.0), grades(Grade::C, Grade::C));
    assert_eq!(
        msgs,
        vec![
            "Moderate upward trend - good buying opportunity",
            "High volatility - expect significant price swings",
            "Low liquidity - sales may take time",
        ]
    );

    let msgs = messages(MarketScores::new(3.0, 3.0, 7.0), grades(Grade::D, Grade::D));
    assert_eq!(
        msgs,
        vec![
            "Downward trend - consider waiting or selling",
            "Low volatility - prices are stable",
            "High liquidity - easy to buy and sell",
        ]
    );
}

#[test]
fn unit_scale_scores_are_converted() {
    let scores = MarketScores::from_unit_scale(0.8, 0.2, 0.75);
    let msgs = messages(scores, grades(Grade::C, Grade::C));
    assert_eq!(msgs.len(), 3);
    assert_eq!(msgs[0], "Strong upward trend - consider buying");
}

// ---------------------------------------------------------------------------
// market_outlook
// ---------------------------------------------------------------------------

#[test]
fn strong_outlook_for_calm_rising_liquid_market() {
    let outlook = market_outlook(&MarketScores::new(8.0, 2.0, 8.0));
    assert!((outlook.overall_score - 8.0).abs() < 1e-9);
    assert_eq!(outlook.health_score, 8.0);
    assert_eq!(outlook.buyer, OutlookTier::Strong);
    assert_eq!(outlook.seller, OutlookTier::Strong);
    assert!(outlook.commentary.contains("strong upward momentum"));
    assert!(outlook.commentary.contains("highly liquid"));
    assert!(outlook.commentary.contains("low price volatility"));
}

#[test]
fn illiquid_market_is_strong_for_buyers_only() {
    // overall = (9 + 9 + 3) / 3 = 7
    let outlook = market_outlook(&MarketScores::new(9.0, 1.0, 3.0));
    assert_eq!(outlook.buyer, OutlookTier::Strong);
    assert_eq!(outlook.seller, OutlookTier::Moderate);
}

#[test]
fn weak_market_outlook() {
    let scores = MarketScores::new(2.0, 9.0, 1.0);
    assert!((overall_score(&scores) - 4.0 / 3.0).abs() < 1e-9);

    let outlook = market_outlook(&scores);
    assert_eq!(outlook.buyer, OutlookTier::Cautious);
    assert_eq!(outlook.seller, OutlookTier::Hold);
    // 0.3 * 1 + 0.4 * 2 + 0.3 * 1
    assert_eq!(outlook.health_score, 1.4);
}
