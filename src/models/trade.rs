use std::fmt;

use serde::{Deserialize, Serialize};

use super::card::Condition;
use super::report::MarketReport;

// ---------------------------------------------------------------------------
// MarketTrend — Direction of interest in a card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketTrend {
    Hot,
    #[default]
    Stable,
    Cooling,
}

impl MarketTrend {
    /// Premium or discount applied to the card's value.
    pub fn value_multiplier(&self) -> f64 {
        match self {
            MarketTrend::Hot => 1.2,
            MarketTrend::Stable => 1.0,
            MarketTrend::Cooling => 0.8,
        }
    }

    /// Risk contribution on the 0-10 scale. Hot markets can turn quickly.
    pub fn risk(&self) -> f64 {
        match self {
            MarketTrend::Hot => 10.0,
            MarketTrend::Stable => 5.0,
            MarketTrend::Cooling => 8.0,
        }
    }

    /// Read a trend score: 7 and up is hot, 3 and below is cooling.
    pub fn from_trend_score(trend: f64) -> Self {
        if trend >= 7.0 {
            MarketTrend::Hot
        } else if trend <= 3.0 {
            MarketTrend::Cooling
        } else {
            MarketTrend::Stable
        }
    }
}

// ---------------------------------------------------------------------------
// TradeCard — One card on either side of a trade
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TradeCard {
    pub title: String,
    pub market_value: f64,
    pub condition: Condition,
    #[serde(default)]
    pub market_trend: MarketTrend,
    /// Volatility score; 5 when unknown.
    #[serde(default)]
    pub volatility: Option<f64>,
    /// Liquidity score; 5 when unknown.
    #[serde(default)]
    pub liquidity: Option<f64>,
    /// Expected value in 30 days; the market value when unknown.
    #[serde(default)]
    pub forecast_30d: Option<f64>,
    /// Expected value in 90 days; the market value when unknown.
    #[serde(default)]
    pub forecast_90d: Option<f64>,
}

impl TradeCard {
    /// A stable-market card with no scores or forecasts.
    pub fn new(title: &str, market_value: f64, condition: Condition) -> Self {
        Self {
            title: title.to_string(),
            market_value,
            condition,
            market_trend: MarketTrend::Stable,
            volatility: None,
            liquidity: None,
            forecast_30d: None,
            forecast_90d: None,
        }
    }

    /// A card priced and scored from its market report.
    ///
    /// The first and third forecast months stand in for the 30 and 90 day
    /// outlooks.
    pub fn from_report(report: &MarketReport, condition: Condition) -> Self {
        let month = |n: u32| {
            report
                .forecast
                .points
                .iter()
                .find(|p| p.month == n)
                .map(|p| p.price)
        };
        Self {
            title: report.card_title.clone(),
            market_value: report.forecast.current_price,
            condition,
            market_trend: MarketTrend::from_trend_score(report.scores.trend),
            volatility: Some(report.scores.volatility),
            liquidity: Some(report.scores.liquidity),
            forecast_30d: month(1),
            forecast_90d: month(3),
        }
    }
}

// ---------------------------------------------------------------------------
// TradeAnalysis — Both sides compared
// ---------------------------------------------------------------------------

/// Averages over one side of a trade, each rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SideMetrics {
    /// Expected change in percent, weighting the 30 day outlook 0.7 and the 90 day 0.3.
    pub avg_trend: f64,
    pub avg_volatility: f64,
    pub avg_liquidity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeVerdict {
    StrongAccept,
    Accept,
    Consider,
    Decline,
}

impl TradeVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            TradeVerdict::StrongAccept => "Strong Accept",
            TradeVerdict::Accept => "Accept",
            TradeVerdict::Consider => "Consider",
            TradeVerdict::Decline => "Decline",
        }
    }
}

impl fmt::Display for TradeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TradeAnalysis {
    pub giving_value: f64,
    pub receiving_value: f64,
    /// Receiving minus giving.
    pub value_difference: f64,
    /// `value_difference` as a percentage of the giving side; 0 when that side is worthless.
    pub percentage_difference: f64,
    /// Ratio of the smaller side to the larger on the 0-10 scale.
    pub fairness_score: f64,
    pub giving_risk: f64,
    pub receiving_risk: f64,
    pub giving_metrics: SideMetrics,
    pub receiving_metrics: SideMetrics,
    pub verdict: TradeVerdict,
    pub details: String,
}
