use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SCORE_MAX;

// ---------------------------------------------------------------------------
// MarketMetrics — Summary statistics over a comparable-sales set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketMetrics {
    pub median_price: f64,
    pub avg_price: f64,
    pub low_price: f64,
    pub high_price: f64,
    pub total_sales: u64,
    #[serde(default)]
    pub std_price: Option<f64>,
    /// Fractional change of the average price against sales older than the recent window.
    #[serde(default)]
    pub price_trend: Option<f64>,
    #[serde(default)]
    pub psa9_multiplier: Option<f64>,
    #[serde(default)]
    pub psa10_multiplier: Option<f64>,
    #[serde(default)]
    pub has_graded_data: Option<bool>,
}

// ---------------------------------------------------------------------------
// MarketScores — Trend / volatility / liquidity on the 0-10 scale
// ---------------------------------------------------------------------------

/// Market indicators on the canonical 0-10 scale.
///
/// Values are not clamped; callers that compute scores from raw data clamp
/// them at the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketScores {
    pub trend: f64,
    pub volatility: f64,
    pub liquidity: f64,
}

impl MarketScores {
    pub fn new(trend: f64, volatility: f64, liquidity: f64) -> Self {
        Self {
            trend,
            volatility,
            liquidity,
        }
    }

    /// Build scores from fractions in `[0, 1]`.
    pub fn from_unit_scale(trend: f64, volatility: f64, liquidity: f64) -> Self {
        Self::new(trend * SCORE_MAX, volatility * SCORE_MAX, liquidity * SCORE_MAX)
    }
}

// ---------------------------------------------------------------------------
// Grade / MarketGrades — Letter ratings for buying and selling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Map a favorability score in `[0, 1]` to a letter.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Grade::A
        } else if score >= 0.6 {
            Grade::B
        } else if score >= 0.4 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketGrades {
    pub buy_grade: Grade,
    pub sell_grade: Grade,
}

// ---------------------------------------------------------------------------
// VariationData / MarketData — Aggregated market record for one search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VariationData {
    pub metrics: MarketMetrics,
    #[serde(default)]
    pub scores: Option<MarketScores>,
    #[serde(default)]
    pub grades: Option<MarketGrades>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketData {
    #[serde(default)]
    pub metrics: Option<MarketMetrics>,
    #[serde(default)]
    pub scores: Option<MarketScores>,
    #[serde(default)]
    pub grades: Option<MarketGrades>,
    #[serde(default)]
    pub variations: BTreeMap<String, VariationData>,
}

// ---------------------------------------------------------------------------
// PriceSummary — Raw aggregate over a filtered set of sales (query result)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriceSummary {
    pub total_sales: u64,
    pub median_price: Option<f64>,
    pub avg_price: Option<f64>,
    pub std_price: Option<f64>,
    pub low_price: Option<f64>,
    pub high_price: Option<f64>,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

// ---------------------------------------------------------------------------
// PriceSegment / TemporalWindow / MarketSegments — Breakdown of one sales group
// ---------------------------------------------------------------------------

/// One quantile bucket of the outlier-free sales, by price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriceSegment {
    pub label: String,
    pub low_price: f64,
    pub high_price: f64,
    pub avg_price: f64,
    pub sales_volume: u64,
    /// Share of the group's sales, in percent.
    pub market_share: f64,
}

/// Sales within the last `days` days of the analysis day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TemporalWindow {
    pub days: i64,
    pub avg_price: f64,
    pub sales_volume: u64,
    /// Fractional change of the window average against the whole group.
    pub price_change: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketSegments {
    /// Low / Medium / High. Empty with fewer than three sales.
    pub terciles: Vec<PriceSegment>,
    /// Low / Medium-Low / Medium-High / High. Empty with fewer than four sales.
    pub quartiles: Vec<PriceSegment>,
    /// Shortest window first. Windows without sales are omitted.
    pub windows: Vec<TemporalWindow>,
}
