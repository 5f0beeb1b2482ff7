use serde::{Deserialize, Serialize};

use super::card::Condition;
use super::market::{MarketGrades, MarketMetrics, MarketScores};
use crate::config::{grading_services, DEFAULT_GRADING_SHIPPING, DEFAULT_SELLER_FEE_PERCENT};
use crate::error::{MarketError, Result};

// ---------------------------------------------------------------------------
// GradedPrices — Median price scaled by the market's graded multipliers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GradedPrices {
    pub psa9: Option<f64>,
    pub psa10: Option<f64>,
}

// ---------------------------------------------------------------------------
// Recommendation — One rule-table hit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Trend,
    Volatility,
    Liquidity,
    BuyGrade,
    SellGrade,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Recommendation {
    pub signal: Signal,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Profit calculator inputs and outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfitInputs {
    pub purchase_price: f64,
    pub condition: Condition,
    pub shipping_cost: f64,
    pub seller_fee_percent: f64,
    pub sale_shipping: f64,
}

impl ProfitInputs {
    /// Inputs with no shipping and the default seller fee.
    pub fn new(purchase_price: f64, condition: Condition) -> Self {
        Self {
            purchase_price,
            condition,
            shipping_cost: 0.0,
            seller_fee_percent: DEFAULT_SELLER_FEE_PERCENT,
            sale_shipping: 0.0,
        }
    }
}

/// Costs of sending a raw card for grading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GradingCosts {
    pub grading_cost: f64,
    pub grading_shipping: f64,
}

impl GradingCosts {
    /// Costs for a named service tier (`"economy"`, `"regular"`, `"express"`)
    /// with the default return shipping.
    pub fn for_service(service: &str) -> Result<Self> {
        let key = service.trim().to_ascii_lowercase();
        let (grading_cost, _) = grading_services()
            .get(key.as_str())
            .copied()
            .ok_or_else(|| {
                MarketError::InvalidArgument(format!("unknown grading service '{}'", service))
            })?;
        Ok(Self {
            grading_cost,
            grading_shipping: DEFAULT_GRADING_SHIPPING,
        })
    }

    pub fn total(&self) -> f64 {
        self.grading_cost + self.grading_shipping
    }
}

impl Default for GradingCosts {
    fn default() -> Self {
        Self {
            grading_cost: 25.0,
            grading_shipping: DEFAULT_GRADING_SHIPPING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfitBreakdown {
    pub condition: Condition,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub seller_fee_amount: f64,
    pub total_costs: f64,
    pub potential_profit: f64,
    pub profit_percentage: f64,
    /// Lowest sale price that recovers every cost after fees. `None` at a 100% fee.
    pub break_even_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GradingScenario {
    pub target: Condition,
    pub graded_price: f64,
    pub cost_basis: f64,
    pub profit: f64,
    pub profit_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingVerdict {
    GradeIt,
    Consider,
    DontGrade,
}

impl GradingVerdict {
    pub fn message(&self) -> &'static str {
        match self {
            GradingVerdict::GradeIt => "Grade it - high profit potential at PSA 10",
            GradingVerdict::Consider => "Consider grading - profitable at PSA 9",
            GradingVerdict::DontGrade => "Don't grade - grading costs exceed potential profit",
        }
    }
}

/// Primary breakdown plus, for raw cards, the grade-and-resell alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfitAnalysis {
    pub breakdown: ProfitBreakdown,
    pub grading_scenarios: Vec<GradingScenario>,
    pub verdict: Option<GradingVerdict>,
}

// ---------------------------------------------------------------------------
// PriceForecast — Linear twelve-month projection with confidence bands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ForecastPoint {
    pub month: u32,
    pub price: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriceForecast {
    pub current_price: f64,
    pub trend_factor: f64,
    pub predicted_price: f64,
    pub monthly_change: f64,
    pub band_fraction: f64,
    /// Percentage in `[0, 100]`.
    pub confidence: f64,
    pub points: Vec<ForecastPoint>,
}

// ---------------------------------------------------------------------------
// MarketOutlook — Overall and health scores with buyer / seller tiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlookTier {
    Strong,
    Moderate,
    Cautious,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketOutlook {
    /// Mean of trend, stability (10 - volatility) and liquidity.
    pub overall_score: f64,
    /// Weighted stability, trend and liquidity, in `[1, 10]` to one decimal.
    pub health_score: f64,
    pub buyer: OutlookTier,
    pub seller: OutlookTier,
    pub commentary: String,
}

// ---------------------------------------------------------------------------
// MarketReport — Everything derived for one selected card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketReport {
    pub card_title: String,
    /// Variation whose metrics replaced the top-level block, if any.
    pub variation: Option<String>,
    pub metrics: MarketMetrics,
    pub scores: MarketScores,
    pub grades: MarketGrades,
    pub graded_prices: GradedPrices,
    pub recommendations: Vec<Recommendation>,
    pub outlook: MarketOutlook,
    pub forecast: PriceForecast,
}

// ---------------------------------------------------------------------------
// Grading simulation
// ---------------------------------------------------------------------------

/// Probabilities of each grading outcome, normalized to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GradeOdds {
    pub psa10: f64,
    pub psa9: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationSummary {
    pub submissions: usize,
    pub psa10: usize,
    pub psa9: usize,
    pub lower: usize,
    pub average_value: f64,
}
