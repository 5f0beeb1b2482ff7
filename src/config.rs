use std::collections::HashMap;

/// Fallback PSA 9 multiplier for the profit calculator when the market has no graded data.
pub const DEFAULT_PSA9_MULTIPLIER: f64 = 2.0;
/// Fallback PSA 10 multiplier for the profit calculator when the market has no graded data.
pub const DEFAULT_PSA10_MULTIPLIER: f64 = 3.0;
/// eBay's final value fee for trading cards.
pub const DEFAULT_SELLER_FEE_PERCENT: f64 = 12.9;

/// Upper bound of the canonical score scale.
pub const SCORE_MAX: f64 = 10.0;
/// Trend score that predicts no price change.
pub const NEUTRAL_TREND: f64 = 5.0;
/// Price change per trend point above or below neutral.
pub const TREND_SENSITIVITY: f64 = 0.1;
/// Number of monthly points in a forecast.
pub const FORECAST_MONTHS: u32 = 12;
/// Confidence band half-width at maximum volatility.
pub const MAX_BAND_FRACTION: f64 = 0.2;

/// Sales newer than this many days count as "recent" for the price trend.
pub const RECENT_WINDOW_DAYS: i64 = 30;
/// Tukey fence multiplier for IQR outlier removal.
pub const OUTLIER_FENCE: f64 = 1.5;
/// Label used for sales whose title carries no variation keyword.
pub const BASE_VARIATION: &str = "Base";

/// Grading companies recognised in listing titles.
pub const GRADING_COMPANIES: [&str; 3] = ["PSA", "BGS", "SGC"];

/// Parallel and insert keywords, checked case-insensitively against listing titles.
///
/// The keyword that appears earliest in the title names the variation.
pub fn variation_keywords() -> Vec<&'static str> {
    vec![
        "Press Proof",
        "Optic",
        "Canvas",
        "Pink",
        "Red",
        "Blue",
        "Yellow",
        "Green",
        "Purple",
        "Orange",
        "Gold",
        "Silver",
        "Bronze",
        "Negative",
        "Prizm",
        "Wave",
        "Holo",
        "Refractor",
        "Parallel",
    ]
}

/// Return shipping added to every grading submission.
pub const DEFAULT_GRADING_SHIPPING: f64 = 10.0;

/// Grading service tiers with `(cost, turnaround_days)`.
pub fn grading_services() -> HashMap<&'static str, (f64, u32)> {
    HashMap::from([
        ("economy", (50.0, 30)),
        ("regular", (100.0, 15)),
        ("express", (200.0, 5)),
    ])
}

/// Raw-card condition adjustments applied to the base grade probabilities.
pub fn condition_multipliers() -> HashMap<&'static str, f64> {
    HashMap::from([
        ("near mint-mint", 1.4),
        ("near mint", 1.2),
        ("excellent-mint", 0.9),
        ("excellent", 0.7),
        ("very good-excellent", 0.5),
        ("very good", 0.3),
        ("good", 0.2),
        ("fair", 0.1),
        ("poor", 0.05),
    ])
}

/// Value of each condition relative to PSA 10 when pricing trades.
pub fn trade_condition_multipliers() -> HashMap<&'static str, f64> {
    HashMap::from([("PSA 10", 1.0), ("PSA 9", 0.5), ("Raw", 0.3)])
}

/// Quantile labels for price segments, lowest first.
pub const TERCILE_LABELS: [&str; 3] = ["Low", "Medium", "High"];
pub const QUARTILE_LABELS: [&str; 4] = ["Low", "Medium-Low", "Medium-High", "High"];
/// Look-back windows, in days, for the temporal breakdown.
pub const TEMPORAL_WINDOWS: [i64; 3] = [7, 30, 90];

pub const BASE_PSA10_PROBABILITY: f64 = 0.20;
pub const BASE_PSA9_PROBABILITY: f64 = 0.50;
pub const BASE_LOWER_GRADE_PROBABILITY: f64 = 0.30;
pub const MAX_PSA10_PROBABILITY: f64 = 0.90;
pub const MAX_PSA9_PROBABILITY: f64 = 0.95;
pub const MIN_LOWER_GRADE_PROBABILITY: f64 = 0.05;
/// Raw price at which a card is treated as high value for grading odds.
pub const HIGH_VALUE_THRESHOLD: f64 = 200.0;

// ---------------------------------------------------------------------------
// AnalyzerSettings
// ---------------------------------------------------------------------------

/// Tunables shared by the aggregation, calculator and simulation paths.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerSettings {
    pub psa9_multiplier: f64,
    pub psa10_multiplier: f64,
    pub recent_window_days: i64,
    pub outlier_fence: f64,
    /// Seed for the grading simulator. `None` draws from OS entropy.
    pub simulation_seed: Option<u64>,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            psa9_multiplier: DEFAULT_PSA9_MULTIPLIER,
            psa10_multiplier: DEFAULT_PSA10_MULTIPLIER,
            recent_window_days: RECENT_WINDOW_DAYS,
            outlier_fence: OUTLIER_FENCE,
            simulation_seed: None,
        }
    }
}
