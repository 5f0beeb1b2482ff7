//! Profit/cost calculator and grade-and-resell scenarios.

use tracing::warn;

use crate::config::{DEFAULT_PSA10_MULTIPLIER, DEFAULT_PSA9_MULTIPLIER};
use crate::error::{MarketError, Result};
use crate::models::{
    Condition, GradingCosts, GradingScenario, GradingVerdict, MarketMetrics, ProfitAnalysis,
    ProfitBreakdown, ProfitInputs,
};

// ---------------------------------------------------------------------------
// ProfitMultipliers
// ---------------------------------------------------------------------------

/// Graded-price multipliers used by the calculator.
///
/// Unlike the display path, the calculator always has a multiplier: absent
/// or unusable market values fall back to configured defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitMultipliers {
    pub psa9: f64,
    pub psa10: f64,
}

impl Default for ProfitMultipliers {
    fn default() -> Self {
        Self {
            psa9: DEFAULT_PSA9_MULTIPLIER,
            psa10: DEFAULT_PSA10_MULTIPLIER,
        }
    }
}

impl ProfitMultipliers {
    /// Market multipliers where present and positive, `defaults` otherwise.
    pub fn from_metrics(metrics: Option<&MarketMetrics>, defaults: ProfitMultipliers) -> Self {
        let pick = |value: Option<f64>, fallback: f64| {
            value
                .filter(|m| m.is_finite() && *m > 0.0)
                .unwrap_or(fallback)
        };
        Self {
            psa9: pick(metrics.and_then(|m| m.psa9_multiplier), defaults.psa9),
            psa10: pick(metrics.and_then(|m| m.psa10_multiplier), defaults.psa10),
        }
    }

    /// Multiplier for a resale condition. Raw sells at purchase price.
    pub fn for_condition(&self, condition: Condition) -> f64 {
        match condition {
            Condition::Raw => 1.0,
            Condition::Psa9 => self.psa9,
            Condition::Psa10 => self.psa10,
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Profit from buying at `purchase_price` and reselling in `condition`.
pub fn calculate_profit(
    inputs: &ProfitInputs,
    multipliers: &ProfitMultipliers,
) -> Result<ProfitBreakdown> {
    validate_inputs(inputs)?;

    let sale_price = inputs.purchase_price * multipliers.for_condition(inputs.condition);
    let seller_fee_amount = sale_price * (inputs.seller_fee_percent / 100.0);
    let total_costs =
        inputs.purchase_price + inputs.shipping_cost + seller_fee_amount + inputs.sale_shipping;
    let potential_profit = sale_price - total_costs;

    Ok(ProfitBreakdown {
        condition: inputs.condition,
        purchase_price: inputs.purchase_price,
        sale_price,
        seller_fee_amount,
        total_costs,
        potential_profit,
        profit_percentage: percentage(potential_profit, total_costs),
        break_even_price: break_even_price(
            inputs.purchase_price,
            inputs.shipping_cost,
            inputs.sale_shipping,
            inputs.seller_fee_percent,
        ),
    })
}

/// PSA 9 and PSA 10 outcomes of grading a raw card. Empty for graded inputs.
///
/// The cost basis is purchase, inbound shipping and grading. Seller fees
/// and sale shipping are not deducted here.
pub fn grading_scenarios(
    inputs: &ProfitInputs,
    costs: &GradingCosts,
    multipliers: &ProfitMultipliers,
) -> Result<Vec<GradingScenario>> {
    validate_inputs(inputs)?;
    validate_amount("grading_cost", costs.grading_cost)?;
    validate_amount("grading_shipping", costs.grading_shipping)?;

    if inputs.condition != Condition::Raw {
        return Ok(Vec::new());
    }

    let cost_basis = inputs.purchase_price + inputs.shipping_cost + costs.total();
    Ok([Condition::Psa9, Condition::Psa10]
        .into_iter()
        .map(|target| {
            let graded_price = inputs.purchase_price * multipliers.for_condition(target);
            let profit = graded_price - cost_basis;
            GradingScenario {
                target,
                graded_price,
                cost_basis,
                profit,
                profit_percentage: percentage(profit, cost_basis),
            }
        })
        .collect())
}

/// Whether grading pays off, judged against the grading outlay.
///
/// Returns `None` when there are no scenarios (the card is already graded).
pub fn grading_verdict(
    scenarios: &[GradingScenario],
    costs: &GradingCosts,
) -> Option<GradingVerdict> {
    let profit_at = |target: Condition| {
        scenarios
            .iter()
            .find(|s| s.target == target)
            .map(|s| s.profit)
    };
    let psa10 = profit_at(Condition::Psa10)?;
    let psa9 = profit_at(Condition::Psa9)?;
    let outlay = costs.total();

    Some(if psa10 > outlay * 2.0 {
        GradingVerdict::GradeIt
    } else if psa9 > outlay {
        GradingVerdict::Consider
    } else {
        GradingVerdict::DontGrade
    })
}

/// Breakdown, grading scenarios and verdict in one call.
pub fn profit_analysis(
    inputs: &ProfitInputs,
    costs: &GradingCosts,
    multipliers: &ProfitMultipliers,
) -> Result<ProfitAnalysis> {
    let breakdown = calculate_profit(inputs, multipliers)?;
    let scenarios = grading_scenarios(inputs, costs, multipliers)?;
    let verdict = grading_verdict(&scenarios, costs);
    Ok(ProfitAnalysis {
        breakdown,
        grading_scenarios: scenarios,
        verdict,
    })
}

/// Sale price at which profit is exactly zero after the seller fee.
///
/// `None` when the fee takes the whole sale price.
pub fn break_even_price(
    purchase_price: f64,
    shipping_cost: f64,
    sale_shipping: f64,
    seller_fee_percent: f64,
) -> Option<f64> {
    let kept = 1.0 - seller_fee_percent / 100.0;
    if kept <= 0.0 {
        return None;
    }
    Some((purchase_price + shipping_cost + sale_shipping) / kept)
}

/// Return on investment in percent. 0 when nothing was paid.
pub fn roi(purchase_price: f64, current_value: f64) -> f64 {
    if purchase_price <= 0.0 {
        return 0.0;
    }
    (current_value - purchase_price) / purchase_price * 100.0
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

fn validate_inputs(inputs: &ProfitInputs) -> Result<()> {
    validate_amount("purchase_price", inputs.purchase_price)?;
    validate_amount("shipping_cost", inputs.shipping_cost)?;
    validate_amount("sale_shipping", inputs.sale_shipping)?;
    let fee = inputs.seller_fee_percent;
    if !fee.is_finite() || !(0.0..=100.0).contains(&fee) {
        warn!("Rejected seller fee of {}%", fee);
        return Err(MarketError::InvalidArgument(format!(
            "seller_fee_percent must be between 0 and 100, got {}",
            fee
        )));
    }
    Ok(())
}

fn validate_amount(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        warn!("Rejected {} of {}", name, value);
        Err(MarketError::InvalidArgument(format!(
            "{} must be a non-negative amount, got {}",
            name, value
        )))
    }
}
