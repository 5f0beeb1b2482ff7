//! Grading outcome simulator.
//!
//! Estimates how likely a raw card is to come back a PSA 10, a PSA 9 or
//! something lower, from its condition and raw price, and runs weighted
//! random submissions against those odds.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::{
    condition_multipliers, BASE_LOWER_GRADE_PROBABILITY, BASE_PSA10_PROBABILITY,
    BASE_PSA9_PROBABILITY, HIGH_VALUE_THRESHOLD, MAX_PSA10_PROBABILITY, MAX_PSA9_PROBABILITY,
    MIN_LOWER_GRADE_PROBABILITY,
};
use crate::models::{GradeOdds, SimulationSummary};

/// Weights are drawn at this resolution (basis points).
const WEIGHT_SCALE: f64 = 10_000.0;

/// One grading result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeOutcome {
    Psa10,
    Psa9,
    Lower,
}

/// Resale value of each outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomePrices {
    pub psa10: f64,
    pub psa9: f64,
    pub lower: f64,
}

impl OutcomePrices {
    pub fn value(&self, outcome: GradeOutcome) -> f64 {
        match outcome {
            GradeOutcome::Psa10 => self.psa10,
            GradeOutcome::Psa9 => self.psa9,
            GradeOutcome::Lower => self.lower,
        }
    }
}

/// Outcome probabilities for a card in `condition` worth `raw_price` ungraded.
///
/// Unknown condition labels leave the base odds unadjusted. High-value cards
/// get a boost, and cheap cards a larger share of lower grades. The result
/// is normalized to sum to 1.
pub fn grade_odds(condition: &str, raw_price: f64) -> GradeOdds {
    let key = condition.trim().to_lowercase();
    let mut factor = condition_multipliers().get(key.as_str()).copied().unwrap_or(1.0);
    if raw_price >= HIGH_VALUE_THRESHOLD {
        factor *= 1.2;
    }

    let value_factor = if raw_price > 0.0 {
        (HIGH_VALUE_THRESHOLD / raw_price).max(0.5).min(1.0)
    } else {
        1.0
    };

    let psa10 = (BASE_PSA10_PROBABILITY * factor).min(MAX_PSA10_PROBABILITY);
    let psa9 = (BASE_PSA9_PROBABILITY * factor).min(MAX_PSA9_PROBABILITY);
    let lower = (BASE_LOWER_GRADE_PROBABILITY * (2.0 - factor) * value_factor)
        .max(MIN_LOWER_GRADE_PROBABILITY);

    let total = psa10 + psa9 + lower;
    GradeOdds {
        psa10: psa10 / total,
        psa9: psa9 / total,
        lower: lower / total,
    }
}

/// Probability-weighted resale value.
pub fn expected_value(odds: &GradeOdds, prices: &OutcomePrices) -> f64 {
    odds.psa10 * prices.psa10 + odds.psa9 * prices.psa9 + odds.lower * prices.lower
}

// ---------------------------------------------------------------------------
// GradingSimulator
// ---------------------------------------------------------------------------

/// Draws grading outcomes from [`GradeOdds`].
///
/// A seeded simulator produces the same sequence on every run.
pub struct GradingSimulator {
    rng: StdRng,
}

impl GradingSimulator {
    /// `Some(seed)` for reproducible draws, `None` for OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Grade a single submission.
    pub fn submit(&mut self, odds: &GradeOdds) -> GradeOutcome {
        let outcomes = [
            (GradeOutcome::Psa10, weight(odds.psa10)),
            (GradeOutcome::Psa9, weight(odds.psa9)),
            (GradeOutcome::Lower, weight(odds.lower)),
        ];
        let total_weight: i64 = outcomes.iter().map(|(_, w)| w).sum();
        if total_weight <= 0 {
            return GradeOutcome::Lower;
        }

        let mut roll = self.rng.gen_range(0..total_weight);
        for (outcome, w) in outcomes {
            roll -= w;
            if roll < 0 {
                return outcome;
            }
        }
        GradeOutcome::Lower
    }

    /// Grade `submissions` cards and tally the results.
    pub fn simulate(
        &mut self,
        odds: &GradeOdds,
        prices: &OutcomePrices,
        submissions: usize,
    ) -> SimulationSummary {
        let mut summary = SimulationSummary {
            submissions,
            psa10: 0,
            psa9: 0,
            lower: 0,
            average_value: 0.0,
        };
        let mut total_value = 0.0;

        for _ in 0..submissions {
            let outcome = self.submit(odds);
            match outcome {
                GradeOutcome::Psa10 => summary.psa10 += 1,
                GradeOutcome::Psa9 => summary.psa9 += 1,
                GradeOutcome::Lower => summary.lower += 1,
            }
            total_value += prices.value(outcome);
        }

        if submissions > 0 {
            summary.average_value = total_value / submissions as f64;
        }
        debug!(
            "Simulated {} submissions: {} PSA 10, {} PSA 9, {} lower",
            submissions, summary.psa10, summary.psa9, summary.lower
        );
        summary
    }
}

fn weight(probability: f64) -> i64 {
    if probability.is_finite() && probability > 0.0 {
        (probability * WEIGHT_SCALE).round() as i64
    } else {
        0
    }
}
