//! Pension estimate output

use super::adjustments::EffectiveAdjustments;
use super::rate::RateBasis;
use crate::rules::RuleParameters;
use serde::{Deserialize, Serialize};

/// Result of one pension calculation (annual amounts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionResult {
    /// Legal age after incapacity / long-career / disability / handicap steps
    pub effective_legal_age: f64,

    /// Quarters used as the prorata and décote reference
    pub reference_quarters: u32,

    /// Base quarters plus caregiving and hardship credits
    pub effective_quarters: u32,

    pub rate: f64,
    pub rate_basis: RateBasis,

    /// min(effective / reference, 1)
    pub prorata: f64,

    /// Base scheme pension, after surcote and handicap majoration
    pub base_annual: f64,

    /// Complementary scheme pension (points × point value)
    pub complementary_annual: f64,

    /// Base + complementary, with the children bonus
    pub gross_annual: f64,

    /// Gross after social deductions
    pub net_annual: f64,

    /// SAM derived from the salary history, when it was not supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_salary: Option<f64>,
}

impl PensionResult {
    pub fn monthly_gross(&self) -> f64 {
        self.gross_annual / 12.0
    }

    pub fn monthly_net(&self) -> f64 {
        self.net_annual / 12.0
    }
}

/// A result together with the cohort rules and adjustments it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionEstimate {
    pub rules: RuleParameters,
    pub adjustments: EffectiveAdjustments,
    pub result: PensionResult,
}
