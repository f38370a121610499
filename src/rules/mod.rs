//! Regulatory rule parameters: baseline snapshot, birth-cohort resolution, RATH schedules

mod cohort;
mod handicap;
pub mod loader;

pub use cohort::{parse_birth_date, resolve_by_birth_year, CohortRow, BIRTH_COHORTS};
pub use handicap::{
    lookup_minimum_quarters, resolve_handicap_schedule, HandicapCohortRow, HandicapSchedule,
    HANDICAP_COHORTS,
};
pub use loader::{load_rules, load_rules_from_reader, DEFAULT_RULES_PATH};

use crate::error::{EstimatorError, Result};
use serde::{Deserialize, Serialize};

/// How the surcote bonus grows with the number of extra quarters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurcotePolicy {
    /// base × (1 + s × extra)
    #[default]
    Linear,
    /// base × (1 + s)^extra
    Compound,
}

impl SurcotePolicy {
    /// Multiplier applied to the base annual amount for `extra_quarters`
    pub fn factor(&self, per_quarter: f64, extra_quarters: u32) -> f64 {
        match self {
            SurcotePolicy::Linear => 1.0 + per_quarter * extra_quarters as f64,
            SurcotePolicy::Compound => {
                let exponent = i32::try_from(extra_quarters).unwrap_or(i32::MAX);
                (1.0 + per_quarter).powi(exponent)
            }
        }
    }
}

/// Parameters of one regulatory snapshot, possibly adjusted for a birth cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleParameters {
    /// Legal retirement age in decimal years (62.25 = 62 years 3 months)
    pub legal_age: f64,

    /// Age at which the full rate is granted regardless of quarters
    pub full_rate_auto_age: f64,

    /// Quarters required for the full rate
    pub required_quarters: u32,

    /// Full pension rate (taux plein)
    pub full_rate: f64,

    /// Floor of the rate after décote
    pub min_rate: f64,

    /// Rate reduction per missing quarter
    pub decote_per_missing_quarter: f64,

    /// Maximum number of quarters the décote applies to
    pub decote_cap_quarters: u32,

    /// Base bonus per extra quarter past legal age
    pub surcote_per_extra_quarter: f64,

    /// Linear or compounding surcote
    #[serde(default)]
    pub surcote_policy: SurcotePolicy,

    /// Gross bonus for three or more children
    pub child_bonus_percent: f64,

    /// Value of one complementary point
    pub point_value: f64,

    /// Social deduction rate applied to gross (CSG/CRDS)
    pub csg_rate: f64,

    /// Early legal age for long careers
    #[serde(default)]
    pub long_career_age: Option<f64>,

    /// Legal age for disability (invalidité / inaptitude)
    #[serde(default)]
    pub disability_age: Option<f64>,

    /// Floor of the legal age on the handicap (RATH) track; the age itself
    /// comes from the cohort schedule
    #[serde(default)]
    pub handicap_age: Option<f64>,

    /// Years subtracted from legal age for a 10-19% incapacity
    #[serde(default)]
    pub incapacity_age_offset: f64,
}

impl RuleParameters {
    /// Regulation in force in 2025 (post 2023 reform, cohorts born 1968 and later)
    pub fn regulation_2025() -> Self {
        Self {
            legal_age: 64.0,
            full_rate_auto_age: 67.0,
            required_quarters: 172,
            full_rate: 0.50,
            min_rate: 0.425,
            decote_per_missing_quarter: 0.00625,
            decote_cap_quarters: 12,
            surcote_per_extra_quarter: 0.0125,
            surcote_policy: SurcotePolicy::Linear,
            child_bonus_percent: 0.10,
            point_value: 1.4159,
            csg_rate: 0.086,
            long_career_age: Some(60.0),
            disability_age: Some(62.0),
            handicap_age: Some(55.0),
            incapacity_age_offset: 2.0,
        }
    }

    /// Same parameters with a different surcote policy
    pub fn with_surcote_policy(mut self, policy: SurcotePolicy) -> Self {
        self.surcote_policy = policy;
        self
    }

    /// Check the invariants every rule set must satisfy
    pub fn validate(&self) -> Result<()> {
        if self.required_quarters == 0 {
            return Err(EstimatorError::InvalidRules(
                "required_quarters must be positive".to_string(),
            ));
        }
        if self.min_rate > self.full_rate {
            return Err(EstimatorError::InvalidRules(format!(
                "min_rate {} exceeds full_rate {}",
                self.min_rate, self.full_rate
            )));
        }
        if self.min_rate < 0.0 {
            return Err(EstimatorError::InvalidRules(format!(
                "min_rate {} is negative",
                self.min_rate
            )));
        }
        if !(0.0..1.0).contains(&self.csg_rate) {
            return Err(EstimatorError::InvalidRules(format!(
                "csg_rate {} outside [0, 1)",
                self.csg_rate
            )));
        }
        Ok(())
    }
}

impl Default for RuleParameters {
    fn default() -> Self {
        Self::regulation_2025()
    }
}
