//! Pension calculator: rules, adjustments and rate combined into annual amounts

use super::adjustments::derive_adjustments;
use super::rate::determine_rate;
use super::result::{PensionEstimate, PensionResult};
use super::salary;
use crate::individual::IndividualInput;
use crate::rules::{resolve_by_birth_year, resolve_handicap_schedule, HandicapSchedule, RuleParameters};
use chrono::NaiveDate;
use rayon::prelude::*;

/// Round to two decimals (0.28125 -> 0.28)
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// RATH majoration coefficient: round2((handicap quarters / base quarters) / 3)
///
/// None when either figure is not positive.
pub fn handicap_majoration(handicap_quarters: i32, base_quarters: i32) -> Option<f64> {
    if handicap_quarters <= 0 || base_quarters <= 0 {
        return None;
    }
    Some(round2(handicap_quarters as f64 / base_quarters as f64 / 3.0))
}

/// Main calculator, holding the baseline regulation
///
/// Stateless between calls; share it freely across threads.
#[derive(Debug, Clone, Default)]
pub struct PensionCalculator {
    rules: RuleParameters,
}

impl PensionCalculator {
    /// Create a calculator for a regulatory snapshot
    pub fn new(rules: RuleParameters) -> Self {
        Self { rules }
    }

    /// Baseline rules before birth-cohort resolution
    pub fn rules(&self) -> &RuleParameters {
        &self.rules
    }

    /// Rules applying to a birth date
    pub fn resolved_rules(&self, birth_date: Option<NaiveDate>) -> RuleParameters {
        resolve_by_birth_year(&self.rules, birth_date)
    }

    /// RATH schedule applying to a birth date
    pub fn handicap_schedule(&self, birth_date: Option<NaiveDate>) -> HandicapSchedule {
        resolve_handicap_schedule(&self.rules, birth_date)
    }

    /// Compute the pension estimate for one individual
    pub fn calculate(&self, input: &IndividualInput) -> PensionResult {
        self.estimate(input).result
    }

    /// Compute the estimate and keep the cohort rules and adjustments behind it
    pub fn estimate(&self, input: &IndividualInput) -> PensionEstimate {
        // 1) Cohort rules, RATH schedule and adjustments
        let rules = self.resolved_rules(input.birth_date);
        let schedule = self.handicap_schedule(input.birth_date);
        let adjustments = derive_adjustments(input, &rules, &schedule);
        let effective_quarters = adjustments.effective_quarters;

        // 2) Reference quarters: handicap track or cohort
        let reference_quarters = if input.handicap.active {
            schedule.full_reference
        } else {
            rules.required_quarters
        };

        // 3) Rate
        let decision = determine_rate(input, effective_quarters, reference_quarters, &schedule, &rules);

        // 4) Prorata
        let prorata = if reference_quarters == 0 {
            1.0
        } else {
            (effective_quarters as f64 / reference_quarters as f64).min(1.0)
        };

        // 5) Base before surcote
        let derived_salary = match input.average_salary {
            Some(_) => None,
            None if input.salary_history.is_empty() => None,
            None => Some(salary::aggregate(&input.salary_history)),
        };
        let average_salary = input.average_salary.or(derived_salary).unwrap_or(0.0);
        let mut base_annual = average_salary * decision.rate * prorata;

        // 6) Surcote, past the cohort legal age
        if input.target_age >= rules.legal_age && effective_quarters > reference_quarters {
            let extra = effective_quarters - reference_quarters;
            let factor = rules
                .surcote_policy
                .factor(rules.surcote_per_extra_quarter, extra);
            log::debug!("Surcote: {} extra quarters, factor {:.6}", extra, factor);
            base_annual *= factor;
        }

        // 7) Handicap majoration, on the base after surcote
        if input.handicap.active {
            if let Some(coefficient) =
                handicap_majoration(input.handicap.contributed_quarters, input.base_quarters)
            {
                log::debug!("Handicap majoration coefficient {:.2}", coefficient);
                base_annual *= 1.0 + coefficient;
            }
        }

        // 8) Complementary scheme
        let complementary_annual = input.points.max(0.0) * rules.point_value;

        // 9) Gross with children bonus
        let mut gross_annual = base_annual + complementary_annual;
        if input.children >= 3 {
            gross_annual *= 1.0 + rules.child_bonus_percent;
        }

        // 10) Net
        let net_annual = gross_annual * (1.0 - rules.csg_rate);

        log::debug!(
            "Pension: rate {:.5} ({:?}), prorata {:.4}, base {:.2}, comp {:.2}, net {:.2}",
            decision.rate,
            decision.basis,
            prorata,
            base_annual,
            complementary_annual,
            net_annual
        );

        let result = PensionResult {
            effective_legal_age: adjustments.effective_legal_age,
            reference_quarters,
            effective_quarters,
            rate: decision.rate,
            rate_basis: decision.basis,
            prorata,
            base_annual,
            complementary_annual,
            gross_annual,
            net_annual,
            average_salary: derived_salary,
        };

        PensionEstimate {
            rules,
            adjustments,
            result,
        }
    }

    /// Compute estimates for many individuals in parallel, preserving order
    pub fn calculate_batch(&self, inputs: &[IndividualInput]) -> Vec<PensionResult> {
        inputs.par_iter().map(|input| self.calculate(input)).collect()
    }
}

/// Compute one estimate against a baseline regulation
pub fn calculate_pension(input: &IndividualInput, rules: &RuleParameters) -> PensionResult {
    PensionCalculator::new(rules.clone()).calculate(input)
}
