//! Pension rate (taux): décote on the most favourable shortfall, full-rate tracks

use crate::individual::{HandicapTrack, IndividualInput};
use crate::rules::{HandicapSchedule, RuleParameters};
use serde::{Deserialize, Serialize};

/// Which branch produced the rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateBasis {
    /// Departure at or after the automatic full-rate age
    AutomaticFullRate,
    /// Full rate minus décote on missing quarters
    Standard,
    /// Disability (invalidité / inaptitude)
    Disability,
    /// Workplace incapacity of 20% or more
    Incapacity,
    /// Handicap (RATH) conditions met
    Handicap,
}

/// Rate together with the branch that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateDecision {
    pub rate: f64,
    pub basis: RateBasis,
}

/// Rate from quarters and age, without special tracks
///
/// The shortfall is the smaller of the missing quarters and the quarters left
/// until the automatic full-rate age, capped at `decote_cap_quarters`. The
/// result is kept within [min_rate, full_rate].
pub fn compute_standard_rate(
    effective_quarters: u32,
    required_quarters: u32,
    target_age: f64,
    rules: &RuleParameters,
) -> f64 {
    if target_age >= rules.full_rate_auto_age {
        return rules.full_rate;
    }

    let missing_by_duration = required_quarters.saturating_sub(effective_quarters);
    let missing_by_age = ((rules.full_rate_auto_age - target_age) * 4.0).ceil().max(0.0) as u32;
    let missing = missing_by_duration.min(missing_by_age);
    let decote_quarters = missing.min(rules.decote_cap_quarters);

    let rate = rules.full_rate - decote_quarters as f64 * rules.decote_per_missing_quarter;
    rate.max(rules.min_rate).min(rules.full_rate)
}

/// Tracks that grant the full rate without any quarter computation
pub fn full_rate_short_circuit(input: &IndividualInput) -> Option<RateBasis> {
    if input.disability {
        Some(RateBasis::Disability)
    } else if input.incapacity.qualifies_major() {
        Some(RateBasis::Incapacity)
    } else {
        None
    }
}

/// Handicap track eligibility: active, schedule defined for the cohort, old
/// enough and enough handicap-contributed quarters
pub fn is_handicap_eligible(track: &HandicapTrack, target_age: f64, schedule: &HandicapSchedule) -> bool {
    if !track.active {
        return false;
    }
    let (Some(min_age), Some(min_quarters)) = (schedule.min_age(), schedule.minimum_quarters_at(target_age)) else {
        return false;
    };
    target_age >= min_age && i64::from(track.contributed_quarters) >= i64::from(min_quarters)
}

/// Rate for one calculation: short-circuits, then handicap, then the standard path
pub fn determine_rate(
    input: &IndividualInput,
    effective_quarters: u32,
    reference_quarters: u32,
    schedule: &HandicapSchedule,
    rules: &RuleParameters,
) -> RateDecision {
    let full = |basis| RateDecision {
        rate: rules.full_rate,
        basis,
    };

    if let Some(basis) = full_rate_short_circuit(input) {
        return full(basis);
    }
    if is_handicap_eligible(&input.handicap, input.target_age, schedule) {
        return full(RateBasis::Handicap);
    }
    if input.target_age >= rules.full_rate_auto_age {
        return full(RateBasis::AutomaticFullRate);
    }

    RateDecision {
        rate: compute_standard_rate(effective_quarters, reference_quarters, input.target_age, rules),
        basis: RateBasis::Standard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::{IncapacityType, WorkplaceIncapacity};
    use crate::rules::resolve_handicap_schedule;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn rules() -> RuleParameters {
        RuleParameters::regulation_2025()
    }

    #[test]
    fn test_full_quarters_gives_full_rate() {
        assert_relative_eq!(compute_standard_rate(172, 172, 64.0, &rules()), 0.50);
        assert_relative_eq!(compute_standard_rate(180, 172, 62.0, &rules()), 0.50);
    }

    #[test]
    fn test_automatic_full_rate_age() {
        assert_relative_eq!(compute_standard_rate(0, 172, 68.0, &rules()), 0.50);
        assert_relative_eq!(compute_standard_rate(0, 172, 67.0, &rules()), 0.50);
    }

    #[test]
    fn test_decote_uses_smaller_shortfall() {
        // 4 quarters missing by duration, 12 by age
        assert_relative_eq!(compute_standard_rate(168, 172, 64.0, &rules()), 0.475, epsilon = 1e-12);
        // 20 missing by duration, 4 by age (66 -> 67)
        assert_relative_eq!(compute_standard_rate(152, 172, 66.0, &rules()), 0.475, epsilon = 1e-12);
        // Partial year rounds up: 0.3 years -> 2 quarters
        assert_relative_eq!(compute_standard_rate(100, 172, 66.7, &rules()), 0.4875, epsilon = 1e-12);
    }

    #[test]
    fn test_decote_cap_and_floor() {
        // 40 missing by duration, 20 by age, capped at 12
        assert_relative_eq!(compute_standard_rate(132, 172, 62.0, &rules()), 0.425, epsilon = 1e-12);

        let mut steep = rules();
        steep.decote_cap_quarters = 40;
        assert_relative_eq!(compute_standard_rate(132, 172, 62.0, &steep), steep.min_rate);
    }

    #[test]
    fn test_rate_bounds_over_grid() {
        let r = rules();
        for quarters in (0..=200).step_by(7) {
            for age_quarters in 200..=280 {
                let age = age_quarters as f64 / 4.0;
                let rate = compute_standard_rate(quarters, 172, age, &r);
                assert!(rate >= r.min_rate - 1e-12 && rate <= r.full_rate + 1e-12);
            }
        }
    }

    #[test]
    fn test_short_circuits() {
        let disabled = IndividualInput::new(62.0).with_disability();
        assert_eq!(full_rate_short_circuit(&disabled), Some(RateBasis::Disability));

        let ipp = IndividualInput::new(60.0)
            .with_incapacity(WorkplaceIncapacity::new(40.0, IncapacityType::OccupationalDisease));
        assert_eq!(full_rate_short_circuit(&ipp), Some(RateBasis::Incapacity));

        let minor = IndividualInput::new(60.0)
            .with_incapacity(WorkplaceIncapacity::new(15.0, IncapacityType::OccupationalDisease));
        assert_eq!(full_rate_short_circuit(&minor), None);
    }

    #[test]
    fn test_handicap_eligibility() {
        let base = rules();
        let schedule = resolve_handicap_schedule(&base, NaiveDate::from_ymd_opt(1965, 6, 1));

        let track = HandicapTrack { active: true, contributed_quarters: 102 };
        assert!(is_handicap_eligible(&track, 56.0, &schedule));
        assert!(!is_handicap_eligible(&track, 55.5, &schedule));
        assert!(!is_handicap_eligible(&track, 54.0, &schedule));

        let inactive = HandicapTrack { active: false, contributed_quarters: 150 };
        assert!(!is_handicap_eligible(&inactive, 60.0, &schedule));
    }

    #[test]
    fn test_handicap_never_eligible_without_entries() {
        let base = rules();
        let schedule = resolve_handicap_schedule(&base, NaiveDate::from_ymd_opt(1960, 3, 3));
        let track = HandicapTrack { active: true, contributed_quarters: 500 };
        for age in [55.0, 58.0, 61.0, 66.0] {
            assert!(!is_handicap_eligible(&track, age, &schedule));
        }
    }

    #[test]
    fn test_determine_rate_precedence() {
        let base = rules();
        let schedule = resolve_handicap_schedule(&base, None);

        let input = IndividualInput::new(62.0).with_quarters(100).with_disability();
        let decision = determine_rate(&input, 100, 172, &schedule, &base);
        assert_eq!(decision.basis, RateBasis::Disability);
        assert_relative_eq!(decision.rate, 0.50);

        let input = IndividualInput::new(68.0);
        assert_eq!(determine_rate(&input, 0, 172, &schedule, &base).basis, RateBasis::AutomaticFullRate);

        let input = IndividualInput::new(64.0).with_quarters(168);
        let decision = determine_rate(&input, 168, 172, &schedule, &base);
        assert_eq!(decision.basis, RateBasis::Standard);
        assert_relative_eq!(decision.rate, 0.475, epsilon = 1e-12);
    }
}
