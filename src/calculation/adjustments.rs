//! Effective quarters and effective legal age from raw individual inputs
//!
//! Caregiving (AVA/AVPF) and hardship (C2P) credits add quarters. Incapacity,
//! long-career, disability and handicap situations lower the legal age through
//! an ordered pipeline of `min()` steps, each recorded for audit.

use crate::individual::IndividualInput;
use crate::rules::{HandicapSchedule, RuleParameters};
use serde::{Deserialize, Serialize};

/// Combined AVA + AVPF credit cap, in quarters
pub const CAREGIVING_CREDIT_CAP: u32 = 4;

/// Hardship points only convert from this age
pub const HARDSHIP_MIN_AGE: f64 = 55.0;

/// Points reserved for training before any conversion
pub const HARDSHIP_TRAINING_POINTS: f64 = 20.0;

/// Hardship points per credited quarter
pub const HARDSHIP_POINTS_PER_QUARTER: f64 = 10.0;

/// Legal age for a qualifying incapacity of 20% or more
pub const MAJOR_INCAPACITY_LEGAL_AGE: f64 = 60.0;

/// One step of the legal-age pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalAgeStep {
    /// IPP ≥ 20%
    MajorIncapacity,
    /// IPP 10-19% with all attestations
    MinorIncapacity,
    LongCareer,
    Disability,
    Handicap,
}

/// Steps in the order they are applied
pub const LEGAL_AGE_PIPELINE: [LegalAgeStep; 5] = [
    LegalAgeStep::MajorIncapacity,
    LegalAgeStep::MinorIncapacity,
    LegalAgeStep::LongCareer,
    LegalAgeStep::Disability,
    LegalAgeStep::Handicap,
];

impl LegalAgeStep {
    /// New legal age if this step applies to the input, None otherwise
    fn apply(
        &self,
        input: &IndividualInput,
        rules: &RuleParameters,
        schedule: &HandicapSchedule,
        current: f64,
    ) -> Option<f64> {
        match self {
            LegalAgeStep::MajorIncapacity => input
                .incapacity
                .qualifies_major()
                .then(|| current.min(MAJOR_INCAPACITY_LEGAL_AGE)),
            // Lowered from the cohort legal age, not from the running value
            LegalAgeStep::MinorIncapacity => input
                .incapacity
                .qualifies_minor()
                .then(|| current.min(rules.legal_age - rules.incapacity_age_offset)),
            LegalAgeStep::LongCareer => lower_to(input.long_career, rules.long_career_age, current),
            LegalAgeStep::Disability => lower_to(input.disability, rules.disability_age, current),
            // Youngest schedule age the contributed quarters reach, never below handicap_age
            LegalAgeStep::Handicap => {
                let floor = rules.handicap_age.filter(|_| input.handicap.active)?;
                schedule
                    .earliest_age(input.handicap.contributed_quarters)
                    .map(|age| current.min(age.max(floor)))
            }
        }
    }
}

fn lower_to(flag: bool, age: Option<f64>, current: f64) -> Option<f64> {
    if flag {
        age.map(|age| current.min(age))
    } else {
        None
    }
}

/// A pipeline step that fired and the legal age after it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegalAgeAdjustment {
    pub step: LegalAgeStep,
    pub legal_age: f64,
}

/// Derived, per-calculation figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveAdjustments {
    /// Base quarters plus credits, never negative
    pub effective_quarters: u32,

    /// Cohort legal age after the pipeline
    pub effective_legal_age: f64,

    /// AVA + AVPF quarters retained
    pub caregiving_credit: u32,

    /// Quarters converted from C2P points
    pub hardship_credit: u32,

    /// Steps that fired, in application order
    pub legal_age_steps: Vec<LegalAgeAdjustment>,
}

/// min(4, AVA + AVPF), each floored at zero
pub fn caregiving_credit(input: &IndividualInput) -> u32 {
    let total = input.ava_quarters.max(0) as u32 + input.avpf_quarters.max(0) as u32;
    total.min(CAREGIVING_CREDIT_CAP)
}

/// One quarter per 10 points beyond the first 20, from age 55
pub fn hardship_credit(input: &IndividualInput) -> u32 {
    if input.target_age < HARDSHIP_MIN_AGE {
        return 0;
    }
    let usable = (input.hardship_points - HARDSHIP_TRAINING_POINTS).floor().max(0.0);
    (usable / HARDSHIP_POINTS_PER_QUARTER).floor().max(0.0) as u32
}

/// Derive effective quarters and legal age for `input` under cohort `rules`
/// and the cohort's RATH `schedule`
pub fn derive_adjustments(
    input: &IndividualInput,
    rules: &RuleParameters,
    schedule: &HandicapSchedule,
) -> EffectiveAdjustments {
    let caregiving = caregiving_credit(input);
    let hardship = hardship_credit(input);

    let mut legal_age = rules.legal_age;
    let mut steps = Vec::new();
    for step in LEGAL_AGE_PIPELINE {
        if let Some(lowered) = step.apply(input, rules, schedule, legal_age) {
            legal_age = lowered;
            steps.push(LegalAgeAdjustment {
                step,
                legal_age,
            });
        }
    }

    let total = i64::from(input.base_quarters) + i64::from(caregiving) + i64::from(hardship);
    let effective_quarters = u32::try_from(total.max(0)).unwrap_or(u32::MAX);

    log::trace!(
        "Adjustments: quarters {} (+{} caregiving, +{} hardship), legal age {:.2} via {:?}",
        effective_quarters,
        caregiving,
        hardship,
        legal_age,
        steps
    );

    EffectiveAdjustments {
        effective_quarters,
        effective_legal_age: legal_age,
        caregiving_credit: caregiving,
        hardship_credit: hardship,
        legal_age_steps: steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::{IncapacityType, WorkplaceIncapacity};
    use crate::rules::{resolve_by_birth_year, resolve_handicap_schedule};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn rules() -> RuleParameters {
        RuleParameters::regulation_2025()
    }

    fn no_schedule() -> HandicapSchedule {
        HandicapSchedule::ineligible(172)
    }

    fn schedule_for(y: i32, m: u32, d: u32) -> HandicapSchedule {
        resolve_handicap_schedule(&rules(), NaiveDate::from_ymd_opt(y, m, d))
    }

    #[test]
    fn test_no_adjustments() {
        let input = IndividualInput::new(64.0).with_quarters(160);
        let adj = derive_adjustments(&input, &rules(), &no_schedule());
        assert_eq!(adj.effective_quarters, 160);
        assert_relative_eq!(adj.effective_legal_age, 64.0);
        assert!(adj.legal_age_steps.is_empty());
    }

    #[test]
    fn test_caregiving_cap() {
        let input = IndividualInput::new(64.0).with_quarters(160).with_caregiving(3, 5);
        let adj = derive_adjustments(&input, &rules(), &no_schedule());
        assert_eq!(adj.caregiving_credit, 4);
        assert_eq!(adj.effective_quarters, 164);

        // Negative credits are floored before summing
        let input = IndividualInput::new(64.0).with_caregiving(-6, 2);
        assert_eq!(caregiving_credit(&input), 2);
    }

    #[test]
    fn test_hardship_credit() {
        let input = IndividualInput::new(60.0).with_hardship_points(65.0);
        // floor(45 / 10)
        assert_eq!(hardship_credit(&input), 4);

        let input = IndividualInput::new(60.0).with_hardship_points(29.9);
        assert_eq!(hardship_credit(&input), 0);

        let input = IndividualInput::new(60.0).with_hardship_points(15.0);
        assert_eq!(hardship_credit(&input), 0);

        // Too young to convert
        let input = IndividualInput::new(54.75).with_hardship_points(100.0);
        assert_eq!(hardship_credit(&input), 0);

        // Conversion opens exactly at 55
        let input = IndividualInput::new(55.0).with_hardship_points(40.0);
        assert_eq!(hardship_credit(&input), 2);
    }

    #[test]
    fn test_huge_hardship_credit_saturates() {
        let input = IndividualInput::new(64.0).with_quarters(172).with_hardship_points(4.3e10);
        let adj = derive_adjustments(&input, &rules(), &no_schedule());
        assert_eq!(adj.hardship_credit, u32::MAX);
        assert_eq!(adj.effective_quarters, u32::MAX);
    }

    #[test]
    fn test_effective_quarters_never_negative() {
        let input = IndividualInput::new(64.0).with_quarters(-20).with_caregiving(2, 0);
        let adj = derive_adjustments(&input, &rules(), &no_schedule());
        assert_eq!(adj.effective_quarters, 0);
    }

    #[test]
    fn test_major_incapacity_lowers_to_60() {
        let input = IndividualInput::new(60.0)
            .with_incapacity(WorkplaceIncapacity::new(20.0, IncapacityType::OccupationalDisease));
        let adj = derive_adjustments(&input, &rules(), &no_schedule());
        assert_relative_eq!(adj.effective_legal_age, 60.0);
        assert_eq!(adj.legal_age_steps[0].step, LegalAgeStep::MajorIncapacity);
    }

    #[test]
    fn test_uncontrolled_work_accident_does_not_qualify() {
        let input = IndividualInput::new(60.0)
            .with_incapacity(WorkplaceIncapacity::new(30.0, IncapacityType::WorkAccident));
        let adj = derive_adjustments(&input, &rules(), &no_schedule());
        assert_relative_eq!(adj.effective_legal_age, 64.0);
    }

    #[test]
    fn test_minor_incapacity_lowers_by_offset() {
        let mut incapacity = WorkplaceIncapacity::new(12.0, IncapacityType::WorkAccident);
        incapacity.exposure_17_years = true;
        incapacity.medical_commission_opinion = true;
        incapacity.commission_approval = true;

        let cohort = RuleParameters { legal_age: 63.25, ..rules() };
        let input = IndividualInput::new(61.5).with_incapacity(incapacity);
        let adj = derive_adjustments(&input, &cohort, &no_schedule());
        assert_relative_eq!(adj.effective_legal_age, 61.25);
        assert_eq!(adj.legal_age_steps.len(), 1);
        assert_eq!(adj.legal_age_steps[0].step, LegalAgeStep::MinorIncapacity);
    }

    #[test]
    fn test_pipeline_order_and_precedence() {
        let input = IndividualInput::new(58.0)
            .with_long_career()
            .with_disability()
            .with_handicap(80);
        // 1970 cohort: 72 contributed quarters open the track at 59
        let adj = derive_adjustments(&input, &rules(), &schedule_for(1970, 1, 1));

        let steps: Vec<_> = adj.legal_age_steps.iter().map(|s| s.step).collect();
        assert_eq!(
            steps,
            vec![LegalAgeStep::LongCareer, LegalAgeStep::Disability, LegalAgeStep::Handicap]
        );
        assert_relative_eq!(adj.legal_age_steps[0].legal_age, 60.0);
        // Disability age is above the running value, so it is kept at 60
        assert_relative_eq!(adj.legal_age_steps[1].legal_age, 60.0);
        assert_relative_eq!(adj.effective_legal_age, 59.0);
    }

    #[test]
    fn test_handicap_age_follows_schedule() {
        let schedule = schedule_for(1966, 5, 5);
        let cohort = resolve_by_birth_year(&rules(), NaiveDate::from_ymd_opt(1966, 5, 5));

        let input = IndividualInput::new(56.0).with_handicap(112);
        let adj = derive_adjustments(&input, &cohort, &schedule);
        assert_relative_eq!(adj.effective_legal_age, 55.0);
        assert_eq!(adj.legal_age_steps[0].step, LegalAgeStep::Handicap);

        let input = IndividualInput::new(56.0).with_handicap(105);
        let adj = derive_adjustments(&input, &cohort, &schedule);
        assert_relative_eq!(adj.effective_legal_age, 56.0);

        // A higher configured floor wins over the schedule age
        let floored = RuleParameters { handicap_age: Some(57.0), ..cohort.clone() };
        let adj = derive_adjustments(&input, &floored, &schedule);
        assert_relative_eq!(adj.effective_legal_age, 57.0);
    }

    #[test]
    fn test_ineligible_handicap_track_keeps_cohort_age() {
        // 1960 cohort has no RATH entries
        let cohort = resolve_by_birth_year(&rules(), NaiveDate::from_ymd_opt(1960, 6, 6));
        let input = IndividualInput::new(58.0).with_handicap(0);
        let adj = derive_adjustments(&input, &cohort, &schedule_for(1960, 6, 6));
        assert_relative_eq!(adj.effective_legal_age, 62.0);
        assert!(adj.legal_age_steps.is_empty());

        // Too few contributed quarters for any scheduled age
        let cohort = resolve_by_birth_year(&rules(), NaiveDate::from_ymd_opt(1970, 1, 1));
        let input = IndividualInput::new(58.0).with_handicap(40);
        let adj = derive_adjustments(&input, &cohort, &schedule_for(1970, 1, 1));
        assert_relative_eq!(adj.effective_legal_age, 64.0);
        assert!(adj.legal_age_steps.is_empty());
    }

    #[test]
    fn test_flag_without_configured_age_is_ignored() {
        let mut no_long_career = rules();
        no_long_career.long_career_age = None;
        let input = IndividualInput::new(62.0).with_long_career();
        let adj = derive_adjustments(&input, &no_long_career, &no_schedule());
        assert_relative_eq!(adj.effective_legal_age, 64.0);
        assert!(adj.legal_age_steps.is_empty());
    }
}
