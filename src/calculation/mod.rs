//! Pension calculation: adjustments, rate engine, salary aggregation and the calculator
//!
//! Control flow for one estimate:
//! 1. Birth-cohort rules are resolved from the baseline regulation
//! 2. Caregiving and hardship credits give the effective quarters; the legal-age
//!    pipeline gives the effective legal age
//! 3. The rate engine picks a full-rate track or the décote computation
//! 4. The calculator composes base, surcote, handicap majoration, complementary,
//!    children bonus and net amounts

mod adjustments;
mod engine;
mod rate;
mod result;
pub mod salary;

pub use adjustments::{
    caregiving_credit, derive_adjustments, hardship_credit, EffectiveAdjustments,
    LegalAgeAdjustment, LegalAgeStep, LEGAL_AGE_PIPELINE,
};
pub use engine::{calculate_pension, handicap_majoration, PensionCalculator};
pub use rate::{
    compute_standard_rate, determine_rate, full_rate_short_circuit, is_handicap_eligible,
    RateBasis, RateDecision,
};
pub use result::{PensionEstimate, PensionResult};
