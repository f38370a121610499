//! Pension Estimator - French retirement pension estimates from career data
//!
//! This library provides:
//! - Birth-cohort rule resolution (legal age, required quarters)
//! - Handicap (RATH) schedules and eligibility
//! - Effective quarters from caregiving (AVA/AVPF) and hardship (C2P) credits
//! - Rate computation with décote, surcote and full-rate tracks (disability, IPP, RATH)
//! - Base, complementary, gross and net annual amounts
//! - Average salary (SAM) from the best 25 revalued years

pub mod error;
pub mod rules;
pub mod individual;
pub mod calculation;

// Re-export commonly used types
pub use error::EstimatorError;
pub use rules::{RuleParameters, SurcotePolicy, HandicapSchedule};
pub use individual::{IndividualInput, IncapacityType, WorkplaceIncapacity, YearlySalary};
pub use calculation::{PensionCalculator, PensionEstimate, PensionResult, EffectiveAdjustments, RateBasis};
