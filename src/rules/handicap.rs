//! RATH (retraite anticipée des travailleurs handicapés) schedules
//!
//! For each birth cohort: the minimum handicap-contributed quarters needed to
//! leave at a given minimum age, and the full-reference quarters used for the
//! prorata on this track.

use super::cohort::cohort_for;
use super::RuleParameters;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum age -> minimum handicap-contributed quarters, plus the cohort full reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandicapSchedule {
    /// Quarters used as the prorata reference on the handicap track
    pub full_reference: u32,

    /// Minimum contributed quarters keyed by minimum departure age
    pub minimum_quarters: BTreeMap<u32, u32>,
}

impl HandicapSchedule {
    /// Schedule with no entries: the track can never be reached
    pub fn ineligible(full_reference: u32) -> Self {
        Self {
            full_reference,
            minimum_quarters: BTreeMap::new(),
        }
    }

    /// Youngest age at which the track opens
    pub fn min_age(&self) -> Option<f64> {
        self.minimum_quarters.keys().next().map(|&age| age as f64)
    }

    /// Minimum contributed quarters for a departure at `age`
    pub fn minimum_quarters_at(&self, age: f64) -> Option<u32> {
        lookup_minimum_quarters(self, age)
    }

    /// Youngest scheduled age whose minimum is met by `contributed_quarters`
    pub fn earliest_age(&self, contributed_quarters: i32) -> Option<f64> {
        self.minimum_quarters
            .iter()
            .find(|(_, &minimum)| i64::from(contributed_quarters) >= i64::from(minimum))
            .map(|(&age, _)| age as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.minimum_quarters.is_empty()
    }
}

/// Static RATH row, applying from `from_year`-`from_month`-01 until the next row
#[derive(Debug, Clone, Copy)]
pub struct HandicapCohortRow {
    pub from_year: i32,
    pub from_month: u32,
    pub full_reference: u32,
    /// (minimum age, minimum contributed quarters)
    pub entries: &'static [(u32, u32)],
}

/// RATH table, ordered by cohort start. Cohorts born before September 1961
/// have no entries under the current schedule.
pub static HANDICAP_COHORTS: &[HandicapCohortRow] = &[
    HandicapCohortRow { from_year: 1960, from_month: 1, full_reference: 167, entries: &[] },
    HandicapCohortRow { from_year: 1961, from_month: 1, full_reference: 168, entries: &[] },
    HandicapCohortRow {
        from_year: 1961,
        from_month: 9,
        full_reference: 169,
        entries: &[(55, 109), (56, 99), (57, 89), (58, 79), (59, 69)],
    },
    HandicapCohortRow {
        from_year: 1962,
        from_month: 1,
        full_reference: 169,
        entries: &[(55, 109), (56, 99), (57, 89), (58, 79), (59, 69)],
    },
    HandicapCohortRow {
        from_year: 1963,
        from_month: 1,
        full_reference: 170,
        entries: &[(55, 110), (56, 100), (57, 90), (58, 80), (59, 70)],
    },
    HandicapCohortRow {
        from_year: 1964,
        from_month: 1,
        full_reference: 171,
        entries: &[(55, 111), (56, 101), (57, 91), (58, 81), (59, 71)],
    },
    HandicapCohortRow {
        from_year: 1965,
        from_month: 1,
        full_reference: 172,
        entries: &[(55, 112), (56, 102), (57, 92), (58, 82), (59, 72)],
    },
];

/// Resolve the RATH schedule for a birth date
///
/// Without a date the schedule is empty and uses the baseline required quarters.
/// Births before the table fall back to the birth-cohort required quarters (or
/// the baseline), also without entries.
pub fn resolve_handicap_schedule(base: &RuleParameters, birth_date: Option<NaiveDate>) -> HandicapSchedule {
    let Some(date) = birth_date else {
        return HandicapSchedule::ineligible(base.required_quarters);
    };

    let row = HANDICAP_COHORTS
        .iter()
        .rev()
        .find(|row| (date.year(), date.month()) >= (row.from_year, row.from_month));

    match row {
        Some(row) => HandicapSchedule {
            full_reference: row.full_reference,
            minimum_quarters: row.entries.iter().copied().collect(),
        },
        None => {
            let reference = cohort_for(date)
                .map(|cohort| cohort.required_quarters)
                .unwrap_or(base.required_quarters);
            HandicapSchedule::ineligible(reference)
        }
    }
}

/// Minimum contributed quarters for `age`
///
/// Exact key, else the greatest key below `age`, else (younger than every key)
/// the smallest key. None only when the schedule is empty.
pub fn lookup_minimum_quarters(schedule: &HandicapSchedule, age: f64) -> Option<u32> {
    let at_or_below = if age >= 0.0 {
        schedule
            .minimum_quarters
            .range(..=(age.floor() as u32))
            .next_back()
    } else {
        None
    };

    at_or_below
        .or_else(|| schedule.minimum_quarters.iter().next())
        .map(|(_, &quarters)| quarters)
}
