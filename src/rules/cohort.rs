//! Birth-cohort table: legal age and required quarters by date of birth
//!
//! The values are historical constants from the 2023 reform schedule. They have
//! no closed form, so they live in a static table ordered by cohort start.

use super::RuleParameters;
use chrono::{Datelike, NaiveDate};

/// One row of the birth-cohort table, applying from `from_year`-`from_month`-01
/// until the next row starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortRow {
    pub from_year: i32,
    pub from_month: u32,
    pub legal_age_years: u32,
    pub legal_age_months: u32,
    pub required_quarters: u32,
}

impl CohortRow {
    const fn new(
        from_year: i32,
        from_month: u32,
        legal_age_years: u32,
        legal_age_months: u32,
        required_quarters: u32,
    ) -> Self {
        Self {
            from_year,
            from_month,
            legal_age_years,
            legal_age_months,
            required_quarters,
        }
    }

    /// Legal age in decimal years
    pub fn legal_age(&self) -> f64 {
        years_plus_months(self.legal_age_years, self.legal_age_months)
    }

    fn starts_on_or_before(&self, date: NaiveDate) -> bool {
        (date.year(), date.month()) >= (self.from_year, self.from_month)
    }
}

/// Cohort table, ordered by start. The last row covers every later birth.
pub static BIRTH_COHORTS: &[CohortRow] = &[
    CohortRow::new(1960, 1, 62, 0, 167),
    CohortRow::new(1961, 1, 62, 0, 168),
    CohortRow::new(1961, 9, 62, 3, 169),
    CohortRow::new(1962, 1, 62, 6, 169),
    CohortRow::new(1963, 1, 62, 9, 170),
    CohortRow::new(1964, 1, 63, 0, 171),
    CohortRow::new(1965, 1, 63, 3, 172),
    CohortRow::new(1966, 1, 63, 6, 172),
    CohortRow::new(1967, 1, 63, 9, 172),
    CohortRow::new(1968, 1, 64, 0, 172),
];

/// "62 years 3 months" -> 62.25
pub(crate) fn years_plus_months(years: u32, months: u32) -> f64 {
    years as f64 + months as f64 / 12.0
}

/// Find the cohort row covering a birth date (None before the first cohort)
pub(crate) fn cohort_for(birth_date: NaiveDate) -> Option<&'static CohortRow> {
    BIRTH_COHORTS
        .iter()
        .rev()
        .find(|row| row.starts_on_or_before(birth_date))
}

/// Parse an ISO birth date (`YYYY-MM-DD`, optionally followed by a time part)
///
/// Blank or unparsable input yields None so callers fall back to baseline rules.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            log::warn!("Ignoring unparsable birth date {:?}: {}", raw, err);
            None
        }
    }
}

/// Apply the birth-cohort legal age and required quarters to `base`
///
/// Absent dates and births before 1960 keep `base` unchanged.
pub fn resolve_by_birth_year(base: &RuleParameters, birth_date: Option<NaiveDate>) -> RuleParameters {
    let Some(date) = birth_date else {
        return base.clone();
    };
    let Some(row) = cohort_for(date) else {
        log::debug!("Birth date {} predates the cohort table, keeping base rules", date);
        return base.clone();
    };

    RuleParameters {
        legal_age: row.legal_age(),
        required_quarters: row.required_quarters,
        ..base.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_cohort_table_is_ordered() {
        for pair in BIRTH_COHORTS.windows(2) {
            assert!((pair[0].from_year, pair[0].from_month) < (pair[1].from_year, pair[1].from_month));
        }
    }

    #[test]
    fn test_known_cohorts() {
        let base = RuleParameters::regulation_2025();

        let r1960 = resolve_by_birth_year(&base, date(1960, 6, 15));
        assert_relative_eq!(r1960.legal_age, 62.0);
        assert_eq!(r1960.required_quarters, 167);

        let r1962 = resolve_by_birth_year(&base, date(1962, 3, 1));
        assert_relative_eq!(r1962.legal_age, 62.5);
        assert_eq!(r1962.required_quarters, 169);

        let r1967 = resolve_by_birth_year(&base, date(1967, 12, 31));
        assert_relative_eq!(r1967.legal_age, 63.75);
        assert_eq!(r1967.required_quarters, 172);

        let r1990 = resolve_by_birth_year(&base, date(1990, 1, 1));
        assert_relative_eq!(r1990.legal_age, 64.0);
        assert_eq!(r1990.required_quarters, 172);
    }

    #[test]
    fn test_1961_september_cutoff() {
        let base = RuleParameters::regulation_2025();

        let before = resolve_by_birth_year(&base, date(1961, 8, 31));
        assert_relative_eq!(before.legal_age, 62.0);
        assert_eq!(before.required_quarters, 168);

        let after = resolve_by_birth_year(&base, date(1961, 9, 1));
        assert_relative_eq!(after.legal_age, 62.25);
        assert_eq!(after.required_quarters, 169);
    }

    #[test]
    fn test_year_boundaries() {
        let base = RuleParameters::regulation_2025();

        let end_1961 = resolve_by_birth_year(&base, date(1961, 12, 31));
        assert_relative_eq!(end_1961.legal_age, 62.25);
        assert_eq!(end_1961.required_quarters, 169);

        let start_1962 = resolve_by_birth_year(&base, date(1962, 1, 1));
        assert_relative_eq!(start_1962.legal_age, 62.5);

        let start_1968 = resolve_by_birth_year(&base, date(1968, 1, 1));
        assert_relative_eq!(start_1968.legal_age, 64.0);
        assert_eq!(start_1968.required_quarters, 172);
    }

    #[test]
    fn test_outside_table_keeps_base() {
        let base = RuleParameters::regulation_2025();
        assert_eq!(resolve_by_birth_year(&base, date(1959, 12, 31)), base);
        assert_eq!(resolve_by_birth_year(&base, None), base);
    }

    #[test]
    fn test_only_age_and_quarters_change() {
        let base = RuleParameters::regulation_2025();
        let resolved = resolve_by_birth_year(&base, date(1963, 5, 5));
        assert_eq!(resolved.full_rate, base.full_rate);
        assert_eq!(resolved.csg_rate, base.csg_rate);
        assert_eq!(resolved.decote_cap_quarters, base.decote_cap_quarters);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let base = RuleParameters::regulation_2025();
        for birth in [date(1960, 2, 2), date(1961, 10, 1), date(1966, 7, 7), date(1975, 1, 1)] {
            let once = resolve_by_birth_year(&base, birth);
            let twice = resolve_by_birth_year(&once, birth);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(parse_birth_date("1965-04-12"), date(1965, 4, 12));
        assert_eq!(parse_birth_date(" 1965-04-12T00:00:00Z "), date(1965, 4, 12));
        assert_eq!(parse_birth_date(""), None);
        assert_eq!(parse_birth_date("not a date"), None);
        assert_eq!(parse_birth_date("1965-13-40"), None);
    }
}
