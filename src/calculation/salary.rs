//! Average reference salary (SAM) from yearly earnings

use crate::individual::YearlySalary;

/// Number of best years retained for the SAM
pub const BEST_YEARS: usize = 25;

/// Average of the best `min(25, n)` revalued yearly salaries
///
/// The divisor is the number of years actually retained, so a 10-year
/// history is averaged over 10. An empty history yields 0.
pub fn aggregate(history: &[YearlySalary]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }

    let mut revalued: Vec<f64> = history.iter().map(YearlySalary::revalued_amount).collect();
    revalued.sort_by(|a, b| b.total_cmp(a));

    let retained = revalued.len().min(BEST_YEARS);
    let total: f64 = revalued[..retained].iter().sum();

    total / retained as f64
}
