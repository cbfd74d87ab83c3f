//! Horizon feasibility check.

/// Whether an action starting on `current_day` that needs `days_needed`
/// whole days still leaves a day strictly inside a horizon of `horizon` days.
pub fn is_valid_schedule(current_day: usize, days_needed: usize, horizon: usize) -> bool {
    current_day
        .checked_add(days_needed)
        .is_some_and(|day| day < horizon)
}
