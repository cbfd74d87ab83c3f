//! Core seam between the circuit search and its cost data.
//!
//! Kept minimal so callers can back the search with their own storage
//! instead of materializing a [`DayCostTable`](crate::cost_table::DayCostTable).

/// Provides directional travel costs indexed by day.
pub trait DayCostProvider {
    /// Number of days for which costs exist.
    fn horizon(&self) -> usize;

    /// Number of cities covered by every day.
    fn city_count(&self) -> usize;

    /// Cost of departing `from` for `to` on `day`.
    ///
    /// Returns `None` when any index is outside the provider's dimensions.
    fn cost(&self, day: usize, from: usize, to: usize) -> Option<f64>;
}
