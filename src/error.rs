//! Error types for circuit search and cost-table construction.

use thiserror::Error;

/// Detailed reasons a solve request was rejected before any search work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A circuit needs a departure and a return between two distinct cities.
    #[error("at least 2 cities are required, got {count}")]
    TooFewCities { count: usize },
    /// The visited set is a 64-bit mask.
    #[error("at most {max} cities are supported, got {count}")]
    TooManyCities { count: usize, max: usize },
    #[error("stay durations must match number of cities: expected {expected}, got {actual}")]
    StayDurationsMismatch { expected: usize, actual: usize },
    #[error("cost table covers {actual} cities, expected {expected}")]
    CityCountMismatch { expected: usize, actual: usize },
    #[error("horizon of {horizon} days exceeds the {available} days in the cost table")]
    HorizonExceedsTable { horizon: usize, available: usize },
    #[error("no cost for day {day} from city {from} to city {to}")]
    CostOutOfRange { day: usize, from: usize, to: usize },
    #[error("{expected} city names required, got {actual}")]
    NameCountMismatch { expected: usize, actual: usize },
}

/// Failure of a circuit search.
///
/// An infeasible schedule is not an error: it is reported through
/// [`CircuitResult::is_feasible`](crate::solver::CircuitResult::is_feasible).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    /// The configured time limit elapsed before `layer` could be expanded.
    #[error("time limit exceeded before layer {layer}")]
    TimeLimitExceeded { layer: usize },
}

/// Failure to build a [`DayCostTable`](crate::cost_table::DayCostTable).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostTableError {
    #[error("cost table has no days")]
    Empty,
    #[error("day {day} has {rows} rows, expected {expected}")]
    DayShape {
        day: usize,
        rows: usize,
        expected: usize,
    },
    #[error("day {day} row {row} has {len} entries, expected {expected}")]
    Ragged {
        day: usize,
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("invalid cost {value} on day {day} from {from} to {to}")]
    InvalidCost {
        day: usize,
        from: usize,
        to: usize,
        value: f64,
    },
    #[error("day factor {value} at index {day} must be finite and non-negative")]
    InvalidFactor { day: usize, value: f64 },
}
