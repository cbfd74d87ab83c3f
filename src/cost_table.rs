//! Day-indexed travel cost table.
//!
//! `cost[day][from][to]` is the cost of departing `from` for `to` on `day`.
//! Off-diagonal costs are non-negative; `f64::INFINITY` marks a missing
//! connection. Diagonal entries are never read by the search.

use serde::{Deserialize, Serialize};

use crate::error::{CostTableError, InputError, SolveError};
use crate::traits::DayCostProvider;

/// Validated, rectangular `days x cities x cities` cost grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Vec<f64>>>", into = "Vec<Vec<Vec<f64>>>")]
pub struct DayCostTable {
    days: Vec<Vec<Vec<f64>>>,
    cities: usize,
}

impl DayCostTable {
    /// Builds a table from one square matrix per day.
    pub fn new(days: Vec<Vec<Vec<f64>>>) -> Result<Self, CostTableError> {
        let first = days.first().ok_or(CostTableError::Empty)?;
        let cities = first.len();

        for (day, matrix) in days.iter().enumerate() {
            if matrix.len() != cities {
                return Err(CostTableError::DayShape {
                    day,
                    rows: matrix.len(),
                    expected: cities,
                });
            }
            for (from, row) in matrix.iter().enumerate() {
                if row.len() != cities {
                    return Err(CostTableError::Ragged {
                        day,
                        row: from,
                        len: row.len(),
                        expected: cities,
                    });
                }
                for (to, &value) in row.iter().enumerate() {
                    if from != to && (value.is_nan() || value < 0.0) {
                        return Err(CostTableError::InvalidCost {
                            day,
                            from,
                            to,
                            value,
                        });
                    }
                }
            }
        }

        Ok(Self { days, cities })
    }

    /// Expands one base matrix into a day table, scaling day `d` by `factors[d]`.
    pub fn from_base(base: &[Vec<f64>], factors: &[f64]) -> Result<Self, CostTableError> {
        if let Some((day, &value)) = factors
            .iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Err(CostTableError::InvalidFactor { day, value });
        }

        let days = factors
            .iter()
            .map(|factor| {
                base.iter()
                    .map(|row| row.iter().map(|cost| cost * factor).collect())
                    .collect()
            })
            .collect();

        Self::new(days)
    }

    /// Same matrix on every one of `days` days.
    pub fn uniform(base: &[Vec<f64>], days: usize) -> Result<Self, CostTableError> {
        Self::from_base(base, &vec![1.0; days])
    }

    pub fn days(&self) -> usize {
        self.days.len()
    }

    pub fn cities(&self) -> usize {
        self.cities
    }

    /// Checked lookup of the cost from `from` to `to` on `day`.
    pub fn get_cost(&self, from: usize, to: usize, day: usize) -> Result<f64, SolveError> {
        self.cost(day, from, to)
            .ok_or(SolveError::InvalidInput(InputError::CostOutOfRange { day, from, to }))
    }

    /// Keeps only the first `days` days.
    pub fn truncated(&self, days: usize) -> Result<Self, CostTableError> {
        Self::new(self.days.iter().take(days).cloned().collect())
    }
}

impl DayCostProvider for DayCostTable {
    fn horizon(&self) -> usize {
        self.days.len()
    }

    fn city_count(&self) -> usize {
        self.cities
    }

    fn cost(&self, day: usize, from: usize, to: usize) -> Option<f64> {
        self.days.get(day)?.get(from)?.get(to).copied()
    }
}

impl TryFrom<Vec<Vec<Vec<f64>>>> for DayCostTable {
    type Error = CostTableError;

    fn try_from(days: Vec<Vec<Vec<f64>>>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<DayCostTable> for Vec<Vec<Vec<f64>>> {
    fn from(table: DayCostTable) -> Self {
        table.days
    }
}
