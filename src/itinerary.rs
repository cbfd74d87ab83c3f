//! Named, per-leg view of a solved circuit.

use serde::{Deserialize, Serialize};

use crate::error::{InputError, SolveError};
use crate::solver::CircuitResult;
use crate::traits::DayCostProvider;

/// One leg of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub from: String,
    pub to: String,
    /// Day offset of the departure.
    pub day: usize,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub legs: Vec<Leg>,
    pub total_cost: f64,
}

impl Itinerary {
    /// Attaches city names and leg costs to `result`.
    ///
    /// Returns `None` when the result is infeasible.
    pub fn build<P: DayCostProvider>(
        result: &CircuitResult,
        names: &[impl AsRef<str>],
        provider: &P,
    ) -> Result<Option<Self>, SolveError> {
        if names.len() != provider.city_count() {
            return Err(InputError::NameCountMismatch {
                expected: provider.city_count(),
                actual: names.len(),
            }
            .into());
        }
        if !result.is_feasible() {
            return Ok(None);
        }

        let legs = result
            .legs()
            .map(|(from, to, day)| -> Result<Leg, InputError> {
                let cost = provider
                    .cost(day, from, to)
                    .ok_or(InputError::CostOutOfRange { day, from, to })?;
                let name = |city: usize| {
                    names
                        .get(city)
                        .map(|name| name.as_ref().to_string())
                        .ok_or(InputError::NameCountMismatch {
                            expected: city + 1,
                            actual: names.len(),
                        })
                };
                Ok(Leg {
                    from: name(from)?,
                    to: name(to)?,
                    day,
                    cost,
                })
            })
            .collect::<Result<Vec<_>, InputError>>()?;

        Ok(Some(Self {
            legs,
            total_cost: result.total_cost,
        }))
    }

    /// City names in visiting order, closing with the start city.
    pub fn route(&self) -> Vec<&str> {
        let mut route: Vec<&str> = self.legs.iter().map(|leg| leg.from.as_str()).collect();
        if let Some(last) = self.legs.last() {
            route.push(last.to.as_str());
        }
        route
    }
}
