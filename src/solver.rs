//! Exact circuit search over day-indexed costs with mandatory stays.
//!
//! The search is a layered dynamic program. Layer `k` holds every reachable
//! `(visited, city, day)` state with `k` non-start cities visited, keeping only
//! the cheapest record per state. The final layer is closed back to city 0.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, SolveError};
use crate::schedule::is_valid_schedule;
use crate::state::{Frontier, MAX_CITIES, SearchRecord, StateKey, VisitedSet};
use crate::traits::DayCostProvider;

/// The fixed start and end of every circuit.
pub const START_CITY: usize = 0;

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Frontier size from which a layer's transitions are generated in parallel.
    pub parallel_threshold: usize,
    /// Wall-clock budget, checked between layers.
    pub time_limit: Option<Duration>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: 512,
            time_limit: None,
        }
    }
}

/// Outcome of one solve.
///
/// A feasible result has `path.len() == cities + 1` (closing with city 0) and
/// `days.len() == cities`. An infeasible one has an infinite cost and empty
/// sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitResult {
    #[serde(with = "finite_or_null")]
    pub total_cost: f64,
    pub path: Vec<usize>,
    pub days: Vec<usize>,
}

impl CircuitResult {
    /// No schedule fits inside the horizon.
    pub fn infeasible() -> Self {
        Self {
            total_cost: f64::INFINITY,
            path: Vec::new(),
            days: Vec::new(),
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.total_cost.is_finite()
    }

    /// Each leg as `(from, to, departure_day)`.
    pub fn legs(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.path
            .windows(2)
            .zip(&self.days)
            .map(|(pair, &day)| (pair[0], pair[1], day))
    }

    /// Sums the looked-up cost of every leg, including the closing one.
    pub fn recompute_cost<P: DayCostProvider>(&self, provider: &P) -> Result<f64, SolveError> {
        self.legs()
            .map(|(from, to, day)| lookup(provider, from, to, day))
            .sum()
    }
}

/// Solves with [`SolveOptions::default`].
pub fn solve_circuit<P>(
    provider: &P,
    city_count: usize,
    stay_durations: &[usize],
    horizon: usize,
) -> Result<CircuitResult, SolveError>
where
    P: DayCostProvider + Sync,
{
    solve_circuit_with_options(provider, city_count, stay_durations, horizon, &SolveOptions::default())
}

/// Finds the cheapest circuit from city 0 through every city and back.
///
/// `stay_durations[c]` whole days must pass after arriving at `c` before the
/// next departure; `stay_durations[0]` is the dwell before the first departure.
/// Every departure day must stay strictly below `horizon`.
pub fn solve_circuit_with_options<P>(
    provider: &P,
    city_count: usize,
    stay_durations: &[usize],
    horizon: usize,
    options: &SolveOptions,
) -> Result<CircuitResult, SolveError>
where
    P: DayCostProvider + Sync,
{
    let span = tracing::info_span!("solve_circuit", cities = city_count, horizon);
    let _enter = span.enter();

    validate(provider, city_count, stay_durations, horizon)?;

    let search = Search {
        provider,
        stay_durations,
        horizon,
        city_count,
    };
    let started = Instant::now();

    let mut frontier = search.seed()?;
    let mut states_explored = frontier.len();

    for layer in 2..city_count {
        check_time_limit(started, options, layer)?;

        let mut next = Frontier::new();
        let mut pruned = 0;
        if frontier.len() >= options.parallel_threshold {
            let expansions = frontier
                .entries()
                .par_iter()
                .map(|(key, record)| search.expand(key, record))
                .collect::<Result<Vec<_>, _>>()?;

            // Single merge pass in frontier order, so ties resolve as in a sequential run.
            for expansion in expansions {
                pruned += expansion.pruned;
                for (key, record) in expansion.successors {
                    next.offer(key, record);
                }
            }
        } else {
            for (key, record) in frontier.entries() {
                let expansion = search.expand(key, record)?;
                pruned += expansion.pruned;
                for (key, record) in expansion.successors {
                    next.offer(key, record);
                }
            }
        }

        tracing::debug!(layer, frontier = next.len(), pruned, "expanded layer");
        states_explored += next.len();
        frontier = next;
    }

    check_time_limit(started, options, city_count)?;
    let result = search.close(&frontier)?;

    if result.is_feasible() {
        tracing::info!(cost = result.total_cost, states_explored, "circuit found");
    } else {
        tracing::info!(states_explored, "no circuit fits inside the horizon");
    }

    Ok(result)
}

fn validate<P: DayCostProvider>(
    provider: &P,
    city_count: usize,
    stay_durations: &[usize],
    horizon: usize,
) -> Result<(), InputError> {
    if city_count < 2 {
        return Err(InputError::TooFewCities { count: city_count });
    }
    if city_count > MAX_CITIES {
        return Err(InputError::TooManyCities {
            count: city_count,
            max: MAX_CITIES,
        });
    }
    if stay_durations.len() != city_count {
        return Err(InputError::StayDurationsMismatch {
            expected: city_count,
            actual: stay_durations.len(),
        });
    }
    if provider.city_count() != city_count {
        return Err(InputError::CityCountMismatch {
            expected: city_count,
            actual: provider.city_count(),
        });
    }
    if horizon > provider.horizon() {
        return Err(InputError::HorizonExceedsTable {
            horizon,
            available: provider.horizon(),
        });
    }
    Ok(())
}

fn check_time_limit(started: Instant, options: &SolveOptions, layer: usize) -> Result<(), SolveError> {
    match options.time_limit {
        Some(limit) if started.elapsed() >= limit => Err(SolveError::TimeLimitExceeded { layer }),
        _ => Ok(()),
    }
}

fn lookup<P: DayCostProvider>(provider: &P, from: usize, to: usize, day: usize) -> Result<f64, SolveError> {
    provider
        .cost(day, from, to)
        .ok_or(SolveError::InvalidInput(InputError::CostOutOfRange { day, from, to }))
}

/// Successor states of one frontier entry.
struct Expansion {
    successors: Vec<(StateKey, SearchRecord)>,
    pruned: usize,
}

/// Read-only inputs shared by every step of one solve.
struct Search<'a, P> {
    provider: &'a P,
    stay_durations: &'a [usize],
    horizon: usize,
    city_count: usize,
}

impl<P: DayCostProvider> Search<'_, P> {
    /// First leg out of the start city, always recorded as departing on day 0.
    ///
    /// The start city's dwell is checked against the horizon but does not
    /// shift the recorded day.
    fn seed(&self) -> Result<Frontier, SolveError> {
        let mut frontier = Frontier::new();
        if !is_valid_schedule(0, self.stay_durations[START_CITY], self.horizon) {
            return Ok(frontier);
        }

        for city in (0..self.city_count).filter(|&city| city != START_CITY) {
            let cost = lookup(self.provider, START_CITY, city, 0)?;
            frontier.offer(
                StateKey {
                    visited: VisitedSet::single(city),
                    city,
                    day: 0,
                },
                SearchRecord::first_leg(START_CITY, city, 0, cost),
            );
        }
        Ok(frontier)
    }

    fn expand(&self, key: &StateKey, record: &SearchRecord) -> Result<Expansion, SolveError> {
        let next_day = key.day.saturating_add(self.stay_durations[key.city]);
        let mut successors = Vec::new();
        let mut pruned = 0;

        for next_city in 0..self.city_count {
            if next_city == START_CITY || key.visited.contains(next_city) {
                continue;
            }
            if !is_valid_schedule(next_day, self.stay_durations[next_city], self.horizon) {
                pruned += 1;
                continue;
            }

            let travel_cost = lookup(self.provider, key.city, next_city, next_day)?;
            successors.push((
                StateKey {
                    visited: key.visited.with(next_city),
                    city: next_city,
                    day: next_day,
                },
                record.extended(next_city, next_day, travel_cost),
            ));
        }

        Ok(Expansion { successors, pruned })
    }

    /// Returns every complete state to the start city and keeps the cheapest.
    fn close(&self, frontier: &Frontier) -> Result<CircuitResult, SolveError> {
        let mut best: Option<(f64, &SearchRecord, usize)> = None;

        for (key, record) in frontier.entries() {
            if key.visited.len() != self.city_count - 1 {
                continue;
            }
            let final_day = key.day.saturating_add(self.stay_durations[key.city]);
            if !is_valid_schedule(final_day, 0, self.horizon) {
                continue;
            }

            let cost = record.cost + lookup(self.provider, key.city, START_CITY, final_day)?;
            let best_cost = best.map_or(f64::INFINITY, |(cost, _, _)| cost);
            if cost < best_cost {
                best = Some((cost, record, final_day));
            }
        }

        Ok(match best {
            Some((total_cost, record, final_day)) => {
                let closed = record.extended(START_CITY, final_day, 0.0);
                CircuitResult {
                    total_cost,
                    path: closed.path,
                    days: closed.days,
                }
            }
            None => CircuitResult::infeasible(),
        })
    }
}

/// Serializes a non-finite cost as `null` and reads `null` back as infinity.
mod finite_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
