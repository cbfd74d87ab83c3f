//! Search state, per-state records and the layer frontier.

use std::collections::HashMap;

/// Largest city count whose non-start cities fit in the visited mask.
pub const MAX_CITIES: usize = 64;

/// Set of visited city indices as a bitmask.
///
/// Equality and hashing depend only on membership, never on insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VisitedSet(u64);

impl VisitedSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn single(city: usize) -> Self {
        Self::empty().with(city)
    }

    /// Copy of the set with `city` added.
    pub fn with(self, city: usize) -> Self {
        debug_assert!(city < MAX_CITIES);
        Self(self.0 | (1u64 << city))
    }

    pub fn contains(self, city: usize) -> bool {
        city < MAX_CITIES && self.0 & (1u64 << city) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u64 {
        self.0
    }
}

/// DP key: which cities are done, where the traveler is and on which day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub visited: VisitedSet,
    pub city: usize,
    pub day: usize,
}

/// Cheapest known way to reach a [`StateKey`].
///
/// `days[k]` is the day the leg `path[k] -> path[k + 1]` departed, so
/// `path.len() == days.len() + 1` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRecord {
    pub cost: f64,
    pub path: Vec<usize>,
    pub days: Vec<usize>,
}

impl SearchRecord {
    /// Record for the single leg `from -> to` departing on `day`.
    pub fn first_leg(from: usize, to: usize, day: usize, cost: f64) -> Self {
        Self {
            cost,
            path: vec![from, to],
            days: vec![day],
        }
    }

    /// New record continuing this one with a leg to `city` departing on `day`.
    pub fn extended(&self, city: usize, day: usize, travel_cost: f64) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(city);

        let mut days = Vec::with_capacity(self.days.len() + 1);
        days.extend_from_slice(&self.days);
        days.push(day);

        Self {
            cost: self.cost + travel_cost,
            path,
            days,
        }
    }
}

/// One DP layer: states in discovery order plus an index for dominance checks.
#[derive(Debug, Default)]
pub struct Frontier {
    index: HashMap<StateKey, usize>,
    entries: Vec<(StateKey, SearchRecord)>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `record` for `key` unless an equal or cheaper record is already held.
    ///
    /// Returns whether the frontier changed.
    pub fn offer(&mut self, key: StateKey, record: SearchRecord) -> bool {
        match self.index.get(&key) {
            Some(&slot) => {
                let held = &mut self.entries[slot].1;
                if record.cost < held.cost {
                    *held = record;
                    true
                } else {
                    false
                }
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, record));
                true
            }
        }
    }

    pub fn get(&self, key: &StateKey) -> Option<&SearchRecord> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(StateKey, SearchRecord)] {
        &self.entries
    }
}
