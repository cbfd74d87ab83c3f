//! tour-planner core
//!
//! Exact minimum-cost circuits over day-indexed travel costs, where each city
//! requires a fixed stay before the next departure.

pub mod traits;
pub mod error;
pub mod schedule;
pub mod cost_table;
pub mod state;
pub mod solver;
pub mod itinerary;
pub mod fares;
