//! Fare sheet ingestion.
//!
//! A fare sheet is a CSV base-fare matrix:
//!
//! ```text
//! origin,Kochi,Paris,Cologne
//! Kochi,0,25481,42484
//! Paris,28738,0,NA
//! Cologne,54545,11989,0
//! ```
//!
//! Empty and `NA` cells mean there is no connection. The sheet is reordered so
//! the requested start city has index 0, then expanded into a
//! [`DayCostTable`] with one multiplier per day.

use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::cost_table::DayCostTable;
use crate::error::CostTableError;

/// Multiplier applied on Saturdays and Sundays by default.
pub const DEFAULT_WEEKEND_SURCHARGE: f64 = 1.2;

#[derive(Debug, Error)]
pub enum FareSheetError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("fare sheet has no header row")]
    MissingHeader,
    #[error("city {0:?} appears more than once in the header")]
    DuplicateCity(String),
    #[error("start city {0:?} not found in fare sheet")]
    UnknownStartCity(String),
    #[error("row for {origin:?} has {actual} fares, expected {expected}")]
    RowLength {
        origin: String,
        expected: usize,
        actual: usize,
    },
    #[error("invalid fare {value:?} from {origin:?} to {destination:?}")]
    InvalidFare {
        origin: String,
        destination: String,
        value: String,
    },
    #[error(transparent)]
    Table(#[from] CostTableError),
}

/// Base fares between named cities, start city first.
#[derive(Debug, Clone, PartialEq)]
pub struct FareSheet {
    cities: Vec<String>,
    fares: Vec<Vec<f64>>,
}

impl FareSheet {
    pub fn from_path(path: impl AsRef<Path>, start_city: &str) -> Result<Self, FareSheetError> {
        let reader = reader_builder().from_path(path)?;
        Self::parse(reader, start_city)
    }

    pub fn from_reader<R: Read>(reader: R, start_city: &str) -> Result<Self, FareSheetError> {
        Self::parse(reader_builder().from_reader(reader), start_city)
    }

    fn parse<R: Read>(mut reader: csv::Reader<R>, start_city: &str) -> Result<Self, FareSheetError> {
        let header = reader.headers()?.clone();
        let cities: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        if cities.is_empty() {
            return Err(FareSheetError::MissingHeader);
        }
        if let Some((k, city)) = cities
            .iter()
            .enumerate()
            .find(|(k, city)| cities[..*k].contains(city))
        {
            tracing::debug!(column = k + 1, city = %city, "duplicate city in header");
            return Err(FareSheetError::DuplicateCity(city.clone()));
        }

        let n = cities.len();
        let mut fares = vec![vec![f64::INFINITY; n]; n];
        for (i, row) in fares.iter_mut().enumerate() {
            row[i] = 0.0;
        }

        for record in reader.records() {
            let record = record?;
            let Some(origin) = record.get(0) else {
                continue;
            };
            let Some(from) = cities.iter().position(|city| city == origin) else {
                tracing::warn!(origin, "skipping fares for city missing from header");
                continue;
            };
            if record.len() - 1 != n {
                return Err(FareSheetError::RowLength {
                    origin: origin.to_string(),
                    expected: n,
                    actual: record.len() - 1,
                });
            }

            for (to, cell) in record.iter().skip(1).enumerate() {
                if from == to {
                    continue;
                }
                if cell.is_empty() || cell.eq_ignore_ascii_case("NA") {
                    tracing::trace!(origin, destination = %cities[to], "no connection");
                    continue;
                }
                fares[from][to] = match cell.parse::<f64>() {
                    Ok(fare) if fare.is_finite() && fare >= 0.0 => fare,
                    _ => {
                        return Err(FareSheetError::InvalidFare {
                            origin: origin.to_string(),
                            destination: cities[to].clone(),
                            value: cell.to_string(),
                        });
                    }
                };
            }
        }

        let start = cities
            .iter()
            .position(|city| city == start_city)
            .ok_or_else(|| FareSheetError::UnknownStartCity(start_city.to_string()))?;

        // Rotate so the start city leads, moving matrix rows and columns with the names.
        let order: Vec<usize> = (0..n).map(|k| (start + k) % n).collect();
        let cities = order.iter().map(|&i| cities[i].clone()).collect();
        let fares = order
            .iter()
            .map(|&i| order.iter().map(|&j| fares[i][j]).collect())
            .collect();

        Ok(Self { cities, fares })
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn base_fares(&self) -> &[Vec<f64>] {
        &self.fares
    }

    /// Day table where day `d` costs the base fare times `factors[d]`.
    pub fn day_table(&self, factors: &[f64]) -> Result<DayCostTable, FareSheetError> {
        Ok(DayCostTable::from_base(&self.fares, factors)?)
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true).trim(csv::Trim::All);
    builder
}

/// Per-day multipliers applying `surcharge` on weekends.
///
/// `first_weekday` is the weekday of day 0, `0` for Monday through `6` for Sunday.
pub fn weekend_factors(first_weekday: usize, days: usize, surcharge: f64) -> Vec<f64> {
    (0..days)
        .map(|day| match (first_weekday + day) % 7 {
            5 | 6 => surcharge,
            _ => 1.0,
        })
        .collect()
}
