//! Data types used by the aggregation pipeline.

use serde::Serialize;
use std::fmt;

use crate::matrix::Matrix;

/// Composite map key for one network in one year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkYearKey {
    pub year: i32,
    pub network: String,
}

impl NetworkYearKey {
    pub fn new(year: i32, network: impl Into<String>) -> Self {
        Self {
            year,
            network: network.into(),
        }
    }
}

impl fmt::Display for NetworkYearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.year, self.network)
    }
}

/// Agreement between the raw availability and the catalog coverage metric.
///
/// Ordered from worst to best so that `min` picks the highest concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Coherency {
    /// Coverage metric missing, or availability above it
    Missing = 0,
    /// Availability below the coverage metric, likely gaps
    Partial = 1,
    /// Both signals agree
    Agree = 2,
}

impl Coherency {
    /// Numeric level plotted on the coherency heatmap.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Tick set covering every level.
    pub fn ticks() -> Vec<f64> {
        vec![0.0, 1.0, 2.0]
    }
}

/// Running sum and count of availability percentages for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AvailabilityAccumulator {
    pub sum: f64,
    pub count: usize,
}

impl AvailabilityAccumulator {
    pub fn add(&mut self, availability_pct: f64) {
        self.sum += availability_pct;
        self.count += 1;
    }

    /// Arithmetic mean of everything added so far; `None` before the first value.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Row and column order of the dense matrices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AxisLabels {
    /// Network codes, lexicographically sorted
    pub networks: Vec<String>,
    /// Years, ascending
    pub years: Vec<i32>,
}

/// Diagnostics describing one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationSummary {
    pub records: usize,
    pub networks: usize,
    pub years: usize,
    /// Cells with at least one contributing record
    pub cells: usize,
    /// Cells whose mean availability exceeded 100% and was capped
    pub clamped_cells: usize,
    /// Number of cells at each coherency level, worst first
    pub coherency_counts: [usize; 3],
}

/// Result of aggregating a record stream.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub labels: AxisLabels,
    pub availability: Matrix,
    pub coherency: Matrix,
    pub summary: AggregationSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coherency_ordering() {
        assert!(Coherency::Missing < Coherency::Partial);
        assert!(Coherency::Partial < Coherency::Agree);
        assert_eq!(Coherency::Agree.min(Coherency::Missing), Coherency::Missing);
        assert_eq!(Coherency::Partial.level(), 1);
    }

    #[test]
    fn test_accumulator_mean() {
        let mut acc = AvailabilityAccumulator::default();
        assert_eq!(acc.mean(), None);
        acc.add(60.0);
        acc.add(80.0);
        assert_eq!(acc.count, 2);
        assert_eq!(acc.mean(), Some(70.0));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(NetworkYearKey::new(2020, "GE").to_string(), "2020.GE");
    }
}
