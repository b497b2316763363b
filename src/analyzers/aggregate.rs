use crate::analyzers::coherency::{classify, fold};
use crate::analyzers::types::{
    Aggregation, AggregationSummary, AvailabilityAccumulator, AxisLabels, Coherency,
    NetworkYearKey,
};
use crate::analyzers::utility::clamp_percentage;
use crate::matrix::Matrix;
use crate::parser::Record;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Single-pass accumulator of availability and coherency per network-year.
#[derive(Debug, Default)]
pub struct Aggregator {
    availability: HashMap<NetworkYearKey, AvailabilityAccumulator>,
    coherency: HashMap<NetworkYearKey, Coherency>,
    networks: BTreeSet<String>,
    years: BTreeSet<i32>,
    records: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into both accumulators.
    pub fn push(&mut self, record: &Record) {
        let key = NetworkYearKey::new(record.year, record.network.as_str());

        let level = classify(record.availability_pct, record.coverage_metric);
        self.coherency
            .entry(key.clone())
            .and_modify(|c| *c = fold(Some(*c), level))
            .or_insert_with(|| fold(None, level));

        self.availability
            .entry(key)
            .or_default()
            .add(record.availability_pct);

        if !self.networks.contains(&record.network) {
            self.networks.insert(record.network.clone());
        }
        self.years.insert(record.year);
        self.records += 1;
    }

    pub fn extend<'a, I: IntoIterator<Item = &'a Record>>(&mut self, records: I) {
        for record in records {
            self.push(record);
        }
    }

    /// Lays the accumulators out as dense matrices.
    ///
    /// Rows follow the sorted network codes and columns the sorted years.
    /// Mean availability is capped at 100; capped cells are counted in the
    /// summary.
    pub fn finish(self) -> Aggregation {
        let labels = AxisLabels {
            networks: self.networks.into_iter().collect(),
            years: self.years.into_iter().collect(),
        };
        let row_of: HashMap<&str, usize> = labels
            .networks
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();
        let col_of: HashMap<i32, usize> = labels
            .years
            .iter()
            .enumerate()
            .map(|(i, y)| (*y, i))
            .collect();

        let rows = labels.networks.len();
        let cols = labels.years.len();
        let mut availability = Matrix::new_undefined(rows, cols);
        let mut coherency = Matrix::new_undefined(rows, cols);
        let mut summary = AggregationSummary {
            records: self.records,
            networks: rows,
            years: cols,
            ..Default::default()
        };

        for (key, acc) in &self.availability {
            let Some(mean) = acc.mean() else { continue };
            let (value, clamped) = clamp_percentage(mean);
            if clamped {
                warn!(key = %key, mean, records = acc.count, "Mean availability above 100% or NaN, capped");
                summary.clamped_cells += 1;
            }
            availability.set(row_of[key.network.as_str()], col_of[&key.year], value);
            summary.cells += 1;
        }

        for (key, level) in &self.coherency {
            coherency.set(
                row_of[key.network.as_str()],
                col_of[&key.year],
                f64::from(level.level()),
            );
            summary.coherency_counts[level.level() as usize] += 1;
        }

        debug!(
            records = summary.records,
            networks = summary.networks,
            years = summary.years,
            cells = summary.cells,
            clamped = summary.clamped_cells,
            "Aggregation finished"
        );

        Aggregation {
            labels,
            availability,
            coherency,
            summary,
        }
    }
}

/// Aggregates a slice of records in one pass.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn aggregate(records: &[Record]) -> Aggregation {
    let mut aggregator = Aggregator::new();
    aggregator.extend(records);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    fn record(year: i32, network: &str, availability: f64, coverage: f64) -> Record {
        Record {
            year,
            network: network.to_string(),
            station: "STA".to_string(),
            channel: "BHZ".to_string(),
            availability_pct: availability,
            minutes: 525600.0,
            coverage_metric: coverage,
            inventory_flag: "GOOD".to_string(),
        }
    }

    #[test]
    fn test_average_of_key() {
        let agg = aggregate(&[record(2020, "NET", 60.0, 60.0), record(2020, "NET", 80.0, 80.0)]);
        assert_eq!(agg.availability.get(0, 0), Some(70.0));
        assert_eq!(agg.coherency.get(0, 0), Some(2.0));
        assert_eq!(agg.summary.cells, 1);
    }

    #[test]
    fn test_mean_is_capped() {
        let agg = aggregate(&[record(2020, "NET", 150.0, 150.0), record(2020, "NET", 90.0, 90.0)]);
        assert_eq!(agg.availability.get(0, 0), Some(100.0));
        assert_eq!(agg.summary.clamped_cells, 1);
    }

    #[test]
    fn test_coherency_is_min_reduced() {
        let records = [
            record(2020, "NET", 50.0, 50.0),
            record(2020, "NET", 50.0, 50.0),
            record(2020, "NET", 40.0, 50.0),
            record(2020, "NET", 50.0, 50.0),
            record(2020, "NET", 60.0, 50.0),
        ];
        let agg = aggregate(&records);
        assert_eq!(agg.coherency.get(0, 0), Some(0.0));

        // a later agreeing record does not lift the level
        let mut aggregator = Aggregator::new();
        aggregator.extend(&records);
        aggregator.push(&record(2020, "NET", 70.0, 70.0));
        assert_eq!(aggregator.finish().coherency.get(0, 0), Some(0.0));
    }

    #[test]
    fn test_axis_ordering() {
        let agg = aggregate(&[
            record(2021, "ZZ", 10.0, 10.0),
            record(2019, "AA", 20.0, 20.0),
            record(2020, "ZZ", 30.0, 30.0),
        ]);
        assert_eq!(agg.labels.networks, vec!["AA", "ZZ"]);
        assert_eq!(agg.labels.years, vec![2019, 2020, 2021]);
        assert_eq!(agg.availability.get(1, 2), Some(10.0));
        assert_eq!(agg.availability.get(0, 0), Some(20.0));
    }

    #[test]
    fn test_unobserved_cells_stay_undefined() {
        let agg = aggregate(&[record(2019, "AA", 20.0, 20.0), record(2020, "BB", 30.0, 10.0)]);
        assert_eq!(agg.availability.get(0, 1), None);
        assert_eq!(agg.availability.get(1, 0), None);
        assert_eq!(agg.coherency.get(0, 1), None);
        assert_eq!(agg.coherency.get(1, 1), Some(0.0));
        assert_eq!(agg.summary.coherency_counts, [1, 0, 1]);
    }

    #[test]
    fn test_two_line_scenario() {
        let records = [
            parse_line("2020 XX AA BHZ 50.0 100.0 50.0 GOOD", 1).unwrap(),
            parse_line("2020 XX BB BHZ 100.0 100.0 50.0 GOOD", 2).unwrap(),
        ];
        let agg = aggregate(&records);
        assert_eq!(agg.labels.networks, vec!["XX"]);
        assert_eq!(agg.labels.years, vec![2020]);
        assert_eq!(agg.availability.get(0, 0), Some(75.0));
        assert_eq!(agg.coherency.get(0, 0), Some(0.0));
    }

    #[test]
    fn test_nan_availability_is_capped_not_undefined() {
        let records = [parse_line("2020 XX AA BHZ NaN 100.0 50.0 GOOD", 1).unwrap()];
        let agg = aggregate(&records);
        assert_eq!(agg.availability.get(0, 0), Some(100.0));
        assert_eq!(agg.coherency.get(0, 0), Some(0.0));
        assert_eq!(agg.summary.cells, 1);
        assert_eq!(agg.summary.clamped_cells, 1);
        assert_eq!(agg.availability.defined_cells(), agg.summary.cells);
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(&[]);
        assert!(agg.labels.networks.is_empty());
        assert_eq!(agg.availability.rows(), 0);
        assert_eq!(agg.summary, AggregationSummary::default());
    }
}
