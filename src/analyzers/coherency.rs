use crate::analyzers::types::Coherency;

/// Classifies one record by comparing its availability against the
/// catalog coverage metric.
///
/// | Comparison                  | Level     |
/// |-----------------------------|-----------|
/// | availability == coverage    | `Agree`   |
/// | availability < coverage     | `Partial` |
/// | availability > coverage     | `Missing` |
///
/// Comparisons involving NaN are treated as `Missing`.
pub fn classify(availability_pct: f64, coverage_metric: f64) -> Coherency {
    if availability_pct == coverage_metric {
        Coherency::Agree
    } else if availability_pct < coverage_metric {
        Coherency::Partial
    } else {
        Coherency::Missing
    }
}

/// Folds a classification into the running level for a key.
///
/// The level never increases: once a key reaches `Missing` it stays there.
pub fn fold(current: Option<Coherency>, next: Coherency) -> Coherency {
    current.unwrap_or(Coherency::Agree).min(next)
}
