use std::ops::Range;

use crate::error::{PlotError, Result};

/// Splits `networks` rows into `panels` contiguous, non-empty blocks.
///
/// Block `i` starts at `floor(i * networks / panels)`, so sizes differ by at
/// most one and the last block always ends at `networks`.
///
/// # Errors
///
/// Returns [`PlotError::InvalidArgument`] when there are no rows, no panels,
/// or more panels than rows.
pub fn partition(networks: usize, panels: usize) -> Result<Vec<Range<usize>>> {
    if networks == 0 {
        return Err(PlotError::InvalidArgument("no networks to plot".into()));
    }
    if panels == 0 {
        return Err(PlotError::InvalidArgument(
            "number of subplots must be at least 1".into(),
        ));
    }
    if panels > networks {
        return Err(PlotError::InvalidArgument(format!(
            "{panels} subplots requested for only {networks} networks"
        )));
    }

    let boundary = |i: usize| i * networks / panels;
    Ok((0..panels).map(|i| boundary(i)..boundary(i + 1)).collect())
}
