//! Output formatting and persistence for aggregation results and figures.
//!
//! Supports pretty-printing and JSON logging of the aggregation summary, and
//! writing rendered figures to disk.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::types::AggregationSummary;
use crate::error::PlotError;
use crate::render::Figure;

/// Logs the summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &AggregationSummary) {
    debug!("{:#?}", summary);
}

/// Logs the summary as pretty-printed JSON.
pub fn print_json(summary: &AggregationSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Writes `figure` as `<dir>/<stem>.svg`, creating `dir` if needed.
///
/// Returns the path of the written file.
pub fn write_figure(figure: &Figure, dir: &Path, stem: &str) -> crate::error::Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| PlotError::from_io(dir, e))?;
    let path = dir.join(format!("{stem}.svg"));
    figure.save(&path)?;
    let (width, height) = figure.size();
    info!(
        path = %path.display(),
        width,
        height,
        panels = figure.panels().len(),
        "Figure written"
    );
    Ok(path)
}
