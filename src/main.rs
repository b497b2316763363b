//! CLI entry point for the availability plot tool.
//!
//! Reads the results written by the data availability test, aggregates them
//! per network and year, and renders an availability heatmap followed by a
//! coherency heatmap.

use anyhow::Result;
use availability_plot::analyzers::aggregate::aggregate;
use availability_plot::analyzers::types::Coherency;
use availability_plot::{
    output::{print_json, print_pretty, write_figure},
    parser::read_records_from_path,
    render::{HeatmapSpec, RenderConfig, partition, render_heatmap},
};
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "availability_plot")]
#[command(
    about = "Generate availability plots from the text file written by the data availability test",
    long_about = None
)]
struct Cli {
    /// File from which results should be read
    #[arg(short, long, default_value = "results.txt")]
    input: PathBuf,

    /// Number of subplots in which networks should be split
    #[arg(short, long, default_value_t = 3)]
    subplots: usize,

    /// Directory the figures are written to
    #[arg(short, long, default_value = "plots")]
    output_dir: PathBuf,

    /// Width in pixels of each subplot
    #[arg(long, default_value_t = RenderConfig::default().panel_width)]
    width: u32,

    /// Height in pixels of each figure
    #[arg(long, default_value_t = RenderConfig::default().height)]
    height: u32,

    /// Also log the aggregation summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/availability_plot.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("availability_plot.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

#[tracing::instrument(skip_all, fields(input = %cli.input.display(), subplots = cli.subplots))]
fn run(cli: &Cli) -> Result<()> {
    let records = read_records_from_path(&cli.input)?;
    let aggregation = aggregate(&records);
    let summary = &aggregation.summary;

    info!(
        records = summary.records,
        networks = summary.networks,
        years = summary.years,
        cells = summary.cells,
        "Input aggregated"
    );
    if summary.clamped_cells > 0 {
        warn!(
            clamped = summary.clamped_cells,
            "Some network-years averaged above 100% availability"
        );
    }
    print_pretty(summary);
    if cli.json {
        print_json(summary)?;
    }

    // Reject a bad panel count before drawing anything
    partition(aggregation.labels.networks.len(), cli.subplots)?;

    let config = RenderConfig {
        panel_width: cli.width,
        height: cli.height,
        ..RenderConfig::default()
    };

    let availability = render_heatmap(
        &aggregation.labels,
        &aggregation.availability,
        &HeatmapSpec::new("Data availability [%]", cli.subplots),
        &config,
    )?;
    write_figure(&availability, &cli.output_dir, "availability")?;

    let coherency = render_heatmap(
        &aggregation.labels,
        &aggregation.coherency,
        &HeatmapSpec::new("Coherency of data and catalog coverage", cli.subplots)
            .with_ticks(Coherency::ticks()),
        &config,
    )?;
    write_figure(&coherency, &cli.output_dir, "coherency")?;

    info!(output_dir = %cli.output_dir.display(), "Finished rendering");
    Ok(())
}
