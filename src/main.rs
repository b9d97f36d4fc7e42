//! Survey Lens - Developer Survey Analysis & Chart Viewer
//!
//! Loads a developer survey export, aggregates its multi-select answers
//! and shows the resulting charts in a window or writes them as PNGs.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Missing file, missing column, malformed CSV or rendering failure

mod charts;
mod cli;
mod config;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::{Context, Result};
use charts::{FigureRenderer, StaticChartRenderer};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use data::SurveyLoader;
use gui::ViewerRenderer;
use report::SurveyReport;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = Args::parse_args();

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    info!("Survey Lens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Analysis failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: write a default survey-lens.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Load, aggregate and present the survey.
fn run(args: &Args) -> Result<()> {
    let mut config = Config::resolve(args.config.as_deref())?;
    config.merge_with_args(args);

    let table = SurveyLoader::new(config.input.null_marker.clone())
        .with_categorical(config.categorical_columns())
        .with_multi_select(config.multi_select_columns())
        .load_csv(&config.input.path)?;

    let report = SurveyReport::build(&table, &config)?;
    let figures = report.figures();
    info!(
        "{} respondents after cleaning, {} figures",
        report.respondents,
        figures.len()
    );

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    }

    if let Some(dir) = &args.export {
        let mut exporter =
            StaticChartRenderer::new(dir.clone(), config.output.dpi).open_after(args.open);
        exporter.render(&figures)?;
        println!(
            "✅ Wrote {} charts to {}",
            exporter.written().len(),
            dir.display()
        );
    }

    if args.wants_viewer() {
        let mut viewer = ViewerRenderer::new("Survey Lens", report.summary());
        viewer.render(&figures)?;
    }

    Ok(())
}
