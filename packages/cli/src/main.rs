#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crash map toolchain.
//!
//! `serve` starts the dashboard server; `render` writes a standalone HTML
//! map for one time window, useful for sharing a snapshot without running
//! the server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crash_map_crash_models::TimeWindow;
use crash_map_loader::{CoercionPolicy, load_records};
use crash_map_pipeline::{MAX_RENDER_RECORDS, SAMPLE_SEED, sample_for_display};

#[derive(Parser)]
#[command(name = "crash_map", about = "Traffic crash severity map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard server
    Serve {
        /// Path to the crash CSV dataset
        #[arg(long, default_value = "data/chicago_crashes.csv")]
        data: PathBuf,
        /// Abort the load on the first unparseable field instead of
        /// dropping the row
        #[arg(long)]
        fail_fast: bool,
    },
    /// Render a standalone HTML map to a file
    Render {
        /// Path to the crash CSV dataset
        #[arg(long, default_value = "data/chicago_crashes.csv")]
        data: PathBuf,
        /// Time window to render (ALL, MORNING, AFTERNOON, NIGHT)
        #[arg(long, default_value = "ALL", value_parser = parse_window)]
        window: TimeWindow,
        /// Output HTML file
        #[arg(long, default_value = "crash_map.html")]
        output: PathBuf,
        /// Abort the load on the first unparseable field instead of
        /// dropping the row
        #[arg(long)]
        fail_fast: bool,
    },
}

/// Maps the `--fail-fast` flag onto the load policy.
const fn policy(fail_fast: bool) -> CoercionPolicy {
    if fail_fast {
        CoercionPolicy::FailFast
    } else {
        CoercionPolicy::DropRow
    }
}

/// Case-insensitive [`TimeWindow`] parser for clap.
fn parse_window(value: &str) -> Result<TimeWindow, String> {
    value
        .trim()
        .to_uppercase()
        .parse()
        .map_err(|_| format!("unknown time window: {value}"))
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { data, fail_fast } => {
            crash_map_server::run_server(&data, policy(fail_fast)).await?;
        }
        Commands::Render {
            data,
            window,
            output,
            fail_fast,
        } => render_to_file(&data, window, &output, policy(fail_fast))?,
    }

    Ok(())
}

/// Loads, samples, and renders one window to a standalone HTML file.
fn render_to_file(
    data: &std::path::Path,
    window: TimeWindow,
    output: &std::path::Path,
    policy: CoercionPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = load_records(data, policy)?;
    let records = sample_for_display(&loaded, MAX_RENDER_RECORDS, SAMPLE_SEED);

    let buckets = crash_map_pipeline::run(&records, window);
    let view = crash_map_render::build_view(&buckets, window);
    let page = crash_map_render::html::render_html(&view)?;

    std::fs::write(output, page)?;
    log::info!(
        "Wrote {} ({} records, window {window})",
        output.display(),
        view.filtered_count
    );

    Ok(())
}
