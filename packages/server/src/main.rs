#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Binary entry point for the crash map dashboard server.

use std::path::PathBuf;

use crash_map_loader::CoercionPolicy;

/// Default dataset path, matching the repository layout.
const DEFAULT_DATA_PATH: &str = "data/chicago_crashes.csv";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let data_path: PathBuf = std::env::var("CRASH_DATA_PATH")
        .unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string())
        .into();

    crash_map_server::run_server(&data_path, CoercionPolicy::default()).await
}
