#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web dashboard server for the crash map application.
//!
//! Every request loads the dataset through a content-keyed [`LoadCache`],
//! so an unchanged file costs one digest check and an edited file is
//! picked up without restarting the server. The loaded set is capped to
//! the display sample bound, then the filter/classify/partition pass runs
//! per request; the cached set itself is never mutated.

mod handlers;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use crash_map_crash_models::CrashRecord;
use crash_map_loader::{CoercionPolicy, LoadError, cache::LoadCache};
use crash_map_pipeline::{MAX_RENDER_RECORDS, SAMPLE_SEED, sample_for_display};

/// Shared application state.
pub struct AppState {
    data_path: PathBuf,
    policy: CoercionPolicy,
    cache: Mutex<LoadCache>,
}

impl AppState {
    /// Creates state serving the dataset at `data_path` with an empty
    /// load cache.
    #[must_use]
    pub fn new(data_path: PathBuf, policy: CoercionPolicy) -> Self {
        Self {
            data_path,
            policy,
            cache: Mutex::new(LoadCache::new()),
        }
    }

    /// Returns the current record set, capped to the display bound.
    ///
    /// Loads through the cache: unchanged file contents reuse the parsed
    /// set, edited contents re-parse. Sampling is seeded, so identical
    /// contents yield an identical display set across requests.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the dataset is missing, unreadable, or
    /// rejected by the coercion policy.
    pub fn records(&self) -> Result<Vec<CrashRecord>, LoadError> {
        let loaded = self
            .cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .load(&self.data_path, self.policy)?;

        Ok(sample_for_display(&loaded, MAX_RENDER_RECORDS, SAMPLE_SEED))
    }
}

/// Starts the crash map dashboard server.
///
/// Performs one load up front so a missing or malformed dataset fails at
/// startup rather than on the first request. Bind address and port come
/// from the `BIND_ADDR` and `PORT` environment variables (defaults:
/// `127.0.0.1:8080`). This is a regular async function — the caller
/// provides the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or the HTTP server
/// fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server(data_path: &Path, policy: CoercionPolicy) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(data_path.to_path_buf(), policy));

    log::info!("Loading crash data from {}...", data_path.display());
    let records = state.records().map_err(|e| {
        log::error!("Failed to load crash data: {e}");
        std::io::Error::other(e)
    })?;
    log::info!("Serving {} crash records", records.len());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/windows", web::get().to(handlers::windows))
                    .route("/layers", web::get().to(handlers::layers)),
            )
            .route("/", web::get().to(handlers::map_page))
            .route("/map", web::get().to(handlers::map_page))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const CSV: &str = "LATITUDE,LONGITUDE,CRASH_HOUR,INJURIES_FATAL,\
                       INJURIES_INCAPACITATING,INJURIES_NON_INCAPACITATING\n\
                       41.8,-87.6,7,0,0,0\n\
                       41.9,-87.7,20,1,0,0\n";

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn state_serves_the_loaded_record_set() {
        let path = write_temp("crash_map_server_state.csv", CSV);
        let state = AppState::new(path, CoercionPolicy::default());

        let first = state.records().unwrap();
        let second = state.records().unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn edited_dataset_is_picked_up_across_requests() {
        let path = write_temp("crash_map_server_edit.csv", CSV);
        let state = AppState::new(path, CoercionPolicy::default());

        assert_eq!(state.records().unwrap().len(), 2);

        let extended = format!("{CSV}41.7,-87.5,13,0,0,2\n");
        write_temp("crash_map_server_edit.csv", &extended);

        assert_eq!(state.records().unwrap().len(), 3);
    }

    #[test]
    fn missing_dataset_surfaces_a_load_error() {
        let state = AppState::new(
            PathBuf::from("does/not/exist.csv"),
            CoercionPolicy::default(),
        );
        assert!(matches!(state.records(), Err(LoadError::Io(_))));
    }
}
