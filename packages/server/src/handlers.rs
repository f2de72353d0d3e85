//! HTTP handler functions for the crash map API.

use actix_web::{HttpResponse, web};
use crash_map_crash_models::{CrashRecord, TimeWindow};
use crash_map_render::html::render_html;
use crash_map_server_models::{ApiError, ApiHealth, ApiWindow, LayersQueryParams};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/windows`
///
/// Returns the four selectable time windows for the dashboard selector.
pub async fn windows() -> HttpResponse {
    let windows: Vec<ApiWindow> = TimeWindow::all()
        .iter()
        .map(|w| ApiWindow::from(*w))
        .collect();

    HttpResponse::Ok().json(windows)
}

/// `GET /api/layers?window=MORNING`
///
/// Re-runs filter → classify → partition over the loaded set and returns
/// the map view model as JSON.
pub async fn layers(
    state: web::Data<AppState>,
    params: web::Query<LayersQueryParams>,
) -> HttpResponse {
    let window = match parse_window(params.window.as_deref()) {
        Ok(window) => window,
        Err(response) => return response,
    };
    let records = match load_records(&state) {
        Ok(records) => records,
        Err(response) => return response,
    };

    let buckets = crash_map_pipeline::run(&records, window);
    let view = crash_map_render::build_view(&buckets, window);

    HttpResponse::Ok().json(view)
}

/// `GET /` and `GET /map?window=...`
///
/// Renders the interactive Leaflet map page for the selected window.
pub async fn map_page(
    state: web::Data<AppState>,
    params: web::Query<LayersQueryParams>,
) -> HttpResponse {
    let window = match parse_window(params.window.as_deref()) {
        Ok(window) => window,
        Err(response) => return response,
    };
    let records = match load_records(&state) {
        Ok(records) => records,
        Err(response) => return response,
    };

    let buckets = crash_map_pipeline::run(&records, window);
    let view = crash_map_render::build_view(&buckets, window);

    match render_html(&view) {
        Ok(page) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page),
        Err(e) => {
            log::error!("Failed to render map page: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: "Failed to render map page".to_owned(),
            })
        }
    }
}

/// Loads the current display set through the cached state.
///
/// A dataset that was readable at startup can still disappear or go bad
/// underneath a running server; that surfaces as a `500` here rather
/// than a stale response.
fn load_records(state: &web::Data<AppState>) -> Result<Vec<CrashRecord>, HttpResponse> {
    state.records().map_err(|e| {
        log::error!("Failed to load crash data: {e}");
        HttpResponse::InternalServerError().json(ApiError {
            error: "Failed to load crash data".to_owned(),
        })
    })
}

/// Parses the `window` query parameter, defaulting to [`TimeWindow::All`].
///
/// An unrecognized value yields a `400` with a JSON error body, so a typo
/// in the selector never produces a silently unfiltered map.
fn parse_window(raw: Option<&str>) -> Result<TimeWindow, HttpResponse> {
    match raw.map(str::trim) {
        None | Some("") => Ok(TimeWindow::All),
        Some(value) => value.to_uppercase().parse().map_err(|_| {
            HttpResponse::BadRequest().json(ApiError {
                error: format!("unknown time window: {value}"),
            })
        }),
    }
}
