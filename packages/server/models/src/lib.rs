#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crash map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types so the API contract can evolve independently.

use crash_map_crash_models::TimeWindow;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// One selectable time window as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWindow {
    /// Window identifier, usable as the `window` query parameter.
    pub id: TimeWindow,
    /// Human-readable label for the selector.
    pub label: String,
}

impl From<TimeWindow> for ApiWindow {
    fn from(window: TimeWindow) -> Self {
        Self {
            id: window,
            label: window.label().to_owned(),
        }
    }
}

/// Query parameters for the layers and map endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayersQueryParams {
    /// Selected time window (e.g. `MORNING`). Defaults to `ALL`.
    pub window: Option<String>,
}

/// JSON error body returned for client errors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Description of what went wrong.
    pub error: String,
}
