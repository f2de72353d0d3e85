#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Map view model and standalone HTML renderer.
//!
//! Turns the three severity buckets into the view model consumed by the
//! Leaflet frontend: one marker layer per bucket with a fixed visual style,
//! a legend, and a map center. [`html::render_html`] bakes the view model
//! into a self-contained HTML page.

pub mod html;

use crash_map_crash_models::{Severity, TimeWindow};
use crash_map_pipeline::SeverityBuckets;
use serde::Serialize;

/// Default map center (downtown Chicago), used when no record matches the
/// selected window and the mean of coordinates is undefined.
pub const DEFAULT_CENTER: MapCenter = MapCenter {
    latitude: 41.8781,
    longitude: -87.6298,
};

/// Initial map zoom level.
pub const DEFAULT_ZOOM: u8 = 10;

/// Fixed visual style for one severity layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    /// Marker stroke/fill color.
    pub marker_color: &'static str,
    /// Hex color used for the legend dot.
    pub legend_color: &'static str,
    /// Marker radius in pixels.
    pub radius: u8,
    /// Marker fill opacity.
    pub fill_opacity: f64,
}

impl LayerStyle {
    /// Returns the fixed style for the given severity.
    #[must_use]
    pub const fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Minor => Self {
                marker_color: "blue",
                legend_color: "#1f77b4",
                radius: 3,
                fill_opacity: 0.6,
            },
            Severity::Moderate => Self {
                marker_color: "green",
                legend_color: "#2ca02c",
                radius: 4,
                fill_opacity: 0.6,
            },
            Severity::Severe => Self {
                marker_color: "red",
                legend_color: "#d62728",
                radius: 5,
                fill_opacity: 0.6,
            },
        }
    }
}

/// Display name of the map layer for a severity bucket.
#[must_use]
pub const fn layer_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Minor => "Minor Crashes",
        Severity::Moderate => "Moderate Crashes",
        Severity::Severe => "Severe Crashes",
    }
}

/// Map center point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapCenter {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// One marker position within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPoint {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// One severity bucket prepared for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayer {
    /// Layer display name (e.g. "Severe Crashes").
    pub name: &'static str,
    /// Severity bucket this layer renders.
    pub severity: Severity,
    /// Marker stroke/fill color.
    pub marker_color: &'static str,
    /// Marker radius in pixels.
    pub radius: u8,
    /// Marker fill opacity.
    pub fill_opacity: f64,
    /// Marker positions.
    pub points: Vec<MarkerPoint>,
}

/// One legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Severity label (e.g. "Minor").
    pub label: &'static str,
    /// Hex color of the legend dot.
    pub color: &'static str,
}

/// The complete view model handed to the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// The time window this view was built for.
    pub window: TimeWindow,
    /// Human-readable window label.
    pub window_label: &'static str,
    /// Map center (mean of filtered coordinates, or the default).
    pub center: MapCenter,
    /// Initial zoom level.
    pub zoom: u8,
    /// Number of records across all three layers.
    pub filtered_count: usize,
    /// One marker layer per severity bucket, in severity order.
    pub layers: Vec<MapLayer>,
    /// Legend entries, in severity order.
    pub legend: Vec<LegendEntry>,
}

/// Builds the map view model for one filter pass.
///
/// The center is the mean of all filtered coordinates. An empty bucket set
/// is not an error: the view falls back to [`DEFAULT_CENTER`] and renders
/// a map with no markers.
#[must_use]
pub fn build_view(buckets: &SeverityBuckets, window: TimeWindow) -> MapView {
    let center = mean_center(buckets).unwrap_or_else(|| {
        log::warn!("no records match window {window}; using default map center");
        DEFAULT_CENTER
    });

    let layers = Severity::all()
        .iter()
        .map(|severity| {
            let style = LayerStyle::for_severity(*severity);
            MapLayer {
                name: layer_name(*severity),
                severity: *severity,
                marker_color: style.marker_color,
                radius: style.radius,
                fill_opacity: style.fill_opacity,
                points: buckets
                    .bucket(*severity)
                    .iter()
                    .map(|r| MarkerPoint {
                        latitude: r.latitude,
                        longitude: r.longitude,
                    })
                    .collect(),
            }
        })
        .collect();

    let legend = Severity::all()
        .iter()
        .map(|severity| LegendEntry {
            label: severity.label(),
            color: LayerStyle::for_severity(*severity).legend_color,
        })
        .collect();

    MapView {
        window,
        window_label: window.label(),
        center,
        zoom: DEFAULT_ZOOM,
        filtered_count: buckets.len(),
        layers,
        legend,
    }
}

/// Mean of all coordinates across the buckets, or `None` when empty.
fn mean_center(buckets: &SeverityBuckets) -> Option<MapCenter> {
    let count = buckets.len();
    if count == 0 {
        return None;
    }

    let (lat_sum, lng_sum) = buckets
        .iter()
        .fold((0.0, 0.0), |(lat, lng), r| (lat + r.latitude, lng + r.longitude));

    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    Some(MapCenter {
        latitude: lat_sum / n,
        longitude: lng_sum / n,
    })
}
