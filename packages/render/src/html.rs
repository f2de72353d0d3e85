//! Self-contained Leaflet HTML page for a [`MapView`].
//!
//! The template is embedded at compile time; the view model is baked in
//! as a JSON literal and everything else (tiles, layer control, legend,
//! geocoder) is wired up client-side. The output needs nothing from the
//! server beyond tile and plugin CDNs.

use crate::MapView;

/// Page template with a `__CRASH_MAP_VIEW__` placeholder for the view JSON.
const MAP_TEMPLATE: &str = include_str!("../templates/map.html");

/// Errors that can occur while rendering the map page.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// View model failed to encode as JSON.
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders the map page for the given view model.
///
/// # Errors
///
/// Returns [`RenderError`] if the view model cannot be encoded as JSON.
pub fn render_html(view: &MapView) -> Result<String, RenderError> {
    let json = serde_json::to_string(view)?;
    // `</script>` inside a JSON string would terminate the inline script
    // block early.
    let json = json.replace("</", "<\\/");
    Ok(MAP_TEMPLATE.replacen("__CRASH_MAP_VIEW__", &json, 1))
}
