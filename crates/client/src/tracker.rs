use foundation::geo::GeoBounds;
use protocol::viewport::ViewportState;

/// Records host-map camera events without side effects.
///
/// `bounds_changed` and `zoom_changed` fire per animation frame while the
/// user pans; neither triggers a query. The one query trigger is the map's
/// render-settled signal, consumed by `MapSession::on_tiles_loaded`, which
/// snapshots whatever is recorded here, so a pan that also changes zoom
/// coalesces into a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportTracker {
    zoom: u8,
    bounds: Option<GeoBounds>,
    text_query: Option<String>,
}

impl ViewportTracker {
    pub fn new(initial_zoom: u8) -> Self {
        Self {
            zoom: initial_zoom,
            bounds: None,
            text_query: None,
        }
    }

    pub fn on_bounds_changed(&mut self, bounds: GeoBounds) {
        self.bounds = Some(bounds);
    }

    pub fn on_zoom_changed(&mut self, zoom: u8) {
        self.zoom = zoom;
    }

    /// Current search-box text; `None` or an empty string means no filter.
    pub fn set_text_query(&mut self, text: Option<String>) {
        self.text_query = text;
    }

    pub fn snapshot(&self) -> ViewportState {
        ViewportState {
            zoom: self.zoom,
            bounds: self.bounds,
            text_query: self.text_query.clone(),
        }
    }
}
