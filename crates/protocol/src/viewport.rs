use foundation::geo::GeoBounds;

/// Zoom level above which the map stops aggregating into hex buckets and
/// requests individual location records instead.
pub const LOCATION_LEVEL_ZOOM_THRESHOLD: u8 = 12;

/// Result cap for itemized requests.
pub const ITEMIZED_PAGE_SIZE: u32 = 200;

/// Snapshot of the host map's camera, taken when the map settles.
///
/// `bounds` is absent before the first render. `text_query` is whatever the
/// search box currently holds; empty strings are treated as no filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub zoom: u8,
    pub bounds: Option<GeoBounds>,
    pub text_query: Option<String>,
}

impl ViewportState {
    pub fn mode(&self) -> ViewMode {
        ViewMode::for_zoom(self.zoom)
    }
}

/// How results are requested and rendered for a given zoom level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Hex-bucket aggregation at the given grid precision.
    Aggregated { precision: u8 },
    /// Individual records, capped at [`ITEMIZED_PAGE_SIZE`].
    Itemized,
}

impl ViewMode {
    /// Map zoom to request mode and grid precision.
    ///
    /// The precision offset of 2 and the clamp to 1 below zoom 3 are policy
    /// constants inherited from the production map, not grid geometry: they
    /// tie the host map's zoom steps to cell sizes that keep bucket counts
    /// readable on screen.
    pub fn for_zoom(zoom: u8) -> Self {
        if zoom > LOCATION_LEVEL_ZOOM_THRESHOLD {
            return ViewMode::Itemized;
        }
        let precision = if zoom > 2 { zoom - 2 } else { 1 };
        ViewMode::Aggregated { precision }
    }
}
