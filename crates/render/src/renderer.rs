use std::collections::BTreeMap;

use foundation::geo::GeoPoint;
use grid::cell::CellKey;
use protocol::response::{Bucket, PointRecord, SearchResults};

use crate::style::PolygonStyle;
use crate::surface::{GeometryHandle, MapSurface, PopupContent};

/// What one render cycle put on the map.
///
/// `skipped_cells` counts buckets whose key did not parse as a hex cell;
/// those are dropped from the drawing, never a failed cycle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub polygons: usize,
    pub markers: usize,
    pub skipped_cells: usize,
}

/// Owns the set of geometries currently on the host map.
///
/// Lifecycle is clear-then-redraw: the previous cycle's geometries are
/// removed atomically with drawing the new response, inside [`render`].
/// Nothing is cleared when a request starts or fails, so the map never goes
/// blank while waiting and a failed cycle leaves the last good render
/// visible.
///
/// [`render`]: TileRenderer::render
#[derive(Debug, Default)]
pub struct TileRenderer {
    current: Vec<GeometryHandle>,
    marker_popups: BTreeMap<GeometryHandle, (GeoPoint, PopupContent)>,
    popup: Option<GeometryHandle>,
}

impl TileRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of geometries drawn by the last cycle.
    pub fn geometry_count(&self) -> usize {
        self.current.len()
    }

    /// Marker whose popup is currently open, if any.
    pub fn open_popup(&self) -> Option<GeometryHandle> {
        self.popup
    }

    /// Replace the previous cycle's geometries with a new response.
    pub fn render<S: MapSurface>(
        &mut self,
        surface: &mut S,
        results: &SearchResults,
    ) -> RenderSummary {
        self.clear(surface);
        match results {
            SearchResults::Aggregated(buckets) => self.draw_buckets(surface, buckets),
            SearchResults::Itemized(records) => self.draw_records(surface, records),
        }
    }

    /// Marker click: open the shared popup on that marker, closing any popup
    /// already open. Returns false for handles not drawn this cycle.
    pub fn on_marker_click<S: MapSurface>(
        &mut self,
        surface: &mut S,
        handle: GeometryHandle,
    ) -> bool {
        let Some((at, content)) = self.marker_popups.get(&handle) else {
            return false;
        };
        if self.popup.take().is_some() {
            surface.close_popup();
        }
        surface.open_popup(*at, content);
        self.popup = Some(handle);
        true
    }

    fn clear<S: MapSurface>(&mut self, surface: &mut S) {
        for handle in self.current.drain(..) {
            surface.remove(handle);
        }
        self.marker_popups.clear();
        if self.popup.take().is_some() {
            surface.close_popup();
        }
    }

    fn draw_buckets<S: MapSurface>(&mut self, surface: &mut S, buckets: &[Bucket]) -> RenderSummary {
        let mut summary = RenderSummary::default();

        // Normalization base, computed once per batch. An empty batch (or one
        // where every count is zero) draws nothing; there is no divide here
        // until a positive maximum exists.
        let max_count = buckets.iter().map(|b| b.count).max().filter(|c| *c > 0);
        let Some(max_count) = max_count else {
            return summary;
        };

        for bucket in buckets {
            let Ok(key) = CellKey::parse(&bucket.key) else {
                summary.skipped_cells += 1;
                continue;
            };
            let cell = key.resolve();
            let opacity = (bucket.count as f64 / max_count as f64) as f32;
            let handle = surface.add_polygon(&cell.boundary, PolygonStyle::density(opacity));
            self.current.push(handle);
            summary.polygons += 1;
        }

        summary
    }

    fn draw_records<S: MapSurface>(
        &mut self,
        surface: &mut S,
        records: &[PointRecord],
    ) -> RenderSummary {
        let mut summary = RenderSummary::default();

        for record in records {
            let handle = surface.add_marker(record.location);
            self.marker_popups.insert(
                handle,
                (
                    record.location,
                    PopupContent {
                        title: record.name.clone(),
                        body: record.address.clone(),
                    },
                ),
            );
            self.current.push(handle);
            summary.markers += 1;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use foundation::geo::GeoPoint;
    use grid::cell::CellKey;
    use protocol::response::{Bucket, PointRecord, SearchResults};

    use super::{RenderSummary, TileRenderer};
    use crate::style::PolygonStyle;
    use crate::surface::{GeometryHandle, MapSurface, PopupContent};

    /// In-memory surface tracking live shapes and the popup.
    #[derive(Debug, Default)]
    struct RecordingSurface {
        next_handle: u64,
        polygons: BTreeMap<GeometryHandle, PolygonStyle>,
        markers: BTreeMap<GeometryHandle, GeoPoint>,
        popup: Option<PopupContent>,
        popup_opens: usize,
    }

    impl RecordingSurface {
        fn live_count(&self) -> usize {
            self.polygons.len() + self.markers.len()
        }

        fn opacities(&self) -> Vec<f32> {
            let mut out: Vec<f32> = self.polygons.values().map(|s| s.fill_opacity).collect();
            out.sort_by(f32::total_cmp);
            out
        }
    }

    impl MapSurface for RecordingSurface {
        fn add_polygon(&mut self, _boundary: &[GeoPoint], style: PolygonStyle) -> GeometryHandle {
            self.next_handle += 1;
            let handle = GeometryHandle(self.next_handle);
            self.polygons.insert(handle, style);
            handle
        }

        fn add_marker(&mut self, at: GeoPoint) -> GeometryHandle {
            self.next_handle += 1;
            let handle = GeometryHandle(self.next_handle);
            self.markers.insert(handle, at);
            handle
        }

        fn remove(&mut self, handle: GeometryHandle) {
            self.polygons.remove(&handle);
            self.markers.remove(&handle);
        }

        fn open_popup(&mut self, _at: GeoPoint, content: &PopupContent) {
            self.popup = Some(content.clone());
            self.popup_opens += 1;
        }

        fn close_popup(&mut self) {
            self.popup = None;
        }
    }

    fn bucket_at(lat: f64, lng: f64, count: u64) -> Bucket {
        let key = CellKey::for_point(GeoPoint::new(lat, lng), 4).expect("cell key");
        Bucket {
            key: key.to_string(),
            count,
        }
    }

    fn record(id: &str, name: &str, address: &str) -> PointRecord {
        PointRecord {
            id: id.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            location: GeoPoint::new(23.8, 90.4),
        }
    }

    #[test]
    fn opacity_normalizes_against_the_batch_maximum() {
        let mut surface = RecordingSurface::default();
        let mut renderer = TileRenderer::new();

        let results = SearchResults::Aggregated(vec![
            bucket_at(10.0, 10.0, 2),
            bucket_at(20.0, 20.0, 4),
            bucket_at(30.0, 30.0, 10),
        ]);
        let summary = renderer.render(&mut surface, &results);

        assert_eq!(summary.polygons, 3);
        let opacities = surface.opacities();
        assert_eq!(opacities.len(), 3);
        for (got, want) in opacities.iter().zip([0.2f32, 0.4, 1.0]) {
            assert!((got - want).abs() < 1e-6, "expected {want}, got {got}");
        }
    }

    #[test]
    fn empty_bucket_batch_draws_nothing() {
        let mut surface = RecordingSurface::default();
        let mut renderer = TileRenderer::new();

        let summary = renderer.render(&mut surface, &SearchResults::Aggregated(vec![]));
        assert_eq!(summary, RenderSummary::default());
        assert_eq!(surface.live_count(), 0);
        assert_eq!(renderer.geometry_count(), 0);
    }

    #[test]
    fn all_zero_counts_draw_nothing() {
        let mut surface = RecordingSurface::default();
        let mut renderer = TileRenderer::new();

        let results = SearchResults::Aggregated(vec![bucket_at(10.0, 10.0, 0)]);
        let summary = renderer.render(&mut surface, &results);
        assert_eq!(summary.polygons, 0);
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn unparseable_cell_keys_are_skipped_and_counted() {
        let mut surface = RecordingSurface::default();
        let mut renderer = TileRenderer::new();

        let results = SearchResults::Aggregated(vec![
            bucket_at(10.0, 10.0, 5),
            Bucket {
                key: "bogus".to_string(),
                count: 9,
            },
        ]);
        let summary = renderer.render(&mut surface, &results);
        assert_eq!(summary.polygons, 1);
        assert_eq!(summary.skipped_cells, 1);
        assert_eq!(surface.live_count(), 1);
    }

    #[test]
    fn redraw_replaces_the_previous_geometry_set() {
        let mut surface = RecordingSurface::default();
        let mut renderer = TileRenderer::new();

        let results = SearchResults::Aggregated(vec![
            bucket_at(10.0, 10.0, 2),
            bucket_at(20.0, 20.0, 4),
        ]);
        renderer.render(&mut surface, &results);
        renderer.render(&mut surface, &results);

        // Same final set as rendering once: nothing stale accumulates.
        assert_eq!(surface.live_count(), 2);
        assert_eq!(renderer.geometry_count(), 2);
    }

    #[test]
    fn mode_switch_clears_the_old_mode_geometries() {
        let mut surface = RecordingSurface::default();
        let mut renderer = TileRenderer::new();

        renderer.render(
            &mut surface,
            &SearchResults::Aggregated(vec![bucket_at(10.0, 10.0, 2)]),
        );
        let summary = renderer.render(
            &mut surface,
            &SearchResults::Itemized(vec![record("f-1", "Acme", "12 Mill Road")]),
        );

        assert_eq!(summary.markers, 1);
        assert!(surface.polygons.is_empty());
        assert_eq!(surface.markers.len(), 1);
    }

    #[test]
    fn only_one_popup_is_open_at_a_time() {
        let mut surface = RecordingSurface::default();
        let mut renderer = TileRenderer::new();

        renderer.render(
            &mut surface,
            &SearchResults::Itemized(vec![
                record("f-1", "Acme", "12 Mill Road"),
                record("f-2", "Globex", "7 Harbor Street"),
            ]),
        );
        let handles: Vec<_> = surface.markers.keys().copied().collect();

        assert!(renderer.on_marker_click(&mut surface, handles[0]));
        assert!(renderer.on_marker_click(&mut surface, handles[1]));

        assert_eq!(surface.popup_opens, 2);
        let popup = surface.popup.as_ref().expect("popup open");
        assert_eq!(popup.title, "Globex");
        assert_eq!(renderer.open_popup(), Some(handles[1]));
    }

    #[test]
    fn clicks_on_unknown_handles_are_ignored() {
        let mut surface = RecordingSurface::default();
        let mut renderer = TileRenderer::new();

        assert!(!renderer.on_marker_click(&mut surface, GeometryHandle(99)));
        assert!(surface.popup.is_none());
    }

    #[test]
    fn a_new_cycle_closes_the_open_popup() {
        let mut surface = RecordingSurface::default();
        let mut renderer = TileRenderer::new();

        renderer.render(
            &mut surface,
            &SearchResults::Itemized(vec![record("f-1", "Acme", "12 Mill Road")]),
        );
        let handle = *surface.markers.keys().next().expect("marker");
        renderer.on_marker_click(&mut surface, handle);
        assert!(surface.popup.is_some());

        renderer.render(&mut surface, &SearchResults::Aggregated(vec![]));
        assert!(surface.popup.is_none());
        assert_eq!(renderer.open_popup(), None);
    }
}
