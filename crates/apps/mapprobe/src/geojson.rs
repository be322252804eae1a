use std::collections::BTreeMap;

use foundation::geo::GeoPoint;
use render::style::PolygonStyle;
use render::surface::{GeometryHandle, MapSurface, PopupContent};
use serde_json::{json, Value};

/// Headless [`MapSurface`] that collects geometries as GeoJSON features.
///
/// Popups are interaction-only, so open/close are no-ops here; everything
/// a popup would show is written onto the marker feature's properties.
#[derive(Debug, Default)]
pub struct GeoJsonSurface {
    next_handle: u64,
    features: BTreeMap<GeometryHandle, Value>,
}

impl GeoJsonSurface {
    pub fn into_feature_collection(self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.features.into_values().collect::<Vec<_>>(),
        })
    }

    fn allocate(&mut self) -> GeometryHandle {
        self.next_handle += 1;
        GeometryHandle(self.next_handle)
    }
}

impl MapSurface for GeoJsonSurface {
    fn add_polygon(&mut self, boundary: &[GeoPoint], style: PolygonStyle) -> GeometryHandle {
        // GeoJSON positions are [lng, lat] and rings close on the first vertex.
        let mut ring: Vec<[f64; 2]> = boundary.iter().map(|p| [p.lng, p.lat]).collect();
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }

        let handle = self.allocate();
        self.features.insert(
            handle,
            json!({
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [ring] },
                "properties": { "fill-opacity": style.fill_opacity },
            }),
        );
        handle
    }

    fn add_marker(&mut self, at: GeoPoint) -> GeometryHandle {
        let handle = self.allocate();
        self.features.insert(
            handle,
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [at.lng, at.lat] },
                "properties": {},
            }),
        );
        handle
    }

    fn remove(&mut self, handle: GeometryHandle) {
        self.features.remove(&handle);
    }

    fn open_popup(&mut self, _at: GeoPoint, _content: &PopupContent) {}

    fn close_popup(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::GeoJsonSurface;
    use foundation::geo::GeoPoint;
    use render::style::PolygonStyle;
    use render::surface::MapSurface;
    use serde_json::json;

    #[test]
    fn polygons_become_closed_lng_lat_rings() {
        let mut surface = GeoJsonSurface::default();
        let boundary = [
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(1.0, 11.0),
            GeoPoint::new(2.0, 10.5),
        ];
        surface.add_polygon(&boundary, PolygonStyle::density(0.5));

        let doc = surface.into_feature_collection();
        let ring = &doc["features"][0]["geometry"]["coordinates"][0];
        assert_eq!(ring[0], json!([10.0, 0.0]));
        assert_eq!(ring[3], ring[0], "ring must close on the first vertex");
        assert_eq!(doc["features"][0]["properties"]["fill-opacity"], 0.5);
    }

    #[test]
    fn removed_geometries_do_not_appear_in_the_output() {
        let mut surface = GeoJsonSurface::default();
        surface.add_marker(GeoPoint::new(1.0, 2.0));
        let gone = surface.add_marker(GeoPoint::new(3.0, 4.0));
        surface.remove(gone);

        let doc = surface.into_feature_collection();
        let features = doc["features"].as_array().expect("features");
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([2.0, 1.0]));
    }
}
