use foundation::geo::GeoPoint;

use crate::style::PolygonStyle;

/// Handle to one geometry added to the host map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeometryHandle(pub u64);

/// Body of the shared popup opened when a marker is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub title: String,
    pub body: String,
}

/// Drawing primitives the host map library must provide.
///
/// The renderer owns geometry lifecycle (clear-then-redraw per cycle); the
/// surface only adds and removes concrete shapes and manages the single
/// shared popup. Handles are surface-assigned and opaque to the renderer.
pub trait MapSurface {
    fn add_polygon(&mut self, boundary: &[GeoPoint], style: PolygonStyle) -> GeometryHandle;
    fn add_marker(&mut self, at: GeoPoint) -> GeometryHandle;
    fn remove(&mut self, handle: GeometryHandle);
    fn open_popup(&mut self, at: GeoPoint, content: &PopupContent);
    fn close_popup(&mut self);
}
