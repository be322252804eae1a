/// Stroke and fill color shared by every density polygon, RGBA in [0, 1].
pub const DENSITY_COLOR: [f32; 4] = [0.0, 0.2, 0.6, 1.0];

/// Symbology for one density polygon.
///
/// Color is fixed; only the fill opacity varies, proportional to the
/// bucket's share of the densest bucket in the same response.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PolygonStyle {
    pub stroke_color: [f32; 4],
    pub fill_color: [f32; 4],
    pub fill_opacity: f32,
}

impl PolygonStyle {
    pub fn density(fill_opacity: f32) -> Self {
        Self {
            stroke_color: DENSITY_COLOR,
            fill_color: DENSITY_COLOR,
            fill_opacity: fill_opacity.clamp(0.0, 1.0),
        }
    }
}
