use foundation::geo::GeoPoint;
use h3o::{CellIndex, LatLng, Resolution};

#[derive(Debug, Clone, PartialEq)]
pub enum CellError {
    InvalidKey { key: String },
    InvalidResolution { resolution: u8 },
    InvalidCoordinate { lat: f64, lng: f64 },
}

impl std::fmt::Display for CellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellError::InvalidKey { key } => write!(f, "not a valid hex cell key: {key:?}"),
            CellError::InvalidResolution { resolution } => {
                write!(f, "hex grid resolution out of range: {resolution}")
            }
            CellError::InvalidCoordinate { lat, lng } => {
                write!(f, "coordinate out of range: lat={lat} lng={lng}")
            }
        }
    }
}

impl std::error::Error for CellError {}

/// Spatial cell key as reported by the search backend's `geohex_grid`
/// aggregation: an H3 index in its canonical hex-string form.
///
/// Parsing validates the key once; everything derived from a `CellKey`
/// (center, boundary) is then infallible and deterministic: the same key
/// string always resolves to the same cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CellKey(CellIndex);

/// Resolved geometry of one hex cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HexCell {
    pub key: CellKey,
    pub center: GeoPoint,
    /// Cell outline in vertex order; 6 vertices for hexagons, 5 for the
    /// twelve pentagon cells of the grid.
    pub boundary: Vec<GeoPoint>,
}

impl CellKey {
    pub fn parse(key: &str) -> Result<Self, CellError> {
        let index = key
            .parse::<CellIndex>()
            .map_err(|_| CellError::InvalidKey {
                key: key.to_string(),
            })?;
        Ok(CellKey(index))
    }

    /// Cell key containing `point` at the given grid resolution.
    pub fn for_point(point: GeoPoint, resolution: u8) -> Result<Self, CellError> {
        let resolution =
            Resolution::try_from(resolution).map_err(|_| CellError::InvalidResolution {
                resolution,
            })?;
        let coord = LatLng::new(point.lat, point.lng).map_err(|_| CellError::InvalidCoordinate {
            lat: point.lat,
            lng: point.lng,
        })?;
        Ok(CellKey(coord.to_cell(resolution)))
    }

    pub fn resolution(&self) -> u8 {
        u8::from(self.0.resolution())
    }

    /// Derive the cell's center and boundary polygon.
    pub fn resolve(&self) -> HexCell {
        let center = LatLng::from(self.0);
        let boundary = self
            .0
            .boundary()
            .iter()
            .map(|v| GeoPoint::new(v.lat(), v.lng()))
            .collect();
        HexCell {
            key: *self,
            center: GeoPoint::new(center.lat(), center.lng()),
            boundary,
        }
    }
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
