/// Geographic point in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }
}

/// Visible map rectangle, corner form.
///
/// Invariant: `north_east.lat >= south_west.lat`. The host map produces
/// bounds in this form; no further validation is applied here.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub north_east: GeoPoint,
    pub south_west: GeoPoint,
}

impl GeoBounds {
    pub fn new(north_east: GeoPoint, south_west: GeoPoint) -> Self {
        GeoBounds {
            north_east,
            south_west,
        }
    }

    /// Point-in-rectangle test, inclusive of edges.
    ///
    /// Longitude is compared directly; bounds spanning the antimeridian are
    /// the host map's problem.
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoBounds, GeoPoint};

    #[test]
    fn contains_is_inclusive_of_corners() {
        let b = GeoBounds::new(GeoPoint::new(10.0, 20.0), GeoPoint::new(0.0, 5.0));
        assert!(b.contains(GeoPoint::new(10.0, 20.0)));
        assert!(b.contains(GeoPoint::new(0.0, 5.0)));
        assert!(b.contains(GeoPoint::new(5.0, 12.5)));
    }

    #[test]
    fn contains_rejects_points_outside() {
        let b = GeoBounds::new(GeoPoint::new(10.0, 20.0), GeoPoint::new(0.0, 5.0));
        assert!(!b.contains(GeoPoint::new(10.1, 12.5)));
        assert!(!b.contains(GeoPoint::new(5.0, 4.9)));
        assert!(!b.contains(GeoPoint::new(-0.1, 12.5)));
    }
}
