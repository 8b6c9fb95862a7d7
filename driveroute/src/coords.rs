//! Geographic value types shared by the geocoding and routing clients.

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude, valid range -90 to 90.
    pub latitude: f64,
    /// Longitude, valid range -180 to 180.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair. No range check is performed.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A resolved address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Formatted address as returned by the geocoder.
    pub address: String,
    /// Location of the first candidate.
    pub coordinates: Coordinates,
}

/// A driving route, formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    /// Human-readable distance, e.g. `"12.3 km"`.
    pub distance: String,
    /// Human-readable duration, e.g. `"1時間1分"`.
    pub duration: String,
    /// Encoded polyline, passed through verbatim. Empty when absent.
    pub polyline: String,
    pub origin_coords: Coordinates,
    pub destination_coords: Coordinates,
}
