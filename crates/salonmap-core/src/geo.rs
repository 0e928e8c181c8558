//! Geographic coordinate type shared by the location, repository, and map
//! layers.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A WGS-84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate only when both components are present, finite,
    /// and inside the valid latitude/longitude ranges.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        let coordinate = Self::new(latitude?, longitude?);
        coordinate.is_valid().then_some(coordinate)
    }

    /// Returns `true` if the pair can be placed on a map.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    #[must_use]
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_requires_both_components() {
        assert!(Coordinate::from_parts(Some(60.17), None).is_none());
        assert!(Coordinate::from_parts(None, Some(24.94)).is_none());
        assert_eq!(
            Coordinate::from_parts(Some(60.17), Some(24.94)),
            Some(Coordinate::new(60.17, 24.94))
        );
    }

    #[test]
    fn from_parts_rejects_out_of_range_and_non_finite() {
        assert!(Coordinate::from_parts(Some(91.0), Some(0.0)).is_none());
        assert!(Coordinate::from_parts(Some(0.0), Some(-180.5)).is_none());
        assert!(Coordinate::from_parts(Some(f64::NAN), Some(0.0)).is_none());
        assert!(Coordinate::from_parts(Some(0.0), Some(f64::INFINITY)).is_none());
    }

    #[test]
    fn distance_between_helsinki_and_espoo_is_roughly_sixteen_km() {
        let helsinki = Coordinate::new(60.1699, 24.9384);
        let espoo = Coordinate::new(60.2055, 24.6559);
        let km = helsinki.distance_km(&espoo);
        assert!((15.0..18.0).contains(&km), "unexpected distance {km}");
    }

    #[test]
    fn distance_to_self_is_zero() {
        let c = Coordinate::new(60.1699, 24.9384);
        assert!(c.distance_km(&c).abs() < f64::EPSILON);
    }
}
