//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use super::error::AttendanceError;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Reject coordinates that cannot exist on the globe.
    ///
    /// NaN and infinities fail the range check as well.
    pub fn validate(&self) -> Result<(), AttendanceError> {
        check_range("latitude", self.latitude, 90.0)?;
        check_range("longitude", self.longitude, 180.0)
    }
}

fn check_range(field: &'static str, value: f64, bound: f64) -> Result<(), AttendanceError> {
    if (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(AttendanceError::InvalidInput {
            field,
            value,
            min: -bound,
            max: bound,
        })
    }
}

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Clamp guards asin against h drifting past 1.0 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Round a distance to metre resolution for display and comparison.
pub(crate) fn round_km(km: f64) -> f64 {
    (km * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero_distance() {
        let p = GeoPoint::new(12.9716, 77.5946);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_matches_arc_length() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let expected = EARTH_RADIUS_KM * 1.0_f64.to_radians();
        assert!((haversine_km(a, b) - expected).abs() < 1e-9);
    }

    #[test]
    fn known_city_pair_distance() {
        // Mumbai to Pune, roughly 120 km.
        let mumbai = GeoPoint::new(19.0760, 72.8777);
        let pune = GeoPoint::new(18.5204, 73.8567);
        let d = haversine_km(mumbai, pune);
        assert!((115.0..125.0).contains(&d), "got {d}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = haversine_km(a, b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn validate_rejects_out_of_range_latitude() {
        let err = GeoPoint::new(90.5, 0.0).validate().unwrap_err();
        assert!(matches!(
            err,
            AttendanceError::InvalidInput {
                field: "latitude",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_longitude_and_nan() {
        assert!(GeoPoint::new(0.0, -180.01).validate().is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn validate_accepts_extremes() {
        assert!(GeoPoint::new(-90.0, 180.0).validate().is_ok());
        assert!(GeoPoint::new(90.0, -180.0).validate().is_ok());
    }

    #[test]
    fn round_km_keeps_metre_resolution() {
        assert_eq!(round_km(0.500_000_000_1), 0.5);
        assert_eq!(round_km(0.123_456), 0.123);
    }
}
