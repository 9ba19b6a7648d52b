//! Geolocation points and great-circle distance verification.
//!
//! A photo check-in is accepted when the claimed device position lies within
//! [`CHECK_RADIUS_METERS`] of the photo's stored position.

use serde::{Deserialize, Serialize};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum distance in meters between a claimed position and a photo's
/// stored position for a check-in to count.
pub const CHECK_RADIUS_METERS: f64 = 500.0;

/// WGS-84 mean earth radius in meters, used by the haversine formula.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/* --------------------------------------------------------------------------
GeoPoint
-------------------------------------------------------------------------- */

/// A latitude/longitude pair in decimal degrees.
///
/// `{0, 0}` is the sentinel for "no geolocation recorded": freshly uploaded
/// photos carry it until the author drops a pin, and a quest cannot be
/// published while any of its photos still does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// The "no geolocation recorded" sentinel.
    pub const UNSET: GeoPoint = GeoPoint { lat: 0.0, lng: 0.0 };

    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    /// Whether this point carries a real geolocation (is not the sentinel).
    pub fn is_set(&self) -> bool {
        *self != GeoPoint::UNSET
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        GeoPoint::UNSET
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/* --------------------------------------------------------------------------
Distance
-------------------------------------------------------------------------- */

/// Great-circle distance in meters between two points, via the haversine
/// formula on a spherical earth.
///
/// The haversine argument is clamped into `[0, 1]` so that antipodal and
/// identical points never produce a NaN from floating-point drift.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Whether `claimed` lies within `tolerance_meters` of `target` on the
/// earth's surface. Symmetric in its two position arguments.
pub fn is_within_range(claimed: GeoPoint, target: GeoPoint, tolerance_meters: f64) -> bool {
    distance_meters(claimed, target) <= tolerance_meters
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_for_identical_points() {
        let p = GeoPoint::new(56.8380, 60.6033);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn test_known_distance_one_degree_latitude() {
        // One degree of latitude is roughly 111.2 km.
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(11.0, 20.0);
        let d = distance_meters(a, b);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (GeoPoint::new(10.0, 10.0), GeoPoint::new(20.0, 20.0)),
            (GeoPoint::new(-33.9, 151.2), GeoPoint::new(55.75, 37.6)),
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0)),
            (GeoPoint::new(89.999, 0.0), GeoPoint::new(-89.999, 0.0)),
        ];
        for (a, b) in pairs {
            let ab = distance_meters(a, b);
            let ba = distance_meters(b, a);
            assert!((ab - ba).abs() < 1e-6, "asymmetric for {a} / {b}");
        }
    }

    #[test]
    fn test_antipodal_points_do_not_panic() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = distance_meters(a, b);
        assert!(d.is_finite());
        // Half the earth's circumference, within a kilometer.
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1_000.0);
    }

    #[test]
    fn test_poles_do_not_panic() {
        let north = GeoPoint::new(90.0, 0.0);
        let south = GeoPoint::new(-90.0, 45.0);
        assert!(distance_meters(north, south).is_finite());
    }

    #[test]
    fn test_within_range_at_short_offset() {
        // ~0.003 degrees of latitude is ~330 m.
        let target = GeoPoint::new(10.0, 10.0);
        let claimed = GeoPoint::new(10.003, 10.0);
        assert!(is_within_range(claimed, target, CHECK_RADIUS_METERS));
    }

    #[test]
    fn test_outside_range_at_long_offset() {
        // ~0.09 degrees of latitude is ~10 km.
        let target = GeoPoint::new(10.0, 10.0);
        let claimed = GeoPoint::new(10.09, 10.0);
        assert!(!is_within_range(claimed, target, CHECK_RADIUS_METERS));
    }

    #[test]
    fn test_within_range_is_symmetric() {
        let a = GeoPoint::new(10.0, 10.0);
        let b = GeoPoint::new(10.002, 10.002);
        assert_eq!(
            is_within_range(a, b, CHECK_RADIUS_METERS),
            is_within_range(b, a, CHECK_RADIUS_METERS)
        );
    }

    #[test]
    fn test_unset_sentinel() {
        assert!(!GeoPoint::UNSET.is_set());
        assert!(!GeoPoint::default().is_set());
        assert!(GeoPoint::new(0.0001, 0.0).is_set());
    }
}
