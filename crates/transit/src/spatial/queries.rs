//! Distance calculations on the Earth's surface.
//!
//! Uses the Haversine formula on the mean Earth radius (6371.0088 km).

use geo::{HaversineDistance, Point};

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Calculate Haversine distance between two points in kilometers
pub fn haversine_km(p1: Point, p2: Point) -> f64 {
    haversine_distance(p1, p2) / 1000.0
}

/// Convert kilometers to degrees of latitude (for bounding box queries)
///
/// A degree is ~111.2 km; dividing by 110 keeps the result on the wide side.
pub fn km_to_degrees_approx(km: f64) -> f64 {
    km / 110.0
}

/// Above this latitude the planar bound is not used at all
pub const POLAR_LATITUDE: f64 = 80.0;

/// Upper bound, in degrees, on the planar distance between two points that
/// are `km` apart on the ground at latitudes up to `max_abs_lat`.
///
/// Longitude degrees shrink by cos(lat), so the bound widens toward the poles.
/// `None` when the search reaches polar latitudes, where great circles cut
/// across meridians and no planar bound holds.
pub fn degree_radius_for(km: f64, max_abs_lat: f64) -> Option<f64> {
    let reach = max_abs_lat.abs() + km_to_degrees_approx(km);
    if reach >= POLAR_LATITUDE {
        return None;
    }
    Some(km_to_degrees_approx(km) / max_abs_lat.abs().to_radians().cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_distance() {
        // Helsinki to Tampere is approximately 160 km
        let helsinki = Point::new(24.9415, 60.1709);
        let tampere = Point::new(23.7730, 61.4981);

        let dist = haversine_km(helsinki, tampere);
        assert!((dist - 160.0).abs() < 5.0);
    }

    #[test]
    fn test_haversine_small_offsets() {
        let origin = Point::new(0.0, 0.0);

        // 0.001° of longitude on the equator
        let east = Point::new(0.001, 0.0);
        assert_relative_eq!(haversine_km(origin, east), 0.111_195, epsilon = 1e-5);

        // 0.002° of latitude
        let north = Point::new(0.0, 0.002);
        assert_relative_eq!(haversine_km(origin, north), 0.222_390, epsilon = 1e-5);

        assert_relative_eq!(haversine_km(east, north), 0.248_640, epsilon = 1e-5);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = Point::new(24.9415, 60.1709);
        let b = Point::new(25.4651, 65.0121);
        assert_relative_eq!(haversine_km(a, b), haversine_km(b, a));
        assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn test_degree_radius_covers_longitude_shrink() {
        // At 60°N one degree of longitude is about half of one at the equator
        let radius = degree_radius_for(10.0, 60.0).unwrap();
        let a = Point::new(24.0, 60.0);
        let b = Point::new(24.0 + radius, 60.0);
        assert!(haversine_km(a, b) >= 10.0);
    }

    #[test]
    fn test_degree_radius_gives_up_near_poles() {
        assert!(degree_radius_for(10.0, 79.0).is_some());
        assert!(degree_radius_for(200.0, 79.0).is_none());
        assert!(degree_radius_for(10.0, -85.0).is_none());
    }
}
