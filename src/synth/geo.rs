//! Great-circle distance.

use latencyscope_types::Coords;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres.
pub fn haversine_km(from: Coords, to: Coords) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lng / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = Coords::new(35.6762, 139.6503);
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_london_paris() {
        let london = Coords::new(51.5074, -0.1278);
        let paris = Coords::new(48.8566, 2.3522);
        let d = haversine_km(london, paris);
        assert!((d - 343.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_one_degree_on_equator() {
        let d = haversine_km(Coords::new(0.0, 0.0), Coords::new(0.0, 1.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = Coords::new(1.3521, 103.8198);
        let b = Coords::new(40.7357, -74.1724);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }
}
