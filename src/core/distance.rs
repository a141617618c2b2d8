use geo::{HaversineDestination, HaversineDistance, Point};

use crate::core::error::RankingError;
use crate::models::Coordinate;

/// Mean Earth radius in kilometers (IUGG), the radius `geo` uses for haversine
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Reject coordinates outside lat [-90, 90] / lon [-180, 180] (NaN included)
#[inline]
pub fn validate_coordinate(coord: Coordinate) -> Result<Coordinate, RankingError> {
    if coord.is_valid() {
        Ok(coord)
    } else {
        Err(RankingError::InvalidCoordinate {
            lat: coord.lat,
            lon: coord.lon,
        })
    }
}

/// Great-circle distance between two coordinates in kilometers
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
/// The two points are put in a canonical order first, so swapping the
/// arguments yields a bit-identical result.
///
/// # Arguments
/// * `a` - First point, decimal degrees
/// * `b` - Second point, decimal degrees
///
/// # Returns
/// Distance in kilometers
///
/// # Errors
/// `InvalidCoordinate` if either point is out of range.
#[inline]
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> Result<f64, RankingError> {
    let a = validate_coordinate(a)?;
    let b = validate_coordinate(b)?;

    let (first, second) = if (a.lat, a.lon) <= (b.lat, b.lon) {
        (a, b)
    } else {
        (b, a)
    };

    let p1 = Point::new(first.lon, first.lat);
    let p2 = Point::new(second.lon, second.lat);

    Ok(p1.haversine_distance(&p2) / 1000.0)
}

/// Point reached by travelling `distance_km` from `origin` along `bearing_deg`
/// (degrees clockwise from north)
pub fn destination(
    origin: Coordinate,
    bearing_deg: f64,
    distance_km: f64,
) -> Result<Coordinate, RankingError> {
    let origin = validate_coordinate(origin)?;
    let dest = Point::new(origin.lon, origin.lat).haversine_destination(bearing_deg, distance_km * 1000.0);
    Ok(Coordinate::new(dest.y(), dest.x()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // London to Paris (approximately 344 km)
        let london = Coordinate::new(51.5074, -0.1278);
        let paris = Coordinate::new(48.8566, 2.3522);

        let distance = haversine_distance(london, paris).unwrap();
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_identical_points() {
        let p = Coordinate::new(48.8566, 2.3522);
        assert_eq!(haversine_distance(p, p).unwrap(), 0.0);
    }

    #[test]
    fn test_symmetry_is_exact() {
        let points = [
            Coordinate::new(48.8566, 2.3522),
            Coordinate::new(48.8606, 2.3376),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(89.9, -179.9),
            Coordinate::new(-90.0, 180.0),
            Coordinate::new(0.0, 0.0),
        ];

        for a in points {
            for b in points {
                assert_eq!(
                    haversine_distance(a, b).unwrap(),
                    haversine_distance(b, a).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_one_degree_of_meridian() {
        let d = haversine_distance(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)).unwrap();
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-9, "got {}, expected {}", d, expected);
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let ok = Coordinate::new(0.0, 0.0);
        let err = haversine_distance(ok, Coordinate::new(91.0, 0.0)).unwrap_err();
        assert_eq!(err, RankingError::InvalidCoordinate { lat: 91.0, lon: 0.0 });

        assert!(haversine_distance(Coordinate::new(0.0, -180.5), ok).is_err());
    }

    #[test]
    fn test_destination_round_trip_distance() {
        let origin = Coordinate::new(48.8566, 2.3522);
        let dest = destination(origin, 90.0, 4.0).unwrap();
        let d = haversine_distance(origin, dest).unwrap();
        assert!((d - 4.0).abs() < 1e-6, "got {}", d);
    }
}
