//! Convex hull over cluster points.

use geo::{ConvexHull as _, Coord, LineString, MultiPoint, Point, Polygon};
use missing_migrants_incident_models::LonLat;

/// Errors that can occur while building a hull.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// Fewer than three distinct, non-collinear points cannot enclose an
    /// area.
    #[error("Need at least 3 non-collinear points for a convex hull, found {found}")]
    InsufficientPoints {
        /// Points supplied, or distinct hull vertices when the points are
        /// coincident or collinear.
        found: usize,
    },
}

/// Minimum number of points a hull needs.
pub const MIN_HULL_POINTS: usize = 3;

/// Convex hull of `points` in `(lon, lat)` space.
///
/// The exterior ring is closed: its first vertex is repeated at the end.
///
/// # Errors
///
/// Returns [`GeometryError::InsufficientPoints`] for fewer than three
/// points, or when the hull has fewer than three distinct vertices
/// (coincident or collinear input).
pub fn convex_hull(points: &[LonLat]) -> Result<Polygon<f64>, GeometryError> {
    if points.len() < MIN_HULL_POINTS {
        return Err(GeometryError::InsufficientPoints {
            found: points.len(),
        });
    }

    let multi_point = MultiPoint::new(points.iter().map(|p| Point::new(p.lon, p.lat)).collect());
    let hull = multi_point.convex_hull();

    let vertices = distinct_vertices(hull.exterior());
    if vertices < MIN_HULL_POINTS {
        return Err(GeometryError::InsufficientPoints { found: vertices });
    }

    Ok(hull)
}

/// Number of distinct coordinates on a ring.
fn distinct_vertices(ring: &LineString<f64>) -> usize {
    let mut seen: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
    for coord in &ring.0 {
        if !seen.contains(coord) {
            seen.push(*coord);
        }
    }
    seen.len()
}

/// A polygon with no vertices.
#[must_use]
pub fn empty_polygon() -> Polygon<f64> {
    Polygon::new(LineString::new(vec![]), vec![])
}

#[cfg(test)]
mod tests {
    use geo::Intersects as _;

    use super::*;

    #[test]
    fn hull_ring_is_closed_and_covers_points() {
        let points = [
            LonLat::new(0.0, 0.0),
            LonLat::new(4.0, 0.0),
            LonLat::new(4.0, 3.0),
            LonLat::new(0.0, 3.0),
            LonLat::new(2.0, 1.0),
        ];
        let hull = convex_hull(&points).unwrap();
        let ring = &hull.exterior().0;
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), 5);
        for p in &points {
            assert!(hull.intersects(&Point::new(p.lon, p.lat)));
        }
    }

    #[test]
    fn two_points_are_insufficient() {
        let err = convex_hull(&[LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0)]).unwrap_err();
        assert_eq!(err, GeometryError::InsufficientPoints { found: 2 });
    }

    #[test]
    fn coincident_points_are_insufficient() {
        let err = convex_hull(&[LonLat::new(1.0, 1.0); 3]).unwrap_err();
        assert_eq!(err, GeometryError::InsufficientPoints { found: 1 });
    }

    #[test]
    fn collinear_points_are_insufficient() {
        let points = [
            LonLat::new(0.0, 0.0),
            LonLat::new(1.0, 1.0),
            LonLat::new(2.0, 2.0),
            LonLat::new(3.0, 3.0),
        ];
        let err = convex_hull(&points).unwrap_err();
        assert_eq!(err, GeometryError::InsufficientPoints { found: 2 });
    }

    #[test]
    fn duplicates_do_not_count_as_vertices() {
        let points = [
            LonLat::new(0.0, 0.0),
            LonLat::new(0.0, 0.0),
            LonLat::new(2.0, 0.0),
            LonLat::new(1.0, 2.0),
        ];
        let ring = convex_hull(&points).unwrap().exterior().0.clone();
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn empty_polygon_has_no_vertices() {
        assert!(empty_polygon().exterior().0.is_empty());
    }
}
