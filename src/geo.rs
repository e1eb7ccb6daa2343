/// Geometry helpers: great-circle distance between stations and the
/// warning-area outlines built from SEPA coordinate strings.
///
/// Both sit on the `geo` crate; this module only converts between the
/// crate's types and the provider formats, validating on the way in.

use geo::{Coord, Distance, Haversine, LineString, Point};

pub use geo::{Area, Polygon};

use crate::model::Coordinate;

impl From<Coordinate> for Point<f64> {
    fn from(c: Coordinate) -> Self {
        Point::new(c.longitude, c.latitude)
    }
}

/// Great-circle distance between two coordinates in kilometres, on a
/// spherical Earth of mean radius.
pub fn haversine_km(p0: Coordinate, p1: Coordinate) -> f64 {
    Haversine.distance(Point::from(p0), Point::from(p1)) / 1000.0
}

// ---------------------------------------------------------------------------
// Polygons
// ---------------------------------------------------------------------------

/// Builds a single-ring polygon from at least three points. A closing point
/// equal to the first is optional; the ring is closed either way.
pub fn polygon_from_points(points: Vec<(f64, f64)>) -> Result<Polygon<f64>, String> {
    let mut distinct = points.len();
    if distinct > 1 && points.first() == points.last() {
        distinct -= 1;
    }
    if distinct < 3 {
        return Err(format!("polygon needs at least 3 points, got {}", distinct));
    }
    if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err("polygon has non-finite coordinates".to_string());
    }
    let ring: Vec<Coord<f64>> = points.into_iter().map(Coord::from).collect();
    Ok(Polygon::new(LineString::from(ring), vec![]))
}

/// Builds a polygon from parallel comma-separated coordinate lists, as
/// published in the SEPA warning map (`"x": "1.0,2.0,..."`).
pub fn polygon_from_coordinate_strings(xs: &str, ys: &str) -> Result<Polygon<f64>, String> {
    let xs = parse_coordinate_list(xs)?;
    let ys = parse_coordinate_list(ys)?;
    if xs.len() != ys.len() {
        return Err(format!(
            "coordinate lists differ in length ({} x values, {} y values)",
            xs.len(),
            ys.len()
        ));
    }
    polygon_from_points(xs.into_iter().zip(ys).collect())
}

fn parse_coordinate_list(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| match t.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(format!("bad coordinate '{}': not finite", t)),
            Err(e) => Err(format!("bad coordinate '{}': {}", t, e)),
        })
        .collect()
}
