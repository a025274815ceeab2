//! Planar measurements and structural comparison.

use geonode_types::{CartesianPoint2d, Coord, Geom, LineString, Point, Polygon, Primitive, Segment};

use crate::index::segments;
use crate::prepared::PreparedGeometry;

/// Sum of the areas of all polygons. Zero for points and lines.
pub(crate) fn area(geom: &Geom) -> f64 {
    geom.primitives()
        .iter()
        .map(|p| match p {
            Primitive::Polygon(polygon) => polygon.area(),
            _ => 0.0,
        })
        .sum()
}

/// Sum of the lengths of all lines and the perimeters of all polygons.
pub(crate) fn length(geom: &Geom) -> f64 {
    geom.primitives()
        .iter()
        .map(|p| match p {
            Primitive::Point(_) => 0.0,
            Primitive::Line(line) => line.length(),
            Primitive::Polygon(polygon) => polygon.perimeter(),
        })
        .sum()
}

fn points(geom: &Geom) -> Vec<Coord> {
    geom.primitives()
        .into_iter()
        .filter_map(|p| match p {
            Primitive::Point(coord) => Some(*coord),
            _ => None,
        })
        .collect()
}

/// Minimum euclidean distance between the geometries. Zero if they intersect or either of them is empty.
pub(crate) fn distance(a: &Geom, b: &Geom) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if PreparedGeometry::new(a).intersects(b) {
        return 0.0;
    }

    let (a_points, b_points) = (points(a), points(b));
    let (a_segments, b_segments) = (segments(a), segments(b));

    let mut min_sq = f64::INFINITY;
    for p in &a_points {
        for q in &b_points {
            min_sq = min_sq.min(p.distance_sq(q));
        }
        for s in &b_segments {
            min_sq = min_sq.min(s.segment().distance_to_point_sq(p));
        }
    }
    for q in &b_points {
        for s in &a_segments {
            min_sq = min_sq.min(s.segment().distance_to_point_sq(q));
        }
    }
    let mut min = min_sq.sqrt();
    for s in &a_segments {
        for t in &b_segments {
            min = min.min(s.segment().distance_to_segment(&t.segment()));
        }
    }

    min
}

fn coords_equal(a: &[Coord], b: &[Coord], tolerance: f64) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(p, q)| {
            if tolerance == 0.0 {
                p.equal(q)
            } else {
                p.distance(q) <= tolerance
            }
        })
}

fn points_equal(a: &Point, b: &Point, tolerance: f64) -> bool {
    match (a.coord(), b.coord()) {
        (Some(p), Some(q)) => coords_equal(&[*p], &[*q], tolerance),
        (None, None) => true,
        _ => false,
    }
}

fn lines_equal(a: &LineString, b: &LineString, tolerance: f64) -> bool {
    coords_equal(a.coords(), b.coords(), tolerance)
}

fn polygons_equal(a: &Polygon, b: &Polygon, tolerance: f64) -> bool {
    a.interiors().len() == b.interiors().len()
        && a.rings()
            .zip(b.rings())
            .all(|(r, s)| lines_equal(r, s, tolerance))
}

fn all_equal<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eq(x, y))
}

/// Geometries have the same kind and structure, and corresponding vertices are within `tolerance` of each other.
pub(crate) fn equals_exact(a: &Geom, b: &Geom, tolerance: f64) -> bool {
    match (a, b) {
        (Geom::Point(p), Geom::Point(q)) => points_equal(p, q, tolerance),
        (Geom::LineString(p), Geom::LineString(q)) => lines_equal(p, q, tolerance),
        (Geom::Polygon(p), Geom::Polygon(q)) => polygons_equal(p, q, tolerance),
        (Geom::MultiPoint(p), Geom::MultiPoint(q)) => {
            all_equal(p.parts(), q.parts(), |x, y| points_equal(x, y, tolerance))
        }
        (Geom::MultiLineString(p), Geom::MultiLineString(q)) => {
            all_equal(p.parts(), q.parts(), |x, y| lines_equal(x, y, tolerance))
        }
        (Geom::MultiPolygon(p), Geom::MultiPolygon(q)) => {
            all_equal(p.parts(), q.parts(), |x, y| polygons_equal(x, y, tolerance))
        }
        (Geom::GeometryCollection(p), Geom::GeometryCollection(q)) => {
            all_equal(p.parts(), q.parts(), |x, y| equals_exact(x, y, tolerance))
        }
        _ => false,
    }
}

/// Shortest distance between a point and a segment.
pub(crate) fn point_segment_distance(point: &Coord, start: &Coord, end: &Coord) -> f64 {
    Segment(start, end).distance_to_point_sq(point).sqrt()
}
