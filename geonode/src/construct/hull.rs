use geonode_types::{CartesianPoint2d, Coord, Geom, GeometryType, LineString, Point, Polygon};

fn cross(o: &Coord, a: &Coord, b: &Coord) -> f64 {
    let (u, v) = (a.sub(o), b.sub(o));
    u.x * v.y - u.y * v.x
}

/// Vertices of the convex hull in counterclockwise order, starting from the smallest point by `(x, y)`.
/// Collinear and duplicate points are dropped. The ring is not closed.
pub(super) fn hull_vertices(mut points: Vec<Coord>) -> Vec<Coord> {
    points.sort_by(Coord::cmp_xy);
    points.dedup_by(|a, b| a.equal(b));
    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<Coord> = Vec::with_capacity(points.len());
    for p in &points {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Coord> = Vec::with_capacity(points.len());
    for p in points.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Smallest convex geometry containing all vertices.
///
/// Gives a polygon for three or more non-collinear vertices, the line between the extreme points for collinear
/// input, a point for a single position and an empty collection for empty input.
pub(crate) fn convex_hull(geom: &Geom) -> Geom {
    let mut vertices = hull_vertices(geom.coords().into_iter().copied().collect());
    match vertices.len() {
        0 => Geom::empty(GeometryType::GeometryCollection),
        1 => Geom::Point(Point::new(vertices[0])),
        2 => Geom::LineString(LineString::new(vertices)),
        _ => {
            vertices.push(vertices[0]);
            Geom::Polygon(Polygon::new(vertices.into(), vec![]))
        }
    }
}
