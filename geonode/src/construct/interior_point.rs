use geonode_types::{CartesianPoint2d, Coord, Geom, Geometry as _, GeometryType, Point, Polygon, Primitive};

use super::centroid::centroid;

/// Horizontal line through the polygon that avoids all its vertices: halfway between the nearest vertex
/// ordinates below and above the middle of the bounding box.
fn scan_line_y(polygon: &Polygon) -> Option<f64> {
    let rect = polygon.rect()?;
    let center = (rect.y_min + rect.y_max) / 2.0;
    let (mut low, mut high) = (rect.y_min, rect.y_max);
    for coord in polygon.rings().flat_map(|r| r.coords()) {
        if coord.y <= center {
            low = low.max(coord.y);
        } else {
            high = high.min(coord.y);
        }
    }
    (high > low).then_some((low + high) / 2.0)
}

/// Keeps the first of equally wide intervals.
fn widest(best: (Coord, f64), candidate: (Coord, f64)) -> (Coord, f64) {
    if candidate.1 > best.1 {
        candidate
    } else {
        best
    }
}

/// Midpoint of the widest interval where the scan line runs inside the polygon, with the interval width.
fn widest_interval(polygon: &Polygon) -> Option<(Coord, f64)> {
    let y = scan_line_y(polygon)?;
    let mut crossings: Vec<f64> = polygon
        .rings()
        .flat_map(|ring| ring.segments())
        .filter(|s| (s.0.y > y) != (s.1.y > y))
        .map(|s| s.0.x + (y - s.0.y) * (s.1.x - s.0.x) / (s.1.y - s.0.y))
        .collect();
    crossings.sort_by(f64::total_cmp);

    crossings
        .chunks_exact(2)
        .map(|pair| (Coord::new((pair[0] + pair[1]) / 2.0, y), pair[1] - pair[0]))
        .reduce(widest)
}

fn nearest<'a>(candidates: impl Iterator<Item = &'a Coord>, target: &Coord) -> Option<Coord> {
    candidates
        .min_by(|a, b| a.distance_sq(target).total_cmp(&b.distance_sq(target)))
        .copied()
}

/// A point guaranteed to lie on the geometry, in the interior of its highest-dimensional components when they
/// have one.
///
/// For areas this is the middle of the widest interior interval on a horizontal scan line. For lines it is the
/// interior vertex closest to the centroid, falling back to the endpoints, and for points the point closest to the
/// centroid.
pub(crate) fn point_on_surface(geom: &Geom) -> Geom {
    let primitives = geom.primitives();
    let Some(dimension) = primitives.iter().map(Primitive::dimension).max() else {
        return Geom::empty(GeometryType::Point);
    };
    let center = match centroid(geom) {
        Geom::Point(p) => p.coord().copied(),
        _ => None,
    }
    .unwrap_or_default();

    let area_point = || {
        primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Polygon(polygon) => widest_interval(polygon),
                _ => None,
            })
            .reduce(widest)
            .map(|(coord, _)| coord)
    };
    let line_point = || {
        let lines: Vec<&[Coord]> = primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Line(line) => Some(line.coords()),
                _ => None,
            })
            .collect();
        let interior = lines
            .iter()
            .flat_map(|coords| coords.iter().skip(1).take(coords.len().saturating_sub(2)));
        nearest(interior, &center).or_else(|| {
            let endpoints = lines
                .iter()
                .flat_map(|coords| [&coords[0], &coords[coords.len() - 1]]);
            nearest(endpoints, &center)
        })
    };
    let any_point = || {
        let points = primitives.iter().filter_map(|p| match p {
            Primitive::Point(coord) => Some(*coord),
            _ => None,
        });
        nearest(points, &center)
    };

    let result = match dimension {
        2 => area_point().or_else(|| geom.coords().first().map(|c| **c)),
        1 => line_point(),
        _ => any_point(),
    };

    match result {
        Some(coord) => Geom::Point(Point::new(coord)),
        None => Geom::empty(GeometryType::Point),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{locate, Location};
    use crate::tests::geom;

    fn surface_point(wkt: &str) -> Coord {
        match point_on_surface(&geom(wkt)) {
            Geom::Point(p) => *p.coord().expect("non-empty point"),
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn concave_polygon() {
        let wkt = "POLYGON((0 0, 10 0, 10 10, 8 10, 8 2, 2 2, 2 10, 0 10, 0 0))";
        let point = surface_point(wkt);
        assert_eq!(locate(&point, &geom(wkt)), Location::Interior);
        assert_eq!(point, Coord::new(1.0, 6.0));
    }

    #[test]
    fn polygon_with_hole() {
        let wkt = "POLYGON((0 0, 10 0, 10 10, 0 10, 0 0), (1 1, 9 1, 9 9, 1 9, 1 1))";
        let point = surface_point(wkt);
        assert_eq!(locate(&point, &geom(wkt)), Location::Interior);
    }

    #[test]
    fn lines_and_points() {
        assert_eq!(
            surface_point("LINESTRING(0 0, 1 0, 5 0, 10 0)"),
            Coord::new(5.0, 0.0)
        );
        assert_eq!(surface_point("LINESTRING(0 0, 10 0)"), Coord::new(0.0, 0.0));
        assert_eq!(
            surface_point("MULTIPOINT((0 0), (2 2), (10 10))"),
            Coord::new(2.0, 2.0)
        );
        assert_eq!(point_on_surface(&geom("POINT EMPTY")), geom("POINT EMPTY"));
    }
}
