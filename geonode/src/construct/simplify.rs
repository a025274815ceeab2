use geonode_types::{
    Coord, Geom, GeometryCollection, LineString, MultiLineString, MultiPolygon, Polygon,
};

use crate::measure::point_segment_distance;

/// Douglas-Peucker reduction of a vertex sequence. The first and the last vertices are always kept.
fn douglas_peucker(coords: &[Coord], tolerance: f64) -> Vec<Coord> {
    if coords.len() < 3 {
        return coords.to_vec();
    }

    let mut keep = vec![false; coords.len()];
    keep[0] = true;
    keep[coords.len() - 1] = true;

    let mut stack = vec![(0, coords.len() - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }

        let (mut farthest, mut max_distance) = (first, -1.0);
        for (index, coord) in coords.iter().enumerate().take(last).skip(first + 1) {
            let distance = point_segment_distance(coord, &coords[first], &coords[last]);
            if distance > max_distance {
                farthest = index;
                max_distance = distance;
            }
        }

        if max_distance > tolerance {
            keep[farthest] = true;
            stack.push((first, farthest));
            stack.push((farthest, last));
        }
    }

    coords
        .iter()
        .zip(keep)
        .filter(|(_, kept)| *kept)
        .map(|(coord, _)| *coord)
        .collect()
}

fn simplify_line(line: &LineString, tolerance: f64) -> LineString {
    LineString::new(douglas_peucker(line.coords(), tolerance))
}

/// Simplified ring, or `None` if it collapsed below 4 vertices.
fn simplify_ring(ring: &LineString, tolerance: f64) -> Option<LineString> {
    let simplified = douglas_peucker(ring.coords(), tolerance);
    (simplified.len() >= 4).then(|| LineString::new(simplified))
}

fn simplify_polygon(polygon: &Polygon, tolerance: f64) -> Option<Polygon> {
    if polygon.is_empty() {
        return Some(polygon.clone());
    }
    let exterior = simplify_ring(polygon.exterior(), tolerance)?;
    let interiors = polygon
        .interiors()
        .iter()
        .filter_map(|ring| simplify_ring(ring, tolerance))
        .collect();
    Some(Polygon::new(exterior, interiors))
}

/// Removes vertices deviating less than `tolerance` from the simplified lines.
///
/// Ring endpoints are kept. Rings that collapse are dropped: a polygon without an exterior becomes
/// `POLYGON EMPTY` and holes vanish. Points are returned unchanged.
pub(crate) fn simplify(geom: &Geom, tolerance: f64) -> Geom {
    match geom {
        Geom::Point(_) | Geom::MultiPoint(_) => geom.clone(),
        Geom::LineString(line) => Geom::LineString(simplify_line(line, tolerance)),
        Geom::Polygon(polygon) => {
            Geom::Polygon(simplify_polygon(polygon, tolerance).unwrap_or_else(Polygon::empty))
        }
        Geom::MultiLineString(lines) => Geom::MultiLineString(MultiLineString::new(
            lines
                .parts()
                .iter()
                .map(|line| simplify_line(line, tolerance))
                .collect(),
        )),
        Geom::MultiPolygon(polygons) => Geom::MultiPolygon(MultiPolygon::new(
            polygons
                .parts()
                .iter()
                .filter_map(|polygon| simplify_polygon(polygon, tolerance))
                .collect(),
        )),
        Geom::GeometryCollection(collection) => {
            Geom::GeometryCollection(GeometryCollection::new(
                collection
                    .parts()
                    .iter()
                    .map(|part| simplify(part, tolerance))
                    .collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::geom;

    #[test]
    fn line() {
        let line = geom("LINESTRING(0 0, 1 0.1, 2 -0.1, 3 5, 4 6, 5 7, 6 8.1, 7 9, 8 9, 9 9)");
        assert_eq!(
            simplify(&line, 0.5),
            geom("LINESTRING(0 0, 2 -0.1, 3 5, 7 9, 9 9)")
        );
        assert_eq!(
            simplify(&line, 0.0),
            geom("LINESTRING(0 0, 1 0.1, 2 -0.1, 3 5, 5 7, 6 8.1, 7 9, 9 9)")
        );
        assert_eq!(
            simplify(&line, 100.0),
            geom("LINESTRING(0 0, 9 9)")
        );
    }

    #[test]
    fn rings() {
        let polygon = geom(
            "POLYGON((0 0, 5 0.1, 10 0, 10 10, 0 10, 0 0), (4 4, 4.1 4.1, 4 4.2, 4 4))",
        );
        assert_eq!(
            simplify(&polygon, 0.5),
            geom("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0))")
        );

        let small = geom("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))");
        assert_eq!(simplify(&small, 5.0), geom("POLYGON EMPTY"));
        assert_eq!(
            simplify(&geom("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 1, 0 0)))"), 5.0),
            geom("MULTIPOLYGON EMPTY")
        );
    }

    #[test]
    fn points_are_untouched() {
        let points = geom("MULTIPOINT((0 0), (0.1 0))");
        assert_eq!(simplify(&points, 1.0), points);
    }
}
