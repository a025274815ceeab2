use std::collections::BTreeMap;

use geonode_types::{
    Coord, Geom, GeometryType, LineString, MultiLineString, MultiPoint, Point, Polygon,
};

use crate::error::GeonodeError;

/// Endpoints of the open lines that are shared by an odd number of lines, sorted by `(x, y)`.
fn line_boundary<'a>(lines: impl Iterator<Item = &'a LineString>) -> Geom {
    let mut counts: BTreeMap<(u64, u64), (Coord, usize)> = BTreeMap::new();
    for line in lines.filter(|l| !l.is_empty() && !l.is_closed()) {
        let coords = line.coords();
        for endpoint in [coords[0], coords[coords.len() - 1]] {
            counts.entry(endpoint.key()).or_insert((endpoint, 0)).1 += 1;
        }
    }

    let mut points: Vec<Coord> = counts
        .into_values()
        .filter(|(_, count)| count % 2 == 1)
        .map(|(coord, _)| coord)
        .collect();
    points.sort_by(Coord::cmp_xy);

    Geom::MultiPoint(MultiPoint::new(points.into_iter().map(Point::new).collect()))
}

fn polygon_rings<'a>(polygons: impl Iterator<Item = &'a Polygon>) -> Vec<LineString> {
    polygons
        .filter(|p| !p.is_empty())
        .flat_map(|p| p.rings().cloned())
        .collect()
}

/// Topological boundary of the geometry.
///
/// Lines give the `MULTIPOINT` of their endpoints under the mod-2 rule, polygons their rings as a line string
/// (single ring) or a multi line string, points an empty collection. Collections have no defined boundary.
pub(crate) fn boundary(geom: &Geom) -> Result<Geom, GeonodeError> {
    Ok(match geom {
        Geom::Point(_) | Geom::MultiPoint(_) => Geom::empty(GeometryType::GeometryCollection),
        Geom::LineString(line) => line_boundary(std::iter::once(line)),
        Geom::MultiLineString(lines) => line_boundary(lines.parts().iter()),
        Geom::Polygon(polygon) => {
            let mut rings = polygon_rings(std::iter::once(polygon));
            if rings.len() == 1 {
                Geom::LineString(rings.remove(0))
            } else {
                Geom::MultiLineString(MultiLineString::new(rings))
            }
        }
        Geom::MultiPolygon(polygons) => {
            Geom::MultiLineString(MultiLineString::new(polygon_rings(polygons.parts().iter())))
        }
        Geom::GeometryCollection(_) => {
            return Err(GeonodeError::GeometryOperation(
                "boundary is not defined for geometry collections".into(),
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::geom;
    use assert_matches::assert_matches;

    fn boundary_of(wkt: &str) -> Geom {
        boundary(&geom(wkt)).expect("boundary is defined")
    }

    #[test]
    fn lines() {
        assert_eq!(
            boundary_of("LINESTRING(1 1, 0 0, -1 1)"),
            geom("MULTIPOINT((-1 1), (1 1))")
        );
        assert_eq!(
            boundary_of("LINESTRING(0 0, 1 0, 1 1, 0 0)"),
            geom("MULTIPOINT EMPTY")
        );
        assert_eq!(
            boundary_of("MULTILINESTRING((0 0, 1 0), (1 0, 2 0), (1 0, 1 1))"),
            geom("MULTIPOINT((0 0), (1 0), (1 1), (2 0))")
        );
        assert_eq!(
            boundary_of("MULTILINESTRING((0 0, 1 0), (1 0, 2 0))"),
            geom("MULTIPOINT((0 0), (2 0))")
        );
    }

    #[test]
    fn polygons() {
        assert_eq!(
            boundary_of("POLYGON((0 0, 1 0, 1 1, 0 0))"),
            geom("LINESTRING(0 0, 1 0, 1 1, 0 0)")
        );
        assert_eq!(
            boundary_of("POLYGON((0 0, 9 0, 9 9, 0 0), (5 1, 6 1, 6 2, 5 1))"),
            geom("MULTILINESTRING((0 0, 9 0, 9 9, 0 0), (5 1, 6 1, 6 2, 5 1))")
        );
        assert_eq!(boundary_of("POLYGON EMPTY"), geom("MULTILINESTRING EMPTY"));
    }

    #[test]
    fn points_and_collections() {
        assert_eq!(boundary_of("POINT(1 1)"), geom("GEOMETRYCOLLECTION EMPTY"));
        assert_matches!(
            boundary(&geom("GEOMETRYCOLLECTION(POINT(1 1))")),
            Err(GeonodeError::GeometryOperation(_))
        );
    }
}
