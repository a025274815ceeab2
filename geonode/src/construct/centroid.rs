use geonode_types::{Coord, Geom, GeometryType, LineString, Point, Primitive};

#[derive(Default)]
struct WeightedSum {
    x: f64,
    y: f64,
    weight: f64,
}

impl WeightedSum {
    fn add(&mut self, point: Coord, weight: f64) {
        self.x += point.x * weight;
        self.y += point.y * weight;
        self.weight += weight;
    }

    fn mean(&self) -> Option<Coord> {
        (self.weight != 0.0).then(|| Coord::new(self.x / self.weight, self.y / self.weight))
    }
}

/// Adds the ring's area centroid weighted by its unsigned area, negated for holes.
fn add_ring(sum: &mut WeightedSum, ring: &LineString, is_hole: bool) {
    let coords = ring.coords();
    let base = coords[0];
    let (mut cx, mut cy, mut area2) = (0.0, 0.0, 0.0);
    for pair in coords.windows(2) {
        let (p, q) = (
            Coord::new(pair[0].x - base.x, pair[0].y - base.y),
            Coord::new(pair[1].x - base.x, pair[1].y - base.y),
        );
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
        area2 += cross;
    }
    if area2 == 0.0 {
        return;
    }

    let centroid = Coord::new(base.x + cx / (3.0 * area2), base.y + cy / (3.0 * area2));
    let area = area2.abs() / 2.0;
    sum.add(centroid, if is_hole { -area } else { area });
}

fn add_line(sum: &mut WeightedSum, line: &LineString) {
    for segment in line.segments() {
        sum.add(segment.midpoint(), segment.length());
    }
}

/// Centre of mass of the highest-dimensional components.
///
/// Areas are weighted by area, lines by length and points count equally. Polygons without area fall back to their
/// rings as lines and lines without length to their vertices. Empty geometries give `POINT EMPTY`.
pub(crate) fn centroid(geom: &Geom) -> Geom {
    let primitives = geom.primitives();
    let dimension = primitives.iter().map(Primitive::dimension).max();

    let mut areas = WeightedSum::default();
    let mut lines = WeightedSum::default();
    let mut points = WeightedSum::default();
    for primitive in &primitives {
        match primitive {
            Primitive::Point(coord) => points.add(**coord, 1.0),
            Primitive::Line(line) => {
                add_line(&mut lines, line);
                line.coords().iter().for_each(|c| points.add(*c, 1.0));
            }
            Primitive::Polygon(polygon) => {
                for (index, ring) in polygon.rings().enumerate() {
                    add_ring(&mut areas, ring, index > 0);
                    add_line(&mut lines, ring);
                    ring.coords().iter().for_each(|c| points.add(*c, 1.0));
                }
            }
        }
    }

    let result = match dimension {
        None => None,
        Some(2) => areas.mean().or_else(|| lines.mean()).or_else(|| points.mean()),
        Some(1) => lines.mean().or_else(|| points.mean()),
        Some(_) => points.mean(),
    };

    match result {
        Some(coord) => Geom::Point(Point::new(coord)),
        None => Geom::empty(GeometryType::Point),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::geom;

    fn centroid_coord(wkt: &str) -> Coord {
        match centroid(&geom(wkt)) {
            Geom::Point(p) => *p.coord().expect("non-empty centroid"),
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn by_dimension() {
        assert_eq!(
            centroid_coord("POLYGON((0 0, 2 0, 2 2, 0 2, 0 0))"),
            Coord::new(1.0, 1.0)
        );
        assert_eq!(
            centroid_coord("LINESTRING(0 0, 2 0, 2 1)"),
            Coord::new(4.0 / 3.0, 1.0 / 6.0)
        );
        assert_eq!(
            centroid_coord("MULTIPOINT((0 0), (3 0), (0 3))"),
            Coord::new(1.0, 1.0)
        );
        assert_eq!(
            centroid_coord("GEOMETRYCOLLECTION(POINT(100 100), POLYGON((0 0, 2 0, 2 2, 0 2, 0 0)))"),
            Coord::new(1.0, 1.0)
        );
        assert_eq!(centroid(&geom("POLYGON EMPTY")), geom("POINT EMPTY"));
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(
            centroid_coord("POLYGON((0 0, 2 0, 1 0, 0 0))"),
            Coord::new(1.0, 0.0)
        );
        assert_eq!(centroid_coord("LINESTRING(1 1, 1 1)"), Coord::new(1.0, 1.0));
    }

    #[test]
    #[cfg(feature = "geo-types")]
    fn matches_geo() {
        use approx::assert_relative_eq;
        use geo::Centroid;

        let wkt = "MULTIPOLYGON(((0 0, 6 0, 6 6, 0 6, 0 0), (1 1, 2 1, 2 2, 1 2, 1 1)), ((10 10, 13 10, 11 14, 10 10)))";
        let reference: geo::Geometry<f64> = (&geom(wkt)).into();
        let expected = reference.centroid().expect("non-empty");
        let actual = centroid_coord(wkt);
        assert_relative_eq!(actual.x, expected.x(), epsilon = 1e-12);
        assert_relative_eq!(actual.y, expected.y(), epsilon = 1e-12);
    }
}
