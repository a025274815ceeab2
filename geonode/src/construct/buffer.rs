use std::f64::consts::FRAC_PI_2;

use geonode_types::{CartesianPoint2d, Coord, Geom, GeometryType, MultiPolygon, Polygon, Primitive};
use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::hull::hull_vertices;
use crate::overlay::{build_geometry, overlay, unary_union, union_all, OverlayOp};

/// Number of segments approximating a quarter circle when no other value is given.
pub const DEFAULT_QUADRANT_SEGMENTS: usize = 8;

/// Parameters of the buffer construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferParams {
    quadrant_segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
        }
    }
}

impl BufferParams {
    /// Sets the number of segments used for a quarter of a circle. Values below 1 are raised to 1.
    pub fn with_quadrant_segments(mut self, quadrant_segments: usize) -> Self {
        self.quadrant_segments = quadrant_segments.max(1);
        self
    }

    /// Number of segments used for a quarter of a circle.
    pub fn quadrant_segments(&self) -> usize {
        self.quadrant_segments
    }
}

/// Positions of a circle approximation, clockwise from angle 0. Not closed.
fn circle_points(center: &Coord, radius: f64, quadrant_segments: usize) -> Vec<Coord> {
    let count = 4 * quadrant_segments;
    let step = FRAC_PI_2 / quadrant_segments as f64;
    (0..count)
        .map(|k| {
            let angle = -(k as f64) * step;
            Coord::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

fn circle(center: &Coord, radius: f64, quadrant_segments: usize) -> Polygon {
    let mut ring = circle_points(center, radius, quadrant_segments);
    ring.push(ring[0]);
    Polygon::new(ring.into(), vec![])
}

/// Area swept by a disc of the given radius moving along the segment.
fn capsule(start: &Coord, end: &Coord, radius: f64, quadrant_segments: usize) -> Polygon {
    if start.equal(end) {
        return circle(start, radius, quadrant_segments);
    }

    let direction: Vector2<f64> = end.sub(start).normalize();
    let normal = Vector2::new(-direction.y, direction.x) * radius;

    let mut points = circle_points(start, radius, quadrant_segments);
    points.extend(circle_points(end, radius, quadrant_segments));
    for p in [start, end] {
        points.push(Coord::new(p.x + normal.x, p.y + normal.y));
        points.push(Coord::new(p.x - normal.x, p.y - normal.y));
    }

    let mut ring = hull_vertices(points);
    ring.push(ring[0]);
    Polygon::new(ring.into(), vec![])
}

fn ring_capsules(polygon: &Polygon, radius: f64, quadrant_segments: usize) -> Vec<Geom> {
    polygon
        .rings()
        .flat_map(|ring| ring.coords().windows(2))
        .map(|pair| Geom::Polygon(capsule(&pair[0], &pair[1], radius, quadrant_segments)))
        .collect()
}

fn areal_part(geom: &Geom) -> Vec<Polygon> {
    geom.primitives()
        .into_iter()
        .filter_map(|p| match p {
            Primitive::Polygon(polygon) => Some(polygon.clone()),
            _ => None,
        })
        .collect()
}

/// Keeps only the polygons of an overlay result.
fn polygonal(geom: Geom) -> Geom {
    match geom {
        Geom::Polygon(_) | Geom::MultiPolygon(_) => geom,
        other => build_geometry(areal_part(&other), vec![], vec![])
            .unwrap_or_else(|| Geom::empty(GeometryType::Polygon)),
    }
}

/// Area within `distance` of the geometry, or the area shrunk by `-distance` for negative distances.
///
/// Arcs are approximated with `quadrant_segments` segments per quarter circle. Only areas can shrink: a negative or
/// zero distance applied to points and lines yields `POLYGON EMPTY`.
pub(crate) fn buffer(geom: &Geom, distance: f64, params: &BufferParams) -> Geom {
    let segments = params.quadrant_segments();
    debug!(
        "buffering {} by {distance} with {segments} quadrant segments",
        geom.geometry_type()
    );

    if geom.is_empty() {
        return Geom::empty(GeometryType::Polygon);
    }

    let areas = areal_part(geom);
    if distance == 0.0 {
        if areas.is_empty() {
            return Geom::empty(GeometryType::Polygon);
        }
        return polygonal(unary_union(&Geom::MultiPolygon(MultiPolygon::new(areas))));
    }

    if distance < 0.0 {
        let radius = -distance;
        let mut result = vec![];
        for polygon in areas {
            let eroded = overlay(
                &Geom::Polygon(polygon.clone()),
                &union_all(ring_capsules(&polygon, radius, segments))
                    .unwrap_or_else(|| Geom::empty(GeometryType::Polygon)),
                OverlayOp::Difference,
            );
            if !eroded.is_empty() {
                result.push(eroded);
            }
        }
        return union_all(result)
            .map(polygonal)
            .unwrap_or_else(|| Geom::empty(GeometryType::Polygon));
    }

    let mut parts: Vec<Geom> = vec![];
    for primitive in geom.primitives() {
        match primitive {
            Primitive::Point(center) => parts.push(Geom::Polygon(circle(center, distance, segments))),
            Primitive::Line(line) => {
                let coords = line.coords();
                if coords.len() == 1 {
                    parts.push(Geom::Polygon(circle(&coords[0], distance, segments)));
                }
                parts.extend(
                    coords
                        .windows(2)
                        .map(|pair| Geom::Polygon(capsule(&pair[0], &pair[1], distance, segments))),
                );
            }
            Primitive::Polygon(polygon) => {
                parts.push(Geom::Polygon(polygon.clone()));
                parts.extend(ring_capsules(polygon, distance, segments));
            }
        }
    }

    union_all(parts)
        .map(polygonal)
        .unwrap_or_else(|| Geom::empty(GeometryType::Polygon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{area, equals_exact};
    use crate::tests::{geom, init_logger};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn regular_polygon_area(sides: usize, radius: f64) -> f64 {
        sides as f64 / 2.0 * radius * radius * (2.0 * PI / sides as f64).sin()
    }

    #[test]
    fn params() {
        assert_eq!(BufferParams::default().quadrant_segments(), DEFAULT_QUADRANT_SEGMENTS);
        assert_eq!(
            BufferParams::default()
                .with_quadrant_segments(0)
                .quadrant_segments(),
            1
        );
    }

    #[test]
    fn point_with_one_quadrant_segment() {
        let params = BufferParams::default().with_quadrant_segments(1);
        let result = buffer(&geom("POINT(1 1)"), 1.0, &params);
        assert!(equals_exact(
            &result,
            &geom("POLYGON((2 1, 1 0, 0 1, 1 2, 2 1))"),
            1e-12
        ));
    }

    #[test]
    fn point_circle() {
        init_logger();
        let result = buffer(&geom("POINT(0 0)"), 2.0, &BufferParams::default());
        let Geom::Polygon(polygon) = &result else {
            panic!("expected polygon, got {result:?}");
        };
        assert_eq!(polygon.exterior().coords().len(), 33);
        assert!(polygon.exterior().area_signed() < 0.0);
        assert_abs_diff_eq!(area(&result), regular_polygon_area(32, 2.0), epsilon = 1e-9);
    }

    #[test]
    fn segment_capsule() {
        let result = buffer(&geom("LINESTRING(0 0, 10 0)"), 1.0, &BufferParams::default());
        assert_eq!(result.geometry_type(), GeometryType::Polygon);
        assert_abs_diff_eq!(
            area(&result),
            20.0 + regular_polygon_area(32, 1.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn polygon_grows_and_shrinks() {
        let square = geom("POLYGON((0 0, 2 0, 2 2, 0 2, 0 0))");
        let grown = buffer(&square, 1.0, &BufferParams::default());
        assert_eq!(grown.geometry_type(), GeometryType::Polygon);
        assert_abs_diff_eq!(
            area(&grown),
            12.0 + regular_polygon_area(32, 1.0),
            epsilon = 1e-6
        );

        let big = geom("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0))");
        let shrunk = buffer(&big, -1.0, &BufferParams::default());
        assert_abs_diff_eq!(area(&shrunk), 64.0, epsilon = 1e-6);

        let vanished = buffer(&square, -1.5, &BufferParams::default());
        assert_eq!(vanished, Geom::empty(GeometryType::Polygon));
    }

    #[test]
    fn degenerate_distances() {
        let params = BufferParams::default();
        assert_eq!(
            buffer(&geom("LINESTRING(0 0, 1 1)"), -1.0, &params),
            Geom::empty(GeometryType::Polygon)
        );
        assert_eq!(
            buffer(&geom("POINT(0 0)"), 0.0, &params),
            Geom::empty(GeometryType::Polygon)
        );
        assert_eq!(
            buffer(&geom("POINT EMPTY"), 1.0, &params),
            Geom::empty(GeometryType::Polygon)
        );
        let square = geom("POLYGON((0 0, 2 0, 2 2, 0 2, 0 0))");
        let same = buffer(&square, 0.0, &params);
        assert_abs_diff_eq!(area(&same), 4.0);
    }

    #[test]
    fn disjoint_points_give_multipolygon() {
        let result = buffer(
            &geom("MULTIPOINT((0 0), (10 0))"),
            1.0,
            &BufferParams::default(),
        );
        assert_eq!(result.geometry_type(), GeometryType::MultiPolygon);
    }
}
