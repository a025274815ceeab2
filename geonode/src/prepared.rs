//! Geometry with precomputed indexes for evaluating many predicates against one geometry.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use geonode_types::{Coord, Geom, Geometry as _, Orientation, Primitive, Rect};
use log::debug;

use crate::index::{segments, SegmentIndex};
use crate::location::{IndexedPointLocator, Location, LocationAccumulator};
use crate::overlay::dissolve_areas;
use crate::relate::relate;

/// A geometry paired with a segment R-tree and an indexed point-in-area locator.
///
/// Predicates give the same answers as their [`Geometry`](crate::Geometry) counterparts, which are evaluated
/// through a temporary prepared geometry themselves. The index borrows the geometry, so it cannot outlive or
/// observe mutations of its source.
pub struct PreparedGeometry<'a> {
    geom: &'a Geom,
    /// The geometry with the polygons of a collection merged, the source of all indexes.
    dissolved: Cow<'a, Geom>,
    rect: Option<Rect>,
    segments: SegmentIndex,
    locator: IndexedPointLocator,
    is_areal: bool,
    is_line: Vec<bool>,
    line_endpoints: HashMap<(u64, u64), usize>,
    points: HashSet<(u64, u64)>,
}

fn first_coord<'a>(primitive: &Primitive<'a>) -> &'a Coord {
    match primitive {
        Primitive::Point(coord) => coord,
        Primitive::Line(line) => &line.coords()[0],
        Primitive::Polygon(polygon) => &polygon.exterior().coords()[0],
    }
}

fn is_puntal(geom: &Geom) -> bool {
    geom.primitives()
        .iter()
        .all(|p| matches!(p, Primitive::Point(_)))
}

impl<'a> PreparedGeometry<'a> {
    /// Builds the indexes of the geometry.
    pub fn new(geom: &'a Geom) -> Self {
        let dissolved = dissolve_areas(geom);
        let primitives = dissolved.primitives();
        let mut line_endpoints = HashMap::new();
        let mut points = HashSet::new();
        let mut is_line = Vec::with_capacity(primitives.len());
        for primitive in &primitives {
            is_line.push(matches!(primitive, Primitive::Line(_)));
            match primitive {
                Primitive::Point(coord) => {
                    points.insert(coord.key());
                }
                Primitive::Line(line) if !line.is_closed() => {
                    let coords = line.coords();
                    *line_endpoints.entry(coords[0].key()).or_default() += 1;
                    *line_endpoints
                        .entry(coords[coords.len() - 1].key())
                        .or_default() += 1;
                }
                _ => {}
            }
        }

        let is_areal = !primitives.is_empty()
            && primitives
                .iter()
                .all(|p| matches!(p, Primitive::Polygon(_)));
        let locator = IndexedPointLocator::new(&dissolved);
        let segment_list = segments(&dissolved);
        debug!(
            "prepared {} with {} indexed segments",
            geom.geometry_type(),
            segment_list.len()
        );

        Self {
            geom,
            dissolved,
            rect: geom.rect(),
            segments: SegmentIndex::from_segments(segment_list),
            locator,
            is_areal,
            is_line,
            line_endpoints,
            points,
        }
    }

    /// The source geometry.
    pub fn geometry(&self) -> &'a Geom {
        self.geom
    }

    /// Locates a point relative to the prepared geometry.
    pub fn locate(&self, point: &Coord) -> Location {
        let mut acc = LocationAccumulator::default();
        match self.locator.locate(point) {
            Location::Interior => acc.area_interior = true,
            Location::Boundary => acc.area_boundary = true,
            Location::Exterior => {}
        }
        if self.is_areal {
            return acc.location();
        }

        acc.line_endpoints = self.line_endpoints.get(&point.key()).copied().unwrap_or(0);
        acc.point = self.points.contains(&point.key());
        acc.line_interior = self
            .segments
            .query(&Rect::from_point(point))
            .into_iter()
            .filter(|s| self.is_line[s.component])
            .any(|s| {
                s.segment().rect().contains(point)
                    && Orientation::triplet(&s.start, &s.end, point) == Orientation::Collinear
            });

        acc.location()
    }

    fn rect_intersects(&self, other: &Geom) -> bool {
        match (self.rect, other.rect()) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }

    fn rect_covers(&self, other: &Geom) -> bool {
        match (self.rect, other.rect()) {
            (Some(a), Some(b)) => a.contains_rect(&b),
            _ => false,
        }
    }

    fn any_segment_intersects(&self, other: &Geom) -> bool {
        if self.segments.len() == 0 {
            return false;
        }
        segments(other)
            .iter()
            .any(|s| self.segments.intersects(&s.segment()))
    }

    /// Geometries have at least one common point.
    pub fn intersects(&self, other: &Geom) -> bool {
        if !self.rect_intersects(other) {
            return false;
        }

        let other_primitives = other.primitives();
        if other_primitives
            .iter()
            .any(|p| self.locate(first_coord(p)) != Location::Exterior)
        {
            return true;
        }

        if self.any_segment_intersects(other) {
            return true;
        }

        let other_prepared = PreparedGeometry::new(other);
        self.geom
            .primitives()
            .iter()
            .any(|p| other_prepared.locate(first_coord(p)) != Location::Exterior)
    }

    /// Geometries have no common point.
    pub fn disjoint(&self, other: &Geom) -> bool {
        !self.intersects(other)
    }

    /// No point of `other` lies in the exterior of the prepared geometry and their interiors intersect.
    pub fn contains(&self, other: &Geom) -> bool {
        if !self.rect_covers(other) {
            return false;
        }

        if self.is_areal && is_puntal(other) {
            let mut interior = false;
            for primitive in other.primitives() {
                match self.locate(first_coord(&primitive)) {
                    Location::Exterior => return false,
                    Location::Interior => interior = true,
                    Location::Boundary => {}
                }
            }
            return interior;
        }

        relate(&self.dissolved, other).is_contains()
    }

    /// No point of `other` lies in the exterior of the prepared geometry.
    pub fn covers(&self, other: &Geom) -> bool {
        if !self.rect_covers(other) {
            return false;
        }

        if self.is_areal && is_puntal(other) {
            return other
                .primitives()
                .iter()
                .all(|p| self.locate(first_coord(p)) != Location::Exterior);
        }

        relate(&self.dissolved, other).is_covers()
    }

    /// `other` lies entirely in the interior of the prepared geometry, not touching its boundary.
    pub fn contains_properly(&self, other: &Geom) -> bool {
        if !self.rect_covers(other) {
            return false;
        }

        if !self.is_areal {
            return relate(&self.dissolved, other).is_contains_properly();
        }

        if self.any_segment_intersects(other) {
            return false;
        }

        if !other
            .primitives()
            .iter()
            .all(|p| self.locate(first_coord(p)) == Location::Interior)
        {
            return false;
        }

        if other.has_area() {
            let other_locator = IndexedPointLocator::new(&dissolve_areas(other));
            for primitive in self.dissolved.primitives() {
                let Primitive::Polygon(polygon) = primitive else {
                    continue;
                };
                for ring in polygon.rings() {
                    if other_locator.locate(&ring.coords()[0]) != Location::Exterior {
                        return false;
                    }
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::locate;
    use crate::tests::{fixtures, geom};

    #[test]
    fn polygon_predicates() {
        let square = geom("POLYGON((0 0, 0 2, 2 2, 2 0, 0 0))");
        let prepared = PreparedGeometry::new(&square);

        assert!(prepared.contains(&geom("POINT(1 1)")));
        assert!(!prepared.contains(&geom("POINT(3 3)")));
        assert!(!prepared.contains(&geom("POINT(0 1)")));
        assert!(prepared.covers(&geom("POINT(0 1)")));
        assert!(prepared.intersects(&geom("POINT(0 0)")));
        assert!(prepared.intersects(&geom("POLYGON((1 1, 1 3, 3 3, 3 1, 1 1))")));
        assert!(!prepared.intersects(&geom("LINESTRING(3 3, 4 4)")));
        assert!(prepared.disjoint(&geom("LINESTRING(3 3, 4 4)")));
        assert!(prepared.contains_properly(&geom("LINESTRING(0.5 0.5, 1.5 1.5)")));
        assert!(!prepared.contains_properly(&geom("LINESTRING(0 0.5, 1.5 1.5)")));
        assert!(prepared.contains(&geom("LINESTRING(0 0.5, 1.5 1.5)")));
    }

    #[test]
    fn containment_without_boundary_contact() {
        let big = geom("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0))");
        let prepared = PreparedGeometry::new(&big);
        let small = geom("POLYGON((2 2, 4 2, 4 4, 2 4, 2 2))");
        assert!(prepared.intersects(&small));
        assert!(prepared.contains_properly(&small));

        let holed = geom("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))");
        let prepared = PreparedGeometry::new(&holed);
        assert!(!prepared.contains_properly(&geom("POLYGON((2 2, 8 2, 8 8, 2 8, 2 2))")));
        assert!(!prepared.intersects(&geom("POINT(5 5)")));

        let inner = geom("POINT(5 5)");
        let prepared_point = PreparedGeometry::new(&inner);
        assert!(prepared_point.intersects(&big));
    }

    #[test]
    fn locate_matches_plain_location() {
        let lines = geom("MULTILINESTRING ((0 0, 2 0, 2 2), (2 2, 4 4), (5 5, 6 5, 6 6, 5 5))");
        let prepared = PreparedGeometry::new(&lines);
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (2.0, 2.0), (4.0, 4.0), (5.0, 5.0), (3.0, 0.0)] {
            let point = Coord::new(x, y);
            assert_eq!(prepared.locate(&point), locate(&point, &lines), "{x} {y}");
        }
    }

    #[test]
    fn collection_with_overlapping_parts() {
        let collection = geom(
            "GEOMETRYCOLLECTION(POLYGON((0 0, 0 2, 2 2, 2 0, 0 0)), POLYGON((1 1, 1 3, 3 3, 3 1, 1 1)))",
        );
        let prepared = PreparedGeometry::new(&collection);
        let point = geom("POINT(1.5 1.5)");

        assert_eq!(prepared.locate(&Coord::new(1.5, 1.5)), Location::Interior);
        assert_eq!(prepared.locate(&Coord::new(2.0, 1.5)), Location::Interior);
        assert!(prepared.intersects(&point));
        assert!(prepared.contains(&point));
        assert!(prepared.contains_properly(&point));
        assert!(prepared.contains_properly(&geom("LINESTRING(0.5 1.5, 1.5 1.5)")));
        assert!(prepared.covers(&geom("POLYGON((0 0, 0 2, 2 2, 2 0, 0 0))")));
        assert!(!prepared.contains(&geom("POINT(2.5 0.5)")));

        let point_prepared = PreparedGeometry::new(&point);
        assert!(point_prepared.intersects(&collection));
    }

    #[test]
    fn same_answers_as_relate() {
        let fixtures = fixtures();
        for a in &fixtures {
            let prepared = PreparedGeometry::new(a);
            for b in &fixtures {
                let matrix = relate(a, b);
                assert_eq!(prepared.intersects(b), matrix.is_intersects(), "{a:?} {b:?}");
                assert_eq!(prepared.contains(b), matrix.is_contains(), "{a:?} {b:?}");
                assert_eq!(prepared.covers(b), matrix.is_covers(), "{a:?} {b:?}");
                assert_eq!(
                    prepared.contains_properly(b),
                    matrix.is_contains_properly(),
                    "{a:?} {b:?}"
                );
            }
        }
    }
}
