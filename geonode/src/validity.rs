//! Validity and simplicity checks.
//!
//! A geometry is *valid* when it satisfies the simple features rules for its kind: polygon rings do not cross or
//! touch themselves, holes lie inside their shell and do not nest, the interior of every polygon is connected and the
//! polygons of a multi polygon do not overlap. Line strings only need two distinct points.
//!
//! A geometry is *simple* when it has no anomalous points: lines do not intersect themselves except at the closing
//! vertex, lines of a multi line string meet only at their endpoints, and multi points have no repeated points.

use std::collections::BTreeMap;

use geonode_types::{
    CartesianPoint2d, Coord, Geom, Geometry, LineString, Polygon, Primitive, SegmentIntersection,
};
use thiserror::Error;

use crate::index::{IndexedSegment, SegmentIndex};
use crate::location::{IndexedPointLocator, Location};

/// The first problem found that makes a geometry invalid, with the location where it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidityError {
    /// Line or ring has fewer distinct vertices than its kind requires.
    #[error("too few distinct points in geometry component at {0:?}")]
    TooFewPoints(Coord),
    /// Coordinate is NaN or infinite.
    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(Coord),
    /// Ring touches or crosses itself.
    #[error("ring self-intersection at {0:?}")]
    RingSelfIntersection(Coord),
    /// Two rings cross or share a segment.
    #[error("self-intersection at {0:?}")]
    SelfIntersection(Coord),
    /// Hole is not inside the polygon shell.
    #[error("hole lies outside shell at {0:?}")]
    HoleOutsideShell(Coord),
    /// Hole lies inside another hole.
    #[error("holes are nested at {0:?}")]
    NestedHoles(Coord),
    /// Rings touch in a way that splits the polygon interior.
    #[error("interior is disconnected at {0:?}")]
    DisconnectedInterior(Coord),
    /// Polygon of a multi polygon lies inside another one.
    #[error("nested shells at {0:?}")]
    NestedShells(Coord),
}

impl ValidityError {
    /// Where the problem was found.
    pub fn location(&self) -> Coord {
        match self {
            Self::TooFewPoints(c)
            | Self::InvalidCoordinate(c)
            | Self::RingSelfIntersection(c)
            | Self::SelfIntersection(c)
            | Self::HoleOutsideShell(c)
            | Self::NestedHoles(c)
            | Self::DisconnectedInterior(c)
            | Self::NestedShells(c) => *c,
        }
    }
}

/// Returns the first validity problem of the geometry, or `None` if it is valid.
pub fn validity_reason(geom: &Geom) -> Option<ValidityError> {
    check(geom).err()
}

/// Geometry satisfies the validity rules of its kind.
pub fn is_valid(geom: &Geom) -> bool {
    validity_reason(geom).is_none()
}

fn check(geom: &Geom) -> Result<(), ValidityError> {
    if let Some(coord) = geom.coords().into_iter().find(|c| !c.is_finite()) {
        return Err(ValidityError::InvalidCoordinate(*coord));
    }

    match geom {
        Geom::Point(_) | Geom::MultiPoint(_) => Ok(()),
        Geom::LineString(line) => check_line(line),
        Geom::MultiLineString(lines) => lines.parts().iter().try_for_each(check_line),
        Geom::Polygon(polygon) => check_polygon(polygon),
        Geom::MultiPolygon(polygons) => {
            polygons.parts().iter().try_for_each(check_polygon)?;
            let parts: Vec<&Polygon> = polygons.parts().iter().filter(|p| !p.is_empty()).collect();
            check_polygon_set(&parts)
        }
        Geom::GeometryCollection(collection) => collection.parts().iter().try_for_each(check),
    }
}

fn first_coord(line: &LineString) -> Coord {
    line.coords().first().copied().unwrap_or_default()
}

fn check_line(line: &LineString) -> Result<(), ValidityError> {
    if !line.is_empty() && line.distinct_count() < 2 {
        return Err(ValidityError::TooFewPoints(first_coord(line)));
    }
    Ok(())
}

fn line_segments(coords: &[Coord], component: usize, ring: usize) -> Vec<IndexedSegment> {
    coords
        .windows(2)
        .enumerate()
        .map(|(position, pair)| IndexedSegment {
            start: pair[0],
            end: pair[1],
            component,
            ring,
            position,
        })
        .collect()
}

/// Candidates from the index that come after `segment` in (component, ring, position) order, sorted by that order.
fn later_candidates<'a>(index: &'a SegmentIndex, segment: &IndexedSegment) -> Vec<&'a IndexedSegment> {
    let key = |s: &IndexedSegment| (s.component, s.ring, s.position);
    let mut candidates: Vec<_> = index
        .query(&segment.segment().rect())
        .into_iter()
        .filter(|c| key(*c) > key(segment))
        .collect();
    candidates.sort_by_key(|c| key(*c));
    candidates
}

/// First point where the line meets itself anywhere except the shared vertex of consecutive segments and the closing
/// vertex of a closed line.
fn self_intersection(line: &LineString) -> Option<Coord> {
    let coords = line.deduped().into_coords();
    if coords.len() < 3 {
        return None;
    }
    let closed = coords[0].equal(&coords[coords.len() - 1]);
    let last = coords.len() - 2;

    let segments = line_segments(&coords, 0, 0);
    let index = SegmentIndex::from_segments(segments.clone());
    for s in &segments {
        for t in later_candidates(&index, s) {
            let shared = if t.position == s.position + 1 {
                Some(s.end)
            } else if closed && s.position == 0 && t.position == last {
                Some(s.start)
            } else {
                None
            };

            match s.segment().intersection(&t.segment()) {
                SegmentIntersection::None => {}
                SegmentIntersection::Point(p) if shared.is_some_and(|v| v.equal(&p)) => {}
                SegmentIntersection::Point(p) => return Some(p),
                SegmentIntersection::Collinear(p, q) => {
                    return Some(if shared.is_some_and(|v| v.equal(&p)) { q } else { p });
                }
            }
        }
    }

    None
}

fn is_endpoint_of(point: &Coord, segment: &IndexedSegment) -> bool {
    point.equal(&segment.start) || point.equal(&segment.end)
}

/// Ring or polygon pair meeting at a single point.
struct Touch {
    a: usize,
    b: usize,
    at: Coord,
}

/// Finds where segments of different groups meet. Crossings and shared segments are errors; points where the groups
/// only touch are returned. Groups are identified by `group(segment)`.
fn group_touches(
    segments: Vec<IndexedSegment>,
    group: impl Fn(&IndexedSegment) -> usize,
) -> Result<Vec<Touch>, ValidityError> {
    let index = SegmentIndex::from_segments(segments.clone());
    let mut touches = vec![];
    for s in &segments {
        for t in later_candidates(&index, s) {
            let (a, b) = (group(s), group(t));
            if a == b {
                continue;
            }
            match s.segment().intersection(&t.segment()) {
                SegmentIntersection::None => {}
                SegmentIntersection::Collinear(p, _) => {
                    return Err(ValidityError::SelfIntersection(p));
                }
                SegmentIntersection::Point(p) => {
                    if !is_endpoint_of(&p, s) && !is_endpoint_of(&p, t) {
                        return Err(ValidityError::SelfIntersection(p));
                    }
                    touches.push(Touch { a, b, at: p });
                }
            }
        }
    }
    Ok(touches)
}

/// Vertices and segment midpoints of a ring, used to probe on which side of another ring it lies.
fn probes(ring: &LineString) -> impl Iterator<Item = Coord> + '_ {
    ring.coords().iter().copied().chain(
        ring.coords()
            .windows(2)
            .map(|pair| pair[0].midpoint(&pair[1])),
    )
}

fn ring_locator(ring: &LineString) -> IndexedPointLocator {
    IndexedPointLocator::new(&Geom::Polygon(Polygon::new(ring.clone(), vec![])))
}

fn check_polygon(polygon: &Polygon) -> Result<(), ValidityError> {
    if polygon.is_empty() {
        return Ok(());
    }

    let rings: Vec<LineString> = polygon.rings().map(LineString::deduped).collect();
    for ring in &rings {
        if ring.coords().len() < 4 {
            return Err(ValidityError::TooFewPoints(first_coord(ring)));
        }
        if let Some(point) = self_intersection(ring) {
            return Err(ValidityError::RingSelfIntersection(point));
        }
    }

    let segments = rings
        .iter()
        .enumerate()
        .flat_map(|(ring, line)| line_segments(line.coords(), 0, ring))
        .collect();
    let touches = group_touches(segments, |s| s.ring)?;

    let shell = ring_locator(&rings[0]);
    for hole in &rings[1..] {
        if let Some(outside) = probes(hole).find(|p| shell.locate(p) == Location::Exterior) {
            return Err(ValidityError::HoleOutsideShell(outside));
        }
    }

    let holes: Vec<(IndexedPointLocator, &LineString)> =
        rings[1..].iter().map(|hole| (ring_locator(hole), hole)).collect();
    for (i, (outer, outer_ring)) in holes.iter().enumerate() {
        for (inner, inner_ring) in &holes[i + 1..] {
            let nested = probes(inner_ring)
                .find(|p| outer.locate(p) == Location::Interior)
                .or_else(|| probes(outer_ring).find(|p| inner.locate(p) == Location::Interior));
            if let Some(point) = nested {
                return Err(ValidityError::NestedHoles(point));
            }
        }
    }

    check_connected(rings.len(), &touches)
}

/// Union-find over rings and touch points. A cycle means some part of the interior is enclosed by touching rings.
struct Components {
    parent: Vec<usize>,
}

impl Components {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn add(&mut self) -> usize {
        self.parent.push(self.parent.len());
        self.parent.len() - 1
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// Joins the sets of the two nodes. Returns false if they were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }
        self.parent[a] = b;
        true
    }
}

fn check_connected(ring_count: usize, touches: &[Touch]) -> Result<(), ValidityError> {
    let mut points: BTreeMap<(u64, u64), (Coord, Vec<usize>)> = BTreeMap::new();
    for touch in touches {
        let (_, rings) = points
            .entry(touch.at.key())
            .or_insert_with(|| (touch.at, vec![]));
        for ring in [touch.a, touch.b] {
            if !rings.contains(&ring) {
                rings.push(ring);
            }
        }
    }

    let mut components = Components::new(ring_count);
    for (coord, rings) in points.values() {
        let node = components.add();
        for &ring in rings {
            if !components.union(node, ring) {
                return Err(ValidityError::DisconnectedInterior(*coord));
            }
        }
    }

    Ok(())
}

fn check_polygon_set(polygons: &[&Polygon]) -> Result<(), ValidityError> {
    if polygons.len() < 2 {
        return Ok(());
    }

    let segments = polygons
        .iter()
        .enumerate()
        .flat_map(|(component, polygon)| {
            polygon
                .rings()
                .enumerate()
                .flat_map(move |(ring, line)| line_segments(line.coords(), component, ring))
        })
        .collect();
    group_touches(segments, |s| s.component)?;

    let areas: Vec<(IndexedPointLocator, &Polygon)> = polygons
        .iter()
        .map(|polygon| (IndexedPointLocator::new(&Geom::Polygon((*polygon).clone())), *polygon))
        .collect();
    for (i, (locator, polygon)) in areas.iter().enumerate() {
        for (other_locator, other) in &areas[i + 1..] {
            if !polygon.rect().zip(other.rect()).is_some_and(|(a, b)| a.intersects(&b)) {
                continue;
            }
            let nested = probes(other.exterior())
                .find(|p| locator.locate(p) == Location::Interior)
                .or_else(|| {
                    probes(polygon.exterior()).find(|p| other_locator.locate(p) == Location::Interior)
                });
            if let Some(point) = nested {
                return Err(ValidityError::NestedShells(point));
            }
        }
    }

    Ok(())
}

/// Geometry has no anomalous points, such as self-intersections of lines or repeated points.
pub fn is_simple(geom: &Geom) -> bool {
    non_simple_point(geom).is_none()
}

fn non_simple_point(geom: &Geom) -> Option<Coord> {
    match geom {
        Geom::Point(_) => None,
        Geom::MultiPoint(_) => {
            let mut coords: Vec<Coord> = geom.coords().into_iter().copied().collect();
            coords.sort_by(Coord::cmp_xy);
            coords
                .windows(2)
                .find(|pair| pair[0].equal(&pair[1]))
                .map(|pair| pair[0])
        }
        Geom::LineString(line) => self_intersection(line),
        Geom::MultiLineString(lines) => lines
            .parts()
            .iter()
            .find_map(self_intersection)
            .or_else(|| lines_meeting_inside(lines.parts())),
        Geom::Polygon(_) | Geom::MultiPolygon(_) => {
            geom.primitives().into_iter().find_map(|primitive| match primitive {
                Primitive::Polygon(polygon) => polygon.rings().find_map(self_intersection),
                _ => None,
            })
        }
        Geom::GeometryCollection(collection) => {
            collection.parts().iter().find_map(non_simple_point)
        }
    }
}

fn is_line_end(point: &Coord, line: &LineString) -> bool {
    match (line.coords().first(), line.coords().last()) {
        (Some(first), Some(last)) => {
            !line.is_closed() && (point.equal(first) || point.equal(last))
        }
        _ => false,
    }
}

/// First point where two lines meet, unless it is an endpoint of both of them.
fn lines_meeting_inside(lines: &[LineString]) -> Option<Coord> {
    let segments: Vec<IndexedSegment> = lines
        .iter()
        .enumerate()
        .flat_map(|(component, line)| line_segments(line.coords(), component, 0))
        .filter(|s| !s.segment().is_degenerate())
        .collect();
    let index = SegmentIndex::from_segments(segments.clone());

    for s in &segments {
        for t in later_candidates(&index, s) {
            if s.component == t.component {
                continue;
            }
            match s.segment().intersection(&t.segment()) {
                SegmentIntersection::None => {}
                SegmentIntersection::Collinear(p, _) => return Some(p),
                SegmentIntersection::Point(p) => {
                    if !is_line_end(&p, &lines[s.component]) || !is_line_end(&p, &lines[t.component]) {
                        return Some(p);
                    }
                }
            }
        }
    }

    None
}

/// Line string is closed and simple.
pub fn is_ring(geom: &Geom) -> bool {
    match geom {
        Geom::LineString(line) => {
            !line.is_empty() && line.is_closed() && self_intersection(line).is_none()
        }
        _ => false,
    }
}
