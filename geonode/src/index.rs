//! R-tree over the segments of a geometry.

use geonode_types::{Coord, Geom, Primitive, Rect, Segment};
use rstar::{RTree, RTreeObject, AABB};

/// A segment of a line or polygon ring together with its position in the source geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IndexedSegment {
    pub start: Coord,
    pub end: Coord,
    /// Index of the primitive in [`Geom::primitives`].
    pub component: usize,
    /// Ring of a polygon, `0` for shells and lines.
    pub ring: usize,
    /// Position of the segment in its line or ring.
    pub position: usize,
}

impl IndexedSegment {
    pub fn segment(&self) -> Segment<'_, Coord> {
        Segment(&self.start, &self.end)
    }
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.start.x, self.start.y], [self.end.x, self.end.y])
    }
}

pub(crate) fn envelope(rect: &Rect) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.x_min, rect.y_min], [rect.x_max, rect.y_max])
}

/// Lists all segments of the lines and rings of the geometry.
pub(crate) fn segments(geom: &Geom) -> Vec<IndexedSegment> {
    let mut result = vec![];
    for (component, primitive) in geom.primitives().into_iter().enumerate() {
        let rings: Vec<_> = match primitive {
            Primitive::Point(_) => continue,
            Primitive::Line(line) => vec![line],
            Primitive::Polygon(polygon) => polygon.rings().collect(),
        };
        for (ring, line) in rings.into_iter().enumerate() {
            for (position, pair) in line.coords().windows(2).enumerate() {
                result.push(IndexedSegment {
                    start: pair[0],
                    end: pair[1],
                    component,
                    ring,
                    position,
                });
            }
        }
    }
    result
}

/// Spatial index answering "which segments are near" queries.
pub(crate) struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    pub fn from_segments(segments: Vec<IndexedSegment>) -> Self {
        Self {
            tree: RTree::bulk_load(segments),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Segments whose bounding rects intersect the given rect.
    pub fn query(&self, rect: &Rect) -> Vec<&IndexedSegment> {
        self.tree
            .locate_in_envelope_intersecting(&envelope(rect))
            .collect()
    }

    /// Any indexed segment has a common point with the given one.
    pub fn intersects(&self, segment: &Segment<'_, Coord>) -> bool {
        let query = envelope(&segment.rect());
        self.tree
            .locate_in_envelope_intersecting(&query)
            .any(|candidate| candidate.segment().intersects(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::geom;

    #[test]
    fn segments_of_polygon_with_hole() {
        let polygon = geom("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 2 8, 8 8, 8 2, 2 2))");
        let segments = segments(&polygon);
        assert_eq!(segments.len(), 8);
        assert_eq!(segments[4].ring, 1);
        assert_eq!(segments[4].start, Coord::new(2.0, 2.0));
        assert_eq!(segments[7].position, 3);
    }

    #[test]
    fn queries() {
        let index = SegmentIndex::from_segments(segments(&geom("LINESTRING (0 0, 10 0, 10 10)")));
        assert_eq!(index.len(), 2);
        assert_eq!(index.query(&Rect::new(9.0, 5.0, 11.0, 6.0)).len(), 1);

        let a = Coord::new(5.0, -1.0);
        let b = Coord::new(5.0, 1.0);
        assert!(index.intersects(&Segment(&a, &b)));

        let c = Coord::new(5.0, 2.0);
        let d = Coord::new(5.0, 3.0);
        assert!(!index.intersects(&Segment(&c, &d)));
    }
}
