//! Straight line segments and their intersections.

use crate::cartesian::{CartesianPoint2d, Coord, Orientation, Rect};
use nalgebra::Vector2;
use num_traits::{One, Zero};

/// A straight line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

/// Result of intersecting two segments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SegmentIntersection {
    /// Segments have no common point.
    None,
    /// Segments share exactly one point.
    Point(Coord),
    /// Segments are collinear and overlap along the given sub-segment.
    Collinear(Coord, Coord),
}

impl<'a, P: CartesianPoint2d> Segment<'a, P> {
    /// Shortest euclidean distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * otherwise the returned value is the smaller one of the distances between the point and the segment's endpoints
    pub fn distance_to_point_sq<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        point: &Point,
    ) -> P::Num {
        if self.0.equal(self.1) {
            return self.0.distance_sq(point);
        }

        let ds = self.1.sub(self.0);
        let dp = point.sub(self.0);
        let ds_len = ds.x * ds.x + ds.y * ds.y;

        let r = (dp.x * ds.x + dp.y * ds.y) / ds_len;
        if r <= P::Num::zero() {
            self.0.distance_sq(point)
        } else if r >= P::Num::one() {
            self.1.distance_sq(point)
        } else {
            let s = (dp.y * ds.x - dp.x * ds.y) / ds_len;
            (s * s) * ds_len
        }
    }
}

fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

impl Segment<'_, Coord> {
    /// Bounding rect of the segment.
    pub fn rect(&self) -> Rect {
        Rect::new(self.0.x, self.0.y, self.1.x, self.1.y)
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        self.0.distance(self.1)
    }

    /// Start and end coincide.
    pub fn is_degenerate(&self) -> bool {
        self.0.equal(self.1)
    }

    /// Middle point.
    pub fn midpoint(&self) -> Coord {
        self.0.midpoint(self.1)
    }

    /// Position of the projection of `point` on the segment line: 0 at start, 1 at end.
    pub fn parameter(&self, point: &Coord) -> f64 {
        let ds = self.1.sub(self.0);
        let len = ds.x * ds.x + ds.y * ds.y;
        if len == 0.0 {
            return 0.0;
        }
        let dp = point.sub(self.0);
        (dp.x * ds.x + dp.y * ds.y) / len
    }

    /// Point lies on the segment within `tolerance`.
    pub fn contains_point(&self, point: &Coord, tolerance: f64) -> bool {
        if !self.rect().expand(tolerance).contains(point) {
            return false;
        }
        self.distance_to_point_sq(point) <= tolerance * tolerance
    }

    /// Computes the common points of two segments.
    ///
    /// Endpoint touches return the touching endpoint itself, so shared vertices are reported exactly.
    /// Proper crossings are computed and clamped into both segments' bounding rects.
    pub fn intersection(&self, other: &Segment<'_, Coord>) -> SegmentIntersection {
        let (p1, p2, q1, q2) = (self.0, self.1, other.0, other.1);
        let self_rect = self.rect();
        let other_rect = other.rect();
        if !self_rect.intersects(&other_rect) {
            return SegmentIntersection::None;
        }

        let o1 = Orientation::triplet(p1, p2, q1);
        let o2 = Orientation::triplet(p1, p2, q2);
        let o3 = Orientation::triplet(q1, q2, p1);
        let o4 = Orientation::triplet(q1, q2, p2);

        if o1 == Orientation::Collinear && o2 == Orientation::Collinear {
            if o3 != Orientation::Collinear || o4 != Orientation::Collinear {
                return SegmentIntersection::None;
            }
            return self.collinear_intersection(other);
        }

        if o1 != Orientation::Collinear && o1 == o2 {
            return SegmentIntersection::None;
        }
        if o3 != Orientation::Collinear && o3 == o4 {
            return SegmentIntersection::None;
        }

        for (orientation, rect, point) in [
            (o1, &self_rect, q1),
            (o2, &self_rect, q2),
            (o3, &other_rect, p1),
            (o4, &other_rect, p2),
        ] {
            if orientation == Orientation::Collinear && rect.contains(point) {
                return SegmentIntersection::Point(*point);
            }
        }

        if [o1, o2, o3, o4].contains(&Orientation::Collinear) {
            return SegmentIntersection::None;
        }

        let r = p2.sub(p1);
        let s = q2.sub(q1);
        let denominator = cross(r, s);
        if denominator == 0.0 {
            return SegmentIntersection::None;
        }

        let t = cross(q1.sub(p1), s) / denominator;
        let x = (p1.x + t * r.x)
            .max(self_rect.x_min.max(other_rect.x_min))
            .min(self_rect.x_max.min(other_rect.x_max));
        let y = (p1.y + t * r.y)
            .max(self_rect.y_min.max(other_rect.y_min))
            .min(self_rect.y_max.min(other_rect.y_max));

        SegmentIntersection::Point(Coord::new(x, y))
    }

    fn collinear_intersection(&self, other: &Segment<'_, Coord>) -> SegmentIntersection {
        let self_rect = self.rect();
        let other_rect = other.rect();
        let mut hits: Vec<Coord> = Vec::with_capacity(4);
        for (point, rect) in [
            (other.0, &self_rect),
            (other.1, &self_rect),
            (self.0, &other_rect),
            (self.1, &other_rect),
        ] {
            if rect.contains(point) && !hits.iter().any(|h| h.equal(point)) {
                hits.push(*point);
            }
        }

        let axis = if self.is_degenerate() { other } else { self };
        hits.sort_by(|a, b| axis.parameter(a).total_cmp(&axis.parameter(b)));

        match (hits.first(), hits.last()) {
            (Some(first), Some(last)) if hits.len() > 1 => {
                SegmentIntersection::Collinear(*first, *last)
            }
            (Some(first), _) => SegmentIntersection::Point(*first),
            _ => SegmentIntersection::None,
        }
    }

    /// Returns true, if the segment has at least one common point with the `other` segment.
    pub fn intersects(&self, other: &Segment<'_, Coord>) -> bool {
        self.intersection(other) != SegmentIntersection::None
    }

    /// Shortest distance between two segments.
    pub fn distance_to_segment(&self, other: &Segment<'_, Coord>) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }

        self.distance_to_point_sq(other.0)
            .min(self.distance_to_point_sq(other.1))
            .min(other.distance_to_point_sq(self.0))
            .min(other.distance_to_point_sq(self.1))
            .sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn distance_to_point() {
        let (a, b) = (c(0.0, 0.0), c(2.0, 0.0));
        let segment = Segment(&a, &b);
        assert_abs_diff_eq!(segment.distance_to_point_sq(&c(1.0, 1.0)), 1.0);
        assert_abs_diff_eq!(segment.distance_to_point_sq(&c(3.0, 0.0)), 1.0);
        assert_abs_diff_eq!(segment.distance_to_point_sq(&c(-1.0, -1.0)), 2.0);
    }

    #[test]
    fn proper_crossing() {
        let (a, b, p, q) = (c(0.0, 0.0), c(2.0, 2.0), c(0.0, 2.0), c(2.0, 0.0));
        let result = Segment(&a, &b).intersection(&Segment(&p, &q));
        assert_matches!(result, SegmentIntersection::Point(point) => {
            assert_abs_diff_eq!(point, c(1.0, 1.0), epsilon = 1e-12);
        });
    }

    #[test]
    fn endpoint_touch_is_exact() {
        let (a, b, p, q) = (c(0.0, 0.0), c(3.0, 0.0), c(1.0, 0.0), c(1.0, 5.0));
        assert_eq!(
            Segment(&a, &b).intersection(&Segment(&p, &q)),
            SegmentIntersection::Point(c(1.0, 0.0))
        );
    }

    #[test]
    fn collinear_overlap() {
        let (a, b, p, q) = (c(0.0, 0.0), c(4.0, 0.0), c(6.0, 0.0), c(2.0, 0.0));
        assert_eq!(
            Segment(&a, &b).intersection(&Segment(&p, &q)),
            SegmentIntersection::Collinear(c(2.0, 0.0), c(4.0, 0.0))
        );

        let (r, s) = (c(4.0, 0.0), c(5.0, 0.0));
        assert_eq!(
            Segment(&a, &b).intersection(&Segment(&r, &s)),
            SegmentIntersection::Point(c(4.0, 0.0))
        );
    }

    #[test]
    fn disjoint() {
        let (a, b, p, q) = (c(0.0, 0.0), c(1.0, 1.0), c(1.0, 0.0), c(3.0, -2.0));
        assert_eq!(
            Segment(&a, &b).intersection(&Segment(&p, &q)),
            SegmentIntersection::None
        );
        assert_abs_diff_eq!(
            Segment(&a, &b).distance_to_segment(&Segment(&p, &q)),
            0.5f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn degenerate_segment() {
        let (a, p, q) = (c(1.0, 1.0), c(0.0, 0.0), c(2.0, 2.0));
        assert_eq!(
            Segment(&a, &a).intersection(&Segment(&p, &q)),
            SegmentIntersection::Point(a)
        );
        let off = c(1.0, 1.5);
        assert_eq!(
            Segment(&off, &off).intersection(&Segment(&p, &q)),
            SegmentIntersection::None
        );
    }
}
