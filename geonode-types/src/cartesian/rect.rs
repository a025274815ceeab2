use crate::cartesian::{CartesianPoint2d, Coord};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum x.
    pub x_min: f64,
    /// Minimum y.
    pub y_min: f64,
    /// Maximum x.
    pub x_max: f64,
    /// Maximum y.
    pub y_max: f64,
}

impl Rect {
    /// Creates a rect, normalizing the corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x_min: x1.min(x2),
            y_min: y1.min(y2),
            x_max: x1.max(x2),
            y_max: y1.max(y2),
        }
    }

    /// Width of the rect.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the rect.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Centre point.
    pub fn center(&self) -> Coord {
        Coord::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Corner with minimal coordinates.
    pub fn min(&self) -> Coord {
        Coord::new(self.x_min, self.y_min)
    }

    /// Corner with maximal coordinates.
    pub fn max(&self) -> Coord {
        Coord::new(self.x_max, self.y_max)
    }

    /// Smallest rect containing both.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Grows the rect by `amount` in every direction.
    pub fn expand(&self, amount: f64) -> Self {
        Self {
            x_min: self.x_min - amount,
            y_min: self.y_min - amount,
            x_max: self.x_max + amount,
            y_max: self.y_max + amount,
        }
    }

    /// Degenerate rect of a single point.
    pub fn from_point(p: &impl CartesianPoint2d<Num = f64>) -> Self {
        Self {
            x_min: p.x(),
            x_max: p.x(),
            y_min: p.y(),
            y_max: p.y(),
        }
    }

    /// Bounding rect of the points, `None` if there are none.
    pub fn from_points<'a, P: CartesianPoint2d<Num = f64> + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |rect, p| {
            rect.merge(Self::from_point(p))
        }))
    }

    /// Point lies inside or on the border.
    pub fn contains(&self, point: &impl CartesianPoint2d<Num = f64>) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }

    /// `other` lies completely inside or on the border.
    pub fn contains_rect(&self, other: &Self) -> bool {
        self.x_min <= other.x_min
            && self.y_min <= other.y_min
            && self.x_max >= other.x_max
            && self.y_max >= other.y_max
    }

    /// Rects share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points() {
        let points = [
            Coord::new(1.0, 5.0),
            Coord::new(-2.0, 3.0),
            Coord::new(4.0, -1.0),
        ];
        assert_eq!(
            Rect::from_points(points.iter()),
            Some(Rect::new(-2.0, -1.0, 4.0, 5.0))
        );
        assert_eq!(Rect::from_points(Vec::<Coord>::new().iter()), None);
    }

    #[test]
    fn intersects_touching() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!(a.intersects(&Rect::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!a.intersects(&Rect::new(1.1, 0.0, 2.0, 2.0)));
        assert!(a.contains_rect(&Rect::new(0.2, 0.2, 1.0, 0.5)));
        assert!(a.contains(&Coord::new(0.0, 0.5)));
    }
}
