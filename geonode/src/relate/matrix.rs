use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeonodeError;
use crate::location::Location;

/// Dimension of an intersection of two point sets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Sets do not intersect (`F`).
    Empty,
    /// Intersection is a set of points (`0`).
    Point,
    /// Intersection contains curves (`1`).
    Curve,
    /// Intersection contains areas (`2`).
    Surface,
}

impl Dimension {
    /// Character used for the dimension in a matrix string.
    pub fn symbol(&self) -> char {
        match self {
            Dimension::Empty => 'F',
            Dimension::Point => '0',
            Dimension::Curve => '1',
            Dimension::Surface => '2',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'F' | 'f' => Some(Dimension::Empty),
            '0' => Some(Dimension::Point),
            '1' => Some(Dimension::Curve),
            '2' => Some(Dimension::Surface),
            _ => None,
        }
    }

    /// Dimension of a geometry with the given topological dimension.
    pub fn from_topological(dimension: Option<usize>) -> Self {
        match dimension {
            None => Dimension::Empty,
            Some(0) => Dimension::Point,
            Some(1) => Dimension::Curve,
            Some(_) => Dimension::Surface,
        }
    }
}

/// DE-9IM matrix: dimensions of the pairwise intersections of the interior, boundary and exterior of two
/// geometries. Rows belong to the first geometry, columns to the second.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntersectionMatrix([[Dimension; 3]; 3]);

impl Default for IntersectionMatrix {
    fn default() -> Self {
        Self([[Dimension::Empty; 3]; 3])
    }
}

/// Checks that the pattern has 9 characters from `T F * 0 1 2`.
pub(crate) fn validate_pattern(pattern: &str) -> Result<(), GeonodeError> {
    let valid = pattern.chars().count() == 9
        && pattern
            .chars()
            .all(|c| matches!(c, 'T' | 't' | 'F' | 'f' | '*' | '0' | '1' | '2'));
    if valid {
        Ok(())
    } else {
        Err(GeonodeError::Argument(format!(
            "invalid intersection matrix pattern '{pattern}'"
        )))
    }
}

impl IntersectionMatrix {
    /// Dimension at the given row and column.
    pub fn get(&self, row: Location, column: Location) -> Dimension {
        self.0[row.index()][column.index()]
    }

    /// Sets the entry.
    pub fn set(&mut self, row: Location, column: Location, dimension: Dimension) {
        self.0[row.index()][column.index()] = dimension;
    }

    /// Raises the entry to at least `dimension`.
    pub fn set_at_least(&mut self, row: Location, column: Location, dimension: Dimension) {
        let entry = &mut self.0[row.index()][column.index()];
        if *entry < dimension {
            *entry = dimension;
        }
    }

    /// Matrix of the converse relation (rows and columns swapped).
    pub fn transposed(&self) -> Self {
        let mut result = Self::default();
        for row in 0..3 {
            for column in 0..3 {
                result.0[column][row] = self.0[row][column];
            }
        }
        result
    }

    /// Tests the matrix against a 9-character DE-9IM pattern.
    ///
    /// `T` matches any non-empty intersection, `F` an empty one, `*` anything and a digit that exact dimension.
    /// Fails with [`GeonodeError::Argument`] for malformed patterns.
    pub fn matches(&self, pattern: &str) -> Result<bool, GeonodeError> {
        validate_pattern(pattern)?;
        Ok(self.matches_unchecked(pattern))
    }

    fn matches_unchecked(&self, pattern: &str) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(pattern.chars())
            .all(|(dimension, symbol)| match symbol {
                '*' => true,
                'T' | 't' => *dimension != Dimension::Empty,
                other => Dimension::from_symbol(other) == Some(*dimension),
            })
    }

    fn is_true(&self, row: Location, column: Location) -> bool {
        self.get(row, column) != Dimension::Empty
    }

    /// Geometries have no point in common.
    pub fn is_disjoint(&self) -> bool {
        self.matches_unchecked("FF*FF****")
    }

    /// Geometries have at least one point in common.
    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    /// No point of the second geometry is outside the first one and their interiors intersect.
    pub fn is_contains(&self) -> bool {
        self.matches_unchecked("T*****FF*")
    }

    /// The first geometry is contained by the second.
    pub fn is_within(&self) -> bool {
        self.matches_unchecked("T*F**F***")
    }

    /// No point of the second geometry is outside the first one.
    pub fn is_covers(&self) -> bool {
        ["T*****FF*", "*T****FF*", "***T**FF*", "****T*FF*"]
            .iter()
            .any(|p| self.matches_unchecked(p))
    }

    /// No point of the first geometry is outside the second one.
    pub fn is_covered_by(&self) -> bool {
        ["T*F**F***", "*TF**F***", "**FT*F***", "**F*TF***"]
            .iter()
            .any(|p| self.matches_unchecked(p))
    }

    /// The second geometry lies in the interior of the first one.
    pub fn is_contains_properly(&self) -> bool {
        self.matches_unchecked("T**FF*FF*")
    }

    /// Topological equality.
    pub fn is_equals(&self) -> bool {
        self.matches_unchecked("T*F**FFF*")
    }

    /// Geometries touch only at their boundaries. Never true for two puntal geometries.
    pub fn is_touches(&self, dimension_a: Dimension, dimension_b: Dimension) -> bool {
        if dimension_a == Dimension::Point && dimension_b == Dimension::Point {
            return false;
        }
        ["FT*******", "F**T*****", "F***T****"]
            .iter()
            .any(|p| self.matches_unchecked(p))
    }

    /// Geometries have some but not all interior points in common, and the intersection has a lower dimension
    /// than the larger of the two.
    pub fn is_crosses(&self, dimension_a: Dimension, dimension_b: Dimension) -> bool {
        use Dimension::*;
        match (dimension_a, dimension_b) {
            (Point, Curve) | (Point, Surface) | (Curve, Surface) => {
                self.matches_unchecked("T*T******")
            }
            (Curve, Point) | (Surface, Point) | (Surface, Curve) => {
                self.matches_unchecked("T*****T**")
            }
            (Curve, Curve) => self.matches_unchecked("0********"),
            _ => false,
        }
    }

    /// Geometries of the same dimension share some but not all points, and the intersection has that dimension.
    pub fn is_overlaps(&self, dimension_a: Dimension, dimension_b: Dimension) -> bool {
        use Dimension::*;
        match (dimension_a, dimension_b) {
            (Point, Point) | (Surface, Surface) => self.matches_unchecked("T*T***T**"),
            (Curve, Curve) => self.matches_unchecked("1*T***T**"),
            _ => false,
        }
    }

    /// The interiors of both geometries intersect.
    pub fn is_interiors_intersect(&self) -> bool {
        self.is_true(Location::Interior, Location::Interior)
    }
}

impl Display for IntersectionMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for dimension in self.0.iter().flatten() {
            write!(f, "{}", dimension.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for IntersectionMatrix {
    type Err = GeonodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.chars().collect();
        if symbols.len() != 9 {
            return Err(GeonodeError::Argument(format!(
                "intersection matrix must have 9 entries, got '{s}'"
            )));
        }

        let mut matrix = Self::default();
        for (index, symbol) in symbols.into_iter().enumerate() {
            matrix.0[index / 3][index % 3] = Dimension::from_symbol(symbol).ok_or_else(|| {
                GeonodeError::Argument(format!("invalid dimension symbol '{symbol}' in '{s}'"))
            })?;
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn matrix(s: &str) -> IntersectionMatrix {
        s.parse().expect("valid matrix")
    }

    #[test]
    fn display_and_parse() {
        let m = matrix("212101212");
        assert_eq!(m.to_string(), "212101212");
        assert_eq!(m.get(Location::Boundary, Location::Boundary), Dimension::Point);
        assert_eq!(m.transposed(), m);
        assert_eq!(matrix("FF0FFF102").transposed().to_string(), "FF1FF00F2");
        assert_matches!("21210121".parse::<IntersectionMatrix>(), Err(GeonodeError::Argument(_)));
        assert_matches!("21210121X".parse::<IntersectionMatrix>(), Err(GeonodeError::Argument(_)));
    }

    #[test]
    fn pattern_matching() {
        let m = matrix("212101212");
        assert_eq!(m.matches("T*T***T**"), Ok(true));
        assert_eq!(m.matches("t*t***t**"), Ok(true));
        assert_eq!(m.matches("FF*FF****"), Ok(false));
        assert_eq!(m.matches("2********"), Ok(true));
        assert_eq!(m.matches("1********"), Ok(false));
        assert_matches!(m.matches("T*T"), Err(GeonodeError::Argument(_)));
        assert_matches!(m.matches("T*T***T*X"), Err(GeonodeError::Argument(_)));
    }

    #[test]
    fn named_predicates() {
        let overlapping = matrix("212101212");
        assert!(overlapping.is_intersects());
        assert!(overlapping.is_overlaps(Dimension::Surface, Dimension::Surface));
        assert!(!overlapping.is_contains());
        assert!(!overlapping.is_touches(Dimension::Surface, Dimension::Surface));

        let polygon_contains_point = matrix("0F2FF1FF2");
        assert!(polygon_contains_point.transposed().is_within());
        assert!(matrix("0F2FF1FF2").transposed().is_covered_by());

        let touching = matrix("FF2F11212");
        assert!(touching.is_touches(Dimension::Surface, Dimension::Surface));
        assert!(!touching.is_disjoint());

        let crossing_lines = matrix("0F1FF0102");
        assert!(crossing_lines.is_crosses(Dimension::Curve, Dimension::Curve));
        assert!(!crossing_lines.is_overlaps(Dimension::Curve, Dimension::Curve));

        let same = matrix("2FFF1FFF2");
        assert!(same.is_equals());
        assert!(same.is_covers());
        assert!(same.is_contains());
        assert!(!same.is_contains_properly());
    }
}
