use std::fmt::{Display, Formatter};
use std::str::FromStr;

use geonode_types::geo::Crs;
use geonode_types::{wkt, Geom};
use serde::{Deserialize, Serialize};

use crate::construct::{self, BufferParams};
use crate::error::GeonodeError;
use crate::measure;
use crate::overlay::{overlay, OverlayOp};
use crate::prepared::PreparedGeometry;
use crate::relate::{relate, validate_pattern, Dimension, IntersectionMatrix};
use crate::transform::transform;
use crate::validity::{self, ValidityError};

/// A geometry value together with its spatial reference identifier.
///
/// A `Geometry` created with [`Geometry::new`] has no content. Every operation on it fails with
/// [`GeonodeError::Argument`], except [`Geometry::to_wkt`] which returns an empty string and the SRID accessors.
///
/// ```
/// use geonode::Geometry;
///
/// let square: Geometry = "POLYGON((0 0, 0 2, 2 2, 2 0, 0 0))".parse().unwrap();
/// let point = Geometry::from_wkt("POINT(1 1)").unwrap();
///
/// assert!(square.contains(&point).unwrap());
/// assert_eq!(square.area().unwrap(), 4.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    content: Option<Geom>,
    srid: Option<i32>,
}

impl Geometry {
    /// Creates an uninitialized geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a WKT string.
    pub fn from_wkt(text: &str) -> Result<Self, GeonodeError> {
        Ok(Self {
            content: Some(wkt::read(text)?),
            srid: None,
        })
    }

    /// Parses a WKT string with an optional `SRID=<code>;` prefix.
    pub fn from_ewkt(text: &str) -> Result<Self, GeonodeError> {
        let (srid, geom) = wkt::read_ewkt(text)?;
        Ok(Self {
            content: Some(geom),
            srid,
        })
    }

    /// Replaces the content with the parsed WKT. On error the geometry is left as it was.
    pub fn set_wkt(&mut self, text: &str) -> Result<(), GeonodeError> {
        self.content = Some(wkt::read(text)?);
        Ok(())
    }

    /// WKT of the content, or an empty string for an uninitialized geometry.
    pub fn to_wkt(&self) -> String {
        self.content.as_ref().map(wkt::write).unwrap_or_default()
    }

    /// WKT prefixed with `SRID=<code>;` when the SRID is set.
    pub fn to_ewkt(&self) -> String {
        match self.srid {
            Some(srid) if self.content.is_some() => format!("SRID={srid};{}", self.to_wkt()),
            _ => self.to_wkt(),
        }
    }

    /// Spatial reference identifier. It is metadata only and never changes coordinates.
    pub fn srid(&self) -> Option<i32> {
        self.srid
    }

    /// Sets the spatial reference identifier.
    pub fn set_srid(&mut self, srid: Option<i32>) {
        self.srid = srid;
    }

    /// Content of the geometry, if it is initialized.
    pub fn geom(&self) -> Option<&Geom> {
        self.content.as_ref()
    }

    fn content(&self) -> Result<&Geom, GeonodeError> {
        let geom = self
            .content
            .as_ref()
            .ok_or_else(|| GeonodeError::Argument("geometry is not initialized".into()))?;
        geom.check_structure()?;
        Ok(geom)
    }

    fn derived(&self, geom: Geom) -> Self {
        Self {
            content: Some(geom),
            srid: self.srid,
        }
    }

    /// Name of the geometry kind, e.g. `"Polygon"`.
    pub fn geometry_type(&self) -> Result<&'static str, GeonodeError> {
        Ok(self.content()?.geometry_type().name())
    }

    /// Geometry has no coordinates.
    pub fn is_empty(&self) -> Result<bool, GeonodeError> {
        Ok(self.content()?.is_empty())
    }

    /// Geometry satisfies the validity rules of its kind. See [`validity`](crate::validity).
    pub fn is_valid(&self) -> Result<bool, GeonodeError> {
        Ok(validity::is_valid(self.content()?))
    }

    /// The first reason why the geometry is not valid.
    pub fn validity_reason(&self) -> Result<Option<ValidityError>, GeonodeError> {
        Ok(validity::validity_reason(self.content()?))
    }

    /// Geometry has no self-intersections or repeated points.
    pub fn is_simple(&self) -> Result<bool, GeonodeError> {
        Ok(validity::is_simple(self.content()?))
    }

    /// Geometry is a closed simple line string.
    pub fn is_ring(&self) -> Result<bool, GeonodeError> {
        Ok(validity::is_ring(self.content()?))
    }

    /// Area of the polygons.
    pub fn area(&self) -> Result<f64, GeonodeError> {
        Ok(measure::area(self.content()?))
    }

    /// Length of the lines and perimeter of the polygons.
    pub fn length(&self) -> Result<f64, GeonodeError> {
        Ok(measure::length(self.content()?))
    }

    /// Minimum distance between the geometries.
    pub fn distance(&self, other: &Geometry) -> Result<f64, GeonodeError> {
        Ok(measure::distance(self.content()?, other.content()?))
    }

    /// DE-9IM matrix of this geometry against `other`.
    pub fn relate(&self, other: &Geometry) -> Result<IntersectionMatrix, GeonodeError> {
        Ok(relate(self.content()?, other.content()?))
    }

    /// Checks the DE-9IM matrix against a pattern such as `"T*F**FFF*"`.
    pub fn relate_pattern(&self, other: &Geometry, pattern: &str) -> Result<bool, GeonodeError> {
        validate_pattern(pattern)?;
        self.relate(other)?.matches(pattern)
    }

    fn dimensions(&self, other: &Geometry) -> Result<(Dimension, Dimension), GeonodeError> {
        Ok((
            Dimension::from_topological(self.content()?.dimension()),
            Dimension::from_topological(other.content()?.dimension()),
        ))
    }

    /// Geometries have no point in common.
    pub fn disjoint(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        Ok(!self.intersects(other)?)
    }

    /// Geometries have at least one point in common.
    pub fn intersects(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        Ok(self.prepare()?.intersects(other.content()?))
    }

    /// Geometries touch only at their boundaries.
    pub fn touches(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        let (a, b) = self.dimensions(other)?;
        Ok(self.relate(other)?.is_touches(a, b))
    }

    /// Interiors intersect in a lower dimension than the higher of the two geometries.
    pub fn crosses(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        let (a, b) = self.dimensions(other)?;
        Ok(self.relate(other)?.is_crosses(a, b))
    }

    /// Geometries of the same dimension share some but not all of their points.
    pub fn overlaps(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        let (a, b) = self.dimensions(other)?;
        Ok(self.relate(other)?.is_overlaps(a, b))
    }

    /// This geometry lies in the interior of `other`.
    pub fn within(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        other.contains(self)
    }

    /// No point of `other` is outside this geometry, and their interiors intersect.
    pub fn contains(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        Ok(self.prepare()?.contains(other.content()?))
    }

    /// `other` lies in the interior of this geometry without touching its boundary.
    pub fn contains_properly(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        Ok(self.prepare()?.contains_properly(other.content()?))
    }

    /// No point of `other` is outside this geometry.
    pub fn covers(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        Ok(self.prepare()?.covers(other.content()?))
    }

    /// No point of this geometry is outside `other`.
    pub fn covered_by(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        other.covers(self)
    }

    /// Geometries are topologically equal. Two empty geometries are equal.
    pub fn equals(&self, other: &Geometry) -> Result<bool, GeonodeError> {
        if self.content()?.is_empty() && other.content()?.is_empty() {
            return Ok(true);
        }
        Ok(self.relate(other)?.is_equals())
    }

    /// Geometries have the same structure and all vertices are within `tolerance` of each other.
    pub fn equals_exact(&self, other: &Geometry, tolerance: f64) -> Result<bool, GeonodeError> {
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(GeonodeError::Argument(format!(
                "tolerance must be a non-negative number, got {tolerance}"
            )));
        }
        Ok(measure::equals_exact(
            self.content()?,
            other.content()?,
            tolerance,
        ))
    }

    fn overlay(&self, other: &Geometry, op: OverlayOp) -> Result<Geometry, GeonodeError> {
        Ok(self.derived(overlay(self.content()?, other.content()?, op)))
    }

    /// Points in both geometries.
    pub fn intersection(&self, other: &Geometry) -> Result<Geometry, GeonodeError> {
        self.overlay(other, OverlayOp::Intersection)
    }

    /// Points in either geometry.
    pub fn union(&self, other: &Geometry) -> Result<Geometry, GeonodeError> {
        self.overlay(other, OverlayOp::Union)
    }

    /// Points of this geometry that are not in `other`.
    pub fn difference(&self, other: &Geometry) -> Result<Geometry, GeonodeError> {
        self.overlay(other, OverlayOp::Difference)
    }

    /// Points in exactly one of the geometries.
    pub fn sym_difference(&self, other: &Geometry) -> Result<Geometry, GeonodeError> {
        self.overlay(other, OverlayOp::SymDifference)
    }

    /// Axis aligned bounding rectangle.
    pub fn envelope(&self) -> Result<Geometry, GeonodeError> {
        Ok(self.derived(construct::envelope(self.content()?)))
    }

    /// Smallest convex geometry containing all coordinates.
    pub fn convex_hull(&self) -> Result<Geometry, GeonodeError> {
        Ok(self.derived(construct::convex_hull(self.content()?)))
    }

    /// Area within `distance` of the geometry, with [`DEFAULT_QUADRANT_SEGMENTS`](crate::DEFAULT_QUADRANT_SEGMENTS)
    /// segments per quarter circle.
    pub fn buffer(&self, distance: f64) -> Result<Geometry, GeonodeError> {
        self.buffer_with_params(distance, &BufferParams::default())
    }

    /// Area within `distance` of the geometry. Negative distances shrink polygons.
    pub fn buffer_with_params(
        &self,
        distance: f64,
        params: &BufferParams,
    ) -> Result<Geometry, GeonodeError> {
        if !distance.is_finite() {
            return Err(GeonodeError::Argument(format!(
                "buffer distance must be finite, got {distance}"
            )));
        }
        Ok(self.derived(construct::buffer(self.content()?, distance, params)))
    }

    /// Douglas-Peucker simplification. Removed vertices are within `tolerance` of the result.
    pub fn simplify(&self, tolerance: f64) -> Result<Geometry, GeonodeError> {
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(GeonodeError::Argument(format!(
                "tolerance must be a non-negative number, got {tolerance}"
            )));
        }
        Ok(self.derived(construct::simplify(self.content()?, tolerance)))
    }

    /// Topological boundary.
    pub fn boundary(&self) -> Result<Geometry, GeonodeError> {
        Ok(self.derived(construct::boundary(self.content()?)?))
    }

    /// Center of mass of the highest dimension components.
    pub fn centroid(&self) -> Result<Geometry, GeonodeError> {
        Ok(self.derived(construct::centroid(self.content()?)))
    }

    /// A point guaranteed to lie on the geometry, in the interior of areas when possible.
    pub fn point_on_surface(&self) -> Result<Geometry, GeonodeError> {
        Ok(self.derived(construct::point_on_surface(self.content()?)))
    }

    /// Builds indexes for repeated predicate evaluation against this geometry.
    pub fn prepare(&self) -> Result<PreparedGeometry<'_>, GeonodeError> {
        Ok(PreparedGeometry::new(self.content()?))
    }

    /// Converts all coordinates from `source` to `target` reference system.
    ///
    /// If any coordinate cannot be converted, the geometry is not modified. The SRID is not changed.
    pub fn transform(&mut self, source: &Crs, target: &Crs) -> Result<(), GeonodeError> {
        let projected = transform(self.content()?, source, target)?;
        self.content = Some(projected);
        Ok(())
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_wkt())
    }
}

impl FromStr for Geometry {
    type Err = GeonodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wkt(s)
    }
}

impl From<Geom> for Geometry {
    fn from(value: Geom) -> Self {
        Self {
            content: Some(value),
            srid: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geonode_types::{Coord, LineString, Polygon};

    fn g(wkt: &str) -> Geometry {
        Geometry::from_wkt(wkt).expect("valid WKT")
    }

    fn square() -> Geometry {
        g("POLYGON((0 0, 0 2, 2 2, 2 0, 0 0))")
    }

    fn shifted_square() -> Geometry {
        g("POLYGON((1 1, 1 3, 3 3, 3 1, 1 1))")
    }

    fn assert_equals(a: &Geometry, b: &str) {
        assert!(a.equals(&g(b)).expect("initialized"), "{a} is not equal to {b}");
    }

    #[test]
    fn wkt_state() {
        let mut geometry = Geometry::new();
        assert_eq!(geometry.to_wkt(), "");

        geometry.set_wkt("POINT(0 0)").expect("valid");
        insta::assert_snapshot!(geometry.to_wkt(), @"POINT (0.0000000000000000 0.0000000000000000)");

        assert_matches!(
            geometry.set_wkt("SOMEGROSSLYINVALIDWKT"),
            Err(GeonodeError::Parse(_))
        );
        assert_eq!(geometry.to_wkt(), "POINT (0.0000000000000000 0.0000000000000000)");

        assert_matches!(
            Geometry::from_wkt("SOMEGROSSLYINVALIDWKT"),
            Err(GeonodeError::Parse(_))
        );
        insta::assert_snapshot!(square().to_string(), @"POLYGON ((0.0000000000000000 0.0000000000000000, 0.0000000000000000 2.0000000000000000, 2.0000000000000000 2.0000000000000000, 2.0000000000000000 0.0000000000000000, 0.0000000000000000 0.0000000000000000))");
    }

    #[test]
    fn uninitialized_geometry() {
        let empty = Geometry::new();
        assert_matches!(empty.area(), Err(GeonodeError::Argument(_)));
        assert_matches!(empty.contains(&square()), Err(GeonodeError::Argument(_)));
        assert_matches!(square().intersects(&empty), Err(GeonodeError::Argument(_)));
        assert_matches!(empty.buffer(1.0), Err(GeonodeError::Argument(_)));
        assert_eq!(empty.srid(), None);
    }

    #[test]
    fn unclosed_ring() {
        let ring = LineString::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(0.0, 1.0),
        ]);
        let geometry = Geometry::from(Geom::Polygon(Polygon::new(ring, vec![])));
        assert_matches!(geometry.area(), Err(GeonodeError::GeometryOperation(_)));
    }

    #[test]
    fn srid() {
        let mut polygon = square();
        assert_eq!(polygon.srid(), None);
        polygon.set_srid(Some(4326));
        assert_eq!(polygon.srid(), Some(4326));
        assert_eq!(
            polygon.intersection(&shifted_square()).expect("valid").srid(),
            Some(4326)
        );

        let point = Geometry::from_ewkt("SRID=3857;POINT(1 2)").expect("valid");
        assert_eq!(point.srid(), Some(3857));
        insta::assert_snapshot!(point.to_ewkt(), @"SRID=3857;POINT (1.0000000000000000 2.0000000000000000)");
    }

    #[test]
    fn properties() {
        let polygon = square();
        assert_eq!(polygon.geometry_type().expect("valid"), "Polygon");
        assert_eq!(g("POINT(0 0)").geometry_type().expect("valid"), "Point");
        assert_eq!(polygon.area().expect("valid"), 4.0);
        assert_eq!(
            g("LINESTRING(0 0, 1 1)").length().expect("valid"),
            2f64.sqrt()
        );
        assert_eq!(
            g("POINT(0 0)").distance(&g("POINT(1 1)")).expect("valid"),
            2f64.sqrt()
        );
        assert!(!polygon.is_empty().expect("valid"));
        assert!(g("POINT EMPTY").is_empty().expect("valid"));
        assert!(polygon.is_valid().expect("valid"));
        assert!(!g("POLYGON((0 0, 2 2, 0 2, 2 0, 0 0))").is_valid().expect("valid"));
        assert_matches!(
            g("POLYGON((0 0, 2 2, 0 2, 2 0, 0 0))").validity_reason(),
            Ok(Some(ValidityError::RingSelfIntersection(_)))
        );
        assert!(polygon.is_simple().expect("valid"));
        assert!(g("LINESTRING(0 0, 1 0, 1 1, 0 0)").is_ring().expect("valid"));
    }

    #[test]
    fn predicates() {
        let polygon = square();
        let point = g("POINT(1 1)");
        assert!(polygon.contains(&point).expect("valid"));
        assert!(!point.contains(&polygon).expect("valid"));
        assert!(!polygon.contains(&g("POINT(3 3)")).expect("valid"));
        assert!(point.within(&polygon).expect("valid"));

        assert!(polygon.intersects(&shifted_square()).expect("valid"));
        assert!(!polygon.intersects(&g("LINESTRING(3 3, 4 4)")).expect("valid"));
        assert!(polygon.intersects(&g("POINT(0 0)")).expect("valid"));
        assert!(polygon.disjoint(&g("LINESTRING(3 3, 4 4)")).expect("valid"));

        assert!(polygon.touches(&g("POINT(0 0)")).expect("valid"));
        assert!(!polygon.contains(&g("POINT(0 0)")).expect("valid"));
        assert!(polygon.covers(&g("POINT(0 0)")).expect("valid"));
        assert!(g("POINT(0 0)").covered_by(&polygon).expect("valid"));
        assert!(polygon.overlaps(&shifted_square()).expect("valid"));
        assert!(g("LINESTRING(-1 1, 3 1)").crosses(&polygon).expect("valid"));
        assert!(polygon
            .contains_properly(&g("POLYGON((0.5 0.5, 0.5 1.5, 1.5 1.5, 1.5 0.5, 0.5 0.5))"))
            .expect("valid"));
        assert!(!polygon.contains_properly(&polygon).expect("valid"));

        assert!(polygon
            .equals(&g("POLYGON((2 0, 0 0, 0 2, 2 2, 2 0))"))
            .expect("valid"));
        assert!(g("POINT EMPTY").equals(&g("LINESTRING EMPTY")).expect("valid"));
        assert!(polygon.equals_exact(&square(), 0.0).expect("valid"));
        assert_matches!(
            polygon.equals_exact(&square(), -1.0),
            Err(GeonodeError::Argument(_))
        );
    }

    #[test]
    fn relate_matrix() {
        let matrix = square().relate(&shifted_square()).expect("valid");
        insta::assert_snapshot!(matrix.to_string(), @"212101212");
        assert!(square()
            .relate_pattern(&shifted_square(), "T*T***T**")
            .expect("valid"));
        assert_matches!(
            square().relate_pattern(&shifted_square(), "T*T"),
            Err(GeonodeError::Argument(_))
        );
    }

    #[test]
    fn overlay_operations() {
        let polygon = square();
        let other = shifted_square();

        assert_equals(
            &polygon.intersection(&other).expect("valid"),
            "POLYGON((1 2, 2 2, 2 1, 1 1, 1 2))",
        );
        assert_equals(
            &polygon.difference(&other).expect("valid"),
            "POLYGON ((0 0, 0 2, 1 2, 1 1, 2 1, 2 0, 0 0))",
        );
        assert_equals(
            &polygon.sym_difference(&other).expect("valid"),
            "MULTIPOLYGON (((0 0, 0 2, 1 2, 1 1, 2 1, 2 0, 0 0)), ((2 1, 2 2, 1 2, 1 3, 3 3, 3 1, 2 1)))",
        );
        assert_equals(
            &polygon.union(&other).expect("valid"),
            "POLYGON ((0 0, 0 2, 1 2, 1 3, 3 3, 3 1, 2 1, 2 0, 0 0))",
        );
    }

    #[test]
    fn inclusion_exclusion() {
        let a = g("POLYGON((0 0, 5 0, 5 3, 0 3, 0 0))");
        let b = g("POLYGON((3 1, 7 1, 4 6, 3 1))");
        let union = a.union(&b).expect("valid").area().expect("valid");
        let intersection = a.intersection(&b).expect("valid").area().expect("valid");
        assert_abs_diff_eq!(
            union,
            a.area().expect("valid") + b.area().expect("valid") - intersection,
            epsilon = 1e-9
        );
    }

    #[test]
    fn constructions() {
        assert_equals(
            &g("POLYGON((0 1, 1 0, 2 1, 1 2, 0 1))").envelope().expect("valid"),
            "POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))",
        );
        assert!(g("POINT(1 1)")
            .buffer_with_params(1.0, &BufferParams::default().with_quadrant_segments(1))
            .expect("valid")
            .equals_exact(&g("POLYGON ((2 1, 1 0, 0 1, 1 2, 2 1))"), 1e-12)
            .expect("valid"));
        assert_equals(
            &g("POLYGON((1 1, 3 2, 2 1, 3 0, 1 1))").convex_hull().expect("valid"),
            "POLYGON ((1 1, 3 0, 3 2, 1 1))",
        );
        assert_equals(
            &g("LINESTRING(1 1, 0 0, -1 1)").boundary().expect("valid"),
            "MULTIPOINT ((-1 1), (1 1))",
        );
        assert_equals(&square().centroid().expect("valid"), "POINT (1 1)");
        assert!(square()
            .contains(&square().point_on_surface().expect("valid"))
            .expect("valid"));
        assert_equals(
            &g("LINESTRING(0 0, 1 0.01, 2 0)").simplify(0.1).expect("valid"),
            "LINESTRING (0 0, 2 0)",
        );

        assert_matches!(square().buffer(f64::NAN), Err(GeonodeError::Argument(_)));
        assert_matches!(square().simplify(-1.0), Err(GeonodeError::Argument(_)));
        assert_matches!(
            g("GEOMETRYCOLLECTION(POINT(1 1))").boundary(),
            Err(GeonodeError::GeometryOperation(_))
        );
    }

    #[test]
    fn buffer_area() {
        let circle = g("POINT(1 1)").buffer(1.0).expect("valid");
        let sides = 4.0 * crate::DEFAULT_QUADRANT_SEGMENTS as f64;
        let expected = sides / 2.0 * (std::f64::consts::TAU / sides).sin();
        assert_abs_diff_eq!(circle.area().expect("valid"), expected, epsilon = 1e-9);
    }

    #[test]
    fn prepared_matches_plain() {
        let polygon = square();
        let prepared = polygon.prepare().expect("valid");
        for wkt in [
            "POINT(1 1)",
            "POINT(0 0)",
            "LINESTRING(3 3, 4 4)",
            "POLYGON((1 1, 1 3, 3 3, 3 1, 1 1))",
            "POLYGON((0.5 0.5, 0.5 1, 1 1, 0.5 0.5))",
        ] {
            let other = g(wkt);
            let geom = other.geom().expect("initialized");
            assert_eq!(prepared.contains(geom), polygon.relate(&other).expect("valid").is_contains());
            assert_eq!(prepared.intersects(geom), polygon.relate(&other).expect("valid").is_intersects());
        }
    }

    #[test]
    fn transform_round_trip() {
        let geographic = Crs::new("+proj=longlat +datum=WGS84 +no_defs").expect("valid");
        let mercator = Crs::new("+proj=merc +datum=WGS84").expect("valid");

        let mut point = g("POINT(1 1)");
        point.set_srid(Some(4326));
        point.transform(&geographic, &mercator).expect("projectable");
        assert_matches!(point.geom(), Some(Geom::Point(p)) => {
            let coord = p.coord().expect("not empty");
            assert_abs_diff_eq!(coord.x, 111319.49079327357, epsilon = 1e-6);
            assert_abs_diff_eq!(coord.y, 110579.96522189587, epsilon = 1e-6);
        });
        assert_eq!(point.srid(), Some(4326));

        point.transform(&mercator, &geographic).expect("projectable");
        assert!(point.equals_exact(&g("POINT(1 1)"), 1e-8).expect("valid"));

        let mut line = g("LINESTRING(0 0, 0 90)");
        let before = line.clone();
        assert_matches!(
            line.transform(&geographic, &mercator),
            Err(GeonodeError::GeometryOperation(_))
        );
        assert_eq!(line, before);
    }
}
