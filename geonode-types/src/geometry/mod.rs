//! Geometry model: the seven OGC simple feature kinds over [`Coord`].

mod line_string;
mod multi;
mod point;
mod polygon;

pub use line_string::{LineString, Winding};
pub use multi::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
pub use point::Point;
pub use polygon::Polygon;

use crate::cartesian::{Coord, Rect};
use crate::error::GeonodeTypesError;
use crate::geo::Projection;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Operations common to every geometry kind.
pub trait Geometry: Sized {
    /// Applies the projection to every vertex. Returns `None` if any vertex cannot be projected.
    fn project<Proj>(&self, projection: &Proj) -> Option<Self>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized;

    /// Bounding rectangle, `None` for empty geometries.
    fn rect(&self) -> Option<Rect>;
}

/// Kind of a geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    /// Point
    Point,
    /// LineString
    LineString,
    /// Polygon
    Polygon,
    /// MultiPoint
    MultiPoint,
    /// MultiLineString
    MultiLineString,
    /// MultiPolygon
    MultiPolygon,
    /// GeometryCollection
    GeometryCollection,
}

impl GeometryType {
    /// Mixed-case type name (`"MultiPolygon"`).
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// WKT keyword (`"MULTIPOLYGON"`).
    pub fn keyword(&self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// Parses a WKT keyword, case-insensitively.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::Polygon,
            GeometryType::MultiPoint,
            GeometryType::MultiLineString,
            GeometryType::MultiPolygon,
            GeometryType::GeometryCollection,
        ]
        .into_iter()
        .find(|t| t.keyword().eq_ignore_ascii_case(keyword))
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Any geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geom {
    /// Point
    Point(Point),
    /// LineString
    LineString(LineString),
    /// Polygon
    Polygon(Polygon),
    /// MultiPoint
    MultiPoint(MultiPoint),
    /// MultiLineString
    MultiLineString(MultiLineString),
    /// MultiPolygon
    MultiPolygon(MultiPolygon),
    /// GeometryCollection
    GeometryCollection(GeometryCollection),
}

/// A non-empty atomic part of a geometry, with collections flattened.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Primitive<'a> {
    /// A single position.
    Point(&'a Coord),
    /// A line string with at least one vertex.
    Line(&'a LineString),
    /// A polygon with a non-empty exterior.
    Polygon(&'a Polygon),
}

impl Primitive<'_> {
    /// Topological dimension of the part.
    pub fn dimension(&self) -> usize {
        match self {
            Primitive::Point(_) => 0,
            Primitive::Line(_) => 1,
            Primitive::Polygon(_) => 2,
        }
    }
}

impl Geom {
    /// Empty geometry of the given kind.
    pub fn empty(geometry_type: GeometryType) -> Self {
        match geometry_type {
            GeometryType::Point => Geom::Point(Point::empty()),
            GeometryType::LineString => Geom::LineString(LineString::default()),
            GeometryType::Polygon => Geom::Polygon(Polygon::empty()),
            GeometryType::MultiPoint => Geom::MultiPoint(MultiPoint::default()),
            GeometryType::MultiLineString => Geom::MultiLineString(MultiLineString::default()),
            GeometryType::MultiPolygon => Geom::MultiPolygon(MultiPolygon::default()),
            GeometryType::GeometryCollection => {
                Geom::GeometryCollection(GeometryCollection::default())
            }
        }
    }

    /// Kind of the geometry.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geom::Point(_) => GeometryType::Point,
            Geom::LineString(_) => GeometryType::LineString,
            Geom::Polygon(_) => GeometryType::Polygon,
            Geom::MultiPoint(_) => GeometryType::MultiPoint,
            Geom::MultiLineString(_) => GeometryType::MultiLineString,
            Geom::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geom::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Geometry contains no position.
    pub fn is_empty(&self) -> bool {
        match self {
            Geom::Point(v) => v.is_empty(),
            Geom::LineString(v) => v.is_empty(),
            Geom::Polygon(v) => v.is_empty(),
            Geom::MultiPoint(v) => v.is_empty(),
            Geom::MultiLineString(v) => v.is_empty(),
            Geom::MultiPolygon(v) => v.is_empty(),
            Geom::GeometryCollection(v) => v.is_empty(),
        }
    }

    /// Topological dimension of the geometry kind: 0 for points, 1 for lines, 2 for polygons.
    ///
    /// A collection has the largest dimension of its members, `None` if it has no members.
    pub fn dimension(&self) -> Option<usize> {
        match self {
            Geom::Point(_) | Geom::MultiPoint(_) => Some(0),
            Geom::LineString(_) | Geom::MultiLineString(_) => Some(1),
            Geom::Polygon(_) | Geom::MultiPolygon(_) => Some(2),
            Geom::GeometryCollection(c) => c.parts().iter().filter_map(Geom::dimension).max(),
        }
    }

    /// Largest dimension among the non-empty parts, `None` for empty geometries.
    pub fn content_dimension(&self) -> Option<usize> {
        self.primitives().iter().map(Primitive::dimension).max()
    }

    /// Flattens the geometry into its non-empty atomic parts.
    pub fn primitives(&self) -> Vec<Primitive<'_>> {
        let mut result = vec![];
        self.collect_primitives(&mut result);
        result
    }

    fn collect_primitives<'a>(&'a self, out: &mut Vec<Primitive<'a>>) {
        match self {
            Geom::Point(p) => out.extend(p.coord().map(Primitive::Point)),
            Geom::LineString(l) => {
                if !l.is_empty() {
                    out.push(Primitive::Line(l));
                }
            }
            Geom::Polygon(p) => {
                if !p.is_empty() {
                    out.push(Primitive::Polygon(p));
                }
            }
            Geom::MultiPoint(mp) => out.extend(
                mp.parts()
                    .iter()
                    .filter_map(Point::coord)
                    .map(Primitive::Point),
            ),
            Geom::MultiLineString(ml) => out.extend(
                ml.parts()
                    .iter()
                    .filter(|l| !l.is_empty())
                    .map(Primitive::Line),
            ),
            Geom::MultiPolygon(mp) => out.extend(
                mp.parts()
                    .iter()
                    .filter(|p| !p.is_empty())
                    .map(Primitive::Polygon),
            ),
            Geom::GeometryCollection(c) => {
                for part in c.parts() {
                    part.collect_primitives(out);
                }
            }
        }
    }

    /// All vertices of the geometry in storage order.
    pub fn coords(&self) -> Vec<&Coord> {
        fn primitive_coords<'a>(p: Primitive<'a>) -> Box<dyn Iterator<Item = &'a Coord> + 'a> {
            match p {
                Primitive::Point(c) => Box::new(std::iter::once(c)),
                Primitive::Line(l) => Box::new(l.coords().iter()),
                Primitive::Polygon(p) => Box::new(p.rings().flat_map(|r| r.coords().iter())),
            }
        }

        self.primitives()
            .into_iter()
            .flat_map(primitive_coords)
            .collect()
    }

    /// Geometry has at least one non-empty polygon.
    pub fn has_area(&self) -> bool {
        self.primitives()
            .iter()
            .any(|p| matches!(p, Primitive::Polygon(_)))
    }

    /// Verifies the structural rules of the model.
    ///
    /// Line strings need at least 2 vertices, rings must be closed with at least 4 vertices and polygons with holes
    /// must have an exterior. Empty parts are allowed.
    pub fn check_structure(&self) -> Result<(), GeonodeTypesError> {
        fn check_line(line: &LineString) -> Result<(), GeonodeTypesError> {
            if line.coords().len() == 1 {
                return Err(GeonodeTypesError::InvalidStructure(
                    "line string must have at least 2 points".into(),
                ));
            }
            Ok(())
        }

        fn check_polygon(polygon: &Polygon) -> Result<(), GeonodeTypesError> {
            if polygon.is_empty() && !polygon.interiors().is_empty() {
                return Err(GeonodeTypesError::InvalidStructure(
                    "polygon with holes has no exterior ring".into(),
                ));
            }
            if polygon.is_empty() {
                return Ok(());
            }
            for ring in polygon.rings() {
                if ring.coords().len() < 4 {
                    return Err(GeonodeTypesError::InvalidStructure(
                        "polygon ring must have at least 4 points".into(),
                    ));
                }
                if !ring.is_closed() {
                    return Err(GeonodeTypesError::InvalidStructure(
                        "polygon ring is not closed".into(),
                    ));
                }
            }
            Ok(())
        }

        match self {
            Geom::Point(_) | Geom::MultiPoint(_) => Ok(()),
            Geom::LineString(l) => check_line(l),
            Geom::Polygon(p) => check_polygon(p),
            Geom::MultiLineString(ml) => ml.parts().iter().try_for_each(check_line),
            Geom::MultiPolygon(mp) => mp.parts().iter().try_for_each(check_polygon),
            Geom::GeometryCollection(c) => c.parts().iter().try_for_each(Geom::check_structure),
        }
    }
}

impl Geometry for Geom {
    fn project<Proj>(&self, projection: &Proj) -> Option<Self>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(match self {
            Geom::Point(v) => Geom::Point(v.project(projection)?),
            Geom::LineString(v) => Geom::LineString(v.project(projection)?),
            Geom::Polygon(v) => Geom::Polygon(v.project(projection)?),
            Geom::MultiPoint(v) => Geom::MultiPoint(v.project(projection)?),
            Geom::MultiLineString(v) => Geom::MultiLineString(v.project(projection)?),
            Geom::MultiPolygon(v) => Geom::MultiPolygon(v.project(projection)?),
            Geom::GeometryCollection(v) => Geom::GeometryCollection(v.project(projection)?),
        })
    }

    fn rect(&self) -> Option<Rect> {
        match self {
            Geom::Point(v) => v.rect(),
            Geom::LineString(v) => v.rect(),
            Geom::Polygon(v) => v.rect(),
            Geom::MultiPoint(v) => v.rect(),
            Geom::MultiLineString(v) => v.rect(),
            Geom::MultiPolygon(v) => v.rect(),
            Geom::GeometryCollection(v) => v.rect(),
        }
    }
}

macro_rules! geom_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Geom {
                fn from(value: $variant) -> Self {
                    Geom::$variant(value)
                }
            }
        )*
    };
}

geom_from!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::new(
            LineString::new(vec![
                Coord::new(x, y),
                Coord::new(x, y + size),
                Coord::new(x + size, y + size),
                Coord::new(x + size, y),
                Coord::new(x, y),
            ]),
            vec![],
        )
    }

    #[test]
    fn primitives_flatten_collections() {
        let geom = Geom::GeometryCollection(GeometryCollection::new(vec![
            Geom::Point(Point::new(Coord::new(1.0, 1.0))),
            Geom::Point(Point::empty()),
            Geom::MultiPolygon(MultiPolygon::new(vec![square(0.0, 0.0, 1.0), Polygon::empty()])),
            Geom::GeometryCollection(GeometryCollection::new(vec![Geom::LineString(
                LineString::new(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)]),
            )])),
        ]));

        let primitives = geom.primitives();
        assert_eq!(primitives.len(), 3);
        assert_eq!(geom.content_dimension(), Some(2));
        assert_eq!(geom.dimension(), Some(2));
        assert_eq!(geom.coords().len(), 8);
        assert!(geom.has_area());
        assert!(!geom.is_empty());
    }

    #[test]
    fn empty_geometries() {
        for t in [
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::Polygon,
            GeometryType::MultiPoint,
            GeometryType::MultiLineString,
            GeometryType::MultiPolygon,
            GeometryType::GeometryCollection,
        ] {
            let geom = Geom::empty(t);
            assert!(geom.is_empty());
            assert_eq!(geom.geometry_type(), t);
            assert_eq!(geom.rect(), None);
        }

        assert_eq!(Geom::empty(GeometryType::Polygon).dimension(), Some(2));
        assert_eq!(
            Geom::empty(GeometryType::GeometryCollection).dimension(),
            None
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(
            GeometryType::from_keyword("multiPolygon"),
            Some(GeometryType::MultiPolygon)
        );
        assert_eq!(GeometryType::from_keyword("CIRCLE"), None);
        assert_eq!(GeometryType::LineString.to_string(), "LineString");
    }

    #[test]
    fn structure() {
        let open = Polygon::new(
            LineString::new(vec![
                Coord::new(0.0, 0.0),
                Coord::new(1.0, 0.0),
                Coord::new(1.0, 1.0),
                Coord::new(0.0, 1.0),
            ]),
            vec![],
        );
        assert_matches!(
            Geom::Polygon(open).check_structure(),
            Err(GeonodeTypesError::InvalidStructure(_))
        );
        assert_matches!(
            Geom::LineString(LineString::new(vec![Coord::new(0.0, 0.0)])).check_structure(),
            Err(GeonodeTypesError::InvalidStructure(_))
        );
        assert!(Geom::Polygon(square(0.0, 0.0, 2.0)).check_structure().is_ok());
    }

    #[test]
    fn serde_json_representation() {
        let point = Geom::Point(Point::new(Coord::new(1.0, 2.0)));
        assert_eq!(
            serde_json::to_string(&point).expect("serializable"),
            r#"{"Point":{"x":1.0,"y":2.0}}"#
        );

        let polygon = Geom::Polygon(square(0.0, 0.0, 2.0));
        let json = serde_json::to_string(&polygon).expect("serializable");
        let restored: Geom = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(restored, polygon);
    }
}
