use crate::cartesian::{Coord, Rect};
use crate::geo::Projection;
use crate::geometry::{Geom, Geometry, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

fn merge_rects<'a, G: Geometry + 'a>(parts: impl Iterator<Item = &'a G>) -> Option<Rect> {
    parts
        .filter_map(Geometry::rect)
        .reduce(|acc, rect| acc.merge(rect))
}

fn project_parts<G: Geometry, Proj>(parts: &[G], projection: &Proj) -> Option<Vec<G>>
where
    Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
{
    parts.iter().map(|part| part.project(projection)).collect()
}

macro_rules! multi_geometry {
    ($(#[$meta:meta])* $name:ident, $part:ty) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name(Vec<$part>);

        impl $name {
            /// Creates the collection from its parts.
            pub fn new(parts: Vec<$part>) -> Self {
                Self(parts)
            }

            /// Parts of the collection.
            pub fn parts(&self) -> &[$part] {
                &self.0
            }

            /// Consumes the collection returning its parts.
            pub fn into_parts(self) -> Vec<$part> {
                self.0
            }

            /// Collection has no non-empty part.
            pub fn is_empty(&self) -> bool {
                self.0.iter().all(|part| part.is_empty())
            }
        }

        impl From<Vec<$part>> for $name {
            fn from(value: Vec<$part>) -> Self {
                Self(value)
            }
        }

        impl Geometry for $name {
            fn project<Proj>(&self, projection: &Proj) -> Option<Self>
            where
                Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
            {
                Some(Self(project_parts(&self.0, projection)?))
            }

            fn rect(&self) -> Option<Rect> {
                merge_rects(self.0.iter())
            }
        }
    };
}

multi_geometry!(
    /// Set of points.
    MultiPoint,
    Point
);
multi_geometry!(
    /// Set of line strings.
    MultiLineString,
    LineString
);
multi_geometry!(
    /// Set of polygons.
    MultiPolygon,
    Polygon
);
multi_geometry!(
    /// Heterogeneous set of geometries, possibly nested.
    GeometryCollection,
    Geom
);
