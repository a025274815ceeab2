use geo_types::Geometry as GeoTypesGeometry;

use crate::cartesian::Coord;
use crate::error::GeonodeTypesError;
use crate::geometry::{
    Geom, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};

fn to_line(line: &LineString) -> geo_types::LineString<f64> {
    line.coords().iter().map(|c| (c.x, c.y)).collect()
}

fn to_polygon(polygon: &Polygon) -> geo_types::Polygon<f64> {
    geo_types::Polygon::new(
        to_line(polygon.exterior()),
        polygon.interiors().iter().map(to_line).collect(),
    )
}

fn from_line(line: geo_types::LineString<f64>) -> LineString {
    LineString::new(line.into_iter().map(Coord::from).collect())
}

fn from_polygon(polygon: geo_types::Polygon<f64>) -> Polygon {
    let (exterior, interiors) = polygon.into_inner();
    Polygon::new(
        from_line(exterior),
        interiors.into_iter().map(from_line).collect(),
    )
}

/// `geo_types` has no empty point, so empty points convert to an empty collection.
impl From<&Geom> for GeoTypesGeometry<f64> {
    fn from(value: &Geom) -> Self {
        match value {
            Geom::Point(point) => match point.coord() {
                Some(coord) => GeoTypesGeometry::Point(geo_types::Point::new(coord.x, coord.y)),
                None => GeoTypesGeometry::GeometryCollection(Default::default()),
            },
            Geom::LineString(line) => GeoTypesGeometry::LineString(to_line(line)),
            Geom::Polygon(polygon) => GeoTypesGeometry::Polygon(to_polygon(polygon)),
            Geom::MultiPoint(multi) => GeoTypesGeometry::MultiPoint(
                multi
                    .parts()
                    .iter()
                    .filter_map(|p| p.coord().map(|c| geo_types::Point::new(c.x, c.y)))
                    .collect(),
            ),
            Geom::MultiLineString(multi) => GeoTypesGeometry::MultiLineString(
                geo_types::MultiLineString::new(multi.parts().iter().map(to_line).collect()),
            ),
            Geom::MultiPolygon(multi) => GeoTypesGeometry::MultiPolygon(
                geo_types::MultiPolygon::new(multi.parts().iter().map(to_polygon).collect()),
            ),
            Geom::GeometryCollection(collection) => GeoTypesGeometry::GeometryCollection(
                geo_types::GeometryCollection::new_from(
                    collection.parts().iter().map(Into::into).collect(),
                ),
            ),
        }
    }
}

impl TryFrom<GeoTypesGeometry<f64>> for Geom {
    type Error = GeonodeTypesError;

    /// Lines, rectangles and triangles become line strings and polygons. The result is checked
    /// with [`Geom::check_structure`] since `geo_types` does not enforce ring closure.
    fn try_from(value: GeoTypesGeometry<f64>) -> Result<Self, Self::Error> {
        let geom = match value {
            GeoTypesGeometry::Point(point) => Geom::Point(Point::new(point.0.into())),
            GeoTypesGeometry::Line(line) => Geom::LineString(LineString::new(vec![
                line.start.into(),
                line.end.into(),
            ])),
            GeoTypesGeometry::LineString(line) => Geom::LineString(from_line(line)),
            GeoTypesGeometry::Polygon(polygon) => Geom::Polygon(from_polygon(polygon)),
            GeoTypesGeometry::MultiPoint(multi) => Geom::MultiPoint(MultiPoint::new(
                multi.into_iter().map(|p| Point::new(p.0.into())).collect(),
            )),
            GeoTypesGeometry::MultiLineString(multi) => Geom::MultiLineString(
                MultiLineString::new(multi.into_iter().map(from_line).collect()),
            ),
            GeoTypesGeometry::MultiPolygon(multi) => Geom::MultiPolygon(MultiPolygon::new(
                multi.into_iter().map(from_polygon).collect(),
            )),
            GeoTypesGeometry::GeometryCollection(collection) => {
                Geom::GeometryCollection(GeometryCollection::new(
                    collection
                        .into_iter()
                        .map(Geom::try_from)
                        .collect::<Result<_, _>>()?,
                ))
            }
            GeoTypesGeometry::Rect(rect) => Geom::Polygon(from_polygon(rect.to_polygon())),
            GeoTypesGeometry::Triangle(triangle) => {
                Geom::Polygon(from_polygon(triangle.to_polygon()))
            }
        };

        geom.check_structure()?;
        Ok(geom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wkt::read;
    use assert_matches::assert_matches;
    use geo_types::{line_string, polygon, Rect};

    #[test]
    fn polygon_round_trip() {
        let geom = read("POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 1 2, 2 2, 1 1))").expect("valid");
        let converted = GeoTypesGeometry::from(&geom);
        assert_matches!(&converted, GeoTypesGeometry::Polygon(p) => {
            assert_eq!(p.interiors().len(), 1);
        });
        assert_eq!(Geom::try_from(converted), Ok(geom));
    }

    #[test]
    fn rect_becomes_polygon() {
        let rect = Rect::new((0.0, 0.0), (2.0, 1.0));
        let geom = Geom::try_from(GeoTypesGeometry::Rect(rect)).expect("valid");
        assert_matches!(geom, Geom::Polygon(p) => assert_eq!(p.area(), 2.0));
    }

    #[test]
    fn empty_point_is_empty_collection() {
        let converted = GeoTypesGeometry::from(&Geom::Point(Point::empty()));
        assert_matches!(converted, GeoTypesGeometry::GeometryCollection(c) if c.0.is_empty());
    }

    #[test]
    fn single_point_line_rejected() {
        let line = line_string![(x: 0.0, y: 0.0)];
        assert_matches!(
            Geom::try_from(GeoTypesGeometry::LineString(line)),
            Err(GeonodeTypesError::InvalidStructure(_))
        );
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
        assert!(Geom::try_from(GeoTypesGeometry::Polygon(square)).is_ok());
    }
}
