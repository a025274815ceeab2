use geonode_types::{Geom, Geometry as _, GeometryType, LineString, Point, Polygon};

/// Axis-aligned bounding box of the geometry.
///
/// Polygon rings run counterclockwise from the minimum corner. A box of zero width or height degenerates to a line
/// between the corners, a single position to a point and an empty geometry gives `POINT EMPTY`.
pub(crate) fn envelope(geom: &Geom) -> Geom {
    let Some(rect) = geom.rect() else {
        return Geom::empty(GeometryType::Point);
    };

    let (min, max) = (rect.min(), rect.max());
    if rect.width() == 0.0 && rect.height() == 0.0 {
        return Geom::Point(Point::new(min));
    }
    if rect.width() == 0.0 || rect.height() == 0.0 {
        return Geom::LineString(LineString::new(vec![min, max]));
    }

    let ring = vec![
        min,
        (max.x, min.y).into(),
        max,
        (min.x, max.y).into(),
        min,
    ];
    Geom::Polygon(Polygon::new(ring.into(), vec![]))
}
