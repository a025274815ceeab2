use geonode_types::geo::{Crs, CrsTransform};
use geonode_types::{Geom, Geometry};
use log::debug;

use crate::error::GeonodeError;

/// Maps every coordinate of the geometry from `source` to `target`.
///
/// Either all coordinates are converted or an error is returned; the input is never partially changed.
pub(crate) fn transform(geom: &Geom, source: &Crs, target: &Crs) -> Result<Geom, GeonodeError> {
    debug!(
        "transforming {} coordinates from '{}' to '{}'",
        geom.coords().len(),
        source.definition(),
        target.definition()
    );

    let transform = CrsTransform::new(source, target);
    geom.project(&transform).ok_or_else(|| {
        GeonodeError::GeometryOperation(
            "coordinate is outside the domain of the reference system".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::equals_exact;
    use crate::tests::geom;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geonode_types::wkt;

    fn crs(definition: &str) -> Crs {
        Crs::new(definition).expect("valid definition")
    }

    #[test]
    fn mercator_point() {
        let result = transform(
            &geom("POINT (1 1)"),
            &crs("+proj=longlat +datum=WGS84 +no_defs"),
            &crs("+proj=merc +datum=WGS84"),
        )
        .expect("projectable");
        assert_matches!(result, Geom::Point(point) => {
            let coord = point.coord().expect("not empty");
            assert_abs_diff_eq!(coord.x, 111319.49079327357, epsilon = 1e-6);
            assert_abs_diff_eq!(coord.y, 110579.96522189587, epsilon = 1e-6);
        });
    }

    #[test]
    fn round_trip_keeps_structure() {
        let source = crs("+proj=longlat +datum=WGS84");
        let target = crs("+proj=utm +zone=33 +datum=WGS84");
        let original = geom(
            "GEOMETRYCOLLECTION (POINT (15 50), POLYGON ((14 49, 16 49, 16 51, 14 51, 14 49), (14.5 49.5, 14.5 50.5, 15.5 50.5, 15.5 49.5, 14.5 49.5)))",
        );

        let projected = transform(&original, &source, &target).expect("projectable");
        assert_eq!(projected.coords().len(), original.coords().len());
        assert!(!equals_exact(&projected, &original, 1.0));

        let restored = transform(&projected, &target, &source).expect("projectable");
        assert!(equals_exact(&restored, &original, 1e-6), "{}", wkt::write(&restored));
    }

    #[test]
    fn out_of_domain() {
        let result = transform(
            &geom("LINESTRING (0 0, 0 90)"),
            &crs("+proj=longlat +datum=WGS84"),
            &crs("+proj=merc +datum=WGS84"),
        );
        assert_matches!(result, Err(GeonodeError::GeometryOperation(_)));
    }
}
