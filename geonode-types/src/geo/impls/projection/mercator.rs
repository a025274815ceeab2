use crate::cartesian::NewCartesianPoint2d;
use crate::geo::datum::Ellipsoid;
use crate::geo::impls::projection::{adjust_lon, phi_from_ts, tsfn, ProjectionParams};
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;
use std::f64::consts::FRAC_PI_2;
use std::marker::PhantomData;

const POLE_EPSILON: f64 = 1e-10;

/// Ellipsoidal normal Mercator.
///
/// The scale is either given directly with `k_0` or derived from the latitude of true scale.
#[derive(Debug, Copy, Clone)]
pub struct Mercator<In, Out> {
    semimajor: f64,
    eccentricity: f64,
    k_0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> Mercator<In, Out> {
    /// Creates the projection.
    pub fn new(ellipsoid: Ellipsoid, params: &ProjectionParams) -> Self {
        let k_0 = match params.lat_ts {
            Some(lat_ts) => {
                let lat_ts = lat_ts.to_radians();
                let sin = lat_ts.sin();
                lat_ts.cos() / (1.0 - ellipsoid.eccentricity_sq() * sin * sin).sqrt()
            }
            None => params.k_0,
        };

        Self {
            semimajor: ellipsoid.semimajor(),
            eccentricity: ellipsoid.eccentricity(),
            k_0,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl Default for Mercator<crate::geo::GeoPoint2d, crate::cartesian::Coord> {
    fn default() -> Self {
        Self::new(Ellipsoid::WGS84, &ProjectionParams::default())
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection for Mercator<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let lat = input.lat_rad();
        if (lat.abs() - FRAC_PI_2).abs() <= POLE_EPSILON || lat.abs() > FRAC_PI_2 {
            return None;
        }

        let scale = self.semimajor * self.k_0;
        let x = self.x_0 + scale * adjust_lon(input.lon_rad() - self.lon_0);
        let y = self.y_0 - scale * tsfn(lat, self.eccentricity).ln();

        (x.is_finite() && y.is_finite()).then(|| Out::new(x, y))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let scale = self.semimajor * self.k_0;
        let ts = (-(input.y() - self.y_0) / scale).exp();
        let lat = phi_from_ts(ts, self.eccentricity)?;
        let lon = adjust_lon((input.x() - self.x_0) / scale + self.lon_0);

        (lat.is_finite() && lon.is_finite())
            .then(|| In::latlon(lat.to_degrees(), lon.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::{CartesianPoint2d, Coord};
    use crate::geo::{GeoPoint, GeoPoint2d};
    use approx::assert_abs_diff_eq;

    #[test]
    fn wgs84_reference_point() {
        let projection = Mercator::<GeoPoint2d, Coord>::default();
        let projected = projection
            .project(&GeoPoint2d::latlon(1.0, 1.0))
            .expect("inside domain");
        assert_abs_diff_eq!(projected.x(), 111_319.490_793_273_57, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.y(), 110_579.965_221_895_87, epsilon = 1e-6);

        let back = projection.unproject(&projected).expect("inside domain");
        assert_abs_diff_eq!(back.lat(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back.lon(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn sphere_matches_web_mercator() {
        let projection = Mercator::<GeoPoint2d, Coord>::new(
            Ellipsoid::new(6_378_137.0, 0.0),
            &ProjectionParams::default(),
        );
        let projected = projection
            .project(&GeoPoint2d::latlon(1.0, 1.0))
            .expect("inside domain");
        assert_abs_diff_eq!(projected.y(), 111_325.142_866_384_86, epsilon = 1e-6);
    }

    #[test]
    fn poles_are_outside() {
        let projection = Mercator::<GeoPoint2d, Coord>::default();
        assert!(projection.project(&GeoPoint2d::latlon(90.0, 0.0)).is_none());
        assert!(projection.project(&GeoPoint2d::latlon(-90.0, 10.0)).is_none());
    }

    #[test]
    fn latitude_of_true_scale() {
        let params = ProjectionParams {
            lat_ts: Some(0.0),
            ..Default::default()
        };
        let with_ts = Mercator::<GeoPoint2d, Coord>::new(Ellipsoid::WGS84, &params);
        let plain = Mercator::<GeoPoint2d, Coord>::default();
        let p = GeoPoint2d::latlon(45.0, 45.0);
        assert_abs_diff_eq!(
            with_ts.project(&p).expect("inside"),
            plain.project(&p).expect("inside"),
            epsilon = 1e-9
        );
    }
}
