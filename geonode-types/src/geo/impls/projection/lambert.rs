use crate::cartesian::NewCartesianPoint2d;
use crate::geo::datum::Ellipsoid;
use crate::geo::impls::projection::{adjust_lon, phi_from_ts, tsfn, ProjectionParams};
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;
use std::f64::consts::FRAC_PI_2;
use std::marker::PhantomData;

/// Lambert conformal conic with one or two standard parallels.
#[derive(Debug, Copy, Clone)]
pub struct LambertConformalConic<In, Out> {
    semimajor: f64,
    eccentricity: f64,
    n: f64,
    f: f64,
    rho_0: f64,
    k_0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

fn msfn(lat: f64, es: f64) -> f64 {
    let sin = lat.sin();
    lat.cos() / (1.0 - es * sin * sin).sqrt()
}

impl<In, Out> LambertConformalConic<In, Out> {
    /// Creates the projection. `lat_1` must be present in `params`; `lat_2` defaults to `lat_1`.
    pub fn new(ellipsoid: Ellipsoid, params: &ProjectionParams, lat_1: f64) -> Self {
        let es = ellipsoid.eccentricity_sq();
        let e = ellipsoid.eccentricity();
        let lat_1 = lat_1.to_radians();
        let lat_2 = params.lat_2.map(f64::to_radians).unwrap_or(lat_1);

        let m1 = msfn(lat_1, es);
        let t1 = tsfn(lat_1, e);
        let n = if (lat_1 - lat_2).abs() > 1e-10 {
            (m1.ln() - msfn(lat_2, es).ln()) / (t1.ln() - tsfn(lat_2, e).ln())
        } else {
            lat_1.sin()
        };
        let f = m1 / (n * t1.powf(n));
        let lat_0 = params.lat_0.to_radians();
        let rho_0 = if (lat_0.abs() - FRAC_PI_2).abs() < 1e-10 {
            0.0
        } else {
            ellipsoid.semimajor() * f * tsfn(lat_0, e).powf(n) * params.k_0
        };

        Self {
            semimajor: ellipsoid.semimajor(),
            eccentricity: e,
            n,
            f,
            rho_0,
            k_0: params.k_0,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for LambertConformalConic<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let lat = input.lat_rad();
        let rho = if (lat.abs() - FRAC_PI_2).abs() < 1e-10 {
            if lat * self.n <= 0.0 {
                return None;
            }
            0.0
        } else {
            self.semimajor * self.f * tsfn(lat, self.eccentricity).powf(self.n) * self.k_0
        };

        let theta = self.n * adjust_lon(input.lon_rad() - self.lon_0);
        let x = self.x_0 + rho * theta.sin();
        let y = self.y_0 + self.rho_0 - rho * theta.cos();

        (x.is_finite() && y.is_finite()).then(|| Out::new(x, y))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let sign = self.n.signum();
        let dx = (input.x() - self.x_0) * sign;
        let dy = (self.rho_0 - (input.y() - self.y_0)) * sign;
        let rho = dx.hypot(dy) * sign;

        let (lat, lon) = if rho == 0.0 {
            (FRAC_PI_2.copysign(self.n), self.lon_0)
        } else {
            let ts = (rho / (self.semimajor * self.f * self.k_0)).powf(1.0 / self.n);
            let lat = phi_from_ts(ts, self.eccentricity)?;
            let theta = dx.atan2(dy);
            (lat, theta / self.n + self.lon_0)
        };

        (lat.is_finite() && lon.is_finite())
            .then(|| In::latlon(lat.to_degrees(), adjust_lon(lon).to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::{CartesianPoint2d, Coord};
    use crate::geo::{GeoPoint, GeoPoint2d};
    use approx::assert_abs_diff_eq;

    fn lambert_93() -> LambertConformalConic<GeoPoint2d, Coord> {
        let params = ProjectionParams {
            lat_0: 46.5,
            lon_0: 3.0,
            lat_2: Some(44.0),
            x_0: 700_000.0,
            y_0: 6_600_000.0,
            ..Default::default()
        };
        LambertConformalConic::new(Ellipsoid::GRS80, &params, 49.0)
    }

    #[test]
    fn origin_maps_to_false_origin() {
        let projected = lambert_93()
            .project(&GeoPoint2d::latlon(46.5, 3.0))
            .expect("inside domain");
        assert_abs_diff_eq!(projected.x(), 700_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.y(), 6_600_000.0, epsilon = 1e-6);
    }

    #[test]
    fn round_trip() {
        let projection = lambert_93();
        let point = GeoPoint2d::latlon(48.8566, 2.3522);
        let projected = projection.project(&point).expect("inside domain");
        // Paris in Lambert-93.
        assert_abs_diff_eq!(projected.x(), 652_469.0, epsilon = 5.0);
        assert_abs_diff_eq!(projected.y(), 6_862_035.0, epsilon = 5.0);

        let back = projection.unproject(&projected).expect("inside domain");
        assert_abs_diff_eq!(back.lat(), point.lat(), epsilon = 1e-9);
        assert_abs_diff_eq!(back.lon(), point.lon(), epsilon = 1e-9);
    }
}
