use crate::cartesian::NewCartesianPoint2d;
use crate::geo::datum::Ellipsoid;
use crate::geo::impls::projection::{adjust_lon, ProjectionParams};
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;
use std::f64::consts::FRAC_PI_2;
use std::marker::PhantomData;

/// Equidistant cylindrical projection on the sphere of the semi-major axis.
#[derive(Debug, Copy, Clone)]
pub struct Equirectangular<In, Out> {
    semimajor: f64,
    cos_lat_ts: f64,
    lat_0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> Equirectangular<In, Out> {
    /// Creates the projection.
    pub fn new(ellipsoid: Ellipsoid, params: &ProjectionParams) -> Self {
        Self {
            semimajor: ellipsoid.semimajor(),
            cos_lat_ts: params.lat_ts.unwrap_or(0.0).to_radians().cos(),
            lat_0: params.lat_0.to_radians(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection for Equirectangular<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let lat = input.lat_rad();
        if lat.abs() > FRAC_PI_2 {
            return None;
        }

        let x = self.x_0 + self.semimajor * adjust_lon(input.lon_rad() - self.lon_0) * self.cos_lat_ts;
        let y = self.y_0 + self.semimajor * (lat - self.lat_0);

        (x.is_finite() && y.is_finite()).then(|| Out::new(x, y))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        if self.cos_lat_ts == 0.0 {
            return None;
        }

        let lat = (input.y() - self.y_0) / self.semimajor + self.lat_0;
        let lon = (input.x() - self.x_0) / (self.semimajor * self.cos_lat_ts) + self.lon_0;
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > FRAC_PI_2 {
            return None;
        }

        Some(In::latlon(lat.to_degrees(), adjust_lon(lon).to_degrees()))
    }
}
