use crate::cartesian::NewCartesianPoint2d;
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;
use std::marker::PhantomData;

/// Plate carrée in degrees: `x` is longitude, `y` is latitude.
#[derive(Debug, Copy, Clone, Default)]
pub struct Geographic<In, Out> {
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> Geographic<In, Out> {
    /// Creates the projection.
    pub fn new() -> Self {
        Self {
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection for Geographic<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let (x, y) = (input.lon(), input.lat());
        (x.is_finite() && y.is_finite()).then(|| Out::new(x, y))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let (lon, lat) = (input.x(), input.y());
        (lon.is_finite() && lat.is_finite() && lat.abs() <= 90.0).then(|| In::latlon(lat, lon))
    }
}
