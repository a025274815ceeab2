use crate::cartesian::NewCartesianPoint2d;
use crate::error::GeonodeTypesError;
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;
use geodesy::prelude::*;
use std::marker::PhantomData;

/// Runs an arbitrary `geodesy` operator pipeline as a [`Projection`].
///
/// Input points are geographic, output points are whatever the pipeline produces (usually meters).
pub struct GeodesyProjection<In, Out> {
    context: Minimal,
    op: OpHandle,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> GeodesyProjection<In, Out> {
    /// Compiles the operator definition, e.g. `"utm zone=32"`.
    pub fn new(definition: &str) -> Result<Self, GeonodeTypesError> {
        let mut context = Minimal::new();
        let op = context
            .op(definition)
            .map_err(|err| GeonodeTypesError::InvalidProjection(format!("{definition}: {err}")))?;
        Ok(Self {
            context,
            op,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        })
    }

    fn run(&self, direction: Direction, coord: Coor2D) -> Option<Coor2D> {
        let mut data = [coord];
        let processed = self.context.apply(self.op, direction, &mut data).ok()?;
        let [result] = data;
        (processed == 1 && result.0[0].is_finite() && result.0[1].is_finite()).then_some(result)
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for GeodesyProjection<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let result = self.run(Fwd, Coor2D::geo(input.lat(), input.lon()))?;
        Some(Out::new(result.0[0], result.0[1]))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let result = self.run(Inv, Coor2D([input.x(), input.y()]))?;
        Some(In::latlon(result.0[1].to_degrees(), result.0[0].to_degrees()))
    }
}
