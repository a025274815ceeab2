use crate::cartesian::NewCartesianPoint2d;
use crate::geo::datum::Ellipsoid;
use crate::geo::impls::projection::{adjust_lon, ProjectionParams};
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;
use std::f64::consts::FRAC_PI_2;
use std::marker::PhantomData;

/// Ellipsoidal transverse Mercator (Snyder series). Also backs UTM zones.
#[derive(Debug, Copy, Clone)]
pub struct TransverseMercator<In, Out> {
    semimajor: f64,
    es: f64,
    ep2: f64,
    k_0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
    ml_0: f64,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> TransverseMercator<In, Out> {
    /// Creates the projection.
    pub fn new(ellipsoid: Ellipsoid, params: &ProjectionParams) -> Self {
        let es = ellipsoid.eccentricity_sq();
        let semimajor = ellipsoid.semimajor();
        Self {
            semimajor,
            es,
            ep2: es / (1.0 - es),
            k_0: params.k_0,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
            ml_0: meridian_distance(semimajor, es, params.lat_0.to_radians()),
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }

    /// Parameters of a UTM zone.
    pub fn utm_params(zone: u8, south: bool) -> ProjectionParams {
        ProjectionParams {
            lon_0: f64::from(zone) * 6.0 - 183.0,
            k_0: 0.9996,
            x_0: 500_000.0,
            y_0: if south { 10_000_000.0 } else { 0.0 },
            ..Default::default()
        }
    }
}

fn meridian_distance(a: f64, es: f64, lat: f64) -> f64 {
    let e4 = es * es;
    let e6 = e4 * es;
    a * ((1.0 - es / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * es / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for TransverseMercator<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let lat = input.lat_rad();
        let dlon = adjust_lon(input.lon_rad() - self.lon_0);
        if dlon.abs() > FRAC_PI_2 || lat.abs() > FRAC_PI_2 {
            return None;
        }

        let (sin_lat, cos_lat) = lat.sin_cos();
        let n = self.semimajor / (1.0 - self.es * sin_lat * sin_lat).sqrt();
        let tan_lat = if cos_lat.abs() < 1e-12 {
            0.0
        } else {
            sin_lat / cos_lat
        };
        let t = tan_lat * tan_lat;
        let c = self.ep2 * cos_lat * cos_lat;
        let a = dlon * cos_lat;
        let a2 = a * a;
        let ml = meridian_distance(self.semimajor, self.es, lat);

        let x = self.x_0
            + self.k_0
                * n
                * (a + (1.0 - t + c) * a2 * a / 6.0
                    + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a2 * a2 * a / 120.0);
        let y = self.y_0
            + self.k_0
                * (ml - self.ml_0
                    + n * tan_lat
                        * (a2 / 2.0
                            + (5.0 - t + 9.0 * c + 4.0 * c * c) * a2 * a2 / 24.0
                            + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2)
                                * a2
                                * a2
                                * a2
                                / 720.0));

        (x.is_finite() && y.is_finite()).then(|| Out::new(x, y))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let es = self.es;
        let ml = self.ml_0 + (input.y() - self.y_0) / self.k_0;
        let mu = ml
            / (self.semimajor * (1.0 - es / 4.0 - 3.0 * es * es / 64.0 - 5.0 * es * es * es / 256.0));
        let sqrt_one_minus = (1.0 - es).sqrt();
        let e1 = (1.0 - sqrt_one_minus) / (1.0 + sqrt_one_minus);

        let lat_1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        if lat_1.abs() >= FRAC_PI_2 {
            let lat = FRAC_PI_2.copysign(lat_1);
            return Some(In::latlon(lat.to_degrees(), self.lon_0.to_degrees()));
        }

        let (sin_1, cos_1) = lat_1.sin_cos();
        let tan_1 = sin_1 / cos_1;
        let c1 = self.ep2 * cos_1 * cos_1;
        let t1 = tan_1 * tan_1;
        let con = 1.0 - es * sin_1 * sin_1;
        let n1 = self.semimajor / con.sqrt();
        let r1 = self.semimajor * (1.0 - es) / con.powf(1.5);
        let d = (input.x() - self.x_0) / (n1 * self.k_0);
        let d2 = d * d;

        let lat = lat_1
            - (n1 * tan_1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d2 * d2
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d2
                        * d2
                        * d2
                        / 720.0);
        let lon = self.lon_0
            + (d - (1.0 + 2.0 * t1 + c1) * d2 * d / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2 + 24.0 * t1 * t1)
                    * d2
                    * d2
                    * d
                    / 120.0)
                / cos_1;

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

    #[test]
    fn central_meridian_maps_to_false_easting() {
        let projection = TransverseMercator::<GeoPoint2d, Coord>::new(
            Ellipsoid::WGS84,
            &TransverseMercator::<GeoPoint2d, Coord>::utm_params(31, false),
        );
        let projected = projection
            .project(&GeoPoint2d::latlon(0.0, 3.0))
            .expect("inside domain");
        assert_abs_diff_eq!(projected.x(), 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.y(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn utm_round_trip() {
        let projection = TransverseMercator::<GeoPoint2d, Coord>::new(
            Ellipsoid::WGS84,
            &TransverseMercator::<GeoPoint2d, Coord>::utm_params(33, false),
        );
        let point = GeoPoint2d::latlon(52.5, 13.4);
        let projected = projection.project(&point).expect("inside domain");
        // Berlin in zone 33N lies around 391 km east, 5817 km north.
        assert!((390_000.0..393_000.0).contains(&projected.x()));
        assert!((5_815_000.0..5_820_000.0).contains(&projected.y()));

        let back = projection.unproject(&projected).expect("inside domain");
        assert_abs_diff_eq!(back.lat(), 52.5, epsilon = 1e-7);
        assert_abs_diff_eq!(back.lon(), 13.4, epsilon = 1e-7);
    }

    #[test]
    fn far_from_central_meridian_is_outside() {
        let projection = TransverseMercator::<GeoPoint2d, Coord>::new(
            Ellipsoid::WGS84,
            &ProjectionParams::default(),
        );
        assert!(projection.project(&GeoPoint2d::latlon(0.0, 120.0)).is_none());
    }
}
