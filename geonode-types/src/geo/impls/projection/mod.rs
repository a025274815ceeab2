//! Implementations for the supported projection families.
mod equirectangular;
mod geographic;
mod lambert;
mod mercator;
mod transverse_mercator;

pub use equirectangular::Equirectangular;
pub use geographic::Geographic;
pub use lambert::LambertConformalConic;
pub use mercator::Mercator;
pub use transverse_mercator::TransverseMercator;

#[cfg(feature = "geodesy")]
mod geodesy;
#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyProjection;

use std::f64::consts::{FRAC_PI_2, PI};

/// Parameters shared by the projection families. Angles are in degrees, offsets in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Central meridian.
    pub lon_0: f64,
    /// Latitude of origin.
    pub lat_0: f64,
    /// First standard parallel.
    pub lat_1: Option<f64>,
    /// Second standard parallel.
    pub lat_2: Option<f64>,
    /// Latitude of true scale.
    pub lat_ts: Option<f64>,
    /// Scale factor at the natural origin.
    pub k_0: f64,
    /// False easting.
    pub x_0: f64,
    /// False northing.
    pub y_0: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            lon_0: 0.0,
            lat_0: 0.0,
            lat_1: None,
            lat_2: None,
            lat_ts: None,
            k_0: 1.0,
            x_0: 0.0,
            y_0: 0.0,
        }
    }
}

/// Wraps a longitude difference into `[-PI, PI]`.
pub(crate) fn adjust_lon(lon: f64) -> f64 {
    if lon.abs() <= PI {
        lon
    } else {
        lon - 2.0 * PI * ((lon + PI) / (2.0 * PI)).floor()
    }
}

/// Isometric latitude helper `t` of Snyder (15-9).
pub(crate) fn tsfn(lat: f64, e: f64) -> f64 {
    let sin_lat = e * lat.sin();
    (FRAC_PI_2 / 2.0 - lat / 2.0).tan() / ((1.0 - sin_lat) / (1.0 + sin_lat)).powf(e / 2.0)
}

/// Inverse of [`tsfn`]: latitude from `t` by fixed-point iteration (Snyder 7-9).
pub(crate) fn phi_from_ts(ts: f64, e: f64) -> Option<f64> {
    const MAX_ITERATIONS: usize = 15;
    const PRECISION: f64 = 1e-12;

    let mut lat = FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = e * lat.sin();
        let next =
            FRAC_PI_2 - 2.0 * (ts * ((1.0 - sin_lat) / (1.0 + sin_lat)).powf(e / 2.0)).atan();
        if (next - lat).abs() < PRECISION {
            return Some(next);
        }
        lat = next;
    }

    log::debug!("latitude iteration did not converge for ts={ts}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn adjust_lon_wraps() {
        assert_abs_diff_eq!(adjust_lon(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(adjust_lon(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        assert_eq!(adjust_lon(1.0), 1.0);
    }

    #[test]
    fn ts_round_trip() {
        let e = 0.0818191908426;
        let lat = 0.7;
        let ts = tsfn(lat, e);
        assert_abs_diff_eq!(phi_from_ts(ts, e).expect("converges"), lat, epsilon = 1e-11);
    }
}
