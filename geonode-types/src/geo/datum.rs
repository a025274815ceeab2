use serde::{Deserialize, Serialize};

const SECONDS_TO_RADIANS: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Reference ellipsoid. A zero inverse flattening denotes a sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    name: Option<&'static str>,
    semimajor: f64,
    inv_flattening: f64,
}

impl Ellipsoid {
    /// World Geodetic System 1984.
    pub const WGS84: Self = Self::named("WGS84", 6_378_137.0, 298.257223563);
    /// Geodetic Reference System 1980.
    pub const GRS80: Self = Self::named("GRS80", 6_378_137.0, 298.257222101);
    /// Clarke 1866.
    pub const CLARKE_1866: Self = Self::named("clrk66", 6_378_206.4, 294.978_698_213_898);
    /// Clarke 1880 (modified).
    pub const CLARKE_1880: Self = Self::named("clrk80", 6_378_249.145, 293.4663);
    /// International 1924 (Hayford).
    pub const INTERNATIONAL: Self = Self::named("intl", 6_378_388.0, 297.0);
    /// Bessel 1841.
    pub const BESSEL: Self = Self::named("bessel", 6_377_397.155, 299.152_812_8);
    /// Airy 1830.
    pub const AIRY: Self = Self::named("airy", 6_377_563.396, 299.324_964_6);
    /// Krassovsky 1940.
    pub const KRASSOVSKY: Self = Self::named("krass", 6_378_245.0, 298.3);
    /// Normal sphere (r=6370997).
    pub const SPHERE: Self = Self::named("sphere", 6_370_997.0, 0.0);

    const fn named(name: &'static str, semimajor: f64, inv_flattening: f64) -> Self {
        Self {
            name: Some(name),
            semimajor,
            inv_flattening,
        }
    }

    /// Custom ellipsoid. Use `inv_flattening = 0` for a sphere.
    pub const fn new(semimajor: f64, inv_flattening: f64) -> Self {
        Self {
            name: None,
            semimajor,
            inv_flattening,
        }
    }

    /// Looks up an ellipsoid by its conventional short name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::WGS84,
            Self::GRS80,
            Self::CLARKE_1866,
            Self::CLARKE_1880,
            Self::INTERNATIONAL,
            Self::BESSEL,
            Self::AIRY,
            Self::KRASSOVSKY,
            Self::SPHERE,
        ]
        .into_iter()
        .find(|e| e.name == Some(name))
    }

    /// Short name, `None` for custom ellipsoids.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Semi-major axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening, 0 for a sphere.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Flattening.
    pub fn flattening(&self) -> f64 {
        if self.inv_flattening == 0.0 {
            0.0
        } else {
            1.0 / self.inv_flattening
        }
    }

    /// First eccentricity squared.
    pub fn eccentricity_sq(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_sq().sqrt()
    }

    /// Converts geodetic longitude and latitude (radians) and height to earth-centered cartesian coordinates.
    pub fn geodetic_to_geocentric(&self, lon: f64, lat: f64, height: f64) -> [f64; 3] {
        let es = self.eccentricity_sq();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let n = self.semimajor / (1.0 - es * sin_lat * sin_lat).sqrt();
        [
            (n + height) * cos_lat * lon.cos(),
            (n + height) * cos_lat * lon.sin(),
            (n * (1.0 - es) + height) * sin_lat,
        ]
    }

    /// Converts earth-centered cartesian coordinates to geodetic longitude, latitude (radians) and height.
    pub fn geocentric_to_geodetic(&self, [x, y, z]: [f64; 3]) -> (f64, f64, f64) {
        const MAX_ITERATIONS: usize = 30;
        const PRECISION: f64 = 1e-14;

        let es = self.eccentricity_sq();
        let lon = y.atan2(x);
        let p = x.hypot(y);

        if p < 1e-9 {
            let lat = std::f64::consts::FRAC_PI_2.copysign(z);
            let b = self.semimajor * (1.0 - self.flattening());
            return (lon, lat, z.abs() - b);
        }

        let mut lat = z.atan2(p * (1.0 - es));
        let mut height = 0.0;
        for _ in 0..MAX_ITERATIONS {
            let sin_lat = lat.sin();
            let n = self.semimajor / (1.0 - es * sin_lat * sin_lat).sqrt();
            height = p / lat.cos() - n;
            let next = z.atan2(p * (1.0 - es * n / (n + height)));
            let done = (next - lat).abs() < PRECISION;
            lat = next;
            if done {
                break;
            }
        }

        (lon, lat, height)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Seven-parameter similarity transform from a datum to WGS84 (position vector convention).
///
/// Translations are in meters, rotations in arc seconds and scale in parts per million.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Helmert {
    /// X translation.
    pub dx: f64,
    /// Y translation.
    pub dy: f64,
    /// Z translation.
    pub dz: f64,
    /// X rotation.
    pub rx: f64,
    /// Y rotation.
    pub ry: f64,
    /// Z rotation.
    pub rz: f64,
    /// Scale difference.
    pub ds: f64,
}

impl Helmert {
    /// Three-parameter (translation only) transform.
    pub const fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            dx,
            dy,
            dz,
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
            ds: 0.0,
        }
    }

    /// Builds a transform from a 3 or 7 element parameter list.
    pub fn from_params(params: &[f64]) -> Option<Self> {
        match *params {
            [dx, dy, dz] => Some(Self::translation(dx, dy, dz)),
            [dx, dy, dz, rx, ry, rz, ds] => Some(Self {
                dx,
                dy,
                dz,
                rx,
                ry,
                rz,
                ds,
            }),
            _ => None,
        }
    }

    /// All parameters are zero.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Rotations are all zero.
    pub fn is_translation(&self) -> bool {
        self.rx == 0.0 && self.ry == 0.0 && self.rz == 0.0 && self.ds == 0.0
    }

    fn factors(&self) -> (f64, f64, f64, f64) {
        (
            self.rx * SECONDS_TO_RADIANS,
            self.ry * SECONDS_TO_RADIANS,
            self.rz * SECONDS_TO_RADIANS,
            1.0 + self.ds * 1e-6,
        )
    }

    /// Applies the transform to geocentric coordinates of the datum, giving WGS84 geocentric coordinates.
    pub fn forward(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let (rx, ry, rz, m) = self.factors();
        [
            m * (x - rz * y + ry * z) + self.dx,
            m * (rz * x + y - rx * z) + self.dy,
            m * (-ry * x + rx * y + z) + self.dz,
        ]
    }

    /// Applies the inverse transform to WGS84 geocentric coordinates.
    pub fn inverse(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let (rx, ry, rz, m) = self.factors();
        let (x, y, z) = (
            (x - self.dx) / m,
            (y - self.dy) / m,
            (z - self.dz) / m,
        );
        [x + rz * y - ry * z, -rz * x + y + rx * z, ry * x - rx * y + z]
    }

    /// Parameters in definition order, trailing rotation and scale omitted when zero.
    pub fn params(&self) -> Vec<f64> {
        if self.is_translation() {
            vec![self.dx, self.dy, self.dz]
        } else {
            vec![self.dx, self.dy, self.dz, self.rx, self.ry, self.rz, self.ds]
        }
    }
}

/// Geodetic datum: how positions on its ellipsoid relate to WGS84.
///
/// A datum without a shift is unknown; no datum shift is applied to or from it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Datum {
    name: Option<&'static str>,
    to_wgs84: Option<Helmert>,
}

impl Datum {
    /// World Geodetic System 1984.
    pub const WGS84: Self = Self::named("WGS84", Helmert::translation(0.0, 0.0, 0.0));

    const fn named(name: &'static str, to_wgs84: Helmert) -> Self {
        Self {
            name: Some(name),
            to_wgs84: Some(to_wgs84),
        }
    }

    /// Datum given by explicit shift parameters.
    pub const fn custom(to_wgs84: Helmert) -> Self {
        Self {
            name: None,
            to_wgs84: Some(to_wgs84),
        }
    }

    /// Datum with no shift information.
    pub const fn unknown() -> Self {
        Self {
            name: None,
            to_wgs84: None,
        }
    }

    /// Looks up a datum by name, returning it with its ellipsoid.
    pub fn from_name(name: &str) -> Option<(Self, Ellipsoid)> {
        let entry = match name {
            "WGS84" => (Self::WGS84, Ellipsoid::WGS84),
            "NAD83" => (
                Self::named("NAD83", Helmert::translation(0.0, 0.0, 0.0)),
                Ellipsoid::GRS80,
            ),
            "NAD27" => (
                Self::named("NAD27", Helmert::translation(-8.0, 160.0, 176.0)),
                Ellipsoid::CLARKE_1866,
            ),
            "ED50" => (
                Self::named("ED50", Helmert::translation(-87.0, -98.0, -121.0)),
                Ellipsoid::INTERNATIONAL,
            ),
            "OSGB36" => (
                Self::named(
                    "OSGB36",
                    Helmert {
                        dx: 446.448,
                        dy: -125.157,
                        dz: 542.060,
                        rx: 0.1502,
                        ry: 0.2470,
                        rz: 0.8421,
                        ds: -20.4894,
                    },
                ),
                Ellipsoid::AIRY,
            ),
            "potsdam" => (
                Self::named(
                    "potsdam",
                    Helmert {
                        dx: 598.1,
                        dy: 73.7,
                        dz: 418.2,
                        rx: 0.202,
                        ry: 0.045,
                        rz: -2.455,
                        ds: 6.7,
                    },
                ),
                Ellipsoid::BESSEL,
            ),
            _ => return None,
        };
        Some(entry)
    }

    /// Datum name, `None` for custom or unknown datums.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Shift to WGS84, `None` if unknown.
    pub fn shift(&self) -> Option<&Helmert> {
        self.to_wgs84.as_ref()
    }
}
