use crate::cartesian::{Coord, NewCartesianPoint2d};
use crate::error::GeonodeTypesError;
use crate::geo::datum::{Datum, Ellipsoid, Helmert};
use crate::geo::impls::projection::{
    Equirectangular, Geographic, LambertConformalConic, Mercator, ProjectionParams,
    TransverseMercator,
};
use crate::geo::impls::GeoPoint2d;
use crate::geo::traits::point::{GeoPoint, NewGeoPoint};
use crate::geo::traits::projection::Projection;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Coordinate reference system parsed from a `+key=value` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Crs {
    projection_type: ProjectionType,
    params: ProjectionParams,
    ellipsoid: Ellipsoid,
    datum: Datum,
    units: Units,
}

/// Projection family of a [`Crs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    /// Geographic longitude/latitude in degrees.
    LongLat,
    /// Normal Mercator.
    Mercator,
    /// Transverse Mercator.
    TransverseMercator,
    /// Universal Transverse Mercator zone.
    Utm {
        /// Zone number, 1 to 60.
        zone: u8,
        /// Southern hemisphere (false northing of 10 000 km).
        south: bool,
    },
    /// Equidistant cylindrical.
    Equirectangular,
    /// Lambert conformal conic.
    LambertConformalConic,
}

impl ProjectionType {
    fn name(&self) -> &'static str {
        match self {
            ProjectionType::LongLat => "longlat",
            ProjectionType::Mercator => "merc",
            ProjectionType::TransverseMercator => "tmerc",
            ProjectionType::Utm { .. } => "utm",
            ProjectionType::Equirectangular => "eqc",
            ProjectionType::LambertConformalConic => "lcc",
        }
    }
}

/// Linear units of projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Units {
    name: Option<&'static str>,
    to_meter: f64,
}

impl Units {
    /// Meters.
    pub const METER: Self = Self {
        name: Some("m"),
        to_meter: 1.0,
    };

    fn from_name(name: &str) -> Option<Self> {
        let (name, to_meter) = match name {
            "m" => ("m", 1.0),
            "km" => ("km", 1000.0),
            "ft" => ("ft", 0.3048),
            "us-ft" => ("us-ft", 1200.0 / 3937.0),
            _ => return None,
        };
        Some(Self {
            name: Some(name),
            to_meter,
        })
    }

    /// Length of one unit in meters.
    pub fn to_meter(&self) -> f64 {
        self.to_meter
    }
}

struct Tokens<'a> {
    values: HashMap<&'a str, Option<&'a str>>,
}

impl<'a> Tokens<'a> {
    fn parse(definition: &'a str) -> Result<Self, GeonodeTypesError> {
        let mut values = HashMap::new();
        for token in definition.split_whitespace() {
            let Some(token) = token.strip_prefix('+') else {
                return Err(GeonodeTypesError::InvalidProjection(format!(
                    "unexpected token '{token}'"
                )));
            };
            match token.split_once('=') {
                Some((key, value)) => values.insert(key, Some(value)),
                None => values.insert(token, None),
            };
        }

        Ok(Self { values })
    }

    fn flag(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn text(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).copied().flatten()
    }

    fn number(&self, key: &str) -> Result<Option<f64>, GeonodeTypesError> {
        self.text(key)
            .map(|value| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        GeonodeTypesError::InvalidProjection(format!(
                            "+{key} must be a number, got '{value}'"
                        ))
                    })
            })
            .transpose()
    }

    fn numbers(&self, key: &str) -> Result<Option<Vec<f64>>, GeonodeTypesError> {
        self.text(key)
            .map(|value| {
                value
                    .split(',')
                    .map(|part| part.trim().parse::<f64>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| {
                        GeonodeTypesError::InvalidProjection(format!(
                            "+{key} must be a list of numbers, got '{value}'"
                        ))
                    })
            })
            .transpose()
    }
}

impl Crs {
    /// Parses a definition such as `"+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs"`.
    pub fn new(definition: &str) -> Result<Self, GeonodeTypesError> {
        if definition.trim().is_empty() {
            return Err(GeonodeTypesError::MissingArgument(
                "projection definition".into(),
            ));
        }

        let tokens = Tokens::parse(definition)?;
        let family = tokens
            .text("proj")
            .ok_or_else(|| GeonodeTypesError::InvalidProjection("missing +proj".into()))?;

        let projection_type = match family {
            "longlat" | "latlong" | "lonlat" | "latlon" => ProjectionType::LongLat,
            "merc" => ProjectionType::Mercator,
            "tmerc" => ProjectionType::TransverseMercator,
            "eqc" => ProjectionType::Equirectangular,
            "lcc" => ProjectionType::LambertConformalConic,
            "utm" => {
                let zone = tokens
                    .number("zone")?
                    .filter(|z| z.fract() == 0.0 && (1.0..=60.0).contains(z))
                    .ok_or_else(|| {
                        GeonodeTypesError::InvalidProjection(
                            "+proj=utm requires +zone between 1 and 60".into(),
                        )
                    })?;
                ProjectionType::Utm {
                    zone: zone as u8,
                    south: tokens.flag("south"),
                }
            }
            other => {
                return Err(GeonodeTypesError::InvalidProjection(format!(
                    "unsupported projection family '{other}'"
                )))
            }
        };

        let params = match projection_type {
            ProjectionType::Utm { zone, south } => {
                TransverseMercator::<GeoPoint2d, Coord>::utm_params(zone, south)
            }
            _ => ProjectionParams {
                lon_0: tokens.number("lon_0")?.unwrap_or(0.0),
                lat_0: tokens.number("lat_0")?.unwrap_or(0.0),
                lat_1: tokens.number("lat_1")?,
                lat_2: tokens.number("lat_2")?,
                lat_ts: tokens.number("lat_ts")?,
                k_0: match tokens.number("k_0")? {
                    Some(k) => k,
                    None => tokens.number("k")?.unwrap_or(1.0),
                },
                x_0: tokens.number("x_0")?.unwrap_or(0.0),
                y_0: tokens.number("y_0")?.unwrap_or(0.0),
            },
        };

        if projection_type == ProjectionType::LambertConformalConic && params.lat_1.is_none() {
            return Err(GeonodeTypesError::InvalidProjection(
                "+proj=lcc requires +lat_1".into(),
            ));
        }

        let (mut datum, datum_ellipsoid) = match tokens.text("datum") {
            Some(name) => {
                let (datum, ellipsoid) = Datum::from_name(name).ok_or_else(|| {
                    GeonodeTypesError::InvalidProjection(format!("unknown datum '{name}'"))
                })?;
                (datum, Some(ellipsoid))
            }
            None => (Datum::unknown(), None),
        };

        if let Some(params) = tokens.numbers("towgs84")? {
            let helmert = Helmert::from_params(&params).ok_or_else(|| {
                GeonodeTypesError::InvalidProjection(
                    "+towgs84 takes 3 or 7 parameters".into(),
                )
            })?;
            datum = Datum::custom(helmert);
        }

        let ellipsoid = Self::parse_ellipsoid(&tokens)?
            .or(datum_ellipsoid)
            .unwrap_or(Ellipsoid::WGS84);

        let units = match (tokens.number("to_meter")?, tokens.text("units")) {
            (Some(to_meter), _) if to_meter > 0.0 => Units {
                name: None,
                to_meter,
            },
            (Some(_), _) => {
                return Err(GeonodeTypesError::InvalidProjection(
                    "+to_meter must be positive".into(),
                ))
            }
            (None, Some(name)) => Units::from_name(name).ok_or_else(|| {
                GeonodeTypesError::InvalidProjection(format!("unknown units '{name}'"))
            })?,
            (None, None) => Units::METER,
        };

        Ok(Self {
            projection_type,
            params,
            ellipsoid,
            datum,
            units,
        })
    }

    fn parse_ellipsoid(tokens: &Tokens) -> Result<Option<Ellipsoid>, GeonodeTypesError> {
        if let Some(radius) = tokens.number("R")? {
            return Ok(Some(Ellipsoid::new(radius, 0.0)));
        }

        if let Some(a) = tokens.number("a")? {
            let inv_flattening = if let Some(rf) = tokens.number("rf")? {
                rf
            } else if let Some(f) = tokens.number("f")? {
                if f == 0.0 {
                    0.0
                } else {
                    1.0 / f
                }
            } else if let Some(b) = tokens.number("b")? {
                if a == b {
                    0.0
                } else {
                    a / (a - b)
                }
            } else {
                0.0
            };
            if a <= 0.0 || inv_flattening < 0.0 {
                return Err(GeonodeTypesError::InvalidProjection(
                    "ellipsoid axes are out of range".into(),
                ));
            }
            return Ok(Some(Ellipsoid::new(a, inv_flattening)));
        }

        tokens
            .text("ellps")
            .map(|name| {
                Ellipsoid::from_name(name).ok_or_else(|| {
                    GeonodeTypesError::InvalidProjection(format!("unknown ellipsoid '{name}'"))
                })
            })
            .transpose()
    }

    /// Geographic WGS84 longitude/latitude.
    pub fn wgs84() -> Self {
        Self {
            projection_type: ProjectionType::LongLat,
            params: ProjectionParams::default(),
            ellipsoid: Ellipsoid::WGS84,
            datum: Datum::WGS84,
            units: Units::METER,
        }
    }

    /// Spherical web mercator used by tiled web maps.
    pub fn web_mercator() -> Self {
        Self {
            projection_type: ProjectionType::Mercator,
            params: ProjectionParams::default(),
            ellipsoid: Ellipsoid::new(6_378_137.0, 0.0),
            datum: Datum::unknown(),
            units: Units::METER,
        }
    }

    /// Projection family.
    pub fn projection_type(&self) -> ProjectionType {
        self.projection_type
    }

    /// Reference ellipsoid.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Geodetic datum.
    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    /// Linear units of projected coordinates.
    pub fn units(&self) -> &Units {
        &self.units
    }

    /// Coordinates are longitude/latitude degrees.
    pub fn is_geographic(&self) -> bool {
        self.projection_type == ProjectionType::LongLat
    }

    /// Returns the projection from geographic points to this system's planar coordinates in meters.
    pub fn get_projection<In, Out>(&self) -> Box<dyn Projection<InPoint = In, OutPoint = Out>>
    where
        In: NewGeoPoint + 'static,
        Out: NewCartesianPoint2d + 'static,
    {
        let ellipsoid = self.ellipsoid;
        let params = &self.params;
        match self.projection_type {
            ProjectionType::LongLat => Box::new(Geographic::new()),
            ProjectionType::Mercator => Box::new(Mercator::new(ellipsoid, params)),
            ProjectionType::TransverseMercator | ProjectionType::Utm { .. } => {
                Box::new(TransverseMercator::new(ellipsoid, params))
            }
            ProjectionType::Equirectangular => Box::new(Equirectangular::new(ellipsoid, params)),
            ProjectionType::LambertConformalConic => Box::new(LambertConformalConic::new(
                ellipsoid,
                params,
                params.lat_1.unwrap_or(params.lat_0),
            )),
        }
    }

    /// Canonical definition: family, parameters with defaults, ellipsoid, datum, shift, units.
    pub fn definition(&self) -> String {
        let mut parts = vec![format!("+proj={}", self.projection_type.name())];
        let p = &self.params;

        let mut push = |key: &str, value: f64| parts.push(format!("+{key}={value}"));
        match self.projection_type {
            ProjectionType::LongLat => {}
            ProjectionType::Mercator => {
                match p.lat_ts {
                    Some(lat_ts) => push("lat_ts", lat_ts),
                    None => push("k_0", p.k_0),
                }
                push("lon_0", p.lon_0);
                push("x_0", p.x_0);
                push("y_0", p.y_0);
            }
            ProjectionType::TransverseMercator => {
                push("lat_0", p.lat_0);
                push("lon_0", p.lon_0);
                push("k_0", p.k_0);
                push("x_0", p.x_0);
                push("y_0", p.y_0);
            }
            ProjectionType::Utm { zone, .. } => push("zone", f64::from(zone)),
            ProjectionType::Equirectangular => {
                push("lat_ts", p.lat_ts.unwrap_or(0.0));
                push("lat_0", p.lat_0);
                push("lon_0", p.lon_0);
                push("x_0", p.x_0);
                push("y_0", p.y_0);
            }
            ProjectionType::LambertConformalConic => {
                let lat_1 = p.lat_1.unwrap_or(p.lat_0);
                push("lat_1", lat_1);
                push("lat_2", p.lat_2.unwrap_or(lat_1));
                push("lat_0", p.lat_0);
                push("lon_0", p.lon_0);
                push("k_0", p.k_0);
                push("x_0", p.x_0);
                push("y_0", p.y_0);
            }
        }
        if let ProjectionType::Utm { south: true, .. } = self.projection_type {
            parts.push("+south".into());
        }

        match self.ellipsoid.name() {
            Some(name) => parts.push(format!("+ellps={name}")),
            None if self.ellipsoid.inv_flattening() == 0.0 => {
                parts.push(format!("+R={}", self.ellipsoid.semimajor()))
            }
            None => parts.push(format!(
                "+a={} +rf={}",
                self.ellipsoid.semimajor(),
                self.ellipsoid.inv_flattening()
            )),
        }

        if let Some(name) = self.datum.name() {
            parts.push(format!("+datum={name}"));
        }
        if let Some(shift) = self.datum.shift().filter(|h| !h.is_identity()) {
            let values: Vec<String> = shift.params().iter().map(f64::to_string).collect();
            parts.push(format!("+towgs84={}", values.join(",")));
        }

        if !self.is_geographic() {
            match self.units.name {
                Some(name) => parts.push(format!("+units={name}")),
                None => parts.push(format!("+to_meter={}", self.units.to_meter)),
            }
        }

        parts.push("+no_defs".into());
        parts.join(" ")
    }

    fn needs_datum_shift(&self, other: &Crs) -> bool {
        match (self.datum.shift(), other.datum.shift()) {
            (Some(a), Some(b)) => a != b || self.ellipsoid != other.ellipsoid,
            _ => false,
        }
    }
}

impl FromStr for Crs {
    type Err = GeonodeTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.definition())
    }
}

/// Maps planar coordinates of one [`Crs`] into another.
///
/// Source coordinates are unprojected to geographic, shifted through geocentric WGS84 when both systems carry
/// different datums, and projected into the target system.
pub struct CrsTransform {
    source: Crs,
    target: Crs,
    source_projection: Box<dyn Projection<InPoint = GeoPoint2d, OutPoint = Coord>>,
    target_projection: Box<dyn Projection<InPoint = GeoPoint2d, OutPoint = Coord>>,
    datum_shift: bool,
}

impl CrsTransform {
    /// Creates a transform from `source` to `target`.
    pub fn new(source: &Crs, target: &Crs) -> Self {
        Self {
            source: source.clone(),
            target: target.clone(),
            source_projection: source.get_projection(),
            target_projection: target.get_projection(),
            datum_shift: source.needs_datum_shift(target),
        }
    }

    fn to_meters(crs: &Crs, coord: &Coord) -> Coord {
        if crs.is_geographic() {
            *coord
        } else {
            Coord::new(coord.x * crs.units.to_meter, coord.y * crs.units.to_meter)
        }
    }

    fn from_meters(crs: &Crs, coord: Coord) -> Coord {
        if crs.is_geographic() {
            coord
        } else {
            Coord::new(coord.x / crs.units.to_meter, coord.y / crs.units.to_meter)
        }
    }

    fn shift(from: &Crs, to: &Crs, point: &GeoPoint2d) -> Option<GeoPoint2d> {
        let (Some(from_shift), Some(to_shift)) = (from.datum.shift(), to.datum.shift()) else {
            return Some(*point);
        };

        let geocentric = from
            .ellipsoid
            .geodetic_to_geocentric(point.lon_rad(), point.lat_rad(), 0.0);
        let wgs84 = from_shift.forward(geocentric);
        let target = to_shift.inverse(wgs84);
        let (lon, lat, _) = to.ellipsoid.geocentric_to_geodetic(target);

        let result = GeoPoint2d::from_radians(lon, lat);
        result.is_finite().then_some(result)
    }

    fn run(
        &self,
        coord: &Coord,
        from: (&Crs, &dyn Projection<InPoint = GeoPoint2d, OutPoint = Coord>),
        to: (&Crs, &dyn Projection<InPoint = GeoPoint2d, OutPoint = Coord>),
    ) -> Option<Coord> {
        let geographic = from.1.unproject(&Self::to_meters(from.0, coord))?;
        let geographic = if self.datum_shift {
            Self::shift(from.0, to.0, &geographic)?
        } else {
            geographic
        };
        let projected = to.1.project(&geographic)?;
        let result = Self::from_meters(to.0, projected);
        result.is_finite().then_some(result)
    }
}

impl Projection for CrsTransform {
    type InPoint = Coord;
    type OutPoint = Coord;

    fn project(&self, input: &Coord) -> Option<Coord> {
        self.run(
            input,
            (&self.source, self.source_projection.as_ref()),
            (&self.target, self.target_projection.as_ref()),
        )
    }

    fn unproject(&self, input: &Coord) -> Option<Coord> {
        self.run(
            input,
            (&self.target, self.target_projection.as_ref()),
            (&self.source, self.source_projection.as_ref()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::CartesianPoint2d;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn canonical_definitions() {
        let crs = Crs::new("+proj=longlat +datum=WGS84 +no_defs").expect("valid");
        insta::assert_snapshot!(crs.definition(), @"+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs");

        let crs = Crs::new("+proj=merc +datum=WGS84").expect("valid");
        insta::assert_snapshot!(crs.definition(), @"+proj=merc +k_0=1 +lon_0=0 +x_0=0 +y_0=0 +ellps=WGS84 +datum=WGS84 +units=m +no_defs");

        let crs = Crs::new("+proj=utm +zone=33 +south +ellps=intl +towgs84=-87,-98,-121 +units=km")
            .expect("valid");
        insta::assert_snapshot!(crs.definition(), @"+proj=utm +zone=33 +south +ellps=intl +towgs84=-87,-98,-121 +units=km +no_defs");

        let crs = Crs::new("+proj=latlong +a=6378137 +b=6378137").expect("valid");
        insta::assert_snapshot!(crs.definition(), @"+proj=longlat +R=6378137 +no_defs");
    }

    #[test]
    fn parse_errors() {
        assert_matches!(Crs::new(""), Err(GeonodeTypesError::MissingArgument(_)));
        assert_matches!(
            Crs::new("+proj=robin"),
            Err(GeonodeTypesError::InvalidProjection(_))
        );
        assert_matches!(
            Crs::new("+proj=utm"),
            Err(GeonodeTypesError::InvalidProjection(_))
        );
        assert_matches!(
            Crs::new("+proj=lcc +lat_0=10"),
            Err(GeonodeTypesError::InvalidProjection(_))
        );
        assert_matches!(
            Crs::new("proj=merc"),
            Err(GeonodeTypesError::InvalidProjection(_))
        );
        assert_matches!(
            Crs::new("+proj=merc +lon_0=abc"),
            Err(GeonodeTypesError::InvalidProjection(_))
        );
        assert_matches!(
            Crs::new("+proj=merc +towgs84=1,2"),
            Err(GeonodeTypesError::InvalidProjection(_))
        );
        assert_matches!(
            Crs::new("+proj=merc +datum=MARS"),
            Err(GeonodeTypesError::InvalidProjection(_))
        );
        assert!(Crs::new("+proj=merc +wktext +unknown=1").is_ok());
    }

    #[test]
    fn longlat_to_mercator() {
        let transform = CrsTransform::new(
            &Crs::new("+proj=longlat +datum=WGS84").expect("valid"),
            &Crs::new("+proj=merc +datum=WGS84 +units=m").expect("valid"),
        );
        let projected = transform
            .project(&Coord::new(1.0, 1.0))
            .expect("inside domain");
        assert_abs_diff_eq!(projected.x, 111_319.490_793_273_57, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.y, 110_579.965_221_895_87, epsilon = 1e-6);

        let back = transform.unproject(&projected).expect("inside domain");
        assert_abs_diff_eq!(back, Coord::new(1.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn units_scale_output() {
        let transform = CrsTransform::new(
            &Crs::wgs84(),
            &Crs::new("+proj=merc +datum=WGS84 +units=km").expect("valid"),
        );
        let projected = transform
            .project(&Coord::new(1.0, 0.0))
            .expect("inside domain");
        assert_abs_diff_eq!(projected.x, 111.319_490_793_273_57, epsilon = 1e-9);
    }

    #[test]
    fn datum_shift_round_trip() {
        let nad27 = Crs::new("+proj=longlat +datum=NAD27").expect("valid");
        let transform = CrsTransform::new(&nad27, &Crs::wgs84());
        let point = Coord::new(-100.0, 40.0);
        let shifted = transform.project(&point).expect("inside domain");
        assert!(shifted.distance_sq(&point) > 1e-10);
        assert!((shifted.x - point.x).abs() < 0.01 && (shifted.y - point.y).abs() < 0.01);

        let back = transform.unproject(&shifted).expect("inside domain");
        assert_abs_diff_eq!(back, point, epsilon = 1e-8);
    }

    #[test]
    fn unknown_datum_is_not_shifted() {
        let transform = CrsTransform::new(&Crs::web_mercator(), &Crs::wgs84());
        let point = transform
            .project(&Coord::new(111_319.490_793_273_57, 0.0))
            .expect("inside domain");
        assert_abs_diff_eq!(point, Coord::new(1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn outside_domain() {
        let transform = CrsTransform::new(
            &Crs::wgs84(),
            &Crs::new("+proj=merc +datum=WGS84").expect("valid"),
        );
        assert!(transform.project(&Coord::new(0.0, 90.0)).is_none());
    }
}
