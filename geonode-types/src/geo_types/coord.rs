use geo_types::{coord, Coord as GeoTypesCoord};

use crate::cartesian::{CartesianPoint2d, Coord, NewCartesianPoint2d};
use crate::geo::{GeoPoint, NewGeoPoint};

impl CartesianPoint2d for GeoTypesCoord<f64> {
    type Num = f64;

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl NewCartesianPoint2d<f64> for GeoTypesCoord<f64> {
    fn new(x: f64, y: f64) -> Self {
        coord!(x: x, y: y)
    }
}

impl GeoPoint for GeoTypesCoord<f64> {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.y
    }

    fn lon(&self) -> f64 {
        self.x
    }
}

impl NewGeoPoint<f64> for GeoTypesCoord<f64> {
    fn latlon(lat: f64, lon: f64) -> Self {
        coord!(x: lon, y: lat)
    }
}

impl From<GeoTypesCoord<f64>> for Coord {
    fn from(value: GeoTypesCoord<f64>) -> Self {
        Coord::new(value.x, value.y)
    }
}

impl From<Coord> for GeoTypesCoord<f64> {
    fn from(value: Coord) -> Self {
        coord!(x: value.x, y: value.y)
    }
}
