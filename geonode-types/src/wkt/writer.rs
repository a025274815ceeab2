use std::fmt::{Result, Write};

use crate::cartesian::Coord;
use crate::geometry::{Geom, LineString, Point, Polygon};

/// Number of digits written after the decimal point of every ordinate.
pub const PRECISION: usize = 16;

fn write_coord(out: &mut String, coord: &Coord) -> Result {
    write!(out, "{:.prec$} {:.prec$}", coord.x, coord.y, prec = PRECISION)
}

fn write_sequence<T>(
    out: &mut String,
    items: &[T],
    mut item: impl FnMut(&mut String, &T) -> Result,
) -> Result {
    out.push('(');
    for (index, value) in items.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        item(out, value)?;
    }
    out.push(')');
    Ok(())
}

fn write_point_body(out: &mut String, point: &Point) -> Result {
    match point.coord() {
        Some(coord) => {
            out.push('(');
            write_coord(out, coord)?;
            out.push(')');
            Ok(())
        }
        None => {
            out.push_str("EMPTY");
            Ok(())
        }
    }
}

fn write_line_body(out: &mut String, line: &LineString) -> Result {
    if line.is_empty() {
        out.push_str("EMPTY");
        return Ok(());
    }
    write_sequence(out, line.coords(), write_coord)
}

fn write_polygon_body(out: &mut String, polygon: &Polygon) -> Result {
    if polygon.is_empty() {
        out.push_str("EMPTY");
        return Ok(());
    }
    let rings: Vec<&LineString> = polygon.rings().collect();
    write_sequence(out, &rings, |out, ring| write_line_body(out, ring))
}

fn write_parts<T>(
    out: &mut String,
    parts: &[T],
    item: impl FnMut(&mut String, &T) -> Result,
) -> Result {
    if parts.is_empty() {
        out.push_str("EMPTY");
        return Ok(());
    }
    write_sequence(out, parts, item)
}

fn write_geom(out: &mut String, geom: &Geom) -> Result {
    out.push_str(geom.geometry_type().keyword());
    out.push(' ');
    match geom {
        Geom::Point(point) => write_point_body(out, point),
        Geom::LineString(line) => write_line_body(out, line),
        Geom::Polygon(polygon) => write_polygon_body(out, polygon),
        Geom::MultiPoint(multi) => write_parts(out, multi.parts(), write_point_body),
        Geom::MultiLineString(multi) => write_parts(out, multi.parts(), write_line_body),
        Geom::MultiPolygon(multi) => write_parts(out, multi.parts(), write_polygon_body),
        Geom::GeometryCollection(collection) => {
            write_parts(out, collection.parts(), write_geom)
        }
    }
}

/// Serializes a geometry to WKT with fixed-point ordinates.
pub fn write(geom: &Geom) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_geom(&mut out, geom);
    out
}
