//! Boolean set operations evaluated on the labelled [`TopologyGraph`] of two geometries.
//!
//! An edge belongs to the result area boundary when exactly one of its sides is in the result. These edges are
//! traced into rings ([`polygon_builder`]). Edges outside the result area whose own location satisfies the
//! operation become lines ([`line_builder`]), and remaining isolated nodes become points.

mod line_builder;
mod polygon_builder;

use std::borrow::Cow;
use std::collections::HashSet;

use geonode_types::{
    Coord, Geom, GeometryCollection, GeometryType, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Primitive,
};
use log::debug;

use crate::location::{IndexedPointLocator, Location};
use crate::topology::{Side, TopologyGraph};

/// Boolean operation of an overlay.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum OverlayOp {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

impl OverlayOp {
    /// Whether a point with the given membership in both inputs is in the result.
    pub fn apply(self, in_a: bool, in_b: bool) -> bool {
        match self {
            OverlayOp::Intersection => in_a && in_b,
            OverlayOp::Union => in_a || in_b,
            OverlayOp::Difference => in_a && !in_b,
            OverlayOp::SymDifference => in_a != in_b,
        }
    }

    /// Dimension of an empty result.
    fn result_dimension(self, a: Option<usize>, b: Option<usize>) -> Option<usize> {
        match self {
            OverlayOp::Intersection => a.min(b),
            OverlayOp::Union | OverlayOp::SymDifference => a.max(b),
            OverlayOp::Difference => a,
        }
    }
}

fn side_in_result(graph: &TopologyGraph, edge: usize, side: Side, op: OverlayOp) -> bool {
    let a = graph.edge_label(edge, 0).side(side) == Location::Interior;
    let b = graph.edge_label(edge, 1).side(side) == Location::Interior;
    op.apply(a, b)
}

/// Empty geometry of the given dimension.
pub(crate) fn empty_of_dimension(dimension: Option<usize>) -> Geom {
    match dimension {
        None => Geom::empty(GeometryType::GeometryCollection),
        Some(0) => Geom::empty(GeometryType::Point),
        Some(1) => Geom::empty(GeometryType::LineString),
        Some(_) => Geom::empty(GeometryType::Polygon),
    }
}

/// Collects parts into the simplest geometry that holds them: a single part, a homogeneous multi geometry or a
/// collection with polygons first, then lines, then points. Returns `None` if there are no parts.
pub(crate) fn build_geometry(
    mut polygons: Vec<Polygon>,
    mut lines: Vec<LineString>,
    mut points: Vec<Coord>,
) -> Option<Geom> {
    let kinds = [!polygons.is_empty(), !lines.is_empty(), !points.is_empty()]
        .into_iter()
        .filter(|present| *present)
        .count();

    match kinds {
        0 => None,
        1 if polygons.len() == 1 => polygons.pop().map(Geom::Polygon),
        1 if lines.len() == 1 => lines.pop().map(Geom::LineString),
        1 if points.len() == 1 => points.pop().map(|c| Geom::Point(Point::new(c))),
        1 if !polygons.is_empty() => Some(Geom::MultiPolygon(MultiPolygon::new(polygons))),
        1 if !lines.is_empty() => Some(Geom::MultiLineString(MultiLineString::new(lines))),
        1 => Some(Geom::MultiPoint(MultiPoint::new(
            points.into_iter().map(Point::new).collect(),
        ))),
        _ => {
            let parts = polygons
                .into_iter()
                .map(Geom::Polygon)
                .chain(lines.into_iter().map(Geom::LineString))
                .chain(points.into_iter().map(|c| Geom::Point(Point::new(c))))
                .collect();
            Some(Geom::GeometryCollection(GeometryCollection::new(parts)))
        }
    }
}

fn build_result(graph: &TopologyGraph, op: OverlayOp) -> Option<Geom> {
    let polygons = polygon_builder::build(graph, op);

    let area = Geom::MultiPolygon(MultiPolygon::new(polygons.clone()));
    let area_locator = IndexedPointLocator::new(&area);

    let mut result_nodes: HashSet<usize> = HashSet::new();
    for edge in polygon_builder::boundary_edges(graph, op) {
        result_nodes.insert(edge.from);
        result_nodes.insert(edge.to);
    }

    let line_edges: Vec<usize> = (0..graph.edges.len())
        .filter(|&index| {
            let edge = &graph.edges[index];
            let covered = side_in_result(graph, index, Side::Left, op)
                || side_in_result(graph, index, Side::Right, op);
            let on_a = graph.edge_label(index, 0).on != Location::Exterior;
            let on_b = graph.edge_label(index, 1).on != Location::Exterior;
            !covered
                && (edge.is_line_edge() || op == OverlayOp::Intersection)
                && op.apply(on_a, on_b)
        })
        .collect();
    for &index in &line_edges {
        result_nodes.insert(graph.edges[index].from);
        result_nodes.insert(graph.edges[index].to);
    }
    let lines = line_builder::build(graph, &line_edges);

    let mut points: Vec<Coord> = (0..graph.nodes.len())
        .filter(|node| !result_nodes.contains(node))
        .filter(|&node| {
            op.apply(
                graph.node_location(node, 0) != Location::Exterior,
                graph.node_location(node, 1) != Location::Exterior,
            )
        })
        .map(|node| graph.nodes[node].coord)
        .filter(|coord| area_locator.locate(coord) == Location::Exterior)
        .collect();
    points.sort_by(Coord::cmp_xy);

    debug!(
        "{op:?} produced {} polygons, {} lines and {} points",
        polygons.len(),
        lines.len(),
        points.len()
    );

    build_geometry(polygons, lines, points)
}

/// Computes the point set operation `op` of two geometries.
///
/// Empty results are empty geometries of the natural dimension of the operation: the smaller input dimension for
/// intersections, the larger one for unions and symmetric differences and the dimension of `a` for differences.
pub(crate) fn overlay(a: &Geom, b: &Geom, op: OverlayOp) -> Geom {
    let empty = || empty_of_dimension(op.result_dimension(a.dimension(), b.dimension()));

    let trivially_empty = match op {
        OverlayOp::Intersection => a.is_empty() || b.is_empty(),
        OverlayOp::Difference => a.is_empty(),
        OverlayOp::Union | OverlayOp::SymDifference => a.is_empty() && b.is_empty(),
    };
    if trivially_empty {
        return empty();
    }

    let (a, b) = (dissolve_areas(a), dissolve_areas(b));
    let graph = TopologyGraph::pair(&a, &b);
    build_result(&graph, op).unwrap_or_else(empty)
}

/// Dissolves the internal boundaries of a single geometry.
pub(crate) fn unary_union(geom: &Geom) -> Geom {
    if geom.is_empty() {
        return empty_of_dimension(geom.dimension());
    }

    let graph = TopologyGraph::single(&dissolve_areas(geom));
    build_result(&graph, OverlayOp::Union).unwrap_or_else(|| empty_of_dimension(geom.dimension()))
}

/// Unions any number of geometries by merging them pairwise in a balanced tree.
pub(crate) fn union_all(geoms: Vec<Geom>) -> Option<Geom> {
    let mut layer = geoms;
    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len() / 2 + 1);
        let mut parts = layer.into_iter();
        while let Some(first) = parts.next() {
            next.push(match parts.next() {
                Some(second) => overlay(&first, &second, OverlayOp::Union),
                None => first,
            });
        }
        layer = next;
    }

    layer.pop()
}

/// Replaces the polygons of a geometry collection with their union.
///
/// Polygons of a collection may overlap or share edges while the collection stays valid. The point set of the
/// collection is the union of its parts, so the topology graph must see a single area without internal rings.
/// Other geometries are returned as they are.
pub(crate) fn dissolve_areas(geom: &Geom) -> Cow<'_, Geom> {
    if !matches!(geom, Geom::GeometryCollection(_)) {
        return Cow::Borrowed(geom);
    }

    let mut polygons = vec![];
    let mut others = vec![];
    for primitive in geom.primitives() {
        match primitive {
            Primitive::Polygon(polygon) => polygons.push(Geom::Polygon(polygon.clone())),
            Primitive::Line(line) => others.push(Geom::LineString(line.clone())),
            Primitive::Point(coord) => others.push(Geom::Point(Point::new(*coord))),
        }
    }
    if polygons.len() < 2 {
        return Cow::Borrowed(geom);
    }

    debug!("dissolving {} polygons of a collection", polygons.len());
    let parts = union_all(polygons).into_iter().chain(others).collect();
    Cow::Owned(Geom::GeometryCollection(GeometryCollection::new(parts)))
}
