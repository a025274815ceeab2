//! Dimensionally extended nine-intersection model.
//!
//! The matrix is read off the labelled [`TopologyGraph`] of both geometries: every node contributes a point,
//! every edge a curve and the two sides of every area edge a surface to the entry selected by their locations.

mod matrix;

use geonode_types::Geom;

pub use matrix::{Dimension, IntersectionMatrix};
pub(crate) use matrix::validate_pattern;

use crate::location::Location;
use crate::overlay::dissolve_areas;
use crate::topology::{Side, TopologyGraph};

/// Computes the intersection matrix of two geometries.
///
/// Polygons of a geometry collection are merged first, so overlapping or adjacent parts count as one area.
pub fn relate(a: &Geom, b: &Geom) -> IntersectionMatrix {
    relate_graph(&TopologyGraph::pair(&dissolve_areas(a), &dissolve_areas(b)))
}

pub(crate) fn relate_graph(graph: &TopologyGraph) -> IntersectionMatrix {
    let mut matrix = IntersectionMatrix::default();
    matrix.set(Location::Exterior, Location::Exterior, Dimension::Surface);

    for (index, edge) in graph.edges.iter().enumerate() {
        let a = graph.edge_label(index, 0);
        let b = graph.edge_label(index, 1);
        matrix.set_at_least(a.on, b.on, Dimension::Curve);

        if edge.is_area_edge() {
            for side in [Side::Left, Side::Right] {
                matrix.set_at_least(a.side(side), b.side(side), Dimension::Surface);
            }
        }
    }

    for node in 0..graph.nodes.len() {
        matrix.set_at_least(
            graph.node_location(node, 0),
            graph.node_location(node, 1),
            Dimension::Point,
        );
    }

    matrix
}
