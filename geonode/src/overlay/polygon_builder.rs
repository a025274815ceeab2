use std::collections::HashMap;
use std::f64::consts::TAU;

use geonode_types::{Coord, LineString, Polygon};
use log::{trace, warn};

use super::{side_in_result, OverlayOp};
use crate::location::{locate_in_ring, Location};
use crate::topology::{Side, TopologyGraph};

/// Edge of the result boundary, oriented with the result area on its left.
#[derive(Debug, Clone, Copy)]
pub(super) struct DirectedEdge {
    pub from: usize,
    pub to: usize,
}

/// Selects the graph edges that separate result area from non-result area.
pub(super) fn boundary_edges(graph: &TopologyGraph, op: OverlayOp) -> Vec<DirectedEdge> {
    graph
        .edges
        .iter()
        .enumerate()
        .filter(|(_, edge)| edge.is_area_edge())
        .filter_map(|(index, edge)| {
            let left = side_in_result(graph, index, Side::Left, op);
            let right = side_in_result(graph, index, Side::Right, op);
            match (left, right) {
                (true, false) => Some(DirectedEdge {
                    from: edge.from,
                    to: edge.to,
                }),
                (false, true) => Some(DirectedEdge {
                    from: edge.to,
                    to: edge.from,
                }),
                _ => None,
            }
        })
        .collect()
}

fn angle(from: &Coord, to: &Coord) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

struct RingTracer<'a> {
    graph: &'a TopologyGraph,
    edges: &'a [DirectedEdge],
    outgoing: HashMap<usize, Vec<usize>>,
    visited: Vec<bool>,
}

impl<'a> RingTracer<'a> {
    fn new(graph: &'a TopologyGraph, edges: &'a [DirectedEdge]) -> Self {
        let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
        for (index, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.from).or_default().push(index);
        }

        Self {
            graph,
            edges,
            outgoing,
            visited: vec![false; edges.len()],
        }
    }

    fn coord(&self, node: usize) -> &Coord {
        &self.graph.nodes[node].coord
    }

    /// The outgoing edge at the end of `incoming` that is reached first when rotating clockwise from the
    /// direction back along `incoming`. This keeps the traced face on the left.
    fn next_edge(&self, incoming: usize) -> Option<usize> {
        let DirectedEdge { from, to } = self.edges[incoming];
        let origin = self.coord(to);
        let back = angle(origin, self.coord(from));
        let turn = |candidate: &usize| {
            let direction = angle(origin, self.coord(self.edges[*candidate].to));
            let turn = (back - direction).rem_euclid(TAU);
            if turn == 0.0 {
                TAU
            } else {
                turn
            }
        };

        self.outgoing
            .get(&to)?
            .iter()
            .min_by(|a, b| turn(a).total_cmp(&turn(b)))
            .copied()
    }

    /// Follows result edges from `start` until the ring closes. Returns the visited node ids, first node repeated
    /// at the end.
    fn trace(&mut self, start: usize) -> Option<Vec<usize>> {
        let mut nodes = vec![self.edges[start].from];
        let mut current = start;
        loop {
            self.visited[current] = true;
            nodes.push(self.edges[current].to);

            let Some(next) = self.next_edge(current) else {
                warn!(
                    "overlay ring ends without continuation at {:?}",
                    self.coord(self.edges[current].to)
                );
                return None;
            };
            if next == start {
                return Some(nodes);
            }
            if self.visited[next] {
                warn!(
                    "overlay ring tracing reached a used edge at {:?}",
                    self.coord(self.edges[next].from)
                );
                return None;
            }
            current = next;
        }
    }
}

/// Splits a closed node sequence at repeated nodes into simple closed rings.
fn split_at_repeated_nodes(graph: &TopologyGraph, sequence: &[usize]) -> Vec<Vec<Coord>> {
    let mut rings = vec![];
    let mut stack: Vec<usize> = vec![];
    let mut position: HashMap<usize, usize> = HashMap::new();

    for &node in sequence {
        if let Some(&start) = position.get(&node) {
            let mut ring: Vec<Coord> = stack[start..]
                .iter()
                .map(|&n| graph.nodes[n].coord)
                .collect();
            ring.push(graph.nodes[node].coord);
            for removed in stack.drain(start + 1..) {
                position.remove(&removed);
            }
            rings.push(ring);
        } else {
            position.insert(node, stack.len());
            stack.push(node);
        }
    }

    rings
}

/// Builds the polygons of the overlay result. Shells are returned clockwise and holes counterclockwise.
pub(super) fn build(graph: &TopologyGraph, op: OverlayOp) -> Vec<Polygon> {
    let edges = boundary_edges(graph, op);
    let mut tracer = RingTracer::new(graph, &edges);

    let mut shells: Vec<LineString> = vec![];
    let mut holes: Vec<LineString> = vec![];
    for start in 0..edges.len() {
        if tracer.visited[start] {
            continue;
        }
        let Some(sequence) = tracer.trace(start) else {
            continue;
        };

        for ring in split_at_repeated_nodes(graph, &sequence) {
            let ring = LineString::new(ring);
            let area = ring.area_signed();
            if area > 0.0 {
                shells.push(ring);
            } else if area < 0.0 {
                holes.push(ring);
            }
        }
    }

    trace!(
        "overlay traced {} shells and {} holes from {} edges",
        shells.len(),
        holes.len(),
        edges.len()
    );

    let shell_areas: Vec<f64> = shells.iter().map(LineString::area_signed).collect();
    let mut polygon_holes: Vec<Vec<LineString>> = vec![vec![]; shells.len()];
    for hole in holes {
        let coords = hole.coords();
        let probe = coords[0].midpoint(&coords[1]);
        let owner = shells
            .iter()
            .enumerate()
            .filter(|(_, shell)| locate_in_ring(&probe, shell.coords()) != Location::Exterior)
            .min_by(|(a, _), (b, _)| shell_areas[*a].total_cmp(&shell_areas[*b]))
            .map(|(index, _)| index);

        match owner {
            Some(index) => polygon_holes[index].push(hole.reversed()),
            None => warn!("overlay hole at {:?} has no enclosing shell", coords[0]),
        }
    }

    shells
        .iter()
        .zip(polygon_holes)
        .map(|(shell, holes)| Polygon::new(shell.reversed(), holes))
        .collect()
}
