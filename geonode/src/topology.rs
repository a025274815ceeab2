//! Noded planar graph built from the edges of one or two geometries.
//!
//! All segments of the inputs are split at every node that lies on them (vertices, mutual intersection points and
//! point components), so two edges of the graph either coincide completely or meet only at nodes. Coincident pieces
//! coming from different sources are merged into one [`Edge`] that remembers all its [`EdgeSource`]s.
//!
//! After noding every node and every edge is labelled with its [`Location`] relative to each input, and every edge
//! additionally with the location of the areas immediately to its left and right. These labels are all the
//! predicate engine and the overlay need.

use std::collections::HashMap;

use geonode_types::{CartesianPoint2d, Coord, Geom, Primitive, Segment, SegmentIntersection, Winding};
use log::trace;
use rstar::primitives::GeomWithData;
use rstar::{RTree, RTreeObject, AABB};

use crate::index::envelope;
use crate::location::{IndexedPointLocator, Location, LocationAccumulator};

/// Nodes closer than this share of the largest coordinate magnitude are merged.
pub(crate) const RELATIVE_TOLERANCE: f64 = 1e-12;

/// Side of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    Line,
    Ring { shell: bool, counter_clockwise: bool },
}

/// Input segment an edge was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EdgeSource {
    /// Index of the input geometry.
    pub arg: usize,
    /// Index of the primitive in the input geometry.
    pub component: usize,
    pub kind: SourceKind,
    /// Source segment runs from the edge's `from` node to its `to` node.
    pub forward: bool,
}

/// Location of an edge and of both its sides relative to one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EdgeLabel {
    pub on: Location,
    pub left: Location,
    pub right: Location,
}

impl EdgeLabel {
    const EXTERIOR: Self = Self {
        on: Location::Exterior,
        left: Location::Exterior,
        right: Location::Exterior,
    };

    pub fn side(&self, side: Side) -> Location {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub coord: Coord,
    /// Incident edges.
    pub edges: Vec<usize>,
    labels: [Location; 2],
}

#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub from: usize,
    pub to: usize,
    pub sources: Vec<EdgeSource>,
    labels: [EdgeLabel; 2],
}

impl Edge {
    /// The node at the other end of the edge.
    pub fn opposite(&self, node: usize) -> usize {
        if node == self.from {
            self.to
        } else {
            self.from
        }
    }

    pub fn has_ring_source(&self, arg: usize) -> bool {
        self.sources
            .iter()
            .any(|s| s.arg == arg && matches!(s.kind, SourceKind::Ring { .. }))
    }

    pub fn has_line_source(&self, arg: usize) -> bool {
        self.sources
            .iter()
            .any(|s| s.arg == arg && s.kind == SourceKind::Line)
    }

    /// Edge bounds an area of any input.
    pub fn is_area_edge(&self) -> bool {
        self.sources
            .iter()
            .any(|s| matches!(s.kind, SourceKind::Ring { .. }))
    }

    pub fn is_line_edge(&self) -> bool {
        self.sources.iter().any(|s| s.kind == SourceKind::Line)
    }
}

#[derive(Debug, Clone, Copy)]
struct RawSegment {
    start: Coord,
    end: Coord,
    arg: usize,
    component: usize,
    kind: SourceKind,
}

impl RawSegment {
    fn segment(&self) -> Segment<'_, Coord> {
        Segment(&self.start, &self.end)
    }
}

struct SegmentEntry {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Nodes of the graph, merging coordinates closer than the tolerance.
struct NodeRegistry {
    coords: Vec<Coord>,
    tree: RTree<GeomWithData<[f64; 2], usize>>,
    tolerance: f64,
}

impl NodeRegistry {
    fn new(tolerance: f64) -> Self {
        Self {
            coords: vec![],
            tree: RTree::new(),
            tolerance,
        }
    }

    fn insert(&mut self, coord: Coord) -> usize {
        let point = [coord.x, coord.y];
        if let Some(existing) = self
            .tree
            .locate_within_distance(point, self.tolerance * self.tolerance)
            .map(|node| node.data)
            .min()
        {
            return existing;
        }

        let id = self.coords.len();
        self.coords.push(coord);
        self.tree.insert(GeomWithData::new(point, id));
        id
    }

    /// Ids of the nodes lying on the segment, ordered from its start to its end.
    fn nodes_on(&self, start_id: usize, end_id: usize) -> Vec<usize> {
        let (start, end) = (self.coords[start_id], self.coords[end_id]);
        let segment = Segment(&start, &end);
        let query = envelope(&segment.rect().expand(self.tolerance));

        let mut nodes: Vec<(f64, usize)> = self
            .tree
            .locate_in_envelope_intersecting(&query)
            .map(|node| node.data)
            .filter(|&id| id != start_id && id != end_id)
            .filter(|&id| segment.contains_point(&self.coords[id], self.tolerance))
            .map(|id| (segment.parameter(&self.coords[id]), id))
            .collect();
        nodes.push((f64::NEG_INFINITY, start_id));
        nodes.push((f64::INFINITY, end_id));
        nodes.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut ids: Vec<usize> = nodes.into_iter().map(|(_, id)| id).collect();
        ids.dedup();
        ids
    }
}

/// Per-input data needed to label nodes and edges.
struct ArgInfo {
    locator: IndexedPointLocator,
    /// Number of open line endpoints at a node.
    endpoints: HashMap<usize, usize>,
    /// Nodes of point components.
    points: Vec<usize>,
}

/// Noded and labelled graph of one or two geometries.
pub(crate) struct TopologyGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

fn collect_input(
    arg: usize,
    geom: &Geom,
    segments: &mut Vec<RawSegment>,
    points: &mut Vec<(usize, Coord)>,
    endpoints: &mut Vec<(usize, Coord)>,
) {
    for (component, primitive) in geom.primitives().into_iter().enumerate() {
        match primitive {
            Primitive::Point(coord) => points.push((arg, *coord)),
            Primitive::Line(line) => {
                let coords = line.coords();
                if line.distinct_count() < 2 {
                    points.push((arg, coords[0]));
                    continue;
                }
                if !line.is_closed() {
                    endpoints.push((arg, coords[0]));
                    endpoints.push((arg, coords[coords.len() - 1]));
                }
                for pair in coords.windows(2) {
                    segments.push(RawSegment {
                        start: pair[0],
                        end: pair[1],
                        arg,
                        component,
                        kind: SourceKind::Line,
                    });
                }
            }
            Primitive::Polygon(polygon) => {
                for (ring_index, ring) in polygon.rings().enumerate() {
                    let kind = SourceKind::Ring {
                        shell: ring_index == 0,
                        counter_clockwise: ring.winding() == Winding::CounterClockwise,
                    };
                    for pair in ring.coords().windows(2) {
                        segments.push(RawSegment {
                            start: pair[0],
                            end: pair[1],
                            arg,
                            component,
                            kind,
                        });
                    }
                }
            }
        }
    }
}

impl TopologyGraph {
    /// Builds the graph of one geometry.
    pub fn single(geom: &Geom) -> Self {
        Self::build(&[geom])
    }

    /// Builds the graph of two geometries.
    pub fn pair(a: &Geom, b: &Geom) -> Self {
        Self::build(&[a, b])
    }

    fn build(geoms: &[&Geom]) -> Self {
        let mut raw_segments = vec![];
        let mut raw_points = vec![];
        let mut raw_endpoints = vec![];
        for (arg, geom) in geoms.iter().enumerate() {
            collect_input(
                arg,
                geom,
                &mut raw_segments,
                &mut raw_points,
                &mut raw_endpoints,
            );
        }
        raw_segments.retain(|s| !s.start.equal(&s.end));

        let magnitude = geoms
            .iter()
            .flat_map(|g| g.coords())
            .map(Coord::magnitude)
            .fold(1.0, f64::max);
        let tolerance = RELATIVE_TOLERANCE * magnitude;

        let mut registry = NodeRegistry::new(tolerance);
        let segment_nodes: Vec<(usize, usize)> = raw_segments
            .iter()
            .map(|s| (registry.insert(s.start), registry.insert(s.end)))
            .collect();
        let point_nodes: Vec<(usize, usize)> = raw_points
            .iter()
            .map(|(arg, coord)| (*arg, registry.insert(*coord)))
            .collect();
        let endpoint_nodes: Vec<(usize, usize)> = raw_endpoints
            .iter()
            .map(|(arg, coord)| (*arg, registry.insert(*coord)))
            .collect();

        Self::insert_intersections(&raw_segments, &mut registry);

        let mut edges: Vec<Edge> = vec![];
        let mut edge_keys: HashMap<(usize, usize), usize> = HashMap::new();
        for (raw, &(start, end)) in raw_segments.iter().zip(&segment_nodes) {
            let chain = registry.nodes_on(start, end);
            for pair in chain.windows(2) {
                let (u, v) = (pair[0], pair[1]);
                let key = (u.min(v), u.max(v));
                let index = *edge_keys.entry(key).or_insert_with(|| {
                    edges.push(Edge {
                        from: key.0,
                        to: key.1,
                        sources: vec![],
                        labels: [EdgeLabel::EXTERIOR; 2],
                    });
                    edges.len() - 1
                });
                edges[index].sources.push(EdgeSource {
                    arg: raw.arg,
                    component: raw.component,
                    kind: raw.kind,
                    forward: u == key.0,
                });
            }
        }

        let mut nodes: Vec<Node> = registry
            .coords
            .iter()
            .map(|&coord| Node {
                coord,
                edges: vec![],
                labels: [Location::Exterior; 2],
            })
            .collect();
        for (index, edge) in edges.iter().enumerate() {
            nodes[edge.from].edges.push(index);
            nodes[edge.to].edges.push(index);
        }

        trace!(
            "noded {} segments into {} edges and {} nodes",
            raw_segments.len(),
            edges.len(),
            nodes.len()
        );

        let mut graph = Self { nodes, edges };

        for (arg, geom) in geoms.iter().enumerate() {
            let mut info = ArgInfo {
                locator: IndexedPointLocator::new(geom),
                endpoints: HashMap::new(),
                points: vec![],
            };
            for &(_, node) in endpoint_nodes.iter().filter(|(a, _)| *a == arg) {
                *info.endpoints.entry(node).or_default() += 1;
            }
            info.points = point_nodes
                .iter()
                .filter(|(a, _)| *a == arg)
                .map(|(_, node)| *node)
                .collect();

            graph.label(arg, &info);
        }

        graph
    }

    fn insert_intersections(segments: &[RawSegment], registry: &mut NodeRegistry) {
        let tree = RTree::bulk_load(
            segments
                .iter()
                .enumerate()
                .map(|(index, s)| SegmentEntry {
                    index,
                    envelope: envelope(&s.segment().rect()),
                })
                .collect(),
        );

        for (index, segment) in segments.iter().enumerate() {
            let query = envelope(&segment.segment().rect());
            for candidate in tree.locate_in_envelope_intersecting(&query) {
                if candidate.index <= index {
                    continue;
                }
                match segment
                    .segment()
                    .intersection(&segments[candidate.index].segment())
                {
                    SegmentIntersection::None => {}
                    SegmentIntersection::Point(point) => {
                        registry.insert(point);
                    }
                    SegmentIntersection::Collinear(p, q) => {
                        registry.insert(p);
                        registry.insert(q);
                    }
                }
            }
        }
    }

    fn label(&mut self, arg: usize, info: &ArgInfo) {
        for edge in &mut self.edges {
            let mut left_in = false;
            let mut right_in = false;
            let on_ring = edge.has_ring_source(arg);

            if on_ring {
                for source in edge.sources.iter().filter(|s| s.arg == arg) {
                    if let SourceKind::Ring {
                        shell,
                        counter_clockwise,
                    } = source.kind
                    {
                        let ring_inside_on_left = counter_clockwise == source.forward;
                        if ring_inside_on_left == shell {
                            left_in = true;
                        } else {
                            right_in = true;
                        }
                    }
                }
            } else if !info.locator.is_empty() {
                let midpoint = self.nodes[edge.from]
                    .coord
                    .midpoint(&self.nodes[edge.to].coord);
                let inside = info.locator.locate(&midpoint) == Location::Interior;
                left_in = inside;
                right_in = inside;
            }

            let on = if on_ring {
                if left_in && right_in {
                    Location::Interior
                } else {
                    Location::Boundary
                }
            } else if left_in || edge.has_line_source(arg) {
                Location::Interior
            } else {
                Location::Exterior
            };

            let side = |inside: bool| {
                if inside {
                    Location::Interior
                } else {
                    Location::Exterior
                }
            };
            edge.labels[arg] = EdgeLabel {
                on,
                left: side(left_in),
                right: side(right_in),
            };
        }

        for index in 0..self.nodes.len() {
            let node = &self.nodes[index];
            let mut acc = LocationAccumulator::default();

            let mut on_ring = false;
            for &edge_index in &node.edges {
                let edge = &self.edges[edge_index];
                if edge.has_ring_source(arg) {
                    on_ring = true;
                    match edge.labels[arg].on {
                        Location::Boundary => acc.area_boundary = true,
                        _ => acc.area_interior = true,
                    }
                }
                if edge.has_line_source(arg) {
                    acc.line_interior = true;
                }
            }
            if acc.area_boundary {
                acc.area_interior = false;
            }
            if !on_ring {
                match info.locator.locate(&node.coord) {
                    Location::Interior => acc.area_interior = true,
                    Location::Boundary => acc.area_boundary = true,
                    Location::Exterior => {}
                }
            }

            acc.line_endpoints = info.endpoints.get(&index).copied().unwrap_or(0);
            acc.point = info.points.contains(&index);

            self.nodes[index].labels[arg] = acc.location();
        }
    }

    pub fn node_location(&self, node: usize, arg: usize) -> Location {
        self.nodes[node].labels[arg]
    }

    pub fn edge_label(&self, edge: usize, arg: usize) -> EdgeLabel {
        self.edges[edge].labels[arg]
    }
}
