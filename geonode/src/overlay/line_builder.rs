use std::collections::BTreeMap;

use geonode_types::LineString;

use crate::topology::TopologyGraph;

/// Joins the selected edges into maximal lines. Chains are broken at every node where the number of selected
/// edges is not two.
pub(super) fn build(graph: &TopologyGraph, selected: &[usize]) -> Vec<LineString> {
    let mut incident: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &edge in selected {
        incident.entry(graph.edges[edge].from).or_default().push(edge);
        incident.entry(graph.edges[edge].to).or_default().push(edge);
    }

    let mut used: BTreeMap<usize, bool> = selected.iter().map(|&e| (e, false)).collect();
    let mut lines = vec![];

    let chain_starts: Vec<usize> = incident
        .iter()
        .filter(|(_, edges)| edges.len() != 2)
        .map(|(node, _)| *node)
        .collect();
    for node in chain_starts {
        for &edge in &incident[&node] {
            if !used[&edge] {
                lines.push(walk(graph, &incident, &mut used, node, edge));
            }
        }
    }

    // Whatever is left forms closed loops through degree 2 nodes.
    for &edge in selected {
        if !used[&edge] {
            let start = graph.edges[edge].from;
            lines.push(walk(graph, &incident, &mut used, start, edge));
        }
    }

    lines
}

fn walk(
    graph: &TopologyGraph,
    incident: &BTreeMap<usize, Vec<usize>>,
    used: &mut BTreeMap<usize, bool>,
    start: usize,
    first_edge: usize,
) -> LineString {
    let mut coords = vec![graph.nodes[start].coord];
    let mut node = start;
    let mut edge = first_edge;
    loop {
        used.insert(edge, true);
        node = graph.edges[edge].opposite(node);
        coords.push(graph.nodes[node].coord);

        let edges = &incident[&node];
        if edges.len() != 2 {
            break;
        }
        match edges.iter().find(|e| !used[e]) {
            Some(&next) => edge = next,
            None => break,
        }
    }

    LineString::new(coords)
}
