//! Plain-text exports. Attributes are dropped.

use crate::graph::Graph;
use gfx_graph_algorithms::Direction;

/// One line per node: its id, then the ids of its distinct out-neighbors
/// (all neighbors when undirected). Nodes without neighbors still get a
/// line.
pub fn adjacency_list(graph: &Graph) -> String {
    let view = graph.view();
    let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();

    let mut out = String::new();
    for (index, id) in ids.iter().enumerate() {
        out.push_str(id);
        for neighbor in view.distinct_neighbors(index, Direction::Outgoing) {
            out.push(' ');
            out.push_str(ids[neighbor]);
        }
        out.push('\n');
    }
    out
}

/// One line per edge: `source target [weight]`
pub fn edge_list(graph: &Graph) -> String {
    let mut out = String::new();
    for edge in graph.edges() {
        let (source, target) = graph.endpoints(edge);
        out.push_str(source);
        out.push(' ');
        out.push_str(target);
        if let Some(weight) = edge.weight {
            out.push(' ');
            out.push_str(&weight.to_string());
        }
        out.push('\n');
    }
    out
}
