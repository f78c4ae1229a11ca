//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

use rustc_hash::{FxHashMap, FxHashSet};
use std::ops::Range;
use thiserror::Error;

/// Errors raised by the algorithms in this crate.
///
/// Indices refer to the dense node / edge numbering of the [`GraphView`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlgoError {
    /// A weighted algorithm met an edge with a negative weight
    #[error("edge {edge} has negative weight {weight}")]
    NegativeWeight { edge: usize, weight: f64 },

    /// An iterative algorithm exhausted its iteration budget
    #[error("{algorithm} did not converge within {iterations} iterations")]
    Convergence {
        algorithm: &'static str,
        iterations: usize,
    },
}

pub type AlgoResult<T> = Result<T, AlgoError>;

/// Which incident edges a traversal follows.
///
/// Undirected views ignore this: every incident edge is followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }
}

/// One traversable step out of a node: the node on the far side, the edge
/// used, and that edge's weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub node: usize,
    pub edge: usize,
    pub weight: f64,
}

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// For directed graphs the outgoing and incoming structures differ. For
/// undirected graphs every edge is listed under both endpoints (a self-loop
/// once) and the incoming structure mirrors the outgoing one.
///
/// Per-node lists keep edge insertion order, which is what makes traversal
/// tie-breaking deterministic.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Whether edge direction is meaningful
    pub directed: bool,

    /// Offsets into `out_targets` / `out_edges`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,
    /// Edge index of each entry in `out_targets`
    pub out_edges: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources` / `in_edges`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,
    /// Edge index of each entry in `in_sources`
    pub in_edges: Vec<usize>,

    /// Edge weights, indexed by edge
    pub weights: Vec<f64>,

    out_degrees: Vec<usize>,
    in_degrees: Vec<usize>,
}

impl GraphView {
    /// Build a view from `(source, target, weight)` triples. The position of
    /// a triple in `edges` becomes its edge index.
    pub fn from_edges(node_count: usize, directed: bool, edges: &[(usize, usize, f64)]) -> Self {
        let mut out_arcs = Vec::with_capacity(if directed { edges.len() } else { edges.len() * 2 });
        let mut in_arcs = Vec::with_capacity(if directed { edges.len() } else { 0 });
        let mut out_degrees = vec![0usize; node_count];
        let mut in_degrees = vec![0usize; node_count];
        let mut weights = Vec::with_capacity(edges.len());

        for (edge, &(source, target, weight)) in edges.iter().enumerate() {
            debug_assert!(source < node_count && target < node_count);
            weights.push(weight);
            out_arcs.push((source, target, edge));
            if directed {
                in_arcs.push((target, source, edge));
                out_degrees[source] += 1;
                in_degrees[target] += 1;
            } else {
                if source != target {
                    out_arcs.push((target, source, edge));
                }
                // A self-loop contributes two endpoints to the degree
                out_degrees[source] += 1;
                out_degrees[target] += 1;
            }
        }

        let (out_offsets, out_targets, out_edges) = compress(node_count, &out_arcs);
        let (in_offsets, in_sources, in_edges, in_degrees) = if directed {
            let (offsets, sources, edges) = compress(node_count, &in_arcs);
            (offsets, sources, edges, in_degrees)
        } else {
            (
                out_offsets.clone(),
                out_targets.clone(),
                out_edges.clone(),
                out_degrees.clone(),
            )
        };

        GraphView {
            node_count,
            directed,
            out_offsets,
            out_targets,
            out_edges,
            in_offsets,
            in_sources,
            in_edges,
            weights,
            out_degrees,
            in_degrees,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_degrees[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_degrees[idx]
    }

    /// Total degree: in + out for directed graphs, incident edge endpoints
    /// for undirected ones. Self-loops count twice either way.
    pub fn degree(&self, idx: usize) -> usize {
        if self.directed {
            self.out_degrees[idx] + self.in_degrees[idx]
        } else {
            self.out_degrees[idx]
        }
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.out_targets[self.out_range(idx)]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        &self.in_sources[self.in_range(idx)]
    }

    pub fn weight(&self, edge: usize) -> f64 {
        self.weights[edge]
    }

    /// Iterate the arcs leaving `idx` in the requested direction.
    ///
    /// `Both` yields outgoing arcs before incoming ones. Range selection is
    /// done up front so the iterator stays a plain slice walk.
    pub fn arcs(&self, idx: usize, direction: Direction) -> impl Iterator<Item = Arc> + '_ {
        let (use_out, use_in) = match direction {
            _ if !self.directed => (true, false),
            Direction::Outgoing => (true, false),
            Direction::Incoming => (false, true),
            Direction::Both => (true, true),
        };
        let out_range = if use_out { self.out_range(idx) } else { 0..0 };
        let in_range = if use_in { self.in_range(idx) } else { 0..0 };

        let out = out_range.map(move |pos| {
            let edge = self.out_edges[pos];
            Arc {
                node: self.out_targets[pos],
                edge,
                weight: self.weights[edge],
            }
        });
        let inc = in_range.map(move |pos| {
            let edge = self.in_edges[pos];
            Arc {
                node: self.in_sources[pos],
                edge,
                weight: self.weights[edge],
            }
        });
        out.chain(inc)
    }

    pub fn neighbors(&self, idx: usize, direction: Direction) -> impl Iterator<Item = usize> + '_ {
        self.arcs(idx, direction).map(|arc| arc.node)
    }

    /// Neighbors with parallel edges collapsed, first occurrence order.
    /// Self-loops are kept.
    pub fn distinct_neighbors(&self, idx: usize, direction: Direction) -> Vec<usize> {
        let mut seen = FxHashSet::default();
        self.neighbors(idx, direction)
            .filter(|node| seen.insert(*node))
            .collect()
    }

    /// Neighbors with parallel edges collapsed to their lightest weight and
    /// self-loops dropped. This is the simple-graph adjacency shortest-path
    /// counting works on.
    pub fn collapsed_arcs(&self, idx: usize, direction: Direction) -> Vec<(usize, f64)> {
        let mut position: FxHashMap<usize, usize> = FxHashMap::default();
        let mut collapsed: Vec<(usize, f64)> = Vec::new();
        for arc in self.arcs(idx, direction) {
            if arc.node == idx {
                continue;
            }
            match position.get(&arc.node) {
                Some(&slot) => {
                    if arc.weight < collapsed[slot].1 {
                        collapsed[slot].1 = arc.weight;
                    }
                }
                None => {
                    position.insert(arc.node, collapsed.len());
                    collapsed.push((arc.node, arc.weight));
                }
            }
        }
        collapsed
    }

    /// The first edge (by index) carrying a negative weight, if any.
    pub fn first_negative_weight(&self) -> Option<(usize, f64)> {
        self.weights
            .iter()
            .enumerate()
            .find(|(_, w)| **w < 0.0)
            .map(|(edge, w)| (edge, *w))
    }

    fn out_range(&self, idx: usize) -> Range<usize> {
        self.out_offsets[idx]..self.out_offsets[idx + 1]
    }

    fn in_range(&self, idx: usize) -> Range<usize> {
        self.in_offsets[idx]..self.in_offsets[idx + 1]
    }
}

/// Counting-sort `(from, to, edge)` arcs into CSR arrays, keeping the
/// relative order of arcs that share a `from` node.
fn compress(node_count: usize, arcs: &[(usize, usize, usize)]) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
    let mut offsets = vec![0usize; node_count + 1];
    for &(from, _, _) in arcs {
        offsets[from + 1] += 1;
    }
    for i in 0..node_count {
        offsets[i + 1] += offsets[i];
    }

    let mut cursor = offsets.clone();
    let mut targets = vec![0usize; arcs.len()];
    let mut edges = vec![0usize; arcs.len()];
    for &(from, to, edge) in arcs {
        let slot = cursor[from];
        targets[slot] = to;
        edges[slot] = edge;
        cursor[from] += 1;
    }

    (offsets, targets, edges)
}
