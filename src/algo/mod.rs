//! Graph algorithms module
//!
//! Algorithms are implemented in the `gfx-graph-algorithms` crate over dense
//! indices. This module is the adapter layer: it validates node ids, runs the
//! algorithm on the graph's [`GraphView`](gfx_graph_algorithms::GraphView)
//! and maps indices back to ids, applying the configured tie-break order.

pub mod centrality;
pub mod components;
pub mod stats;
pub mod traversal;

use crate::config::{EngineConfig, TieBreak};
use crate::graph::{Graph, Node, NodeIndex};
use gfx_graph_algorithms::Direction;
use serde::{Deserialize, Serialize};

pub use centrality::{CentralityKind, CentralityResult};
pub use components::{ComponentInfo, ComponentKind};
pub use stats::{DegreeInfo, GraphStats};
pub use traversal::PathResult;

/// Which edges a neighbor query follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborDirection {
    In,
    Out,
    #[default]
    All,
}

impl From<NeighborDirection> for Direction {
    fn from(direction: NeighborDirection) -> Self {
        match direction {
            NeighborDirection::In => Direction::Incoming,
            NeighborDirection::Out => Direction::Outgoing,
            NeighborDirection::All => Direction::Both,
        }
    }
}

/// Which way a reachability query walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReachDirection {
    #[default]
    Forward,
    Backward,
    Both,
}

/// Read-only query front end over one graph
#[derive(Debug, Clone)]
pub struct Analyzer<'g> {
    graph: &'g Graph,
    config: EngineConfig,
}

impl<'g> Analyzer<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    pub fn with_config(graph: &'g Graph, config: EngineConfig) -> Self {
        Analyzer { graph, config }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn tie_break(&self) -> TieBreak {
        self.config.tie_break
    }

    /// Dense indices to nodes, ordered by the tie-break policy
    fn ordered_nodes(&self, mut indices: Vec<usize>) -> Vec<&'g Node> {
        let graph = self.graph;
        let tie_break = self.tie_break();
        indices.sort_unstable_by(|&a, &b| {
            tie_break.compare(
                (a, graph.node_at(NodeIndex(a)).id.as_str()),
                (b, graph.node_at(NodeIndex(b)).id.as_str()),
            )
        });
        indices.dedup();
        indices
            .into_iter()
            .map(|i| graph.node_at(NodeIndex(i)))
            .collect()
    }

    fn id_of(&self, index: usize) -> &'g str {
        &self.graph.node_at(NodeIndex(index)).id
    }
}
