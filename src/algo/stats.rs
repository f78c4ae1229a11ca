//! Whole-graph statistics and degree reports

use super::Analyzer;
use crate::error::GfxResult;
use gfx_graph_algorithms as algo;
use serde::Serialize;

/// Summary statistics
///
/// `diameter`, `radius` and `avg_path_length` are `None` unless every node
/// reaches every other node along edge direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub is_directed: bool,
    pub is_connected: bool,
    pub num_components: usize,
    pub avg_degree: f64,
    pub avg_clustering: f64,
    pub has_cycles: bool,
    pub diameter: Option<usize>,
    pub radius: Option<usize>,
    pub avg_path_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegreeInfo {
    pub node: String,
    pub in_degree: usize,
    pub out_degree: usize,
    pub degree: usize,
}

impl<'g> Analyzer<'g> {
    pub fn stats(&self) -> GraphStats {
        let view = self.graph.view();
        let n = view.node_count;

        let components = algo::weakly_connected_components(view);
        let total_degree: usize = (0..n).map(|i| view.degree(i)).sum();
        let distances = algo::distance_summary(view);

        GraphStats {
            node_count: n,
            edge_count: view.edge_count(),
            density: algo::density(view),
            is_directed: view.directed,
            is_connected: components.len() == 1,
            num_components: components.len(),
            avg_degree: if n > 0 { total_degree as f64 / n as f64 } else { 0.0 },
            avg_clustering: algo::average_clustering(view),
            has_cycles: algo::has_cycle(view),
            diameter: distances.as_ref().map(|d| d.diameter),
            radius: distances.as_ref().map(|d| d.radius),
            avg_path_length: distances.as_ref().map(|d| d.average_path_length),
        }
    }

    pub fn degree(&self, id: &str) -> GfxResult<DegreeInfo> {
        let index = self.graph.require_node(id)?.0;
        Ok(self.degree_at(index))
    }

    /// All nodes, highest total degree first
    pub fn degrees(&self) -> Vec<DegreeInfo> {
        let tie_break = self.config.tie_break;
        let mut all: Vec<(usize, DegreeInfo)> = (0..self.graph.node_count())
            .map(|i| (i, self.degree_at(i)))
            .collect();
        all.sort_by(|(ia, a), (ib, b)| {
            b.degree
                .cmp(&a.degree)
                .then_with(|| tie_break.compare((*ia, a.node.as_str()), (*ib, b.node.as_str())))
        });
        all.into_iter().map(|(_, info)| info).collect()
    }

    fn degree_at(&self, index: usize) -> DegreeInfo {
        let view = self.graph.view();
        DegreeInfo {
            node: self.id_of(index).to_string(),
            in_degree: view.in_degree(index),
            out_degree: view.out_degree(index),
            degree: view.degree(index),
        }
    }
}
