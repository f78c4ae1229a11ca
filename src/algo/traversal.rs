//! Neighbor, path and reachability queries by node id

use super::{Analyzer, NeighborDirection, ReachDirection};
use crate::config::TieBreak;
use crate::error::GfxResult;
use crate::graph::Node;
use gfx_graph_algorithms::{self as algo, Direction};
use rustc_hash::FxHashSet;
use serde::Serialize;

/// A path between two nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub source: String,
    pub target: String,
    /// Node ids from source to target, both included
    pub path: Vec<String>,
    /// Number of edges on the path
    pub length: usize,
    /// Summed edge weight, only for weighted searches
    pub total_weight: Option<f64>,
}

impl<'g> Analyzer<'g> {
    fn path_result(&self, indices: &[usize], total_weight: Option<f64>) -> PathResult {
        let path: Vec<String> = indices.iter().map(|&i| self.id_of(i).to_string()).collect();
        PathResult {
            source: path.first().cloned().unwrap_or_default(),
            target: path.last().cloned().unwrap_or_default(),
            length: path.len().saturating_sub(1),
            path,
            total_weight,
        }
    }

    /// Nodes within `1..=depth` hops, origin excluded
    pub fn neighbors(&self, id: &str, direction: NeighborDirection, depth: usize) -> GfxResult<Vec<&'g Node>> {
        let origin = self.graph.require_node(id)?.0;
        if depth == 0 {
            return Ok(Vec::new());
        }

        let distances = algo::bfs_distances(self.graph.view(), origin, direction.into(), Some(depth));
        let found = reached_except(&distances, origin);
        Ok(self.ordered_nodes(found))
    }

    /// Fewest-hop path, or cheapest path when `weighted`. `None` when the
    /// target is unreachable.
    pub fn shortest_path(&self, source: &str, target: &str, weighted: bool) -> GfxResult<Option<PathResult>> {
        let s = self.graph.require_node(source)?.0;
        let t = self.graph.require_node(target)?.0;
        let view = self.graph.view();

        if weighted {
            let found = algo::dijkstra(view, s, t, Direction::Outgoing)
                .map_err(|e| self.graph.resolve_algo_error(e))?;
            Ok(found.map(|p| self.path_result(&p.path, Some(p.cost))))
        } else {
            Ok(algo::bfs(view, s, t, Direction::Outgoing).map(|p| self.path_result(&p.path, None)))
        }
    }

    /// Every simple path of at most `max_depth` edges.
    pub fn all_paths(&self, source: &str, target: &str, max_depth: Option<usize>) -> GfxResult<Vec<PathResult>> {
        let s = self.graph.require_node(source)?.0;
        let t = self.graph.require_node(target)?.0;

        let mut paths = algo::all_simple_paths(self.graph.view(), s, t, Direction::Outgoing, max_depth);
        if self.tie_break() == TieBreak::Lexicographic {
            paths.sort_by(|a, b| {
                let a_ids = a.iter().map(|&i| self.id_of(i));
                let b_ids = b.iter().map(|&i| self.id_of(i));
                a_ids.cmp(b_ids)
            });
        }

        Ok(paths.iter().map(|p| self.path_result(p, None)).collect())
    }

    pub fn has_path(&self, source: &str, target: &str) -> GfxResult<bool> {
        let s = self.graph.require_node(source)?.0;
        let t = self.graph.require_node(target)?.0;
        Ok(algo::has_path(self.graph.view(), s, t, Direction::Outgoing))
    }

    /// Nodes reachable from `id`, origin excluded. `Both` is the union of the
    /// forward and backward sets.
    pub fn reachable(&self, id: &str, direction: ReachDirection, max_depth: Option<usize>) -> GfxResult<Vec<&'g Node>> {
        let origin = self.graph.require_node(id)?.0;
        let view = self.graph.view();

        let walks: &[Direction] = match direction {
            ReachDirection::Forward => &[Direction::Outgoing],
            ReachDirection::Backward => &[Direction::Incoming],
            ReachDirection::Both => &[Direction::Outgoing, Direction::Incoming],
        };

        let mut found = Vec::new();
        for &walk in walks {
            let distances = algo::bfs_distances(view, origin, walk, max_depth);
            found.extend(reached_except(&distances, origin));
        }
        Ok(self.ordered_nodes(found))
    }

    /// Nodes adjacent to both `a` and `b`, ignoring direction
    pub fn common_neighbors(&self, a: &str, b: &str) -> GfxResult<Vec<&'g Node>> {
        let a = self.graph.require_node(a)?.0;
        let b = self.graph.require_node(b)?.0;
        let view = self.graph.view();

        let around_a: FxHashSet<usize> = view.neighbors(a, Direction::Both).collect();
        let common: Vec<usize> = view
            .distinct_neighbors(b, Direction::Both)
            .into_iter()
            .filter(|n| around_a.contains(n))
            .collect();
        Ok(self.ordered_nodes(common))
    }
}

fn reached_except(distances: &[Option<usize>], origin: usize) -> Vec<usize> {
    distances
        .iter()
        .enumerate()
        .filter(|&(i, d)| i != origin && d.is_some())
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::GfxError;
    use crate::graph::{DefaultEdgeType, Graph};

    /// z -> m, z -> a, m -> t, a -> t
    fn fork() -> Graph {
        let mut builder = Graph::builder(DefaultEdgeType::Directed);
        builder.add_edge("z", "m");
        builder.add_edge("z", "a");
        builder.add_edge("m", "t");
        builder.add_edge("a", "t").weight = Some(0.5);
        builder.build()
    }

    fn ids(nodes: &[&Node]) -> Vec<String> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_neighbors_order_follows_tie_break() {
        let graph = fork();
        let insertion = Analyzer::new(&graph);
        assert_eq!(ids(&insertion.neighbors("z", NeighborDirection::Out, 1).unwrap()), vec!["m", "a"]);

        let lexicographic = Analyzer::with_config(
            &graph,
            EngineConfig::default().with_tie_break(TieBreak::Lexicographic),
        );
        assert_eq!(ids(&lexicographic.neighbors("z", NeighborDirection::Out, 1).unwrap()), vec!["a", "m"]);
    }

    #[test]
    fn test_neighbors_depth_and_direction() {
        let graph = fork();
        let analyzer = Analyzer::new(&graph);

        assert_eq!(analyzer.neighbors("z", NeighborDirection::Out, 2).unwrap().len(), 3);
        assert!(analyzer.neighbors("z", NeighborDirection::In, 1).unwrap().is_empty());
        assert_eq!(ids(&analyzer.neighbors("t", NeighborDirection::In, 1).unwrap()), vec!["m", "a"]);
        assert!(analyzer.neighbors("z", NeighborDirection::All, 0).unwrap().is_empty());
    }

    #[test]
    fn test_weighted_and_unweighted_paths_differ() {
        let graph = fork();
        let analyzer = Analyzer::new(&graph);

        let hops = analyzer.shortest_path("z", "t", false).unwrap().unwrap();
        assert_eq!(hops.path, vec!["z", "m", "t"]);
        assert_eq!(hops.length, 2);
        assert_eq!(hops.total_weight, None);

        let cheap = analyzer.shortest_path("z", "t", true).unwrap().unwrap();
        assert_eq!(cheap.path, vec!["z", "a", "t"]);
        assert_eq!(cheap.total_weight, Some(1.5));

        let same = analyzer.shortest_path("m", "m", false).unwrap().unwrap();
        assert_eq!(same.length, 0);
        assert!(analyzer.shortest_path("t", "z", false).unwrap().is_none());
    }

    #[test]
    fn test_all_paths_lexicographic_order() {
        let graph = fork();
        let analyzer = Analyzer::with_config(
            &graph,
            EngineConfig::default().with_tie_break(TieBreak::Lexicographic),
        );
        let paths: Vec<Vec<String>> = analyzer
            .all_paths("z", "t", None)
            .unwrap()
            .into_iter()
            .map(|p| p.path)
            .collect();
        assert_eq!(paths, vec![vec!["z", "a", "t"], vec!["z", "m", "t"]]);
    }

    #[test]
    fn test_reachable_and_common_neighbors() {
        let graph = fork();
        let analyzer = Analyzer::new(&graph);

        assert_eq!(ids(&analyzer.reachable("m", ReachDirection::Forward, None).unwrap()), vec!["t"]);
        assert_eq!(ids(&analyzer.reachable("m", ReachDirection::Backward, None).unwrap()), vec!["z"]);
        assert_eq!(ids(&analyzer.reachable("m", ReachDirection::Both, None).unwrap()), vec!["z", "t"]);
        assert_eq!(ids(&analyzer.common_neighbors("m", "a").unwrap()), vec!["z", "t"]);
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let graph = fork();
        let analyzer = Analyzer::new(&graph);
        assert!(matches!(analyzer.has_path("z", "nope"), Err(GfxError::NodeNotFound(id)) if id == "nope"));
        assert!(analyzer.neighbors("nope", NeighborDirection::All, 1).is_err());
        assert!(analyzer.all_paths("nope", "t", None).is_err());
    }
}
