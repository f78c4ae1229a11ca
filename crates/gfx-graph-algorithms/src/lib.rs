//! Exact graph algorithms over a dense, index-based graph view.
//!
//! Nothing in this crate knows about node identifiers or attributes: callers
//! build a [`GraphView`] with nodes numbered `0..n` and edges numbered in
//! insertion order, run an algorithm, and map the indices back themselves.

pub mod centrality;
pub mod common;
pub mod community;
pub mod pagerank;
pub mod pathfinding;
pub mod topology;

pub use centrality::{
    betweenness_centrality, closeness_centrality, degree_centrality, eigenvector_centrality,
    ClosenessConfig, EigenvectorConfig,
};
pub use common::{AlgoError, AlgoResult, Arc, Direction, GraphView};
pub use community::{strongly_connected_components, weakly_connected_components, Components};
pub use pagerank::{page_rank, PageRankConfig, PageRankResult};
pub use pathfinding::{all_simple_paths, bfs, bfs_distances, dijkstra, has_path, PathResult};
pub use topology::{
    average_clustering, count_triangles, density, distance_summary, has_cycle, local_clustering,
    DistanceSummary,
};
