//! Node centrality measures
//!
//! | Measure     | Method                                   | Cost        |
//! |-------------|------------------------------------------|-------------|
//! | Degree      | degree / (N - 1)                         | O(V)        |
//! | Betweenness | Brandes accumulation (BFS or Dijkstra)   | O(VE)       |
//! | Closeness   | BFS from every node, Wasserman-Faust     | O(V(V + E)) |
//! | Eigenvector | power iteration on A + I, unit L2 norm   | O(E x iter) |
//!
//! PageRank lives in [`crate::pagerank`].

use super::common::{AlgoError, AlgoResult, Direction, GraphView};
use super::pathfinding::bfs_distances;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// Closeness configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClosenessConfig {
    /// Scale by the fraction of the graph a node reaches, so nodes in small
    /// components do not outrank well-connected ones
    pub wf_improved: bool,
}

impl Default for ClosenessConfig {
    fn default() -> Self {
        Self { wf_improved: true }
    }
}

/// Eigenvector centrality configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EigenvectorConfig {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Normalized degree: degree / (N - 1), zero for graphs of one node or none.
pub fn degree_centrality(view: &GraphView) -> Vec<f64> {
    let n = view.node_count;
    if n <= 1 {
        return vec![0.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    (0..n).map(|i| view.degree(i) as f64 * scale).collect()
}

/// Heap entry for the weighted single-source phase
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    dist: f64,
    seq: usize,
    pred: usize,
    node: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path DAG from one source: visit order, path counts, predecessors.
struct SingleSource {
    order: Vec<usize>,
    sigma: Vec<f64>,
    preds: Vec<Vec<usize>>,
}

fn unweighted_single_source(adjacency: &[Vec<(usize, f64)>], s: usize) -> SingleSource {
    let n = adjacency.len();
    let mut order = Vec::with_capacity(n);
    let mut sigma = vec![0.0; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::new();

    sigma[s] = 1.0;
    dist[s] = Some(0);
    queue.push_back(s);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        let dv = dist[v].unwrap_or(0);
        for &(w, _) in &adjacency[v] {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }
            if dist[w] == Some(dv + 1) {
                sigma[w] += sigma[v];
                preds[w].push(v);
            }
        }
    }

    SingleSource { order, sigma, preds }
}

fn weighted_single_source(adjacency: &[Vec<(usize, f64)>], s: usize) -> SingleSource {
    let n = adjacency.len();
    let mut order = Vec::with_capacity(n);
    let mut sigma = vec![0.0; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut settled: Vec<Option<f64>> = vec![None; n];
    let mut seen: Vec<Option<f64>> = vec![None; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0usize;

    sigma[s] = 1.0;
    seen[s] = Some(0.0);
    heap.push(Frontier { dist: 0.0, seq, pred: s, node: s });

    while let Some(Frontier { dist, pred, node: v, .. }) = heap.pop() {
        if settled[v].is_some() {
            continue;
        }
        // Path counts flow in when a node is settled, not when first seen
        if pred != v {
            sigma[v] += sigma[pred];
        }
        order.push(v);
        settled[v] = Some(dist);

        for &(w, weight) in &adjacency[v] {
            let vw_dist = dist + weight;
            if settled[w].is_none() && seen[w].map_or(true, |known| vw_dist < known) {
                seen[w] = Some(vw_dist);
                seq += 1;
                heap.push(Frontier { dist: vw_dist, seq, pred: v, node: w });
                sigma[w] = 0.0;
                preds[w] = vec![v];
            } else if seen[w] == Some(vw_dist) {
                sigma[w] += sigma[v];
                preds[w].push(v);
            }
        }
    }

    SingleSource { order, sigma, preds }
}

/// Betweenness centrality (Brandes)
///
/// Parallel edges collapse to one (the lightest when weighted) and
/// self-loops are ignored. Scores are normalized by 1 / ((N-1)(N-2)); on
/// undirected graphs every pair is accumulated from both ends, which makes
/// the same factor equal to dividing by the number of unordered pairs.
pub fn betweenness_centrality(view: &GraphView, weighted: bool) -> AlgoResult<Vec<f64>> {
    let n = view.node_count;

    if weighted {
        if let Some((edge, weight)) = view.first_negative_weight() {
            return Err(AlgoError::NegativeWeight { edge, weight });
        }
    }

    let adjacency: Vec<Vec<(usize, f64)>> = (0..n)
        .map(|v| view.collapsed_arcs(v, Direction::Outgoing))
        .collect();

    let mut centrality = vec![0.0; n];
    let mut delta = vec![0.0; n];

    for s in 0..n {
        let SingleSource { order, sigma, preds } = if weighted {
            weighted_single_source(&adjacency, s)
        } else {
            unweighted_single_source(&adjacency, s)
        };

        delta.iter_mut().for_each(|d| *d = 0.0);
        for &w in order.iter().rev() {
            let coeff = (1.0 + delta[w]) / sigma[w];
            for &v in &preds[w] {
                delta[v] += sigma[v] * coeff;
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        centrality.iter_mut().for_each(|c| *c *= scale);
    }

    Ok(centrality)
}

/// Closeness centrality
///
/// For node u with r nodes able to reach it (u included) at total distance
/// D: (r - 1) / D, times (r - 1) / (N - 1) when `wf_improved`. Directed
/// graphs measure incoming distance. Nodes nobody reaches score zero.
pub fn closeness_centrality(view: &GraphView, config: &ClosenessConfig) -> Vec<f64> {
    let n = view.node_count;
    (0..n)
        .map(|u| {
            let dist = bfs_distances(view, u, Direction::Incoming, None);
            let (reached, total) = dist
                .iter()
                .flatten()
                .fold((0usize, 0usize), |(count, sum), d| (count + 1, sum + d));

            if total == 0 || n <= 1 {
                return 0.0;
            }
            let others = (reached - 1) as f64;
            let mut score = others / total as f64;
            if config.wf_improved {
                score *= others / (n - 1) as f64;
            }
            score
        })
        .collect()
}

/// Eigenvector centrality
///
/// Treats the graph as undirected and simple. Iterates x <- (A + I) x with
/// an L2 renormalization each step, starting from the uniform vector; the
/// identity shift keeps bipartite graphs from oscillating. Fails with
/// [`AlgoError::Convergence`] if the L1 change never drops below
/// `N * tolerance` within the iteration cap.
pub fn eigenvector_centrality(view: &GraphView, config: &EigenvectorConfig) -> AlgoResult<Vec<f64>> {
    let n = view.node_count;
    if n == 0 {
        return Ok(Vec::new());
    }

    let adjacency: Vec<Vec<usize>> = (0..n)
        .map(|v| view.distinct_neighbors(v, Direction::Both))
        .collect();

    let mut x = vec![1.0 / n as f64; n];

    for _ in 0..config.max_iterations {
        let last = x.clone();
        for (v, neighbors) in adjacency.iter().enumerate() {
            for &w in neighbors {
                x[w] += last[v];
            }
        }

        let norm = x.iter().map(|value| value * value).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        x.iter_mut().for_each(|value| *value /= norm);

        let change: f64 = x.iter().zip(last.iter()).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * config.tolerance {
            return Ok(x);
        }
    }

    Err(AlgoError::Convergence {
        algorithm: "eigenvector centrality",
        iterations: config.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    /// Undirected path 0 - 1 - 2
    fn path3() -> GraphView {
        GraphView::from_edges(3, false, &[(0, 1, 1.0), (1, 2, 1.0)])
    }

    #[test]
    fn test_degree_centrality() {
        let scores = degree_centrality(&path3());
        assert_eq!(scores, vec![0.5, 1.0, 0.5]);

        let single = GraphView::from_edges(1, false, &[]);
        assert_eq!(degree_centrality(&single), vec![0.0]);
    }

    #[test]
    fn test_betweenness_path() {
        let scores = betweenness_centrality(&path3(), false).unwrap();
        assert_close(scores[0], 0.0);
        assert_close(scores[1], 1.0);
        assert_close(scores[2], 0.0);
    }

    #[test]
    fn test_betweenness_directed_diamond() {
        // 0->1, 0->2, 1->3, 2->3: two shortest 0->3 paths share the load
        let view = GraphView::from_edges(4, true, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);
        let scores = betweenness_centrality(&view, false).unwrap();
        // 0.5 each, scaled by 1 / (3 * 2)
        assert_close(scores[1], 0.5 / 6.0);
        assert_close(scores[2], 0.5 / 6.0);
        assert_close(scores[0], 0.0);
        assert_close(scores[3], 0.0);
    }

    #[test]
    fn test_betweenness_weighted_picks_light_route() {
        // 0->1->3 costs 2, 0->2->3 costs 10
        let view = GraphView::from_edges(4, true, &[(0, 1, 1.0), (0, 2, 5.0), (1, 3, 1.0), (2, 3, 5.0)]);
        let scores = betweenness_centrality(&view, true).unwrap();
        assert_close(scores[1], 1.0 / 6.0);
        assert_close(scores[2], 0.0);
    }

    #[test]
    fn test_betweenness_ignores_parallel_edges() {
        let single = GraphView::from_edges(3, false, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let doubled = GraphView::from_edges(3, false, &[(0, 1, 1.0), (0, 1, 1.0), (1, 2, 1.0)]);
        assert_eq!(
            betweenness_centrality(&single, false).unwrap(),
            betweenness_centrality(&doubled, false).unwrap()
        );
    }

    #[test]
    fn test_closeness_disconnected_keeps_component_score() {
        // 0 - 1 and 2 isolated
        let view = GraphView::from_edges(3, false, &[(0, 1, 1.0)]);
        let plain = closeness_centrality(&view, &ClosenessConfig { wf_improved: false });
        assert_close(plain[0], 1.0);
        assert_close(plain[2], 0.0);

        let improved = closeness_centrality(&view, &ClosenessConfig::default());
        assert_close(improved[0], 0.5);
    }

    #[test]
    fn test_closeness_directed_uses_incoming_distance() {
        // 0->1->2
        let view = GraphView::from_edges(3, true, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let scores = closeness_centrality(&view, &ClosenessConfig::default());
        assert_close(scores[0], 0.0);
        // 2 is reached by 1 (d=1) and 0 (d=2)
        assert_close(scores[2], 2.0 / 3.0);
    }

    #[test]
    fn test_eigenvector_star() {
        // Center 0 connected to 1, 2, 3
        let view = GraphView::from_edges(4, false, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)]);
        let scores = eigenvector_centrality(&view, &EigenvectorConfig::default()).unwrap();

        let norm: f64 = scores.iter().map(|s| s * s).sum::<f64>().sqrt();
        assert_close(norm, 1.0);
        assert!(scores[0] > scores[1]);
        assert_close(scores[1], scores[3]);
        // Principal eigenvector of the star: center 1/sqrt(2)
        assert!((scores[0] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-3);
    }

    #[test]
    fn test_eigenvector_reports_non_convergence() {
        let view = GraphView::from_edges(4, false, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)]);
        let config = EigenvectorConfig {
            max_iterations: 1,
            tolerance: 1e-12,
        };
        let err = eigenvector_centrality(&view, &config).unwrap_err();
        assert!(matches!(err, AlgoError::Convergence { iterations: 1, .. }));
    }
}
