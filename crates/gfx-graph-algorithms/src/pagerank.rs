//! PageRank algorithm implementation
//!
//! Power iteration over the (optionally weighted) transition matrix. Nodes
//! without outgoing weight are dangling: their rank is spread uniformly over
//! all nodes on every iteration, so the scores always sum to one.

use super::common::{AlgoError, AlgoResult, Direction, GraphView};

/// PageRank configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageRankConfig {
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Iteration cap
    pub max_iterations: usize,
    /// Per-node tolerance; iteration stops once the L1 change drops below
    /// `node_count * tolerance`
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Scores indexed by node, plus how the iteration ended.
#[derive(Debug, Clone)]
pub struct PageRankResult {
    pub scores: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Calculate PageRank for the graph view
///
/// Undirected views contribute each edge in both directions. With
/// `weighted`, transition probabilities are proportional to edge weight and
/// a negative weight is an error. Hitting `max_iterations` is not: the
/// current vector is returned with `converged = false`.
pub fn page_rank(view: &GraphView, config: &PageRankConfig, weighted: bool) -> AlgoResult<PageRankResult> {
    let n = view.node_count;

    if n == 0 {
        return Ok(PageRankResult {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        });
    }

    if weighted {
        if let Some((edge, weight)) = view.first_negative_weight() {
            return Err(AlgoError::NegativeWeight { edge, weight });
        }
    }

    let arc_weight = |w: f64| if weighted { w } else { 1.0 };

    // Total outgoing weight per node; zero marks a dangling node
    let out_weight: Vec<f64> = (0..n)
        .map(|u| {
            view.arcs(u, Direction::Outgoing)
                .map(|arc| arc_weight(arc.weight))
                .sum()
        })
        .collect();

    let n_f = n as f64;
    let d = config.damping_factor;
    let mut scores = vec![1.0 / n_f; n];
    let mut next_scores = vec![0.0; n];

    for iteration in 1..=config.max_iterations {
        let dangling_mass: f64 = (0..n)
            .filter(|&u| out_weight[u] <= 0.0)
            .map(|u| scores[u])
            .sum();
        let base_score = (1.0 - d) / n_f + d * dangling_mass / n_f;
        next_scores.iter_mut().for_each(|s| *s = base_score);

        for u in 0..n {
            if out_weight[u] <= 0.0 {
                continue;
            }
            let share = d * scores[u] / out_weight[u];
            for arc in view.arcs(u, Direction::Outgoing) {
                next_scores[arc.node] += share * arc_weight(arc.weight);
            }
        }

        let total_diff: f64 = next_scores
            .iter()
            .zip(scores.iter())
            .map(|(next, prev)| (next - prev).abs())
            .sum();

        // Swap buffers
        std::mem::swap(&mut scores, &mut next_scores);

        // Check convergence
        if total_diff < n_f * config.tolerance {
            return Ok(PageRankResult {
                scores,
                iterations: iteration,
                converged: true,
            });
        }
    }

    Ok(PageRankResult {
        scores,
        iterations: config.max_iterations,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(scores: &[f64]) -> f64 {
        scores.iter().sum()
    }

    #[test]
    fn test_star_center_ranks_highest() {
        // Center 0 <-> 1, 0 <-> 2
        let view = GraphView::from_edges(3, true, &[(0, 1, 1.0), (0, 2, 1.0), (1, 0, 1.0), (2, 0, 1.0)]);
        let result = page_rank(&view, &PageRankConfig::default(), false).unwrap();

        assert!(result.converged);
        assert!(result.scores[0] > result.scores[1]);
        assert!((result.scores[1] - result.scores[2]).abs() < 1e-9);
        assert!((sum(&result.scores) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_dangling_nodes_keep_mass() {
        // 0->1, 0->2, 1 and 2 dangling, 3 isolated
        let view = GraphView::from_edges(4, true, &[(0, 1, 1.0), (0, 2, 1.0)]);
        let result = page_rank(&view, &PageRankConfig::default(), false).unwrap();

        assert!((sum(&result.scores) - 1.0).abs() < 1e-4);
        assert!(result.scores[1] > result.scores[0]);
        assert!(result.scores.iter().all(|s| s.is_finite() && *s >= 0.0));
    }

    #[test]
    fn test_weighted_transition() {
        // 0->1 heavy, 0->2 light
        let view = GraphView::from_edges(3, true, &[(0, 1, 9.0), (0, 2, 1.0), (1, 0, 1.0), (2, 0, 1.0)]);
        let weighted = page_rank(&view, &PageRankConfig::default(), true).unwrap();
        let unweighted = page_rank(&view, &PageRankConfig::default(), false).unwrap();

        assert!(weighted.scores[1] > weighted.scores[2]);
        assert!((unweighted.scores[1] - unweighted.scores[2]).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_rejects_negative_weight() {
        let view = GraphView::from_edges(2, true, &[(0, 1, -1.0)]);
        assert!(page_rank(&view, &PageRankConfig::default(), true).is_err());
        assert!(page_rank(&view, &PageRankConfig::default(), false).is_ok());
    }

    #[test]
    fn test_iteration_cap_returns_current_vector() {
        let view = GraphView::from_edges(3, true, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (0, 2, 1.0)]);
        let config = PageRankConfig {
            max_iterations: 1,
            tolerance: 0.0,
            ..PageRankConfig::default()
        };
        let result = page_rank(&view, &config, false).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert!((sum(&result.scores) - 1.0).abs() < 1e-9);
    }
}
