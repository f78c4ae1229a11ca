//! Centrality scores by node id

use super::Analyzer;
use crate::config::TieBreak;
use crate::error::{GfxError, GfxResult};
use gfx_graph_algorithms as algo;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CentralityKind {
    Degree,
    Betweenness,
    Closeness,
    Pagerank,
    Eigenvector,
}

impl CentralityKind {
    pub const ALL: [CentralityKind; 5] = [
        CentralityKind::Degree,
        CentralityKind::Betweenness,
        CentralityKind::Closeness,
        CentralityKind::Pagerank,
        CentralityKind::Eigenvector,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CentralityKind::Degree => "degree",
            CentralityKind::Betweenness => "betweenness",
            CentralityKind::Closeness => "closeness",
            CentralityKind::Pagerank => "pagerank",
            CentralityKind::Eigenvector => "eigenvector",
        }
    }
}

impl fmt::Display for CentralityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CentralityKind {
    type Err = GfxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CentralityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GfxError::InvalidArgument(format!("unknown centrality '{}'", s)))
    }
}

/// Scores keyed by node id, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralityResult {
    pub kind: CentralityKind,
    pub scores: IndexMap<String, f64>,
    #[serde(skip)]
    tie_break: TieBreak,
}

impl CentralityResult {
    pub fn score(&self, id: &str) -> Option<f64> {
        self.scores.get(id).copied()
    }

    /// The `n` highest scores. Equal scores fall back to the tie-break
    /// policy the result was computed under.
    pub fn top_n(&self, n: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(usize, &str, f64)> = self
            .scores
            .iter()
            .enumerate()
            .map(|(i, (id, score))| (i, id.as_str(), *score))
            .collect();
        ranked.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.tie_break.compare((a.0, a.1), (b.0, b.1)))
        });
        ranked.into_iter().take(n).map(|(_, id, score)| (id, score)).collect()
    }
}

impl<'g> Analyzer<'g> {
    /// Score every node. `weighted` applies to betweenness and PageRank.
    pub fn centrality(&self, kind: CentralityKind, weighted: bool) -> GfxResult<CentralityResult> {
        let view = self.graph.view();
        let scores = match kind {
            CentralityKind::Degree => algo::degree_centrality(view),
            CentralityKind::Betweenness => algo::betweenness_centrality(view, weighted)
                .map_err(|e| self.graph.resolve_algo_error(e))?,
            CentralityKind::Closeness => algo::closeness_centrality(view, &self.config.closeness),
            CentralityKind::Pagerank => {
                let result = algo::page_rank(view, &self.config.pagerank, weighted)
                    .map_err(|e| self.graph.resolve_algo_error(e))?;
                if result.converged {
                    debug!(iterations = result.iterations, "pagerank converged");
                } else {
                    warn!(
                        iterations = result.iterations,
                        "pagerank hit its iteration cap before converging"
                    );
                }
                result.scores
            }
            CentralityKind::Eigenvector => algo::eigenvector_centrality(view, &self.config.eigenvector)
                .map_err(|e| self.graph.resolve_algo_error(e))?,
        };

        let scores = scores
            .into_iter()
            .enumerate()
            .map(|(i, score)| (self.id_of(i).to_string(), score))
            .collect();

        Ok(CentralityResult {
            kind,
            scores,
            tie_break: self.config.tie_break,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::graph::{DefaultEdgeType, Graph};
    use gfx_graph_algorithms::EigenvectorConfig;

    /// hub - x, hub - b, hub - a (undirected star)
    fn star() -> Graph {
        let mut builder = Graph::builder(DefaultEdgeType::Undirected);
        builder.add_edge("hub", "x");
        builder.add_edge("hub", "b");
        builder.add_edge("hub", "a");
        builder.build()
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("PageRank".parse::<CentralityKind>().unwrap(), CentralityKind::Pagerank);
        assert!("katz".parse::<CentralityKind>().is_err());
    }

    #[test]
    fn test_top_n_ties() {
        let graph = star();
        let by_insertion = Analyzer::new(&graph).centrality(CentralityKind::Degree, false).unwrap();
        let top: Vec<&str> = by_insertion.top_n(3).into_iter().map(|(id, _)| id).collect();
        assert_eq!(top, vec!["hub", "x", "b"]);

        let lexicographic = Analyzer::with_config(
            &graph,
            EngineConfig::default().with_tie_break(TieBreak::Lexicographic),
        );
        let result = lexicographic.centrality(CentralityKind::Degree, false).unwrap();
        let top: Vec<&str> = result.top_n(10).into_iter().map(|(id, _)| id).collect();
        assert_eq!(top, vec!["hub", "a", "b", "x"]);
    }

    #[test]
    fn test_every_kind_is_finite_and_non_negative() {
        let graph = star();
        let analyzer = Analyzer::new(&graph);
        for kind in CentralityKind::ALL {
            let result = analyzer.centrality(kind, false).unwrap();
            assert_eq!(result.scores.len(), 4);
            assert!(result.scores.values().all(|s| s.is_finite() && *s >= 0.0), "{}", kind);
            assert_eq!(result.top_n(1)[0].0, "hub", "{}", kind);
        }
    }

    #[test]
    fn test_eigenvector_convergence_error() {
        let graph = star();
        let mut config = EngineConfig::default();
        config.eigenvector = EigenvectorConfig {
            max_iterations: 1,
            tolerance: 1e-12,
        };
        let err = Analyzer::with_config(&graph, config)
            .centrality(CentralityKind::Eigenvector, false)
            .unwrap_err();
        assert!(matches!(err, GfxError::Convergence { iterations: 1, .. }));
    }
}
