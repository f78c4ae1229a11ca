//! Engine configuration
//!
//! Iteration caps, tolerances and ordering policy handed to the analyzers.
//! Every field has a default, so a YAML document only needs to name what it
//! changes:
//!
//! ```yaml
//! pagerank:
//!   damping_factor: 0.9
//! tie_break: lexicographic
//! ```

use crate::error::GfxResult;
use gfx_graph_algorithms::{ClosenessConfig, EigenvectorConfig, PageRankConfig};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How equal-ranked nodes are ordered in query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Node declaration order in the source document
    #[default]
    InsertionOrder,
    /// Byte-wise order of node identifiers
    Lexicographic,
}

impl TieBreak {
    /// Compare two nodes given as (insertion index, identifier).
    pub fn compare(self, a: (usize, &str), b: (usize, &str)) -> Ordering {
        match self {
            TieBreak::InsertionOrder => a.0.cmp(&b.0),
            TieBreak::Lexicographic => a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pagerank: PageRankConfig,
    pub eigenvector: EigenvectorConfig,
    pub closeness: ClosenessConfig,
    pub tie_break: TieBreak,
}

impl EngineConfig {
    pub fn from_yaml_str(source: &str) -> GfxResult<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}
