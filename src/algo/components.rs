//! Component decomposition by node id

use super::Analyzer;
use gfx_graph_algorithms::{strongly_connected_components, weakly_connected_components, Components};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Direction ignored
    #[default]
    Connected,
    /// Direction ignored; the usual name on directed graphs
    Weak,
    /// Mutual reachability along edge direction
    Strong,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComponentKind::Connected => "connected",
            ComponentKind::Weak => "weak",
            ComponentKind::Strong => "strong",
        })
    }
}

/// Components largest first, members in declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentInfo {
    pub kind: ComponentKind,
    pub num_components: usize,
    pub component_sizes: Vec<usize>,
    pub largest_component_size: usize,
    pub components: Vec<Vec<String>>,
}

impl<'g> Analyzer<'g> {
    pub fn components(&self, kind: ComponentKind) -> ComponentInfo {
        let view = self.graph.view();
        let found: Components = match kind {
            ComponentKind::Connected | ComponentKind::Weak => weakly_connected_components(view),
            ComponentKind::Strong => strongly_connected_components(view),
        };
        debug!(%kind, count = found.len(), "computed components");

        let component_sizes = found.sizes();
        let components = found
            .groups
            .iter()
            .map(|group| group.iter().map(|&i| self.id_of(i).to_string()).collect())
            .collect();

        ComponentInfo {
            kind,
            num_components: found.len(),
            largest_component_size: component_sizes.first().copied().unwrap_or(0),
            component_sizes,
            components,
        }
    }
}
