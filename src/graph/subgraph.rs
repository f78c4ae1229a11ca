//! Subgraph extraction
//!
//! Both extractors copy the selected nodes and every edge with both
//! endpoints selected into a fresh [`Graph`]; the source graph is untouched.

use super::edge::Edge;
use super::store::{DocumentMeta, Graph};
use super::types::NodeIndex;
use crate::error::GfxResult;
use gfx_graph_algorithms::{bfs_distances, Direction};
use tracing::debug;

impl Graph {
    /// The center node plus every node within `radius` forward hops.
    pub fn ego_graph(&self, center: &str, radius: usize) -> GfxResult<Graph> {
        let center = self.require_node(center)?;
        let distances = bfs_distances(self.view(), center.0, Direction::Outgoing, Some(radius));
        let keep: Vec<bool> = distances.iter().map(Option::is_some).collect();
        Ok(self.extract(&keep))
    }

    /// Exactly the requested nodes. Fails on the first unknown id without
    /// building anything.
    pub fn induced_subgraph<S: AsRef<str>>(&self, ids: &[S]) -> GfxResult<Graph> {
        let mut keep = vec![false; self.node_count()];
        for id in ids {
            let index = self.require_node(id.as_ref())?;
            keep[index.0] = true;
        }
        Ok(self.extract(&keep))
    }

    fn extract(&self, keep: &[bool]) -> Graph {
        let mut meta: DocumentMeta = self.document_meta().clone();
        meta.description = Some(match &meta.description {
            Some(description) => format!("Subgraph of {}", description),
            None => "Subgraph".to_string(),
        });

        let mut builder = self.empty_like().meta(meta);

        // Old index -> new index for the kept nodes
        let mut remap: Vec<Option<NodeIndex>> = vec![None; keep.len()];
        for (old, node) in self.nodes().enumerate() {
            if keep[old] {
                remap[old] = Some(builder.add_node(node.clone()));
            }
        }

        for edge in self.edges() {
            if let (Some(source), Some(target)) = (remap[edge.source.0], remap[edge.target.0]) {
                builder.push_edge(Edge {
                    source,
                    target,
                    ..edge.clone()
                });
            }
        }

        let graph = builder.build();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "extracted subgraph"
        );
        graph
    }
}
