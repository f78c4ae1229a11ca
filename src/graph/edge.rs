//! Edge implementation
//!
//! Edges reference their endpoints by [`NodeIndex`]; the owning
//! [`Graph`](super::Graph) resolves them back to identifiers. Self-loops and
//! parallel edges are ordinary edges.

use super::attribute::{AttributeMap, AttributeValue};
use super::types::NodeIndex;

/// An edge in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Document id; absent ids are derived from the edge position
    pub id: Option<String>,

    pub source: NodeIndex,

    pub target: NodeIndex,

    /// Explicit weight; weighted algorithms read a missing weight as 1.0
    pub weight: Option<f64>,

    pub label: Option<String>,

    /// Free-form edge kind (the GEXF `kind` attribute)
    pub kind: Option<String>,

    pub attributes: AttributeMap,

    pub start: Option<String>,

    pub end: Option<String>,
}

impl Edge {
    pub fn new(source: NodeIndex, target: NodeIndex) -> Self {
        Edge {
            id: None,
            source,
            target,
            weight: None,
            label: None,
            kind: None,
            attributes: AttributeMap::new(),
            start: None,
            end: None,
        }
    }

    pub fn weight_or_default(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let edge = Edge::new(NodeIndex(0), NodeIndex(0));
        assert_eq!(edge.weight_or_default(), 1.0);
        assert!(edge.is_self_loop());
        assert!(edge.id.is_none());
    }
}
