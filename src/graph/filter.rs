//! Node and edge listing filters
//!
//! Every condition in a filter must hold (AND). An empty filter matches
//! everything.

use super::edge::Edge;
use super::node::Node;
use super::store::Graph;
use super::types::EdgeIndex;
use crate::error::{GfxError, GfxResult};
use glob::Pattern;

#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    /// `(key, value)` pairs compared against the value's rendering
    pub attributes: Vec<(String, String)>,
    /// Shell-style pattern over labels; unlabeled nodes never match
    pub label_pattern: Option<Pattern>,
}

impl NodeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn label_glob(mut self, pattern: &str) -> GfxResult<Self> {
        let compiled = Pattern::new(pattern)
            .map_err(|e| GfxError::InvalidArgument(format!("label pattern '{}': {}", pattern, e)))?;
        self.label_pattern = Some(compiled);
        Ok(self)
    }

    pub fn matches(&self, node: &Node) -> bool {
        if let Some(pattern) = &self.label_pattern {
            match &node.label {
                Some(label) if pattern.matches(label) => {}
                _ => return false,
            }
        }
        self.attributes.iter().all(|(key, expected)| {
            node.attributes
                .get(key)
                .is_some_and(|value| value.matches_str(expected))
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    /// `(key, value)` pairs; the key `weight` also matches the edge weight
    pub attributes: Vec<(String, String)>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub kind: Option<String>,
}

impl EdgeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn source(mut self, id: impl Into<String>) -> Self {
        self.source = Some(id.into());
        self
    }

    pub fn target(mut self, id: impl Into<String>) -> Self {
        self.target = Some(id.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn matches(&self, graph: &Graph, edge: &Edge) -> bool {
        let (source, target) = graph.endpoints(edge);
        if self.source.as_deref().is_some_and(|s| s != source) {
            return false;
        }
        if self.target.as_deref().is_some_and(|t| t != target) {
            return false;
        }
        if let Some(kind) = &self.kind {
            if edge.kind.as_deref() != Some(kind.as_str()) {
                return false;
            }
        }
        self.attributes.iter().all(|(key, expected)| match edge.attributes.get(key) {
            Some(value) => value.matches_str(expected),
            None if key == "weight" => edge
                .weight
                .zip(expected.trim().parse::<f64>().ok())
                .is_some_and(|(w, e)| w == e),
            None => false,
        })
    }
}

impl Graph {
    /// Nodes passing `filter`, in declaration order
    pub fn nodes_matching<'g>(&'g self, filter: &'g NodeFilter) -> impl Iterator<Item = &'g Node> + 'g {
        self.nodes().filter(move |node| filter.matches(node))
    }

    /// Edges passing `filter`, in document order
    pub fn edges_matching<'g>(
        &'g self,
        filter: &'g EdgeFilter,
    ) -> impl Iterator<Item = (EdgeIndex, &'g Edge)> + 'g {
        self.edges()
            .enumerate()
            .filter(move |(_, edge)| filter.matches(self, edge))
            .map(|(i, edge)| (EdgeIndex(i), edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AttributeValue, DefaultEdgeType};

    fn sample() -> Graph {
        let mut builder = Graph::builder(DefaultEdgeType::Directed);
        builder.add_node(Node::new("web1").with_label("Web Server 1").with_attribute("type", "server"));
        builder.add_node(Node::new("web2").with_label("Web Server 2").with_attribute("type", "server"));
        builder.add_node(Node::new("db1").with_label("Primary DB").with_attribute("type", "database"));
        builder.add_node(Node::new("tmp"));
        {
            let edge = builder.add_edge("web1", "db1");
            edge.weight = Some(2.0);
            edge.kind = Some("query".into());
        }
        {
            let edge = builder.add_edge("web2", "db1");
            edge.attributes.insert("latency".into(), AttributeValue::Integer(5));
        }
        builder.build()
    }

    #[test]
    fn test_node_attribute_and_label_filters() {
        let graph = sample();

        let servers = NodeFilter::new().attribute("type", "server");
        let ids: Vec<&str> = graph.nodes_matching(&servers).map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["web1", "web2"]);

        let web = NodeFilter::new().label_glob("Web*").unwrap().attribute("type", "server");
        assert_eq!(graph.nodes_matching(&web).count(), 2);

        let db = NodeFilter::new().label_glob("*DB").unwrap();
        let ids: Vec<&str> = graph.nodes_matching(&db).map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["db1"]);

        assert_eq!(graph.nodes_matching(&NodeFilter::new()).count(), 4);
    }

    #[test]
    fn test_bad_glob_is_invalid_argument() {
        assert!(matches!(NodeFilter::new().label_glob("[x"), Err(GfxError::InvalidArgument(_))));
    }

    #[test]
    fn test_edge_filters() {
        let graph = sample();

        let by_weight = EdgeFilter::new().attribute("weight", "2");
        assert_eq!(graph.edges_matching(&by_weight).count(), 1);

        let by_target = EdgeFilter::new().target("db1");
        assert_eq!(graph.edges_matching(&by_target).count(), 2);

        let combined = EdgeFilter::new().source("web2").attribute("latency", "5");
        let hits: Vec<EdgeIndex> = graph.edges_matching(&combined).map(|(i, _)| i).collect();
        assert_eq!(hits, vec![EdgeIndex(1)]);

        let by_kind = EdgeFilter::new().kind("query");
        assert_eq!(graph.edges_matching(&by_kind).count(), 1);
    }
}
