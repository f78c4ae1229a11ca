//! In-memory graph storage
//!
//! Nodes live in an insertion-ordered map keyed by id, edges in a vector in
//! document order. A CSR [`GraphView`] over the same dense indices is built
//! once when the graph is finished and serves every traversal.

use super::attribute::AttributeMap;
use super::edge::Edge;
use super::node::Node;
use super::types::{DefaultEdgeType, EdgeIndex, GexfVersion, GraphMode, NodeIndex};
use crate::error::{GfxError, GfxResult};
use gfx_graph_algorithms::{AlgoError, GraphView};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::warn;

/// Document-level descriptive fields (the GEXF `<meta>` block)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentMeta {
    pub version: GexfVersion,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub last_modified: Option<String>,
}

/// Metadata report for a graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphMetadata {
    pub version: GexfVersion,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub last_modified: Option<String>,
    pub mode: GraphMode,
    pub default_edge_type: DefaultEdgeType,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Structural summary with the attribute keys in use
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphInfo {
    pub version: GexfVersion,
    pub mode: GraphMode,
    pub default_edge_type: DefaultEdgeType,
    pub node_count: usize,
    pub edge_count: usize,
    pub node_attributes: Vec<String>,
    pub edge_attributes: Vec<String>,
}

/// Serializable edge with endpoints resolved to node ids
#[derive(Debug, Clone, Serialize)]
pub struct EdgeRecord<'g> {
    pub id: Cow<'g, str>,
    pub source: &'g str,
    pub target: &'g str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'g str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'g str>,
    pub attributes: &'g AttributeMap,
}

/// An immutable graph
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    attributes: AttributeMap,
    edge_type: DefaultEdgeType,
    mode: GraphMode,
    meta: DocumentMeta,
    view: GraphView,
}

impl Graph {
    pub fn builder(edge_type: DefaultEdgeType) -> GraphBuilder {
        GraphBuilder::new(edge_type)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_directed(&self) -> bool {
        self.edge_type.is_directed()
    }

    pub fn is_dynamic(&self) -> bool {
        self.mode == GraphMode::Dynamic
    }

    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    pub fn default_edge_type(&self) -> DefaultEdgeType {
        self.edge_type
    }

    pub fn document_meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// Graph-level attributes
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Dense topology used by the algorithms
    pub fn view(&self) -> &GraphView {
        &self.view
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.nodes.get_index_of(id).map(NodeIndex)
    }

    /// Resolve an id or fail with [`GfxError::NodeNotFound`]
    pub fn require_node(&self, id: &str) -> GfxResult<NodeIndex> {
        self.node_index(id)
            .ok_or_else(|| GfxError::NodeNotFound(id.to_string()))
    }

    /// Node at a dense index. Panics if the index is out of range, which
    /// indices handed out by this graph never are.
    pub fn node_at(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0]
    }

    /// Nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Edges in document order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&Edge> {
        self.edges.get(index.0)
    }

    /// The edge's document id, or its position when the document gave none
    pub fn edge_id(&self, index: EdgeIndex) -> Cow<'_, str> {
        match self.edges.get(index.0).and_then(|e| e.id.as_deref()) {
            Some(id) => Cow::Borrowed(id),
            None => Cow::Owned(index.0.to_string()),
        }
    }

    pub fn endpoints(&self, edge: &Edge) -> (&str, &str) {
        (&self.node_at(edge.source).id, &self.node_at(edge.target).id)
    }

    pub fn edge_record(&self, index: EdgeIndex) -> Option<EdgeRecord<'_>> {
        let edge = self.edges.get(index.0)?;
        let (source, target) = self.endpoints(edge);
        Some(EdgeRecord {
            id: self.edge_id(index),
            source,
            target,
            weight: edge.weight,
            label: edge.label.as_deref(),
            kind: edge.kind.as_deref(),
            attributes: &edge.attributes,
        })
    }

    /// Whether two edges join the same endpoints (either orientation when
    /// undirected).
    pub fn has_parallel_edges(&self) -> bool {
        let mut seen = BTreeSet::new();
        self.edges.iter().any(|edge| {
            let (a, b) = (edge.source.0, edge.target.0);
            let key = if self.is_directed() || a <= b { (a, b) } else { (b, a) };
            !seen.insert(key)
        })
    }

    pub fn metadata(&self) -> GraphMetadata {
        GraphMetadata {
            version: self.meta.version,
            creator: self.meta.creator.clone(),
            description: self.meta.description.clone(),
            keywords: self.meta.keywords.clone(),
            last_modified: self.meta.last_modified.clone(),
            mode: self.mode,
            default_edge_type: self.edge_type,
            node_count: self.node_count(),
            edge_count: self.edge_count(),
        }
    }

    pub fn info(&self) -> GraphInfo {
        GraphInfo {
            version: self.meta.version,
            mode: self.mode,
            default_edge_type: self.edge_type,
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            node_attributes: self.node_attribute_keys(),
            edge_attributes: self.edge_attribute_keys(),
        }
    }

    /// Sorted set of attribute keys across all nodes
    pub fn node_attribute_keys(&self) -> Vec<String> {
        sorted_keys(self.nodes.values().map(|n| &n.attributes))
    }

    /// Sorted set of attribute keys across all edges
    pub fn edge_attribute_keys(&self) -> Vec<String> {
        sorted_keys(self.edges.iter().map(|e| &e.attributes))
    }

    /// Translate an algorithm error, resolving dense indices to ids.
    pub fn resolve_algo_error(&self, err: AlgoError) -> GfxError {
        match err {
            AlgoError::NegativeWeight { edge, weight } => match self.edges.get(edge) {
                Some(e) => {
                    let (from, to) = self.endpoints(e);
                    GfxError::NegativeWeight {
                        from: from.to_string(),
                        to: to.to_string(),
                        weight,
                    }
                }
                None => GfxError::NegativeWeight {
                    from: String::new(),
                    to: String::new(),
                    weight,
                },
            },
            AlgoError::Convergence { algorithm, iterations } => GfxError::Convergence {
                algorithm: algorithm.to_string(),
                iterations,
            },
        }
    }

    /// Builder seeded with this graph's settings and metadata but no nodes
    /// or edges.
    pub(crate) fn empty_like(&self) -> GraphBuilder {
        let mut builder = GraphBuilder::new(self.edge_type)
            .mode(self.mode)
            .meta(self.meta.clone());
        builder.attributes = self.attributes.clone();
        builder
    }
}

fn sorted_keys<'a>(maps: impl Iterator<Item = &'a AttributeMap>) -> Vec<String> {
    maps.flat_map(|m| m.keys())
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Incremental construction of a [`Graph`]
///
/// Keeps the graph invariants while input is still arriving: a repeated node
/// id merges into the first declaration and an edge naming an unknown node
/// creates it.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    pub(crate) attributes: AttributeMap,
    edge_type: DefaultEdgeType,
    mode: GraphMode,
    meta: DocumentMeta,
}

impl GraphBuilder {
    pub fn new(edge_type: DefaultEdgeType) -> Self {
        GraphBuilder {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            attributes: AttributeMap::new(),
            edge_type,
            mode: GraphMode::Static,
            meta: DocumentMeta::default(),
        }
    }

    pub fn mode(mut self, mode: GraphMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn meta(mut self, meta: DocumentMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.attributes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        match self.nodes.entry(node.id.clone()) {
            Entry::Occupied(mut slot) => {
                warn!(node = %node.id, "duplicate node declaration merged into the first");
                let index = slot.index();
                slot.get_mut().merge(node);
                NodeIndex(index)
            }
            Entry::Vacant(slot) => {
                let index = slot.index();
                slot.insert(node);
                NodeIndex(index)
            }
        }
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(index) = self.nodes.get_index_of(id) {
            return NodeIndex(index);
        }
        warn!(node = %id, "edge references undeclared node; creating it");
        let index = self.nodes.len();
        self.nodes.insert(id.to_string(), Node::new(id));
        NodeIndex(index)
    }

    /// Append an edge between two ids and return it for the caller to fill
    /// in.
    pub fn add_edge(&mut self, source: &str, target: &str) -> &mut Edge {
        let s = self.ensure_node(source);
        let t = self.ensure_node(target);
        let position = self.edges.len();
        self.edges.push(Edge::new(s, t));
        &mut self.edges[position]
    }

    /// Append an edge whose endpoints are already indices of this builder.
    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn build(self) -> Graph {
        let triples: Vec<(usize, usize, f64)> = self
            .edges
            .iter()
            .map(|e| (e.source.0, e.target.0, e.weight_or_default()))
            .collect();
        let view = GraphView::from_edges(self.nodes.len(), self.edge_type.is_directed(), &triples);

        Graph {
            nodes: self.nodes,
            edges: self.edges,
            attributes: self.attributes,
            edge_type: self.edge_type,
            mode: self.mode,
            meta: self.meta,
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AttributeValue;

    fn sample() -> Graph {
        let mut builder = Graph::builder(DefaultEdgeType::Directed);
        builder.add_node(Node::new("a").with_attribute("type", "server"));
        builder.add_node(Node::new("b").with_attribute("zone", "eu"));
        builder.add_edge("a", "b").weight = Some(2.0);
        builder.add_edge("b", "c").attributes.insert("proto".into(), AttributeValue::from("tcp"));
        builder.build()
    }

    #[test]
    fn test_undeclared_endpoint_is_created() {
        let graph = sample();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node_index("c"), Some(NodeIndex(2)));
        assert!(graph.node("c").unwrap().attributes.is_empty());
        assert_eq!(graph.view().successors(1), &[2]);
    }

    #[test]
    fn test_duplicate_node_merges() {
        let mut builder = Graph::builder(DefaultEdgeType::Undirected);
        let first = builder.add_node(Node::new("a").with_label("First"));
        let again = builder.add_node(Node::new("a").with_label("Second"));
        let graph = builder.build();

        assert_eq!(first, again);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("a").unwrap().label.as_deref(), Some("Second"));
    }

    #[test]
    fn test_edge_ids_and_records() {
        let mut builder = Graph::builder(DefaultEdgeType::Directed);
        builder.add_edge("x", "y").id = Some("e-xy".into());
        builder.add_edge("y", "x");
        let graph = builder.build();

        assert_eq!(graph.edge_id(EdgeIndex(0)), "e-xy");
        assert_eq!(graph.edge_id(EdgeIndex(1)), "1");
        let record = graph.edge_record(EdgeIndex(1)).unwrap();
        assert_eq!((record.source, record.target), ("y", "x"));
        assert!(!graph.has_parallel_edges());
    }

    #[test]
    fn test_parallel_edges_depend_on_direction() {
        let mut directed = Graph::builder(DefaultEdgeType::Directed);
        directed.add_edge("x", "y");
        directed.add_edge("y", "x");
        assert!(!directed.build().has_parallel_edges());

        let mut undirected = Graph::builder(DefaultEdgeType::Undirected);
        undirected.add_edge("x", "y");
        undirected.add_edge("y", "x");
        assert!(undirected.build().has_parallel_edges());
    }

    #[test]
    fn test_info_lists_sorted_keys() {
        let info = sample().info();
        assert_eq!(info.node_attributes, vec!["type".to_string(), "zone".to_string()]);
        assert_eq!(info.edge_attributes, vec!["proto".to_string()]);
        assert_eq!(info.node_count, 3);
        assert_eq!(info.edge_count, 2);
    }

    #[test]
    fn test_require_node() {
        let graph = sample();
        assert!(graph.require_node("a").is_ok());
        assert!(matches!(graph.require_node("zz"), Err(GfxError::NodeNotFound(id)) if id == "zz"));
    }

    #[test]
    fn test_algo_error_resolves_ids() {
        let graph = sample();
        let err = graph.resolve_algo_error(AlgoError::NegativeWeight { edge: 0, weight: -3.0 });
        assert!(matches!(err, GfxError::NegativeWeight { ref from, ref to, .. } if from == "a" && to == "b"));
    }
}
