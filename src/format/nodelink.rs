//! Node-link JSON
//!
//! ```json
//! {"directed": true, "multigraph": false, "mode": "static",
//!  "meta": {"version": "1.3", "creator": "..."},
//!  "graph": {},
//!  "nodes": [{"id": "a", "label": "A", "attributes": {"cores": 8}}],
//!  "links": [{"source": "a", "target": "b", "weight": 2.0, "attributes": {}}]}
//! ```

use crate::error::{GfxError, GfxResult};
use crate::graph::{
    AttributeMap, DefaultEdgeType, DocumentMeta, GexfVersion, Graph, GraphMode, Node,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct Document<N, L> {
    directed: bool,
    #[serde(default)]
    multigraph: bool,
    #[serde(default)]
    mode: GraphMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edge_type: Option<DefaultEdgeType>,
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    graph: AttributeMap,
    nodes: Vec<N>,
    links: Vec<L>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_modified: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Link<S> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<S>,
    source: S,
    target: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<S>,
    #[serde(default)]
    attributes: AttributeMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<S>,
}

/// Serialize as pretty-printed node-link JSON.
pub fn to_json(graph: &Graph) -> GfxResult<String> {
    let meta = graph.document_meta();
    let links: Vec<Link<&str>> = graph
        .edges()
        .map(|edge| {
            let (source, target) = graph.endpoints(edge);
            Link {
                id: edge.id.as_deref(),
                source,
                target,
                weight: edge.weight,
                label: edge.label.as_deref(),
                kind: edge.kind.as_deref(),
                attributes: edge.attributes.clone(),
                start: edge.start.as_deref(),
                end: edge.end.as_deref(),
            }
        })
        .collect();

    let document = Document {
        directed: graph.is_directed(),
        multigraph: graph.has_parallel_edges(),
        mode: graph.mode(),
        edge_type: Some(graph.default_edge_type()),
        meta: Meta {
            version: Some(meta.version.to_string()),
            creator: meta.creator.clone(),
            description: meta.description.clone(),
            keywords: meta.keywords.clone(),
            last_modified: meta.last_modified.clone(),
        },
        graph: graph.attributes().clone(),
        nodes: graph.nodes().collect::<Vec<&Node>>(),
        links,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Rebuild a graph from node-link JSON.
pub fn parse(document: &str) -> GfxResult<Graph> {
    let document: Document<Node, Link<String>> = serde_json::from_str(document)?;

    let edge_type = match document.edge_type {
        Some(edge_type) if edge_type.is_directed() == document.directed => edge_type,
        _ => DefaultEdgeType::from(document.directed),
    };
    let version = match document.meta.version.as_deref() {
        Some(raw) => GexfVersion::parse(raw)?,
        None => GexfVersion::default(),
    };
    let meta = DocumentMeta {
        version,
        creator: document.meta.creator,
        description: document.meta.description,
        keywords: document.meta.keywords,
        last_modified: document.meta.last_modified,
    };

    let mut builder = Graph::builder(edge_type).mode(document.mode).meta(meta);
    *builder.attributes_mut() = document.graph;

    for node in document.nodes {
        if node.id.is_empty() {
            return Err(GfxError::format("node-link node with an empty id"));
        }
        builder.add_node(node);
    }
    for link in document.links {
        let edge = builder.add_edge(&link.source, &link.target);
        edge.id = link.id;
        edge.weight = link.weight;
        edge.label = link.label;
        edge.kind = link.kind;
        edge.attributes = link.attributes;
        edge.start = link.start;
        edge.end = link.end;
    }

    let graph = builder.build();
    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "parsed node-link document");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::graph::AttributeValue;
    use serde_json::Value;

    fn sample() -> Graph {
        let mut builder = Graph::builder(DefaultEdgeType::Mutual).mode(GraphMode::Dynamic);
        builder.add_node(
            Node::new("a")
                .with_label("Alpha")
                .with_attribute("cores", 8i64)
                .with_attribute("load", 0.5)
                .with_attribute("active", true),
        );
        builder.add_node(Node::new("b"));
        {
            let edge = builder.add_edge("a", "b");
            edge.weight = Some(3.0);
            edge.kind = Some("tcp".into());
            edge.start = Some("2020".into());
        }
        builder.add_edge("b", "a");
        builder.build()
    }

    #[test]
    fn test_document_shape() {
        let json: Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["directed"], Value::Bool(false));
        assert_eq!(json["multigraph"], Value::Bool(true));
        assert_eq!(json["mode"], "dynamic");
        assert_eq!(json["nodes"][0]["attributes"]["cores"], 8);
        assert_eq!(json["links"][0]["source"], "a");
        assert_eq!(json["links"][0]["weight"], 3.0);
        assert!(json["links"][1].get("weight").is_none());
    }

    #[test]
    fn test_round_trip_keeps_types() {
        let graph = sample();
        let again = parse(&to_json(&graph).unwrap()).unwrap();

        assert_eq!(again.default_edge_type(), DefaultEdgeType::Mutual);
        assert!(again.is_dynamic());
        let a = again.node("a").unwrap();
        assert_eq!(a.attribute("cores"), Some(&AttributeValue::Integer(8)));
        assert_eq!(a.attribute("load"), Some(&AttributeValue::Float(0.5)));
        assert_eq!(a.attribute("active"), Some(&AttributeValue::Boolean(true)));

        let before: Vec<_> = graph.edges().cloned().collect();
        let after: Vec<_> = again.edges().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_malformed_json_is_format_error() {
        assert_eq!(parse("{\"nodes\": [").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(parse("{\"directed\": true}").unwrap_err().kind(), ErrorKind::Format);
        let bad_version = r#"{"directed": true, "meta": {"version": "9"}, "nodes": [], "links": []}"#;
        assert_eq!(parse(bad_version).unwrap_err().kind(), ErrorKind::Version);
    }
}
