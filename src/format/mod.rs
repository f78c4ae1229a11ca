//! Serialized graph formats
//!
//! GEXF and node-link JSON are read and written losslessly. GraphML,
//! adjacency lists and edge lists are export-only; the two text formats
//! drop every attribute. Graph-level attributes survive node-link JSON
//! only; GEXF has nowhere to put them.

pub mod gexf;
pub mod graphml;
pub mod nodelink;
pub mod text;

use crate::error::{GfxError, GfxResult};
use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufReader, Read};
use std::str::FromStr;

/// Output formats understood by [`export`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Node-link JSON (`nodes` + `links`)
    #[serde(rename = "json")]
    NodeLinkJson,
    Gexf,
    #[serde(rename = "graphml")]
    GraphMl,
    #[serde(rename = "adjlist")]
    AdjacencyList,
    #[serde(rename = "edgelist")]
    EdgeList,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::NodeLinkJson,
        ExportFormat::Gexf,
        ExportFormat::GraphMl,
        ExportFormat::AdjacencyList,
        ExportFormat::EdgeList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::NodeLinkJson => "json",
            ExportFormat::Gexf => "gexf",
            ExportFormat::GraphMl => "graphml",
            ExportFormat::AdjacencyList => "adjlist",
            ExportFormat::EdgeList => "edgelist",
        }
    }

    /// Whether a re-import restores the graph exactly
    pub fn is_lossless(&self) -> bool {
        matches!(self, ExportFormat::NodeLinkJson | ExportFormat::Gexf)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = GfxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| {
                GfxError::InvalidArgument(format!(
                    "unknown export format '{}' (expected json, gexf, graphml, adjlist or edgelist)",
                    s
                ))
            })
    }
}

/// Render `graph` in the requested format.
pub fn export(graph: &Graph, format: ExportFormat) -> GfxResult<String> {
    match format {
        ExportFormat::NodeLinkJson => nodelink::to_json(graph),
        ExportFormat::Gexf => gexf::write(graph),
        ExportFormat::GraphMl => graphml::write(graph),
        ExportFormat::AdjacencyList => Ok(text::adjacency_list(graph)),
        ExportFormat::EdgeList => Ok(text::edge_list(graph)),
    }
}

/// Any XML-level failure becomes a format error.
pub(crate) fn xml_error<E: fmt::Display>(err: E) -> GfxError {
    GfxError::format(format!("XML error: {}", err))
}

impl Graph {
    /// Parse a GEXF document held in memory.
    pub fn from_gexf_str(document: &str) -> GfxResult<Graph> {
        gexf::parse(document)
    }

    /// Parse a GEXF document from an already opened stream. The bytes are
    /// decoded per the document's XML declaration.
    pub fn from_gexf_reader<R: Read>(reader: R) -> GfxResult<Graph> {
        gexf::parse_reader(BufReader::new(reader))
    }

    /// Re-import a document written by [`Graph::to_node_link_json`].
    pub fn from_node_link_json(document: &str) -> GfxResult<Graph> {
        nodelink::parse(document)
    }

    pub fn to_gexf(&self) -> GfxResult<String> {
        gexf::write(self)
    }

    pub fn to_node_link_json(&self) -> GfxResult<String> {
        nodelink::to_json(self)
    }

    pub fn export(&self, format: ExportFormat) -> GfxResult<String> {
        export(self, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_format_names() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!(" GraphML ".parse::<ExportFormat>().unwrap(), ExportFormat::GraphMl);
        assert_eq!("dot".parse::<ExportFormat>().unwrap_err().kind(), ErrorKind::Other);
        assert!(ExportFormat::Gexf.is_lossless());
        assert!(!ExportFormat::EdgeList.is_lossless());
    }

    #[test]
    fn test_reader_input() {
        let document = br#"<gexf version="1.1"><graph defaultedgetype="directed"><edges><edge source="a" target="b"/></edges></graph></gexf>"#;
        let graph = Graph::from_gexf_reader(&document[..]).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.is_directed());
    }

    #[test]
    fn test_latin1_reader_input() {
        let mut document = br#"<?xml version="1.0" encoding="ISO-8859-1"?>
<gexf version="1.3"><graph><nodes><node id="a" label="Caf"#
            .to_vec();
        document.push(0xE9);
        document.extend_from_slice(br#""/></nodes></graph></gexf>"#);

        let graph = Graph::from_gexf_reader(&document[..]).unwrap();
        assert_eq!(graph.node("a").unwrap().label.as_deref(), Some("Caf\u{e9}"));
    }

    #[test]
    fn test_undecodable_bytes_are_format_errors() {
        let bytes: &[u8] = &[0x3c, 0xff, 0xfe];
        assert_eq!(Graph::from_gexf_reader(bytes).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_graph_attributes_only_survive_json() {
        let mut builder = Graph::builder(crate::graph::DefaultEdgeType::Directed);
        builder.attributes_mut().insert("name".into(), "mesh".into());
        builder.add_edge("a", "b");
        let graph = builder.build();

        let json = Graph::from_node_link_json(&graph.to_node_link_json().unwrap()).unwrap();
        assert_eq!(json.attributes(), graph.attributes());

        let gexf = Graph::from_gexf_str(&graph.to_gexf().unwrap()).unwrap();
        assert!(gexf.attributes().is_empty());
        assert_eq!(gexf.edge_count(), 1);
    }
}
