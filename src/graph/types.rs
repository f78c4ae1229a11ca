//! Core type definitions for the graph model

use crate::error::{GfxError, GfxResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense position of a node in its graph (declaration order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

impl NodeIndex {
    pub fn new(index: usize) -> Self {
        NodeIndex(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIndex({})", self.0)
    }
}

/// Dense position of an edge in its graph (document order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeIndex(pub usize);

impl EdgeIndex {
    pub fn new(index: usize) -> Self {
        EdgeIndex(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeIndex({})", self.0)
    }
}

/// Static graphs ignore temporal spells; dynamic graphs keep them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    #[default]
    Static,
    Dynamic,
}

impl GraphMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphMode::Static => "static",
            GraphMode::Dynamic => "dynamic",
        }
    }

    pub fn parse(value: &str) -> GfxResult<Self> {
        match value.trim() {
            "static" => Ok(GraphMode::Static),
            "dynamic" => Ok(GraphMode::Dynamic),
            other => Err(GfxError::format(format!("unsupported graph mode '{}'", other))),
        }
    }
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `defaultedgetype` of a GEXF graph.
///
/// `mutual` edges are traversable both ways, so they behave as undirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultEdgeType {
    Directed,
    #[default]
    Undirected,
    Mutual,
}

impl DefaultEdgeType {
    pub fn is_directed(&self) -> bool {
        matches!(self, DefaultEdgeType::Directed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultEdgeType::Directed => "directed",
            DefaultEdgeType::Undirected => "undirected",
            DefaultEdgeType::Mutual => "mutual",
        }
    }

    pub fn parse(value: &str) -> GfxResult<Self> {
        match value.trim() {
            "directed" => Ok(DefaultEdgeType::Directed),
            "undirected" => Ok(DefaultEdgeType::Undirected),
            "mutual" => Ok(DefaultEdgeType::Mutual),
            other => Err(GfxError::format(format!("unsupported defaultedgetype '{}'", other))),
        }
    }
}

impl From<bool> for DefaultEdgeType {
    fn from(directed: bool) -> Self {
        if directed {
            DefaultEdgeType::Directed
        } else {
            DefaultEdgeType::Undirected
        }
    }
}

impl fmt::Display for DefaultEdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported GEXF document versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum GexfVersion {
    V1_1,
    #[default]
    V1_2,
    V1_3,
}

impl GexfVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            GexfVersion::V1_1 => "1.1",
            GexfVersion::V1_2 => "1.2",
            GexfVersion::V1_3 => "1.3",
        }
    }

    /// Parse a `version` attribute value; a `draft` suffix is accepted.
    pub fn parse(value: &str) -> GfxResult<Self> {
        let trimmed = value.trim();
        match trimmed.strip_suffix("draft").unwrap_or(trimmed) {
            "1.1" => Ok(GexfVersion::V1_1),
            "1.2" => Ok(GexfVersion::V1_2),
            "1.3" => Ok(GexfVersion::V1_3),
            _ => Err(GfxError::Version(trimmed.to_string())),
        }
    }

    /// Recognize a version from the document namespace URI.
    pub fn from_namespace(uri: &str) -> Option<Self> {
        let tail = uri.trim().trim_end_matches('/').rsplit('/').next()?;
        GexfVersion::parse(tail).ok()
    }

    pub fn namespace(&self) -> &'static str {
        match self {
            GexfVersion::V1_1 => "http://www.gexf.net/1.1draft",
            GexfVersion::V1_2 => "http://www.gexf.net/1.2draft",
            GexfVersion::V1_3 => "http://gexf.net/1.3",
        }
    }
}

impl fmt::Display for GexfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GexfVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        assert_eq!(GexfVersion::parse("1.3").unwrap(), GexfVersion::V1_3);
        assert_eq!(GexfVersion::parse("1.2draft").unwrap(), GexfVersion::V1_2);
        assert!(matches!(GexfVersion::parse("2.0"), Err(GfxError::Version(v)) if v == "2.0"));
        assert!(GexfVersion::parse("1.0").is_err());
    }

    #[test]
    fn test_version_from_namespace() {
        assert_eq!(GexfVersion::from_namespace("http://gexf.net/1.3"), Some(GexfVersion::V1_3));
        assert_eq!(
            GexfVersion::from_namespace("http://www.gexf.net/1.2draft"),
            Some(GexfVersion::V1_2)
        );
        assert_eq!(
            GexfVersion::from_namespace("http://www.gephi.org/gexf/1.1draft"),
            Some(GexfVersion::V1_1)
        );
        assert_eq!(GexfVersion::from_namespace("http://www.gephi.org/gexf"), None);
    }

    #[test]
    fn test_edge_type_parsing() {
        assert!(DefaultEdgeType::parse("directed").unwrap().is_directed());
        assert!(!DefaultEdgeType::parse("mutual").unwrap().is_directed());
        assert!(DefaultEdgeType::parse("sideways").is_err());
        assert_eq!(GraphMode::parse("dynamic").unwrap(), GraphMode::Dynamic);
    }
}
