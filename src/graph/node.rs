//! Node implementation

use super::attribute::{AttributeMap, AttributeValue};
use serde::{Deserialize, Serialize};

/// A node in the graph
///
/// Identified by a string id that is unique within its graph. `start` and
/// `end` bound the node's lifetime in dynamic graphs and stay `None` in
/// static ones. `parent` names the enclosing node of a hierarchical
/// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub attributes: AttributeMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            label: None,
            attributes: AttributeMap::new(),
            start: None,
            end: None,
            parent: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Label if present, otherwise the id
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Fold a later declaration of the same id into this one. Fields the
    /// later declaration sets win.
    pub(crate) fn merge(&mut self, other: Node) {
        if other.label.is_some() {
            self.label = other.label;
        }
        if other.start.is_some() {
            self.start = other.start;
        }
        if other.end.is_some() {
            self.end = other.end;
        }
        if other.parent.is_some() {
            self.parent = other.parent;
        }
        self.attributes.extend(other.attributes);
    }
}
