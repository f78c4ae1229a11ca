//! Graph model
//!
//! This module implements the attributed graph data model with:
//! - String-identified nodes kept in declaration order
//! - Directed or undirected edges, self-loops and parallel edges included
//! - Typed attributes on nodes, edges and the graph
//! - A dense CSR adjacency index derived once at construction

pub mod attribute;
pub mod edge;
pub mod filter;
pub mod node;
pub mod store;
pub mod subgraph;
pub mod types;

// Re-export main types
pub use attribute::{infer_types, AttributeMap, AttributeType, AttributeValue};
pub use edge::Edge;
pub use filter::{EdgeFilter, NodeFilter};
pub use node::Node;
pub use store::{DocumentMeta, EdgeRecord, Graph, GraphBuilder, GraphInfo, GraphMetadata};
pub use types::{DefaultEdgeType, EdgeIndex, GexfVersion, GraphMode, NodeIndex};
