//! GFX graph inspection engine
//!
//! Loads GEXF graph documents into an immutable in-memory model and answers
//! structural queries over it: neighborhoods, paths, reachability,
//! components, centrality and summary statistics. Graphs can be cut down to
//! ego or induced subgraphs and exported again as GEXF, node-link JSON,
//! GraphML, adjacency lists or edge lists.
//!
//! # Architecture
//!
//! - [`graph`]: attributed graph model with a CSR adjacency index built once
//!   at construction
//! - [`format`]: GEXF 1.1 / 1.2 / 1.3 reader and the exporters
//! - [`algo`]: string-id query layer over the `gfx-graph-algorithms` crate
//! - [`config`]: algorithm parameters and the tie-break policy
//!
//! Nothing here mutates a finished [`Graph`], so one graph can serve
//! concurrent readers without locking.
//!
//! ## Example Usage
//!
//! ```rust
//! use gfx::{Analyzer, Graph};
//!
//! let document = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <gexf xmlns="http://gexf.net/1.3" version="1.3">
//!   <graph defaultedgetype="directed">
//!     <nodes>
//!       <node id="lb1"/><node id="server1"/><node id="db1"/>
//!     </nodes>
//!     <edges>
//!       <edge source="lb1" target="server1"/>
//!       <edge source="server1" target="db1"/>
//!     </edges>
//!   </graph>
//! </gexf>"#;
//!
//! let graph = Graph::from_gexf_str(document).unwrap();
//! let analyzer = Analyzer::new(&graph);
//!
//! let path = analyzer.shortest_path("lb1", "db1", false).unwrap().unwrap();
//! assert_eq!(path.path, vec!["lb1", "server1", "db1"]);
//! assert!(analyzer.stats().is_connected);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod error;
pub mod format;
pub mod graph;

// Re-export main types for convenience
pub use algo::{
    Analyzer, CentralityKind, CentralityResult, ComponentInfo, ComponentKind, DegreeInfo,
    GraphStats, NeighborDirection, PathResult, ReachDirection,
};

pub use config::{EngineConfig, TieBreak};

pub use error::{ErrorKind, GfxError, GfxResult};

pub use format::{export, ExportFormat};

pub use graph::{
    AttributeMap, AttributeType, AttributeValue, DefaultEdgeType, DocumentMeta, Edge, EdgeFilter,
    EdgeIndex, EdgeRecord, GexfVersion, Graph, GraphBuilder, GraphInfo, GraphMetadata, GraphMode,
    Node, NodeFilter, NodeIndex,
};

pub use gfx_graph_algorithms::{ClosenessConfig, EigenvectorConfig, PageRankConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
