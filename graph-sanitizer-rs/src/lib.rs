//! # Graph Sanitizer
//!
//! Prepares knowledge-graph data coming from the graph-extraction pipeline for
//! force-directed rendering.
//!
//! The payload is untrusted JSON: node and edge collections may be missing or
//! not arrays, ids may be numbers, and edges may reference nodes that were
//! pruned upstream. [`sanitize`] never fails. It always produces a renderable
//! element set and reports how many edges had to be removed so the consuming
//! surface can disclose data-quality issues instead of hiding them.
//!
//! ```
//! use graph_sanitizer::{sanitize, GraphPayload};
//! use serde_json::json;
//!
//! let payload = GraphPayload::from(json!({
//!     "nodes": [{"id": 1}],
//!     "edges": [{"source": 1, "target": 2}]
//! }));
//!
//! let graph = sanitize(&payload);
//! assert_eq!(graph.nodes[0].id, "1");
//! assert!(graph.edges.is_empty());
//! assert_eq!(graph.dropped_edge_count, 1);
//! ```

mod coerce;
mod payload;
mod sanitize;

pub use coerce::{coerce_string, is_nullish};
pub use payload::GraphPayload;
pub use sanitize::{
    sanitize, EdgeElement, ElementData, GraphElement, NodeElement, SanitizedGraph,
};

/// Node type used when the payload does not carry one
pub const DEFAULT_NODE_TYPE: &str = "Concept";

/// Edge label used when the payload does not carry a relation
pub const DEFAULT_EDGE_LABEL: &str = "rel";
