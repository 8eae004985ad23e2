//! Raw graph payload as received from the backend

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Untrusted node/edge payload.
///
/// Both collections are kept as raw JSON. Anything that is not an array is
/// treated as empty by the sanitizer, so decoding a payload never fails on
/// shape alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct GraphPayload {
    /// Node entries, expected to be objects with `id`, `label?`, `type?`
    pub nodes: Value,

    /// Edge entries, expected to be objects with `id?`, `source`, `target`, `relation?`
    pub edges: Value,
}

impl GraphPayload {
    /// Build a payload from already-separated node and edge entries
    pub fn new(nodes: Vec<Value>, edges: Vec<Value>) -> Self {
        Self {
            nodes: Value::Array(nodes),
            edges: Value::Array(edges),
        }
    }

    /// Node entries, or an empty slice when `nodes` is not an array
    pub fn node_entries(&self) -> &[Value] {
        as_entries(&self.nodes)
    }

    /// Edge entries, or an empty slice when `edges` is not an array
    pub fn edge_entries(&self) -> &[Value] {
        as_entries(&self.edges)
    }
}

impl From<Value> for GraphPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut map) => Self {
                nodes: map.remove("nodes").unwrap_or(Value::Null),
                edges: map.remove("edges").unwrap_or(Value::Null),
            },
            _ => Self::default(),
        }
    }
}

fn as_entries(value: &Value) -> &[Value] {
    match value {
        Value::Array(entries) => entries.as_slice(),
        _ => &[],
    }
}
