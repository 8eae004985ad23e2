//! Edge validation against the node set

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{coerce_string, is_nullish};
use crate::payload::GraphPayload;
use crate::{DEFAULT_EDGE_LABEL, DEFAULT_NODE_TYPE};

/// A renderable node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeElement {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A renderable edge whose endpoints are both present nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeElement {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Element payload as the graph-drawing library expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ElementData {
    Node(NodeElement),
    Edge(EdgeElement),
}

/// One entry of the renderable element list, serialized as `{"data": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphElement {
    pub data: ElementData,
}

/// Outcome of [`sanitize`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedGraph {
    /// Node elements in payload order
    pub nodes: Vec<NodeElement>,

    /// Valid edge elements in payload order
    pub edges: Vec<EdgeElement>,

    /// Original edge count minus valid edge count
    pub dropped_edge_count: usize,

    /// Nodes collapsed because their id was already present
    pub dropped_node_count: usize,
}

impl SanitizedGraph {
    /// Renderable element list: every node, then every valid edge
    pub fn elements(&self) -> Vec<GraphElement> {
        let nodes = self.nodes.iter().cloned().map(ElementData::Node);
        let edges = self.edges.iter().cloned().map(ElementData::Edge);

        nodes.chain(edges).map(|data| GraphElement { data }).collect()
    }

    /// Whether anything had to be removed from the payload
    pub fn has_data_quality_issues(&self) -> bool {
        self.dropped_edge_count > 0 || self.dropped_node_count > 0
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// One-line human readable description, including the drop disclosure
    pub fn summary(&self) -> String {
        let mut summary = format!("{} nodes, {} edges", self.nodes.len(), self.edges.len());

        if self.dropped_edge_count > 0 {
            summary.push_str(&format!(
                " ({} invalid edge{} dropped)",
                self.dropped_edge_count,
                if self.dropped_edge_count == 1 { "" } else { "s" }
            ));
        }
        if self.dropped_node_count > 0 {
            summary.push_str(&format!(
                " ({} duplicate node{} collapsed)",
                self.dropped_node_count,
                if self.dropped_node_count == 1 { "" } else { "s" }
            ));
        }

        summary
    }
}

/// Turn an untrusted payload into a renderable element set.
///
/// An edge survives only when both `source` and `target` are present, do not
/// coerce to `"null"`/`"undefined"`, and name a node of the payload. Element
/// ids are unique across nodes and edges: a repeated node id keeps the first
/// node, and an explicit edge id that repeats an earlier element id drops the
/// edge. Edges without an id get `e-{index}`, suffixed `-1`, `-2`, ... when
/// that is already taken.
pub fn sanitize(payload: &GraphPayload) -> SanitizedGraph {
    let raw_nodes = payload.node_entries();
    let raw_edges = payload.edge_entries();

    let mut element_ids: HashSet<String> = HashSet::with_capacity(raw_nodes.len() + raw_edges.len());
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut dropped_node_count = 0;

    for node in raw_nodes {
        let id = coerce_string(field(node, "id"));
        if !element_ids.insert(id.clone()) {
            dropped_node_count += 1;
            continue;
        }

        let label = coerce_or(field(node, "label"), &id);
        let kind = coerce_or(field(node, "type"), DEFAULT_NODE_TYPE);
        nodes.push(NodeElement { id, label, kind });
    }

    let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut valid = Vec::with_capacity(raw_edges.len());

    // explicit ids are claimed before any id is synthesized
    for (index, edge) in raw_edges.iter().enumerate() {
        let (Some(source), Some(target)) = (endpoint(field(edge, "source")), endpoint(field(edge, "target"))) else {
            continue;
        };
        if !node_ids.contains(source.as_str()) || !node_ids.contains(target.as_str()) {
            continue;
        }

        let id = field(edge, "id");
        let id = if is_nullish(id) {
            None
        } else {
            let id = coerce_string(id);
            if !element_ids.insert(id.clone()) {
                continue;
            }
            Some(id)
        };

        let label = coerce_or(field(edge, "relation"), DEFAULT_EDGE_LABEL);
        valid.push((index, id, source, target, label));
    }

    let edges: Vec<EdgeElement> = valid
        .into_iter()
        .map(|(index, id, source, target, label)| {
            let id = id.unwrap_or_else(|| synthesize_edge_id(index, &mut element_ids));
            EdgeElement { id, source, target, label }
        })
        .collect();

    SanitizedGraph {
        dropped_edge_count: raw_edges.len() - edges.len(),
        dropped_node_count,
        nodes,
        edges,
    }
}

fn synthesize_edge_id(index: usize, taken: &mut HashSet<String>) -> String {
    let base = format!("e-{}", index);
    let mut id = base.clone();
    let mut suffix = 0;

    while !taken.insert(id.clone()) {
        suffix += 1;
        id = format!("{}-{}", base, suffix);
    }

    id
}

fn field<'a>(entry: &'a Value, key: &str) -> Option<&'a Value> {
    entry.as_object().and_then(|object| object.get(key))
}

fn coerce_or(value: Option<&Value>, fallback: &str) -> String {
    if is_nullish(value) {
        fallback.to_string()
    } else {
        coerce_string(value)
    }
}

fn endpoint(value: Option<&Value>) -> Option<String> {
    if is_nullish(value) {
        return None;
    }

    match coerce_string(value) {
        s if s == "null" || s == "undefined" => None,
        s => Some(s),
    }
}
