//! Property tests for the sanitizer's edge guarantees

use std::collections::HashSet;

use graph_sanitizer::{sanitize, GraphPayload};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn id_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        (0u8..6).prop_map(|n| Some(json!(n))),
        (0u8..6).prop_map(|n| Some(json!(n.to_string()))),
        Just(Some(json!("null"))),
        Just(Some(json!("undefined"))),
    ]
}

fn node() -> impl Strategy<Value = Value> {
    (id_value(), proptest::option::of("[a-z]{1,4}")).prop_map(|(id, label)| {
        let mut object = Map::new();
        if let Some(id) = id {
            object.insert("id".to_string(), id);
        }
        if let Some(label) = label {
            object.insert("label".to_string(), json!(label));
        }
        Value::Object(object)
    })
}

fn edge() -> impl Strategy<Value = Value> {
    (id_value(), id_value(), proptest::option::of(0u8..4)).prop_map(|(source, target, id)| {
        let mut object = Map::new();
        if let Some(source) = source {
            object.insert("source".to_string(), source);
        }
        if let Some(target) = target {
            object.insert("target".to_string(), target);
        }
        if let Some(id) = id {
            object.insert("id".to_string(), json!(format!("edge-{}", id)));
        }
        Value::Object(object)
    })
}

fn payload() -> impl Strategy<Value = GraphPayload> {
    (
        proptest::collection::vec(node(), 0..8),
        proptest::collection::vec(edge(), 0..12),
    )
        .prop_map(|(nodes, edges)| GraphPayload::new(nodes, edges))
}

proptest! {
    #[test]
    fn edges_never_dangle(payload in payload()) {
        let graph = sanitize(&payload);
        let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

        for edge in &graph.edges {
            prop_assert!(ids.contains(edge.source.as_str()));
            prop_assert!(ids.contains(edge.target.as_str()));
            prop_assert_ne!(edge.source.as_str(), "null");
            prop_assert_ne!(edge.target.as_str(), "undefined");
        }
    }

    #[test]
    fn dropped_count_accounts_for_every_edge(payload in payload()) {
        let graph = sanitize(&payload);
        prop_assert_eq!(graph.edges.len() + graph.dropped_edge_count, payload.edge_entries().len());
    }

    #[test]
    fn sanitize_is_idempotent(payload in payload()) {
        prop_assert_eq!(sanitize(&payload), sanitize(&payload));
    }

    #[test]
    fn element_ids_are_unique(payload in payload()) {
        let graph = sanitize(&payload);
        let mut seen = HashSet::new();

        for id in graph.nodes.iter().map(|n| &n.id).chain(graph.edges.iter().map(|e| &e.id)) {
            prop_assert!(seen.insert(id.clone()), "duplicate element id {}", id);
        }
    }
}
