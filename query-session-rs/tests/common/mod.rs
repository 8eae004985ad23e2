//! Scripted in-memory transport shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graph_sanitizer::GraphPayload;
use qa_sdk::models::{AdaptationAction, QueryResponse};
use qa_sdk::{QueryTransport, Result, ServiceError};
use serde_json::json;
use tokio::sync::Notify;

/// One scripted reply, optionally held until its gate is opened
pub struct Step<T> {
    gate: Option<Arc<Notify>>,
    outcome: Result<T>,
}

impl<T> Step<T> {
    pub fn ready(outcome: Result<T>) -> Self {
        Self { gate: None, outcome }
    }

    /// A reply that waits for the returned gate to be notified
    pub fn gated(outcome: Result<T>) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            Self {
                gate: Some(Arc::clone(&gate)),
                outcome,
            },
            gate,
        )
    }

    async fn resolve(self) -> Result<T> {
        if let Some(gate) = self.gate {
            gate.notified().await;
        }
        self.outcome
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryCall {
    pub question: String,
    pub retry_count: u32,
    pub actions: Vec<AdaptationAction>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    queries: Mutex<VecDeque<Step<QueryResponse>>>,
    retries: Mutex<VecDeque<Step<QueryResponse>>>,
    graphs: Mutex<VecDeque<Step<GraphPayload>>>,
    pub query_calls: Mutex<Vec<String>>,
    pub retry_calls: Mutex<Vec<RetryCall>>,
    pub subgraph_calls: Mutex<Vec<(Vec<String>, u32)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_query(&self, step: Step<QueryResponse>) {
        self.queries.lock().unwrap().push_back(step);
    }

    pub fn push_retry(&self, step: Step<QueryResponse>) {
        self.retries.lock().unwrap().push_back(step);
    }

    pub fn push_graph(&self, step: Step<GraphPayload>) {
        self.graphs.lock().unwrap().push_back(step);
    }

    pub fn retry_call_count(&self) -> usize {
        self.retry_calls.lock().unwrap().len()
    }
}

fn next<T>(queue: &Mutex<VecDeque<Step<T>>>, what: &str) -> Step<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Step::ready(Err(ServiceError::network(format!("no scripted {}", what)))))
}

#[async_trait]
impl QueryTransport for ScriptedTransport {
    async fn submit_query(&self, question: &str) -> Result<QueryResponse> {
        self.query_calls.lock().unwrap().push(question.to_string());
        let step = next(&self.queries, "query");
        step.resolve().await
    }

    async fn submit_retry(
        &self,
        question: &str,
        retry_count: u32,
        actions: &[AdaptationAction],
    ) -> Result<QueryResponse> {
        self.retry_calls.lock().unwrap().push(RetryCall {
            question: question.to_string(),
            retry_count,
            actions: actions.to_vec(),
        });
        let step = next(&self.retries, "retry");
        step.resolve().await
    }

    async fn fetch_graph(&self) -> Result<GraphPayload> {
        let step = next(&self.graphs, "graph");
        step.resolve().await
    }

    async fn fetch_subgraph(&self, seeds: &[String], hops: u32) -> Result<GraphPayload> {
        self.subgraph_calls.lock().unwrap().push((seeds.to_vec(), hops));
        let step = next(&self.graphs, "graph");
        step.resolve().await
    }
}

pub fn action(name: &str, patch: serde_json::Value) -> AdaptationAction {
    AdaptationAction {
        name: name.to_string(),
        reason: Some("low coverage".to_string()),
        patch: patch.as_object().cloned(),
    }
}

/// A response carrying the given retry signals
pub fn response(answer: &str, can_retry: Option<bool>, retry_count: Option<u32>, actions: Vec<AdaptationAction>) -> QueryResponse {
    QueryResponse {
        question: "How do agents evaluate answers?".to_string(),
        answer: answer.to_string(),
        can_retry,
        retry_count,
        adaptation_actions: actions,
        ..QueryResponse::default()
    }
}

/// First-attempt response the server recommends retrying
pub fn retryable(answer: &str) -> QueryResponse {
    response(
        answer,
        Some(true),
        Some(0),
        vec![
            action("increase_top_k", json!({"top_k": 10})),
            action("lower_temperature", json!({"temperature": 0.1})),
        ],
    )
}
