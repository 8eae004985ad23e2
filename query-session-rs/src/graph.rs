//! Graph view controller
//!
//! Fetches a graph payload, sanitizes it and publishes the renderable result.
//! Shares the in-flight rejection and stale-response rules of
//! [`QuerySession`](crate::QuerySession).

use std::sync::Arc;

use graph_sanitizer::{sanitize, GraphPayload, SanitizedGraph};
use qa_sdk::{QueryTransport, Result, ServiceError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::guard::Guarded;
use crate::lifecycle::describe_error;
use crate::state::{InFlight, Transition};

/// Shown when the backend has no graph endpoint
pub const GRAPH_UNAVAILABLE: &str = "Graph endpoint not available";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphState {
    pub loading: bool,
    pub graph: Option<Arc<SanitizedGraph>>,
    pub error: Option<String>,
}

impl InFlight for GraphState {
    fn is_loading(&self) -> bool {
        self.loading
    }

    fn start_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn stop_loading(&mut self) {
        self.loading = false;
    }
}

pub struct GraphExplorer<T: QueryTransport + ?Sized> {
    cell: Guarded<GraphState>,
    transport: Arc<T>,
}

impl<T: QueryTransport + ?Sized> GraphExplorer<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            cell: Guarded::new(),
            transport,
        }
    }

    /// Load the full knowledge graph
    pub async fn load(&self) -> Transition {
        let sequence = match self.cell.begin(|_| Ok(())) {
            Ok((sequence, ())) => sequence,
            Err(rejection) => return Transition::Rejected(rejection),
        };

        info!(sequence, "Loading full graph");
        let outcome = self.transport.fetch_graph().await;
        self.complete(sequence, outcome)
    }

    /// Load the neighbourhood of `seeds` within `hops`. No seeds loads the
    /// full graph.
    pub async fn load_subgraph(&self, seeds: &[String], hops: u32) -> Transition {
        if seeds.is_empty() {
            return self.load().await;
        }

        let sequence = match self.cell.begin(|_| Ok(())) {
            Ok((sequence, ())) => sequence,
            Err(rejection) => return Transition::Rejected(rejection),
        };

        info!(sequence, seeds = seeds.len(), hops, "Loading subgraph");
        let outcome = self.transport.fetch_subgraph(seeds, hops).await;
        self.complete(sequence, outcome)
    }

    fn complete(&self, sequence: u64, outcome: Result<GraphPayload>) -> Transition {
        match outcome {
            Ok(payload) => {
                let graph = sanitize(&payload);

                if graph.has_data_quality_issues() {
                    warn!(
                        sequence,
                        dropped_edges = graph.dropped_edge_count,
                        dropped_nodes = graph.dropped_node_count,
                        "Graph payload had invalid elements"
                    );
                }

                let graph = Arc::new(graph);
                if self.cell.finish(sequence, |state| state.graph = Some(graph)) {
                    Transition::Completed
                } else {
                    debug!(sequence, "Discarding stale graph response");
                    Transition::Discarded
                }
            }
            Err(error) => {
                let message = graph_error_message(&error);

                if self.cell.finish(sequence, |state| state.error = Some(message.clone())) {
                    warn!(sequence, error = %error, "Graph load failed");
                    Transition::Failed(message)
                } else {
                    debug!(sequence, "Discarding stale graph failure");
                    Transition::Discarded
                }
            }
        }
    }

    /// Abandon the load in flight, if any
    pub fn abandon(&self) -> bool {
        self.cell.abandon()
    }

    pub fn state(&self) -> GraphState {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<GraphState> {
        self.cell.subscribe()
    }
}

fn graph_error_message(error: &ServiceError) -> String {
    if error.is_not_found() {
        GRAPH_UNAVAILABLE.to_string()
    } else {
        describe_error(error)
    }
}
