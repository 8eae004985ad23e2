//! Plain-text rendering of controller state

use graph_sanitizer::SanitizedGraph;
use qa_sdk::models::{merged_patch, AdaptationAction, EvaluationResult, Insight, Passage, QueryResponse, Tuning};
use query_session::{retry_eligibility, Notification, NotificationKind};
use serde_json::Value;

const RETRY_READY: &str = "Retry once with recommended patches";

/// Full result view: answer, agents, evaluation, adaptation, insight, sources
pub fn render_response(response: &QueryResponse) -> String {
    let mut out = String::new();

    out.push_str(&format!("Question: {}\n", response.question));
    out.push_str(&format!("Intent:   {}\n", display_or(response.intent.as_str(), "(unknown)")));
    out.push_str(&format!("Agents:   {}\n", response.agents().join(" -> ")));

    if !response.sub_tasks.is_empty() {
        out.push_str("\nSub-tasks\n");
        for (i, task) in response.sub_tasks.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, task));
        }
    }

    out.push_str(&format!("\nAnswer\n{}\n", display_or(response.answer.trim(), "(no answer)")));

    out.push('\n');
    out.push_str(&render_evaluation(response.evaluation.as_ref()));
    out.push('\n');
    out.push_str(&render_adaptation(response));

    if let Some(insight) = response.insight.as_ref().filter(|insight| !insight.is_empty()) {
        out.push('\n');
        out.push_str(&render_insight(insight));
    }

    out.push('\n');
    out.push_str(&render_passages(&response.passages));
    out
}

pub fn render_evaluation(evaluation: Option<&EvaluationResult>) -> String {
    let mut out = String::from("Evaluator\n");

    let evaluation = match evaluation {
        Some(evaluation) => evaluation,
        None => {
            out.push_str("  (no evaluation)\n");
            return out;
        }
    };

    out.push_str(&format!("  Global score: {:.3}\n", evaluation.display_global_score()));
    for name in evaluation.scores.keys() {
        match evaluation.display_score(name) {
            Some(score) => {
                out.push_str(&format!("  {:<16} {:.3}\n", name, score));
            }
            None => {
                out.push_str(&format!("  {:<16} -\n", name));
            }
        }
    }

    write_list(&mut out, "Issues", &evaluation.issues);
    write_list(&mut out, "Recommendations", &evaluation.recommendations);
    out
}

/// Adaptation panel, including the retry trigger state
pub fn render_adaptation(response: &QueryResponse) -> String {
    let mut out = String::from("Adaptation\n");

    let trigger = match retry_eligibility(response) {
        Ok(()) => RETRY_READY.to_string(),
        Err(block) => block.to_string(),
    };
    out.push_str(&format!("  Retry (1x): {}\n", trigger));

    if let Some(ref tuning) = response.tuning {
        out.push_str(&format!("  Current tuning: {}\n", render_tuning(tuning)));

        let patch = merged_patch(&response.adaptation_actions);
        if !patch.is_empty() {
            out.push_str(&format!("  After retry:    {}\n", render_tuning(&tuning.patched(&patch))));
        }
    }

    out.push_str(&format!("  Suggested actions ({})\n", response.adaptation_actions.len()));
    if response.adaptation_actions.is_empty() {
        out.push_str("    (none)\n");
    }
    for action in &response.adaptation_actions {
        out.push_str(&render_action(action));
    }

    if response.can_retry != Some(true) {
        out.push_str("  Retry is not recommended for this run (or no useful patch).\n");
    }

    out
}

fn render_action(action: &AdaptationAction) -> String {
    let mut line = format!("    - {}", action.name);

    if let Some(ref patch) = action.patch {
        let badges: Vec<String> = patch.iter().map(|(k, v)| format!("{}={}", k, plain(v))).collect();
        if !badges.is_empty() {
            line.push_str(&format!(" [{}]", badges.join(", ")));
        }
    }
    line.push('\n');

    if let Some(reason) = action.reason.as_deref().filter(|r| !r.is_empty()) {
        line.push_str(&format!("      {}\n", reason));
    }

    line
}

fn render_tuning(tuning: &Tuning) -> String {
    format!(
        "top_k={} temperature={} min_overlap={} llm_critique={} graph_update={}",
        tuning.top_k, tuning.temperature, tuning.min_overlap, tuning.enable_llm_critique, tuning.enable_graph_update
    )
}

pub fn render_insight(insight: &Insight) -> String {
    let mut out = String::from("Insight\n");

    if let Some(analysis) = insight.analysis.as_deref().filter(|a| !a.trim().is_empty()) {
        out.push_str(&format!("  {}\n", analysis.trim()));
    }

    let sections = [
        ("Gaps", &insight.gaps),
        ("Contradictions", &insight.contradictions),
        ("Future directions", &insight.future_directions),
    ];
    for (title, items) in sections {
        if let Some(items) = items.as_ref().filter(|items| !items.is_empty()) {
            write_list(&mut out, title, items);
        }
    }

    out
}

pub fn render_passages(passages: &[Passage]) -> String {
    let mut out = format!("Sources ({})\n", passages.len());

    for (i, passage) in passages.iter().enumerate() {
        let title = passage.title().unwrap_or("(untitled)");
        out.push_str(&format!("  [{}] {} (score {:.3})\n", i + 1, title, passage.score));
        if let Some(url) = passage.url() {
            out.push_str(&format!("      {}\n", url));
        }
    }

    out
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
        NotificationKind::Info => "info",
    };

    format!("[{}] {}: {}", tag, notification.title, notification.message)
}

/// Graph summary with the data-quality disclosure
pub fn render_graph(graph: &SanitizedGraph) -> String {
    let mut out = format!("Knowledge graph: {}\n", graph.summary());

    if graph.dropped_edge_count > 0 {
        out.push_str("Some edges were hidden because they reference nodes missing from the graph.\n");
    }

    for node in &graph.nodes {
        out.push_str(&format!("  ({}) {} [{}]\n", node.id, node.label, node.kind));
    }
    for edge in &graph.edges {
        out.push_str(&format!("  {} -[{}]-> {}\n", edge.source, edge.label, edge.target));
    }

    out
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    out.push_str(&format!("  {} ({})\n", title, items.len()));
    if items.is_empty() {
        out.push_str("    (none)\n");
    }
    for item in items {
        out.push_str(&format!("    - {}\n", item));
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Strings without quotes, everything else as JSON
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
