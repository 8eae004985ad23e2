//! Query API data models
//!
//! These types mirror the JSON the backend returns from `/api/query` and
//! `/api/query/retry`. Every field the backend may omit or send as `null`
//! has a defined default so a partially populated response still decodes.

use std::collections::BTreeMap;
use std::fmt;

use graph_sanitizer::GraphPayload;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decode `null` the same way as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Clamp a score into `[0, 1]`, mapping NaN to zero
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Server-classified category of a question
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    Summary,
    Comparison,
    Concepts,
    Gap,
    DeepAnalysis,
    /// Any value this client does not know, kept verbatim
    Other(String),
}

impl Default for Intent {
    fn default() -> Self {
        Intent::Other(String::new())
    }
}

impl Intent {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Intent::Summary => "summary",
            Intent::Comparison => "comparison",
            Intent::Concepts => "concepts",
            Intent::Gap => "gap",
            Intent::DeepAnalysis => "deep_analysis",
            Intent::Other(value) => value,
        }
    }

    /// The agents the backend runs for this intent
    pub fn default_agents(&self) -> Vec<String> {
        let names: &[&str] = match self {
            Intent::Summary => &["Intent", "Retriever", "Summarizer", "Evaluator"],
            Intent::Comparison => &["Intent", "Retriever", "Summarizer", "Insight", "Evaluator"],
            Intent::Concepts => &["Intent", "Retriever", "Concept & Graph", "Evaluator"],
            Intent::Gap | Intent::DeepAnalysis => &["Intent", "Retriever", "Insight", "Evaluator"],
            Intent::Other(_) => &["Intent", "Retriever", "Evaluator"],
        };

        names.iter().map(|name| format!("{} Agent", name)).collect()
    }
}

impl From<String> for Intent {
    fn from(value: String) -> Self {
        match value.as_str() {
            "summary" => Intent::Summary,
            "comparison" => Intent::Comparison,
            "concepts" => Intent::Concepts,
            "gap" => Intent::Gap,
            "deep_analysis" => Intent::DeepAnalysis,
            _ => Intent::Other(value),
        }
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retrieved source passage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Passage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,

    /// Free-form metadata; `url` and `title` are the keys the UI reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Passage {
    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get(key))
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Source URL, when the metadata carries one
    pub fn url(&self) -> Option<&str> {
        self.metadata_str("url")
    }

    /// Source title, when the metadata carries one
    pub fn title(&self) -> Option<&str> {
        self.metadata_str("title")
    }
}

/// Scores and diagnostics produced by the evaluator agent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Named metric scores. Nominally in `[0, 1]`; a `null` score is kept as absent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub scores: BTreeMap<String, Option<f64>>,

    #[serde(default)]
    pub global_score: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

impl EvaluationResult {
    /// A metric clamped for display, or `None` when the server sent no value
    pub fn display_score(&self, name: &str) -> Option<f64> {
        self.scores.get(name).copied().flatten().map(clamp01)
    }

    /// The global score clamped for display; absent counts as zero
    pub fn display_global_score(&self) -> f64 {
        clamp01(self.global_score.unwrap_or(0.0))
    }
}

/// One server-proposed configuration change
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdaptationAction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Tuning field name to new value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Map<String, Value>>,
}

/// Union of every action's patch. Later actions override earlier keys.
pub fn merged_patch(actions: &[AdaptationAction]) -> Map<String, Value> {
    let mut merged = Map::new();

    for patch in actions.iter().filter_map(|action| action.patch.as_ref()) {
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
    }

    merged
}

/// The knob set the backend exposes for re-running a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub top_k: u32,
    pub min_overlap: f64,
    pub temperature: f64,
    pub enable_llm_critique: bool,
    pub enable_graph_update: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            top_k: 6,
            min_overlap: 1.0,
            temperature: 0.2,
            enable_llm_critique: true,
            enable_graph_update: true,
        }
    }
}

impl Tuning {
    /// Preview of the tuning a retry would run with.
    ///
    /// Unknown keys and values of the wrong type are skipped.
    pub fn patched(&self, patch: &Map<String, Value>) -> Tuning {
        let mut tuning = self.clone();

        for (key, value) in patch {
            match key.as_str() {
                "top_k" => {
                    if let Some(v) = value.as_u64().and_then(|v| u32::try_from(v).ok()) {
                        tuning.top_k = v;
                    }
                }
                "min_overlap" => {
                    if let Some(v) = value.as_f64() {
                        tuning.min_overlap = v;
                    }
                }
                "temperature" => {
                    if let Some(v) = value.as_f64() {
                        tuning.temperature = v;
                    }
                }
                "enable_llm_critique" => {
                    if let Some(v) = value.as_bool() {
                        tuning.enable_llm_critique = v;
                    }
                }
                "enable_graph_update" => {
                    if let Some(v) = value.as_bool() {
                        tuning.enable_graph_update = v;
                    }
                }
                _ => {}
            }
        }

        tuning
    }
}

/// Analysis produced by the insight agent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default)]
    pub analysis: Option<String>,

    #[serde(default)]
    pub gaps: Option<Vec<String>>,

    #[serde(default)]
    pub contradictions: Option<Vec<String>>,

    #[serde(default)]
    pub future_directions: Option<Vec<String>>,
}

impl Insight {
    /// True when there is nothing to show
    pub fn is_empty(&self) -> bool {
        let blank = |items: &Option<Vec<String>>| items.as_ref().map_or(true, Vec::is_empty);

        self.analysis.as_deref().map_or(true, |a| a.trim().is_empty())
            && blank(&self.gaps)
            && blank(&self.contradictions)
            && blank(&self.future_directions)
    }
}

/// Response body of `/api/query` and `/api/query/retry`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub intent: Intent,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_tasks: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub passages: Vec<Passage>,

    #[serde(default)]
    pub evaluation: Option<EvaluationResult>,

    #[serde(default)]
    pub insight: Option<Insight>,

    #[serde(default)]
    pub can_retry: Option<bool>,

    #[serde(default)]
    pub retry_count: Option<u32>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub adaptation_actions: Vec<AdaptationAction>,

    #[serde(default)]
    pub tuning: Option<Tuning>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphPayload>,

    #[serde(default)]
    pub agents_used: Option<Vec<String>>,
}

impl QueryResponse {
    /// Agents that produced this answer, inferred from the intent when the
    /// server did not report them
    pub fn agents(&self) -> Vec<String> {
        match self.agents_used {
            Some(ref agents) if !agents.is_empty() => agents.clone(),
            _ => self.intent.default_agents(),
        }
    }

    /// Retries already performed for this question, as reported by the server
    pub fn retries_used(&self) -> u32 {
        self.retry_count.unwrap_or(0)
    }
}
