//! Task and trajectory shapes for memory-aware test-time scaling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task handed to the executor capability.
///
/// Opaque to the core except for the fields used to form the retrieval
/// query and the shallow-merge refinement contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Free-form task description; preferred query text when present
    pub description: Option<String>,
    /// Template name; query text fallback
    pub template_name: Option<String>,
    /// Arbitrary task parameters, passed through to the executor
    #[serde(default)]
    pub parameters: serde_json::Map<String, Value>,
}

impl TaskSpec {
    /// Text used to embed the retrieval query: description (or template
    /// name) plus a canonical serialization of the parameters.
    ///
    /// Canonical means sorted keys, so equal parameter sets embed equally
    /// regardless of insertion order.
    #[must_use]
    pub fn query_text(&self) -> String {
        let label = self
            .description
            .as_deref()
            .or(self.template_name.as_deref())
            .unwrap_or_default();
        if self.parameters.is_empty() {
            return label.to_owned();
        }
        let canonical: BTreeMap<&String, &Value> = self.parameters.iter().collect();
        let params = serde_json::to_string(&canonical).unwrap_or_default();
        format!("{label}\n{params}")
    }

    /// Shallow field-override merge: fields present on the refinement
    /// replace the same-named fields of this task.
    #[must_use]
    pub fn merge(&self, refinement: &Self) -> Self {
        Self {
            description: refinement
                .description
                .clone()
                .or_else(|| self.description.clone()),
            template_name: refinement
                .template_name
                .clone()
                .or_else(|| self.template_name.clone()),
            parameters: if refinement.parameters.is_empty() {
                self.parameters.clone()
            } else {
                refinement.parameters.clone()
            },
        }
    }
}

/// Result of one executor invocation.
///
/// The scorer reads exactly these fields; executors may carry anything
/// else in `output_data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Whether the trajectory succeeded
    pub success: bool,
    /// Steps taken, when the executor reports them
    pub steps: Option<u32>,
    /// Wall-clock execution time in milliseconds
    pub execution_time_ms: Option<u64>,
    /// Structured output payload
    pub output_data: Option<serde_json::Map<String, Value>>,
    /// Rendered report, when the executor produces one
    pub html_report: Option<String>,
}

/// Reflector verdict on a finished trajectory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reflection {
    /// Whether another refinement iteration is worthwhile
    pub should_refine: bool,
    /// Shallow patch applied to the task for the next iteration
    pub refined_task: Option<TaskSpec>,
}

/// Winning trajectory of a scaling run.
///
/// When every trajectory fails, `report` carries the first variant's raw
/// result — possibly `None` — and `winner_index` stays `None`. That pair
/// is the well-defined "all failed" sentinel callers can test for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalingOutcome {
    /// Raw executor result of the selected trajectory
    pub report: Option<ExecutionReport>,
    /// Score of the selected trajectory
    pub score: f64,
    /// Index of the winning parallel variant, if one succeeded
    pub winner_index: Option<usize>,
    /// Iterations executed by the sequential strategy
    pub iterations: u32,
    /// Ids of the memories handed to the winning trajectory
    pub memories_used: Vec<String>,
}
