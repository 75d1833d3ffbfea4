use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend-reported progress of one deployment step. Purely observational;
/// the client never advances a status on its own. Unknown status strings fall
/// back to `NotCompleted` rather than failing the poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum StepStatus {
    #[default]
    NotCompleted,
    InProgress,
    Completed,
    Failed,
}

impl From<String> for StepStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "InProgress" => StepStatus::InProgress,
            "Completed" => StepStatus::Completed,
            "Failed" => StepStatus::Failed,
            _ => StepStatus::NotCompleted,
        }
    }
}

impl StepStatus {
    /// Maps the plain-text poll responses of the deploy endpoint.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "completing" => StepStatus::InProgress,
            "completed" => StepStatus::Completed,
            "failed" => StepStatus::Failed,
            _ => StepStatus::NotCompleted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arch {
    pub name: String,
    #[serde(default)]
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    #[serde(default)]
    pub status: StepStatus,
    #[serde(default)]
    pub step_number: u32,
}

/// Snapshot of overall wizard progress as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    #[serde(default)]
    pub archs: Vec<Arch>,
    #[serde(default)]
    pub sites: Vec<Site>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchEntityKind {
    Form,
    Group,
    Field,
}

/// Read-only search-result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntity {
    #[serde(default)]
    pub description: Option<String>,
    pub display_name: String,
    pub entity: SearchEntityKind,
    pub input_url: String,
    pub output_url: String,
}

/// Comment-out queue entry awaiting a batched commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentItem {
    pub url: String,
    pub file_id: String,
    pub is_comment: bool,
}

/// One edited leaf in the shape the commit endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSave {
    pub input_url: String,
    pub value: Value,
    pub file_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_labels_map_to_statuses() {
        assert_eq!(StepStatus::from_label("completing"), StepStatus::InProgress);
        assert_eq!(StepStatus::from_label("completed"), StepStatus::Completed);
        assert_eq!(StepStatus::from_label("failed"), StepStatus::Failed);
        assert_eq!(StepStatus::from_label("stop"), StepStatus::NotCompleted);
    }

    #[test]
    fn unknown_status_string_deserializes_to_not_completed() {
        let site: Site =
            serde_json::from_value(serde_json::json!({"name": "alpha", "status": "Exploded"}))
                .expect("site parsed");
        assert_eq!(site.status, StepStatus::NotCompleted);
    }
}
