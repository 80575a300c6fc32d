//! AI analysis request/response shapes.
//!
//! The text-generation collaborator is opaque to the application: it receives
//! the raw user input and returns four free-text fields used only for display.

use serde::{Deserialize, Serialize};

use crate::job::SubmissionType;

/// Input to the analysis flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// QASM source or a free-text prompt.
    #[serde(rename = "userInput")]
    pub user_input: String,
    /// How `user_input` should be interpreted.
    #[serde(rename = "submissionType")]
    pub submission_type: SubmissionType,
}

impl AnalysisRequest {
    pub fn new(user_input: impl Into<String>, submission_type: SubmissionType) -> Self {
        Self {
            user_input: user_input.into(),
            submission_type,
        }
    }
}

/// Output of the analysis flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Short descriptive title, e.g. "Bell State Generation".
    pub title: String,
    /// Complexity label, e.g. "Low".
    pub complexity: String,
    /// One-sentence summary of what the job does.
    #[serde(rename = "analysis")]
    pub analysis_summary: String,
    /// One-sentence optimization hint, or "None".
    #[serde(rename = "optimizations")]
    pub optimization_suggestion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let result = AnalysisResult {
            title: "Bell".into(),
            complexity: "Low".into(),
            analysis_summary: "Entangles two qubits.".into(),
            optimization_suggestion: "None".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["analysis"], "Entangles two qubits.");
        assert_eq!(json["optimizations"], "None");

        let req = AnalysisRequest::new("h q[0];", SubmissionType::Qasm);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userInput"], "h q[0];");
        assert_eq!(json["submissionType"], "qasm");
    }
}
