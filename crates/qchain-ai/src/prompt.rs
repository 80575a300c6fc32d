//! Fixed prompts.

use qchain_core::AnalysisRequest;
use serde_json::{Value, json};

/// First turn of every chat, sent as the user.
pub const CHAT_PREAMBLE: &str =
    "You are a helpful AI assistant for a quantum computing platform. Your name is QuantumAI.";

/// Canned model reply to [`CHAT_PREAMBLE`].
pub const CHAT_GREETING: &str =
    "Hello! How can I help you with your quantum computing questions today?";

/// Shown to the user when a chat call fails.
pub const CHAT_FALLBACK: &str = "Sorry, I'm having trouble connecting. Please try again later.";

/// Analysis prompt for one submission.
pub fn analysis_prompt(request: &AnalysisRequest) -> String {
    format!(
        "You are a quantum computing expert. A user has submitted the following {kind}.\n\
         \n\
         Analyze the user's input below and provide a concise analysis based on the required output format.\n\
         \n\
         - If the submission is QASM code, analyze its structure, purpose, and complexity.\n\
         - If the submission is a prompt, interpret the user's request and treat it as a conceptual quantum algorithm.\n\
         - Generate a short, descriptive title for the job.\n\
         - Briefly assess the computational complexity.\n\
         - Provide a one-sentence summary of what the job does.\n\
         - Suggest a simple, one-sentence optimization if applicable.\n\
         \n\
         User Input:\n\
         ```\n\
         {input}\n\
         ```\n",
        kind = request.submission_type,
        input = request.user_input,
    )
}

/// JSON schema the model is asked to answer with.
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A short, descriptive title for the job (e.g., \"Bell State Generation\")."
            },
            "complexity": {
                "type": "STRING",
                "description": "A brief analysis of the code complexity (e.g., \"Low\", \"Medium\", \"High\")."
            },
            "analysis": {
                "type": "STRING",
                "description": "A one-sentence summary explaining what the code or prompt does."
            },
            "optimizations": {
                "type": "STRING",
                "description": "A one-sentence suggestion for a potential optimization, or \"None\" if not applicable."
            }
        },
        "required": ["title", "complexity", "analysis", "optimizations"]
    })
}

#[cfg(test)]
mod tests {
    use qchain_core::SubmissionType;

    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_input() {
        let req = AnalysisRequest::new("OPENQASM 2.0;\nh q[0];", SubmissionType::Qasm);
        let prompt = analysis_prompt(&req);
        assert!(prompt.contains("submitted the following qasm."));
        assert!(prompt.contains("```\nOPENQASM 2.0;\nh q[0];\n```"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = analysis_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 4);
    }
}
