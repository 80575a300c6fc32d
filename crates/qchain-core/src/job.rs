//! Job records and submissions.
//!
//! A [`JobRecord`] is what the ledger returns for one logged submission. Records
//! are append-only and immutable once mined; the only field the application
//! ever sets on them is the in-memory [`JobRecord::analysis`].
//!
//! Jobs are written by a service account on behalf of the user's wallet. The
//! wallet travels in the payload's `submitter` field and becomes the record's
//! submitter when the record was sent by that service account.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::analysis::AnalysisResult;
use crate::error::{CoreError, CoreResult};

/// Minimum number of characters accepted for a job description.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Title used on-chain when no analysis is available.
pub const UNTITLED_JOB: &str = "Untitled Job";

/// How the user input of a submission is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    /// OpenQASM source code.
    Qasm,
    /// Free-text description of a quantum algorithm.
    #[default]
    Prompt,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::Qasm => "qasm",
            SubmissionType::Prompt => "prompt",
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "qasm" => Ok(SubmissionType::Qasm),
            "prompt" => Ok(SubmissionType::Prompt),
            other => Err(CoreError::UnknownSubmissionType(other.to_string())),
        }
    }
}

/// Free-text payload stored alongside a job on-chain.
///
/// Older contract revisions store a plain description, newer ones a JSON
/// metadata blob. The variant is decided once, by a parse attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum JobPayload {
    /// Description, QASM source or anything that is not a JSON object.
    RawText(String),
    /// A JSON object.
    Structured(serde_json::Map<String, serde_json::Value>),
}

impl JobPayload {
    /// Classify a raw on-chain string. Only JSON objects become `Structured`.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => JobPayload::Structured(map),
            _ => JobPayload::RawText(raw.to_string()),
        }
    }

    /// The payload as it would appear on-chain.
    pub fn to_raw(&self) -> String {
        match self {
            JobPayload::RawText(text) => text.clone(),
            JobPayload::Structured(map) => serde_json::Value::Object(map.clone()).to_string(),
        }
    }

    /// One-line human summary.
    ///
    /// Structured payloads are searched for a `title`, `summary` or
    /// `description` string field before falling back to compact JSON.
    pub fn summary(&self) -> String {
        match self {
            JobPayload::RawText(text) => text.clone(),
            JobPayload::Structured(map) => ["title", "summary", "description"]
                .iter()
                .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
                .map_or_else(|| self.to_raw(), str::to_string),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, JobPayload::Structured(_))
    }

    /// Wallet named in a structured payload's `submitter` field.
    pub fn submitter(&self) -> Option<Address> {
        match self {
            JobPayload::Structured(map) => map
                .get("submitter")
                .and_then(|v| v.as_str())
                .and_then(|s| Address::parse(s).ok()),
            JobPayload::RawText(_) => None,
        }
    }
}

/// One logged submission as read back from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Wallet the job was logged for. The sending account unless the job was
    /// relayed, see [`JobRecord::relayed_by`].
    pub submitter: Address,
    /// Provider/category label.
    pub job_type: String,
    /// Description or metadata.
    pub payload: JobPayload,
    /// Block-reported submission time.
    pub submitted_at: DateTime<Utc>,
    /// Transaction hash. Empty when the ledger view does not expose it.
    pub tx_hash: String,
    /// Analysis attached in memory after a submission. Never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

impl JobRecord {
    pub fn new(
        submitter: Address,
        job_type: impl Into<String>,
        payload: JobPayload,
        submitted_at: DateTime<Utc>,
        tx_hash: impl Into<String>,
    ) -> Self {
        Self {
            submitter,
            job_type: job_type.into(),
            payload,
            submitted_at,
            tx_hash: tx_hash.into(),
            analysis: None,
        }
    }

    /// Attribute a record sent by `relayer` to the wallet named in its payload.
    ///
    /// Records from any other sender keep the sender as submitter, so a
    /// payload cannot claim someone else's wallet.
    pub fn relayed_by(mut self, relayer: &Address) -> Self {
        if self.submitter == *relayer {
            if let Some(wallet) = self.payload.submitter() {
                self.submitter = wallet;
            }
        }
        self
    }

    /// Short label derived from the transaction hash, e.g. `Job #0x1a2b...9f8e`.
    pub fn display_id(&self) -> String {
        let hash = self.tx_hash.as_str();
        if hash.len() <= 10 {
            return format!("Job #{hash}");
        }
        match (hash.get(..6), hash.get(hash.len() - 4..)) {
            (Some(head), Some(tail)) => format!("Job #{head}...{tail}"),
            _ => format!("Job #{hash}"),
        }
    }

    /// Title shown in the history list: analysis title when present.
    pub fn display_title(&self) -> String {
        self.analysis
            .as_ref()
            .map_or_else(|| self.payload.summary(), |a| a.title.clone())
    }
}

/// A job as entered in the submission form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubmission {
    /// Selected provider.
    pub job_type: String,
    /// Prompt text or QASM source.
    pub description: String,
    /// Interpretation of `description`.
    #[serde(default)]
    pub submission_type: SubmissionType,
}

impl JobSubmission {
    pub fn new(
        job_type: impl Into<String>,
        description: impl Into<String>,
        submission_type: SubmissionType,
    ) -> Self {
        Self {
            job_type: job_type.into(),
            description: description.into(),
            submission_type,
        }
    }

    /// Form validation: non-empty job type, description of at least
    /// [`MIN_DESCRIPTION_LEN`] characters.
    pub fn validate(&self) -> CoreResult<()> {
        if self.job_type.trim().is_empty() {
            return Err(CoreError::Validation("Job type cannot be empty.".to_string()));
        }
        if self.description.chars().count() < MIN_DESCRIPTION_LEN {
            return Err(CoreError::Validation(format!(
                "Description must be at least {MIN_DESCRIPTION_LEN} characters."
            )));
        }
        Ok(())
    }

    /// Description string written to the ledger.
    pub fn on_chain_description(&self) -> String {
        format!(
            "[{} | {}] {}",
            self.job_type, self.submission_type, self.description
        )
    }

    /// Payload written to the ledger: the description plus the wallet the job
    /// is logged for.
    pub fn on_chain_payload(&self, submitter: &Address) -> String {
        serde_json::json!({
            "description": self.on_chain_description(),
            "submitter": submitter.to_string(),
        })
        .to_string()
    }

    /// Title written to the ledger.
    pub fn on_chain_title(&self, analysis: Option<&AnalysisResult>) -> String {
        analysis.map_or_else(|| UNTITLED_JOB.to_string(), |a| a.title.clone())
    }
}
