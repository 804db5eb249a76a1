//! Shared workflow state: the status wire type and the client-local progress model.

use serde::{Deserialize, Serialize};

use crate::workflow::messages::phrase_for;

/// Hard cap for percent reached without a confirmed completion.
pub const SYNTHETIC_CEILING: u8 = 90;

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// Generation status reported by the status endpoint.
///
/// Both `complete` and `completed` mean done on the way in; `Complete` is
/// always written as `complete`, the spelling pollers compare against.
/// Anything else is treated as still pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    Complete,
    Processing,
    Error,
    NotFound,
    Other(String),
}

impl GenerationStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "complete" | "completed" => GenerationStatus::Complete,
            "processing" => GenerationStatus::Processing,
            "error" => GenerationStatus::Error,
            "not_found" => GenerationStatus::NotFound,
            other => GenerationStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            GenerationStatus::Complete => "complete",
            GenerationStatus::Processing => "processing",
            GenerationStatus::Error => "error",
            GenerationStatus::NotFound => "not_found",
            GenerationStatus::Other(raw) => raw,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, GenerationStatus::Complete)
    }
}

impl Serialize for GenerationStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GenerationStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(GenerationStatus::parse(&raw))
    }
}

/// Body of a status endpoint response. Only `status` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: GenerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Progress model
// ────────────────────────────────────────────────────────────────────────────

/// Poller state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    Polling,
    ErrorRetrying,
    Complete,
    FailedExhausted,
}

impl PollPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, PollPhase::Complete | PollPhase::FailedExhausted)
    }
}

/// Visual treatment of the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStyle {
    /// Striped, animated "in progress" bar.
    Animated,
    Warning,
}

/// Client-local progress for one workflow. Never sent back to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub percent: u8,
    pub message: String,
    /// Pending responses seen so far. Errors never bump this.
    pub check_count: u32,
    pub error_count: u32,
    pub is_complete: bool,
    pub phase: PollPhase,
    pub style: ProgressStyle,
}

impl ProgressState {
    pub fn new() -> Self {
        Self {
            percent: 0,
            message: phrase_for(0).to_string(),
            check_count: 0,
            error_count: 0,
            is_complete: false,
            phase: PollPhase::Polling,
            style: ProgressStyle::Animated,
        }
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}
