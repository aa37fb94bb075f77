// src/models.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Task id → result string, as reported for one grading mode.
pub type TaskResults = BTreeMap<String, String>;

/// Snapshot returned by the challenge server's update endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsResponse {
    #[serde(default)]
    pub fatal_error: bool,

    #[serde(default)]
    pub cron_enabled: bool,

    #[serde(default)]
    pub manual_enabled: bool,

    #[serde(default)]
    pub cron_results: Option<TaskResults>,

    #[serde(default)]
    pub manual_results: Option<TaskResults>,

    #[serde(default)]
    pub grading_parts: BTreeMap<String, GradingPart>,

    #[serde(default)]
    pub tokens: Tokens,

    #[serde(default)]
    pub cron_submit_time: String,

    #[serde(default)]
    pub manual_submit_time: String,
}

/// Human readable description of a single gradable task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradingPart {
    #[serde(default)]
    pub text: String,
}

/// Tokens keyed by grading mode, then by task id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    #[serde(default)]
    pub cron: BTreeMap<String, String>,

    #[serde(default)]
    pub manual: BTreeMap<String, String>,
}

/// The two ways a challenge can be graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingMode {
    Manual,
    Cron,
}

impl std::fmt::Display for GradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradingMode::Manual => write!(f, "manual"),
            GradingMode::Cron => write!(f, "cron"),
        }
    }
}

/// Server timestamps start out as this placeholder until a run happens.
const UNSET_TIMESTAMP_PREFIX: &str = "01/01/1900";

impl ResultsResponse {
    pub fn enabled(&self, mode: GradingMode) -> bool {
        match mode {
            GradingMode::Manual => self.manual_enabled,
            GradingMode::Cron => self.cron_enabled,
        }
    }

    pub fn results(&self, mode: GradingMode) -> Option<&TaskResults> {
        match mode {
            GradingMode::Manual => self.manual_results.as_ref(),
            GradingMode::Cron => self.cron_results.as_ref(),
        }
    }

    /// Token for a task, or the empty string when the server sent none.
    pub fn token(&self, mode: GradingMode, task_id: &str) -> &str {
        let tokens = match mode {
            GradingMode::Manual => &self.tokens.manual,
            GradingMode::Cron => &self.tokens.cron,
        };
        tokens.get(task_id).map(String::as_str).unwrap_or("")
    }

    /// Task label, falling back to the id for parts the server did not describe.
    pub fn label<'a>(&'a self, task_id: &'a str) -> &'a str {
        self.grading_parts
            .get(task_id)
            .map(|part| part.text.as_str())
            .unwrap_or(task_id)
    }

    /// Last submission time for a mode, if one has actually been recorded.
    pub fn submit_time(&self, mode: GradingMode) -> Option<&str> {
        let time = match mode {
            GradingMode::Manual => self.manual_submit_time.trim(),
            GradingMode::Cron => self.cron_submit_time.trim(),
        };
        if time.is_empty() || time.starts_with(UNSET_TIMESTAMP_PREFIX) {
            None
        } else {
            Some(time)
        }
    }

    pub fn has_no_results(&self) -> bool {
        self.cron_results.is_none() && self.manual_results.is_none()
    }
}

/// Body the challenge server sends to callers it does not recognize.
#[derive(Debug, Deserialize)]
pub(crate) struct NoticeBody {
    #[serde(rename = "NOTICE")]
    pub notice: String,
}
