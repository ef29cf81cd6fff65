use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider-side classification of one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    Success,
    Duplicated,
    NotFound,
    Malformed,
    Http(u16),
}

impl ImportStatus {
    /// Reads the `status` member of a provider reply. Numbers and numeric
    /// strings are HTTP-style codes; anything unrecognised is treated as malformed.
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u16::try_from(n).ok())
                .map(Self::Http)
                .unwrap_or(Self::Malformed),
            Value::String(s) => Self::from_str_lossy(s),
            _ => Self::Malformed,
        }
    }

    fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "duplicated" => Self::Duplicated,
            "notfound" | "not_found" => Self::NotFound,
            "malformed" => Self::Malformed,
            other => other.parse::<u16>().map(Self::Http).unwrap_or(Self::Malformed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    /// Fixed message for a provider classification.
    pub fn for_status(status: ImportStatus, source: &str, id: &str) -> Self {
        match status {
            ImportStatus::Success => Self::new(
                Severity::Success,
                format!("The data was successfully imported from {source}."),
            ),
            ImportStatus::Duplicated => Self::new(
                Severity::Danger,
                format!("A record with {source} {id} already exists."),
            ),
            ImportStatus::NotFound => Self::new(
                Severity::Warning,
                format!("The {source} {id} was not found."),
            ),
            ImportStatus::Malformed => Self::new(
                Severity::Warning,
                format!("The {source} {id} is malformed."),
            ),
            ImportStatus::Http(300) => Self::new(
                Severity::Warning,
                format!("The {source} {id} is ambiguous: multiple records match."),
            ),
            ImportStatus::Http(code) => Self::new(
                Severity::Warning,
                format!("Importing from {source} failed with error {code}."),
            ),
        }
    }

    pub fn unreachable(source: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            Severity::Warning,
            format!("Could not reach {source}: {reason}."),
        )
    }

    pub fn no_usable_metadata(source: &str, id: &str) -> Self {
        Self::new(
            Severity::Info,
            format!("No usable metadata for {source} {id}."),
        )
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)
    }
}
