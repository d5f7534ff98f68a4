//! Report and triage types.
//!
//! Reports are owned by the server. The console only ever holds a cached
//! copy, so every type here mirrors the server's JSON shape.
//!
//! ```text
//! POST /reports/  ──►  CreatedReport (wire)  ──try_from──►  TriageResult (display)
//! GET  /reports/  ──►  Vec<Report>                          (cached collection)
//! ```

use crate::ReportId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Workflow status of a report.
///
/// Any status may be set from any other status; the server is the only
/// authority on which transitions are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Newly submitted, not yet picked up.
    Pending,
    /// An operator is working on it.
    InProgress,
    /// Closed as fixed.
    Resolved,
}

impl ReportStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Resolved];

    /// Returns the wire token (`pending`, `in_progress`, `resolved`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    /// Returns a human label (`Pending`, `In Progress`, `Resolved`).
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status token is not one of the three known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown report status '{0}' (expected pending, in_progress or resolved)")]
pub struct ParseStatusError(pub String);

impl FromStr for ReportStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Priority assigned by the triage service.
///
/// Serialized capitalized (`Low`, `Medium`, `High`). Deserialization is
/// case-insensitive because older rows carry the lowercase column default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Returns the capitalized label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a priority token is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority '{0}' (expected Low, Medium or High)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn default_category() -> String {
    "general".to_string()
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A community report as returned by `GET /reports/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    pub description: String,
    pub status: ReportStatus,
    pub priority: Priority,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ai_summary: String,
    #[serde(default)]
    pub suspicious_flag: bool,
    /// Photo evidence as a `data:` URI.
    #[serde(default, rename = "photo_url", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<u64>,
}

impl Report {
    /// Returns a copy with only the status replaced.
    #[must_use]
    pub fn with_status(&self, status: ReportStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Validation failures for a new report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("please enter a report title")]
    EmptyTitle,
    #[error("please enter a description")]
    EmptyDescription,
}

/// A report ready to be submitted.
///
/// Title and description are stored trimmed and are guaranteed non-empty.
/// The photo is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDraft {
    title: String,
    description: String,
    #[serde(rename = "photo_url")]
    photo: Option<String>,
}

impl ReportDraft {
    /// Builds a draft, rejecting blank title or description.
    ///
    /// # Example
    ///
    /// ```
    /// use fixit_types::{DraftError, ReportDraft};
    ///
    /// let draft = ReportDraft::new("  Broken light ", "Main St", None).unwrap();
    /// assert_eq!(draft.title(), "Broken light");
    ///
    /// assert_eq!(ReportDraft::new(" ", "x", None), Err(DraftError::EmptyTitle));
    /// ```
    pub fn new(
        title: impl AsRef<str>,
        description: impl AsRef<str>,
        photo: Option<String>,
    ) -> Result<Self, DraftError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        let description = description.as_ref().trim();
        if description.is_empty() {
            return Err(DraftError::EmptyDescription);
        }
        Ok(Self {
            title: title.to_string(),
            description: description.to_string(),
            photo: photo.filter(|p| !p.is_empty()),
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }
}

/// Raw creation response, before triage completeness is checked.
///
/// Every triage field is optional here so that a short response can be
/// detected instead of silently defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreatedReport {
    pub id: Option<ReportId>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub ai_summary: Option<String>,
    pub suspicious_flag: Option<bool>,
}

/// A creation response that lacked one of the triage fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("triage result is missing '{0}'")]
pub struct IncompleteTriage(pub &'static str);

/// Triage metadata delivered once, at creation time.
///
/// Displayed and discarded; it is never merged into a cached collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageResult {
    pub report_id: ReportId,
    pub category: String,
    pub priority: Priority,
    pub ai_summary: String,
    pub suspicious_flag: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<CreatedReport> for TriageResult {
    type Error = IncompleteTriage;

    fn try_from(raw: CreatedReport) -> Result<Self, Self::Error> {
        Ok(Self {
            report_id: raw.id.ok_or(IncompleteTriage("id"))?,
            category: non_blank(raw.category).ok_or(IncompleteTriage("category"))?,
            priority: raw.priority.ok_or(IncompleteTriage("priority"))?,
            ai_summary: non_blank(raw.ai_summary).ok_or(IncompleteTriage("ai_summary"))?,
            suspicious_flag: raw
                .suspicious_flag
                .ok_or(IncompleteTriage("suspicious_flag"))?,
        })
    }
}
