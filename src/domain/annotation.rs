use super::element::ElementContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an annotation
pub type AnnotationId = String;

/// Category of feedback an annotation carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    /// Something is broken
    #[default]
    Bug,
    /// Works, but could be better
    Enhancement,
    /// Needs clarification
    Question,
    /// Minor polish
    Nitpick,
}

impl AnnotationType {
    /// Human-facing label used in Markdown and AI exports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Enhancement => "Enhancement",
            Self::Question => "Question",
            Self::Nitpick => "Nitpick",
        }
    }

    /// GitHub issue label. Nitpicks map onto the stock `documentation` label.
    pub fn github_label(&self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Enhancement => "enhancement",
            Self::Question => "question",
            Self::Nitpick => "documentation",
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bug => write!(f, "bug"),
            Self::Enhancement => write!(f, "enhancement"),
            Self::Question => write!(f, "question"),
            Self::Nitpick => write!(f, "nitpick"),
        }
    }
}

impl FromStr for AnnotationType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enhancement" => Ok(Self::Enhancement),
            "question" => Ok(Self::Question),
            "nitpick" => Ok(Self::Nitpick),
            _ => Ok(Self::Bug),
        }
    }
}

/// Urgency of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Human-facing label used in Markdown and AI exports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// GitHub issue label, namespaced under `priority:`.
    pub fn github_label(&self) -> &'static str {
        match self {
            Self::Critical => "priority: critical",
            Self::High => "priority: high",
            Self::Medium => "priority: medium",
            Self::Low => "priority: low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            _ => Ok(Self::Medium),
        }
    }
}

/// A single QA note bound to one element snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique identifier, assigned by the controller on creation
    pub id: AnnotationId,
    /// Category of feedback
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    /// Urgency
    pub priority: Priority,
    /// Short summary; required, non-empty after trimming
    pub title: String,
    /// Longer free-form description; may be empty
    #[serde(default)]
    pub description: String,
    /// Snapshot of the targeted element, owned by value
    pub element: ElementContext,
    /// Reserved for a future capture pipeline; unused by current flows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    /// Creation time, milliseconds since the epoch
    pub created_at: i64,
    /// Last mutation time; never earlier than `created_at`
    pub updated_at: i64,
    /// URL of the page the annotation was created on
    pub page_url: String,
    /// Whether the underlying issue has been addressed
    #[serde(default)]
    pub resolved: bool,
}

impl Annotation {
    /// Shallow-merge the provided fields. Timestamps are the caller's job.
    pub fn apply(&mut self, patch: &AnnotationPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(resolved) = patch.resolved {
            self.resolved = resolved;
        }
        if let Some(screenshot) = &patch.screenshot {
            self.screenshot = Some(screenshot.clone());
        }
    }
}

/// Caller-supplied portion of a new annotation; the controller stamps
/// the id and both timestamps.
#[derive(Debug, Clone)]
pub struct AnnotationDraft {
    pub kind: AnnotationType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub element: ElementContext,
    pub screenshot: Option<String>,
    pub page_url: String,
    pub resolved: bool,
}

/// Partial update for an annotation; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AnnotationPatch {
    pub kind: Option<AnnotationType>,
    pub priority: Option<Priority>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub resolved: Option<bool>,
    pub screenshot: Option<String>,
}

/// Named bundle of annotations. Declared for forward compatibility;
/// no current flow creates or mutates sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaSession {
    /// Unique identifier for the session
    pub id: String,
    /// Display name
    pub name: String,
    /// Annotations captured under this session
    pub annotations: Vec<Annotation>,
    /// Creation time, milliseconds since the epoch
    pub created_at: i64,
    /// Last mutation time
    pub updated_at: i64,
    /// URL of the page the session was started on
    pub page_url: String,
}
