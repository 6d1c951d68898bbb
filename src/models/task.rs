use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Reminder lifecycle. Owned by the scheduler: other components read it but
/// never write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderState {
    /// Waiting for the due-date window. Initial state for tasks with a due date.
    Pending,
    /// Notification emitted. Terminal.
    Fired,
    /// Task has no due date; reminders never apply. Terminal.
    Inapplicable,
}

impl ReminderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fired => "fired",
            Self::Inapplicable => "inapplicable",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "fired" => Some(Self::Fired),
            "inapplicable" => Some(Self::Inapplicable),
            _ => None,
        }
    }

    pub fn for_due_date(due_at: Option<DateTime<Utc>>) -> Self {
        if due_at.is_some() {
            Self::Pending
        } else {
            Self::Inapplicable
        }
    }
}

/// User-authored input before prioritization.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
}

impl TaskDraft {
    /// Caller-supplied category with empty/whitespace strings treated as absent.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_at: Option<DateTime<Utc>>,
    pub category: String,
    pub priority: Priority,
    /// Minutes before the due date at which a reminder should fire.
    pub reminder_lead_minutes: i64,
    /// Free-text explanation from whichever judgment source ran. Never parsed.
    pub analysis: Option<String>,
    pub completed: bool,
    pub reminder: ReminderState,
    pub created_at: DateTime<Utc>,
}
