use crate::models::Priority;

/// Structured priority verdict, produced either by the model client or by the
/// rule-based analyzer. Both paths emit the identical shape so the
/// orchestrator merges them the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityJudgment {
    /// Free-text explanation. Descriptive only; nothing downstream parses it.
    pub analysis: Option<String>,
    pub priority: Priority,
    /// Minutes before the due date at which to remind.
    pub lead_minutes: i64,
    /// Populated only when the caller supplied no category.
    pub suggested_category: Option<String>,
}
