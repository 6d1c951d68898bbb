//! Two-tier prioritization: ask the model, fall back to the rule-based
//! analyzer on any upstream failure. Prioritization always succeeds for a
//! valid draft.

use chrono::{DateTime, Utc};

use crate::engine::heuristic::{self, LeadTimes};
use crate::engine::judgment::PriorityJudgment;
use crate::engine::llm::PriorityClient;
use crate::error::TaskpilotError;
use crate::models::{ReminderState, Task, TaskDraft};

/// Build a fully formed task from a draft. The model's verdict is adopted
/// when the call succeeds; otherwise the analyzer's is. Only validation
/// errors escape — upstream failures are absorbed here.
pub async fn prioritize(
    client: &dyn PriorityClient,
    draft: TaskDraft,
    now: DateTime<Utc>,
    lead: &LeadTimes,
) -> Result<Task, TaskpilotError> {
    validate(&draft)?;
    let judgment = match client.judge(&draft, now).await {
        Ok(judgment) => judgment,
        Err(_) => heuristic::analyze_with(&draft, now, lead),
    };
    Ok(assemble(draft, judgment, now, lead))
}

/// Prioritize without consulting the model at all.
pub fn prioritize_offline(
    draft: TaskDraft,
    now: DateTime<Utc>,
    lead: &LeadTimes,
) -> Result<Task, TaskpilotError> {
    validate(&draft)?;
    let judgment = heuristic::analyze_with(&draft, now, lead);
    Ok(assemble(draft, judgment, now, lead))
}

fn validate(draft: &TaskDraft) -> Result<(), TaskpilotError> {
    if draft.title.trim().is_empty() {
        return Err(TaskpilotError::validation("Task title must not be empty"));
    }
    Ok(())
}

/// Merge policy: caller input wins, the judgment fills only blanks. A caller
/// who pinned a priority also gets the configured lead time for that
/// priority, not the judgment's.
fn assemble(draft: TaskDraft, judgment: PriorityJudgment, now: DateTime<Utc>, lead: &LeadTimes) -> Task {
    let category = draft
        .category()
        .map(str::to_string)
        .or(judgment.suggested_category)
        .unwrap_or_else(|| "other".to_string());

    let (priority, reminder_lead_minutes) = match draft.priority {
        Some(pinned) => (pinned, lead.for_priority(pinned)),
        None => (judgment.priority, judgment.lead_minutes),
    };

    Task {
        id: ulid::Ulid::new().to_string(),
        title: draft.title,
        description: draft.description,
        due_at: draft.due_at,
        category,
        priority,
        reminder_lead_minutes,
        analysis: judgment.analysis,
        completed: false,
        reminder: ReminderState::for_due_date(draft.due_at),
        created_at: now,
    }
}
