use serde_json::{json, Value};

use crate::error::TaskpilotError;
use crate::models::Task;
use crate::scheduler::ReminderEvent;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskpilotError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_summary(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "category": t.category,
        "priority": t.priority.as_str(),
        "due_at": t.due_at.map(|d| d.to_rfc3339()),
        "completed": t.completed
    })
}

pub fn task_detail(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "category": t.category,
        "priority": t.priority.as_str(),
        "due_at": t.due_at.map(|d| d.to_rfc3339()),
        "reminder_lead_minutes": t.reminder_lead_minutes,
        "reminder": t.reminder.as_str(),
        "analysis": t.analysis,
        "completed": t.completed,
        "created_at": t.created_at.to_rfc3339()
    })
}

pub fn reminder_event(ev: &ReminderEvent) -> Value {
    json!({
        "event": "reminder",
        "kind": ev.kind.as_str(),
        "task": task_summary(&ev.task)
    })
}
