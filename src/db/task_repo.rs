use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::TaskpilotError;
use crate::models::{Priority, ReminderState, Task};

const TASK_COLUMNS: &str = "id, title, description, due_at, category, priority,
                reminder_lead_minutes, analysis, completed, reminder, created_at";

pub fn insert_task(conn: &Connection, task: &Task) -> Result<(), TaskpilotError> {
    conn.execute(
        "INSERT INTO tasks (id, title, description, due_at, category, priority,
                            reminder_lead_minutes, analysis, completed, reminder, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            task.id,
            task.title,
            task.description,
            task.due_at,
            task.category,
            task.priority.as_str(),
            task.reminder_lead_minutes,
            task.analysis,
            task.completed,
            task.reminder.as_str(),
            task.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_task_by_id(conn: &Connection, id: &str) -> Result<Task, TaskpilotError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskpilotError::task_not_found(id),
        _ => TaskpilotError::from(e),
    })
}

/// Resolve a task by exact ID or unique ID prefix.
pub fn resolve_task(conn: &Connection, reference: &str) -> Result<Task, TaskpilotError> {
    if let Ok(task) = get_task_by_id(conn, reference) {
        return Ok(task);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id LIKE ?1 ESCAPE '\\'"
    ))?;
    // User input: LIKE wildcards in the reference must match literally.
    let escaped = reference
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let prefix = format!("{escaped}%");
    let tasks: Vec<Task> = stmt
        .query_map(params![prefix], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;

    match tasks.len() {
        0 => Err(TaskpilotError::task_not_found(reference)),
        1 => Ok(tasks.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                tasks.iter().map(|t| format!("{} ({})", t.title, t.id)).collect();
            Err(TaskpilotError::ambiguous_ref(reference, &candidates))
        }
    }
}

/// Tasks in creation order (ULIDs sort chronologically).
pub fn list_tasks(conn: &Connection, include_completed: bool) -> Result<Vec<Task>, TaskpilotError> {
    let filter = if include_completed {
        ""
    } else {
        "WHERE completed = 0"
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks {filter} ORDER BY id ASC"
    ))?;
    let tasks = stmt
        .query_map([], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Full-row update for an edited task.
pub fn update_task(conn: &Connection, task: &Task) -> Result<(), TaskpilotError> {
    let changed = conn.execute(
        "UPDATE tasks SET title = ?2, description = ?3, due_at = ?4, category = ?5,
                          priority = ?6, reminder_lead_minutes = ?7, analysis = ?8,
                          completed = ?9, reminder = ?10
         WHERE id = ?1",
        params![
            task.id,
            task.title,
            task.description,
            task.due_at,
            task.category,
            task.priority.as_str(),
            task.reminder_lead_minutes,
            task.analysis,
            task.completed,
            task.reminder.as_str(),
        ],
    )?;
    if changed == 0 {
        return Err(TaskpilotError::task_not_found(&task.id));
    }
    Ok(())
}

pub fn set_completed(conn: &Connection, id: &str, completed: bool) -> Result<(), TaskpilotError> {
    let changed = conn.execute(
        "UPDATE tasks SET completed = ?2 WHERE id = ?1",
        params![id, completed],
    )?;
    if changed == 0 {
        return Err(TaskpilotError::task_not_found(id));
    }
    Ok(())
}

pub fn delete_task(conn: &Connection, id: &str) -> Result<(), TaskpilotError> {
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(TaskpilotError::task_not_found(id));
    }
    Ok(())
}

/// Non-completed tasks still waiting on their reminder window.
pub fn pending_reminders(conn: &Connection) -> Result<Vec<Task>, TaskpilotError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         WHERE completed = 0 AND reminder = 'pending' AND due_at IS NOT NULL
         ORDER BY due_at ASC"
    ))?;
    let tasks = stmt
        .query_map([], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn set_reminder_state(
    conn: &Connection,
    id: &str,
    state: ReminderState,
) -> Result<(), TaskpilotError> {
    let changed = conn.execute(
        "UPDATE tasks SET reminder = ?2 WHERE id = ?1",
        params![id, state.as_str()],
    )?;
    if changed == 0 {
        return Err(TaskpilotError::task_not_found(id));
    }
    Ok(())
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let priority_raw: String = row.get(5)?;
    let priority = Priority::from_str(&priority_raw)
        .ok_or_else(|| bad_column(5, format!("invalid priority '{priority_raw}'")))?;
    let reminder_raw: String = row.get(9)?;
    let reminder = ReminderState::from_str(&reminder_raw)
        .ok_or_else(|| bad_column(9, format!("invalid reminder state '{reminder_raw}'")))?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_at: row.get::<_, Option<DateTime<Utc>>>(3)?,
        category: row.get(4)?,
        priority,
        reminder_lead_minutes: row.get(6)?,
        analysis: row.get(7)?,
        completed: row.get(8)?,
        reminder,
        created_at: row.get(10)?,
    })
}

fn bad_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, message.into())
}
