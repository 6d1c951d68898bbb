use rusqlite::Connection;

use crate::error::TaskpilotError;

pub fn run_migrations(conn: &Connection) -> Result<(), TaskpilotError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            due_at TEXT,
            category TEXT NOT NULL DEFAULT 'other',
            priority TEXT NOT NULL DEFAULT 'medium'
                CHECK (priority IN ('low', 'medium', 'high')),
            reminder_lead_minutes INTEGER NOT NULL DEFAULT 180,
            analysis TEXT,
            completed INTEGER NOT NULL DEFAULT 0,
            reminder TEXT NOT NULL DEFAULT 'pending'
                CHECK (reminder IN ('pending', 'fired', 'inapplicable')),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_reminder_pending
            ON tasks(completed, due_at) WHERE reminder = 'pending';
        ",
    )?;
    Ok(())
}
