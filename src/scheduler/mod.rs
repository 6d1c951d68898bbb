//! Reminder scheduling. Each dated task walks a tiny state machine
//! (`Pending` → `Fired`); a polling loop evaluates every pending task on a
//! fixed cadence and emits at most one event per task.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::db::task_repo;
use crate::error::TaskpilotError;
use crate::models::{ReminderState, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    /// Inside the lead-time window, due date still ahead.
    Due,
    /// Due date already passed without a reminder having fired.
    Overdue,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Due => "due",
            Self::Overdue => "overdue",
        }
    }
}

/// What the scheduler hands to the notification boundary. Rendering is the
/// consumer's concern.
#[derive(Debug, Clone)]
pub struct ReminderEvent {
    pub kind: ReminderKind,
    pub task: Task,
}

/// One synchronous pass over the pending tasks. Each firing task is marked
/// `Fired` in the same pass, so a later scan (or a restart) cannot fire it
/// again.
pub fn scan(conn: &Connection, now: DateTime<Utc>) -> Result<Vec<ReminderEvent>, TaskpilotError> {
    let mut events = Vec::new();
    for mut task in task_repo::pending_reminders(conn)? {
        let Some(due_at) = task.due_at else { continue };
        // Seconds, not truncated minutes: a task due in under a minute is
        // still ahead of its due date and must not read as overdue.
        let seconds_until_due = (due_at - now).num_seconds();

        let kind = if seconds_until_due <= 0 {
            ReminderKind::Overdue
        } else if seconds_until_due <= task.reminder_lead_minutes * 60 {
            ReminderKind::Due
        } else {
            continue;
        };

        task_repo::set_reminder_state(conn, &task.id, ReminderState::Fired)?;
        task.reminder = ReminderState::Fired;
        events.push(ReminderEvent { kind, task });
    }
    Ok(events)
}

/// Polling loop. Ticks run start to finish before the next tick; events go
/// out over the channel. Returns when the shutdown signal flips or the
/// receiver side hangs up.
pub async fn run(
    conn: &Connection,
    events: mpsc::Sender<ReminderEvent>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), TaskpilotError> {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for event in scan(conn, Utc::now())? {
                    if events.send(event).await.is_err() {
                        return Ok(());
                    }
                }
            }
            _ = shutdown.changed() => return Ok(()),
        }
    }
}
