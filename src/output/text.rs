use crate::models::Task;
use crate::scheduler::{ReminderEvent, ReminderKind};

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.title, t.id);
    if !t.description.is_empty() {
        println!("  Description: {}", t.description);
    }
    println!("  Category: {}", t.category);
    println!("  Priority: {}", t.priority.as_str());
    if let Some(due) = t.due_at {
        println!("  Due: {}", due.to_rfc3339());
        println!(
            "  Reminder: {} ({} min before due)",
            t.reminder.as_str(),
            t.reminder_lead_minutes
        );
    }
    if let Some(ref analysis) = t.analysis {
        println!("  Analysis: {analysis}");
    }
    println!("  Completed: {}", if t.completed { "yes" } else { "no" });
    println!("  Created: {}", t.created_at.to_rfc3339());
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let done = if t.completed { "x" } else { " " };
        let due = t
            .due_at
            .map(|d| format!(" due {}", d.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default();
        println!(
            "  [{}] {} ({}) [{}/{}]{}",
            done,
            t.title,
            &t.id[..std::cmp::min(8, t.id.len())],
            t.priority.as_str(),
            t.category,
            due
        );
    }
}

pub fn print_reminder(ev: &ReminderEvent) {
    let t = &ev.task;
    match ev.kind {
        ReminderKind::Due => {
            let minutes = t
                .due_at
                .map(|d| (d - chrono::Utc::now()).num_minutes())
                .unwrap_or(0);
            println!("Reminder: '{}' is due in {} min ({})", t.title, minutes, t.id);
        }
        ReminderKind::Overdue => {
            println!("Overdue: '{}' has passed its due date ({})", t.title, t.id);
        }
    }
}
