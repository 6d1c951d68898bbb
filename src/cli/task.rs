use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::config;
use crate::db::{connection, task_repo};
use crate::engine::{llm::AnthropicClient, orchestrator};
use crate::error::TaskpilotError;
use crate::models::{Priority, ReminderState, TaskDraft};
use crate::output;

pub async fn run(cmd: TaskCommands, json_output: bool) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            title,
            description,
            due,
            category,
            priority,
            no_ai,
        } => {
            run_add(
                &title,
                &description,
                due.as_deref(),
                category,
                priority.as_deref(),
                no_ai,
                json_output,
            )
            .await
        }
        TaskCommands::List { all } => run_list(all, json_output),
        TaskCommands::Show { id } => run_show(&id, json_output),
        TaskCommands::Edit {
            id,
            title,
            description,
            due,
            clear_due,
            category,
            priority,
        } => run_edit(
            &id,
            title,
            description,
            due.as_deref(),
            clear_due,
            category,
            priority.as_deref(),
            json_output,
        ),
        TaskCommands::Done { id } => run_set_completed(&id, true, json_output),
        TaskCommands::Reopen { id } => run_set_completed(&id, false, json_output),
        TaskCommands::Delete { id } => run_delete(&id, json_output),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::error(&e)).unwrap()
                );
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

async fn run_add(
    title: &str,
    description: &str,
    due: Option<&str>,
    category: Option<String>,
    priority: Option<&str>,
    no_ai: bool,
    json_output: bool,
) -> Result<i32, TaskpilotError> {
    let conn = connection::open_db()?;
    let config = config::load()?;
    let lead = config.lead_times();
    let now = Utc::now();

    let draft = TaskDraft {
        title: title.to_string(),
        description: description.to_string(),
        due_at: due.map(|d| parse_due(d, now)).transpose()?,
        category,
        priority: priority.map(parse_priority).transpose()?,
    };

    let task = if no_ai {
        orchestrator::prioritize_offline(draft, now, &lead)?
    } else {
        match AnthropicClient::from_config(&config) {
            Ok(client) => orchestrator::prioritize(&client, draft, now, &lead).await?,
            // A client that cannot even be constructed is an upstream
            // failure like any other.
            Err(_) => orchestrator::prioritize_offline(draft, now, &lead)?,
        }
    };

    task_repo::insert_task(&conn, &task)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_detail(&task)
            })))
            .unwrap()
        );
    } else {
        println!(
            "Added task: {} ({}) [{}/{}]",
            task.title,
            task.id,
            task.priority.as_str(),
            task.category
        );
        if let Some(ref analysis) = task.analysis {
            println!("  {analysis}");
        }
    }
    Ok(0)
}

fn run_list(all: bool, json_output: bool) -> Result<i32, TaskpilotError> {
    let conn = connection::open_db()?;
    let tasks = task_repo::list_tasks(&conn, all)?;

    if json_output {
        let tasks_json: Vec<_> = tasks.iter().map(output::json::task_summary).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "tasks": tasks_json })))
                .unwrap()
        );
    } else {
        output::text::print_task_list(&tasks);
    }
    Ok(0)
}

fn run_show(id: &str, json_output: bool) -> Result<i32, TaskpilotError> {
    let conn = connection::open_db()?;
    let task = task_repo::resolve_task(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_detail(&task)
            })))
            .unwrap()
        );
    } else {
        output::text::print_task(&task);
    }
    Ok(0)
}

#[allow(clippy::too_many_arguments)]
fn run_edit(
    id: &str,
    title: Option<String>,
    description: Option<String>,
    due: Option<&str>,
    clear_due: bool,
    category: Option<String>,
    priority: Option<&str>,
    json_output: bool,
) -> Result<i32, TaskpilotError> {
    let conn = connection::open_db()?;
    let mut task = task_repo::resolve_task(&conn, id)?;

    if let Some(title) = title {
        if title.trim().is_empty() {
            return Err(TaskpilotError::validation("Task title must not be empty"));
        }
        task.title = title;
    }
    if let Some(description) = description {
        task.description = description;
    }
    if let Some(category) = category {
        task.category = category;
    }
    if let Some(priority) = priority {
        let priority = parse_priority(priority)?;
        task.priority = priority;
        task.reminder_lead_minutes = config::load()?.lead_times().for_priority(priority);
    }
    if clear_due {
        task.due_at = None;
        task.reminder = ReminderState::Inapplicable;
    } else if let Some(due) = due {
        task.due_at = Some(parse_due(due, Utc::now())?);
        // A moved due date re-arms the one-shot reminder.
        task.reminder = ReminderState::Pending;
    }

    task_repo::update_task(&conn, &task)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_detail(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Updated task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_set_completed(id: &str, completed: bool, json_output: bool) -> Result<i32, TaskpilotError> {
    let conn = connection::open_db()?;
    let task = task_repo::resolve_task(&conn, id)?;
    task_repo::set_completed(&conn, &task.id, completed)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": { "id": task.id, "title": task.title, "completed": completed }
            })))
            .unwrap()
        );
    } else {
        let verb = if completed { "Completed" } else { "Reopened" };
        println!("{verb} task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_delete(id: &str, json_output: bool) -> Result<i32, TaskpilotError> {
    let conn = connection::open_db()?;
    let task = task_repo::resolve_task(&conn, id)?;
    task_repo::delete_task(&conn, &task.id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "deleted": { "id": task.id, "title": task.title }
            })))
            .unwrap()
        );
    } else {
        println!("Deleted task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn parse_priority(s: &str) -> Result<Priority, TaskpilotError> {
    Priority::from_str(s).ok_or_else(|| {
        TaskpilotError::validation(format!("Invalid priority '{s}' (expected low|medium|high)"))
    })
}

/// Accepts RFC 3339 timestamps or relative offsets like `+30m`, `+2h`, `+3d`.
fn parse_due(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, TaskpilotError> {
    if let Some(rest) = s.strip_prefix('+') {
        let (amount, unit) = rest.split_at(rest.len().saturating_sub(1));
        let amount: i64 = amount.parse().map_err(|_| invalid_due(s))?;
        let offset = match unit {
            "m" => Duration::minutes(amount),
            "h" => Duration::hours(amount),
            "d" => Duration::days(amount),
            _ => return Err(invalid_due(s)),
        };
        return Ok(now + offset);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| invalid_due(s))
}

fn invalid_due(s: &str) -> TaskpilotError {
    TaskpilotError::validation(format!(
        "Invalid due date '{s}' (expected RFC 3339 or +<n>m/h/d)"
    ))
}
