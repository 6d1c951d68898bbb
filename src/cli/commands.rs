use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "taskpilot",
    version,
    about = "AI-assisted personal task manager with reminders",
    after_help = "\
NOTE:
  Data lives in ./.taskpilot/ (override with TASKPILOT_HOME).
  Run `taskpilot init` before any other command.

PRIORITIZATION:
  `add` asks the configured model service for a priority, category, and
  reminder lead time. If the call fails (no TASKPILOT_API_KEY, network error,
  malformed reply) a deterministic rule-based analyzer supplies the same
  fields — adding a task never fails because the model did.
  Values you pass explicitly (--category, --priority) always win; the
  judgment only fills blanks.

REMINDERS:
  Tasks with a due date get a one-shot reminder, fired by `taskpilot watch`
  when the task enters its lead-time window (or is overdue). Completed tasks
  never fire."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize taskpilot in this directory
    Init,

    #[command(flatten)]
    Task(TaskCommands),

    /// Run the reminder loop, printing notifications until ctrl-c
    Watch {
        /// Polling interval in seconds (default from config, 10s)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task (prioritized by the model, or by rules when offline)
    Add {
        /// Task title
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Due date: RFC 3339 (2026-09-01T17:00:00Z) or relative (+30m, +2h, +3d)
        #[arg(long)]
        due: Option<String>,
        /// Category; omit to let the judgment suggest one
        #[arg(long)]
        category: Option<String>,
        /// Pin the priority (low|medium|high); omit to let the judgment decide
        #[arg(long)]
        priority: Option<String>,
        /// Skip the model call and use the rule-based analyzer directly
        #[arg(long)]
        no_ai: bool,
    },
    /// List tasks (pending by default)
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Show task details
    Show {
        /// Task ID or unique prefix
        id: String,
    },
    /// Edit task fields
    Edit {
        /// Task ID or unique prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// New due date (re-arms the reminder)
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date (reminders no longer apply)
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        #[arg(long)]
        category: Option<String>,
        /// New priority (low|medium|high); also resets the lead time default
        #[arg(long)]
        priority: Option<String>,
    },
    /// Mark a task completed
    Done {
        id: String,
    },
    /// Mark a completed task as pending again
    Reopen {
        id: String,
    },
    /// Delete a task
    Delete {
        id: String,
    },
}
