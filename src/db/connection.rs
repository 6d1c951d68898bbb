use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::TaskpilotError;

use super::migrations;

/// Data directory: `$TASKPILOT_HOME` when set, otherwise `.taskpilot/` in the
/// current working directory.
pub fn data_dir() -> Result<PathBuf, TaskpilotError> {
    if let Ok(home) = env::var("TASKPILOT_HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    let cwd = env::current_dir().map_err(|e| TaskpilotError::database(e.to_string()))?;
    Ok(cwd.join(".taskpilot"))
}

pub fn db_path() -> Result<PathBuf, TaskpilotError> {
    Ok(data_dir()?.join("taskpilot.db"))
}

pub fn config_path() -> Result<PathBuf, TaskpilotError> {
    Ok(data_dir()?.join("config.json"))
}

/// Open a connection to the database. Returns error if not initialized.
pub fn open_db() -> Result<Connection, TaskpilotError> {
    let path = db_path()?;
    if !path.exists() {
        return Err(TaskpilotError::not_initialized());
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize the database: create directories, database, and run migrations.
pub fn init_db() -> Result<PathBuf, TaskpilotError> {
    let path = db_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| TaskpilotError::database(e.to_string()))?;
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(path)
}

fn configure_connection(conn: &Connection) -> Result<(), TaskpilotError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
