use std::fs;

use serde::{Deserialize, Serialize};

use crate::db::connection;
use crate::engine::heuristic::{self, LeadTimes};
use crate::error::TaskpilotError;

/// Environment variable holding the model-service API key. The key never
/// lives in the config file.
pub const API_KEY_ENV: &str = "TASKPILOT_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Reminder polling cadence. A tunable, not a correctness requirement.
    pub poll_interval_secs: u64,
    /// Reminder lead times per priority, in minutes.
    pub lead_high_minutes: i64,
    pub lead_medium_minutes: i64,
    pub lead_low_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "claude-3-haiku-20240307".to_string(),
            api_base_url: "https://api.anthropic.com".to_string(),
            request_timeout_secs: 15,
            poll_interval_secs: 10,
            lead_high_minutes: heuristic::LEAD_HIGH_MINUTES,
            lead_medium_minutes: heuristic::LEAD_MEDIUM_MINUTES,
            lead_low_minutes: heuristic::LEAD_LOW_MINUTES,
        }
    }
}

impl Config {
    pub fn lead_times(&self) -> LeadTimes {
        LeadTimes {
            high: self.lead_high_minutes,
            medium: self.lead_medium_minutes,
            low: self.lead_low_minutes,
        }
    }
}

/// Load config.json from the data directory, falling back to defaults when
/// the file does not exist.
pub fn load() -> Result<Config, TaskpilotError> {
    let path = connection::config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(&path).map_err(|e| TaskpilotError::config(e.to_string()))?;
    serde_json::from_str(&raw)
        .map_err(|e| TaskpilotError::config(format!("invalid config.json: {e}")))
}
