//! Model-backed priority client. One outbound request per invocation, strict
//! structured response, no retries — retry policy belongs to the caller.

use std::env;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::{Config, API_KEY_ENV};
use crate::engine::judgment::PriorityJudgment;
use crate::error::TaskpilotError;
use crate::models::{Priority, TaskDraft};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 300;

#[async_trait::async_trait]
pub trait PriorityClient: Send + Sync {
    /// Ask for a structured priority verdict. Transport errors, timeouts, and
    /// schema deviations all surface as `UpstreamError`.
    async fn judge(
        &self,
        draft: &TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<PriorityJudgment, TaskpilotError>;
}

pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl AnthropicClient {
    pub fn from_config(config: &Config) -> Result<Self, TaskpilotError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            model: config.model.clone(),
            api_key: env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait::async_trait]
impl PriorityClient for AnthropicClient {
    async fn judge(
        &self,
        draft: &TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<PriorityJudgment, TaskpilotError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(TaskpilotError::upstream(format!("{API_KEY_ENV} is not set")));
        };

        let url = format!("{}/v1/messages", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": build_prompt(draft, now) }],
        });

        let res = self
            .http
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(TaskpilotError::upstream(format!(
                "model service returned {status}: {text}"
            )));
        }

        let message: MessagesResponse = serde_json::from_str(&text)
            .map_err(|e| TaskpilotError::upstream(format!("malformed API response: {e}")))?;
        let content = message
            .content
            .first()
            .map(|b| b.text.as_str())
            .ok_or_else(|| TaskpilotError::upstream("API response has no content block"))?;

        parse_judgment(content, draft)
    }
}

fn build_prompt(draft: &TaskDraft, now: DateTime<Utc>) -> String {
    let due = draft
        .due_at
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "You triage tasks for a personal task manager. Current time: {now}.\n\
         Task:\n\
         - title: {title}\n\
         - description: {description}\n\
         - due date: {due}\n\
         - category: {category}\n\n\
         Reply with a single JSON object and nothing else, using exactly this shape:\n\
         {{\"analysis\": \"<one short sentence of advice>\",\n\
          \"suggestion\": {{\"priority\": \"low|medium|high\",\n\
                           \"reminder\": <minutes before due date to remind, integer>,\n\
                           \"suggested_category\": \"work|personal|health|learning|finance|shopping|other\"}}}}",
        now = now.to_rfc3339(),
        title = draft.title,
        description = draft.description,
        due = due,
        category = draft.category().unwrap_or("none"),
    )
}

/// Wire shape of the model's reply. `reminder`/`lead_time` and
/// `suggested_category`/`category` are accepted as synonyms; anything else
/// missing or mistyped is a parse failure, not a best-effort scrape.
#[derive(Deserialize)]
struct WireJudgment {
    #[serde(default)]
    analysis: Option<String>,
    suggestion: WireSuggestion,
}

#[derive(Deserialize)]
struct WireSuggestion {
    priority: Priority,
    #[serde(alias = "lead_time")]
    reminder: i64,
    #[serde(default, alias = "category")]
    suggested_category: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

fn parse_judgment(content: &str, draft: &TaskDraft) -> Result<PriorityJudgment, TaskpilotError> {
    let wire: WireJudgment = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| TaskpilotError::upstream(format!("unparseable judgment: {e}")))?;

    if wire.suggestion.reminder <= 0 {
        return Err(TaskpilotError::upstream(format!(
            "invalid reminder lead time: {}",
            wire.suggestion.reminder
        )));
    }

    Ok(PriorityJudgment {
        analysis: wire.analysis,
        priority: wire.suggestion.priority,
        lead_minutes: wire.suggestion.reminder,
        suggested_category: if draft.category().is_none() {
            wire.suggestion.suggested_category
        } else {
            None
        },
    })
}

/// Models sometimes wrap JSON in a markdown fence despite instructions.
/// Unwrapping the fence is the only tolerance; the payload itself gets one
/// strict deserialization.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
