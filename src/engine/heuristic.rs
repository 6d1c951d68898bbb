//! Rule-based fallback analyzer. Pure function of its inputs, no I/O, cannot
//! fail — the availability backstop when the model service is down.

use chrono::{DateTime, Utc};

use crate::engine::judgment::PriorityJudgment;
use crate::models::{Priority, TaskDraft};

/// Default lead times per priority, in minutes. Tunable defaults, not
/// business law; config.json can override them.
pub const LEAD_HIGH_MINUTES: i64 = 60;
pub const LEAD_MEDIUM_MINUTES: i64 = 180;
pub const LEAD_LOW_MINUTES: i64 = 360;

/// Reminder lead times per priority, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadTimes {
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

impl Default for LeadTimes {
    fn default() -> Self {
        Self {
            high: LEAD_HIGH_MINUTES,
            medium: LEAD_MEDIUM_MINUTES,
            low: LEAD_LOW_MINUTES,
        }
    }
}

impl LeadTimes {
    pub fn for_priority(&self, priority: Priority) -> i64 {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

const URGENCY_KEYWORDS: &[&str] = &["urgent", "asap", "deadline", "must", "critical", "important"];

const CATEGORY_GROUPS: &[(&[&str], &str)] = &[
    (&["client", "meeting", "work"], "work"),
    (&["family", "home"], "personal"),
    (&["shopping", "buy"], "shopping"),
];

pub fn analyze(draft: &TaskDraft, now: DateTime<Utc>) -> PriorityJudgment {
    analyze_with(draft, now, &LeadTimes::default())
}

pub fn analyze_with(draft: &TaskDraft, now: DateTime<Utc>, lead: &LeadTimes) -> PriorityJudgment {
    let text = format!("{} {}", draft.title, draft.description);

    // Absent due date never triggers the urgent branch.
    let hours_until_due = draft.due_at.map(|due| (due - now).num_minutes() as f64 / 60.0);

    // Overdue tasks (negative hours) classify high through the < 24 branch.
    let priority = if hours_until_due.is_some_and(|h| h < 24.0) || contains_keyword(&text) {
        Priority::High
    } else if hours_until_due.is_some_and(|h| h < 72.0) {
        Priority::Medium
    } else {
        Priority::Low
    };

    let suggested_category = if draft.category().is_none() {
        Some(infer_category(&text).to_string())
    } else {
        None
    };

    let analysis = match hours_until_due {
        Some(h) => format!(
            "Rule-based estimate: {} priority, about {:.0} hours until due.",
            priority.as_str(),
            h
        ),
        None => format!(
            "Rule-based estimate: {} priority, no due date set.",
            priority.as_str()
        ),
    };

    PriorityJudgment {
        analysis: Some(analysis),
        priority,
        lead_minutes: lead.for_priority(priority),
        suggested_category,
    }
}

/// Word-boundary match so "mustard" does not read as "must".
fn contains_keyword(text: &str) -> bool {
    words(text).any(|w| URGENCY_KEYWORDS.iter().any(|k| w.eq_ignore_ascii_case(k)))
}

fn infer_category(text: &str) -> &'static str {
    for (keywords, category) in CATEGORY_GROUPS {
        if words(text).any(|w| keywords.iter().any(|k| w.eq_ignore_ascii_case(k))) {
            return category;
        }
    }
    "other"
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(title: &str, description: &str, due_in_hours: Option<i64>) -> (TaskDraft, DateTime<Utc>) {
        let now = Utc::now();
        let d = TaskDraft {
            title: title.to_string(),
            description: description.to_string(),
            due_at: due_in_hours.map(|h| now + Duration::hours(h)),
            category: None,
            priority: None,
        };
        (d, now)
    }

    #[test]
    fn due_within_24_hours_is_high_regardless_of_text() {
        let (d, now) = draft("Water the plants", "nothing pressing", Some(5));
        let j = analyze(&d, now);
        assert_eq!(j.priority, Priority::High);
        assert_eq!(j.lead_minutes, LEAD_HIGH_MINUTES);
    }

    #[test]
    fn urgency_keyword_is_high_even_far_out() {
        let (d, now) = draft("Renew passport", "this is URGENT", Some(500));
        assert_eq!(analyze(&d, now).priority, Priority::High);
    }

    #[test]
    fn keyword_match_respects_word_boundaries() {
        let (d, now) = draft("Buy mustard", "and ketchup", Some(500));
        assert_eq!(analyze(&d, now).priority, Priority::Low);
    }

    #[test]
    fn overdue_task_is_high() {
        let (d, now) = draft("File expenses", "", Some(-3));
        assert_eq!(analyze(&d, now).priority, Priority::High);
    }

    #[test]
    fn mid_window_is_medium() {
        let (d, now) = draft("Prepare slides", "", Some(48));
        let j = analyze(&d, now);
        assert_eq!(j.priority, Priority::Medium);
        assert_eq!(j.lead_minutes, LEAD_MEDIUM_MINUTES);
    }

    #[test]
    fn no_due_date_and_no_keyword_is_low() {
        let (d, now) = draft("Read that book", "someday", None);
        let j = analyze(&d, now);
        assert_eq!(j.priority, Priority::Low);
        assert_eq!(j.lead_minutes, LEAD_LOW_MINUTES);
    }

    #[test]
    fn configured_lead_times_override_defaults() {
        let (d, now) = draft("Water the plants", "", Some(5));
        let lead = LeadTimes {
            high: 15,
            medium: 90,
            low: 240,
        };
        let j = analyze_with(&d, now, &lead);
        assert_eq!(j.priority, Priority::High);
        assert_eq!(j.lead_minutes, 15);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let (d, now) = draft("Plan trip", "family visit", Some(200));
        assert_eq!(analyze(&d, now), analyze(&d, now));
    }

    #[test]
    fn report_scenario() {
        let (mut d, now) = draft("Submit report", "client deadline asap", Some(2));
        d.category = Some(String::new());
        let j = analyze(&d, now);
        assert_eq!(j.priority, Priority::High);
        assert_eq!(j.lead_minutes, 60);
        assert_eq!(j.suggested_category.as_deref(), Some("work"));
    }

    #[test]
    fn groceries_scenario() {
        let (mut d, now) = draft("Buy groceries", "", Some(100));
        d.category = Some(String::new());
        let j = analyze(&d, now);
        assert_eq!(j.priority, Priority::Low);
        assert_eq!(j.lead_minutes, 360);
        assert_eq!(j.suggested_category.as_deref(), Some("shopping"));
    }

    #[test]
    fn caller_category_suppresses_suggestion() {
        let (mut d, now) = draft("Team meeting", "", Some(10));
        d.category = Some("work".to_string());
        assert_eq!(analyze(&d, now).suggested_category, None);
    }

    #[test]
    fn unmatched_text_suggests_other() {
        let (d, now) = draft("Stretch", "", None);
        assert_eq!(analyze(&d, now).suggested_category.as_deref(), Some("other"));
    }
}
