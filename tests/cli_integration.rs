#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create tempdir"),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskpilot").expect("binary");
        cmd.current_dir(self.dir.path());
        // Keep tests hermetic: no API key means the model client fails fast
        // and the rule-based fallback runs.
        cmd.env_remove("TASKPILOT_API_KEY");
        cmd.env_remove("TASKPILOT_HOME");
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn write_config(&self, content: &str) {
        std::fs::write(self.dir.path().join(".taskpilot/config.json"), content)
            .expect("write config");
    }
}

fn setup() -> TestEnv {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env
}

fn added_task(v: &Value) -> &Value {
    &v["data"]["task"]
}

// ─── init ──────────────────────────────────────────────────────────

#[test]
fn init_creates_database() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(path.ends_with("taskpilot.db"), "unexpected path: {path}");
    assert!(env.dir.path().join(".taskpilot/taskpilot.db").exists());
}

#[test]
fn commands_require_init() {
    let env = TestEnv::new();
    let v = env.run_err(&["add", "Anything", "--no-ai"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

// ─── add: fallback prioritization ──────────────────────────────────

#[test]
fn add_urgent_report_classifies_high_work() {
    let env = setup();
    let v = env.run_ok(&[
        "add",
        "Submit report",
        "--description",
        "client deadline asap",
        "--due",
        "+2h",
        "--no-ai",
    ]);
    let task = added_task(&v);
    assert_eq!(task["priority"], "high");
    assert_eq!(task["category"], "work");
    assert_eq!(task["reminder_lead_minutes"], 60);
    assert_eq!(task["reminder"], "pending");
    assert_eq!(task["completed"], false);
}

#[test]
fn add_far_out_groceries_classifies_low_shopping() {
    let env = setup();
    let v = env.run_ok(&["add", "Buy groceries", "--due", "+100h", "--no-ai"]);
    let task = added_task(&v);
    assert_eq!(task["priority"], "low");
    assert_eq!(task["category"], "shopping");
    assert_eq!(task["reminder_lead_minutes"], 360);
}

#[test]
fn add_without_api_key_falls_back_silently() {
    // Same draft, one through the absorbed upstream failure, one explicitly
    // offline: the structured fields must match.
    let env = setup();
    let with_failure = env.run_ok(&["add", "Buy groceries", "--due", "+100h"]);
    let offline = env.run_ok(&["add", "Buy groceries", "--due", "+100h", "--no-ai"]);
    for field in ["priority", "category", "reminder_lead_minutes"] {
        assert_eq!(
            added_task(&with_failure)[field],
            added_task(&offline)[field],
            "field {field} diverged"
        );
    }
}

#[test]
fn add_respects_caller_category_and_priority() {
    let env = setup();
    let v = env.run_ok(&[
        "add",
        "Team meeting notes",
        "--category",
        "health",
        "--priority",
        "low",
        "--due",
        "+1h",
        "--no-ai",
    ]);
    let task = added_task(&v);
    assert_eq!(task["category"], "health");
    assert_eq!(task["priority"], "low");
    assert_eq!(task["reminder_lead_minutes"], 360);
}

#[test]
fn configured_lead_minutes_apply_to_new_tasks() {
    let env = setup();
    env.write_config(r#"{"lead_high_minutes": 15, "lead_low_minutes": 720}"#);

    let high = env.run_ok(&["add", "Soon", "--due", "+1h", "--no-ai"]);
    assert_eq!(added_task(&high)["reminder_lead_minutes"], 15);

    let pinned_low = env.run_ok(&["add", "Later", "--priority", "low", "--no-ai"]);
    assert_eq!(added_task(&pinned_low)["reminder_lead_minutes"], 720);
}

#[test]
fn add_without_due_date_disables_reminders() {
    let env = setup();
    let v = env.run_ok(&["add", "Read that book", "--no-ai"]);
    let task = added_task(&v);
    assert_eq!(task["due_at"], Value::Null);
    assert_eq!(task["reminder"], "inapplicable");
}

#[test]
fn add_rejects_empty_title() {
    let env = setup();
    let v = env.run_err(&["add", "   ", "--no-ai"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn add_rejects_malformed_due_date() {
    let env = setup();
    let v = env.run_err(&["add", "Task", "--due", "tomorrow", "--no-ai"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn add_text_output_mentions_title_and_priority() {
    let env = setup();
    env.cmd()
        .args(["add", "Water the plants", "--due", "+3h", "--no-ai"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task: Water the plants"))
        .stdout(predicate::str::contains("[high/"));
}

// ─── list / show / edit / done / delete ────────────────────────────

#[test]
fn list_excludes_completed_unless_all() {
    let env = setup();
    let a = env.run_ok(&["add", "First", "--no-ai"]);
    env.run_ok(&["add", "Second", "--no-ai"]);
    let id = added_task(&a)["id"].as_str().unwrap().to_string();

    env.run_ok(&["done", &id]);

    let open = env.run_ok(&["list"]);
    assert_eq!(open["data"]["tasks"].as_array().unwrap().len(), 1);

    let all = env.run_ok(&["list", "--all"]);
    assert_eq!(all["data"]["tasks"].as_array().unwrap().len(), 2);
}

#[test]
fn show_resolves_id_prefix() {
    let env = setup();
    let a = env.run_ok(&["add", "Only task", "--no-ai"]);
    let id = added_task(&a)["id"].as_str().unwrap().to_string();

    let v = env.run_ok(&["show", &id[..6]]);
    assert_eq!(v["data"]["task"]["title"], "Only task");
}

#[test]
fn show_unknown_id_is_not_found() {
    let env = setup();
    let v = env.run_err(&["show", "ZZZZZZ"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn done_and_reopen_toggle_completion() {
    let env = setup();
    let a = env.run_ok(&["add", "Toggle me", "--no-ai"]);
    let id = added_task(&a)["id"].as_str().unwrap().to_string();

    env.run_ok(&["done", &id]);
    let v = env.run_ok(&["show", &id]);
    assert_eq!(v["data"]["task"]["completed"], true);

    env.run_ok(&["reopen", &id]);
    let v = env.run_ok(&["show", &id]);
    assert_eq!(v["data"]["task"]["completed"], false);
}

#[test]
fn edit_due_date_rearms_reminder() {
    let env = setup();
    let a = env.run_ok(&["add", "Dated", "--due", "+1h", "--no-ai"]);
    let id = added_task(&a)["id"].as_str().unwrap().to_string();

    let v = env.run_ok(&["edit", &id, "--clear-due"]);
    assert_eq!(v["data"]["task"]["reminder"], "inapplicable");

    let v = env.run_ok(&["edit", &id, "--due", "+2d"]);
    assert_eq!(v["data"]["task"]["reminder"], "pending");
}

#[test]
fn edit_rejects_due_together_with_clear_due() {
    let env = setup();
    let a = env.run_ok(&["add", "Dated", "--due", "+1h", "--no-ai"]);
    let id = added_task(&a)["id"].as_str().unwrap().to_string();

    env.cmd()
        .args(["edit", &id, "--due", "+2d", "--clear-due"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn edit_priority_resets_lead_time() {
    let env = setup();
    let a = env.run_ok(&["add", "Tune me", "--due", "+1h", "--no-ai"]);
    let id = added_task(&a)["id"].as_str().unwrap().to_string();
    assert_eq!(added_task(&a)["reminder_lead_minutes"], 60);

    let v = env.run_ok(&["edit", &id, "--priority", "low"]);
    assert_eq!(v["data"]["task"]["priority"], "low");
    assert_eq!(v["data"]["task"]["reminder_lead_minutes"], 360);
}

#[test]
fn delete_removes_task() {
    let env = setup();
    let a = env.run_ok(&["add", "Ephemeral", "--no-ai"]);
    let id = added_task(&a)["id"].as_str().unwrap().to_string();

    env.run_ok(&["delete", &id]);
    let v = env.run_err(&["delete", &id]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}
