//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_practiceroom"))
        .env("PRACTICEROOM_DATA_DIR", data_dir)
        .env_remove("PRACTICEROOM_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn add_task(dir: &Path, name: &str, time: &str) -> i64 {
    add_task_for(dir, name, time, 5)
}

fn add_task_for(dir: &Path, name: &str, time: &str, minutes: u32) -> i64 {
    let minutes = minutes.to_string();
    let (code, stdout, stderr) = run_cli(
        dir,
        &["task", "add", name, "--category", "technique", "--time", time, "--duration", &minutes],
    );
    assert_eq!(code, 0, "task add failed: {stderr}");
    let json_start = stdout.find('{').expect("task JSON in output");
    let task: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    task["id"].as_i64().unwrap()
}

fn list_tasks(dir: &Path) -> Vec<serde_json::Value> {
    let (code, stdout, _) = run_cli(dir, &["task", "list", "--json"]);
    assert_eq!(code, 0, "task list failed");
    serde_json::from_str::<Vec<serde_json::Value>>(&stdout).unwrap()
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_task(dir.path(), "Scales", "08:00");

    let tasks = list_tasks(dir.path());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"].as_i64(), Some(id));
    assert_eq!(tasks[0]["name"], "Scales");
    assert_eq!(tasks[0]["time"], "08:00");
    assert_eq!(tasks[0]["remaining"], 300);
    assert_eq!(tasks[0]["status"], "pending");
}

#[test]
fn test_task_add_rejects_bad_time() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["task", "add", "Scales", "--category", "technique", "--time", "25:00", "--duration", "5"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid time of day"), "stderr: {stderr}");
    assert!(list_tasks(dir.path()).is_empty());
}

#[test]
fn test_task_delete_keeps_others() {
    let dir = tempfile::tempdir().unwrap();
    let first = add_task(dir.path(), "First", "08:00");
    let second = add_task(dir.path(), "Second", "09:00");

    let (code, stdout, _) = run_cli(dir.path(), &["task", "delete", &first.to_string()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Task deleted"));

    // Second delete is a no-op, not an error.
    let (code, _, _) = run_cli(dir.path(), &["task", "delete", &first.to_string()]);
    assert_eq!(code, 0);

    let tasks = list_tasks(dir.path());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"].as_i64(), Some(second));
}

#[test]
fn test_task_get_unknown_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["task", "get", "12345"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Task not found"));
}

#[test]
fn test_timer_start_unknown_task_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["timer", "start", "12345"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Task not found"));
}

fn event_lines<'a>(stdout: &'a str, kind: &str) -> Vec<&'a str> {
    let tag = format!("\"type\":\"{kind}\"");
    stdout.lines().filter(|line| line.contains(&tag)).collect()
}

#[test]
fn test_timer_runs_task_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "timer.tick_interval_ms", "1"]);
    assert_eq!(code, 0);
    let id = add_task_for(dir.path(), "Scales", "23:59", 1).to_string();

    let (code, stdout, stderr) = run_cli(dir.path(), &["timer", "start", &id, "--json"]);
    assert_eq!(code, 0, "timer start failed: {stderr}");
    assert_eq!(event_lines(&stdout, "timer_started").len(), 1);
    assert_eq!(event_lines(&stdout, "timer_tick").len(), 59);
    assert_eq!(event_lines(&stdout, "task_completed").len(), 1);

    let tasks = list_tasks(dir.path());
    assert_eq!(tasks[0]["status"], "done");
    assert_eq!(tasks[0]["remaining"], 0);

    let (code, stdout, _) = run_cli(dir.path(), &["history", "list", "--json"]);
    assert_eq!(code, 0);
    let history: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["id"].as_i64().map(|n| n.to_string()), Some(id.clone()));
    assert!(history[0]["doneAt"].is_i64());

    let (code, _, stderr) = run_cli(dir.path(), &["timer", "start", &id]);
    assert_ne!(code, 0);
    assert!(stderr.contains("cannot be started"), "stderr: {stderr}");
}

#[test]
fn test_timer_start_without_id_needs_stopped_task() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["timer", "start"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("No stopped task to resume"), "stderr: {stderr}");

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Timer idle, nothing to resume.");
}

#[cfg(unix)]
#[test]
fn test_interrupted_timer_saves_and_resumes() {
    use std::process::Stdio;
    use std::time::Duration;

    let dir = tempfile::tempdir().unwrap();
    let id = add_task_for(dir.path(), "Scales", "23:59", 1);

    let child = Command::new(env!("CARGO_BIN_EXE_practiceroom"))
        .env("PRACTICEROOM_DATA_DIR", dir.path())
        .env_remove("PRACTICEROOM_LOG")
        .args(["timer", "start", &id.to_string(), "--json"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");
    std::thread::sleep(Duration::from_millis(2500));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("Failed to send SIGINT");
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(event_lines(&stdout, "timer_stopped").len(), 1);
    assert!(event_lines(&stdout, "task_completed").is_empty());

    let task = list_tasks(dir.path()).remove(0);
    let remaining = task["remaining"].as_u64().unwrap();
    assert!(remaining > 0 && remaining < 60, "remaining: {remaining}");
    assert_ne!(task["status"], "done");

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status", "--json"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["state"], "idle");
    assert_eq!(snapshot["task_id"].as_i64(), Some(id));
    assert_eq!(snapshot["remaining_secs"].as_u64(), Some(remaining));

    run_cli(dir.path(), &["config", "set", "timer.tick_interval_ms", "1"]);
    let (code, stdout, stderr) = run_cli(dir.path(), &["timer", "start", "--json"]);
    assert_eq!(code, 0, "resume failed: {stderr}");
    assert_eq!(event_lines(&stdout, "timer_tick").len() as u64, remaining - 1);
    assert_eq!(event_lines(&stdout, "task_completed").len(), 1);
    assert_eq!(list_tasks(dir.path())[0]["status"], "done");
}

#[test]
fn test_due_sweep_marks_midnight_task_due() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "Warmup", "00:00");
    let (code, _, _) = run_cli(dir.path(), &["due", "sweep"]);
    assert_eq!(code, 0);
    assert_eq!(list_tasks(dir.path())[0]["status"], "due");
}

#[test]
fn test_history_list_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["history", "list", "--json"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "[]");

    let (code, stdout, _) = run_cli(dir.path(), &["history", "clear", "--yes"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("history_cleared"));
}

#[test]
fn test_stats_week_json() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["stats", "week", "--json"]);
    assert_eq!(code, 0);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["days"].as_array().unwrap().len(), 7);
}

#[test]
fn test_theme_toggle_persists() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(dir.path(), &["theme", "get"]);
    assert_eq!(stdout.trim(), "false");
    let (code, stdout, _) = run_cli(dir.path(), &["theme", "toggle"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");
    let (_, stdout, _) = run_cli(dir.path(), &["theme", "get"]);
    assert_eq!(stdout.trim(), "true");
    run_cli(dir.path(), &["theme", "set", "false"]);
    let (_, stdout, _) = run_cli(dir.path(), &["theme", "get"]);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "scheduler.sweep_interval_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "60");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "notifications.bell", "false"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "notifications.bell"]);
    assert_eq!(stdout.trim(), "false");

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "nope.missing"]);
    assert_ne!(code, 0);
}
