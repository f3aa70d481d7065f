//! Foreground countdown.
//!
//! `timer start` keeps the process alive while the countdown runs: a tokio
//! sleep waits for the next scheduled deadline, then the app is pumped.
//! Ctrl-C stops the countdown and saves the remaining time, so running
//! `timer start` again, with or without the task id, resumes it.

use clap::Subcommand;
use practiceroom_core::{format_hms, Config, Event, PracticeApp, TaskId, TimerState};
use std::io::Write;
use std::time::Duration;

use super::{open_app, report_warnings};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Count a task down in the foreground (resumes a stopped task)
    Start {
        /// Task ID; omit to resume the last stopped task
        id: Option<TaskId>,
        /// Print events as JSON lines instead of a countdown display
        #[arg(long)]
        json: bool,
    },
    /// Show the timer state and the task it would resume
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut app = open_app(&config)?;

    match action {
        TimerAction::Start { id, json } => {
            if let Some(event) = app.boot() {
                emit(&event, json, &config)?;
            }
            let started = match id {
                Some(id) => app.start(id)?,
                None => app.resume()?.ok_or("No stopped task to resume")?,
            };
            emit(&started, json, &config)?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_countdown(&mut app, json, &config))?;
        }
        TimerAction::Status { json } => {
            let snapshot = app.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!("{}", describe_status(&snapshot));
            }
        }
    }

    report_warnings(&mut app);
    Ok(())
}

async fn run_countdown(
    app: &mut PracticeApp,
    json: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while app.timer_state() == TimerState::Running {
        let Some(deadline) = app.next_deadline() else {
            break;
        };
        let wait = (deadline - app.now()).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = &mut ctrl_c => {
                if let Some(event) = app.stop() {
                    emit(&event, json, config)?;
                }
                break;
            }
        }

        for event in app.pump() {
            emit(&event, json, config)?;
        }
        report_warnings(app);
    }
    Ok(())
}

fn describe_status(snapshot: &Event) -> String {
    let Event::StateSnapshot {
        state,
        task_id: Some(id),
        task_name,
        remaining_secs,
        total_secs,
        ..
    } = snapshot
    else {
        return "Timer idle, nothing to resume.".to_string();
    };
    let state = match state {
        TimerState::Running => "running",
        TimerState::Idle => "stopped",
    };
    format!(
        "{state}: {id} {} {} left of {}m",
        task_name.as_deref().unwrap_or(""),
        format_hms(*remaining_secs),
        total_secs / 60,
    )
}

fn emit(event: &Event, json: bool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let mut out = std::io::stdout().lock();
    match event {
        Event::TimerStarted { remaining_secs, .. } | Event::TimerTick { remaining_secs, .. } => {
            write!(out, "\r{}", format_hms(*remaining_secs))?;
        }
        Event::TimerStopped { remaining_secs, .. } => {
            writeln!(out, "\rStopped at {}", format_hms(*remaining_secs))?;
        }
        Event::TaskCompleted { name, .. } => {
            writeln!(out, "\r{}", format_hms(0))?;
            if config.notifications.enabled {
                if config.notifications.bell {
                    write!(out, "\x07")?;
                }
                writeln!(out, "\"{name}\" done!")?;
            }
        }
        Event::TasksDue { task_ids, .. } => {
            let ids: Vec<String> = task_ids.iter().map(ToString::to_string).collect();
            eprintln!("\ndue now: {}", ids.join(", "));
        }
        _ => {}
    }
    out.flush()?;
    Ok(())
}
