//! Task management commands for CLI.

use clap::Subcommand;
use practiceroom_core::{format_hms, Config, Event, Task, TaskId};

use super::{open_app, report_warnings};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new practice task
    Add {
        /// Task name
        name: String,
        /// Category label (e.g. technique, repertoire)
        #[arg(long)]
        category: String,
        /// Scheduled time of day, HH:MM
        #[arg(long)]
        time: String,
        /// Planned duration in minutes
        #[arg(long)]
        duration: u32,
    },
    /// List tasks in creation order
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Get task details
    Get {
        /// Task ID
        id: TaskId,
    },
    /// Delete a task (stops its countdown if running)
    Delete {
        /// Task ID
        id: TaskId,
    },
}

pub(crate) fn describe(task: &Task) -> String {
    format!(
        "{}  [{}] {} @ {} for {}m  {}  {}",
        task.id,
        task.category,
        task.name,
        task.time,
        task.duration,
        format_hms(task.remaining),
        task.status,
    )
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut app = open_app(&config)?;

    match action {
        TaskAction::Add {
            name,
            category,
            time,
            duration,
        } => {
            if let Event::TaskCreated { task, .. } =
                app.add_task(&name, &category, &time, duration)?
            {
                println!("Task created: {}", task.id);
                println!("{}", serde_json::to_string_pretty(&task)?);
            }
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(app.tasks())?);
            } else if app.tasks().is_empty() {
                println!("No tasks.");
            } else {
                for task in app.tasks() {
                    println!("{}", describe(task));
                }
            }
        }
        TaskAction::Get { id } => match app.task(id) {
            Some(task) => println!("{}", serde_json::to_string_pretty(task)?),
            None => return Err(format!("Task not found: {id}").into()),
        },
        TaskAction::Delete { id } => match app.remove_task(id) {
            Some(_) => println!("Task deleted: {id}"),
            None => println!("No task with id {id}"),
        },
    }

    report_warnings(&mut app);
    Ok(())
}
