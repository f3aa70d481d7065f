use clap::Subcommand;
use practiceroom_core::{Config, HistoryEntry};
use std::io::{BufRead, Write};

use super::{open_app, report_warnings};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List completed sessions
    List {
        /// Oldest first instead of the configured order
        #[arg(long)]
        oldest_first: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Delete all history
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn describe(entry: &HistoryEntry) -> String {
    let when = entry
        .done_at()
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| entry.done_at_ms.to_string());
    format!(
        "{when}: [{}] {} ({}m)",
        entry.task.category, entry.task.name, entry.task.duration
    )
}

fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut app = open_app(&config)?;

    match action {
        HistoryAction::List { oldest_first, json } => {
            let log = app.history_log();
            let entries: Vec<&HistoryEntry> = if config.history.newest_first && !oldest_first {
                log.newest_first().collect()
            } else {
                log.all().iter().collect()
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No practice history.");
            } else {
                for entry in entries {
                    println!("{}", describe(entry));
                }
            }
        }
        HistoryAction::Clear { yes } => {
            if yes || confirm("Clear all history?")? {
                let event = app.clear_history();
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("History kept.");
            }
        }
    }

    report_warnings(&mut app);
    Ok(())
}
