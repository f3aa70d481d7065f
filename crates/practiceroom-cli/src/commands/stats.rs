use clap::Subcommand;
use practiceroom_core::{Config, WeeklyStats};

use super::open_app;

const BAR_WIDTH: u64 = 30;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Minutes practiced on each of the last seven days
    Week {
        /// Print JSON instead of a bar chart
        #[arg(long)]
        json: bool,
    },
}

fn render(stats: &WeeklyStats) -> String {
    let max = stats.max_minutes().max(1);
    let mut lines: Vec<String> = stats
        .days
        .iter()
        .map(|day| {
            let width = (day.minutes * BAR_WIDTH).div_ceil(max) as usize;
            format!("{:<4}{:>5}m {}", day.label, day.minutes, "#".repeat(width))
        })
        .collect();
    lines.push(format!("total {}m", stats.total_minutes()));
    lines.join("\n")
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let app = open_app(&config)?;

    match action {
        StatsAction::Week { json } => {
            let stats = app.weekly_stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", render(&stats));
            }
        }
    }
    Ok(())
}
