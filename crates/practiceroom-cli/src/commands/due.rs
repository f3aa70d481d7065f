use clap::Subcommand;
use practiceroom_core::Config;

use super::{open_app, report_warnings};

#[derive(Subcommand)]
pub enum DueAction {
    /// Mark pending tasks whose time of day has passed as due
    Sweep,
}

pub fn run(action: DueAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut app = open_app(&config)?;

    match action {
        DueAction::Sweep => match app.sweep_due() {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("No tasks became due."),
        },
    }

    report_warnings(&mut app);
    Ok(())
}
