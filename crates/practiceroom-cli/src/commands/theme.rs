use clap::Subcommand;
use practiceroom_core::Config;

use super::{open_app, report_warnings};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print whether dark mode is on
    Get,
    /// Turn dark mode on or off
    Set {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        dark: bool,
    },
    /// Flip dark mode
    Toggle,
}

pub fn run(action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut app = open_app(&config)?;

    match action {
        ThemeAction::Get => println!("{}", app.dark_mode()),
        ThemeAction::Set { dark } => {
            app.set_dark_mode(dark);
            println!("{}", app.dark_mode());
        }
        ThemeAction::Toggle => {
            app.toggle_dark_mode();
            println!("{}", app.dark_mode());
        }
    }

    report_warnings(&mut app);
    Ok(())
}
