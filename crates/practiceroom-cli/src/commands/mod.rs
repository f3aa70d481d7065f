pub mod config;
pub mod due;
pub mod history;
pub mod stats;
pub mod task;
pub mod theme;
pub mod timer;

use practiceroom_core::{
    Config, Database, KeyValueStore, MemoryStore, PracticeApp, SystemClock,
};

/// Open the practice state on the real clock.
///
/// If the database cannot be opened the session continues on an in-memory
/// store and the user is warned that nothing will be saved.
pub fn open_app(config: &Config) -> Result<PracticeApp, Box<dyn std::error::Error>> {
    let store: Box<dyn KeyValueStore> = match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(error = %e, "database unavailable, using in-memory store");
            eprintln!("warning: storage unavailable ({e}); changes will not be saved");
            Box::new(MemoryStore::new())
        }
    };
    Ok(PracticeApp::load(store, Box::new(SystemClock), config)?)
}

/// Print queued persistence warnings to stderr.
pub fn report_warnings(app: &mut PracticeApp) {
    for warning in app.take_warnings() {
        eprintln!("warning: {warning}");
    }
}
