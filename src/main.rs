//! Binary entry point: resolve the data directory, start logging, bootstrap
//! the SQLite store and hand its connection to the terminal UI.
use anyhow::Context;
use quote_manager::logging::init_tracing;
use quote_manager::{initialize_database, run_app, App, StoreConfig};

/// Returning a `Result` bubbles fatal startup problems (an unwritable data
/// directory, a corrupt database file, a failed bootstrap) to the terminal.
fn main() -> anyhow::Result<()> {
    let config = StoreConfig::from_platform().context("failed to resolve data directory")?;
    let _log_guard = init_tracing(&config.log_dir)?;

    let conn = initialize_database(&config).context("failed to initialize database")?;
    let mut app = App::new(conn)?;
    run_app(&mut app)
}
