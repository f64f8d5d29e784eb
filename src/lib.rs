//! Core library surface for the Mr. Quote estimate manager.
//!
//! The persistence layer (`db`) owns the on-device SQLite store and its startup
//! bootstrap; `ui` is the terminal front-end that consumes it. The binary only
//! wires the two together.
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod introduction;
pub mod logging;
pub mod models;
pub mod ui;

/// Startup entry points used by `main.rs` and the integration tests.
pub use db::{initialize_connection, initialize_database, BootstrapReport, SeedData};

pub use config::StoreConfig;
pub use error::{BootstrapStage, StoreError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
