//! Persistence module split across logical submodules: one per table plus
//! the connection, schema contract and startup bootstrap.

mod bootstrap;
mod connection;
mod schema;
mod seed;

pub mod companies;
pub mod estimates;
pub mod layouts;
pub mod roles;
pub mod user_details;
pub mod users;

pub use bootstrap::{
    create_tables, initialize_connection, initialize_database, is_database_empty,
    BootstrapReport,
};
pub use connection::{apply_pragmas, foreign_keys_enabled, journal_mode, open_database};
pub use schema::{ensure_table, table_exists, TableSpec, TableStatus};
pub use seed::{insert_seed, SeedData};
