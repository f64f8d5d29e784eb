//! Error type for the persistence layer. The UI and `main` keep using
//! `anyhow`, while everything under `db` returns [`StoreError`] so callers can
//! tell a fatal open failure apart from a rolled back bootstrap.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Steps of the startup bootstrap that can fail after the handle is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStage {
    BeginTransaction,
    CreateTables,
    InsertSeed,
    Commit,
}

impl fmt::Display for BootstrapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BootstrapStage::BeginTransaction => "begin transaction",
            BootstrapStage::CreateTables => "create tables",
            BootstrapStage::InsertSeed => "insert seed data",
            BootstrapStage::Commit => "commit",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to prepare data directory {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not resolve a data directory for this platform")]
    NoDataDir,
    #[error("failed to apply pragma {pragma}")]
    Pragma {
        pragma: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{context}")]
    Sql {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("database bootstrap failed during {stage}")]
    Bootstrap {
        stage: BootstrapStage,
        #[source]
        source: Box<StoreError>,
    },
    #[error("{0} not found")]
    NotFound(&'static str),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Attach a short description to a raw SQLite result, mirroring
/// `anyhow::Context` for the typed error.
pub trait SqlContext<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> SqlContext<T> for rusqlite::Result<T> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| StoreError::Sql { context, source })
    }
}

impl StoreError {
    /// Wrap an error raised inside the bootstrap transaction.
    pub(crate) fn at_stage(self, stage: BootstrapStage) -> Self {
        StoreError::Bootstrap {
            stage,
            source: Box::new(self),
        }
    }

    /// The bootstrap stage that failed, if this error came from one.
    pub fn stage(&self) -> Option<BootstrapStage> {
        match self {
            StoreError::Bootstrap { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn sql_context_keeps_the_sqlite_error_as_source() {
        let raw: rusqlite::Result<()> = Err(rusqlite::Error::QueryReturnedNoRows);
        let err = raw.context("failed to load company").unwrap_err();

        assert_eq!(err.to_string(), "failed to load company");
        assert!(err.source().is_some());
    }

    #[test]
    fn bootstrap_errors_report_their_stage() {
        let err = StoreError::NotFound("company").at_stage(BootstrapStage::InsertSeed);

        assert_eq!(err.stage(), Some(BootstrapStage::InsertSeed));
        assert_eq!(
            err.to_string(),
            "database bootstrap failed during insert seed data"
        );
    }
}
