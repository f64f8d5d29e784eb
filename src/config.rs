use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Result, StoreError};

/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "mrQuote.db";
/// Folder (inside the data directory) that receives the rolling log files.
const LOG_DIR_NAME: &str = "logs";

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "MrQuote";
const APPLICATION: &str = "quote-manager";

/// Where the application keeps its database and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
}

impl StoreConfig {
    /// Resolve the platform-default, app-private data directory.
    pub fn from_platform() -> Result<Self> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(StoreError::NoDataDir)?;
        Ok(Self::in_dir(dirs.data_dir()))
    }

    /// Root the database and logs beneath an explicit directory. Tests use this
    /// with a temporary directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            db_path: dir.join(DB_FILE_NAME),
            log_dir: dir.join(LOG_DIR_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_places_database_and_logs_side_by_side() {
        let config = StoreConfig::in_dir("/tmp/quotes");

        assert_eq!(config.db_path, PathBuf::from("/tmp/quotes/mrQuote.db"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/quotes/logs"));
    }
}
