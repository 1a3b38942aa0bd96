use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory under the system temp dir that holds the service's data.
const DATA_DIR_NAME: &str = "emotwin";

/// Default database file name inside the data directory.
const DB_FILE_NAME: &str = "emotions.sqlite";

pub struct DataPaths;

impl DataPaths {
    /// Writable data directory. Lives under the system temp dir so the service
    /// also runs on hosts where the install directory is read-only.
    pub fn data_dir() -> PathBuf {
        std::env::temp_dir().join(DATA_DIR_NAME)
    }

    /// Default location of the record store.
    pub fn default_db_path() -> PathBuf {
        Self::data_dir().join(DB_FILE_NAME)
    }

    /// Creates the parent directory of `db_path` if it does not exist yet.
    pub fn ensure_parent(db_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating data directory: {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
