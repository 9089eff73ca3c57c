//! Throwaway SQLite databases.

use predicta::service::{Exchange, ExchangeSettings};
use predicta::store::SqliteStore;
use tempfile::TempDir;

/// A migrated database file that is removed when dropped.
pub struct TempDb {
    dir: TempDir,
    url: String,
}

impl TempDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = dir.path().join("predicta.db").to_string_lossy().into_owned();
        Self { dir, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Open a store on this database, running migrations.
    pub fn store(&self) -> SqliteStore {
        SqliteStore::open(&self.url).expect("open sqlite store")
    }

    pub fn exchange(&self) -> Exchange<SqliteStore> {
        Exchange::new(self.store(), ExchangeSettings::default())
    }
}
