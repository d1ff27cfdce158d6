//! Test fixture creation for on-disk SQLite asset databases.

use super::constants::*;
use asset_dbtest::asset::AssetTarget;
use asset_dbtest::loader::{self, LoadOptions};
use asset_dbtest::{RunContext, SqliteAssetStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(TEST_SEED)
}

/// A store backed by a SQLite file in a temporary directory.
/// The directory is removed when the fixture is dropped.
pub struct TestDb {
    pub store: SqliteAssetStore,
    pub db_path: PathBuf,
    _dir: TempDir,
}

#[allow(dead_code)]
impl TestDb {
    pub fn create() -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("assets.db");
        let store = SqliteAssetStore::open(&db_path).unwrap();
        TestDb {
            store,
            db_path,
            _dir: dir,
        }
    }

    /// The `sqlite://` DSN pointing at this database.
    pub fn dsn(&self) -> String {
        format!("sqlite://{}", self.db_path.display())
    }

    /// A second connection for checking what the store wrote.
    pub fn raw_connection(&self) -> Connection {
        Connection::open(&self.db_path).unwrap()
    }

    pub fn count(&self, sql: &str) -> i64 {
        self.raw_connection()
            .query_row(sql, [], |row| row.get(0))
            .unwrap()
    }

    /// Loads `records` assets of `target` with the seeded rng.
    pub async fn load(&self, target: AssetTarget, records: u64) {
        let options = LoadOptions {
            target,
            records,
            progress_interval: TEST_PROGRESS_INTERVAL,
        };
        let loaded = loader::load(
            &RunContext::default(),
            &self.store,
            &options,
            &mut seeded_rng(),
        )
        .await
        .unwrap();
        assert_eq!(loaded, records);
    }
}
