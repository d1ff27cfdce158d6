//! SQLite-backed asset store.
//!
//! Used for local runs (`sqlite://bench.db`) and by the test-suite. Unlike the
//! MySQL target, a fresh SQLite database gets its schema created on open.

use super::schema::ASSET_VERSIONED_SCHEMAS;
use super::trait_def::{in_placeholders, AssetStore};
use crate::asset::{AssetDataRow, AssetMetadata, AssetTarget, Sample};
use crate::error::{DbTestError, Result};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context};
use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

pub struct SqliteAssetStore {
    conn: Mutex<Connection>,
}

fn prepare_schema(conn: &Connection) -> anyhow::Result<()> {
    let latest_version = ASSET_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &ASSET_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating asset db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let db_version: usize = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version < BASE_DB_VERSION {
        bail!(
            "Database has tables but an unknown version {}, refusing to touch it",
            db_version
        );
    }
    let version = db_version - BASE_DB_VERSION;
    let schema = ASSET_VERSIONED_SCHEMAS
        .get(version)
        .with_context(|| format!("Unknown asset db version {}", version))?;
    schema.validate(conn)?;
    conn.execute("PRAGMA foreign_keys = ON;", [])?;
    Ok(())
}

impl SqliteAssetStore {
    /// Open (or create) the database file at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> anyhow::Result<Self> {
        let conn = Connection::open_with_flags(
            db_path.as_ref(),
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open asset database {:?}", db_path.as_ref()))?;
        prepare_schema(&conn)?;
        Ok(SqliteAssetStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        prepare_schema(&conn)?;
        Ok(SqliteAssetStore {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbTestError::LockPoisoned)
    }
}

#[async_trait]
impl AssetStore for SqliteAssetStore {
    async fn insert_sample(&self, sample: &Sample) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO sample (uuid, asset_uuid, chord, skey, bpm, name) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                sample.uuid,
                sample.asset_uuid,
                sample.chord,
                sample.key,
                sample.bpm,
                sample.name
            ],
        )?;
        Ok(())
    }

    async fn insert_asset_data(&self, row: &AssetDataRow) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO asset_data (asset_uuid, asset_metadata_id, value) VALUES (?1, ?2, ?3)",
            params![row.asset_uuid, row.field.id(), row.value],
        )?;
        Ok(())
    }

    async fn max_id(&self, target: AssetTarget) -> Result<Option<i64>> {
        let max_id = self.conn()?.query_row(
            &format!("SELECT MAX(id) FROM {}", target.table_name()),
            [],
            |r| r.get(0),
        )?;
        Ok(max_id)
    }

    async fn asset_uuid_by_id(&self, target: AssetTarget, id: i64) -> Result<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT asset_uuid FROM {} WHERE id = ?1 LIMIT 1",
            target.table_name()
        ))?;
        let asset_uuid = stmt.query_row(params![id], |r| r.get(0)).optional()?;
        Ok(asset_uuid)
    }

    async fn select_samples(&self, asset_uuids: &[String]) -> Result<Vec<Sample>> {
        if asset_uuids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT uuid, asset_uuid, chord, skey, bpm, name FROM sample WHERE asset_uuid IN ({})",
            in_placeholders(asset_uuids.len())
        ))?;
        let samples = stmt
            .query_map(params_from_iter(asset_uuids.iter()), |row| {
                Ok(Sample {
                    uuid: row.get(0)?,
                    asset_uuid: row.get(1)?,
                    chord: row.get(2)?,
                    key: row.get(3)?,
                    bpm: row.get(4)?,
                    name: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(samples)
    }

    async fn select_asset_metadata(&self, asset_uuids: &[String]) -> Result<Vec<AssetMetadata>> {
        if asset_uuids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT ad.asset_uuid, ad.asset_metadata_id, md.name, md.datatype, ad.value \
             FROM asset_data ad \
             JOIN metadata md ON ad.asset_metadata_id = md.id \
             WHERE ad.asset_uuid IN ({}) \
             ORDER BY ad.asset_uuid",
            in_placeholders(asset_uuids.len())
        ))?;
        let rows = stmt
            .query_map(params_from_iter(asset_uuids.iter()), |row| {
                Ok(AssetMetadata {
                    asset_uuid: row.get(0)?,
                    asset_metadata_id: row.get(1)?,
                    name: row.get(2)?,
                    datatype: row.get(3)?,
                    value: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
