//! An AssetStore that starts failing after a set number of calls.

use asset_dbtest::asset::{AssetDataRow, AssetMetadata, AssetTarget, Sample};
use asset_dbtest::{AssetStore, DbTestError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wraps another store. Writes succeed `writes_left` times, batched reads
/// succeed `reads_left` times; after that the call fails with a SQLite error.
/// Identifier lookups are always passed through.
pub struct FailingStore<S: AssetStore> {
    inner: S,
    writes_left: AtomicUsize,
    reads_left: AtomicUsize,
}

#[allow(dead_code)]
impl<S: AssetStore> FailingStore<S> {
    pub fn new(inner: S, writes_left: usize, reads_left: usize) -> Self {
        FailingStore {
            inner,
            writes_left: AtomicUsize::new(writes_left),
            reads_left: AtomicUsize::new(reads_left),
        }
    }

    pub fn failing_writes_after(inner: S, writes: usize) -> Self {
        Self::new(inner, writes, usize::MAX)
    }

    pub fn failing_reads_after(inner: S, reads: usize) -> Self {
        Self::new(inner, usize::MAX, reads)
    }

    fn take(counter: &AtomicUsize) -> Result<()> {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .map(|_| ())
            .map_err(|_| {
                DbTestError::Sqlite(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_IOERR),
                    Some("injected failure".to_string()),
                ))
            })
    }
}

#[async_trait]
impl<S: AssetStore> AssetStore for FailingStore<S> {
    async fn insert_sample(&self, sample: &Sample) -> Result<()> {
        Self::take(&self.writes_left)?;
        self.inner.insert_sample(sample).await
    }

    async fn insert_asset_data(&self, row: &AssetDataRow) -> Result<()> {
        Self::take(&self.writes_left)?;
        self.inner.insert_asset_data(row).await
    }

    async fn max_id(&self, target: AssetTarget) -> Result<Option<i64>> {
        self.inner.max_id(target).await
    }

    async fn asset_uuid_by_id(&self, target: AssetTarget, id: i64) -> Result<Option<String>> {
        self.inner.asset_uuid_by_id(target, id).await
    }

    async fn select_samples(&self, asset_uuids: &[String]) -> Result<Vec<Sample>> {
        Self::take(&self.reads_left)?;
        self.inner.select_samples(asset_uuids).await
    }

    async fn select_asset_metadata(&self, asset_uuids: &[String]) -> Result<Vec<AssetMetadata>> {
        Self::take(&self.reads_left)?;
        self.inner.select_asset_metadata(asset_uuids).await
    }
}
