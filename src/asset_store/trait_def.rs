//! AssetStore trait definition.
//!
//! The loader and the query runner only talk to the database through this
//! trait, so the same workflows run against MySQL or a local SQLite file.

use crate::asset::{AssetDataRow, AssetMetadata, AssetTarget, Sample};
use crate::error::Result;
use async_trait::async_trait;

/// Storage backend for synthetic assets.
///
/// Every call is a single autocommitted statement; implementations never
/// open transactions and never retry.
#[async_trait]
pub trait AssetStore: Send + Sync {
    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert one row into the `sample` table.
    async fn insert_sample(&self, sample: &Sample) -> Result<()>;

    /// Insert one row into the `asset_data` table.
    async fn insert_asset_data(&self, row: &AssetDataRow) -> Result<()>;

    // =========================================================================
    // Identifier lookups
    // =========================================================================

    /// Highest `id` of the target table, `None` when the table is empty.
    async fn max_id(&self, target: AssetTarget) -> Result<Option<i64>>;

    /// The `asset_uuid` stored at `id`, `None` when no row has that id.
    async fn asset_uuid_by_id(&self, target: AssetTarget, id: i64) -> Result<Option<String>>;

    // =========================================================================
    // Batched reads
    // =========================================================================

    /// All samples whose asset uuid is in `asset_uuids`.
    async fn select_samples(&self, asset_uuids: &[String]) -> Result<Vec<Sample>>;

    /// All attribute rows, joined with their definitions, of the given assets,
    /// ordered by asset uuid.
    async fn select_asset_metadata(&self, asset_uuids: &[String]) -> Result<Vec<AssetMetadata>>;
}

/// `?, ?, ?` for an `IN (...)` clause of `count` parameters.
pub(crate) fn in_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
