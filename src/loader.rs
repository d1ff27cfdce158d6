//! `dbload`: fills the sample or metadata table with synthetic assets.

use crate::asset::{AssetDataRow, AssetTarget, Sample};
use crate::asset_store::AssetStore;
use crate::context::RunContext;
use crate::error::{DbTestError, Result};
use rand::Rng;
use tracing::{error, info, info_span, Instrument};

pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub target: AssetTarget,
    pub records: u64,
    /// Log a progress line every this many records.
    pub progress_interval: u64,
}

/// Writes `options.records` synthetic assets, one statement at a time.
///
/// Stops at the first failed insert. Rows written before the failure stay in
/// the database and the returned [`DbTestError::LoadAborted`] says how many
/// records were complete.
pub async fn load<R: Rng + ?Sized>(
    ctx: &RunContext,
    store: &dyn AssetStore,
    options: &LoadOptions,
    rng: &mut R,
) -> Result<u64> {
    let span = info_span!(
        parent: ctx.span(),
        "load",
        table = options.target.table_name(),
        records = options.records
    );
    async {
        for i in 0..options.records {
            let written = match options.target {
                AssetTarget::Sample => store.insert_sample(&Sample::random(rng)).await,
                AssetTarget::Metadata => insert_asset(store, AssetDataRow::random_asset(rng)).await,
            };
            if let Err(err) = written {
                error!("failed executing insert: {}", err);
                return Err(DbTestError::LoadAborted {
                    completed: i,
                    source: Box::new(err),
                });
            }

            if is_progress_tick(i, options.progress_interval) {
                info!("completed {} records", i);
            }
        }
        info!("loaded {} records", options.records);
        Ok(options.records)
    }
    .instrument(span)
    .await
}

/// Progress is logged for the 0-based record index `i` when it is a multiple
/// of `interval`, so the first record always logs.
pub(crate) fn is_progress_tick(i: u64, interval: u64) -> bool {
    i % interval.max(1) == 0
}

async fn insert_asset(store: &dyn AssetStore, rows: [AssetDataRow; 4]) -> Result<()> {
    for row in rows.iter() {
        store.insert_asset_data(row).await?;
    }
    Ok(())
}
