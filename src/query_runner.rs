//! `query`: times batched reads of randomly chosen assets.

use crate::asset::AssetTarget;
use crate::asset_store::AssetStore;
use crate::context::RunContext;
use crate::error::{DbTestError, Result};
use crate::report::LatencyReport;
use rand::Rng;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, error, info, info_span, Instrument};

pub const DEFAULT_MAX_DRAWS: u64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub target: AssetTarget,
    /// Number of trials.
    pub sample_size: u32,
    /// Distinct assets fetched per trial.
    pub retrieve_size: usize,
    /// Upper bound on random id draws per trial.
    pub max_draws: u64,
}

/// Picks `num` distinct asset uuids from the target table by drawing random
/// ids in `[1, max(id)]`.
///
/// Each id is looked up at most once and ids with no row are skipped. Fails
/// once every id has been tried, or after `max_draws` draws, rather than
/// spinning on a table that holds fewer than `num` assets.
pub async fn sample_asset_uuids<R: Rng + ?Sized>(
    store: &dyn AssetStore,
    target: AssetTarget,
    num: usize,
    max_draws: u64,
    rng: &mut R,
) -> Result<Vec<String>> {
    info!("retrieving uuids");
    let table = target.table_name();
    if num == 0 {
        return Ok(Vec::new());
    }

    let max_id = match store.max_id(target).await {
        Ok(Some(max_id)) if max_id > 0 => max_id,
        Ok(_) => return Err(DbTestError::EmptyTable(table)),
        Err(err) => {
            error!("failed getting record count: {}", err);
            return Err(err);
        }
    };

    let mut attempted: HashSet<i64> = HashSet::new();
    let mut seen: HashSet<String> = HashSet::with_capacity(num);
    let mut uuids = Vec::with_capacity(num);
    let mut draws: u64 = 0;

    while uuids.len() < num {
        if attempted.len() as i64 >= max_id {
            return Err(DbTestError::SamplingExhausted {
                table,
                requested: num,
                found: uuids.len(),
            });
        }
        if draws >= max_draws {
            return Err(DbTestError::DrawLimitReached {
                table,
                draws,
                requested: num,
                found: uuids.len(),
            });
        }
        draws += 1;

        let id = rng.random_range(1..=max_id);
        if !attempted.insert(id) {
            continue;
        }
        match store.asset_uuid_by_id(target, id).await {
            Ok(Some(uuid)) => {
                if seen.insert(uuid.clone()) {
                    uuids.push(uuid);
                }
            }
            Ok(None) => debug!("no row with id {} in {}", id, table),
            Err(err) => {
                error!("failed getting asset_uuid: {}", err);
                return Err(err);
            }
        }
    }

    info!(draws, "retrieved uuids");
    Ok(uuids)
}

/// Issues the batched read for `asset_uuids`, returning the number of rows.
async fn fetch_batch(
    store: &dyn AssetStore,
    target: AssetTarget,
    asset_uuids: &[String],
) -> Result<usize> {
    match target {
        AssetTarget::Sample => Ok(store.select_samples(asset_uuids).await?.len()),
        AssetTarget::Metadata => Ok(store.select_asset_metadata(asset_uuids).await?.len()),
    }
}

/// Runs `options.sample_size` trials. Only the batched read is timed.
///
/// The first failure ends the run and the timings gathered so far are
/// dropped with it.
pub async fn run_queries<R: Rng + ?Sized>(
    ctx: &RunContext,
    store: &dyn AssetStore,
    options: &QueryOptions,
    rng: &mut R,
) -> Result<LatencyReport> {
    let span = info_span!(
        parent: ctx.span(),
        "query",
        table = options.target.table_name(),
        sample_size = options.sample_size,
        retrieve_size = options.retrieve_size
    );
    async {
        let mut timings = Vec::with_capacity(options.sample_size as usize);
        for trial in 0..options.sample_size {
            let uuids = sample_asset_uuids(
                store,
                options.target,
                options.retrieve_size,
                options.max_draws,
                rng,
            )
            .await?;
            debug!("running query with uuids {:?}", uuids);

            let start = Instant::now();
            let rows = match fetch_batch(store, options.target, &uuids).await {
                Ok(rows) => rows,
                Err(err) => {
                    error!("failed running query: {}", err);
                    return Err(err);
                }
            };
            let took = start.elapsed();
            info!(trial, rows, "query completed in {}ms", took.as_millis());
            timings.push(took);
        }
        Ok(LatencyReport::new(timings))
    }
    .instrument(span)
    .await
}
