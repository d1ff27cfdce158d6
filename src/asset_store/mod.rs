mod mysql_store;
mod schema;
mod sqlite_store;
mod trait_def;

pub use mysql_store::MySqlAssetStore;
pub use schema::ASSET_VERSIONED_SCHEMAS;
pub use sqlite_store::SqliteAssetStore;
pub use trait_def::AssetStore;

use crate::dsn::{Dsn, SqliteLocation};
use anyhow::{Context, Result};
use tracing::info;

/// Open the store a DSN points at. One connection per invocation.
pub async fn open_store(dsn: &Dsn) -> Result<Box<dyn AssetStore>> {
    info!("Opening asset store at {}", dsn);
    let store: Box<dyn AssetStore> = match dsn {
        Dsn::MySql(mysql) => Box::new(
            MySqlAssetStore::connect(mysql)
                .await
                .with_context(|| format!("Failed to connect to {}", dsn))?,
        ),
        Dsn::Sqlite(SqliteLocation::Memory) => Box::new(SqliteAssetStore::open_in_memory()?),
        Dsn::Sqlite(SqliteLocation::File(path)) => Box::new(SqliteAssetStore::open(path)?),
    };
    Ok(store)
}
