//! MySQL-backed asset store.
//!
//! The `sample`, `asset_data` and `metadata` tables must already exist; this
//! store never creates or migrates schema.

use super::trait_def::{in_placeholders, AssetStore};
use crate::asset::{AssetDataRow, AssetMetadata, AssetTarget, Sample};
use crate::dsn::MySqlDsn;
use crate::error::Result;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

pub struct MySqlAssetStore {
    pool: MySqlPool,
}

impl MySqlAssetStore {
    /// Connects with a single pooled connection, reused for every statement.
    pub async fn connect(dsn: &MySqlDsn) -> Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(&dsn.host)
            .port(dsn.port)
            .username(&dsn.user)
            .database(&dsn.database);
        if let Some(password) = &dsn.password {
            options = options.password(password);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(MySqlAssetStore { pool })
    }
}

#[async_trait]
impl AssetStore for MySqlAssetStore {
    async fn insert_sample(&self, sample: &Sample) -> Result<()> {
        sqlx::query(
            "insert into sample (uuid, asset_uuid, chord, skey, bpm, name) values (?, ?, ?, ?, ?, ?)",
        )
        .bind(&sample.uuid)
        .bind(&sample.asset_uuid)
        .bind(&sample.chord)
        .bind(&sample.key)
        .bind(sample.bpm)
        .bind(&sample.name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_asset_data(&self, row: &AssetDataRow) -> Result<()> {
        sqlx::query("insert into asset_data (asset_uuid, asset_metadata_id, value) values (?, ?, ?)")
            .bind(&row.asset_uuid)
            .bind(row.field.id())
            .bind(&row.value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn max_id(&self, target: AssetTarget) -> Result<Option<i64>> {
        // The cast pins the column type to BIGINT whatever the id column is declared as.
        let max_id: Option<i64> = sqlx::query_scalar(&format!(
            "select cast(max(id) as signed) from {} limit 1",
            target.table_name()
        ))
        .fetch_one(&self.pool)
        .await?;
        Ok(max_id)
    }

    async fn asset_uuid_by_id(&self, target: AssetTarget, id: i64) -> Result<Option<String>> {
        let asset_uuid: Option<String> = sqlx::query_scalar(&format!(
            "select asset_uuid from {} where id = ? limit 1",
            target.table_name()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(asset_uuid)
    }

    async fn select_samples(&self, asset_uuids: &[String]) -> Result<Vec<Sample>> {
        if asset_uuids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "select uuid, asset_uuid, chord, skey, cast(bpm as signed) as bpm, name \
             from sample where asset_uuid in ({})",
            in_placeholders(asset_uuids.len())
        );
        let mut query = sqlx::query_as::<_, Sample>(&sql);
        for asset_uuid in asset_uuids {
            query = query.bind(asset_uuid);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn select_asset_metadata(&self, asset_uuids: &[String]) -> Result<Vec<AssetMetadata>> {
        if asset_uuids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "select ad.asset_uuid, cast(ad.asset_metadata_id as signed) as asset_metadata_id, \
             md.name, md.datatype, ad.value \
             from asset_data ad \
             join metadata md on ad.asset_metadata_id = md.id \
             where ad.asset_uuid in ({}) order by ad.asset_uuid",
            in_placeholders(asset_uuids.len())
        );
        let mut query = sqlx::query_as::<_, AssetMetadata>(&sql);
        for asset_uuid in asset_uuids {
            query = query.bind(asset_uuid);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }
}
