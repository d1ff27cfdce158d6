//! SQLite schema mirroring the MySQL tables the tool expects to find.
//!
//! `id` columns are integer rowids, so they start at 1 and grow densely as
//! long as nothing is deleted.

use crate::asset::MetadataField;
use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, SqlType, Table, VersionedSchema};
use anyhow::Result;
use rusqlite::{params, Connection};

const SAMPLE_TABLE: Table = Table {
    name: "sample",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("uuid", &SqlType::Text, non_null = true),
        sqlite_column!("asset_uuid", &SqlType::Text, non_null = true),
        sqlite_column!("chord", &SqlType::Text, non_null = true),
        sqlite_column!("skey", &SqlType::Text, non_null = true),
        sqlite_column!("bpm", &SqlType::Integer, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_sample_asset_uuid", "asset_uuid")],
    unique_constraints: &[&["uuid"]],
};

/// Definitions of the four attribute ids.
const METADATA_TABLE: Table = Table {
    name: "metadata",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("datatype", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

const METADATA_FK: ForeignKey = ForeignKey {
    foreign_table: "metadata",
    foreign_column: "id",
};

const ASSET_DATA_TABLE: Table = Table {
    name: "asset_data",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("asset_uuid", &SqlType::Text, non_null = true),
        sqlite_column!(
            "asset_metadata_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&METADATA_FK)
        ),
        sqlite_column!("value", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_asset_data_asset_uuid", "asset_uuid")],
    unique_constraints: &[&["asset_uuid", "asset_metadata_id"]],
};

fn seed_metadata_definitions(conn: &Connection) -> Result<()> {
    for field in MetadataField::ALL {
        conn.execute(
            "INSERT INTO metadata (id, name, datatype) VALUES (?1, ?2, ?3)",
            params![field.id(), field.name(), field.datatype()],
        )?;
    }
    Ok(())
}

pub const ASSET_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SAMPLE_TABLE, METADATA_TABLE, ASSET_DATA_TABLE],
    seed: Some(seed_metadata_definitions),
}];
