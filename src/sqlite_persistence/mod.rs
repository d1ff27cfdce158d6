mod versioned_schema;

pub use versioned_schema::{Column, ForeignKey, SqlType, Table, VersionedSchema};

/// Offset added to the schema version stored in `PRAGMA user_version`,
/// so a database created by another tool is never mistaken for ours.
pub const BASE_DB_VERSION: usize = 700;
