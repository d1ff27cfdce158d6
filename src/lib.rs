//! Asset DB test library
//!
//! Loads synthetic music assets into a database and measures how long batched
//! reads of them take. The `asset-dbtest` binary is a thin CLI over this crate.

pub mod asset;
pub mod asset_store;
pub mod config;
pub mod context;
pub mod dsn;
pub mod error;
pub mod loader;
pub mod logging;
pub mod query_runner;
pub mod report;
pub mod sqlite_persistence;

pub use asset_store::{open_store, AssetStore, MySqlAssetStore, SqliteAssetStore};
pub use context::RunContext;
pub use error::{DbTestError, Result};
