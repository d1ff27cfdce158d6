//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestDb, seeded_rng};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let db = TestDb::create();
//!     let mut rng = seeded_rng();
//!     // ...
//! }
//! ```

mod constants;
mod failing_store;
mod fixtures;

pub use constants::*;
#[allow(unused_imports)]
pub use failing_store::FailingStore;
pub use fixtures::{seeded_rng, TestDb};
