#![allow(dead_code)]

//! Shared constants for the integration tests.

/// Seed for every deterministic random source in the suite.
pub const TEST_SEED: u64 = 0x5eed;

/// Progress interval used by test loads, matching the CLI default.
pub const TEST_PROGRESS_INTERVAL: u64 = 10;

/// Draw cap small enough that a runaway sampling loop fails fast.
pub const TEST_MAX_DRAWS: u64 = 10_000;
