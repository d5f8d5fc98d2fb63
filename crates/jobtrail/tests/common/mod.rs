//! Shared test utilities for jobtrail integration tests.
//!
//! This module provides:
//! - `TestHarness` for running the engine against a temp output directory
//! - Builders for messages, label assignments and configurations

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
