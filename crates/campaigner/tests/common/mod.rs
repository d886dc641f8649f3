//! Shared test utilities for campaigner integration tests.
//!
//! This module provides:
//! - `FakeRemote`, an in-memory implementation of every remote store
//! - Builder patterns for creating templates and CSV input programmatically

pub mod builders;
pub mod stores;

pub use builders::*;
pub use stores::FakeRemote;
