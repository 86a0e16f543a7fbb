//! Common test utilities for permtrace-core
//!
//! Shared fixtures, builders and assertions for integration tests.

#![allow(dead_code)]

mod assertions;
mod builders;
mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
