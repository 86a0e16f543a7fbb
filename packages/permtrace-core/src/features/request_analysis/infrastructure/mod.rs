//! Request analysis infrastructure
//!
//! - `backtracer`: witness paths to the entry component
//! - `permission_resolver`: tiered permission attribution
//! - `explanation_finder`: rationale text discovery
//! - `in_memory_index`: petgraph-backed port adapter

pub mod backtracer;
pub mod explanation_finder;
pub mod in_memory_index;
pub mod permission_resolver;

pub use backtracer::PathBacktracer;
pub use explanation_finder::ExplanationFinder;
pub use in_memory_index::{AppIndexSnapshot, InMemoryAppIndex, MethodEntry, StringTableEntry};
pub use permission_resolver::{PermissionMatch, PermissionResolver};
