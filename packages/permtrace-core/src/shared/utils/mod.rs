//! Text utilities over decompiled method bodies

pub mod resource_ids;

pub use resource_ids::find_resource_ids;
