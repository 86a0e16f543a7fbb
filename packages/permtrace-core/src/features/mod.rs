//! Feature modules

pub mod request_analysis;
