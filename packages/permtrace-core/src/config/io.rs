//! Configuration I/O (YAML schema)
//!
//! Loading and export live in request_config.rs next to the fields they touch.

use super::request_config::RequestAnalysisConfig;
use serde::{Deserialize, Serialize};

/// Current schema version
pub const SCHEMA_VERSION: u32 = 1;

/// YAML Schema v1
///
/// `version` is optional at the serde level so a missing field can be
/// reported as [`ConfigError::MissingVersion`](super::ConfigError::MissingVersion)
/// instead of a generic parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Request analysis overrides; defaults apply when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_analysis: Option<RequestAnalysisConfig>,
}
