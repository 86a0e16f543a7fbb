//! Request analysis configuration
//!
//! Defaults reproduce the Android conventions the analysis was designed
//! around (`requestPermission*` entry points, `android`/`java`/`kotlin` SDK
//! namespaces, `DEFAULT` resource locale). Teams with a different platform
//! layer override them through the builder or a versioned YAML file.
//!
//! # Examples
//!
//! ```rust,ignore
//! use permtrace_core::config::RequestAnalysisConfig;
//!
//! // Defaults
//! let config = RequestAnalysisConfig::default();
//!
//! // Builder overrides
//! let config = RequestAnalysisConfig::default()
//!     .with_default_locale("en")
//!     .with_parallel(true);
//!
//! // YAML
//! let config = RequestAnalysisConfig::from_yaml("permtrace.yaml")?;
//! ```

pub mod error;
pub mod io;
pub mod request_config;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigExportV1;
pub use request_config::RequestAnalysisConfig;
pub use validation::Validatable;
