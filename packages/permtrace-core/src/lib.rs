/*
 * permtrace - Permission Request Provenance Analysis
 *
 * Static analysis over a mobile application's call graph and resources:
 * - locate calls to the runtime permission request API
 * - attribute each call to a declared permission (tiered heuristics)
 * - backtrace a witness path to the entry component
 * - collect candidate rationale text shown with the request
 *
 * Layout:
 * - shared/    : MethodSite, CallEdge, StringLiteralRef, text utilities
 * - features/  : request_analysis (domain, ports, application, infrastructure)
 * - config/    : RequestAnalysisConfig (YAML v1)
 * - errors     : PermtraceError
 */

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, RequestAnalysisConfig};
pub use errors::{PermtraceError, Result};
pub use features::request_analysis::{
    AnalyzedApk, CallGraphPort, ExplanationClassifier, InMemoryAppIndex, PathBacktracer,
    PermissionResolver, RequestAnalysis, RequestAnalysisService, RequestKey, ResolutionTier,
    ResourceTablePort, VisitedSet, UNKNOWN_PERMISSION,
};
pub use shared::models::{CallEdge, MethodSite, StringLiteralRef};
