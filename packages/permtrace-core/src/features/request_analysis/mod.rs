//! Request Analysis - Permission Request Provenance (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  application    RequestAnalysisService (discovery → resolution  │
//! │                 → dedup, then explanation enrichment)           │
//! │  domain         RequestAnalysis, RequestKey, AnalyzedApk,       │
//! │                 VisitedSet                                      │
//! │  ports          CallGraphPort, ResourceTablePort,               │
//! │                 ExplanationClassifier                           │
//! │  infrastructure PathBacktracer, PermissionResolver,             │
//! │                 ExplanationFinder, InMemoryAppIndex             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let index = InMemoryAppIndex::from_json_file("index.json")?;
//! let classifier = |_: &str, text: &str| text.len() > 20;
//! let service = RequestAnalysisService::new(&index, &index, &classifier);
//!
//! let mut apk = AnalyzedApk::new("com.app", ["android.permission.CAMERA"]);
//! service.run(&mut apk, "com.app.MainActivity")?;
//! for finding in &apk.analyzed_requests {
//!     println!("{} via {:?}: {:?}", finding.permission, finding.tier, finding.path);
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{DiscoveredRequest, RequestAnalysisService};
pub use domain::{
    AnalyzedApk, RequestAnalysis, RequestKey, ResolutionTier, VisitedSet, UNKNOWN_PERMISSION,
};
pub use infrastructure::{
    AppIndexSnapshot, ExplanationFinder, InMemoryAppIndex, PathBacktracer, PermissionMatch,
    PermissionResolver,
};
pub use ports::{CallGraphPort, ExplanationClassifier, ResourceTablePort, StringTable};
