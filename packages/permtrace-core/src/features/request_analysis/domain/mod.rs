//! Request Analysis Domain Models
//!
//! - `RequestAnalysis`: one permission request finding
//! - `RequestKey`: the dedup identity of a finding
//! - `AnalyzedApk`: the accumulator threaded through the pipeline
//! - `VisitedSet`: branch-local cycle guard for backtracing

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::shared::models::MethodSite;

/// Permission label for requests no heuristic could attribute
pub const UNKNOWN_PERMISSION: &str = "Unknown Permission";

// ═══════════════════════════════════════════════════════════════════════════
// Resolution Tier
// ═══════════════════════════════════════════════════════════════════════════

/// Heuristic that attributed a permission to a call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    /// Permission string appears verbatim in the caller
    Literal,
    /// A resource id in the caller resolves to the permission string
    ResourceId,
    /// A literal holding the permission is loaded from the caller's base class
    StringXref,
    /// Nothing matched
    Unknown,
}

impl ResolutionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::ResourceId => "resource_id",
            Self::StringXref => "string_xref",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Request Analysis
// ═══════════════════════════════════════════════════════════════════════════

/// Dedup identity of a finding: `(permission, request_method, caller)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey {
    pub permission: String,
    pub request_method: MethodSite,
    pub caller: MethodSite,
}

/// One permission request finding
///
/// Two findings with the same [`RequestKey`] are the same finding no matter
/// how their path or explanations differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestAnalysis {
    /// Declared permission, or [`UNKNOWN_PERMISSION`]
    pub permission: String,

    /// The request API that was invoked
    pub request_method: MethodSite,

    /// The application method issuing the request
    pub caller: MethodSite,

    /// Request method up to the entry component; empty when no path exists
    #[serde(default)]
    pub path: Vec<MethodSite>,

    /// Candidate rationale strings, first occurrence order
    #[serde(default)]
    pub explanation: Vec<String>,

    /// Diagnostic text, only set for unknown permissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Which heuristic produced the finding
    pub tier: ResolutionTier,
}

impl RequestAnalysis {
    pub fn new(
        permission: impl Into<String>,
        request_method: MethodSite,
        caller: MethodSite,
        tier: ResolutionTier,
    ) -> Self {
        Self {
            permission: permission.into(),
            request_method,
            caller,
            path: Vec::new(),
            explanation: Vec::new(),
            reason: None,
            tier,
        }
    }

    /// Finding for a request no tier could attribute
    pub fn unknown(request_method: MethodSite, caller: MethodSite, caller_source: &str) -> Self {
        let mut analysis = Self::new(
            UNKNOWN_PERMISSION,
            request_method,
            caller,
            ResolutionTier::Unknown,
        );
        analysis.reason = Some(format!(
            "Could not identify requested permission:\n {}",
            caller_source
        ));
        analysis
    }

    pub fn with_path(mut self, path: Vec<MethodSite>) -> Self {
        self.path = path;
        self
    }

    pub fn key(&self) -> RequestKey {
        RequestKey {
            permission: self.permission.clone(),
            request_method: self.request_method.clone(),
            caller: self.caller.clone(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.permission == UNKNOWN_PERMISSION
    }

    fn same_key(&self, other: &RequestAnalysis) -> bool {
        self.permission == other.permission
            && self.request_method == other.request_method
            && self.caller == other.caller
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Analyzed APK
// ═══════════════════════════════════════════════════════════════════════════

/// Accumulator passed through the analysis pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzedApk {
    /// Application package; selects the resolved-string table
    pub package_name: String,

    /// Permissions declared in the manifest
    pub requested_permissions_from_manifest: BTreeSet<String>,

    /// Findings in discovery order, unique by [`RequestKey`]
    #[serde(default)]
    pub analyzed_requests: Vec<RequestAnalysis>,
}

impl AnalyzedApk {
    pub fn new<I, S>(package_name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            package_name: package_name.into(),
            requested_permissions_from_manifest: permissions.into_iter().map(Into::into).collect(),
            analyzed_requests: Vec::new(),
        }
    }

    pub fn contains_key(&self, key: &RequestKey) -> bool {
        self.analyzed_requests.iter().any(|r| {
            r.permission == key.permission
                && r.request_method == key.request_method
                && r.caller == key.caller
        })
    }

    /// Append `analysis` unless a finding with the same key exists.
    ///
    /// Returns whether the finding was added.
    pub fn push_request(&mut self, analysis: RequestAnalysis) -> bool {
        if self.analyzed_requests.iter().any(|r| r.same_key(&analysis)) {
            return false;
        }
        self.analyzed_requests.push(analysis);
        true
    }

    /// Findings attributed to a declared permission
    pub fn resolved_requests(&self) -> impl Iterator<Item = &RequestAnalysis> {
        self.analyzed_requests.iter().filter(|r| !r.is_unknown())
    }

    /// Findings no heuristic could attribute
    pub fn unknown_requests(&self) -> impl Iterator<Item = &RequestAnalysis> {
        self.analyzed_requests.iter().filter(|r| r.is_unknown())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Visited Set
// ═══════════════════════════════════════════════════════════════════════════

/// Sites already on the current backtrace branch
///
/// Extending returns a new set that shares structure with the old one, so a
/// caller's set is never changed by what its siblings explore.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    sites: im::HashSet<MethodSite>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, site: &MethodSite) -> bool {
        self.sites.contains(site)
    }

    /// This set plus `site`
    pub fn with(&self, site: &MethodSite) -> Self {
        Self {
            sites: self.sites.update(site.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(class: &str, name: &str) -> MethodSite {
        MethodSite::new(class, name, "()V")
    }

    #[test]
    fn test_push_request_dedups_on_key_only() {
        let mut apk = AnalyzedApk::new("com.app", ["CAMERA"]);
        let request = site("Landroid/app/Activity;", "requestPermissions");
        let caller = site("Lcom/app/Helper;", "askCamera");

        let first = RequestAnalysis::new("CAMERA", request.clone(), caller.clone(), ResolutionTier::Literal)
            .with_path(vec![request.clone()]);
        let second = RequestAnalysis::new("CAMERA", request.clone(), caller.clone(), ResolutionTier::StringXref);

        assert!(apk.push_request(first));
        assert!(!apk.push_request(second));
        assert_eq!(apk.analyzed_requests.len(), 1);
        // first found wins
        assert_eq!(apk.analyzed_requests[0].tier, ResolutionTier::Literal);
        assert_eq!(apk.analyzed_requests[0].path.len(), 1);
    }

    #[test]
    fn test_distinct_callers_are_distinct_findings() {
        let mut apk = AnalyzedApk::default();
        let request = site("Landroid/app/Activity;", "requestPermissions");

        assert!(apk.push_request(RequestAnalysis::new(
            "CAMERA",
            request.clone(),
            site("Lcom/app/A;", "a"),
            ResolutionTier::Literal,
        )));
        assert!(apk.push_request(RequestAnalysis::new(
            "CAMERA",
            request,
            site("Lcom/app/B;", "b"),
            ResolutionTier::Literal,
        )));
        assert_eq!(apk.analyzed_requests.len(), 2);
    }

    #[test]
    fn test_unknown_record_carries_reason() {
        let analysis = RequestAnalysis::unknown(
            site("Landroid/app/Activity;", "requestPermissions"),
            site("Lcom/app/Helper;", "ask"),
            "requestPermissions(perms, 1);",
        );
        assert!(analysis.is_unknown());
        assert_eq!(analysis.tier, ResolutionTier::Unknown);
        let reason = analysis.reason.unwrap();
        assert!(reason.starts_with("Could not identify requested permission:"));
        assert!(reason.contains("requestPermissions(perms, 1);"));
    }

    #[test]
    fn test_key_ignores_path_and_explanation() {
        let request = site("Landroid/app/Activity;", "requestPermissions");
        let caller = site("Lcom/app/Helper;", "askCamera");
        let mut a = RequestAnalysis::new("CAMERA", request.clone(), caller.clone(), ResolutionTier::Literal);
        let b = RequestAnalysis::new("CAMERA", request, caller, ResolutionTier::ResourceId);
        a.explanation.push("We need the camera".to_string());

        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_visited_extension_is_branch_local() {
        let root = VisitedSet::new().with(&site("Lcom/app/R;", "r"));
        let left = root.with(&site("Lcom/app/L;", "l"));
        let right = root.with(&site("Lcom/app/Q;", "q"));

        assert_eq!(root.len(), 1);
        assert!(left.contains(&site("Lcom/app/L;", "l")));
        assert!(!right.contains(&site("Lcom/app/L;", "l")));
        assert!(!root.contains(&site("Lcom/app/Q;", "q")));
    }

    #[test]
    fn test_serialized_record_omits_empty_reason() {
        let analysis = RequestAnalysis::new(
            "CAMERA",
            site("Landroid/app/Activity;", "requestPermissions"),
            site("Lcom/app/Helper;", "askCamera"),
            ResolutionTier::Literal,
        );
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(!json.contains("reason"));
        assert!(json.contains("\"tier\":\"literal\""));
    }
}
