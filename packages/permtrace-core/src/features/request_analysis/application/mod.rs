//! Request Analysis Application Layer
//!
//! `RequestAnalysisService` orchestrates the ports and infrastructure
//! components in two strictly sequential phases:
//!
//! 1. **Discovery and resolution**: find every call to the request API from
//!    application code, attribute a permission to each caller, backtrace a
//!    witness path, and record the findings without duplicate keys.
//! 2. **Explanation enrichment**: for every attributed finding, collect
//!    candidate rationale text.
//!
//! Phase 2 only starts once phase 1 has produced the complete, deduplicated
//! list.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::domain::{AnalyzedApk, RequestAnalysis};
use super::infrastructure::{ExplanationFinder, PathBacktracer, PermissionResolver};
use super::ports::{CallGraphPort, ExplanationClassifier, ResourceTablePort};
use crate::config::{RequestAnalysisConfig, Validatable};
use crate::errors::Result;
use crate::shared::models::MethodSite;

/// A request API method and the application methods calling it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRequest {
    pub request_method: MethodSite,
    /// Non-SDK callers, first occurrence order
    pub callers: Vec<MethodSite>,
}

/// Request Analysis Service - Main Application Service
///
/// ## Example
/// ```rust,ignore
/// use permtrace_core::{AnalyzedApk, InMemoryAppIndex, RequestAnalysisService};
///
/// let index = InMemoryAppIndex::from_json_file("app-index.json")?;
/// let classifier = |permission: &str, text: &str| my_model.accepts(permission, text);
/// let service = RequestAnalysisService::new(&index, &index, &classifier);
///
/// let mut apk = AnalyzedApk::new("com.app", manifest.permissions());
/// service.run(&mut apk, "com.app.MainActivity")?;
/// ```
pub struct RequestAnalysisService<'a, G, R, C>
where
    G: CallGraphPort + ?Sized,
    R: ResourceTablePort + ?Sized,
    C: ExplanationClassifier + ?Sized,
{
    graph: &'a G,
    resources: &'a R,
    classifier: &'a C,
    config: RequestAnalysisConfig,
}

impl<'a, G, R, C> RequestAnalysisService<'a, G, R, C>
where
    G: CallGraphPort + ?Sized,
    R: ResourceTablePort + ?Sized,
    C: ExplanationClassifier + ?Sized,
{
    /// Create a service with the default configuration
    pub fn new(graph: &'a G, resources: &'a R, classifier: &'a C) -> Self {
        Self {
            graph,
            resources,
            classifier,
            config: RequestAnalysisConfig::default(),
        }
    }

    /// Replace the configuration (builder pattern)
    pub fn with_config(mut self, config: RequestAnalysisConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &RequestAnalysisConfig {
        &self.config
    }

    /// Run both phases, appending findings to `apk`.
    ///
    /// `entry_component` is a substring of the entry component's class name.
    /// On error `apk` is left as it was.
    pub fn run(&self, apk: &mut AnalyzedApk, entry_component: &str) -> Result<()> {
        info!("Starting request analysis...");

        let mut staged = apk.clone();
        let added = self.analyze_requests(&mut staged, entry_component)?;
        info!("Recorded {} permission requests", added);
        self.analyze_explanations(&mut staged)?;

        *apk = staged;
        Ok(())
    }

    /// Request API methods in platform code and their application callers
    pub fn discover_requests(&self) -> Vec<DiscoveredRequest> {
        let mut discovered = Vec::new();

        for request_method in self.graph.find_methods_by_name(&self.config.request_method_name) {
            if !self.config.is_platform_site(&request_method) {
                debug!("Skipping non-platform request method {}", request_method);
                continue;
            }
            debug!("Request: {}", request_method);

            let mut callers: Vec<MethodSite> = Vec::new();
            for edge in self.graph.callers_of(&request_method) {
                if self.config.is_sdk_site(&edge.caller) {
                    continue;
                }
                if !callers.contains(&edge.caller) {
                    debug!("XREF from: {}", edge.caller);
                    callers.push(edge.caller);
                }
            }

            discovered.push(DiscoveredRequest {
                request_method,
                callers,
            });
        }

        discovered
    }

    /// Phase 1: resolve every discovered caller into `apk`.
    ///
    /// Returns how many findings were added; findings whose key is already
    /// present are dropped.
    pub fn analyze_requests(&self, apk: &mut AnalyzedApk, entry_component: &str) -> Result<usize> {
        let work: Vec<(MethodSite, MethodSite)> = self
            .discover_requests()
            .into_iter()
            .flat_map(|d| {
                let request = d.request_method;
                d.callers.into_iter().map(move |caller| (request.clone(), caller))
            })
            .collect();

        let permissions = &apk.requested_permissions_from_manifest;
        let package = apk.package_name.as_str();
        let per_caller = self.resolve_all(&work, permissions, package, entry_component)?;

        let mut added = 0;
        for analysis in per_caller.into_iter().flatten() {
            if apk.push_request(analysis) {
                added += 1;
            }
        }
        Ok(added)
    }

    #[cfg(feature = "parallel")]
    fn resolve_all(
        &self,
        work: &[(MethodSite, MethodSite)],
        permissions: &BTreeSet<String>,
        package: &str,
        entry_component: &str,
    ) -> Result<Vec<Vec<RequestAnalysis>>> {
        if self.config.parallel {
            return work
                .par_iter()
                .map(|(request, caller)| {
                    self.analyze_caller(request, caller, permissions, package, entry_component)
                })
                .collect();
        }
        self.resolve_sequential(work, permissions, package, entry_component)
    }

    #[cfg(not(feature = "parallel"))]
    fn resolve_all(
        &self,
        work: &[(MethodSite, MethodSite)],
        permissions: &BTreeSet<String>,
        package: &str,
        entry_component: &str,
    ) -> Result<Vec<Vec<RequestAnalysis>>> {
        self.resolve_sequential(work, permissions, package, entry_component)
    }

    fn resolve_sequential(
        &self,
        work: &[(MethodSite, MethodSite)],
        permissions: &BTreeSet<String>,
        package: &str,
        entry_component: &str,
    ) -> Result<Vec<Vec<RequestAnalysis>>> {
        work.iter()
            .map(|(request, caller)| {
                self.analyze_caller(request, caller, permissions, package, entry_component)
            })
            .collect()
    }

    /// Findings for one `(request, caller)` call site
    pub fn analyze_caller(
        &self,
        request: &MethodSite,
        caller: &MethodSite,
        permissions: &BTreeSet<String>,
        package: &str,
        entry_component: &str,
    ) -> Result<Vec<RequestAnalysis>> {
        let source = self.graph.source_of(caller).unwrap_or_default();
        let resolver = PermissionResolver::new(self.graph, self.resources, &self.config, package);
        let matches = resolver.resolve(caller, &source, permissions)?;

        if matches.is_empty() && self.config.is_sdk_site(caller) {
            return Ok(Vec::new());
        }

        let tracer = PathBacktracer::new(self.graph, entry_component);
        let path = tracer.trace_through(request, caller);

        if matches.is_empty() {
            let unknown = RequestAnalysis::unknown(request.clone(), caller.clone(), &source)
                .with_path(path);
            info!("Unknown permission requested from {}", caller);
            return Ok(vec![unknown]);
        }

        Ok(matches
            .into_iter()
            .map(|m| {
                RequestAnalysis::new(m.permission, request.clone(), caller.clone(), m.tier)
                    .with_path(path.clone())
            })
            .collect())
    }

    /// Phase 2: attach explanations to every attributed finding
    pub fn analyze_explanations(&self, apk: &mut AnalyzedApk) -> Result<()> {
        let finder = ExplanationFinder::new(
            self.graph,
            self.resources,
            self.classifier,
            &self.config,
            &apk.package_name,
        );

        let mut explanations = Vec::with_capacity(apk.analyzed_requests.len());
        for request in &apk.analyzed_requests {
            if request.is_unknown() {
                explanations.push(None);
            } else {
                explanations.push(Some(finder.find_explanations(request)?));
            }
        }

        for (request, found) in apk.analyzed_requests.iter_mut().zip(explanations) {
            if let Some(found) = found {
                request.explanation = found;
            }
        }
        Ok(())
    }
}
