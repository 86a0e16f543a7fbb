/*
 * Permission Resolver
 *
 * Attributes a declared permission to an application method that calls the
 * runtime permission request API. Tiers escalate; a tier runs only when every
 * earlier tier found nothing.
 *
 * Tier 1 (literal):     the permission string occurs in the caller's text
 * Tier 2 (resource id): a 10-digit id in the caller's text resolves, in the
 *                       default-locale table, to exactly the permission
 * Tier 3 (string xref): a string literal containing the permission is loaded
 *                       by a method whose base class equals the caller's
 *
 * An empty result is the unknown-permission outcome; the caller decides
 * what to record for it.
 */

use std::collections::BTreeSet;
use tracing::{debug, info};

use super::super::domain::ResolutionTier;
use super::super::ports::{CallGraphPort, ResourceTablePort, StringTable};
use crate::config::RequestAnalysisConfig;
use crate::errors::{PermtraceError, Result};
use crate::shared::models::MethodSite;
use crate::shared::utils::find_resource_ids;

/// A declared permission attributed to a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMatch {
    pub permission: String,
    pub tier: ResolutionTier,
}

impl PermissionMatch {
    fn new(permission: impl Into<String>, tier: ResolutionTier) -> Self {
        Self {
            permission: permission.into(),
            tier,
        }
    }
}

/// Three-tier heuristic cascade over one application's index
pub struct PermissionResolver<'a, G: CallGraphPort + ?Sized, R: ResourceTablePort + ?Sized> {
    graph: &'a G,
    resources: &'a R,
    config: &'a RequestAnalysisConfig,
    package: &'a str,
}

impl<'a, G, R> PermissionResolver<'a, G, R>
where
    G: CallGraphPort + ?Sized,
    R: ResourceTablePort + ?Sized,
{
    pub fn new(
        graph: &'a G,
        resources: &'a R,
        config: &'a RequestAnalysisConfig,
        package: &'a str,
    ) -> Self {
        Self {
            graph,
            resources,
            config,
            package,
        }
    }

    /// Permissions `caller` requests, from the first tier that finds any.
    ///
    /// `caller_source` is the caller's decompiled text. Fails only when tier 2
    /// is reached and the package has no default-locale string table.
    pub fn resolve(
        &self,
        caller: &MethodSite,
        caller_source: &str,
        permissions: &BTreeSet<String>,
    ) -> Result<Vec<PermissionMatch>> {
        let literal = self.match_literals(caller_source, permissions);
        if !literal.is_empty() {
            return Ok(literal);
        }

        let resource = self.match_resource_ids(caller_source, permissions)?;
        if !resource.is_empty() {
            return Ok(resource);
        }

        Ok(self.match_string_xrefs(caller, permissions))
    }

    /// Tier 1
    pub fn match_literals(&self, source: &str, permissions: &BTreeSet<String>) -> Vec<PermissionMatch> {
        permissions
            .iter()
            .filter(|permission| source.contains(permission.as_str()))
            .inspect(|permission| debug!("Found permission {} as literal", permission))
            .map(|permission| PermissionMatch::new(permission.as_str(), ResolutionTier::Literal))
            .collect()
    }

    /// Tier 2
    pub fn match_resource_ids(
        &self,
        source: &str,
        permissions: &BTreeSet<String>,
    ) -> Result<Vec<PermissionMatch>> {
        let table = self.string_table()?;
        let ids = find_resource_ids(source);
        debug!("Found IDs: {:?}", ids);

        let mut matches: Vec<PermissionMatch> = Vec::new();
        for id in ids {
            let Some(value) = table.resolve(id) else {
                continue;
            };
            if permissions.contains(&value) && !matches.iter().any(|m| m.permission == value) {
                info!("Found permission {} via resource {}", value, id);
                matches.push(PermissionMatch::new(value, ResolutionTier::ResourceId));
            }
        }
        Ok(matches)
    }

    /// Tier 3
    pub fn match_string_xrefs(
        &self,
        caller: &MethodSite,
        permissions: &BTreeSet<String>,
    ) -> Vec<PermissionMatch> {
        let separator = self.config.nested_class_separator;
        let base_class = caller.base_class(separator);
        let literals = self.graph.string_literals();

        let mut matches = Vec::new();
        for permission in permissions {
            let related = literals
                .iter()
                .filter(|literal| literal.value.contains(permission.as_str()))
                .flat_map(|literal| literal.xref_from.iter())
                .any(|site| site.base_class(separator) == base_class);

            if related {
                info!("Found permission {} by base class comparison", permission);
                matches.push(PermissionMatch::new(permission.as_str(), ResolutionTier::StringXref));
            }
        }
        matches
    }

    fn string_table(&self) -> Result<StringTable<'a, R>> {
        let locale = self.config.default_locale.as_str();
        StringTable::open(self.resources, self.package, locale)
            .ok_or_else(|| PermtraceError::missing_string_table(self.package, locale))
    }
}
