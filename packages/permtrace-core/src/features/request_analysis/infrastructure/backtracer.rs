/*
 * Path Backtracer
 *
 * Reverse reachability from a call site to the application's entry component.
 *
 * Depth-first over caller edges:
 * 1. A site already on the current branch closes a cycle: the branch yields nothing
 * 2. A site inside the entry component ends the path
 * 3. Otherwise every caller is tried in index order with the branch's visited
 *    set extended by the current site; the first non-empty result wins
 *
 * The visited set is persistent and branch-local. Sibling branches never see
 * each other's sites, so a site explored (and abandoned) under one caller is
 * still available to the next one.
 *
 * First match, not shortest path. An empty result means no acyclic path
 * exists from the site.
 */

use tracing::debug;

use super::super::domain::VisitedSet;
use super::super::ports::CallGraphPort;
use crate::shared::models::MethodSite;

/// Witness-path search toward the entry component
pub struct PathBacktracer<'a, G: CallGraphPort + ?Sized> {
    graph: &'a G,
    entry_component: &'a str,
}

impl<'a, G: CallGraphPort + ?Sized> PathBacktracer<'a, G> {
    /// `entry_component` is a substring of the entry component's class name
    pub fn new(graph: &'a G, entry_component: &'a str) -> Self {
        Self {
            graph,
            entry_component,
        }
    }

    /// Top-level search from `site`
    pub fn trace(&self, site: &MethodSite) -> Vec<MethodSite> {
        self.backtrace(site, &VisitedSet::new())
    }

    /// Path from `request` that goes through `caller` first.
    ///
    /// `caller` must be one of `request`'s callers; the result then starts
    /// with `request`, continues with `caller`, and ends in the entry component.
    pub fn trace_through(&self, request: &MethodSite, caller: &MethodSite) -> Vec<MethodSite> {
        if request.is_in_component(self.entry_component) {
            return vec![request.clone()];
        }

        let tail = self.backtrace(caller, &VisitedSet::new().with(request));
        if tail.is_empty() {
            debug!("No path from {} through {}", request, caller);
            return Vec::new();
        }

        let mut path = Vec::with_capacity(tail.len() + 1);
        path.push(request.clone());
        path.extend(tail);
        path
    }

    /// Search from `site`, skipping everything in `visited`
    pub fn backtrace(&self, site: &MethodSite, visited: &VisitedSet) -> Vec<MethodSite> {
        if visited.contains(site) {
            debug!("Cycle at {}, abandoning branch", site);
            return Vec::new();
        }

        if site.is_in_component(self.entry_component) {
            debug!("Reached entry component at {}", site);
            return vec![site.clone()];
        }

        let visited = visited.with(site);
        let callers = self.graph.callers_of(site);
        if callers.is_empty() {
            return Vec::new();
        }

        for edge in &callers {
            let tail = self.backtrace(&edge.caller, &visited);
            if !tail.is_empty() {
                let mut path = Vec::with_capacity(tail.len() + 1);
                path.push(site.clone());
                path.extend(tail);
                return path;
            }
        }

        Vec::new()
    }
}
