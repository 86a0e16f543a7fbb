/*
 * In-Memory App Index
 *
 * Adapter implementing both CallGraphPort and ResourceTablePort over data
 * exported by a bytecode front end (or assembled by hand in tests).
 *
 * - Call graph: petgraph DiGraph, one node per MethodSite, one edge per call
 *   (weight = bytecode offset). Parallel edges are kept.
 * - Edge enumeration follows insertion order, which the backtracer's
 *   first-match result depends on.
 * - Snapshot: serde JSON document (`AppIndexSnapshot`).
 */

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use super::super::ports::{CallGraphPort, ResourceTablePort};
use crate::errors::Result;
use crate::shared::models::{CallEdge, MethodSite, StringLiteralRef};

// ============================================================================
// Snapshot format
// ============================================================================

/// Serialized form of an application index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppIndexSnapshot {
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
    #[serde(default)]
    pub calls: Vec<CallEdge>,
    #[serde(default)]
    pub strings: Vec<StringLiteralRef>,
    #[serde(default)]
    pub resources: Vec<StringTableEntry>,
}

/// A method and its decompiled body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodEntry {
    #[serde(flatten)]
    pub site: MethodSite,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Resolved strings of one package/locale pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringTableEntry {
    pub package: String,
    pub locale: String,
    #[serde(default)]
    pub strings: BTreeMap<u64, String>,
}

// ============================================================================
// Index
// ============================================================================

type StringTables = FxHashMap<String, FxHashMap<String, FxHashMap<u64, String>>>;

/// Call graph, decompiled sources, string literals and resolved resources
#[derive(Debug, Default)]
pub struct InMemoryAppIndex {
    graph: DiGraph<MethodSite, u32>,
    nodes: FxHashMap<MethodSite, NodeIndex>,
    sources: FxHashMap<MethodSite, String>,
    strings: Vec<StringLiteralRef>,
    tables: StringTables,
}

impl InMemoryAppIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method; a no-op for known methods
    pub fn add_method(&mut self, site: &MethodSite) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(site) {
            return idx;
        }
        let idx = self.graph.add_node(site.clone());
        self.nodes.insert(site.clone(), idx);
        idx
    }

    /// Record that `caller` invokes `callee` at `offset`
    pub fn add_call(&mut self, caller: &MethodSite, callee: &MethodSite, offset: u32) {
        let from = self.add_method(caller);
        let to = self.add_method(callee);
        self.graph.add_edge(from, to, offset);
    }

    pub fn set_source(&mut self, site: &MethodSite, source: impl Into<String>) {
        self.add_method(site);
        self.sources.insert(site.clone(), source.into());
    }

    pub fn add_string_literal(&mut self, literal: StringLiteralRef) {
        for site in &literal.xref_from {
            self.add_method(site);
        }
        self.strings.push(literal);
    }

    /// Create an (initially empty) resolved-string table
    pub fn add_string_table(&mut self, package: &str, locale: &str) {
        self.tables
            .entry(package.to_string())
            .or_default()
            .entry(locale.to_string())
            .or_default();
    }

    pub fn add_resolved_string(
        &mut self,
        package: &str,
        locale: &str,
        id: u64,
        value: impl Into<String>,
    ) {
        self.tables
            .entry(package.to_string())
            .or_default()
            .entry(locale.to_string())
            .or_default()
            .insert(id, value.into());
    }

    pub fn method_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn call_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn from_snapshot(snapshot: AppIndexSnapshot) -> Self {
        let mut index = Self::new();

        for entry in snapshot.methods {
            index.add_method(&entry.site);
            if let Some(source) = entry.source {
                index.sources.insert(entry.site, source);
            }
        }
        for edge in snapshot.calls {
            index.add_call(&edge.caller, &edge.callee, edge.offset);
        }
        for literal in snapshot.strings {
            index.add_string_literal(literal);
        }
        for table in snapshot.resources {
            index.add_string_table(&table.package, &table.locale);
            for (id, value) in table.strings {
                index.add_resolved_string(&table.package, &table.locale, id, value);
            }
        }

        info!(
            "Loaded app index: {} methods, {} calls, {} string literals",
            index.method_count(),
            index.call_count(),
            index.strings.len()
        );
        index
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: AppIndexSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn edges(&self, site: &MethodSite, direction: Direction) -> Vec<CallEdge> {
        let Some(&idx) = self.nodes.get(site) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        edges.sort_by_key(|e| e.id().index());

        edges
            .into_iter()
            .map(|e| {
                CallEdge::new(
                    self.graph[e.source()].clone(),
                    self.graph[e.target()].clone(),
                    *e.weight(),
                )
            })
            .collect()
    }
}

impl CallGraphPort for InMemoryAppIndex {
    fn find_methods_by_name(&self, name: &str) -> Vec<MethodSite> {
        self.graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .filter(|site| site.name.starts_with(name))
            .cloned()
            .collect()
    }

    fn callers_of(&self, site: &MethodSite) -> Vec<CallEdge> {
        self.edges(site, Direction::Incoming)
    }

    fn callees_of(&self, site: &MethodSite) -> Vec<CallEdge> {
        self.edges(site, Direction::Outgoing)
    }

    fn source_of(&self, site: &MethodSite) -> Option<String> {
        self.sources.get(site).cloned()
    }

    fn string_literals(&self) -> &[StringLiteralRef] {
        &self.strings
    }
}

impl ResourceTablePort for InMemoryAppIndex {
    fn has_string_table(&self, package: &str, locale: &str) -> bool {
        self.tables
            .get(package)
            .is_some_and(|locales| locales.contains_key(locale))
    }

    fn resolve_string(&self, package: &str, locale: &str, id: u64) -> Option<String> {
        self.tables.get(package)?.get(locale)?.get(&id).cloned()
    }
}
