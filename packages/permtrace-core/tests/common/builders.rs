//! Test data builders

use permtrace_core::{InMemoryAppIndex, MethodSite, StringLiteralRef};

use super::fixtures::{ask_camera, on_create, request_permission, PACKAGE};

/// Builder for InMemoryAppIndex with a default-locale table for `PACKAGE`
#[derive(Debug)]
pub struct AppIndexBuilder {
    index: InMemoryAppIndex,
}

impl Default for AppIndexBuilder {
    fn default() -> Self {
        let mut index = InMemoryAppIndex::new();
        index.add_string_table(PACKAGE, "DEFAULT");
        Self { index }
    }
}

impl AppIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index without any resolved-string table
    pub fn without_string_table() -> Self {
        Self {
            index: InMemoryAppIndex::new(),
        }
    }

    /// The scenario chain `onCreate → askCamera → requestPermission`
    pub fn camera_chain() -> Self {
        Self::new()
            .call(&on_create(), &ask_camera())
            .call(&ask_camera(), &request_permission())
    }

    pub fn call(mut self, caller: &MethodSite, callee: &MethodSite) -> Self {
        let offset = self.index.call_count() as u32 * 4;
        self.index.add_call(caller, callee, offset);
        self
    }

    pub fn source(mut self, site: &MethodSite, text: &str) -> Self {
        self.index.set_source(site, text);
        self
    }

    pub fn literal(mut self, value: &str, referenced_by: &[MethodSite]) -> Self {
        let mut literal = StringLiteralRef::new(value);
        for site in referenced_by {
            literal = literal.referenced_by(site.clone());
        }
        self.index.add_string_literal(literal);
        self
    }

    pub fn resource(mut self, id: u64, value: &str) -> Self {
        self.index.add_resolved_string(PACKAGE, "DEFAULT", id, value);
        self
    }

    pub fn build(self) -> InMemoryAppIndex {
        self.index
    }
}
