//! String-literal cross references

use serde::{Deserialize, Serialize};

use super::MethodSite;

/// A string constant in the application and the methods that load it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLiteralRef {
    pub value: String,
    /// Referencing methods, in index order
    #[serde(default)]
    pub xref_from: Vec<MethodSite>,
}

impl StringLiteralRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            xref_from: Vec::new(),
        }
    }

    pub fn referenced_by(mut self, site: MethodSite) -> Self {
        self.xref_from.push(site);
        self
    }

    pub fn is_referenced_by(&self, site: &MethodSite) -> bool {
        self.xref_from.iter().any(|s| s == site)
    }
}
