//! Request Analysis Ports - Interface Layer (Hexagonal Architecture)
//!
//! The bytecode layer (call graph, decompiler, resource decoder) and the
//! explanation classifier live outside this crate. These traits are the
//! boundary; `infrastructure::InMemoryAppIndex` is the bundled adapter.
//!
//! All ports are read-only views over an index built once before analysis,
//! hence `Send + Sync`.

use crate::shared::models::{CallEdge, MethodSite, StringLiteralRef};

// ═══════════════════════════════════════════════════════════════════════════
// Call Graph Port
// ═══════════════════════════════════════════════════════════════════════════

/// Cross-reference index over the application's methods
pub trait CallGraphPort: Send + Sync {
    /// Methods whose name starts with `name`, in index order
    fn find_methods_by_name(&self, name: &str) -> Vec<MethodSite>;

    /// Edges whose callee is `site`, in index order
    fn callers_of(&self, site: &MethodSite) -> Vec<CallEdge>;

    /// Edges whose caller is `site`, in index order
    fn callees_of(&self, site: &MethodSite) -> Vec<CallEdge>;

    /// Decompiled source of `site`, `None` when the decompiler produced nothing
    fn source_of(&self, site: &MethodSite) -> Option<String>;

    /// Every string literal analysis object in the application
    fn string_literals(&self) -> &[StringLiteralRef];
}

// ═══════════════════════════════════════════════════════════════════════════
// Resource Table Port
// ═══════════════════════════════════════════════════════════════════════════

/// Resolved string resources keyed by package and locale
pub trait ResourceTablePort: Send + Sync {
    /// Whether a resolved-string table exists for the pair
    fn has_string_table(&self, package: &str, locale: &str) -> bool;

    /// Value of string resource `id`, `None` if the id is not a string resource
    fn resolve_string(&self, package: &str, locale: &str, id: u64) -> Option<String>;
}

// ═══════════════════════════════════════════════════════════════════════════
// Explanation Classifier Port
// ═══════════════════════════════════════════════════════════════════════════

/// Decides whether `text` explains why `permission` is needed
pub trait ExplanationClassifier: Send + Sync {
    fn is_explanation(&self, permission: &str, text: &str) -> bool;
}

impl<F> ExplanationClassifier for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_explanation(&self, permission: &str, text: &str) -> bool {
        self(permission, text)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// String Table View
// ═══════════════════════════════════════════════════════════════════════════

/// Resource port narrowed to one package/locale table known to exist
pub struct StringTable<'a, R: ResourceTablePort + ?Sized> {
    resources: &'a R,
    package: &'a str,
    locale: &'a str,
}

impl<'a, R: ResourceTablePort + ?Sized> StringTable<'a, R> {
    /// `None` when the collaborator has no table for the pair
    pub fn open(resources: &'a R, package: &'a str, locale: &'a str) -> Option<Self> {
        if resources.has_string_table(package, locale) {
            Some(Self {
                resources,
                package,
                locale,
            })
        } else {
            None
        }
    }

    pub fn resolve(&self, id: u64) -> Option<String> {
        self.resources.resolve_string(self.package, self.locale, id)
    }
}
