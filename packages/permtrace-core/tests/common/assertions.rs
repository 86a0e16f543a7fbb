//! Custom assertions for request analysis results

use permtrace_core::{AnalyzedApk, CallGraphPort, MethodSite};
use std::collections::HashSet;

/// Assert that no two findings share a dedup key
pub fn assert_unique_keys(apk: &AnalyzedApk) {
    let mut seen = HashSet::new();
    for request in &apk.analyzed_requests {
        assert!(
            seen.insert(request.key()),
            "Duplicate finding for key {:?}",
            request.key()
        );
    }
}

/// Assert that `path` is a caller chain ending in the entry component
pub fn assert_valid_path<G: CallGraphPort>(graph: &G, path: &[MethodSite], entry: &str) {
    if path.is_empty() {
        return;
    }
    for pair in path.windows(2) {
        let (callee, caller) = (&pair[0], &pair[1]);
        assert!(
            graph.callers_of(callee).iter().any(|e| &e.caller == caller),
            "{} does not call {}",
            caller,
            callee
        );
    }
    let last = path.last().unwrap();
    assert!(
        last.is_in_component(entry),
        "Path ends at {} outside entry component {}",
        last,
        entry
    );
}
