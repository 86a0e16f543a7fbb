/*
 * Explanation Finder
 *
 * Collects rationale text shown around a confirmed permission request.
 *
 * Evidence, in order:
 * 1. String literals loaded by the requesting method (hardcoded messages)
 * 2. String resources whose ids appear in the requesting method's text
 *
 * Every candidate passes through the injected classifier. Duplicates keep
 * their first position.
 */

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use super::super::domain::RequestAnalysis;
use super::super::ports::{CallGraphPort, ExplanationClassifier, ResourceTablePort, StringTable};
use crate::config::RequestAnalysisConfig;
use crate::errors::{PermtraceError, Result};
use crate::shared::utils::find_resource_ids;

pub struct ExplanationFinder<'a, G, R, C>
where
    G: CallGraphPort + ?Sized,
    R: ResourceTablePort + ?Sized,
    C: ExplanationClassifier + ?Sized,
{
    graph: &'a G,
    resources: &'a R,
    classifier: &'a C,
    config: &'a RequestAnalysisConfig,
    package: &'a str,
}

impl<'a, G, R, C> ExplanationFinder<'a, G, R, C>
where
    G: CallGraphPort + ?Sized,
    R: ResourceTablePort + ?Sized,
    C: ExplanationClassifier + ?Sized,
{
    pub fn new(
        graph: &'a G,
        resources: &'a R,
        classifier: &'a C,
        config: &'a RequestAnalysisConfig,
        package: &'a str,
    ) -> Self {
        Self {
            graph,
            resources,
            classifier,
            config,
            package,
        }
    }

    /// Candidate explanations for `request`
    pub fn find_explanations(&self, request: &RequestAnalysis) -> Result<Vec<String>> {
        let mut found = Vec::new();
        let mut seen = FxHashSet::default();

        debug!("Searching possible explanations for {}", request.caller);
        for text in self.literal_explanations(request) {
            if seen.insert(text.clone()) {
                found.push(text);
            }
        }

        for text in self.resource_explanations(request)? {
            if seen.insert(text.clone()) {
                found.push(text);
            }
        }

        Ok(found)
    }

    fn literal_explanations(&self, request: &RequestAnalysis) -> Vec<String> {
        self.graph
            .string_literals()
            .iter()
            .filter(|literal| literal.is_referenced_by(&request.caller))
            .filter(|literal| {
                self.classifier
                    .is_explanation(&request.permission, &literal.value)
            })
            .inspect(|literal| info!("String literal in requesting method: {:?}", literal.value))
            .map(|literal| literal.value.clone())
            .collect()
    }

    fn resource_explanations(&self, request: &RequestAnalysis) -> Result<Vec<String>> {
        let locale = self.config.default_locale.as_str();
        let table = StringTable::open(self.resources, self.package, locale)
            .ok_or_else(|| PermtraceError::missing_string_table(self.package, locale))?;

        let source = self.graph.source_of(&request.caller).unwrap_or_default();
        let ids = find_resource_ids(&source);
        debug!("Found IDs: {:?}", ids);

        let mut accepted = Vec::new();
        for id in ids {
            let Some(value) = table.resolve(id) else {
                continue;
            };
            if self.classifier.is_explanation(&request.permission, &value) {
                info!("Resolved string resource {} explains {}", id, request.permission);
                accepted.push(value);
            }
        }
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::request_analysis::domain::ResolutionTier;
    use crate::features::request_analysis::infrastructure::InMemoryAppIndex;
    use crate::shared::models::{MethodSite, StringLiteralRef};

    const PACKAGE: &str = "com.app";

    fn mentions_camera(_permission: &str, text: &str) -> bool {
        text.to_lowercase().contains("camera")
    }

    fn record(caller: &MethodSite) -> RequestAnalysis {
        RequestAnalysis::new(
            "CAMERA",
            MethodSite::new("Landroid/app/Activity;", "requestPermissions", ""),
            caller.clone(),
            ResolutionTier::Literal,
        )
    }

    #[test]
    fn test_literal_then_resource_order() {
        let caller = MethodSite::new("Lcom/app/Helper;", "askCamera", "()V");
        let mut index = InMemoryAppIndex::new();
        index.set_source(&caller, "showDialog(getString(2131623970)); ask();");
        index.add_string_literal(
            StringLiteralRef::new("We need your camera to scan documents").referenced_by(caller.clone()),
        );
        index.add_string_literal(StringLiteralRef::new("OK").referenced_by(caller.clone()));
        index.add_resolved_string(PACKAGE, "DEFAULT", 2131623970, "Camera access lets you take photos");

        let config = RequestAnalysisConfig::default();
        let classifier = mentions_camera;
        let finder = ExplanationFinder::new(&index, &index, &classifier, &config, PACKAGE);

        let found = finder.find_explanations(&record(&caller)).unwrap();
        assert_eq!(
            found,
            vec![
                "We need your camera to scan documents".to_string(),
                "Camera access lets you take photos".to_string(),
            ]
        );
    }

    #[test]
    fn test_literals_from_other_methods_ignored() {
        let caller = MethodSite::new("Lcom/app/Helper;", "askCamera", "()V");
        let other = MethodSite::new("Lcom/app/Helper;", "other", "()V");
        let mut index = InMemoryAppIndex::new();
        index.add_string_table(PACKAGE, "DEFAULT");
        index.add_string_literal(StringLiteralRef::new("Camera is great").referenced_by(other));

        let config = RequestAnalysisConfig::default();
        let classifier = mentions_camera;
        let finder = ExplanationFinder::new(&index, &index, &classifier, &config, PACKAGE);

        assert!(finder.find_explanations(&record(&caller)).unwrap().is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let caller = MethodSite::new("Lcom/app/Helper;", "askCamera", "()V");
        let mut index = InMemoryAppIndex::new();
        index.set_source(&caller, "a(2131623970); b(2131623970);");
        index.add_resolved_string(PACKAGE, "DEFAULT", 2131623970, "Camera needed");
        index.add_string_literal(StringLiteralRef::new("Camera needed").referenced_by(caller.clone()));

        let config = RequestAnalysisConfig::default();
        let classifier = mentions_camera;
        let finder = ExplanationFinder::new(&index, &index, &classifier, &config, PACKAGE);

        assert_eq!(
            finder.find_explanations(&record(&caller)).unwrap(),
            vec!["Camera needed".to_string()]
        );
    }

    #[test]
    fn test_classifier_receives_record_permission() {
        let caller = MethodSite::new("Lcom/app/Helper;", "askCamera", "()V");
        let mut index = InMemoryAppIndex::new();
        index.add_string_table(PACKAGE, "DEFAULT");
        index.add_string_literal(StringLiteralRef::new("Needed for scanning").referenced_by(caller.clone()));

        let config = RequestAnalysisConfig::default();
        let only_contacts = |permission: &str, _text: &str| permission == "READ_CONTACTS";
        let finder = ExplanationFinder::new(&index, &index, &only_contacts, &config, PACKAGE);

        assert!(finder.find_explanations(&record(&caller)).unwrap().is_empty());
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let caller = MethodSite::new("Lcom/app/Helper;", "askCamera", "()V");
        let index = InMemoryAppIndex::new();
        let config = RequestAnalysisConfig::default();
        let classifier = mentions_camera;
        let finder = ExplanationFinder::new(&index, &index, &classifier, &config, PACKAGE);

        assert!(finder.find_explanations(&record(&caller)).is_err());
    }
}
