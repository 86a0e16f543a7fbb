//! Request analysis settings

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigExportV1, SCHEMA_VERSION};
use super::validation::Validatable;
use crate::shared::models::MethodSite;

/// Request analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestAnalysisConfig {
    /// Name prefix of the runtime permission request API
    /// (`requestPermission` also matches `requestPermissions`)
    pub request_method_name: String,

    /// Class prefixes that own the request API; request methods outside
    /// these namespaces are ignored
    pub platform_prefixes: Vec<String>,

    /// Caller class prefixes treated as SDK or language runtime code
    pub sdk_prefixes: Vec<String>,

    /// Locale key of the resolved-string table
    pub default_locale: String,

    /// Separator between an outer class and its nested/anonymous classes
    pub nested_class_separator: char,

    /// Resolve callers on the rayon pool
    pub parallel: bool,
}

impl Default for RequestAnalysisConfig {
    fn default() -> Self {
        Self {
            request_method_name: "requestPermission".to_string(),
            platform_prefixes: vec!["android".to_string()],
            sdk_prefixes: vec![
                "android".to_string(),
                "java".to_string(),
                "kotlin".to_string(),
            ],
            default_locale: "DEFAULT".to_string(),
            nested_class_separator: '$',
            parallel: false,
        }
    }
}

impl RequestAnalysisConfig {
    pub fn with_request_method_name(mut self, name: impl Into<String>) -> Self {
        self.request_method_name = name.into();
        self
    }

    pub fn with_platform_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platform_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sdk_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sdk_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn with_nested_class_separator(mut self, separator: char) -> Self {
        self.nested_class_separator = separator;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// True when the site's class belongs to a platform namespace owning the request API
    pub fn is_platform_site(&self, site: &MethodSite) -> bool {
        site.has_class_prefix(&self.platform_prefixes)
    }

    /// True when the site's class belongs to the SDK or a language runtime
    pub fn is_sdk_site(&self, site: &MethodSite) -> bool {
        site.has_class_prefix(&self.sdk_prefixes)
    }

    /// Load from a YAML file
    pub fn from_yaml(path: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        match export.version {
            None => return Err(ConfigError::MissingVersion),
            Some(SCHEMA_VERSION) => {}
            Some(found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: vec![SCHEMA_VERSION],
                })
            }
        }

        export.request_analysis.validate()?;
        let config = export.request_analysis.unwrap_or_default();
        debug!("Loaded {} from YAML", config.config_name());
        Ok(config)
    }

    /// Export as a versioned YAML document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(SCHEMA_VERSION),
            request_analysis: Some(self.clone()),
        };
        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

impl Validatable for RequestAnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.request_method_name.trim().is_empty() {
            return Err(ConfigError::empty_with_hint(
                "request_method_name",
                "Use 'requestPermission' for the Android runtime permission API.",
            ));
        }
        if self.platform_prefixes.iter().all(|p| p.is_empty()) {
            return Err(ConfigError::empty_with_hint(
                "platform_prefixes",
                "Requests are only analyzed inside a platform namespace such as 'android'.",
            ));
        }
        if self.sdk_prefixes.iter().all(|p| p.is_empty()) {
            return Err(ConfigError::empty_with_hint(
                "sdk_prefixes",
                "Without SDK prefixes every platform-internal caller is reported.",
            ));
        }
        if self.default_locale.is_empty() {
            return Err(ConfigError::empty_with_hint(
                "default_locale",
                "Resolved-string tables key their default locale as 'DEFAULT'.",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "RequestAnalysisConfig"
    }
}
