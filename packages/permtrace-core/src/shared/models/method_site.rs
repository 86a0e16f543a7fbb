//! Method identity used as a call-graph node

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identity of a method: owning class, name and descriptor.
///
/// Class names are kept exactly as the index reports them. Both the Dalvik
/// spelling (`Lcom/app/Main$1;`) and the dotted Java spelling
/// (`com.app.Main$1`) are accepted; prefix and entry-component checks see
/// through the difference via [`MethodSite::qualified_class_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodSite {
    pub class_name: String,
    pub name: String,
    #[serde(default)]
    pub descriptor: String,
}

impl MethodSite {
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Dotted class name: `Lcom/app/Main;` becomes `com.app.Main`
    pub fn qualified_class_name(&self) -> Cow<'_, str> {
        let raw = self.class_name.as_str();
        match raw
            .strip_prefix('L')
            .and_then(|rest| rest.strip_suffix(';'))
        {
            Some(inner) => Cow::Owned(inner.replace('/', ".")),
            None => Cow::Borrowed(raw),
        }
    }

    /// True when the dotted class name starts with any non-empty prefix
    pub fn has_class_prefix(&self, prefixes: &[String]) -> bool {
        let qualified = self.qualified_class_name();
        prefixes
            .iter()
            .filter(|p| !p.is_empty())
            .any(|p| qualified.starts_with(p.as_str()))
    }

    /// True when the owning class name contains the entry component substring
    pub fn is_in_component(&self, component: &str) -> bool {
        self.class_name.contains(component) || self.qualified_class_name().contains(component)
    }

    /// Outer class of a nested or anonymous class.
    ///
    /// Everything from the first `separator` on is dropped, as is a trailing
    /// `;` type terminator, so `Lcom/app/Main$1;` and `Lcom/app/Main;` share
    /// the base class `Lcom/app/Main`.
    pub fn base_class(&self, separator: char) -> &str {
        let outer = match self.class_name.split_once(separator) {
            Some((outer, _)) => outer,
            None => self.class_name.as_str(),
        };
        outer.strip_suffix(';').unwrap_or(outer)
    }
}

impl fmt::Display for MethodSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}{}", self.class_name, self.name, self.descriptor)
    }
}
