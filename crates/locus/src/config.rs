//! Locator configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::result::LocusResult;

/// Prefix that makes an XPath query relative to the context node
pub const DEFAULT_CONTEXT_PREFIX: &str = ".";

/// How compiled queries are handed to the element-locating collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Prepended to relative XPath queries resolved against a context node
    #[serde(default = "default_context_prefix")]
    pub xpath_context_prefix: String,

    /// Whether relative XPath queries get [`Self::xpath_context_prefix`]
    #[serde(default = "default_true")]
    pub prefix_relative_xpath: bool,

    /// Log every resolved query at `info` instead of `trace`
    #[serde(default)]
    pub log_queries: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            xpath_context_prefix: default_context_prefix(),
            prefix_relative_xpath: true,
            log_queries: false,
        }
    }
}

fn default_context_prefix() -> String {
    DEFAULT_CONTEXT_PREFIX.to_string()
}

const fn default_true() -> bool {
    true
}

impl LocatorConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the XPath context prefix
    #[must_use]
    pub fn with_context_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.xpath_context_prefix = prefix.into();
        self
    }

    /// Enable or disable prefixing of relative XPath queries
    #[must_use]
    pub const fn with_prefix_relative_xpath(mut self, enabled: bool) -> Self {
        self.prefix_relative_xpath = enabled;
        self
    }

    /// Enable or disable query logging at `info`
    #[must_use]
    pub const fn with_log_queries(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    /// Prefix applied to a relative XPath query, empty when disabled
    #[must_use]
    pub fn relative_xpath_prefix(&self) -> &str {
        if self.prefix_relative_xpath {
            &self.xpath_context_prefix
        } else {
            ""
        }
    }

    /// Parse from YAML
    ///
    /// # Errors
    /// Returns error if YAML parsing fails
    pub fn from_yaml(yaml: &str) -> LocusResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> LocusResult<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> LocusResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LocatorConfig::default();
        assert_eq!(config.xpath_context_prefix, ".");
        assert!(config.prefix_relative_xpath);
        assert!(!config.log_queries);
        assert_eq!(config.relative_xpath_prefix(), ".");
    }

    #[test]
    fn test_builders() {
        let config = LocatorConfig::new()
            .with_context_prefix("self::node()")
            .with_log_queries(true);
        assert_eq!(config.relative_xpath_prefix(), "self::node()");
        assert!(config.log_queries);

        let unprefixed = config.with_prefix_relative_xpath(false);
        assert_eq!(unprefixed.relative_xpath_prefix(), "");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = LocatorConfig::from_yaml("log_queries: true\n").unwrap();
        assert!(config.log_queries);
        assert_eq!(config.xpath_context_prefix, ".");
        assert!(config.prefix_relative_xpath);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = LocatorConfig::new().with_context_prefix("./");
        let yaml = config.to_yaml().unwrap();
        assert_eq!(LocatorConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = LocatorConfig::load(Path::new("/nonexistent/locus.yaml")).unwrap_err();
        assert!(matches!(err, crate::result::LocusError::Io(_)));
    }
}
