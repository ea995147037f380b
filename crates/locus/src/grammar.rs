//! Query grammars a selector tree can be compiled into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target query grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    /// CSS selector grammar (e.g. `div > span[id='x']`)
    #[default]
    Css,
    /// XPath grammar (e.g. `/descendant::div/child::span[@id='x']`)
    XPath,
}

impl Grammar {
    /// Short lowercase name, as used in catalogs and CLI output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css => f.write_str("CSS"),
            Self::XPath => f.write_str("XPath"),
        }
    }
}
