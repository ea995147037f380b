//! Result and error types for Locus.

use thiserror::Error;

use crate::grammar::Grammar;

/// Result type for Locus operations
pub type LocusResult<T> = Result<T, LocusError>;

/// Errors that can occur while building, compiling, or resolving selectors
#[derive(Debug, Error)]
pub enum LocusError {
    /// A node would match every element on the page
    #[error("No properties were provided for tag '{tag}'. This would match every element on the page")]
    UnconstrainedSelector {
        /// The wildcard tag that was used
        tag: String,
    },

    /// XPath steps need an explicit tag (`*` for any)
    #[error("Tag text should not be empty for {grammar} selectors")]
    EmptyTag {
        /// Grammar of the offending node
        grammar: Grammar,
    },

    /// Tag, id, attribute, or class text contains whitespace
    #[error("{what} '{value}' contains whitespace. This can yield unexpected results")]
    Whitespace {
        /// What kind of name was rejected (tag, attribute, ...)
        what: &'static str,
        /// The rejected text
        value: String,
    },

    /// A boundary expression was not rooted at the page
    #[error("Boundary expressions must be page-rooted, but '{expression}' is relative")]
    RelativeBoundary {
        /// The rendered (or raw) boundary expression
        expression: String,
    },

    /// A condition or expression was used with the wrong grammar
    #[error("{what} cannot be rendered as {grammar}")]
    GrammarMismatch {
        /// Description of the condition or expression
        what: String,
        /// Grammar that was requested
        grammar: Grammar,
    },

    /// Generic validation failure
    #[error("Invalid selector: {message}")]
    Validation {
        /// Error message
        message: String,
    },

    /// Selector catalog error
    #[error("Catalog entry '{entry}': {message}")]
    Catalog {
        /// Name of the catalog entry
        entry: String,
        /// Error message
        message: String,
    },

    /// An error raised while building a named catalog entry
    #[error("Catalog entry '{entry}': {source}")]
    InEntry {
        /// Name of the catalog entry
        entry: String,
        /// Underlying error
        #[source]
        source: Box<LocusError>,
    },

    /// Element lookup failed in the locating collaborator
    #[error("Element lookup failed for '{query}': {message}")]
    Locate {
        /// Query that was being resolved
        query: String,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LocusError {
    /// Create a validation error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a whitespace error
    #[must_use]
    pub fn whitespace(what: &'static str, value: impl Into<String>) -> Self {
        Self::Whitespace {
            what,
            value: value.into(),
        }
    }

    /// Create a grammar mismatch error
    #[must_use]
    pub fn grammar_mismatch(what: impl Into<String>, grammar: Grammar) -> Self {
        Self::GrammarMismatch {
            what: what.into(),
            grammar,
        }
    }

    /// Create a catalog error for a named entry
    #[must_use]
    pub fn catalog(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Catalog {
            entry: entry.into(),
            message: message.into(),
        }
    }

    /// Attach a catalog entry name to an error.
    ///
    /// Errors that already name an entry are returned unchanged, so the
    /// innermost entry wins.
    #[must_use]
    pub fn in_entry(entry: impl Into<String>, error: Self) -> Self {
        match error {
            Self::Catalog { .. } | Self::InEntry { .. } => error,
            other => Self::InEntry {
                entry: entry.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error with any catalog entry context removed
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::InEntry { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Create a locate error
    #[must_use]
    pub fn locate(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Locate {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised while validating a selector tree
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::UnconstrainedSelector { .. }
                | Self::EmptyTag { .. }
                | Self::Whitespace { .. }
                | Self::RelativeBoundary { .. }
                | Self::Validation { .. }
        )
    }
}
