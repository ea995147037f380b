//! The compiled-expression interface shared by both node families.

use std::sync::OnceLock;

use crate::grammar::Grammar;
use crate::result::{LocusError, LocusResult};

/// Tag accepted as "any element"
pub const ANY: &str = "*";

/// A selector expression that compiles to query text
pub trait Expression {
    /// Grammar this expression compiles to
    fn grammar(&self) -> Grammar;

    /// Compile to query text. The first successful result is cached.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any node in the chain is invalid.
    fn render(&self) -> LocusResult<&str>;

    /// Whether the chain is rooted at the page rather than a context node
    fn is_absolute(&self) -> bool;

    /// Compile for an explicitly requested grammar.
    ///
    /// # Errors
    ///
    /// Returns [`LocusError::GrammarMismatch`] if `grammar` is not this
    /// expression's grammar, otherwise the same errors as [`Expression::render`].
    fn build(&self, grammar: Grammar) -> LocusResult<&str> {
        if grammar == self.grammar() {
            self.render()
        } else {
            Err(LocusError::grammar_mismatch(
                format!("{} expression", self.grammar()),
                grammar,
            ))
        }
    }
}

/// Return the cached text, or compute, log and cache it.
///
/// Concurrent first calls may each compute; exactly one value is stored.
/// Failures are not cached.
pub(crate) fn memoized<F>(cell: &OnceLock<String>, grammar: Grammar, compile: F) -> LocusResult<&str>
where
    F: FnOnce() -> LocusResult<String>,
{
    if let Some(text) = cell.get() {
        return Ok(text);
    }
    let text = compile()?;
    tracing::debug!(grammar = grammar.as_str(), query = %text, "compiled selector");
    Ok(cell.get_or_init(|| text))
}

/// Shared tag checks for a regular (non-raw, non-structural) step
pub(crate) fn validate_step(grammar: Grammar, tag: &str, has_properties: bool) -> LocusResult<()> {
    if tag.is_empty() && grammar == Grammar::XPath {
        return Err(LocusError::EmptyTag { grammar });
    }
    if (tag.is_empty() || tag == ANY) && !has_properties {
        return Err(LocusError::UnconstrainedSelector {
            tag: tag.to_string(),
        });
    }
    if tag.chars().any(char::is_whitespace) {
        return Err(LocusError::whitespace("Tag", tag));
    }
    Ok(())
}
