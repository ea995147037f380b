//! Handing compiled expressions to an element-locating collaborator.
//!
//! The selector tree never touches a document. [`Query`] captures what a
//! driver needs (text, grammar, anchoring) and renders the JavaScript used to
//! evaluate it over CDP; [`resolve`] picks the search root for an
//! [`ElementLocator`].

use serde::{Deserialize, Serialize};

use crate::config::{LocatorConfig, DEFAULT_CONTEXT_PREFIX};
use crate::expression::Expression;
use crate::grammar::Grammar;
use crate::result::{LocusError, LocusResult};

/// A compiled selector expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    /// Compiled query text
    pub text: String,
    /// Grammar of the text
    pub grammar: Grammar,
    /// Whether the query searches the whole page
    pub absolute: bool,
    #[serde(skip, default = "default_context_prefix")]
    context_prefix: String,
}

fn default_context_prefix() -> String {
    DEFAULT_CONTEXT_PREFIX.to_string()
}

impl Query {
    /// Compile an expression with the default configuration
    ///
    /// # Errors
    /// Returns the expression's validation error
    pub fn compile(expression: &impl Expression) -> LocusResult<Self> {
        Self::compile_with(expression, &LocatorConfig::default())
    }

    /// Compile an expression, taking the XPath context prefix from `config`
    ///
    /// # Errors
    /// Returns the expression's validation error
    pub fn compile_with(expression: &impl Expression, config: &LocatorConfig) -> LocusResult<Self> {
        Ok(Self {
            text: expression.render()?.to_string(),
            grammar: expression.grammar(),
            absolute: expression.is_absolute(),
            context_prefix: config.relative_xpath_prefix().to_string(),
        })
    }

    /// Text to evaluate against a context node
    #[must_use]
    pub fn scoped_text(&self) -> String {
        match self.grammar {
            Grammar::XPath if !self.absolute => format!("{}{}", self.context_prefix, self.text),
            _ => self.text.clone(),
        }
    }

    /// JavaScript returning the first match in the document
    #[must_use]
    pub fn to_query(&self) -> String {
        first_match(self.grammar, &self.text, "document")
    }

    /// JavaScript returning the number of matches in the document
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match_count(self.grammar, &self.text, "document")
    }

    /// JavaScript returning the first match under `scope`, a JavaScript
    /// expression for the context element. Absolute queries ignore `scope`.
    #[must_use]
    pub fn to_scoped_query(&self, scope: &str) -> String {
        if self.absolute {
            return self.to_query();
        }
        first_match(self.grammar, &self.scoped_text(), scope)
    }

    /// JavaScript returning the number of matches under `scope`
    #[must_use]
    pub fn to_scoped_count_query(&self, scope: &str) -> String {
        if self.absolute {
            return self.to_count_query();
        }
        match_count(self.grammar, &self.scoped_text(), scope)
    }
}

/// `text` as a JavaScript string literal
fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

fn first_match(grammar: Grammar, text: &str, scope: &str) -> String {
    let text = js_string(text);
    match grammar {
        Grammar::Css => format!("{scope}.querySelector({text})"),
        Grammar::XPath => format!(
            "document.evaluate({text}, {scope}, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
        ),
    }
}

fn match_count(grammar: Grammar, text: &str, scope: &str) -> String {
    let text = js_string(text);
    match grammar {
        Grammar::Css => format!("{scope}.querySelectorAll({text}).length"),
        Grammar::XPath => format!(
            "document.evaluate({text}, {scope}, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength"
        ),
    }
}

/// The driver-side collaborator that evaluates query text
pub trait ElementLocator {
    /// Element handle type
    type Element;

    /// Find all elements matching `query`, searching under `context` or the
    /// whole document when `context` is `None`.
    ///
    /// # Errors
    /// Returns [`LocusError::Locate`] when the driver fails
    fn find_all(
        &self,
        context: Option<&Self::Element>,
        query: &str,
        grammar: Grammar,
    ) -> LocusResult<Vec<Self::Element>>;
}

/// Compile `expression` and find all matches.
///
/// Absolute expressions, and any expression without a context, search the
/// document. Relative XPath searched under a context gets the configured
/// context prefix.
///
/// # Errors
/// Returns the expression's validation error or the locator's error
pub fn resolve<L, E>(
    locator: &L,
    context: Option<&L::Element>,
    expression: &E,
    config: &LocatorConfig,
) -> LocusResult<Vec<L::Element>>
where
    L: ElementLocator,
    E: Expression,
{
    let query = Query::compile_with(expression, config)?;
    let (scope, text) = match context {
        Some(element) if !query.absolute => (Some(element), query.scoped_text()),
        _ => (None, query.text.clone()),
    };

    if config.log_queries {
        tracing::info!(grammar = query.grammar.as_str(), query = %text, scoped = scope.is_some(), "resolving selector");
    } else {
        tracing::trace!(grammar = query.grammar.as_str(), query = %text, scoped = scope.is_some(), "resolving selector");
    }

    locator.find_all(scope, &text, query.grammar)
}

/// Like [`resolve`], but fails unless exactly one element matches.
///
/// # Errors
/// Returns [`LocusError::Locate`] when zero or several elements match
pub fn resolve_one<L, E>(
    locator: &L,
    context: Option<&L::Element>,
    expression: &E,
    config: &LocatorConfig,
) -> LocusResult<L::Element>
where
    L: ElementLocator,
    E: Expression,
{
    let mut found = resolve(locator, context, expression, config)?;
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(LocusError::locate(expression.render()?, "no element matched")),
        n => Err(LocusError::locate(
            expression.render()?,
            format!("{n} elements matched, expected exactly one"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::css;
    use crate::dsl::*;
    use crate::xpath::xpath;
    use std::cell::RefCell;

    /// Records every call and returns a fixed number of hits
    struct RecordingLocator {
        hits: usize,
        calls: RefCell<Vec<(Option<String>, String, Grammar)>>,
    }

    impl RecordingLocator {
        fn new(hits: usize) -> Self {
            Self {
                hits,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ElementLocator for RecordingLocator {
        type Element = String;

        fn find_all(
            &self,
            context: Option<&String>,
            query: &str,
            grammar: Grammar,
        ) -> LocusResult<Vec<String>> {
            self.calls
                .borrow_mut()
                .push((context.cloned(), query.to_string(), grammar));
            Ok((0..self.hits).map(|i| format!("element-{i}")).collect())
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_compile_captures_flags() {
            let query = Query::compile(&xpath().page("div", ())).unwrap();
            assert_eq!(query.text, "/descendant::div");
            assert_eq!(query.grammar, Grammar::XPath);
            assert!(query.absolute);
        }

        #[test]
        fn test_compile_propagates_errors() {
            assert!(Query::compile(&css().page().descendant("*", ())).is_err());
        }

        #[test]
        fn test_css_queries() {
            let query = Query::compile(&css().page().descendant("button", css_classes(["primary"])))
                .unwrap();
            assert_eq!(query.to_query(), "document.querySelector(\"button.primary\")");
            assert_eq!(
                query.to_count_query(),
                "document.querySelectorAll(\"button.primary\").length"
            );
        }

        #[test]
        fn test_query_text_is_a_json_string_literal() {
            let query = Query::compile(
                &css()
                    .page()
                    .descendant("input", attr("title").is("say \"hi\"\u{7f}")),
            )
            .unwrap();
            assert_eq!(
                query.to_query(),
                "document.querySelector(\"input[title='say \\\"hi\\\"\u{7f}']\")"
            );
            assert!(!query.to_count_query().contains("\\u{"));

            let query = Query::compile(&xpath().page("td", text().is("a\tb"))).unwrap();
            assert!(query
                .to_query()
                .starts_with("document.evaluate(\"/descendant::td[text()='a\\tb']\""));
        }

        #[test]
        fn test_xpath_queries() {
            let query = Query::compile(&xpath().page("td", ())).unwrap();
            assert!(query.to_query().contains("FIRST_ORDERED_NODE_TYPE"));
            assert!(query.to_count_query().ends_with(".snapshotLength"));
        }

        #[test]
        fn test_scoped_relative_xpath_gets_prefix() {
            let query = Query::compile(&xpath().child("td", ())).unwrap();
            assert_eq!(query.scoped_text(), "./child::td");
            assert_eq!(
                query.to_scoped_query("el"),
                "document.evaluate(\"./child::td\", el, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
            );
        }

        #[test]
        fn test_scoped_css() {
            let query = Query::compile(&css().descendant("li", ())).unwrap();
            assert_eq!(query.to_scoped_query("el"), "el.querySelector(\"li\")");
            assert_eq!(
                query.to_scoped_count_query("el"),
                "el.querySelectorAll(\"li\").length"
            );
        }

        #[test]
        fn test_absolute_ignores_scope() {
            let query = Query::compile(&xpath().page("td", ())).unwrap();
            assert_eq!(query.to_scoped_query("el"), query.to_query());
            assert_eq!(query.to_scoped_count_query("el"), query.to_count_query());
        }

        #[test]
        fn test_custom_prefix() {
            let config = LocatorConfig::new().with_context_prefix("self::node()");
            let query = Query::compile_with(&xpath().child("td", ()), &config).unwrap();
            assert_eq!(query.scoped_text(), "self::node()/child::td");
        }

        #[test]
        fn test_json_shape() {
            let query = Query::compile(&css().raw("main")).unwrap();
            let json = serde_json::to_value(&query).unwrap();
            assert_eq!(json["text"], "main");
            assert_eq!(json["grammar"], "css");
            assert_eq!(json["absolute"], false);
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_absolute_searches_document() {
            let locator = RecordingLocator::new(1);
            let context = "row".to_string();
            resolve(
                &locator,
                Some(&context),
                &xpath().page("td", ()),
                &LocatorConfig::default(),
            )
            .unwrap();
            let calls = locator.calls.borrow();
            assert_eq!(calls[0], (None, "/descendant::td".to_string(), Grammar::XPath));
        }

        #[test]
        fn test_relative_xpath_searches_context() {
            let locator = RecordingLocator::new(2);
            let context = "row".to_string();
            let found = resolve(
                &locator,
                Some(&context),
                &xpath().child("td", ()),
                &LocatorConfig::default(),
            )
            .unwrap();
            assert_eq!(found.len(), 2);
            let calls = locator.calls.borrow();
            assert_eq!(
                calls[0],
                (Some("row".to_string()), "./child::td".to_string(), Grammar::XPath)
            );
        }

        #[test]
        fn test_relative_without_context_searches_document() {
            let locator = RecordingLocator::new(0);
            resolve(&locator, None, &xpath().child("td", ()), &LocatorConfig::default()).unwrap();
            assert_eq!(locator.calls.borrow()[0].1, "/child::td");
        }

        #[test]
        fn test_prefix_disabled() {
            let locator = RecordingLocator::new(0);
            let context = "row".to_string();
            let config = LocatorConfig::new().with_prefix_relative_xpath(false);
            resolve(&locator, Some(&context), &xpath().child("td", ()), &config).unwrap();
            assert_eq!(locator.calls.borrow()[0].1, "/child::td");
        }

        #[test]
        fn test_relative_css_is_not_prefixed() {
            let locator = RecordingLocator::new(0);
            let context = "list".to_string();
            resolve(
                &locator,
                Some(&context),
                &css().descendant("li", ()),
                &LocatorConfig::default(),
            )
            .unwrap();
            assert_eq!(locator.calls.borrow()[0].1, "li");
        }

        #[test]
        fn test_resolve_one() {
            let config = LocatorConfig::default();
            let selector = css().page().descendant("h1", ());

            let one = RecordingLocator::new(1);
            assert_eq!(resolve_one(&one, None, &selector, &config).unwrap(), "element-0");

            let none = RecordingLocator::new(0);
            let err = resolve_one(&none, None, &selector, &config).unwrap_err();
            assert!(matches!(err, LocusError::Locate { .. }));

            let many = RecordingLocator::new(3);
            let err = resolve_one(&many, None, &selector, &config).unwrap_err();
            assert!(err.to_string().contains("3 elements matched"));
        }
    }
}
