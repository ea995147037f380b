//! CSS selector chains.
//!
//! Chains start from [`css()`]: a page-rooted chain via [`CssBuilder::page`],
//! a context-relative one via [`CssBuilder::descendant`], or pre-written text
//! via [`CssBuilder::raw`].
//!
//! ```
//! use locus::prelude::*;
//!
//! let cell = css()
//!     .page()
//!     .descendant("div", ())
//!     .child("span", id("x"));
//! assert_eq!(cell.render().unwrap(), "div > span[id='x']");
//! assert!(cell.is_absolute());
//! ```

use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::expression::{memoized, validate_step, Expression};
use crate::grammar::Grammar;
use crate::property::{CssProperty, IntoProperties};
use crate::result::LocusResult;

/// Relationship between a CSS node and its predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CssCombinator {
    /// First node under the document root
    PageRoot,
    /// Any descendant (`a b`)
    Descendant,
    /// Direct child (`a > b`)
    Child,
    /// Any following sibling (`a ~ b`)
    Sibling,
    /// Immediately following sibling (`a + b`)
    NextSibling,
}

impl CssCombinator {
    /// Token placed between the predecessor text and this node's tag
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::PageRoot => "",
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::Sibling => " ~ ",
            Self::NextSibling => " + ",
        }
    }
}

#[derive(Debug)]
enum CssKind {
    Step {
        combinator: CssCombinator,
        tag: String,
        properties: Vec<CssProperty>,
    },
    Raw(String),
}

#[derive(Debug)]
struct CssNode {
    predecessor: Option<CssSelector>,
    kind: CssKind,
    text: OnceLock<String>,
}

/// An immutable node in a CSS selector chain.
///
/// Cloning is cheap; chained nodes share their predecessors.
#[derive(Debug, Clone)]
pub struct CssSelector(Arc<CssNode>);

impl CssSelector {
    fn new(predecessor: Option<Self>, kind: CssKind) -> Self {
        Self(Arc::new(CssNode {
            predecessor,
            kind,
            text: OnceLock::new(),
        }))
    }

    fn step(
        predecessor: Option<Self>,
        combinator: CssCombinator,
        tag: &str,
        properties: impl IntoProperties<CssProperty>,
    ) -> Self {
        Self::new(
            predecessor,
            CssKind::Step {
                combinator,
                tag: tag.trim().to_string(),
                properties: properties.into_properties(),
            },
        )
    }

    fn then(
        &self,
        combinator: CssCombinator,
        tag: &str,
        properties: impl IntoProperties<CssProperty>,
    ) -> Self {
        Self::step(Some(self.clone()), combinator, tag, properties)
    }

    /// Any descendant of this node
    #[must_use]
    pub fn descendant(&self, tag: &str, properties: impl IntoProperties<CssProperty>) -> Self {
        self.then(CssCombinator::Descendant, tag, properties)
    }

    /// Direct child of this node
    #[must_use]
    pub fn child(&self, tag: &str, properties: impl IntoProperties<CssProperty>) -> Self {
        self.then(CssCombinator::Child, tag, properties)
    }

    /// Any following sibling of this node
    #[must_use]
    pub fn sibling(&self, tag: &str, properties: impl IntoProperties<CssProperty>) -> Self {
        self.then(CssCombinator::Sibling, tag, properties)
    }

    /// The immediately following sibling of this node
    #[must_use]
    pub fn next_sibling(&self, tag: &str, properties: impl IntoProperties<CssProperty>) -> Self {
        self.then(CssCombinator::NextSibling, tag, properties)
    }

    /// Previous node in the chain
    #[must_use]
    pub fn predecessor(&self) -> Option<&Self> {
        self.0.predecessor.as_ref()
    }

    /// Combinator of this node, `None` for raw text
    #[must_use]
    pub fn combinator(&self) -> Option<CssCombinator> {
        match &self.0.kind {
            CssKind::Step { combinator, .. } => Some(*combinator),
            CssKind::Raw(_) => None,
        }
    }

    fn compile(&self) -> LocusResult<String> {
        let (combinator, tag, properties) = match &self.0.kind {
            CssKind::Raw(text) => return Ok(text.clone()),
            CssKind::Step {
                combinator,
                tag,
                properties,
            } => (*combinator, tag, properties),
        };
        validate_step(Grammar::Css, tag, !properties.is_empty())?;

        let mut text = match &self.0.predecessor {
            Some(predecessor) => predecessor.render()?.to_string(),
            None => String::new(),
        };
        if !text.is_empty() {
            text.push_str(combinator.token());
        }
        text.push_str(tag);
        for property in properties {
            text.push_str(&property.render()?);
        }
        Ok(text)
    }
}

impl Expression for CssSelector {
    fn grammar(&self) -> Grammar {
        Grammar::Css
    }

    fn render(&self) -> LocusResult<&str> {
        memoized(&self.0.text, Grammar::Css, || self.compile())
    }

    fn is_absolute(&self) -> bool {
        let mut node = self;
        while let Some(predecessor) = node.predecessor() {
            node = predecessor;
        }
        node.combinator() == Some(CssCombinator::PageRoot)
    }
}

/// Equality is over compiled text; chains that fail to compile are equal to each other.
impl PartialEq for CssSelector {
    fn eq(&self, other: &Self) -> bool {
        self.render().ok() == other.render().ok()
    }
}

impl Eq for CssSelector {}

impl Hash for CssSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.render().ok().hash(state);
    }
}

/// The document root of a page-rooted CSS chain. Renders nothing by itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CssPage;

impl CssPage {
    /// First node of a page-rooted chain
    #[must_use]
    pub fn descendant(self, tag: &str, properties: impl IntoProperties<CssProperty>) -> CssSelector {
        CssSelector::step(None, CssCombinator::PageRoot, tag, properties)
    }
}

/// Entry points for CSS chains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CssBuilder;

/// Start a CSS chain
#[must_use]
pub const fn css() -> CssBuilder {
    CssBuilder
}

impl CssBuilder {
    /// Document root; the resulting chain is absolute
    #[must_use]
    pub const fn page(self) -> CssPage {
        CssPage
    }

    /// Descendant of the caller's context node; the resulting chain is relative
    #[must_use]
    pub fn descendant(self, tag: &str, properties: impl IntoProperties<CssProperty>) -> CssSelector {
        CssSelector::step(None, CssCombinator::Descendant, tag, properties)
    }

    /// Pre-written selector text, rendered verbatim without validation
    #[must_use]
    pub fn raw(self, text: impl Into<String>) -> CssSelector {
        CssSelector::new(None, CssKind::Raw(text.into()))
    }
}
