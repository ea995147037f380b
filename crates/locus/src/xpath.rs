//! XPath chains.
//!
//! Chains start from [`xpath()`]: page-rooted via [`XPathBuilder::page`],
//! context-relative via the other axis methods, or pre-written text via
//! [`XPathBuilder::raw`]. Relative chains render with a leading `/`; the
//! locator adds the context prefix when it resolves them.
//!
//! ```
//! use locus::prelude::*;
//!
//! let cell = xpath().page("div", ()).child("span", id_is("x"));
//! assert_eq!(cell.render().unwrap(), "/descendant::div/child::span[@id='x']");
//! ```

use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::expression::{memoized, validate_step, Expression, ANY};
use crate::grammar::Grammar;
use crate::property::{IntoProperties, XPathProperty};
use crate::result::{LocusError, LocusResult};

/// Axis of an XPath step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First step of a page-rooted chain
    Page,
    /// `descendant::`
    Descendant,
    /// `child::`
    Child,
    /// `following-sibling::`
    Sibling,
    /// `preceding-sibling::`
    PrecedingSibling,
    /// `following::`
    Following,
    /// `preceding::`
    Preceding,
    /// `parent::`
    Parent,
}

impl Axis {
    /// Token placed between the predecessor text and this step's tag
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Page | Self::Descendant => "/descendant::",
            Self::Child => "/child::",
            Self::Sibling => "/following-sibling::",
            Self::PrecedingSibling => "/preceding-sibling::",
            Self::Following => "/following::",
            Self::Preceding => "/preceding::",
            Self::Parent => "/parent::",
        }
    }
}

#[derive(Debug)]
enum XPathKind {
    Step {
        axis: Axis,
        tag: String,
        properties: Vec<XPathProperty>,
    },
    LimitedBy(XPath),
    Raw(String),
}

#[derive(Debug)]
struct XPathNode {
    predecessor: Option<XPath>,
    kind: XPathKind,
    text: OnceLock<String>,
}

/// An immutable node in an XPath chain.
///
/// Cloning is cheap; chained nodes share their predecessors.
#[derive(Debug, Clone)]
pub struct XPath(Arc<XPathNode>);

fn root_axis() -> &'static Regex {
    static ROOT_AXIS: OnceLock<Regex> = OnceLock::new();
    ROOT_AXIS.get_or_init(|| Regex::new(r"^/[a-z-]+").expect("root axis pattern is valid"))
}

impl XPath {
    fn new(predecessor: Option<Self>, kind: XPathKind) -> Self {
        Self(Arc::new(XPathNode {
            predecessor,
            kind,
            text: OnceLock::new(),
        }))
    }

    fn step(
        predecessor: Option<Self>,
        axis: Axis,
        tag: &str,
        properties: impl IntoProperties<XPathProperty>,
    ) -> Self {
        Self::new(
            predecessor,
            XPathKind::Step {
                axis,
                tag: tag.trim().to_string(),
                properties: properties.into_properties(),
            },
        )
    }

    fn then(&self, axis: Axis, tag: &str, properties: impl IntoProperties<XPathProperty>) -> Self {
        Self::step(Some(self.clone()), axis, tag, properties)
    }

    /// `descendant::` step
    #[must_use]
    pub fn descendant(&self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> Self {
        self.then(Axis::Descendant, tag, properties)
    }

    /// `child::` step
    #[must_use]
    pub fn child(&self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> Self {
        self.then(Axis::Child, tag, properties)
    }

    /// `following-sibling::` step
    #[must_use]
    pub fn sibling(&self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> Self {
        self.then(Axis::Sibling, tag, properties)
    }

    /// `preceding-sibling::` step
    #[must_use]
    pub fn preceding_sibling(
        &self,
        tag: &str,
        properties: impl IntoProperties<XPathProperty>,
    ) -> Self {
        self.then(Axis::PrecedingSibling, tag, properties)
    }

    /// `following::` step
    #[must_use]
    pub fn following(&self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> Self {
        self.then(Axis::Following, tag, properties)
    }

    /// `preceding::` step
    #[must_use]
    pub fn preceding(&self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> Self {
        self.then(Axis::Preceding, tag, properties)
    }

    /// `parent::*` step
    #[must_use]
    pub fn parent(&self) -> Self {
        self.then(Axis::Parent, ANY, ())
    }

    /// Keep only nodes that have a match of `boundary` somewhere after them.
    ///
    /// `boundary` must be page-rooted. Adds a predicate, not a new step.
    #[must_use]
    pub fn limited_by(&self, boundary: &Self) -> Self {
        Self::new(Some(self.clone()), XPathKind::LimitedBy(boundary.clone()))
    }

    /// Previous node in the chain
    #[must_use]
    pub fn predecessor(&self) -> Option<&Self> {
        self.0.predecessor.as_ref()
    }

    /// Axis of this node, `None` for raw text and limited-by predicates
    #[must_use]
    pub fn axis(&self) -> Option<Axis> {
        match &self.0.kind {
            XPathKind::Step { axis, .. } => Some(*axis),
            XPathKind::LimitedBy(_) | XPathKind::Raw(_) => None,
        }
    }

    /// The compiled text with its root axis replaced by `following`.
    pub(crate) fn following_condition(&self) -> LocusResult<String> {
        let text = self.render()?;
        if !self.is_absolute() {
            return Err(LocusError::RelativeBoundary {
                expression: text.to_string(),
            });
        }
        Ok(root_axis().replace(text, "following").into_owned())
    }

    fn compile(&self) -> LocusResult<String> {
        let mut text = match &self.0.predecessor {
            Some(predecessor) => predecessor.render()?.to_string(),
            None => String::new(),
        };
        match &self.0.kind {
            XPathKind::Raw(raw) => text.push_str(raw),
            XPathKind::LimitedBy(boundary) => {
                text.push('[');
                text.push_str(&boundary.following_condition()?);
                text.push(']');
            }
            XPathKind::Step {
                axis,
                tag,
                properties,
            } => {
                if *axis != Axis::Parent {
                    validate_step(Grammar::XPath, tag, !properties.is_empty())?;
                }
                text.push_str(axis.token());
                text.push_str(tag);
                for property in properties {
                    text.push_str(&property.render()?);
                }
            }
        }
        Ok(text)
    }
}

impl Expression for XPath {
    fn grammar(&self) -> Grammar {
        Grammar::XPath
    }

    fn render(&self) -> LocusResult<&str> {
        memoized(&self.0.text, Grammar::XPath, || self.compile())
    }

    fn is_absolute(&self) -> bool {
        let mut node = self;
        while let Some(predecessor) = node.predecessor() {
            node = predecessor;
        }
        node.axis() == Some(Axis::Page)
    }
}

/// Equality is over compiled text; chains that fail to compile are equal to each other.
impl PartialEq for XPath {
    fn eq(&self, other: &Self) -> bool {
        self.render().ok() == other.render().ok()
    }
}

impl Eq for XPath {}

impl Hash for XPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.render().ok().hash(state);
    }
}

/// Entry points for XPath chains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XPathBuilder;

/// Start an XPath chain
#[must_use]
pub const fn xpath() -> XPathBuilder {
    XPathBuilder
}

impl XPathBuilder {
    /// Page-rooted first step; the resulting chain is absolute
    #[must_use]
    pub fn page(self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> XPath {
        XPath::step(None, Axis::Page, tag, properties)
    }

    /// Pre-written XPath text, rendered verbatim without validation
    #[must_use]
    pub fn raw(self, text: impl Into<String>) -> XPath {
        XPath::new(None, XPathKind::Raw(text.into()))
    }

    /// Relative `descendant::` step
    #[must_use]
    pub fn descendant(self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> XPath {
        XPath::step(None, Axis::Descendant, tag, properties)
    }

    /// Relative `child::` step
    #[must_use]
    pub fn child(self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> XPath {
        XPath::step(None, Axis::Child, tag, properties)
    }

    /// Relative `following-sibling::` step
    #[must_use]
    pub fn sibling(self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> XPath {
        XPath::step(None, Axis::Sibling, tag, properties)
    }

    /// Relative `preceding-sibling::` step
    #[must_use]
    pub fn preceding_sibling(
        self,
        tag: &str,
        properties: impl IntoProperties<XPathProperty>,
    ) -> XPath {
        XPath::step(None, Axis::PrecedingSibling, tag, properties)
    }

    /// Relative `following::` step
    #[must_use]
    pub fn following(self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> XPath {
        XPath::step(None, Axis::Following, tag, properties)
    }

    /// Relative `preceding::` step
    #[must_use]
    pub fn preceding(self, tag: &str, properties: impl IntoProperties<XPathProperty>) -> XPath {
        XPath::step(None, Axis::Preceding, tag, properties)
    }

    /// Relative `parent::*` step
    #[must_use]
    pub fn parent(self) -> XPath {
        XPath::step(None, Axis::Parent, ANY, ())
    }
}
