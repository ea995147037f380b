//! Property leaves: the atomic conditions attached to selector nodes.
//!
//! A [`PropertyLeaf`] knows how to render itself for either grammar. Which
//! grammar a leaf may be attached to is carried by its wrapper type:
//! [`CssProperty`] and [`XPathProperty`] are accepted by the matching node
//! family only, and [`SharedProperty`] converts into both.

use serde::{Deserialize, Serialize};

use crate::grammar::Grammar;
use crate::literal;
use crate::result::{LocusError, LocusResult};
use crate::xpath::XPath;

/// Attribute comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeOp {
    /// Exact value match
    Is,
    /// Attribute exists, any value
    IsPresent,
    /// Value contains the operand
    Contains,
    /// Value starts with the operand
    StartsWith,
    /// Value ends with the operand
    EndsWith,
    /// Operand is one of the whitespace-separated words of the value
    WholeWord,
}

/// Text-content comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOp {
    /// Exact text match
    Is,
    /// Text contains the operand
    Contains,
    /// Text starts with the operand
    StartsWith,
    /// Text ends with the operand
    EndsWith,
    /// Operand is one of the whitespace-separated words of the text
    WholeWord,
}

/// Position conditions. Indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexOp {
    /// Exactly at index
    At(usize),
    /// At or after index
    From(usize),
    /// At or before index
    To(usize),
    /// Last matching node
    Last,
}

/// Structural pseudo-classes. Indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pseudo {
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:nth-child(n)`
    NthChild(usize),
    /// `:nth-last-child(n)`
    NthLastChild(usize),
    /// `:nth-of-type(n)`
    NthOfType(usize),
    /// `:nth-last-of-type(n)`
    NthLastOfType(usize),
}

impl Pseudo {
    fn token(self) -> LocusResult<String> {
        Ok(match self {
            Self::FirstChild => ":first-child".to_string(),
            Self::LastChild => ":last-child".to_string(),
            Self::FirstOfType => ":first-of-type".to_string(),
            Self::LastOfType => ":last-of-type".to_string(),
            Self::NthChild(i) => format!(":nth-child({})", one_based(i)?),
            Self::NthLastChild(i) => format!(":nth-last-child({})", one_based(i)?),
            Self::NthOfType(i) => format!(":nth-of-type({})", one_based(i)?),
            Self::NthLastOfType(i) => format!(":nth-last-of-type({})", one_based(i)?),
        })
    }
}

/// 0-based index to the 1-based number both grammars use
fn one_based(index: usize) -> LocusResult<usize> {
    index
        .checked_add(1)
        .ok_or_else(|| LocusError::validation(format!("index {index} is out of range")))
}

/// The closed set of condition kinds
#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// Element name as a condition (CSS only)
    Tag(String),
    /// `id` attribute equality (CSS only)
    Id(String),
    /// Attribute condition
    Attribute {
        /// Attribute name
        name: String,
        /// Comparison operator
        op: AttributeOp,
        /// Operand (unused for [`AttributeOp::IsPresent`])
        operand: String,
    },
    /// All of the listed CSS classes
    Classes(Vec<String>),
    /// Text-content condition (XPath only)
    Text {
        /// Comparison operator
        op: TextOp,
        /// Operand
        operand: String,
    },
    /// Position condition (XPath only)
    Index(IndexOp),
    /// Structural pseudo-class (CSS only)
    Pseudo(Pseudo),
    /// Existence of a page-rooted expression after this node (XPath only)
    Boundary(XPath),
}

impl PropertyKind {
    /// Whether this kind can be rendered in `grammar`
    #[must_use]
    pub const fn supports(&self, grammar: Grammar) -> bool {
        match self {
            Self::Attribute { .. } | Self::Classes(_) => true,
            Self::Tag(_) | Self::Id(_) | Self::Pseudo(_) => matches!(grammar, Grammar::Css),
            Self::Text { .. } | Self::Index(_) | Self::Boundary(_) => {
                matches!(grammar, Grammar::XPath)
            }
        }
    }

    /// Short human-readable name
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Tag(_) => "tag condition",
            Self::Id(_) => "id condition",
            Self::Attribute { .. } => "attribute condition",
            Self::Classes(_) => "CSS classes condition",
            Self::Text { .. } => "text condition",
            Self::Index(_) => "index condition",
            Self::Pseudo(_) => "structural pseudo-class",
            Self::Boundary(_) => "boundary condition",
        }
    }
}

/// An atomic condition, possibly negated
#[derive(Debug, Clone)]
pub struct PropertyLeaf {
    kind: PropertyKind,
    negated: bool,
}

impl PropertyLeaf {
    pub(crate) const fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            negated: false,
        }
    }

    /// The condition kind
    #[must_use]
    pub const fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// Render this leaf for `grammar`.
    ///
    /// # Errors
    ///
    /// Returns [`LocusError::GrammarMismatch`] if the kind is not available in
    /// `grammar`, or a validation error if names contain whitespace or a
    /// boundary expression is relative.
    pub fn render(&self, grammar: Grammar) -> LocusResult<String> {
        match grammar {
            Grammar::Css => self.render_css(),
            Grammar::XPath => self.render_xpath(),
        }
    }

    fn render_css(&self) -> LocusResult<String> {
        let bracketed = match &self.kind {
            PropertyKind::Tag(tag) => {
                let tag = checked_name("Tag", tag)?;
                return Ok(self.css_negation(tag.to_string()));
            }
            PropertyKind::Pseudo(pseudo) => return Ok(self.css_negation(pseudo.token()?)),
            PropertyKind::Classes(classes) => {
                let mut selector = String::new();
                for class in checked_classes(classes)? {
                    selector.push('.');
                    selector.push_str(class);
                }
                return Ok(self.css_negation(selector));
            }
            PropertyKind::Id(id) => {
                let id = checked_name("ID", id)?;
                format!("[id={}]", literal::css(id))
            }
            PropertyKind::Attribute { name, op, operand } => {
                let name = checked_name("Attribute", name)?;
                let value = literal::css(operand);
                match op {
                    AttributeOp::Is => format!("[{name}={value}]"),
                    AttributeOp::IsPresent => format!("[{name}]"),
                    AttributeOp::Contains => format!("[{name}*={value}]"),
                    AttributeOp::StartsWith => format!("[{name}^={value}]"),
                    AttributeOp::EndsWith => format!("[{name}$={value}]"),
                    AttributeOp::WholeWord => format!("[{name}~={value}]"),
                }
            }
            PropertyKind::Text { .. } | PropertyKind::Index(_) | PropertyKind::Boundary(_) => {
                return Err(LocusError::grammar_mismatch(
                    self.kind.describe(),
                    Grammar::Css,
                ));
            }
        };
        Ok(self.css_negation(bracketed))
    }

    fn css_negation(&self, selector: String) -> String {
        if self.negated {
            format!(":not({selector})")
        } else {
            selector
        }
    }

    fn render_xpath(&self) -> LocusResult<String> {
        let condition = match &self.kind {
            PropertyKind::Attribute { name, op, operand } => {
                let subject = format!("@{}", checked_name("Attribute", name)?);
                match op {
                    AttributeOp::IsPresent => subject,
                    AttributeOp::Is => xpath_match(&subject, TextOp::Is, operand),
                    AttributeOp::Contains => xpath_match(&subject, TextOp::Contains, operand),
                    AttributeOp::StartsWith => xpath_match(&subject, TextOp::StartsWith, operand),
                    AttributeOp::EndsWith => xpath_match(&subject, TextOp::EndsWith, operand),
                    AttributeOp::WholeWord => xpath_match(&subject, TextOp::WholeWord, operand),
                }
            }
            PropertyKind::Classes(classes) => {
                // One predicate per class; whole-word matching avoids `btn` matching `btn-primary`.
                let mut predicates = String::new();
                for class in checked_classes(classes)? {
                    let condition = xpath_match("@class", TextOp::WholeWord, class);
                    predicates.push_str(&self.xpath_predicate(&condition));
                }
                return Ok(predicates);
            }
            PropertyKind::Text { op, operand } => xpath_match("text()", *op, operand),
            PropertyKind::Index(index) => match index {
                IndexOp::At(i) => format!("position() = {}", one_based(*i)?),
                IndexOp::From(i) => format!("position() >= {}", one_based(*i)?),
                IndexOp::To(i) => format!("position() <= {}", one_based(*i)?),
                IndexOp::Last => "last()".to_string(),
            },
            PropertyKind::Boundary(boundary) => boundary.following_condition()?,
            PropertyKind::Tag(_) | PropertyKind::Id(_) | PropertyKind::Pseudo(_) => {
                return Err(LocusError::grammar_mismatch(
                    self.kind.describe(),
                    Grammar::XPath,
                ));
            }
        };
        Ok(self.xpath_predicate(&condition))
    }

    fn xpath_predicate(&self, condition: &str) -> String {
        if self.negated {
            format!("[not({condition})]")
        } else {
            format!("[{condition}]")
        }
    }
}

fn xpath_match(subject: &str, op: TextOp, operand: &str) -> String {
    let value = literal::xpath(operand);
    match op {
        TextOp::Is => format!("{subject}={value}"),
        TextOp::Contains => format!("contains({subject},{value})"),
        TextOp::StartsWith => format!("starts-with({subject},{value})"),
        TextOp::EndsWith => format!(
            "substring({subject}, string-length({subject}) - string-length({value})+1) = {value}"
        ),
        TextOp::WholeWord => format!(
            "contains(concat(' ', normalize-space({subject}), ' '), {})",
            literal::xpath(&format!(" {operand} "))
        ),
    }
}

fn checked_name<'a>(what: &'static str, name: &'a str) -> LocusResult<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LocusError::validation(format!("{what} should not be empty")));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(LocusError::whitespace(what, name));
    }
    Ok(name)
}

fn checked_classes(classes: &[String]) -> LocusResult<Vec<&str>> {
    if classes.is_empty() {
        return Err(LocusError::validation(
            "At least one CSS class is required",
        ));
    }
    classes
        .iter()
        .map(|class| checked_name("CSS class", class))
        .collect()
}

/// Anything that can be negated with [`crate::dsl::not`]
pub trait Negatable {
    /// Return the same condition, negated. Negation is set, never toggled.
    #[must_use]
    fn negate(self) -> Self;

    /// Whether the condition is negated
    fn is_negated(&self) -> bool;
}

impl Negatable for PropertyLeaf {
    fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    fn is_negated(&self) -> bool {
        self.negated
    }
}

macro_rules! grammar_property {
    ($(#[$meta:meta])* $name:ident, $grammar:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(PropertyLeaf);

        impl $name {
            pub(crate) const fn new(kind: PropertyKind) -> Self {
                Self(PropertyLeaf::new(kind))
            }

            /// Wrap a leaf, checking that its kind is available in this grammar.
            ///
            /// # Errors
            ///
            /// Returns [`LocusError::GrammarMismatch`] for kinds of the other grammar.
            pub fn try_from_leaf(leaf: PropertyLeaf) -> LocusResult<Self> {
                if leaf.kind().supports($grammar) {
                    Ok(Self(leaf))
                } else {
                    Err(LocusError::grammar_mismatch(leaf.kind().describe(), $grammar))
                }
            }

            /// The wrapped leaf
            #[must_use]
            pub const fn leaf(&self) -> &PropertyLeaf {
                &self.0
            }

            pub(crate) fn render(&self) -> LocusResult<String> {
                self.0.render($grammar)
            }
        }

        impl Negatable for $name {
            fn negate(self) -> Self {
                Self(self.0.negate())
            }

            fn is_negated(&self) -> bool {
                self.0.is_negated()
            }
        }

        impl From<SharedProperty> for $name {
            fn from(shared: SharedProperty) -> Self {
                Self(shared.0)
            }
        }
    };
}

grammar_property!(
    /// A condition accepted by CSS selector nodes
    CssProperty,
    Grammar::Css
);

grammar_property!(
    /// A condition accepted by XPath nodes
    XPathProperty,
    Grammar::XPath
);

/// A condition valid in both grammars (attributes, CSS classes)
#[derive(Debug, Clone)]
pub struct SharedProperty(PropertyLeaf);

impl SharedProperty {
    pub(crate) const fn new(kind: PropertyKind) -> Self {
        Self(PropertyLeaf::new(kind))
    }

    /// The wrapped leaf
    #[must_use]
    pub const fn leaf(&self) -> &PropertyLeaf {
        &self.0
    }

    /// Render this condition for `grammar`
    ///
    /// # Errors
    ///
    /// Returns a validation error if names contain whitespace.
    pub fn render(&self, grammar: Grammar) -> LocusResult<String> {
        self.0.render(grammar)
    }
}

impl Negatable for SharedProperty {
    fn negate(self) -> Self {
        Self(self.0.negate())
    }

    fn is_negated(&self) -> bool {
        self.0.is_negated()
    }
}

/// Conversion of the second argument of node constructors into a property list.
///
/// Implemented for `()`, single properties, tuples, arrays and vectors of
/// anything convertible into the node family's property type, so callers can
/// write `child("td", ())`, `child("td", id("x"))` or
/// `child("td", (attr("class").is_present(), last_of_type()))`.
pub trait IntoProperties<P> {
    /// Collect into an ordered property list
    fn into_properties(self) -> Vec<P>;
}

impl<P> IntoProperties<P> for () {
    fn into_properties(self) -> Vec<P> {
        Vec::new()
    }
}

impl IntoProperties<CssProperty> for CssProperty {
    fn into_properties(self) -> Vec<CssProperty> {
        vec![self]
    }
}

impl IntoProperties<XPathProperty> for XPathProperty {
    fn into_properties(self) -> Vec<XPathProperty> {
        vec![self]
    }
}

impl IntoProperties<CssProperty> for SharedProperty {
    fn into_properties(self) -> Vec<CssProperty> {
        vec![self.into()]
    }
}

impl IntoProperties<XPathProperty> for SharedProperty {
    fn into_properties(self) -> Vec<XPathProperty> {
        vec![self.into()]
    }
}

impl<P, A: Into<P>> IntoProperties<P> for Vec<A> {
    fn into_properties(self) -> Vec<P> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<P, A: Into<P>, const N: usize> IntoProperties<P> for [A; N] {
    fn into_properties(self) -> Vec<P> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! tuple_properties {
    ($($name:ident),+) => {
        impl<P, $($name: Into<P>),+> IntoProperties<P> for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_properties(self) -> Vec<P> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_properties!(A);
tuple_properties!(A, B);
tuple_properties!(A, B, C);
tuple_properties!(A, B, C, D);
tuple_properties!(A, B, C, D, E);
tuple_properties!(A, B, C, D, E, F);
