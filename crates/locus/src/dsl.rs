//! Condition constructors.
//!
//! Free functions producing the property leaves consumed by node
//! constructors. Nothing here validates; names are checked when the owning
//! node is first rendered.
//!
//! ```
//! use locus::prelude::*;
//!
//! let header = css()
//!     .page()
//!     .descendant("table", id("outer-table-1"))
//!     .child("thead", ())
//!     .descendant("th", (attr("scope").is("col"), not(first_child())));
//! assert_eq!(
//!     header.render().unwrap(),
//!     "table[id='outer-table-1'] > thead th[scope='col']:not(:first-child)"
//! );
//! ```

use crate::property::{
    AttributeOp, CssProperty, IndexOp, Negatable, PropertyKind, Pseudo, SharedProperty, TextOp,
    XPathProperty,
};
use crate::xpath::XPath;

/// Element name as a condition (CSS)
#[must_use]
pub fn tag(name: impl Into<String>) -> CssProperty {
    CssProperty::new(PropertyKind::Tag(name.into()))
}

/// `id` equality (CSS). Renders `[id='value']`.
#[must_use]
pub fn id(value: impl Into<String>) -> CssProperty {
    CssProperty::new(PropertyKind::Id(value.into()))
}

/// `id` attribute equality, valid in both grammars
#[must_use]
pub fn id_is(value: impl Into<String>) -> SharedProperty {
    attr("id").is(value)
}

/// Attribute condition builder
#[must_use]
pub fn attr(name: impl Into<String>) -> AttributeCondition {
    AttributeCondition { name: name.into() }
}

/// Shortcut for `attr("id")`
#[must_use]
pub fn id_attr() -> AttributeCondition {
    attr("id")
}

/// Shortcut for `attr("name")`
#[must_use]
pub fn name_attr() -> AttributeCondition {
    attr("name")
}

/// Shortcut for `attr("type")`
#[must_use]
pub fn type_attr() -> AttributeCondition {
    attr("type")
}

/// Element carries all of the given classes
#[must_use]
pub fn css_classes<I, S>(names: I) -> SharedProperty
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SharedProperty::new(PropertyKind::Classes(
        names.into_iter().map(Into::into).collect(),
    ))
}

/// Text-content condition builder (XPath)
#[must_use]
pub const fn text() -> TextCondition {
    TextCondition
}

/// Node at 0-based position `index` (XPath)
#[must_use]
pub const fn index_of(index: usize) -> XPathProperty {
    XPathProperty::new(PropertyKind::Index(IndexOp::At(index)))
}

/// Nodes at or after 0-based position `index` (XPath)
#[must_use]
pub const fn index_from(index: usize) -> XPathProperty {
    XPathProperty::new(PropertyKind::Index(IndexOp::From(index)))
}

/// Nodes at or before 0-based position `index` (XPath)
#[must_use]
pub const fn index_to(index: usize) -> XPathProperty {
    XPathProperty::new(PropertyKind::Index(IndexOp::To(index)))
}

/// First node, same as `index_of(0)` (XPath)
#[must_use]
pub const fn first() -> XPathProperty {
    index_of(0)
}

/// Last node (XPath)
#[must_use]
pub const fn last() -> XPathProperty {
    XPathProperty::new(PropertyKind::Index(IndexOp::Last))
}

const fn pseudo(pseudo: Pseudo) -> CssProperty {
    CssProperty::new(PropertyKind::Pseudo(pseudo))
}

/// `:nth-child`, 0-based (CSS)
#[must_use]
pub const fn nth_child(index: usize) -> CssProperty {
    pseudo(Pseudo::NthChild(index))
}

/// `:nth-last-child`, 0-based (CSS)
#[must_use]
pub const fn nth_last_child(index: usize) -> CssProperty {
    pseudo(Pseudo::NthLastChild(index))
}

/// `:nth-of-type`, 0-based (CSS)
#[must_use]
pub const fn nth_of_type(index: usize) -> CssProperty {
    pseudo(Pseudo::NthOfType(index))
}

/// `:nth-last-of-type`, 0-based (CSS)
#[must_use]
pub const fn nth_last_of_type(index: usize) -> CssProperty {
    pseudo(Pseudo::NthLastOfType(index))
}

/// `:first-child` (CSS)
#[must_use]
pub const fn first_child() -> CssProperty {
    pseudo(Pseudo::FirstChild)
}

/// `:last-child` (CSS)
#[must_use]
pub const fn last_child() -> CssProperty {
    pseudo(Pseudo::LastChild)
}

/// `:first-of-type` (CSS)
#[must_use]
pub const fn first_of_type() -> CssProperty {
    pseudo(Pseudo::FirstOfType)
}

/// `:last-of-type` (CSS)
#[must_use]
pub const fn last_of_type() -> CssProperty {
    pseudo(Pseudo::LastOfType)
}

/// Require `expr` to match somewhere after the current node (XPath).
///
/// `expr` must be page-rooted; a relative expression fails when the owning
/// node is rendered.
#[must_use]
pub fn boundary(expr: &XPath) -> XPathProperty {
    XPathProperty::new(PropertyKind::Boundary(expr.clone()))
}

/// Negate a condition. Negating twice keeps it negated.
#[must_use]
pub fn not<L: Negatable>(leaf: L) -> L {
    leaf.negate()
}

/// Pending attribute condition, completed by choosing an operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCondition {
    name: String,
}

impl AttributeCondition {
    fn with(self, op: AttributeOp, operand: impl Into<String>) -> SharedProperty {
        SharedProperty::new(PropertyKind::Attribute {
            name: self.name,
            op,
            operand: operand.into(),
        })
    }

    /// Attribute name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value equals `value`
    #[must_use]
    pub fn is(self, value: impl Into<String>) -> SharedProperty {
        self.with(AttributeOp::Is, value)
    }

    /// Attribute is present
    #[must_use]
    pub fn is_present(self) -> SharedProperty {
        self.with(AttributeOp::IsPresent, String::new())
    }

    /// Value contains `value`
    #[must_use]
    pub fn contains(self, value: impl Into<String>) -> SharedProperty {
        self.with(AttributeOp::Contains, value)
    }

    /// Value starts with `value`
    #[must_use]
    pub fn starts_with(self, value: impl Into<String>) -> SharedProperty {
        self.with(AttributeOp::StartsWith, value)
    }

    /// Value ends with `value`
    #[must_use]
    pub fn ends_with(self, value: impl Into<String>) -> SharedProperty {
        self.with(AttributeOp::EndsWith, value)
    }

    /// `value` is one of the whitespace-separated words of the attribute
    #[must_use]
    pub fn whole_word(self, value: impl Into<String>) -> SharedProperty {
        self.with(AttributeOp::WholeWord, value)
    }

    /// Complete with an operator chosen at runtime
    #[must_use]
    pub fn with_op(self, op: AttributeOp, value: impl Into<String>) -> SharedProperty {
        self.with(op, value)
    }
}

/// Pending text condition, completed by choosing an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextCondition;

impl TextCondition {
    /// Complete with an operator chosen at runtime
    #[must_use]
    pub fn with_op(self, op: TextOp, value: impl Into<String>) -> XPathProperty {
        XPathProperty::new(PropertyKind::Text {
            op,
            operand: value.into(),
        })
    }

    /// Text equals `value`
    #[must_use]
    pub fn is(self, value: impl Into<String>) -> XPathProperty {
        self.with_op(TextOp::Is, value)
    }

    /// Text contains `value`
    #[must_use]
    pub fn contains(self, value: impl Into<String>) -> XPathProperty {
        self.with_op(TextOp::Contains, value)
    }

    /// Text starts with `value`
    #[must_use]
    pub fn starts_with(self, value: impl Into<String>) -> XPathProperty {
        self.with_op(TextOp::StartsWith, value)
    }

    /// Text ends with `value`
    #[must_use]
    pub fn ends_with(self, value: impl Into<String>) -> XPathProperty {
        self.with_op(TextOp::EndsWith, value)
    }

    /// `value` is one of the whitespace-separated words of the text
    #[must_use]
    pub fn whole_word(self, value: impl Into<String>) -> XPathProperty {
        self.with_op(TextOp::WholeWord, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn test_attribute_shortcuts() {
        assert_eq!(id_attr().name(), "id");
        assert_eq!(name_attr().name(), "name");
        assert_eq!(type_attr().name(), "type");
    }

    #[test]
    fn test_id_is_matches_attr_id() {
        let shortcut = id_is("x").render(Grammar::XPath).unwrap();
        let long = attr("id").is("x").render(Grammar::XPath).unwrap();
        assert_eq!(shortcut, long);
        assert_eq!(shortcut, "[@id='x']");
    }

    #[test]
    fn test_not_negates() {
        assert!(!css_classes(["a"]).is_negated());
        assert!(not(css_classes(["a"])).is_negated());
        assert_eq!(
            not(css_classes(["a"])).render(Grammar::Css).unwrap(),
            ":not(.a)"
        );
        assert_eq!(
            not(attr("class").is("a")).render(Grammar::XPath).unwrap(),
            "[not(@class='a')]"
        );
    }

    #[test]
    fn test_double_not_stays_negated() {
        let twice = not(not(nth_child(0)));
        assert!(twice.is_negated());
        assert_eq!(twice.render().unwrap(), ":not(:nth-child(1))");
    }

    #[test]
    fn test_index_constructors() {
        assert_eq!(index_of(0).render().unwrap(), "[position() = 1]");
        assert_eq!(index_of(4).render().unwrap(), "[position() = 5]");
        assert_eq!(first().render().unwrap(), "[position() = 1]");
        assert_eq!(last().render().unwrap(), "[last()]");
    }

    #[test]
    fn test_text_operators() {
        assert_eq!(
            text().starts_with("C1").render().unwrap(),
            "[starts-with(text(),'C1')]"
        );
        assert_eq!(
            text().whole_word("C1").render().unwrap(),
            "[contains(concat(' ', normalize-space(text()), ' '), ' C1 ')]"
        );
    }

    #[test]
    fn test_constructing_never_validates() {
        let bad = attr("data id").is("x");
        assert!(bad.render(Grammar::Css).is_err());
    }
}
