//! Locus: typed selector trees compiled to CSS or XPath.
//!
//! A selector is an immutable chain of nodes, each carrying a tag and a list
//! of conditions. Chains are built from [`css()`] or [`xpath()`], compiled on
//! first [`Expression::render`], and cached for the life of the node.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ css()/xpath()│───►│ node chain   │───►│ render()     │───►│ ElementLoc-  │
//! │ + dsl leaves │    │ (Arc-shared) │    │ (memoized)   │    │ ator/Query   │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use locus::prelude::*;
//!
//! let marker = xpath().page("tr", id_is("marker"));
//! let rows = xpath()
//!     .page("table", id_is("outer-table-1"))
//!     .descendant("tr", ())
//!     .limited_by(&marker);
//!
//! assert_eq!(
//!     rows.render().unwrap(),
//!     "/descendant::table[@id='outer-table-1']/descendant::tr[following::tr[@id='marker']]"
//! );
//! assert!(rows.is_absolute());
//! ```

#![warn(missing_docs)]

mod catalog;
mod config;
mod css;
pub mod dsl;
mod expression;
mod grammar;
mod literal;
mod locator;
mod property;
mod result;
mod xpath;

pub use catalog::{
    CatalogEntry, CatalogFile, CatalogSelector, ConditionDef, IndexDef, PseudoDef,
    SelectorCatalog, SelectorDef, StepAxis, StepDef,
};
pub use config::{LocatorConfig, DEFAULT_CONTEXT_PREFIX};
pub use css::{css, CssBuilder, CssCombinator, CssPage, CssSelector};
pub use expression::{Expression, ANY};
pub use grammar::Grammar;
pub use locator::{resolve, resolve_one, ElementLocator, Query};
pub use property::{
    AttributeOp, CssProperty, IndexOp, IntoProperties, Negatable, PropertyKind, PropertyLeaf,
    Pseudo, SharedProperty, TextOp, XPathProperty,
};
pub use result::{LocusError, LocusResult};
pub use xpath::{xpath, Axis, XPath, XPathBuilder};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::css::css;
    pub use super::dsl::*;
    pub use super::xpath::xpath;
    pub use super::{
        resolve, resolve_one, CssSelector, ElementLocator, Expression, Grammar, LocatorConfig,
        LocusError, LocusResult, Query, SelectorCatalog, XPath, ANY,
    };
}
