//! Named selector catalogs.
//!
//! Page objects keep their selectors as named constants. A catalog loads
//! those definitions from YAML or JSON, builds each tree through the same
//! node and condition types used in code, and compiles every entry up front
//! so a bad selector is reported by name at load time.
//!
//! ```yaml
//! selectors:
//!   marker:
//!     grammar: xpath
//!     steps:
//!       - axis: page
//!         tag: tr
//!         where:
//!           - attribute: { name: id, value: marker }
//!   rows_before_marker:
//!     grammar: xpath
//!     steps:
//!       - axis: page
//!         tag: table
//!       - axis: descendant
//!         tag: tr
//!       - axis: limited_by
//!         boundary: marker
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::css::{css, CssSelector};
use crate::expression::{Expression, ANY};
use crate::grammar::Grammar;
use crate::locator::Query;
use crate::property::{
    AttributeOp, CssProperty, IndexOp, Negatable, PropertyKind, PropertyLeaf, Pseudo, TextOp,
    XPathProperty,
};
use crate::result::{LocusError, LocusResult};
use crate::xpath::{xpath, XPath};

/// Top-level catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Selector definitions by name
    #[serde(default)]
    pub selectors: BTreeMap<String, SelectorDef>,
}

impl CatalogFile {
    /// Parse a YAML catalog document without building it.
    ///
    /// Conditions are single-key maps (`attribute: { .. }`, `index: { at: 1 }`),
    /// at any nesting depth.
    ///
    /// # Errors
    /// Returns a YAML error for malformed or unknown definitions
    pub fn from_yaml(yaml: &str) -> LocusResult<Self> {
        let deserializer = serde_yaml_ng::Deserializer::from_str(yaml);
        Ok(serde_yaml_ng::with::singleton_map_recursive::deserialize(
            deserializer,
        )?)
    }
}

/// One named selector definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorDef {
    /// Target grammar
    pub grammar: Grammar,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Pre-written grammar text the steps continue from
    #[serde(default)]
    pub raw: Option<String>,
    /// Chain steps, first to last
    #[serde(default)]
    pub steps: Vec<StepDef>,
}

/// Step kinds, covering both grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAxis {
    /// Page-rooted first step
    Page,
    /// Descendant
    Descendant,
    /// Direct child
    Child,
    /// Following sibling
    Sibling,
    /// Immediately following sibling (CSS)
    NextSibling,
    /// Preceding sibling (XPath)
    PrecedingSibling,
    /// Following in document order (XPath)
    Following,
    /// Preceding in document order (XPath)
    Preceding,
    /// Parent element (XPath)
    Parent,
    /// Boundary predicate on the previous step (XPath)
    LimitedBy,
}

/// One step of a selector definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepDef {
    /// Step kind
    pub axis: StepAxis,
    /// Element name; any element when omitted
    #[serde(default)]
    pub tag: Option<String>,
    /// Conditions on the element
    #[serde(default, rename = "where")]
    pub conditions: Vec<ConditionDef>,
    /// Catalog entry used by a `limited_by` step
    #[serde(default)]
    pub boundary: Option<String>,
}

/// A condition in a step's `where` list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionDef {
    /// Element name (CSS)
    Tag(String),
    /// `id` equality (CSS)
    Id(String),
    /// Attribute condition
    Attribute {
        /// Attribute name
        name: String,
        /// Operator, `is` when omitted
        #[serde(default = "default_attribute_op")]
        op: AttributeOp,
        /// Operand
        #[serde(default)]
        value: String,
    },
    /// CSS classes
    Classes(Vec<String>),
    /// Text condition (XPath)
    Text {
        /// Operator, `is` when omitted
        #[serde(default = "default_text_op")]
        op: TextOp,
        /// Operand
        value: String,
    },
    /// Position condition (XPath)
    Index(IndexDef),
    /// Structural pseudo-class (CSS)
    Pseudo(PseudoDef),
    /// Name of a page-rooted XPath entry that must follow the element
    Boundary(String),
    /// Negated condition
    Not(Box<ConditionDef>),
}

const fn default_attribute_op() -> AttributeOp {
    AttributeOp::Is
}

const fn default_text_op() -> TextOp {
    TextOp::Is
}

/// Position condition definition, 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexDef {
    /// Exactly at
    At(usize),
    /// At or after
    From(usize),
    /// At or before
    To(usize),
    /// Last
    Last,
}

/// Structural pseudo-class definition, 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PseudoDef {
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:nth-child`
    NthChild(usize),
    /// `:nth-last-child`
    NthLastChild(usize),
    /// `:nth-of-type`
    NthOfType(usize),
    /// `:nth-last-of-type`
    NthLastOfType(usize),
}

impl From<IndexDef> for IndexOp {
    fn from(def: IndexDef) -> Self {
        match def {
            IndexDef::At(i) => Self::At(i),
            IndexDef::From(i) => Self::From(i),
            IndexDef::To(i) => Self::To(i),
            IndexDef::Last => Self::Last,
        }
    }
}

impl From<PseudoDef> for Pseudo {
    fn from(def: PseudoDef) -> Self {
        match def {
            PseudoDef::FirstChild => Self::FirstChild,
            PseudoDef::LastChild => Self::LastChild,
            PseudoDef::FirstOfType => Self::FirstOfType,
            PseudoDef::LastOfType => Self::LastOfType,
            PseudoDef::NthChild(i) => Self::NthChild(i),
            PseudoDef::NthLastChild(i) => Self::NthLastChild(i),
            PseudoDef::NthOfType(i) => Self::NthOfType(i),
            PseudoDef::NthLastOfType(i) => Self::NthLastOfType(i),
        }
    }
}

/// A built catalog selector of either grammar
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogSelector {
    /// CSS chain
    Css(CssSelector),
    /// XPath chain
    XPath(XPath),
}

impl Expression for CatalogSelector {
    fn grammar(&self) -> Grammar {
        match self {
            Self::Css(_) => Grammar::Css,
            Self::XPath(_) => Grammar::XPath,
        }
    }

    fn render(&self) -> LocusResult<&str> {
        match self {
            Self::Css(selector) => selector.render(),
            Self::XPath(selector) => selector.render(),
        }
    }

    fn is_absolute(&self) -> bool {
        match self {
            Self::Css(selector) => selector.is_absolute(),
            Self::XPath(selector) => selector.is_absolute(),
        }
    }
}

/// A compiled catalog entry
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Entry name
    pub name: String,
    /// Description from the definition
    pub description: Option<String>,
    /// The selector tree
    pub selector: CatalogSelector,
    /// The compiled query
    pub query: Query,
}

/// Named, compiled selectors
#[derive(Debug, Clone, Default)]
pub struct SelectorCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl SelectorCatalog {
    /// Parse and compile a YAML catalog
    ///
    /// # Errors
    /// Returns a YAML error, or the first entry that fails to build
    pub fn from_yaml(yaml: &str) -> LocusResult<Self> {
        Self::from_definitions(&CatalogFile::from_yaml(yaml)?)
    }

    /// Parse and compile a JSON catalog
    ///
    /// # Errors
    /// Returns a JSON error, or the first entry that fails to build
    pub fn from_json(json: &str) -> LocusResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_definitions(&file)
    }

    /// Load and compile a catalog file. `.json` files are read as JSON,
    /// anything else as YAML.
    ///
    /// # Errors
    /// Returns an I/O or parse error, or the first entry that fails to build
    pub fn load(path: &Path) -> LocusResult<Self> {
        let contents = fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents)?,
            _ => Self::from_yaml(&contents)?,
        };
        tracing::info!(path = %path.display(), entries = catalog.len(), "loaded selector catalog");
        Ok(catalog)
    }

    /// Build and compile every definition, in name order
    ///
    /// # Errors
    /// Returns the first entry that fails to build or compile
    pub fn from_definitions(file: &CatalogFile) -> LocusResult<Self> {
        let mut builder = CatalogBuilder {
            definitions: &file.selectors,
            built: BTreeMap::new(),
            in_progress: Vec::new(),
        };

        let mut entries = BTreeMap::new();
        for (name, definition) in &file.selectors {
            let selector = builder.entry(name)?;
            let query =
                Query::compile(&selector).map_err(|e| LocusError::in_entry(name.as_str(), e))?;
            tracing::debug!(entry = %name, query = %query.text, "compiled catalog entry");
            let _ = entries.insert(
                name.clone(),
                CatalogEntry {
                    name: name.clone(),
                    description: definition.description.clone(),
                    selector,
                    query,
                },
            );
        }
        Ok(Self { entries })
    }

    /// Get an entry by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Get an entry by name, failing if it does not exist
    ///
    /// # Errors
    /// Returns a catalog error for unknown names
    pub fn require(&self, name: &str) -> LocusResult<&CatalogEntry> {
        self.get(name)
            .ok_or_else(|| LocusError::catalog(name, "no such selector in catalog"))
    }

    /// Entry names in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Conversion from an untyped leaf into a node family's property type
trait FromLeaf: Sized {
    fn from_leaf(leaf: PropertyLeaf) -> LocusResult<Self>;
}

impl FromLeaf for CssProperty {
    fn from_leaf(leaf: PropertyLeaf) -> LocusResult<Self> {
        Self::try_from_leaf(leaf)
    }
}

impl FromLeaf for XPathProperty {
    fn from_leaf(leaf: PropertyLeaf) -> LocusResult<Self> {
        Self::try_from_leaf(leaf)
    }
}

struct CatalogBuilder<'a> {
    definitions: &'a BTreeMap<String, SelectorDef>,
    built: BTreeMap<String, CatalogSelector>,
    in_progress: Vec<String>,
}

impl CatalogBuilder<'_> {
    fn current(&self) -> &str {
        self.in_progress.last().map_or("", String::as_str)
    }

    fn entry(&mut self, name: &str) -> LocusResult<CatalogSelector> {
        if let Some(selector) = self.built.get(name) {
            return Ok(selector.clone());
        }
        if self.in_progress.iter().any(|n| n == name) {
            let mut cycle = self.in_progress.clone();
            cycle.push(name.to_string());
            return Err(LocusError::catalog(
                self.current(),
                format!("boundary reference cycle: {}", cycle.join(" -> ")),
            ));
        }
        let Some(definition) = self.definitions.get(name) else {
            return Err(LocusError::catalog(
                self.current(),
                format!("unknown selector '{name}'"),
            ));
        };

        self.in_progress.push(name.to_string());
        let result = match definition.grammar {
            Grammar::Css => self.css(definition).map(CatalogSelector::Css),
            Grammar::XPath => self.xpath(definition).map(CatalogSelector::XPath),
        };
        let _ = self.in_progress.pop();

        let selector = result.map_err(|e| LocusError::in_entry(name, e))?;
        let _ = self.built.insert(name.to_string(), selector.clone());
        Ok(selector)
    }

    fn boundary(&mut self, name: &str) -> LocusResult<XPath> {
        match self.entry(name)? {
            CatalogSelector::XPath(boundary) => Ok(boundary),
            CatalogSelector::Css(_) => Err(LocusError::grammar_mismatch(
                format!("boundary '{name}' (a CSS selector)"),
                Grammar::XPath,
            )),
        }
    }

    fn leaf(&mut self, condition: &ConditionDef) -> LocusResult<PropertyLeaf> {
        let kind = match condition {
            ConditionDef::Tag(tag) => PropertyKind::Tag(tag.clone()),
            ConditionDef::Id(id) => PropertyKind::Id(id.clone()),
            ConditionDef::Attribute { name, op, value } => PropertyKind::Attribute {
                name: name.clone(),
                op: *op,
                operand: value.clone(),
            },
            ConditionDef::Classes(classes) => PropertyKind::Classes(classes.clone()),
            ConditionDef::Text { op, value } => PropertyKind::Text {
                op: *op,
                operand: value.clone(),
            },
            ConditionDef::Index(index) => PropertyKind::Index((*index).into()),
            ConditionDef::Pseudo(pseudo) => PropertyKind::Pseudo((*pseudo).into()),
            ConditionDef::Boundary(name) => PropertyKind::Boundary(self.boundary(name)?),
            ConditionDef::Not(inner) => return Ok(self.leaf(inner)?.negate()),
        };
        Ok(PropertyLeaf::new(kind))
    }

    fn properties<P: FromLeaf>(&mut self, step: &StepDef) -> LocusResult<Vec<P>> {
        let mut properties = Vec::with_capacity(step.conditions.len());
        for condition in &step.conditions {
            properties.push(P::from_leaf(self.leaf(condition)?)?);
        }
        Ok(properties)
    }

    fn css(&mut self, definition: &SelectorDef) -> LocusResult<CssSelector> {
        let mut steps = definition.steps.iter();
        let mut selector = match &definition.raw {
            Some(raw) => css().raw(raw.as_str()),
            None => {
                let step = steps.next().ok_or_else(no_steps)?;
                check_step_shape(step)?;
                let tag = step.tag.as_deref().unwrap_or("");
                let properties: Vec<CssProperty> = self.properties(step)?;
                match step.axis {
                    StepAxis::Page => css().page().descendant(tag, properties),
                    StepAxis::Descendant => css().descendant(tag, properties),
                    other => return Err(first_step_error(other, Grammar::Css)),
                }
            }
        };

        for step in steps {
            check_step_shape(step)?;
            let tag = step.tag.as_deref().unwrap_or("");
            let properties: Vec<CssProperty> = self.properties(step)?;
            selector = match step.axis {
                StepAxis::Descendant => selector.descendant(tag, properties),
                StepAxis::Child => selector.child(tag, properties),
                StepAxis::Sibling => selector.sibling(tag, properties),
                StepAxis::NextSibling => selector.next_sibling(tag, properties),
                StepAxis::Page => return Err(page_not_first()),
                other => return Err(axis_mismatch(other, Grammar::Css)),
            };
        }
        Ok(selector)
    }

    fn xpath(&mut self, definition: &SelectorDef) -> LocusResult<XPath> {
        let mut steps = definition.steps.iter();
        let mut node = match &definition.raw {
            Some(raw) => xpath().raw(raw.as_str()),
            None => {
                let step = steps.next().ok_or_else(no_steps)?;
                check_step_shape(step)?;
                let tag = step.tag.as_deref().unwrap_or(ANY);
                let properties: Vec<XPathProperty> = self.properties(step)?;
                let start = xpath();
                match step.axis {
                    StepAxis::Page => start.page(tag, properties),
                    StepAxis::Descendant => start.descendant(tag, properties),
                    StepAxis::Child => start.child(tag, properties),
                    StepAxis::Sibling => start.sibling(tag, properties),
                    StepAxis::PrecedingSibling => start.preceding_sibling(tag, properties),
                    StepAxis::Following => start.following(tag, properties),
                    StepAxis::Preceding => start.preceding(tag, properties),
                    StepAxis::Parent => start.parent(),
                    other => return Err(first_step_error(other, Grammar::XPath)),
                }
            }
        };

        for step in steps {
            check_step_shape(step)?;
            if step.axis == StepAxis::LimitedBy {
                let name = step.boundary.as_deref().ok_or_else(|| {
                    LocusError::validation("a limited_by step needs a boundary entry name")
                })?;
                let boundary = self.boundary(name)?;
                node = node.limited_by(&boundary);
                continue;
            }

            let tag = step.tag.as_deref().unwrap_or(ANY);
            let properties: Vec<XPathProperty> = self.properties(step)?;
            node = match step.axis {
                StepAxis::Descendant => node.descendant(tag, properties),
                StepAxis::Child => node.child(tag, properties),
                StepAxis::Sibling => node.sibling(tag, properties),
                StepAxis::PrecedingSibling => node.preceding_sibling(tag, properties),
                StepAxis::Following => node.following(tag, properties),
                StepAxis::Preceding => node.preceding(tag, properties),
                StepAxis::Parent => node.parent(),
                StepAxis::Page => return Err(page_not_first()),
                other => return Err(axis_mismatch(other, Grammar::XPath)),
            };
        }
        Ok(node)
    }
}

/// Reject step fields the axis has no use for
fn check_step_shape(step: &StepDef) -> LocusResult<()> {
    match step.axis {
        StepAxis::LimitedBy => {
            if step.tag.is_some() || !step.conditions.is_empty() {
                return Err(LocusError::validation(
                    "a `limited_by` step takes only a `boundary`, not `tag` or `where`",
                ));
            }
        }
        StepAxis::Parent => {
            if step.tag.is_some() || !step.conditions.is_empty() {
                return Err(LocusError::validation(
                    "a `parent` step always targets `*` and takes no `tag` or `where`",
                ));
            }
        }
        _ => {}
    }
    if step.axis != StepAxis::LimitedBy && step.boundary.is_some() {
        return Err(LocusError::validation(format!(
            "`boundary` is only valid on a `limited_by` step, not `{:?}`",
            step.axis
        )));
    }
    Ok(())
}

fn no_steps() -> LocusError {
    LocusError::validation("a selector needs `raw` text or at least one step")
}

fn page_not_first() -> LocusError {
    LocusError::validation("`page` is only valid as the first step")
}

fn axis_mismatch(axis: StepAxis, grammar: Grammar) -> LocusError {
    LocusError::grammar_mismatch(format!("{axis:?} step"), grammar)
}

fn first_step_error(axis: StepAxis, grammar: Grammar) -> LocusError {
    match (axis, grammar) {
        (StepAxis::LimitedBy, _) => {
            LocusError::validation("`limited_by` needs a previous step to constrain")
        }
        (StepAxis::Child | StepAxis::Sibling | StepAxis::NextSibling, Grammar::Css) => {
            LocusError::validation("a CSS selector must start with a `page` or `descendant` step")
        }
        (other, grammar) => axis_mismatch(other, grammar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(yaml: &str) -> LocusResult<SelectorCatalog> {
        SelectorCatalog::from_yaml(yaml)
    }

    mod building {
        use super::*;

        #[test]
        fn test_css_entry() {
            let cat = catalog(
                r"
selectors:
  header:
    grammar: css
    steps:
      - axis: page
        tag: table
        where:
          - id: outer-table-1
      - axis: child
        tag: thead
      - axis: descendant
        tag: th
        where:
          - attribute: { name: scope, value: col }
          - not:
              pseudo: first_child
",
            )
            .unwrap();
            let entry = cat.get("header").unwrap();
            assert_eq!(
                entry.query.text,
                "table[id='outer-table-1'] > thead th[scope='col']:not(:first-child)"
            );
            assert!(entry.query.absolute);
            assert_eq!(entry.query.grammar, Grammar::Css);
        }

        #[test]
        fn test_xpath_entry_defaults_to_any_tag() {
            let cat = catalog(
                r"
selectors:
  cell:
    grammar: xpath
    steps:
      - axis: child
        where:
          - text: { op: contains, value: C1 }
          - index: last
",
            )
            .unwrap();
            let entry = cat.get("cell").unwrap();
            assert_eq!(entry.query.text, "/child::*[contains(text(),'C1')][last()]");
            assert!(!entry.query.absolute);
        }

        #[test]
        fn test_raw_entry_continues_with_steps() {
            let cat = catalog(
                r"
selectors:
  section:
    grammar: css
    raw: body > main
    steps:
      - axis: child
        tag: section
",
            )
            .unwrap();
            assert_eq!(cat.get("section").unwrap().query.text, "body > main > section");
        }

        #[test]
        fn test_limited_by_reference() {
            let cat = catalog(
                r"
selectors:
  rows:
    grammar: xpath
    steps:
      - axis: page
        tag: table
      - axis: descendant
        tag: tr
      - axis: limited_by
        boundary: marker
  marker:
    grammar: xpath
    steps:
      - axis: page
        tag: tr
        where:
          - attribute: { name: id, value: marker }
",
            )
            .unwrap();
            assert_eq!(
                cat.get("rows").unwrap().query.text,
                "/descendant::table/descendant::tr[following::tr[@id='marker']]"
            );
            assert_eq!(cat.names(), vec!["marker", "rows"]);
        }

        #[test]
        fn test_negated_boundary_condition() {
            let cat = catalog(
                r"
selectors:
  marker:
    grammar: xpath
    steps:
      - { axis: page, tag: tr, where: [ { classes: [marker] } ] }
  before:
    grammar: xpath
    steps:
      - axis: page
        tag: tr
        where:
          - not:
              boundary: marker
",
            )
            .unwrap();
            assert_eq!(
                cat.get("before").unwrap().query.text,
                "/descendant::tr[not(following::tr\
                 [contains(concat(' ', normalize-space(@class), ' '), ' marker ')])]"
            );
        }

        #[test]
        fn test_empty_catalog() {
            let cat = catalog("selectors: {}\n").unwrap();
            assert!(cat.is_empty());
            assert!(cat.require("missing").is_err());
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_validation_error_names_entry() {
            let err = catalog(
                r"
selectors:
  everything:
    grammar: css
    steps:
      - axis: page
        tag: '*'
",
            )
            .unwrap_err();
            assert!(matches!(&err, LocusError::InEntry { entry, .. } if entry == "everything"));
            assert!(matches!(err.root_cause(), LocusError::UnconstrainedSelector { .. }));
        }

        #[test]
        fn test_condition_for_wrong_grammar() {
            let err = catalog(
                r"
selectors:
  cell:
    grammar: css
    steps:
      - axis: page
        tag: td
        where:
          - index: { at: 1 }
",
            )
            .unwrap_err();
            assert!(matches!(err.root_cause(), LocusError::GrammarMismatch { .. }));
            assert!(err.to_string().contains("'cell'"));
        }

        #[test]
        fn test_axis_for_wrong_grammar() {
            let err = catalog(
                r"
selectors:
  next:
    grammar: xpath
    steps:
      - { axis: page, tag: td }
      - { axis: next_sibling, tag: td }
",
            )
            .unwrap_err();
            assert!(matches!(err.root_cause(), LocusError::GrammarMismatch { .. }));
        }

        #[test]
        fn test_unknown_reference() {
            let err = catalog(
                r"
selectors:
  rows:
    grammar: xpath
    steps:
      - { axis: page, tag: tr }
      - { axis: limited_by, boundary: nowhere }
",
            )
            .unwrap_err();
            match err {
                LocusError::Catalog { entry, message } => {
                    assert_eq!(entry, "rows");
                    assert!(message.contains("nowhere"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_reference_cycle() {
            let err = catalog(
                r"
selectors:
  a:
    grammar: xpath
    steps:
      - { axis: page, tag: tr, where: [ { boundary: b } ] }
  b:
    grammar: xpath
    steps:
      - { axis: page, tag: td, where: [ { boundary: a } ] }
",
            )
            .unwrap_err();
            assert!(matches!(err, LocusError::Catalog { .. }));
            assert!(err.to_string().contains("a -> b -> a"));
        }

        #[test]
        fn test_relative_boundary_entry() {
            let err = catalog(
                r"
selectors:
  marker:
    grammar: xpath
    steps:
      - { axis: child, tag: tr }
  rows:
    grammar: xpath
    steps:
      - { axis: page, tag: tr }
      - { axis: limited_by, boundary: marker }
",
            )
            .unwrap_err();
            assert!(matches!(err.root_cause(), LocusError::RelativeBoundary { .. }));
        }

        #[test]
        fn test_css_boundary_entry() {
            let err = catalog(
                r"
selectors:
  marker:
    grammar: css
    steps:
      - { axis: page, tag: tr }
  rows:
    grammar: xpath
    steps:
      - { axis: page, tag: tr }
      - { axis: limited_by, boundary: marker }
",
            )
            .unwrap_err();
            assert!(matches!(err.root_cause(), LocusError::GrammarMismatch { .. }));
        }

        #[test]
        fn test_page_must_be_first() {
            let err = catalog(
                r"
selectors:
  twice:
    grammar: css
    steps:
      - { axis: page, tag: div }
      - { axis: page, tag: div }
",
            )
            .unwrap_err();
            assert!(err.is_validation());
        }

        #[test]
        fn test_missing_steps() {
            let err = catalog("selectors:\n  empty:\n    grammar: css\n").unwrap_err();
            assert!(err.is_validation());
        }

        #[test]
        fn test_unknown_field_rejected() {
            let err = catalog(
                "selectors:\n  x:\n    grammar: css\n    stepz: []\n",
            )
            .unwrap_err();
            assert!(matches!(err, LocusError::Yaml(_)));
        }

        #[test]
        fn test_limited_by_with_conditions_rejected() {
            let err = catalog(
                r"
selectors:
  marker:
    grammar: xpath
    steps:
      - { axis: page, tag: tr, where: [ { attribute: { name: id, value: m } } ] }
  rows:
    grammar: xpath
    steps:
      - { axis: page, tag: tr }
      - { axis: limited_by, boundary: marker, tag: td }
",
            )
            .unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().contains("'rows'"));
        }

        #[test]
        fn test_parent_with_conditions_rejected() {
            let err = catalog(
                r"
selectors:
  up:
    grammar: xpath
    steps:
      - { axis: page, tag: td }
      - { axis: parent, where: [ { index: last } ] }
",
            )
            .unwrap_err();
            assert!(err.is_validation());
        }

        #[test]
        fn test_boundary_key_on_other_axis_rejected() {
            let err = catalog(
                r"
selectors:
  marker:
    grammar: xpath
    steps:
      - { axis: page, tag: tr, where: [ { attribute: { name: id, value: x } } ] }
  rows:
    grammar: xpath
    steps:
      - { axis: page, tag: tr, boundary: marker }
",
            )
            .unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().contains("limited_by"));
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_yaml_conditions_are_single_key_maps() {
            let file = CatalogFile::from_yaml(
                r#"
selectors:
  cell:
    grammar: xpath
    steps:
      - axis: child
        tag: td
        where:
          - index: { at: 1 }
          - index: last
          - attribute: { name: class, op: whole_word, value: total }
          - not: { text: { op: contains, value: "n/a" } }
          - classes: [a, b]
"#,
            )
            .unwrap();
            let conditions = &file.selectors["cell"].steps[0].conditions;
            assert_eq!(conditions.len(), 5);
            assert!(matches!(conditions[0], ConditionDef::Index(IndexDef::At(1))));
            assert!(matches!(conditions[1], ConditionDef::Index(IndexDef::Last)));
            assert!(matches!(
                &conditions[2],
                ConditionDef::Attribute { op: AttributeOp::WholeWord, .. }
            ));
            assert!(matches!(&conditions[3], ConditionDef::Not(inner)
                if matches!(**inner, ConditionDef::Text { op: TextOp::Contains, .. })));
        }

        #[test]
        fn test_yaml_and_json_build_the_same_entry() {
            let yaml = catalog(
                "selectors:\n  cell:\n    grammar: xpath\n    steps:\n      - { axis: page, tag: td, where: [ { index: { at: 1 } } ] }\n",
            )
            .unwrap();
            let json = SelectorCatalog::from_json(
                r#"{"selectors":{"cell":{"grammar":"xpath","steps":[{"axis":"page","tag":"td","where":[{"index":{"at":1}}]}]}}}"#,
            )
            .unwrap();
            assert_eq!(yaml.require("cell").unwrap().query.text, "/descendant::td[position() = 2]");
            assert_eq!(
                yaml.require("cell").unwrap().query,
                json.require("cell").unwrap().query
            );
        }
    }
}
