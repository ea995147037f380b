//! Compile command handler

use console::style;
use locus::{CatalogEntry, Expression, Grammar, Query, SelectorCatalog};
use serde::Serialize;

use crate::commands::CompileArgs;
use crate::config::{CliConfig, OutputFormat};
use crate::error::{CliError, CliResult};

/// One compiled entry as printed in JSON output
#[derive(Debug, Serialize)]
pub struct CompiledEntry<'a> {
    /// Entry name
    pub name: &'a str,
    /// Entry description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    /// Compiled query text
    pub text: &'a str,
    /// Grammar of the text
    pub grammar: Grammar,
    /// Whether the query searches the whole page
    pub absolute: bool,
    /// Text used when searching under a context element
    pub scoped_text: String,
}

/// Execute the compile command
pub fn execute_compile(config: &CliConfig, args: &CompileArgs) -> CliResult<String> {
    let catalog = SelectorCatalog::load(&args.catalog)?;
    let entries: Vec<&CatalogEntry> = match &args.name {
        Some(name) => vec![catalog.get(name).ok_or_else(|| {
            CliError::invalid_argument(format!(
                "no selector named '{name}' (available: {})",
                catalog.names().join(", ")
            ))
        })?],
        None => catalog.iter().collect(),
    };
    tracing::debug!(catalog = %args.catalog.display(), entries = entries.len(), "compiling catalog");

    let format = args.format.map_or(config.format, Into::into);
    match format {
        OutputFormat::Text => render_text(&entries, config),
        OutputFormat::Json => render_json(&entries, config),
    }
}

/// Describe each entry in JSON form
pub fn compiled_entries<'a>(
    entries: &[&'a CatalogEntry],
    config: &CliConfig,
) -> CliResult<Vec<CompiledEntry<'a>>> {
    entries
        .iter()
        .map(|entry| {
            let scoped = Query::compile_with(&entry.selector, &config.locator)?;
            Ok(CompiledEntry {
                name: &entry.name,
                description: entry.description.as_deref(),
                text: &entry.query.text,
                grammar: entry.selector.grammar(),
                absolute: entry.query.absolute,
                scoped_text: scoped.scoped_text(),
            })
        })
        .collect()
}

/// Render entries as pretty-printed JSON
pub fn render_json(entries: &[&CatalogEntry], config: &CliConfig) -> CliResult<String> {
    let compiled = compiled_entries(entries, config)?;
    let mut json = serde_json::to_string_pretty(&compiled)?;
    json.push('\n');
    Ok(json)
}

/// Render entries as human-readable text
pub fn render_text(entries: &[&CatalogEntry], config: &CliConfig) -> CliResult<String> {
    let color = config.color.should_color();
    let mut out = String::new();
    for entry in entries {
        let anchor = if entry.query.absolute {
            "absolute"
        } else {
            "relative"
        };
        let header = format!(
            "{} ({}, {anchor})",
            style(&entry.name).bold().force_styling(color),
            entry.query.grammar.as_str()
        );
        out.push_str(&header);
        out.push('\n');
        if config.verbosity.is_verbose() {
            if let Some(description) = &entry.description {
                out.push_str(&format!("  # {description}\n"));
            }
        }
        out.push_str(&format!("  {}\n", entry.query.text));
    }
    Ok(out)
}
