//! Check command handler

use console::style;
use locus::SelectorCatalog;

use crate::commands::CheckArgs;
use crate::config::CliConfig;
use crate::error::CliResult;

/// Execute the check command. Any invalid entry is returned as an error.
pub fn execute_check(config: &CliConfig, args: &CheckArgs) -> CliResult<String> {
    let catalog = SelectorCatalog::load(&args.catalog)?;
    if config.verbosity.is_quiet() {
        return Ok(String::new());
    }

    let color = config.color.should_color();
    let mut out = format!(
        "{} {}: {} selector(s) compiled\n",
        style("✓").green().force_styling(color),
        args.catalog.display(),
        catalog.len()
    );
    if config.verbosity.is_verbose() {
        for name in catalog.names() {
            out.push_str(&format!("  {name}\n"));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorChoice, Verbosity};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    fn plain() -> CliConfig {
        CliConfig::new().with_color(ColorChoice::Never)
    }

    const VALID: &str = "selectors:\n  title:\n    grammar: css\n    steps:\n      - { axis: page, tag: h1 }\n";

    #[test]
    fn test_valid_catalog() {
        let catalog = file(VALID);
        let args = CheckArgs {
            catalog: catalog.path().into(),
        };
        let out = execute_check(&plain(), &args).unwrap();
        assert!(out.starts_with("✓ "));
        assert!(out.contains("1 selector(s) compiled"));
    }

    #[test]
    fn test_verbose_lists_names() {
        let catalog = file(VALID);
        let args = CheckArgs {
            catalog: catalog.path().into(),
        };
        let out = execute_check(&plain().with_verbosity(Verbosity::Verbose), &args).unwrap();
        assert!(out.contains("  title\n"));
    }

    #[test]
    fn test_quiet_prints_nothing() {
        let catalog = file(VALID);
        let args = CheckArgs {
            catalog: catalog.path().into(),
        };
        let out = execute_check(&plain().with_verbosity(Verbosity::Quiet), &args).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_catalog() {
        let catalog = file("selectors:\n  all:\n    grammar: xpath\n    steps:\n      - { axis: page, tag: '*' }\n");
        let args = CheckArgs {
            catalog: catalog.path().into(),
        };
        let err = execute_check(&plain(), &args).unwrap_err();
        assert!(err.to_string().contains("'all'"));
    }
}
