//! Config command handler

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::CliResult;

/// Execute the config command: the effective configuration as YAML
pub fn execute_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<String> {
    if args.defaults {
        CliConfig::new().to_yaml()
    } else {
        config.to_yaml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_effective_config() {
        let config = CliConfig::new().with_format(OutputFormat::Json);
        let out = execute_config(&config, &ConfigArgs { defaults: false }).unwrap();
        assert!(out.contains("format: json"));
        assert!(out.contains("xpath_context_prefix:"));
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::new().with_format(OutputFormat::Json);
        let out = execute_config(&config, &ConfigArgs { defaults: true }).unwrap();
        assert!(out.contains("format: text"));
    }
}
