//! `vschema check` command implementation.

use std::path::PathBuf;

use clap::Args;
use vschema_config::Config;
use vschema_rules::DirectiveRules;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover vschema.{toml,yaml,yml,json}).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is malformed.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;

        match &config.config_path {
            Some(path) => output.highlight(&format!("Configuration: {}", path.display())),
            None => output.highlight("Configuration: defaults (no file found)"),
        }
        for line in summarize(&config) {
            output.info(&line);
        }
        output.success("Configuration is valid");

        Ok(())
    }
}

/// Human-readable summary lines for a loaded configuration.
fn summarize(config: &Config) -> Vec<String> {
    let mut lines = vec![format!("Schema: {}", config.schema)];
    if let Some(import_from) = &config.import_from {
        lines.push(format!("Import from: {import_from}"));
    }
    if config.directives.is_empty() {
        lines.push("No directives mapped".to_owned());
    }
    for name in config.directives.directive_names() {
        let arguments = config.directives.directive(name).map_or(0, DirectiveRules::len);
        lines.push(format!("  @{name}: {arguments} argument(s)"));
    }
    lines
}
