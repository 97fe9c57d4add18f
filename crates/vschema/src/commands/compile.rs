//! `vschema compile` command implementation.
//!
//! Reads fields with their directive occurrences as JSON and writes the
//! compiled rule sequences as JSON to stdout.

use std::path::PathBuf;

use clap::Args;
use vschema_config::{CliSettings, Config, ValidationSchema};
use vschema_rules::{FieldDirectives, MappingTable, compile_fields_par};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the compile command.
#[derive(Args)]
pub(crate) struct CompileArgs {
    /// Path to configuration file (default: auto-discover vschema.{toml,yaml,yml,json}).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file with fields and their directive occurrences.
    #[arg(short, long)]
    input: PathBuf,

    /// Target validation library (overrides config).
    #[arg(long)]
    schema: Option<ValidationSchema>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

impl CompileArgs {
    /// Execute the compile command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails or the input cannot be
    /// read or parsed.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            schema: self.schema,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        tracing::debug!(input = %self.input.display(), "Reading field input");
        let input = std::fs::read_to_string(&self.input)?;
        let (json, field_count) = compile_input(&input, &config.directives, self.pretty)?;

        output.data(&json)?;
        output.success(&format!(
            "Compiled {field_count} field(s) for {}",
            config.schema
        ));

        Ok(())
    }
}

/// Compile a JSON array of fields, returning the JSON output and field count.
fn compile_input(
    input: &str,
    table: &MappingTable,
    pretty: bool,
) -> Result<(String, usize), CliError> {
    let fields: Vec<FieldDirectives> = serde_json::from_str(input)?;
    let compiled = compile_fields_par(&fields, table);

    let json = if pretty {
        serde_json::to_string_pretty(&compiled)?
    } else {
        serde_json::to_string(&compiled)?
    };

    Ok((json, compiled.len()))
}
