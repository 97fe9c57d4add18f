//! Directive-to-validation-rule compiler.
//!
//! Turns the directives applied to a GraphQL schema field into an ordered list
//! of validation rule invocations, driven by a user-supplied mapping table.
//!
//! # Architecture
//!
//! - [`MappingTable`]: normalized configuration, validated once at construction
//! - [`substitute`]: `$1` placeholder replacement inside argument templates
//! - [`resolve`]: one directive argument to at most one [`ResolvedRule`]
//! - [`compile`]: one field's [`DirectiveOccurrence`]s to a [`FieldRuleSequence`]
//!
//! Building a table is the only fallible step. Unmapped directives, unmapped
//! arguments and unmatched value-keyed values produce no rules and no errors.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use vschema_rules::{DirectiveOccurrence, MappingTable, ResolvedRule};
//!
//! let table = MappingTable::from_value(&json!({
//!     "constraint": {
//!         "minLength": "min",
//!         "pattern": ["matches", "/$1/"]
//!     }
//! }))?;
//!
//! let occurrence = DirectiveOccurrence::new("constraint")
//!     .with_argument("minLength", "3")
//!     .with_argument("pattern", "^a");
//!
//! let rules = table.compile(&[occurrence]);
//! assert_eq!(
//!     rules.as_slice(),
//!     &[
//!         ResolvedRule::new("min", ["3"]),
//!         ResolvedRule::new("matches", ["/^a/"]),
//!     ]
//! );
//! # Ok::<(), vschema_rules::ConfigError>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for occurrences and compiled rules
//! - `parallel`: [`compile_fields_par`] on the rayon thread pool

mod compiler;
mod error;
mod occurrence;
mod placeholder;
mod resolver;
mod table;

#[cfg(feature = "parallel")]
pub use compiler::compile_fields_par;
pub use compiler::{CompiledField, FieldRuleSequence, compile, compile_fields};
pub use error::{ConfigError, RuleShapeError};
pub use occurrence::{DirectiveArgument, DirectiveOccurrence, FieldDirectives};
pub use placeholder::{PLACEHOLDER, substitute};
pub use resolver::{ResolvedRule, resolve};
pub use table::{ArgumentRule, DirectiveConfig, DirectiveRules, MappingTable};
