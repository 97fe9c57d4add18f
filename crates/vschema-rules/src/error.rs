//! Configuration errors raised while building a [`MappingTable`](crate::MappingTable).
//!
//! All validation happens once, at table construction. Compiling fields
//! against a built table cannot fail.

/// Error raised when the directive configuration is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configuration root is not a mapping of directive names.
    #[error("directives must map directive names to arguments, found {found}")]
    NotAMapping {
        /// JSON kind of the offending value (e.g., "array").
        found: &'static str,
    },
    /// A directive entry is not a mapping of argument names.
    #[error("directive `{directive}` must map argument names to rules, found {found}")]
    InvalidDirective {
        /// Directive name as written in the configuration.
        directive: String,
        /// JSON kind of the offending value.
        found: &'static str,
    },
    /// An argument rule has an unsupported shape.
    #[error("invalid rule at `{}`: {reason}", rule_path(.directive, .argument, .key.as_deref()))]
    InvalidRule {
        /// Directive name.
        directive: String,
        /// Argument name within the directive.
        argument: String,
        /// Value key when the bad entry sits inside a value-keyed mapping.
        key: Option<String>,
        /// What is wrong with the entry.
        reason: RuleShapeError,
    },
}

/// Shape problem found in a single argument rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleShapeError {
    /// Array shorthand without a rule name.
    #[error("array shorthand must start with a rule name")]
    EmptyArray,
    /// Rule name is an empty string.
    #[error("rule name cannot be empty")]
    EmptyRuleName,
    /// Array shorthand containing something other than a string.
    #[error("array shorthand element {index} must be a string, found {found}")]
    NonStringElement {
        /// Zero-based position in the array.
        index: usize,
        /// JSON kind of the element.
        found: &'static str,
    },
    /// Value is neither a string, an array of strings, nor a mapping.
    #[error("expected a rule name, an array of strings or a value mapping, found {found}")]
    UnsupportedValue {
        /// JSON kind of the value.
        found: &'static str,
    },
    /// A value mapping nested inside another value mapping.
    #[error("value mappings cannot be nested")]
    TooDeep,
}

/// Dotted location of a rule entry, e.g. `constraint.format.uri`.
fn rule_path(directive: &str, argument: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("{directive}.{argument}.{key}"),
        None => format!("{directive}.{argument}"),
    }
}
