//! Directive mapping table.
//!
//! Normalizes the three configuration shorthands into [`ArgumentRule`]:
//!
//! - `"min"` - rename: the argument value becomes the rule's only argument
//! - `["matches", "/^$1/"]` - template: rule name followed by argument templates
//! - `{ uri: "url", email: "email" }` - value-keyed: the argument value selects a rule
//!
//! The whole configuration is validated when the table is built, so lookups
//! and compilation never fail afterwards.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::compiler::{FieldRuleSequence, compile};
use crate::error::{ConfigError, RuleShapeError};
use crate::occurrence::DirectiveOccurrence;

/// Value-keyed mappings may appear directly under an argument, but not inside
/// another value-keyed mapping.
const MAX_NESTING: usize = 1;

/// Raw directive configuration: directive name to argument name to shorthand.
pub type DirectiveConfig = HashMap<String, HashMap<String, Value>>;

/// Normalized rule for one directive argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentRule {
    /// Single rule whose only argument is the raw directive argument value.
    Rename(String),
    /// Single rule whose arguments are built from templates containing `$1`.
    Template {
        /// Rule name.
        rule: String,
        /// Argument templates, in order.
        templates: Vec<String>,
    },
    /// Rule selected by the raw argument value. Unmatched values select nothing.
    ValueKeyed(HashMap<String, ArgumentRule>),
}

impl ArgumentRule {
    fn from_value(value: &Value, depth: usize) -> Result<Self, ShapeError> {
        match value {
            Value::String(rule) => {
                require_rule_name(rule)?;
                Ok(Self::Rename(rule.clone()))
            }
            Value::Array(items) => {
                let mut strings = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let Value::String(s) = item else {
                        return Err(RuleShapeError::NonStringElement {
                            index,
                            found: value_kind(item),
                        }
                        .into());
                    };
                    strings.push(s.clone());
                }
                let mut strings = strings.into_iter();
                let rule = strings.next().ok_or(RuleShapeError::EmptyArray)?;
                require_rule_name(&rule)?;
                Ok(Self::Template {
                    rule,
                    templates: strings.collect(),
                })
            }
            Value::Object(entries) => {
                if depth >= MAX_NESTING {
                    return Err(RuleShapeError::TooDeep.into());
                }
                let mut keyed = HashMap::with_capacity(entries.len());
                for (key, entry) in sorted_entries(entries) {
                    let rule = Self::from_value(entry, depth + 1).map_err(|e| e.at_key(key))?;
                    keyed.insert(key.clone(), rule);
                }
                Ok(Self::ValueKeyed(keyed))
            }
            other => Err(RuleShapeError::UnsupportedValue {
                found: value_kind(other),
            }
            .into()),
        }
    }
}

/// Shape error plus the value key it occurred under, if any.
struct ShapeError {
    key: Option<String>,
    reason: RuleShapeError,
}

impl ShapeError {
    fn at_key(mut self, key: &str) -> Self {
        if self.key.is_none() {
            self.key = Some(key.to_owned());
        }
        self
    }
}

impl From<RuleShapeError> for ShapeError {
    fn from(reason: RuleShapeError) -> Self {
        Self { key: None, reason }
    }
}

fn require_rule_name(rule: &str) -> Result<(), RuleShapeError> {
    if rule.is_empty() {
        return Err(RuleShapeError::EmptyRuleName);
    }
    Ok(())
}

/// Argument rules configured for a single directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveRules {
    arguments: HashMap<String, ArgumentRule>,
}

impl DirectiveRules {
    /// Get the rule for an argument.
    #[must_use]
    pub fn get(&self, argument: &str) -> Option<&ArgumentRule> {
        self.arguments.get(argument)
    }

    /// Number of mapped arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Check if no arguments are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    fn build(directive: &str, mut entries: Vec<(&String, &Value)>) -> Result<Self, ConfigError> {
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut arguments = HashMap::with_capacity(entries.len());
        for (argument, value) in entries {
            let rule =
                ArgumentRule::from_value(value, 0).map_err(|e| ConfigError::InvalidRule {
                    directive: directive.to_owned(),
                    argument: argument.clone(),
                    key: e.key,
                    reason: e.reason,
                })?;
            arguments.insert(argument.clone(), rule);
        }
        Ok(Self { arguments })
    }
}

/// Immutable lookup from directive and argument names to [`ArgumentRule`].
///
/// Built once from configuration and shared read-only for the whole
/// compilation. Names are case-sensitive.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use vschema_rules::{ArgumentRule, MappingTable};
///
/// let table = MappingTable::from_value(&json!({
///     "constraint": { "minLength": "min" }
/// }))
/// .unwrap();
///
/// assert_eq!(
///     table.get("constraint", "minLength"),
///     Some(&ArgumentRule::Rename("min".to_owned()))
/// );
/// assert!(table.get("constraint", "maxLength").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    directives: HashMap<String, DirectiveRules>,
}

impl MappingTable {
    /// Build a table from a raw JSON-shaped configuration value.
    ///
    /// `null` produces an empty table. Entries are validated in sorted key
    /// order, so the same invalid configuration always reports the same error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any directive or argument entry is malformed.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let directives = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(directives) => directives,
            other => {
                return Err(ConfigError::NotAMapping {
                    found: value_kind(other),
                });
            }
        };

        let mut table = Self::default();
        for (directive, arguments) in sorted_entries(directives) {
            let Value::Object(arguments) = arguments else {
                return Err(ConfigError::InvalidDirective {
                    directive: directive.clone(),
                    found: value_kind(arguments),
                });
            };
            let rules = DirectiveRules::build(directive, arguments.iter().collect())?;
            table.directives.insert(directive.clone(), rules);
        }

        tracing::debug!(directives = table.len(), "Built directive mapping table");
        Ok(table)
    }

    /// Build a table from an already-typed raw configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any argument entry is malformed.
    pub fn from_config(config: &DirectiveConfig) -> Result<Self, ConfigError> {
        let mut entries: Vec<_> = config.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut table = Self::default();
        for (directive, arguments) in entries {
            let rules = DirectiveRules::build(directive, arguments.iter().collect())?;
            table.directives.insert(directive.clone(), rules);
        }

        tracing::debug!(directives = table.len(), "Built directive mapping table");
        Ok(table)
    }

    /// Get the rules configured for a directive.
    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&DirectiveRules> {
        self.directives.get(name)
    }

    /// Get the rule for a directive argument.
    #[must_use]
    pub fn get(&self, directive: &str, argument: &str) -> Option<&ArgumentRule> {
        self.directive(directive)?.get(argument)
    }

    /// Check if a directive has an entry.
    #[must_use]
    pub fn contains_directive(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    /// Mapped directive names in sorted order.
    #[must_use]
    pub fn directive_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.directives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of mapped directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Check if the table maps no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Compile a field's directive occurrences against this table.
    ///
    /// Shorthand for [`compile`](crate::compile).
    #[must_use]
    pub fn compile(&self, occurrences: &[DirectiveOccurrence]) -> FieldRuleSequence {
        compile(occurrences, self)
    }
}

/// Entries of a JSON object sorted by key.
fn sorted_entries(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries
}

/// Name of a JSON value's kind for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
