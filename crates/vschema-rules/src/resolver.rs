//! Rule resolution for a single directive argument.

use crate::placeholder::substitute;
use crate::table::ArgumentRule;

/// A validation rule invocation: rule name plus its resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedRule {
    /// Rule name in the target validation library (e.g., "min", "matches").
    pub rule: String,
    /// Arguments in order, after placeholder substitution.
    pub args: Vec<String>,
}

impl ResolvedRule {
    /// Create a resolved rule.
    #[must_use]
    pub fn new(rule: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            rule: rule.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolve one directive argument occurrence against its configured rule.
///
/// Returns at most one rule. A [`ArgumentRule::ValueKeyed`] rule whose table
/// has no entry for `value` resolves to `None`; partial value tables are
/// expected and unmatched values are skipped silently.
///
/// # Example
///
/// ```
/// use vschema_rules::{ArgumentRule, ResolvedRule, resolve};
///
/// let rule = ArgumentRule::Template {
///     rule: "max".to_owned(),
///     templates: vec!["$1 + 1".to_owned()],
/// };
/// assert_eq!(resolve(&rule, "10"), Some(ResolvedRule::new("max", ["10 + 1"])));
/// ```
#[must_use]
pub fn resolve(rule: &ArgumentRule, value: &str) -> Option<ResolvedRule> {
    match rule {
        ArgumentRule::Rename(name) => Some(ResolvedRule::new(name.as_str(), [value])),
        ArgumentRule::Template { rule, templates } => Some(ResolvedRule {
            rule: rule.clone(),
            args: templates.iter().map(|t| substitute(t, value)).collect(),
        }),
        // The selected rule substitutes the same argument value that selected it.
        ArgumentRule::ValueKeyed(by_value) => resolve(by_value.get(value)?, value),
    }
}
