//! Directive applications on schema fields.
//!
//! A [`DirectiveOccurrence`] is one `@name(arg: value, ...)` application as
//! supplied by the schema walker. Argument order is source order and is
//! preserved through compilation.

/// One named argument of a directive application.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectiveArgument {
    /// Argument name (e.g., "minLength").
    pub name: String,
    /// Raw argument value as text (e.g., "3", "^a", "uri").
    #[cfg_attr(feature = "serde", serde(deserialize_with = "scalar_to_string"))]
    pub value: String,
}

/// One application of a directive to a schema field.
///
/// # Example
///
/// ```
/// use vschema_rules::DirectiveOccurrence;
///
/// let occurrence = DirectiveOccurrence::new("constraint")
///     .with_argument("minLength", "3")
///     .with_argument("pattern", "^a");
///
/// assert_eq!(occurrence.to_syntax(), r#"@constraint(minLength: "3", pattern: "^a")"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectiveOccurrence {
    /// Directive name without the `@` prefix.
    pub name: String,
    /// Arguments in source order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub arguments: Vec<DirectiveArgument>,
}

impl DirectiveOccurrence {
    /// Create an occurrence with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Append an argument after the existing ones.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push(DirectiveArgument {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Render the occurrence as `@name(arg: "value", ...)`.
    ///
    /// Used when tracing skipped directives and arguments. Values are always
    /// rendered as quoted strings.
    #[must_use]
    pub fn to_syntax(&self) -> String {
        let mut result = format!("@{}", self.name);

        if self.arguments.is_empty() {
            return result;
        }

        let args: Vec<String> = self
            .arguments
            .iter()
            .map(|arg| {
                let escaped = arg.value.replace('\\', r"\\").replace('"', r#"\""#);
                format!(r#"{}: "{escaped}""#, arg.name)
            })
            .collect();

        result.push('(');
        result.push_str(&args.join(", "));
        result.push(')');
        result
    }
}

/// Directive occurrences attached to one field, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDirectives {
    /// Field identifier (e.g., `UserInput.name`).
    pub field: String,
    /// Directive applications in source order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub directives: Vec<DirectiveOccurrence>,
}

impl FieldDirectives {
    /// Create a field with no directives.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            directives: Vec::new(),
        }
    }

    /// Append a directive occurrence.
    #[must_use]
    pub fn with_directive(mut self, occurrence: DirectiveOccurrence) -> Self {
        self.directives.push(occurrence);
        self
    }
}

/// Accept string, number or boolean argument values as text.
#[cfg(feature = "serde")]
fn scalar_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    use serde::de::Error;
    use serde_json::Value;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "argument value must be a string, number or boolean, found {}",
            crate::table::value_kind(&other)
        ))),
    }
}
