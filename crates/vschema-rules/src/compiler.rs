//! Field directive compilation.
//!
//! Walks a field's directive occurrences in source order, then each
//! occurrence's arguments in source order, and concatenates the resolved
//! rules. Nothing is sorted, merged or deduplicated: two directives that both
//! produce `min` yield two `min` rules.

use crate::occurrence::{DirectiveOccurrence, FieldDirectives};
use crate::resolver::{ResolvedRule, resolve};
use crate::table::MappingTable;

/// Ordered rules compiled for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct FieldRuleSequence(Vec<ResolvedRule>);

impl FieldRuleSequence {
    /// Rules as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ResolvedRule] {
        &self.0
    }

    /// Iterate over rules in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedRule> {
        self.0.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no rules were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take ownership of the rules.
    #[must_use]
    pub fn into_inner(self) -> Vec<ResolvedRule> {
        self.0
    }
}

impl From<Vec<ResolvedRule>> for FieldRuleSequence {
    fn from(rules: Vec<ResolvedRule>) -> Self {
        Self(rules)
    }
}

impl IntoIterator for FieldRuleSequence {
    type Item = ResolvedRule;
    type IntoIter = std::vec::IntoIter<ResolvedRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldRuleSequence {
    type Item = &'a ResolvedRule;
    type IntoIter = std::slice::Iter<'a, ResolvedRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Compiled rules for a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompiledField {
    /// Field identifier, copied from [`FieldDirectives::field`].
    pub field: String,
    /// Rules in directive order, then argument order.
    pub rules: FieldRuleSequence,
}

/// Compile one field's directive occurrences into its rule sequence.
///
/// Directives without a table entry and arguments without a rule are
/// skipped, as are value-keyed arguments whose value has no entry.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use vschema_rules::{DirectiveOccurrence, MappingTable, ResolvedRule, compile};
///
/// let table = MappingTable::from_value(&json!({
///     "constraint": { "format": { "uri": "url", "email": "email" } }
/// }))
/// .unwrap();
///
/// let uri = DirectiveOccurrence::new("constraint").with_argument("format", "uri");
/// assert_eq!(compile(&[uri], &table).as_slice(), &[ResolvedRule::new("url", ["uri"])]);
///
/// let ipv4 = DirectiveOccurrence::new("constraint").with_argument("format", "ipv4");
/// assert!(compile(&[ipv4], &table).is_empty());
/// ```
#[must_use]
pub fn compile(occurrences: &[DirectiveOccurrence], table: &MappingTable) -> FieldRuleSequence {
    let mut rules = Vec::new();

    for occurrence in occurrences {
        let Some(directive) = table.directive(&occurrence.name) else {
            tracing::trace!(occurrence = %occurrence.to_syntax(), "Directive has no mapping");
            continue;
        };

        for argument in &occurrence.arguments {
            let Some(rule) = directive.get(&argument.name) else {
                tracing::trace!(
                    occurrence = %occurrence.to_syntax(),
                    argument = %argument.name,
                    "Argument has no mapping"
                );
                continue;
            };
            rules.extend(resolve(rule, &argument.value));
        }
    }

    FieldRuleSequence(rules)
}

fn compile_field(field: &FieldDirectives, table: &MappingTable) -> CompiledField {
    let rules = compile(&field.directives, table);
    tracing::trace!(field = %field.field, rules = rules.len(), "Compiled field");
    CompiledField {
        field: field.field.clone(),
        rules,
    }
}

/// Compile every field, preserving field order.
#[must_use]
pub fn compile_fields(fields: &[FieldDirectives], table: &MappingTable) -> Vec<CompiledField> {
    let compiled: Vec<_> = fields.iter().map(|f| compile_field(f, table)).collect();
    tracing::debug!(field_count = fields.len(), "Compiled field directives");
    compiled
}

/// Compile every field on the global rayon thread pool.
///
/// Output is identical to [`compile_fields`], including field order.
#[cfg(feature = "parallel")]
#[must_use]
pub fn compile_fields_par(fields: &[FieldDirectives], table: &MappingTable) -> Vec<CompiledField> {
    use rayon::prelude::*;

    let compiled: Vec<_> = fields.par_iter().map(|f| compile_field(f, table)).collect();
    tracing::debug!(field_count = fields.len(), "Compiled field directives in parallel");
    compiled
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn constraint_table() -> MappingTable {
        MappingTable::from_value(&json!({
            "constraint": {
                "minLength": "min",
                "maxLength": "max",
                "startsWith": ["matches", "/^$1/"],
                "endsWith": ["matches", "/$1$/"],
                "pattern": ["matches", "/$1/"],
                "format": {"uri": "url", "email": "email", "uuid": "uuid"},
                "min": ["min", "$1 - 1"],
                "max": ["max", "$1 + 1"],
                "exclusiveMin": "min"
            },
            "required": {"msg": "required"}
        }))
        .unwrap()
    }

    fn rules(sequence: &FieldRuleSequence) -> Vec<(&str, Vec<&str>)> {
        sequence
            .iter()
            .map(|r| (r.rule.as_str(), r.args.iter().map(String::as_str).collect()))
            .collect()
    }

    #[test]
    fn test_rename_and_template_in_argument_order() {
        let table = MappingTable::from_value(&json!({
            "constraint": {"minLength": "min", "pattern": ["matches", "/$1/"]}
        }))
        .unwrap();
        let occurrence = DirectiveOccurrence::new("constraint")
            .with_argument("minLength", "3")
            .with_argument("pattern", "^a");

        assert_eq!(
            compile(&[occurrence], &table).into_inner(),
            vec![
                ResolvedRule::new("min", ["3"]),
                ResolvedRule::new("matches", ["/^a/"]),
            ]
        );
    }

    #[test]
    fn test_argument_order_follows_source_not_table() {
        let occurrence = DirectiveOccurrence::new("constraint")
            .with_argument("pattern", "x")
            .with_argument("minLength", "1");
        assert_eq!(
            rules(&compile(&[occurrence], &constraint_table())),
            vec![("matches", vec!["/x/"]), ("min", vec!["1"])]
        );
    }

    #[test]
    fn test_value_keyed_match_and_miss() {
        let table = constraint_table();
        let uri = DirectiveOccurrence::new("constraint").with_argument("format", "uri");
        let ipv4 = DirectiveOccurrence::new("constraint").with_argument("format", "ipv4");

        assert_eq!(rules(&compile(&[uri], &table)), vec![("url", vec!["uri"])]);
        assert!(compile(&[ipv4], &table).is_empty());
    }

    #[test]
    fn test_unmatched_value_does_not_affect_siblings() {
        let occurrence = DirectiveOccurrence::new("constraint")
            .with_argument("minLength", "2")
            .with_argument("format", "ipv4")
            .with_argument("maxLength", "8");
        assert_eq!(
            rules(&compile(&[occurrence], &constraint_table())),
            vec![("min", vec!["2"]), ("max", vec!["8"])]
        );
    }

    #[test]
    fn test_directive_order_preserved() {
        let occurrences = [
            DirectiveOccurrence::new("required").with_argument("msg", "Name is required"),
            DirectiveOccurrence::new("constraint").with_argument("maxLength", "50"),
        ];
        assert_eq!(
            rules(&compile(&occurrences, &constraint_table())),
            vec![
                ("required", vec!["Name is required"]),
                ("max", vec!["50"])
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let occurrences = [
            DirectiveOccurrence::new("constraint").with_argument("minLength", "3"),
            DirectiveOccurrence::new("constraint").with_argument("minLength", "3"),
        ];
        let compiled = compile(&occurrences, &constraint_table());
        assert_eq!(compiled.len(), 2);
        assert_eq!(compiled.as_slice()[0], compiled.as_slice()[1]);
    }

    #[test]
    fn test_conflicting_rules_are_not_merged() {
        let occurrence = DirectiveOccurrence::new("constraint")
            .with_argument("min", "4")
            .with_argument("exclusiveMin", "4");
        assert_eq!(
            rules(&compile(&[occurrence], &constraint_table())),
            vec![("min", vec!["4 - 1"]), ("min", vec!["4"])]
        );
    }

    #[test]
    fn test_unmapped_directive_skipped() {
        let occurrences = [
            DirectiveOccurrence::new("deprecated").with_argument("reason", "old"),
            DirectiveOccurrence::new("constraint").with_argument("minLength", "1"),
            DirectiveOccurrence::new("auth").with_argument("requires", "ADMIN"),
        ];
        assert_eq!(
            rules(&compile(&occurrences, &constraint_table())),
            vec![("min", vec!["1"])]
        );
    }

    #[test]
    fn test_unmapped_argument_skipped() {
        let occurrence = DirectiveOccurrence::new("constraint")
            .with_argument("uniqueTypeName", "Name_String")
            .with_argument("endsWith", "z");
        assert_eq!(
            rules(&compile(&[occurrence], &constraint_table())),
            vec![("matches", vec!["/z$/"])]
        );
    }

    #[test]
    fn test_skips_are_traced_with_source_syntax() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let occurrences = [
            DirectiveOccurrence::new("deprecated").with_argument("reason", "old"),
            DirectiveOccurrence::new("constraint")
                .with_argument("uniqueTypeName", "Name_String")
                .with_argument("minLength", "1"),
        ];
        let compiled = tracing::subscriber::with_default(subscriber, || {
            compile(&occurrences, &constraint_table())
        });
        assert_eq!(rules(&compiled), vec![("min", vec!["1"])]);

        let logs = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains(r#"Directive has no mapping occurrence=@deprecated(reason: "old")"#));
        assert!(logs.contains(
            r#"Argument has no mapping occurrence=@constraint(uniqueTypeName: "Name_String", minLength: "1") argument=uniqueTypeName"#
        ));
    }

    #[test]
    fn test_no_occurrences() {
        assert!(compile(&[], &constraint_table()).is_empty());
    }

    #[test]
    fn test_empty_table_produces_nothing() {
        let occurrence = DirectiveOccurrence::new("constraint").with_argument("minLength", "1");
        assert!(compile(&[occurrence], &MappingTable::default()).is_empty());
    }

    #[test]
    fn test_table_compile_shorthand() {
        let table = constraint_table();
        let occurrences = [DirectiveOccurrence::new("constraint").with_argument("startsWith", "ab")];
        assert_eq!(table.compile(&occurrences), compile(&occurrences, &table));
    }

    #[test]
    fn test_compile_fields_preserves_order() {
        let fields = vec![
            FieldDirectives::new("UserInput.name").with_directive(
                DirectiveOccurrence::new("constraint").with_argument("minLength", "1"),
            ),
            FieldDirectives::new("UserInput.age"),
            FieldDirectives::new("UserInput.website").with_directive(
                DirectiveOccurrence::new("constraint").with_argument("format", "uri"),
            ),
        ];

        let compiled = compile_fields(&fields, &constraint_table());
        let names: Vec<&str> = compiled.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(names, vec!["UserInput.name", "UserInput.age", "UserInput.website"]);
        assert_eq!(rules(&compiled[0].rules), vec![("min", vec!["1"])]);
        assert!(compiled[1].rules.is_empty());
        assert_eq!(rules(&compiled[2].rules), vec![("url", vec!["uri"])]);
    }

    #[test]
    fn test_sequence_iteration() {
        let sequence = FieldRuleSequence::from(vec![
            ResolvedRule::new("min", ["1"]),
            ResolvedRule::new("max", ["2"]),
        ]);
        let borrowed: Vec<&str> = (&sequence).into_iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(borrowed, vec!["min", "max"]);
        let owned: Vec<String> = sequence.into_iter().map(|r| r.rule).collect();
        assert_eq!(owned, vec!["min".to_owned(), "max".to_owned()]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let fields: Vec<FieldDirectives> = (0..200)
            .map(|i| {
                FieldDirectives::new(format!("Input.field{i}")).with_directive(
                    DirectiveOccurrence::new("constraint")
                        .with_argument("minLength", i.to_string())
                        .with_argument("format", if i % 2 == 0 { "uri" } else { "ipv4" }),
                )
            })
            .collect();
        let table = constraint_table();
        assert_eq!(
            compile_fields_par(&fields, &table),
            compile_fields(&fields, &table)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_compiled_field_serializes_rules_as_array() {
        let compiled = CompiledField {
            field: "UserInput.name".to_owned(),
            rules: FieldRuleSequence::from(vec![ResolvedRule::new("min", ["3"])]),
        };
        assert_eq!(
            serde_json::to_value(&compiled).unwrap(),
            json!({"field": "UserInput.name", "rules": [{"rule": "min", "args": ["3"]}]})
        );
    }
}
