//! `$1` placeholder substitution for rule argument templates.

/// Token replaced with the directive argument's raw value.
pub const PLACEHOLDER: &str = "$1";

/// Replace every `$1` in `template` with `value`.
///
/// Other characters are copied unchanged and no other placeholder syntax is
/// recognized. The result is plain text: `"$1 - 1"` with `"4"` yields
/// `"4 - 1"`, never `"3"`.
///
/// # Example
///
/// ```
/// use vschema_rules::substitute;
///
/// assert_eq!(substitute("/^$1/", "abc"), "/^abc/");
/// assert_eq!(substitute("$1-$1", "x"), "x-x");
/// assert_eq!(substitute("email", "ignored"), "email");
/// ```
#[must_use]
pub fn substitute(template: &str, value: &str) -> String {
    template.replace(PLACEHOLDER, value)
}
