//! Handler-name derivation.
//!
//! A handler name is `prefix + discriminant`. The discriminant comes either
//! from a property value (first character upper-cased, rest verbatim) or from
//! the trailing segment of a type identifier. Both pieces are validated here
//! so the resolver can rely on `Discriminant` and `HandlerName` being
//! well-formed.

use std::fmt;

use crate::{discriminant_resolution, handler_name_construction, DispatchResult, Value};

/// Prefix used when neither the entity nor the call supplies one.
pub const DEFAULT_ACCEPT_PREFIX: &str = "accept";

/// Suffix of the fallback handler invoked when no specific handler matches.
pub const UNKNOWN_VISITED_SUFFIX: &str = "UnknownVisited";

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[inline]
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Upper-case the first character and keep the rest verbatim.
///
/// `"aBC"` becomes `"ABC"`, `"add"` becomes `"Add"`, `""` stays empty.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trailing identifier of a possibly-qualified type identifier.
///
/// Namespace separators are `.` and `::`; the segment after the last one is
/// returned. An unqualified identifier is its own simple name. Returns `None`
/// when the segment is empty or is not a plain identifier.
pub fn simple_type_name(identifier: &str) -> Option<&str> {
    let after_path = identifier.rfind("::").map(|i| i + 2);
    let after_dot = identifier.rfind('.').map(|i| i + 1);
    let start = after_path.max(after_dot).unwrap_or(0);
    let segment = &identifier[start..];
    if segment.is_empty() || !segment.chars().all(is_word_char) {
        return None;
    }
    Some(segment)
}

/// The derived string that selects a handler.
///
/// Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Discriminant(String);

impl Discriminant {
    /// Build a discriminant from a raw property-style value.
    ///
    /// The value must start with a word character and must not span lines.
    pub fn new(raw: &str) -> DispatchResult<Self> {
        let starts_with_word = raw.chars().next().is_some_and(is_word_char);
        if !starts_with_word || raw.chars().any(is_line_terminator) {
            return Err(discriminant_resolution(format!(
                "unable to generate a name from value {raw:?}"
            )));
        }
        Ok(Discriminant(capitalize_first(raw)))
    }

    /// Derive from the value of the property named `key`.
    pub fn from_property(key: &str, value: Option<&Value>) -> DispatchResult<Self> {
        match value {
            None | Some(Value::Nil) => Err(discriminant_resolution(format!(
                "property `{key}` has no value"
            ))),
            Some(Value::Str(raw)) => Self::new(raw),
            Some(other) => Err(discriminant_resolution(format!(
                "property `{key}` holds a {}, expected a string",
                other.type_label()
            ))),
        }
    }

    /// Derive from a (possibly qualified) type identifier.
    pub fn from_type_identifier(identifier: Option<&str>) -> DispatchResult<Self> {
        let Some(identifier) = identifier else {
            return Err(discriminant_resolution(
                "visited entity has no type identifier",
            ));
        };
        match simple_type_name(identifier) {
            Some(simple) => Ok(Discriminant(simple.to_owned())),
            None => Err(discriminant_resolution(format!(
                "unable to find a simple type name in {identifier:?}"
            ))),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A composed handler name such as `acceptFoo` or `acceptUnknownVisited`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerName(String);

impl HandlerName {
    /// `prefix + discriminant`. Both pieces must be non-empty.
    pub fn compose(prefix: &str, discriminant: &Discriminant) -> DispatchResult<Self> {
        if prefix.is_empty() || discriminant.as_str().is_empty() {
            return Err(handler_name_construction(prefix, discriminant.as_str()));
        }
        Ok(HandlerName(format!("{prefix}{discriminant}")))
    }

    /// `prefix + UnknownVisited`.
    pub fn fallback(prefix: &str) -> DispatchResult<Self> {
        if prefix.is_empty() {
            return Err(handler_name_construction(prefix, UNKNOWN_VISITED_SUFFIX));
        }
        Ok(HandlerName(format!("{prefix}{UNKNOWN_VISITED_SUFFIX}")))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HandlerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
