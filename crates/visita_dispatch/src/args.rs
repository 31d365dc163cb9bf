//! Trailing visit arguments.
//!
//! A visit takes an optional prefix override and an optional context. Typed
//! callers build `VisitArgs` directly; dynamic callers hand over up to two
//! loosely-typed values and let [`VisitArgs::from_values`] sort them out:
//!
//! | values             | prefix   | context |
//! |--------------------|----------|---------|
//! | `[]`               | default  | none    |
//! | `[hash]`           | default  | hash    |
//! | `[string]`         | string   | none    |
//! | `[string, hash]`   | string   | hash    |
//!
//! Anything else is an invalid-argument error.

use visita_core::{invalid_argument, Context, DispatchResult, Value};

/// Prefix override and context for one visit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisitArgs {
    prefix: Option<String>,
    context: Option<Context>,
}

impl VisitArgs {
    /// No override, no context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the visited entity's handler prefix for this visit.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Forward `context` to the invoked handler.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Resolve loosely-typed trailing arguments by arity and type.
    pub fn from_values(values: &[Value]) -> DispatchResult<Self> {
        match values {
            [] => Ok(Self::new()),
            [Value::Map(context)] => Ok(Self::new().with_context(context.clone())),
            [Value::Str(prefix)] => Ok(Self::new().with_prefix(prefix.clone())),
            [other] => Err(invalid_argument(format!(
                "acceptPrefix is of an invalid type: {}",
                other.type_label()
            ))),
            [Value::Str(prefix), Value::Map(context)] => Ok(Self::new()
                .with_prefix(prefix.clone())
                .with_context(context.clone())),
            [Value::Str(_), other] => Err(invalid_argument(format!(
                "context is of an invalid type: {}",
                other.type_label()
            ))),
            [other, _] => Err(invalid_argument(format!(
                "acceptPrefix is of an invalid type: {}",
                other.type_label()
            ))),
            _ => Err(invalid_argument(format!(
                "too many arguments supplied to visit: expected at most 2, got {}",
                values.len()
            ))),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}

impl From<&str> for VisitArgs {
    fn from(prefix: &str) -> Self {
        Self::new().with_prefix(prefix)
    }
}

impl From<String> for VisitArgs {
    fn from(prefix: String) -> Self {
        Self::new().with_prefix(prefix)
    }
}

impl From<Context> for VisitArgs {
    fn from(context: Context) -> Self {
        Self::new().with_context(context)
    }
}

impl From<(&str, Context)> for VisitArgs {
    fn from((prefix, context): (&str, Context)) -> Self {
        Self::new().with_prefix(prefix).with_context(context)
    }
}

impl From<()> for VisitArgs {
    fn from((): ()) -> Self {
        Self::new()
    }
}
