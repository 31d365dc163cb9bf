//! Minimal dynamic object model.
//!
//! An `Object` has a qualified class name, a property table, a table of named
//! methods, and optional visitable configuration. It satisfies every
//! collaborator trait, so dynamically-shaped entities and visitors (scripting
//! hosts, configuration-driven visitors, tests) can take part in dispatch
//! without a dedicated Rust type per shape.
//!
//! Objects are shared through `ObjectRef` (`Arc<Object>`). Properties sit
//! behind a `parking_lot::RwLock` so methods can record state on `this`.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{
    CallableHost, Context, PropertyReadable, TypeIdentifiable, Value, Visitable,
    DEFAULT_ACCEPT_PREFIX,
};

/// Result of invoking an object method.
pub type MethodResult = Result<Value, MethodError>;

/// Object method: `(this, visited, context) -> result`.
pub type MethodFn = dyn Fn(&Object, &ObjectRef, Option<&Context>) -> MethodResult + Send + Sync;

/// Error raised by an object method.
///
/// Dispatch hands it back to the caller untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MethodError {
    message: String,
}

impl MethodError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A dynamically-shaped object.
pub struct Object {
    class_name: Option<String>,
    properties: RwLock<FxHashMap<String, Value>>,
    methods: FxHashMap<String, Box<MethodFn>>,
    visit_key: Option<String>,
    accept_prefix: String,
}

impl Object {
    pub fn builder() -> ObjectBuilder {
        ObjectBuilder::new()
    }

    /// Fully qualified class name (e.g. `"MyApp.Foo"`), if known.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Read a property. Returns a clone so no lock is held by the caller.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.properties.read().get(name).cloned()
    }

    /// Write a property, returning the previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.write().insert(name.into(), value.into())
    }

    /// Whether a method named `name` exists.
    pub fn responds_to(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn visit_key(&self) -> Option<&str> {
        self.visit_key.as_deref()
    }

    pub fn accept_prefix(&self) -> &str {
        &self.accept_prefix
    }
}

impl fmt::Debug for Object {
    // Properties are left out: they may refer back to this object.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class_name", &self.class_name)
            .field("visit_key", &self.visit_key)
            .field("accept_prefix", &self.accept_prefix)
            .field("methods", &self.method_names())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Object`].
pub struct ObjectBuilder {
    class_name: Option<String>,
    properties: FxHashMap<String, Value>,
    methods: FxHashMap<String, Box<MethodFn>>,
    visit_key: Option<String>,
    accept_prefix: String,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self {
            class_name: None,
            properties: FxHashMap::default(),
            methods: FxHashMap::default(),
            visit_key: None,
            accept_prefix: DEFAULT_ACCEPT_PREFIX.to_owned(),
        }
    }

    #[must_use]
    pub fn class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add a method. A later method with the same name replaces the earlier one.
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Object, &ObjectRef, Option<&Context>) -> MethodResult + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Box::new(f));
        self
    }

    /// Dispatch by the value of property `key` instead of by class name.
    #[must_use]
    pub fn visit_key(mut self, key: impl Into<String>) -> Self {
        self.visit_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn accept_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.accept_prefix = prefix.into();
        self
    }

    pub fn build(self) -> ObjectRef {
        ObjectRef(Arc::new(Object {
            class_name: self.class_name,
            properties: RwLock::new(self.properties),
            methods: self.methods,
            visit_key: self.visit_key,
            accept_prefix: self.accept_prefix,
        }))
    }
}

impl Default for ObjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to an [`Object`]. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

impl ObjectRef {
    /// Whether both handles point at the same object.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ObjectRef {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.0
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PropertyReadable for ObjectRef {
    fn property(&self, name: &str) -> Option<Value> {
        self.get(name)
    }
}

impl TypeIdentifiable for ObjectRef {
    fn type_identifier(&self) -> Option<Cow<'_, str>> {
        self.class_name().map(Cow::Borrowed)
    }
}

impl Visitable for ObjectRef {
    fn discriminant_key(&self) -> Option<&str> {
        self.visit_key()
    }

    fn handler_prefix(&self) -> &str {
        self.accept_prefix()
    }
}

impl CallableHost<ObjectRef> for ObjectRef {
    type Output = MethodResult;

    fn describe(&self) -> String {
        format!("object <{}>", self.class_name().unwrap_or("anonymous"))
    }

    fn has_callable(&self, name: &str) -> bool {
        self.responds_to(name)
    }

    fn invoke_callable(
        &self,
        name: &str,
        visited: &ObjectRef,
        context: Option<&Context>,
    ) -> Option<MethodResult> {
        let method = self.methods.get(name)?;
        Some(method(&**self, visited, context))
    }
}

/// Only `Value::Object` can receive dispatch.
impl CallableHost<ObjectRef> for Value {
    type Output = MethodResult;

    fn can_receive(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    fn describe(&self) -> String {
        match self {
            Value::Object(obj) => obj.describe(),
            other => format!("{} {other}", other.type_label()),
        }
    }

    fn has_callable(&self, name: &str) -> bool {
        self.as_object().is_some_and(|obj| obj.responds_to(name))
    }

    fn invoke_callable(
        &self,
        name: &str,
        visited: &ObjectRef,
        context: Option<&Context>,
    ) -> Option<MethodResult> {
        self.as_object()?.invoke_callable(name, visited, context)
    }
}
