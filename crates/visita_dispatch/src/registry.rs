//! Handler registries.
//!
//! Instead of synthesizing method names and probing for them, a visitor can
//! register one closure per discriminant up front. A `HandlerRegistry` maps
//! discriminants (`"Add"`, `"Foo"`) to handlers plus an optional fallback.
//! A `RegistryVisitor` owns one registry per prefix, so two visit purposes
//! over the same entities (`"_foo_accept"`, `"_bar_accept"`) keep separate
//! tables and never clobber each other.
//!
//! `RegistryVisitor` implements `CallableHost`: a handler name is split into
//! a known prefix and a discriminant, longest prefix first, and
//! `prefix + UnknownVisited` maps to that prefix's fallback.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use visita_core::{
    invalid_argument, CallableHost, Context, DispatchResult, UNKNOWN_VISITED_SUFFIX,
};

use crate::RegistryHandle;

/// A registered handler: `(visited, context) -> output`.
pub type Handler<V, R> = Arc<dyn Fn(&V, Option<&Context>) -> R + Send + Sync>;

fn check_discriminant(discriminant: &str) -> DispatchResult<()> {
    if discriminant.is_empty() {
        return Err(invalid_argument("handler discriminant must not be empty"));
    }
    if discriminant == UNKNOWN_VISITED_SUFFIX {
        return Err(invalid_argument(format!(
            "`{UNKNOWN_VISITED_SUFFIX}` is reserved for the fallback handler"
        )));
    }
    Ok(())
}

/// Discriminant-to-handler table with an optional fallback.
pub struct HandlerRegistry<V: ?Sized, R> {
    handlers: FxHashMap<String, Handler<V, R>>,
    fallback: Option<Handler<V, R>>,
}

impl<V: ?Sized, R> HandlerRegistry<V, R> {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
            fallback: None,
        }
    }

    pub fn builder() -> HandlerRegistryBuilder<V, R> {
        HandlerRegistryBuilder::new()
    }

    /// Register a handler for `discriminant`.
    ///
    /// The discriminant is matched verbatim against the derived one, so a
    /// property value `"add"` is registered as `"Add"`. Registering the same
    /// discriminant twice is an error.
    pub fn register<F>(&mut self, discriminant: &str, handler: F) -> DispatchResult<()>
    where
        F: Fn(&V, Option<&Context>) -> R + Send + Sync + 'static,
    {
        self.insert(discriminant.to_owned(), Arc::new(handler))
    }

    fn insert(&mut self, discriminant: String, handler: Handler<V, R>) -> DispatchResult<()> {
        check_discriminant(&discriminant)?;
        if self.handlers.contains_key(&discriminant) {
            return Err(invalid_argument(format!(
                "a handler for `{discriminant}` is already registered"
            )));
        }
        self.handlers.insert(discriminant, handler);
        Ok(())
    }

    /// Set the fallback handler, returning the one it replaces.
    pub fn set_fallback<F>(&mut self, handler: F) -> Option<Handler<V, R>>
    where
        F: Fn(&V, Option<&Context>) -> R + Send + Sync + 'static,
    {
        self.fallback.replace(Arc::new(handler))
    }

    pub fn has_handler(&self, discriminant: &str) -> bool {
        self.handlers.contains_key(discriminant)
    }

    pub fn lookup(&self, discriminant: &str) -> Option<&Handler<V, R>> {
        self.handlers.get(discriminant)
    }

    pub fn fallback(&self) -> Option<&Handler<V, R>> {
        self.fallback.as_ref()
    }

    /// Registered discriminants, sorted.
    pub fn discriminants(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of specific handlers (the fallback is not counted).
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<V: ?Sized, R> Default for HandlerRegistry<V, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ?Sized, R> fmt::Debug for HandlerRegistry<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("discriminants", &self.discriminants())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Builder for [`HandlerRegistry`].
///
/// Duplicate or reserved discriminants are reported by [`build`](Self::build).
pub struct HandlerRegistryBuilder<V: ?Sized, R> {
    entries: Vec<(String, Handler<V, R>)>,
    fallback: Option<Handler<V, R>>,
}

impl<V: ?Sized, R> HandlerRegistryBuilder<V, R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            fallback: None,
        }
    }

    /// Handle entities whose discriminant is `discriminant`.
    #[must_use]
    pub fn on<F>(mut self, discriminant: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&V, Option<&Context>) -> R + Send + Sync + 'static,
    {
        self.entries.push((discriminant.into(), Arc::new(handler)));
        self
    }

    /// Handle everything no specific handler matches.
    #[must_use]
    pub fn otherwise<F>(mut self, handler: F) -> Self
    where
        F: Fn(&V, Option<&Context>) -> R + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> DispatchResult<HandlerRegistry<V, R>> {
        let mut registry = HandlerRegistry::new();
        for (discriminant, handler) in self.entries {
            registry.insert(discriminant, handler)?;
        }
        registry.fallback = self.fallback;
        Ok(registry)
    }
}

impl<V: ?Sized, R> Default for HandlerRegistryBuilder<V, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// A visitor made of per-prefix handler registries.
pub struct RegistryVisitor<V: ?Sized, R> {
    /// Sorted longest prefix first.
    registries: Vec<(String, RegistryHandle<HandlerRegistry<V, R>>)>,
}

impl<V: ?Sized, R> RegistryVisitor<V, R> {
    pub fn builder() -> RegistryVisitorBuilder<V, R> {
        RegistryVisitorBuilder::new()
    }

    /// The registry serving `prefix`.
    pub fn registry(&self, prefix: &str) -> Option<&RegistryHandle<HandlerRegistry<V, R>>> {
        self.registries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, handle)| handle)
    }

    /// Known prefixes, longest first.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.registries.iter().map(|(p, _)| p.as_str())
    }

    /// Find the handler behind `name`.
    ///
    /// The handler is cloned out so no registry lock is held while it runs.
    fn find(&self, name: &str) -> Option<Handler<V, R>> {
        self.registries.iter().find_map(|(prefix, handle)| {
            let discriminant = name.strip_prefix(prefix.as_str())?;
            handle.with(|registry| {
                registry
                    .lookup(discriminant)
                    .or_else(|| {
                        if discriminant == UNKNOWN_VISITED_SUFFIX {
                            registry.fallback()
                        } else {
                            None
                        }
                    })
                    .cloned()
            })
        })
    }
}

impl<V: ?Sized, R> CallableHost<V> for RegistryVisitor<V, R> {
    type Output = R;

    /// A visitor without any registry cannot receive dispatch.
    fn can_receive(&self) -> bool {
        !self.registries.is_empty()
    }

    fn describe(&self) -> String {
        if self.registries.is_empty() {
            return "registry visitor without registries".to_owned();
        }
        let prefixes: Vec<&str> = self.prefixes().collect();
        format!("registry visitor [{}]", prefixes.join(", "))
    }

    fn has_callable(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn invoke_callable(&self, name: &str, visited: &V, context: Option<&Context>) -> Option<R> {
        let handler = self.find(name)?;
        Some(handler(visited, context))
    }
}

impl<V: ?Sized, R> fmt::Debug for RegistryVisitor<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.registries.iter().map(|(p, h)| (p, h)))
            .finish()
    }
}

/// Builder for [`RegistryVisitor`].
pub struct RegistryVisitorBuilder<V: ?Sized, R> {
    registries: Vec<(String, RegistryHandle<HandlerRegistry<V, R>>)>,
}

impl<V: ?Sized, R> RegistryVisitorBuilder<V, R> {
    pub fn new() -> Self {
        Self {
            registries: Vec::new(),
        }
    }

    /// Serve `prefix` from a registry that is frozen from now on.
    #[must_use]
    pub fn registry(self, prefix: impl Into<String>, registry: HandlerRegistry<V, R>) -> Self {
        self.handle(prefix, RegistryHandle::frozen(registry))
    }

    /// Serve `prefix` from a shared handle, e.g. a growable registry the
    /// caller keeps extending.
    #[must_use]
    pub fn handle(
        mut self,
        prefix: impl Into<String>,
        handle: RegistryHandle<HandlerRegistry<V, R>>,
    ) -> Self {
        self.registries.push((prefix.into(), handle));
        self
    }

    /// Fails on an empty or repeated prefix.
    pub fn build(mut self) -> DispatchResult<RegistryVisitor<V, R>> {
        for (i, (prefix, _)) in self.registries.iter().enumerate() {
            if prefix.is_empty() {
                return Err(invalid_argument("registry prefix must not be empty"));
            }
            if self.registries[..i].iter().any(|(p, _)| p == prefix) {
                return Err(invalid_argument(format!(
                    "prefix `{prefix}` is served by more than one registry"
                )));
            }
        }
        self.registries.sort_by_key(|(prefix, _)| Reverse(prefix.len()));
        Ok(RegistryVisitor {
            registries: self.registries,
        })
    }
}

impl<V: ?Sized, R> Default for RegistryVisitorBuilder<V, R> {
    fn default() -> Self {
        Self::new()
    }
}
