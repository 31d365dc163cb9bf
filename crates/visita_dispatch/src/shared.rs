//! Thread-safe handles to handler registries.
//!
//! A visitor holds each of its registries through a `RegistryHandle`:
//! either frozen (`Arc<T>`, read-only once built) or growable
//! (`Arc<RwLock<T>>`, so handlers can be added after the visitor exists).
//! Cloning a handle shares the registry.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared handle to a registry.
pub enum RegistryHandle<T> {
    /// Immutable after creation.
    Frozen(Arc<T>),
    /// Writable through [`update`](Self::update).
    Growable(Arc<RwLock<T>>),
}

impl<T> RegistryHandle<T> {
    pub fn frozen(registry: T) -> Self {
        RegistryHandle::Frozen(Arc::new(registry))
    }

    pub fn growable(registry: T) -> Self {
        RegistryHandle::Growable(Arc::new(RwLock::new(registry)))
    }

    /// Run `f` with read access to the registry.
    ///
    /// The read lock of a growable registry is held only for the duration of
    /// `f`; do not invoke handlers from inside it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self {
            RegistryHandle::Frozen(registry) => f(registry.as_ref()),
            RegistryHandle::Growable(registry) => f(&*registry.read()),
        }
    }

    /// Run `f` with write access. Returns `None` for a frozen registry.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        match self {
            RegistryHandle::Frozen(_) => None,
            RegistryHandle::Growable(registry) => Some(f(&mut *registry.write())),
        }
    }

    pub fn is_growable(&self) -> bool {
        matches!(self, RegistryHandle::Growable(_))
    }

    /// Whether both handles share the same registry.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RegistryHandle::Frozen(a), RegistryHandle::Frozen(b)) => Arc::ptr_eq(a, b),
            (RegistryHandle::Growable(a), RegistryHandle::Growable(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Clone for RegistryHandle<T> {
    fn clone(&self) -> Self {
        match self {
            RegistryHandle::Frozen(registry) => RegistryHandle::Frozen(Arc::clone(registry)),
            RegistryHandle::Growable(registry) => RegistryHandle::Growable(Arc::clone(registry)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RegistryHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryHandle::Frozen(registry) => write!(f, "Frozen({:?})", &**registry),
            RegistryHandle::Growable(registry) => write!(f, "Growable({:?})", &*registry.read()),
        }
    }
}
