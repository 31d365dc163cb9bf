//! Collaborator traits consumed by the dispatch resolver.
//!
//! The resolver never looks at an entity's concrete type. It asks the visited
//! side for a property or a type identifier, and the visitor side whether it
//! exposes a callable and to invoke it. Implementations may answer through a
//! handler registry, a dynamic object model, or plain `match` statements.

use std::borrow::Cow;

use crate::{simple_type_name, Context, Value, DEFAULT_ACCEPT_PREFIX};

/// Read named properties off a visited entity.
///
/// Only consulted when the entity configures a discriminant key.
pub trait PropertyReadable {
    fn property(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Human-readable type identifier for a visited entity.
///
/// Only consulted when the entity has no discriminant key. Tagged variants
/// should return a stable tag per variant (e.g. `"shapes.Circle"` or
/// `"Circle"`) rather than anything derived from runtime type metadata.
pub trait TypeIdentifiable {
    /// Fully qualified identifier, or `None` when it cannot be determined.
    fn type_identifier(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Trailing segment of [`type_identifier`](Self::type_identifier).
    fn simple_type_name(&self) -> Option<String> {
        let identifier = self.type_identifier()?;
        simple_type_name(&identifier).map(str::to_owned)
    }
}

/// An entity that can be visited.
///
/// Carries the visited descriptor: an optional discriminant key and the
/// handler-name prefix used when a visit does not override it.
pub trait Visitable: PropertyReadable + TypeIdentifiable {
    /// Name of the property whose value drives dispatch.
    ///
    /// `None` means dispatch by type name.
    fn discriminant_key(&self) -> Option<&str> {
        None
    }

    /// Handler-name prefix used when the visit does not supply one.
    fn handler_prefix(&self) -> &str {
        DEFAULT_ACCEPT_PREFIX
    }
}

/// The visitor side of dispatch: something exposing named handlers.
///
/// `V` is the visited entity type handed to handlers.
pub trait CallableHost<V: ?Sized> {
    /// What a handler returns. Handler errors travel inside this type.
    type Output;

    /// Whether this host can receive dispatch at all.
    ///
    /// A visit to a host answering `false` fails with an invalid-visitor
    /// error and invokes nothing.
    fn can_receive(&self) -> bool {
        true
    }

    /// Human-readable description used in invalid-visitor errors.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_owned()
    }

    /// Whether a callable named `name` is currently exposed.
    fn has_callable(&self, name: &str) -> bool;

    /// Invoke the callable named `name` with `(visited, context)`.
    ///
    /// Returns `None` if no such callable exists.
    fn invoke_callable(
        &self,
        name: &str,
        visited: &V,
        context: Option<&Context>,
    ) -> Option<Self::Output>;
}
