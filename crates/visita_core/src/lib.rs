//! Visita Core - vocabulary shared by the Visita dispatch crates.
//!
//! This crate defines what a visitable entity and a visitor look like to the
//! dispatch resolver, without committing to any particular object system.
//!
//! # Architecture
//!
//! - `Value` / `Context`: dynamic values for properties, trailing visit
//!   arguments and the context forwarded to handlers
//! - `PropertyReadable`, `TypeIdentifiable`, `Visitable`: the visited side
//! - `CallableHost`: the visitor side ("responds to X", "invoke X")
//! - `Discriminant` / `HandlerName`: validated handler-name pieces
//! - `DispatchError`: every way a dispatch can be rejected before a handler runs
//! - `Object` / `ObjectRef`: a minimal dynamic object model that satisfies
//!   all collaborator traits for dynamically-shaped entities

mod error;
mod name;
mod object;
mod traits;
mod value;

pub use error::{
    discriminant_resolution, handler_name_construction, invalid_argument, invalid_visitor,
    DispatchError, DispatchResult, ErrorCode,
};
pub use name::{
    capitalize_first, simple_type_name, Discriminant, HandlerName, DEFAULT_ACCEPT_PREFIX,
    UNKNOWN_VISITED_SUFFIX,
};
pub use object::{MethodError, MethodFn, MethodResult, Object, ObjectBuilder, ObjectRef};
pub use traits::{CallableHost, PropertyReadable, TypeIdentifiable, Visitable};
pub use value::{Context, Value};
