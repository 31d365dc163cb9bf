//! Handler-name resolution and invocation.
//!
//! # Algorithm
//!
//! 1. The visitor must be able to receive dispatch.
//! 2. Effective prefix: the visit's override, else the entity's own prefix.
//! 3. Discriminant: the value of the entity's discriminant property, or the
//!    simple name of its type identifier.
//! 4. Primary handler `prefix + discriminant`, fallback handler
//!    `prefix + UnknownVisited`. Both use the same effective prefix.
//! 5. Invoke the primary handler if exposed, else the fallback if exposed,
//!    else nothing (not an error).
//!
//! Every error is raised before any handler runs.

use visita_core::{
    invalid_visitor, CallableHost, Discriminant, DispatchResult, HandlerName, Visitable,
};

use crate::VisitArgs;

/// Names derived for one visit. Nothing has been invoked yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedNames {
    discriminant: Discriminant,
    primary: HandlerName,
    fallback: HandlerName,
}

impl ResolvedNames {
    pub fn discriminant(&self) -> &Discriminant {
        &self.discriminant
    }

    /// `prefix + discriminant`.
    pub fn primary(&self) -> &HandlerName {
        &self.primary
    }

    /// `prefix + UnknownVisited`.
    pub fn fallback(&self) -> &HandlerName {
        &self.fallback
    }
}

/// Which handler a visit ended up invoking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    Primary,
    Fallback,
    Unmatched,
}

/// Outcome of a visit together with the handler's output.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatched<R> {
    /// The specific handler ran.
    Primary(R),
    /// The `UnknownVisited` handler ran.
    Fallback(R),
    /// Neither handler is exposed; nothing ran.
    Unmatched,
}

impl<R> Dispatched<R> {
    pub fn outcome(&self) -> DispatchOutcome {
        match self {
            Dispatched::Primary(_) => DispatchOutcome::Primary,
            Dispatched::Fallback(_) => DispatchOutcome::Fallback,
            Dispatched::Unmatched => DispatchOutcome::Unmatched,
        }
    }

    pub fn into_output(self) -> Option<R> {
        match self {
            Dispatched::Primary(output) | Dispatched::Fallback(output) => Some(output),
            Dispatched::Unmatched => None,
        }
    }
}

/// Derive the discriminant and both handler names for visiting `visited`.
pub fn resolve_handler_name<V>(
    visited: &V,
    prefix_override: Option<&str>,
) -> DispatchResult<ResolvedNames>
where
    V: Visitable + ?Sized,
{
    let prefix = prefix_override.unwrap_or_else(|| visited.handler_prefix());
    let discriminant = resolve_discriminant(visited)?;
    let primary = HandlerName::compose(prefix, &discriminant)?;
    let fallback = HandlerName::fallback(prefix)?;
    Ok(ResolvedNames {
        discriminant,
        primary,
        fallback,
    })
}

fn resolve_discriminant<V>(visited: &V) -> DispatchResult<Discriminant>
where
    V: Visitable + ?Sized,
{
    match visited.discriminant_key() {
        Some(key) => Discriminant::from_property(key, visited.property(key).as_ref()),
        None => Discriminant::from_type_identifier(visited.type_identifier().as_deref()),
    }
}

/// Resolve and invoke, reporting which handler ran.
#[tracing::instrument(level = "trace", skip_all, fields(prefix = args.prefix()))]
pub fn dispatch<V, H>(
    visited: &V,
    visitor: &H,
    args: &VisitArgs,
) -> DispatchResult<Dispatched<H::Output>>
where
    V: Visitable + ?Sized,
    H: CallableHost<V> + ?Sized,
{
    if !visitor.can_receive() {
        return Err(invalid_visitor(visitor.describe()));
    }

    let names = resolve_handler_name(visited, args.prefix())?;
    let context = args.context();

    if let Some(output) = try_invoke(visitor, names.primary(), visited, args) {
        tracing::debug!(handler = %names.primary(), "invoked handler");
        return Ok(Dispatched::Primary(output));
    }

    if let Some(output) = try_invoke(visitor, names.fallback(), visited, args) {
        tracing::debug!(
            handler = %names.fallback(),
            missing = %names.primary(),
            "invoked fallback handler"
        );
        return Ok(Dispatched::Fallback(output));
    }

    tracing::trace!(
        handler = %names.primary(),
        has_context = context.is_some(),
        "no handler matched"
    );
    Ok(Dispatched::Unmatched)
}

fn try_invoke<V, H>(
    visitor: &H,
    name: &HandlerName,
    visited: &V,
    args: &VisitArgs,
) -> Option<H::Output>
where
    V: ?Sized,
    H: CallableHost<V> + ?Sized,
{
    if !visitor.has_callable(name.as_str()) {
        return None;
    }
    visitor.invoke_callable(name.as_str(), visited, args.context())
}

/// Resolve the handler for `visited` on `visitor` and invoke it.
///
/// Returns `Ok(None)` when the visitor exposes neither the specific nor the
/// fallback handler. Errors from the handler itself are inside `H::Output`.
pub fn resolve_and_invoke<V, H>(
    visited: &V,
    visitor: &H,
    args: impl Into<VisitArgs>,
) -> DispatchResult<Option<H::Output>>
where
    V: Visitable + ?Sized,
    H: CallableHost<V> + ?Sized,
{
    dispatch(visited, visitor, &args.into()).map(Dispatched::into_output)
}
