//! The dispatcher: resolution and invocation behind a report policy.
//!
//! [`resolve_and_invoke`](crate::resolve_and_invoke) always surfaces errors.
//! A `Dispatcher` adds a [`ReportMode`] on top (surface, or log and yield
//! nothing) and optional per-outcome counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use visita_core::{
    invalid_visitor, CallableHost, DispatchError, DispatchResult, Value, Visitable,
};

use crate::resolve::{dispatch, DispatchOutcome};
use crate::{ReportMode, VisitArgs};

/// Per-outcome visit counters.
///
/// Atomic so a single `Arc<DispatchStats>` can be shared by dispatchers on
/// several threads.
#[derive(Debug, Default)]
pub struct DispatchStats {
    primary: AtomicU64,
    fallback: AtomicU64,
    unmatched: AtomicU64,
    errors: AtomicU64,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&self, outcome: DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::Primary => &self.primary,
            DispatchOutcome::Fallback => &self.fallback,
            DispatchOutcome::Unmatched => &self.unmatched,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            primary: self.primary.load(Ordering::Relaxed),
            fallback: self.fallback.load(Ordering::Relaxed),
            unmatched: self.unmatched.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub primary: u64,
    pub fallback: u64,
    pub unmatched: u64,
    pub errors: u64,
}

impl StatsSnapshot {
    /// Visits counted, failed ones included.
    pub fn total(&self) -> u64 {
        self.primary
            .wrapping_add(self.fallback)
            .wrapping_add(self.unmatched)
            .wrapping_add(self.errors)
    }

    /// Format a summary report.
    pub fn report(&self) -> String {
        format!(
            "Dispatch profile:\n  \
             Primary handlers:  {}\n  \
             Fallback handlers: {}\n  \
             Unmatched visits:  {}\n  \
             Errors:            {}",
            self.primary, self.fallback, self.unmatched, self.errors,
        )
    }
}

/// Resolves and invokes handlers under a [`ReportMode`].
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    mode: ReportMode,
    stats: Option<Arc<DispatchStats>>,
}

impl Dispatcher {
    /// Strict dispatcher without counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn stats(&self) -> Option<&Arc<DispatchStats>> {
        self.stats.as_ref()
    }

    /// Visit `visited` with `visitor`.
    ///
    /// `Ok(None)` means no handler matched, or (in lenient mode) that the
    /// visit failed and the error was logged.
    pub fn visit<V, H>(
        &self,
        visited: &V,
        visitor: &H,
        args: impl Into<VisitArgs>,
    ) -> DispatchResult<Option<H::Output>>
    where
        V: Visitable + ?Sized,
        H: CallableHost<V> + ?Sized,
    {
        let args = args.into();
        match dispatch(visited, visitor, &args) {
            Ok(dispatched) => {
                if let Some(stats) = &self.stats {
                    stats.record(dispatched.outcome());
                }
                Ok(dispatched.into_output())
            }
            Err(err) => self.settle(err),
        }
    }

    /// Visit with loosely-typed trailing arguments.
    ///
    /// See [`VisitArgs::from_values`] for the accepted shapes. The visitor is
    /// checked before the values.
    pub fn visit_with_values<V, H>(
        &self,
        visited: &V,
        visitor: &H,
        values: &[Value],
    ) -> DispatchResult<Option<H::Output>>
    where
        V: Visitable + ?Sized,
        H: CallableHost<V> + ?Sized,
    {
        if !visitor.can_receive() {
            return self.settle(invalid_visitor(visitor.describe()));
        }
        match VisitArgs::from_values(values) {
            Ok(args) => self.visit(visited, visitor, args),
            Err(err) => self.settle(err),
        }
    }

    fn settle<T>(&self, err: DispatchError) -> DispatchResult<Option<T>> {
        if let Some(stats) = &self.stats {
            stats.record_error();
        }
        if self.mode.logs_errors() {
            tracing::error!(code = %err.code(), error = %err, "visit failed");
        }
        if self.mode.surfaces_errors() {
            Err(err)
        } else {
            Ok(None)
        }
    }
}

/// Builder for [`Dispatcher`].
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    mode: ReportMode,
    stats: Option<Arc<DispatchStats>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(mut self, mode: ReportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Count outcomes into `stats`. Share one `Arc` to aggregate across
    /// dispatchers.
    #[must_use]
    pub fn collect_stats(mut self, stats: Arc<DispatchStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            mode: self.mode,
            stats: self.stats,
        }
    }
}
