//! Report modes for the dispatcher.
//!
//! Decides what happens to a `DispatchError`: surface it to the caller, or
//! log it and carry on as if nothing matched.

/// How a `Dispatcher` reports errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReportMode {
    /// Return every error to the caller as `Err(DispatchError)`.
    #[default]
    Strict,
    /// Log errors at `error` level and yield `Ok(None)`.
    ///
    /// Matches hosts that treat a misconfigured visit as a no-op.
    Lenient,
}

impl ReportMode {
    /// Whether errors are returned to the caller.
    #[inline]
    pub fn surfaces_errors(self) -> bool {
        matches!(self, Self::Strict)
    }

    /// Whether errors are written to the log.
    ///
    /// Strict mode leaves logging to the caller, who receives the error.
    #[inline]
    pub fn logs_errors(self) -> bool {
        matches!(self, Self::Lenient)
    }
}
