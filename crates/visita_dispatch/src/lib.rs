//! Visita Dispatch - double-dispatch handler resolution.
//!
//! Given a visited entity and a visitor, decide which of the visitor's
//! handlers to run and run it:
//!
//! - `resolve`: name derivation (`prefix + Discriminant`, with a
//!   `prefix + UnknownVisited` fallback) and invocation
//! - `args`: the optional prefix override and context of a visit
//! - `dispatcher`: `Dispatcher` with a `ReportMode` and outcome counters
//! - `registry`: visitors built from per-prefix handler tables instead of
//!   named methods
//! - `shared`: frozen or growable handles to those tables
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=visita_dispatch=debug`: Log every invoked handler.
//! - `RUST_LOG=visita_dispatch=trace`: Also log visits where no handler
//!   matched, with the visit's span.
//!
//! Call [`init_tracing`] once to install a subscriber honoring `RUST_LOG`.

mod args;
mod dispatcher;
mod mode;
mod registry;
mod resolve;
mod shared;

use std::sync::Once;

pub use args::VisitArgs;
pub use dispatcher::{DispatchStats, Dispatcher, DispatcherBuilder, StatsSnapshot};
pub use mode::ReportMode;
pub use registry::{
    Handler, HandlerRegistry, HandlerRegistryBuilder, RegistryVisitor, RegistryVisitorBuilder,
};
pub use resolve::{
    dispatch, resolve_and_invoke, resolve_handler_name, DispatchOutcome, Dispatched,
    ResolvedNames,
};
pub use shared::RegistryHandle;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, or
/// when the host already installed a global subscriber.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // An existing global subscriber wins.
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init()
                .ok();
        }
    });
}
