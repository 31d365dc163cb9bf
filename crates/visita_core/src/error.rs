//! Dispatch errors.
//!
//! Every error here aborts a visit before any handler runs. Errors raised by
//! a handler itself are part of the handler's output and never pass through
//! this type.
//!
//! Factory functions (`invalid_argument(..)` and friends) are the preferred
//! way to build errors so message wording lives in one place.

use std::fmt;

/// Result of a dispatch step.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Why a visit was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The visitor cannot receive dispatch at all.
    #[error("can not accept visitor: {visitor} is not able to receive dispatch")]
    InvalidVisitor { visitor: String },

    /// The trailing visit arguments have the wrong arity or types.
    #[error("invalid visit arguments: {message}")]
    InvalidArgument { message: String },

    /// No usable discriminant could be derived from the visited entity.
    #[error("unable to resolve discriminant: {reason}")]
    DiscriminantResolution { reason: String },

    /// The effective prefix or the discriminant was empty.
    #[error(
        "unable to construct a handler name from prefix `{prefix}` and discriminant `{discriminant}`"
    )]
    HandlerNameConstruction {
        prefix: String,
        discriminant: String,
    },
}

impl DispatchError {
    /// Stable error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidVisitor { .. } => ErrorCode::V0001,
            Self::InvalidArgument { .. } => ErrorCode::V0002,
            Self::DiscriminantResolution { .. } => ErrorCode::V0003,
            Self::HandlerNameConstruction { .. } => ErrorCode::V0004,
        }
    }
}

/// Error codes for dispatch errors.
///
/// Format: V#### so they never collide with host-application codes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Visitor cannot receive dispatch
    V0001,
    /// Invalid trailing visit arguments
    V0002,
    /// Discriminant could not be resolved
    V0003,
    /// Handler name could not be constructed
    V0004,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V0001 => "V0001",
            Self::V0002 => "V0002",
            Self::V0003 => "V0003",
            Self::V0004 => "V0004",
        }
    }

    /// One-line explanation, for `--explain`-style lookups.
    pub fn description(self) -> &'static str {
        match self {
            Self::V0001 => "the visitor is not able to receive dispatch",
            Self::V0002 => "the trailing visit arguments have an invalid arity or type",
            Self::V0003 => "no discriminant could be derived from the visited entity",
            Self::V0004 => "the handler prefix or discriminant is empty",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn invalid_visitor(visitor: impl Into<String>) -> DispatchError {
    DispatchError::InvalidVisitor {
        visitor: visitor.into(),
    }
}

pub fn invalid_argument(message: impl Into<String>) -> DispatchError {
    DispatchError::InvalidArgument {
        message: message.into(),
    }
}

pub fn discriminant_resolution(reason: impl Into<String>) -> DispatchError {
    DispatchError::DiscriminantResolution {
        reason: reason.into(),
    }
}

pub fn handler_name_construction(prefix: &str, discriminant: &str) -> DispatchError {
    DispatchError::HandlerNameConstruction {
        prefix: prefix.to_owned(),
        discriminant: discriminant.to_owned(),
    }
}
