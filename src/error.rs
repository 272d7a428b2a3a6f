//! Unified error type.

use std::fmt;
use std::io;

use crate::router::PatternError;

/// The error type returned by torii's fallible operations.
///
/// Per-request outcomes (404, 500, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, never as `Error`s. This type covers
/// the two ways startup and serving can fail: the listener itself, and a
/// route pattern that does not parse.
#[derive(Debug)]
pub enum Error {
    /// Binding the listener or accepting a connection failed.
    Io(io::Error),
    /// A route pattern was rejected at registration time.
    Pattern {
        /// The pattern as passed to [`Router::try_on`](crate::Router::try_on).
        pattern: String,
        /// What exactly was wrong with it.
        kind: PatternError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Pattern { pattern, kind } => {
                write!(f, "invalid route pattern `{pattern}`: {kind}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Pattern { kind, .. } => Some(kind),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
