//! Middleware chain.
//!
//! A middleware wraps a handler and returns a new handler: work before the
//! inner call, work after it, or no inner call at all (short-circuit). A
//! [`Chain`] is an ordered list of such wrappers, folded around a terminal
//! handler **once at startup** — the composed handler is immutable and
//! served concurrently to every request on its route.
//!
//! Order reads top-down: the first middleware added is the outermost layer.
//! It sees the request first and the response last.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use torii::middleware::{AccessLog, Chain, LogSink, Recover, TracingSink};
//! use torii::{Request, Response, Router};
//!
//! # async fn note(_: Request) -> Response { Response::text("") }
//! let sink = Arc::new(TracingSink);
//! let chain = Chain::new()
//!     .with(Recover::new(Arc::clone(&sink) as Arc<dyn LogSink>))
//!     .with(AccessLog::new(sink));
//!
//! let app = Router::new().get("/note/:id", chain.handler(note));
//! ```
//!
//! With that chain, a panic inside `note` is caught by [`Recover`] *around*
//! the access log, so the 500 it substitutes still gets logged.

mod log;
mod recover;

pub use log::{AccessLog, LogSink, TracingSink};
pub use recover::Recover;

use std::sync::Arc;

use crate::handler::{BoxedHandler, Composed, Handler};

/// A handler-wrapping function.
///
/// `wrap` is called once per route at composition time, never per request.
/// The returned handler must be pure wiring: any state it captures (a log
/// sink, a config handle) is shared read-only across all requests.
///
/// Any `Fn(BoxedHandler) -> BoxedHandler` closure is a middleware; the
/// built-in ones ([`AccessLog`], [`Recover`]) are structs so they can carry
/// their configuration.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self(next)
    }
}

/// An ordered middleware list, composable around any number of terminal
/// handlers.
///
/// [`Chain::handler`] takes `&self`, so one chain can wrap every route in an
/// application — exactly the intended use.
pub struct Chain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Appends a middleware. The first one added becomes the outermost layer.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Folds the chain around `terminal`, innermost first, and returns the
    /// composed handler. Deterministic, done once; the result is reused for
    /// the lifetime of the process.
    pub fn handler(&self, terminal: impl Handler) -> Composed {
        let mut composed = terminal.into_boxed_handler();
        for layer in self.layers.iter().rev() {
            composed = layer.wrap(composed);
        }
        Composed(composed)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
