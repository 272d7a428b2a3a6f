//! Panic recovery.
//!
//! [`Recover`] fences off the rest of the chain: a panic anywhere below it
//! is caught, logged once through the injected [`LogSink`], and turned into
//! a plain `500 Internal Server Error`. The panic never reaches hyper and
//! never takes the worker down — the request that panicked is the only
//! casualty, and the very next request is served normally.
//!
//! Register it first so it also guards the other middleware layers.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use http::StatusCode;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::log::LogSink;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

/// Middleware that converts panics in the wrapped chain into 500 responses.
pub struct Recover {
    sink: Arc<dyn LogSink>,
}

impl Recover {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl Middleware for Recover {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let sink = Arc::clone(&self.sink);
        (move |req: Request| {
            let sink = Arc::clone(&sink);
            let next = Arc::clone(&next);
            async move {
                match AssertUnwindSafe(next.call(req)).catch_unwind().await {
                    Ok(res) => res,
                    Err(payload) => {
                        sink.fault(panic_message(payload.as_ref()));
                        let status = StatusCode::INTERNAL_SERVER_ERROR;
                        Response::builder()
                            .status(status)
                            .text(status.canonical_reason().unwrap_or("Internal Server Error"))
                    }
                }
            }
        })
        .into_boxed_handler()
    }
}

/// Renders a panic payload for the diagnostic record.
///
/// `panic!("…")` carries a `&str` or a `String`; `panic_any` can carry
/// anything, in which case there is nothing useful to print.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "opaque panic payload"
    }
}
