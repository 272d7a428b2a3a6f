//! Access logging.
//!
//! [`AccessLog`] emits one record per request — method, full target (path
//! plus query), and wall-clock time spent in the rest of the chain — after
//! the layers below it have finished. Where the record goes is the caller's
//! choice: the middleware writes to a [`LogSink`] handed to its constructor,
//! never to a global. [`TracingSink`] is the stock back-end; tests inject a
//! capturing one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use http::Method;
use tracing::{error, info};

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;

/// Destination for per-request access records and handler-fault diagnostics.
///
/// One sink instance is typically shared by [`AccessLog`] and
/// [`Recover`](crate::middleware::Recover). Implementations must be safe to
/// call from concurrent requests; both built-in users only ever read the
/// sink.
pub trait LogSink: Send + Sync + 'static {
    /// One completed request: method, request target, elapsed wall-clock time.
    fn access(&self, method: &Method, target: &str, elapsed: Duration);

    /// One handler fault, with the rendered panic payload.
    fn fault(&self, message: &str);
}

/// [`LogSink`] backed by the `tracing` ecosystem.
///
/// Emits `access` events at INFO and faults at ERROR, as structured fields.
/// Pick the output format by installing a `tracing-subscriber` in `main`.
pub struct TracingSink;

impl LogSink for TracingSink {
    fn access(&self, method: &Method, target: &str, elapsed: Duration) {
        info!(%method, target, ?elapsed, "access");
    }

    fn fault(&self, message: &str) {
        error!(panic = message, "handler panicked");
    }
}

/// Middleware that logs every request passing through it.
///
/// The timer starts when the request enters this layer and stops when the
/// inner chain returns, so whatever this middleware wraps is included in the
/// measurement — place it outside the layers you want timed.
pub struct AccessLog {
    sink: Arc<dyn LogSink>,
}

impl AccessLog {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl Middleware for AccessLog {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let sink = Arc::clone(&self.sink);
        (move |req: Request| {
            let sink = Arc::clone(&sink);
            let next = Arc::clone(&next);
            async move {
                // the request moves into the chain; copy out what the record needs
                let method = req.method().clone();
                let target = req.target().to_owned();
                let started = Instant::now();
                let res = next.call(req).await;
                sink.access(&method, &target, started.elapsed());
                res
            }
        })
        .into_boxed_handler()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Chain;
    use crate::response::Response;
    use bytes::Bytes;
    use http::HeaderMap;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CaptureSink {
        records: Mutex<Vec<(Method, String, Duration)>>,
    }

    impl LogSink for CaptureSink {
        fn access(&self, method: &Method, target: &str, elapsed: Duration) {
            self.records
                .lock()
                .unwrap()
                .push((method.clone(), target.to_owned(), elapsed));
        }

        fn fault(&self, _message: &str) {}
    }

    fn request(target: &str) -> Request {
        Request::new(
            Method::GET,
            target.parse().unwrap(),
            HeaderMap::new(),
            Bytes::new(),
            HashMap::new(),
        )
    }

    #[tokio::test]
    async fn one_record_per_request_including_query() {
        let sink = Arc::new(CaptureSink::default());
        let chain = Chain::new().with(AccessLog::new(Arc::clone(&sink) as Arc<dyn LogSink>));
        let handler = chain
            .handler(|_req: Request| async { Response::text("ok") })
            .into_boxed_handler();

        handler.call(request("/note/7?verbose=1")).await;

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        let (method, target, _elapsed) = &records[0];
        assert_eq!(*method, Method::GET);
        assert_eq!(target, "/note/7?verbose=1");
    }

    #[tokio::test]
    async fn record_is_emitted_after_the_inner_chain_completes() {
        let sink = Arc::new(CaptureSink::default());
        let inner_saw_record = Arc::new(Mutex::new(None));

        let probe = {
            let sink = Arc::clone(&sink);
            let inner_saw_record = Arc::clone(&inner_saw_record);
            move |_req: Request| {
                let sink = Arc::clone(&sink);
                let inner_saw_record = Arc::clone(&inner_saw_record);
                async move {
                    let pending = sink.records.lock().unwrap().len();
                    *inner_saw_record.lock().unwrap() = Some(pending);
                    Response::text("ok")
                }
            }
        };

        let chain = Chain::new().with(AccessLog::new(Arc::clone(&sink) as Arc<dyn LogSink>));
        let handler = chain.handler(probe).into_boxed_handler();
        handler.call(request("/simple")).await;

        // nothing logged while the terminal handler ran, one record after
        assert_eq!(*inner_saw_record.lock().unwrap(), Some(0));
        assert_eq!(sink.records.lock().unwrap().len(), 1);
    }
}
