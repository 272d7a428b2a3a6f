//! HTTP server: accept loop, per-request dispatch, graceful shutdown.
//!
//! One tokio task per connection; hyper calls [`dispatch`] once per request
//! on that connection. The router is built before `serve` is called and
//! never changes afterwards, so it is shared across every connection task
//! behind a single `Arc` — no locks anywhere on the request path.
//!
//! On SIGTERM or Ctrl-C the server stops accepting, lets every in-flight
//! connection finish, and returns from [`Server::serve`]. Pair that with a
//! `terminationGracePeriodSeconds` longer than your slowest request and
//! rolling restarts drop nothing.

use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown: a SIGTERM or Ctrl-C,
    /// followed by every in-flight request completing.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let router = Arc::new(router);

        info!(addr = %self.addr, "listening");

        // Every connection task lands in the JoinSet so shutdown can wait
        // for the stragglers.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Top-to-bottom arm order: once the signal fires, stop
                // accepting even if connections are already queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining");
                    break;
                }

                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // The service closure runs once per request on this
                        // connection, not once per connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req).await }
                        });

                        // Serves HTTP/1.1 or HTTP/2, whichever the client speaks.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(%peer, "connection error: {e}");
                        }
                    });
                }

                // Reap finished tasks so the set stays small on long uptimes.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request and produces exactly one response.
///
/// The error type is [`Infallible`]: a routing miss is a 404, an unreadable
/// body is a 400, a handler panic is turned into a 500 by the recovery
/// middleware — hyper never sees a failure.
async fn dispatch<B>(
    router: Arc<Router>,
    req: http::Request<B>,
) -> Result<http::Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: fmt::Display,
{
    let (parts, body) = req.into_parts();

    // Resolve before touching the body: a miss invokes no handler and
    // reads nothing.
    let Some((handler, params)) = router.lookup(&parts.method, parts.uri.path()) else {
        return Ok(Response::status(StatusCode::NOT_FOUND).into_http());
    };

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!(method = %parts.method, uri = %parts.uri, "unreadable request body: {e}");
            return Ok(Response::status(StatusCode::BAD_REQUEST).into_http());
        }
    };

    let request = Request::new(parts.method, parts.uri, parts.headers, body, params);
    Ok(handler.call(request).await.into_http())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// Unix: SIGTERM (orchestrators) and SIGINT (Ctrl-C, local dev).
/// Elsewhere: Ctrl-C only.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{AccessLog, Chain, LogSink, Recover, TracingSink};
    use http::Method;

    async fn account(req: Request) -> Response {
        let id = req.param("id").unwrap_or("");
        Response::text(format!("accountId: {id}"))
    }

    async fn note(req: Request) -> Response {
        let id = req.param("id").unwrap_or("");
        Response::text(format!("noteId: {id}"))
    }

    async fn simple(_req: Request) -> Response {
        Response::text("Hello, world!!")
    }

    async fn broken(_req: Request) -> Response {
        panic!("stub blew up");
    }

    fn app() -> Arc<Router> {
        let sink: Arc<dyn LogSink> = Arc::new(TracingSink);
        let chain = Chain::new()
            .with(Recover::new(Arc::clone(&sink)))
            .with(AccessLog::new(sink));
        Arc::new(
            Router::new()
                .get("/account/:id", chain.handler(account))
                .get("/note/:id", chain.handler(note))
                .get("/simple", chain.handler(simple))
                .get("/broken", chain.handler(broken)),
        )
    }

    async fn get(router: &Arc<Router>, target: &str) -> (StatusCode, String) {
        let req = http::Request::builder()
            .method(Method::GET)
            .uri(target)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let res = dispatch(Arc::clone(router), req).await.unwrap();
        let status = res.status();
        let body = res.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn routes_answer_with_their_bound_parameters() {
        let app = app();
        assert_eq!(
            get(&app, "/account/42").await,
            (StatusCode::OK, "accountId: 42".to_owned())
        );
        assert_eq!(
            get(&app, "/note/abc-123").await,
            (StatusCode::OK, "noteId: abc-123".to_owned())
        );
    }

    #[tokio::test]
    async fn unmatched_paths_get_an_empty_404() {
        let app = app();
        assert_eq!(get(&app, "/nope").await, (StatusCode::NOT_FOUND, String::new()));
        // trailing slash is a different path
        assert_eq!(get(&app, "/simple/").await, (StatusCode::NOT_FOUND, String::new()));
    }

    #[tokio::test]
    async fn simple_route_is_idempotent() {
        let app = app();
        for _ in 0..5 {
            assert_eq!(
                get(&app, "/simple").await,
                (StatusCode::OK, "Hello, world!!".to_owned())
            );
        }
    }

    #[tokio::test]
    async fn a_panicking_handler_does_not_poison_the_process() {
        let app = app();
        let (status, body) = get(&app, "/broken").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error");
        // the same process keeps serving
        assert_eq!(
            get(&app, "/simple").await,
            (StatusCode::OK, "Hello, world!!".to_owned())
        );
    }

    #[tokio::test]
    async fn unknown_methods_are_routing_misses() {
        let app = app();
        let req = http::Request::builder()
            .method(Method::POST)
            .uri("/simple")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let res = dispatch(Arc::clone(&app), req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
