//! # torii
//!
//! A minimal HTTP router with an explicit, composable middleware chain.
//! Nothing more. Nothing less.
//!
//! ## The shape of it
//!
//! Three pieces, wired together by hand, visible in `main`:
//!
//! - **[`Router`]** — routes are matched in the order you register them,
//!   segment by segment, with `:name` parameters. No radix tree, no
//!   specificity rules: the table reads top to bottom and the first match
//!   wins. Built once at startup, immutable afterwards.
//! - **[`Chain`](middleware::Chain)** — an ordered middleware list folded
//!   around each terminal handler exactly once. The first middleware added
//!   is the outermost layer: it sees the request first and the response
//!   last. Ships with access logging and panic recovery.
//! - **[`Server`]** — tokio + hyper, one task per connection, graceful
//!   drain on SIGTERM / Ctrl-C.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use torii::middleware::{AccessLog, Chain, LogSink, Recover, TracingSink};
//! use torii::{Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sink = Arc::new(TracingSink);
//!     let chain = Chain::new()
//!         .with(Recover::new(Arc::clone(&sink) as Arc<dyn LogSink>))
//!         .with(AccessLog::new(sink));
//!
//!     let app = Router::new()
//!         .get("/note/:id", chain.handler(get_note))
//!         .get("/simple", chain.handler(simple));
//!
//!     Server::bind("0.0.0.0:8080").serve(app).await.unwrap();
//! }
//!
//! async fn get_note(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("");
//!     Response::text(format!("noteId: {id}"))
//! }
//!
//! async fn simple(_req: Request) -> Response {
//!     Response::text("Hello, world!!")
//! }
//! ```
//!
//! ## What torii does not do
//!
//! TLS, rate limiting, body-size limits, slow-client defense: your reverse
//! proxy already does these, tested at scale. Authentication, persistence,
//! templating: your application's business, not the router's. The surface
//! that remains — routing, middleware, serving — is small enough to read in
//! one sitting, and that is the point.

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod health;
pub mod middleware;

pub use error::Error;
pub use handler::{Composed, Handler};
pub use middleware::Chain;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::{PatternError, Router};
pub use server::Server;

// The method and status vocabulary is the `http` crate's; re-exported so
// applications need not depend on it directly.
pub use http::{Method, StatusCode};
