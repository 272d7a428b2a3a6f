//! The notes demo — three routes behind a recovery + access-log chain.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example notes
//!
//! Try:
//!   curl http://localhost:8080/account/42
//!   curl http://localhost:8080/note/abc-123
//!   curl http://localhost:8080/simple
//!   curl http://localhost:8080/nope        # 404, no handler runs
//!
//! Override the listen address with TORII_ADDR=host:port.

use std::sync::Arc;

use torii::middleware::{AccessLog, Chain, LogSink, Recover, TracingSink};
use torii::{health, Request, Response, Router, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let sink: Arc<dyn LogSink> = Arc::new(TracingSink);

    // Recovery first, so it is the outermost layer: a panic anywhere below,
    // access logging included, becomes a 500 instead of a dead connection.
    let chain = Chain::new()
        .with(Recover::new(Arc::clone(&sink)))
        .with(AccessLog::new(sink));

    let app = Router::new()
        .get("/account/:id", chain.handler(account))
        .get("/note/:id", chain.handler(note))
        .get("/simple", chain.handler(simple))
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness);

    let addr = std::env::var("TORII_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    Server::bind(&addr).serve(app).await.expect("server error");
}

// GET /account/:id
async fn account(req: Request) -> Response {
    let id = req.param("id").unwrap_or("");
    Response::text(format!("accountId: {id}"))
}

// GET /note/:id
async fn note(req: Request) -> Response {
    let id = req.param("id").unwrap_or("");
    Response::text(format!("noteId: {id}"))
}

// GET /simple
async fn simple(_req: Request) -> Response {
    Response::text("Hello, world!!")
}
