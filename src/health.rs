//! Built-in health-check handlers.
//!
//! Orchestrators ask two questions — is the process alive, and can it take
//! traffic. These two handlers answer them:
//!
//! ```rust,no_run
//! use torii::{health, Router};
//!
//! let app = Router::new()
//!     .get("/healthz", health::liveness)
//!     .get("/readyz", health::readiness);
//! ```
//!
//! `readiness` here is a default that always says yes. Replace it with your
//! own handler when readiness depends on downstream state (a database pool,
//! a warm cache).

use crate::{Request, Response};

/// Liveness probe handler.
///
/// Always `200 OK`, body `ok`. If the process can answer HTTP at all, it is
/// alive — deliberately dependency-free.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe handler (default implementation).
///
/// Always `200 OK`, body `ready`. Swap in your own handler to gate on
/// dependency health.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
