//! Handler trait and type erasure.
//!
//! The routing table and the middleware chain both need to hold handlers of
//! *different* concrete types in one collection, and a middleware needs to
//! wrap "whatever comes next" without knowing its type. Both problems have
//! the same answer: erase the concrete type behind a trait object.
//!
//! The path from user code to dispatch:
//!
//! ```text
//! async fn note(req: Request) -> Response { … }    ← user writes this
//!        ↓ router.get("/note/:id", note)
//! note.into_boxed_handler()                        ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(note))                        ← stored as BoxedHandler
//!        ↓
//! handler.call(req)  at request time               ← one vtable dispatch
//! ```
//!
//! `BoxedHandler` is also the currency of the middleware chain: a middleware
//! takes the next `BoxedHandler` and hands back a new one that wraps it. The
//! per-request cost is one `Arc` clone and one virtual call per layer.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future resolving to a [`Response`].
///
/// `Pin<Box<…>>` because the runtime polls the future in place; `Send +
/// 'static` so tokio may move it across worker threads.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// public `Handler` trait's method signature. External crates cannot do
/// anything useful with it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler, shared across concurrent requests.
///
/// `Arc` because the same composed handler serves every request to its route
/// simultaneously — cheap shared ownership, no copying, no locking.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` of the shape:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// and for whatever [`Chain::handler`](crate::middleware::Chain::handler)
/// returns. The trait is **sealed**: only the blanket impl below can satisfy
/// it, which keeps the handler contract stable across versions.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

/// Any `Fn(Request) -> impl Future<Output = impl IntoResponse>` is a handler:
/// named `async fn` items, closures returning async blocks, fn pointers.
impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Composed handlers ─────────────────────────────────────────────────────────

/// A fully wrapped handler, produced once per route by
/// [`Chain::handler`](crate::middleware::Chain::handler).
///
/// Already type-erased, so registering it is free: `into_boxed_handler`
/// just unwraps.
pub struct Composed(pub(crate) BoxedHandler);

impl private::Sealed for Composed {}

impl Handler for Composed {
    fn into_boxed_handler(self) -> BoxedHandler {
        self.0
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Bridges a concrete handler `F` into the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
