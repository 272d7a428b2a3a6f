//! Request router with named path parameters.
//!
//! Routes are matched segment-by-segment, in the order they were registered.
//! A literal segment must match exactly; a `:name` segment matches any
//! non-empty segment and binds its value. The first full match wins — when a
//! literal and a parameter compete at the same position in two patterns, the
//! earlier registration takes the request. The routing table is a plain
//! ordered list you can read top to bottom, at the cost of O(routes) lookup.
//! For a handful of routes that trade is the right one.
//!
//! Paths are never normalized: `/note/7/` and `/note/7` are different paths,
//! and only one of them matches `/note/:id`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::Method;

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};

/// The application router.
///
/// Build it once at startup, then hand it to [`Server::serve`](crate::Server::serve).
/// Each registration method returns `self` so routes chain naturally:
///
/// ```rust,no_run
/// # use torii::{Request, Response, Router};
/// # async fn get_note(_: Request) -> Response { Response::text("") }
/// # async fn create_note(_: Request) -> Response { Response::text("") }
/// Router::new()
///     .get("/note/:id", get_note)
///     .post("/note",    create_note);
/// ```
///
/// Registering the same `(method, pattern)` twice replaces the earlier
/// handler in place — routing-table update semantics, not an error. The
/// route keeps its original position in the match order.
pub struct Router {
    routes: HashMap<Method, Vec<Route>>,
}

struct Route {
    segments: Vec<Segment>,
    handler: BoxedHandler,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + pattern pair. Returns `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is malformed — see [`Router::try_on`] for the
    /// fallible variant and the pattern rules. Registration happens once at
    /// startup, so a bad pattern should stop the process before it ever
    /// accepts a connection.
    pub fn on(self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        self.try_on(method, pattern, handler)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Fallible registration.
    ///
    /// A pattern must start with `/`. Each `/`-separated segment is either a
    /// literal or a `:name` parameter. Rejected at registration time:
    ///
    /// - a missing leading slash (`note/:id`)
    /// - an empty segment (`/note//latest`, `/note/`)
    /// - an empty parameter name (`/note/:`)
    /// - the same parameter name twice in one pattern (`/:id/sub/:id`)
    ///
    /// The bare pattern `/` is valid and matches only the root path.
    pub fn try_on(
        mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
    ) -> Result<Self, Error> {
        let segments = parse_pattern(pattern).map_err(|kind| Error::Pattern {
            pattern: pattern.to_owned(),
            kind,
        })?;

        let route = Route { segments, handler: handler.into_boxed_handler() };
        let routes = self.routes.entry(method).or_default();
        match routes.iter_mut().find(|r| r.segments == route.segments) {
            Some(existing) => *existing = route,
            None => routes.push(route),
        }
        Ok(self)
    }

    /// `GET` shorthand for [`Router::on`].
    pub fn get(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, pattern, handler)
    }

    /// `POST` shorthand for [`Router::on`].
    pub fn post(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, pattern, handler)
    }

    /// `PUT` shorthand for [`Router::on`].
    pub fn put(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, pattern, handler)
    }

    /// `DELETE` shorthand for [`Router::on`].
    pub fn delete(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, pattern, handler)
    }

    /// Scans this method's routes in registration order and returns the first
    /// full match, with the parameter values it bound. `None` means 404: the
    /// caller must not invoke any handler.
    ///
    /// Lookup has no side effects — no logging, no shared state touched.
    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let routes = self.routes.get(method)?;
        let rest = path.strip_prefix('/')?;
        let segments: Vec<&str> =
            if rest.is_empty() { Vec::new() } else { rest.split('/').collect() };

        'next_route: for route in routes {
            if route.segments.len() != segments.len() {
                continue;
            }
            let mut params = HashMap::new();
            for (expected, actual) in route.segments.iter().zip(&segments) {
                match expected {
                    Segment::Literal(lit) if lit.as_str() == *actual => {}
                    Segment::Param(name) if !actual.is_empty() => {
                        params.insert(name.clone(), (*actual).to_owned());
                    }
                    _ => continue 'next_route,
                }
            }
            return Some((Arc::clone(&route.handler), params));
        }
        None
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

// ── Pattern parsing ───────────────────────────────────────────────────────────

/// Why a route pattern was rejected at registration time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternError {
    /// The pattern does not start with `/`.
    MissingLeadingSlash,
    /// The pattern contains an empty segment, e.g. `/a//b` or `/a/`.
    EmptySegment,
    /// A parameter segment has no name, e.g. `/a/:`.
    EmptyParamName,
    /// The same parameter name appears twice in one pattern.
    DuplicateParam(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLeadingSlash => write!(f, "must start with `/`"),
            Self::EmptySegment => write!(f, "empty segment"),
            Self::EmptyParamName => write!(f, "empty parameter name"),
            Self::DuplicateParam(name) => write!(f, "duplicate parameter `:{name}`"),
        }
    }
}

impl std::error::Error for PatternError {}

fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    let rest = pattern
        .strip_prefix('/')
        .ok_or(PatternError::MissingLeadingSlash)?;
    if rest.is_empty() {
        // the root pattern `/`
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    for raw in rest.split('/') {
        if raw.is_empty() {
            return Err(PatternError::EmptySegment);
        }
        match raw.strip_prefix(':') {
            Some("") => return Err(PatternError::EmptyParamName),
            Some(name) => {
                let duplicate = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(n) if n == name));
                if duplicate {
                    return Err(PatternError::DuplicateParam(name.to_owned()));
                }
                segments.push(Segment::Param(name.to_owned()));
            }
            None => segments.push(Segment::Literal(raw.to_owned())),
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::response::Response;
    use bytes::Bytes;
    use http::HeaderMap;

    fn request(method: Method, path: &str, params: HashMap<String, String>) -> Request {
        Request::new(method, path.parse().unwrap(), HeaderMap::new(), Bytes::new(), params)
    }

    /// Handler that answers with a fixed tag, so tests can tell which route won.
    fn tag(tag: &'static str) -> impl Handler {
        move |_req: Request| async move { Response::text(tag) }
    }

    fn params_of(router: &Router, path: &str) -> Option<HashMap<String, String>> {
        router.lookup(&Method::GET, path).map(|(_, params)| params)
    }

    async fn body_of(router: &Router, path: &str) -> String {
        let (handler, params) = router.lookup(&Method::GET, path).expect("route should match");
        let res = handler.call(request(Method::GET, path, params)).await;
        String::from_utf8(res.body().to_vec()).unwrap()
    }

    #[test]
    fn binds_named_parameters() {
        let router = Router::new().get("/account/:id", tag("account"));
        let params = params_of(&router, "/account/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn parameter_requires_a_non_empty_segment() {
        let router = Router::new().get("/account/:id", tag("account"));
        assert!(params_of(&router, "/account/").is_none());
    }

    #[test]
    fn segment_count_must_match() {
        let router = Router::new().get("/account/:id", tag("account"));
        assert!(params_of(&router, "/account").is_none());
        assert!(params_of(&router, "/account/1/2").is_none());
    }

    #[test]
    fn trailing_slash_is_a_distinct_path() {
        let router = Router::new().get("/simple", tag("simple"));
        assert!(params_of(&router, "/simple").is_some());
        assert!(params_of(&router, "/simple/").is_none());
    }

    #[test]
    fn root_pattern_matches_only_root() {
        let router = Router::new().get("/", tag("root"));
        assert!(params_of(&router, "/").is_some());
        assert!(params_of(&router, "/x").is_none());
    }

    #[test]
    fn method_must_match() {
        let router = Router::new().get("/simple", tag("simple"));
        assert!(router.lookup(&Method::POST, "/simple").is_none());
    }

    #[tokio::test]
    async fn first_registration_wins_over_later_literal() {
        // `:x` competes with the literal `b` at the same position; the
        // earlier registration takes the request, regardless of specificity.
        let router = Router::new()
            .get("/a/:x", tag("param"))
            .get("/a/b", tag("literal"));
        assert_eq!(body_of(&router, "/a/b").await, "param");
        assert_eq!(body_of(&router, "/a/c").await, "param");
    }

    #[tokio::test]
    async fn earlier_literal_wins_over_later_parameter() {
        let router = Router::new()
            .get("/a/b", tag("literal"))
            .get("/a/:x", tag("param"));
        assert_eq!(body_of(&router, "/a/b").await, "literal");
        assert_eq!(body_of(&router, "/a/c").await, "param");
    }

    #[tokio::test]
    async fn duplicate_registration_replaces_in_place() {
        let router = Router::new()
            .get("/a/:x", tag("old"))
            .get("/a/b", tag("literal"))
            .get("/a/:x", tag("new"));
        // same slot, same position: still ahead of `/a/b` in the scan
        assert_eq!(body_of(&router, "/a/b").await, "new");
        assert_eq!(body_of(&router, "/a/z").await, "new");
    }

    #[test]
    fn rejects_malformed_patterns() {
        let kind = |pattern: &str| match Router::new().try_on(Method::GET, pattern, tag("x")) {
            Err(Error::Pattern { kind, .. }) => kind,
            _ => panic!("pattern `{pattern}` should be rejected"),
        };
        assert_eq!(kind("note/:id"), PatternError::MissingLeadingSlash);
        assert_eq!(kind("/note//latest"), PatternError::EmptySegment);
        assert_eq!(kind("/note/"), PatternError::EmptySegment);
        assert_eq!(kind("/note/:"), PatternError::EmptyParamName);
        assert_eq!(kind("/:id/sub/:id"), PatternError::DuplicateParam("id".to_owned()));
    }

    #[test]
    #[should_panic(expected = "invalid route pattern")]
    fn on_panics_at_startup_for_a_malformed_pattern() {
        let _ = Router::new().get("/note//latest", tag("x"));
    }
}
