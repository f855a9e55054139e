//! Method-aware router layered on [`relic_core::trie::PathTrie`]: per-method
//! registration, path-scoped middleware composition, nested router
//! attachment, and the `Router::as_handler` dispatch pipeline (`spec.md`
//! §4.4).
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use http::Method;
use relic_core::cache::{CacheConfig, CacheConfigError, LruCache};
use relic_core::context::{Context, NewContext};
use relic_core::http::{Body, Response};
use relic_core::path::NormalizedPath;
use relic_core::trie::{PathTrie, Transform, TrieError};

use crate::handler::{handler_fn, Handler, Middleware};
use crate::method::{MethodMap, MethodMapError};

/// Default capacity of the `String -> NormalizedPath` memoization cache a
/// freshly built [`Router`] carries (`spec.md` §4.2's "lookup fast path").
const DEFAULT_PATH_CACHE_CAPACITY: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    Trie(#[from] TrieError),
    #[error(transparent)]
    Method(#[from] MethodMapError),
    #[error(transparent)]
    CacheConfig(#[from] CacheConfigError),
}

/// The result of [`Router::lookup`].
pub enum LookupOutcome<V> {
    Match {
        value: V,
        parameters: HashMap<String, String>,
        matched: NormalizedPath,
        remaining: NormalizedPath,
    },
    MethodNotAllowed {
        allowed: Vec<Method>,
    },
    NotFound,
}

/// A [`relic_core::trie::PathTrie`] whose stored value is a
/// [`MethodMap`], plus the router-level `fallback` slot and path-cache
/// (`spec.md` §3's "Router<V>").
pub struct Router<V> {
    trie: PathTrie<MethodMap<V>>,
    fallback: Option<V>,
    path_cache: RefCell<LruCache<String, NormalizedPath>>,
}

impl<V: Clone> Default for Router<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Router<V> {
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_PATH_CACHE_CAPACITY)
            .expect("the default path cache capacity is always positive")
    }

    pub fn with_cache_capacity(capacity: usize) -> Result<Self, CacheConfigError> {
        Ok(Self {
            trie: PathTrie::new(),
            fallback: None,
            path_cache: RefCell::new(LruCache::new(CacheConfig::new(capacity)?)),
        })
    }

    fn normalize(&self, raw: &str) -> NormalizedPath {
        let mut cache = self.path_cache.borrow_mut();
        if let Some(hit) = cache.get(raw) {
            return hit.clone();
        }
        let normalized = NormalizedPath::new(raw);
        cache.set(raw.to_string(), normalized.clone());
        normalized
    }

    /// Registers `value` under `method` at `path`. Fails if `method` is
    /// already registered there, or if the path's method map holds `ANY`.
    pub fn add(&mut self, method: Method, path: &str, value: V) -> Result<(), RouterError> {
        let result: Result<(), MethodMapError> = self.trie.with_value_mut(path, |slot| {
            slot.get_or_insert_with(MethodMap::new).insert(method.clone(), value)
        })?;
        if let Err(err) = &result {
            tracing::warn!("method registration rejected for {method} {path:?}: {err}");
        }
        result?;
        Ok(())
    }

    /// Registers `value` under the `ANY` sentinel at `path`. Fails if any
    /// specific method is already registered there.
    pub fn any(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        let result: Result<(), MethodMapError> = self.trie.with_value_mut(path, |slot| {
            slot.get_or_insert_with(MethodMap::new).insert_any(value)
        })?;
        if let Err(err) = &result {
            tracing::warn!("ANY registration rejected for {path:?}: {err}");
        }
        result?;
        Ok(())
    }

    pub fn get(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        self.add(Method::GET, path, value)
    }

    pub fn head(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        self.add(Method::HEAD, path, value)
    }

    pub fn post(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        self.add(Method::POST, path, value)
    }

    pub fn put(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        self.add(Method::PUT, path, value)
    }

    pub fn delete(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        self.add(Method::DELETE, path, value)
    }

    pub fn patch(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        self.add(Method::PATCH, path, value)
    }

    pub fn options(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        self.add(Method::OPTIONS, path, value)
    }

    pub fn trace(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        self.add(Method::TRACE, path, value)
    }

    pub fn connect(&mut self, path: &str, value: V) -> Result<(), RouterError> {
        self.add(Method::CONNECT, path, value)
    }

    /// Registers a value-transform at `path`, lifted from a per-value
    /// transform into one over the whole [`MethodMap`] stored there (it
    /// applies to every method registered at `path`, present or future).
    /// Named `use_middleware` rather than `use` (a reserved word in Rust),
    /// but otherwise this is exactly `spec.md` §4.3/§4.4.2's `use`.
    pub fn use_middleware(&mut self, path: &str, transform: Transform<V>) -> Result<(), RouterError> {
        let lifted: Transform<MethodMap<V>> = {
            let transform = transform.clone();
            Rc::new(move |map: MethodMap<V>| map.map_values(|v| transform(v)))
        };
        self.trie.use_transform(path, lifted)?;
        Ok(())
    }

    /// Grafts `other`'s trie into `self` at `prefix`. After this call,
    /// `other` and the subtree reachable from `self` at `prefix` are the
    /// same underlying nodes: registrations on either are visible through
    /// both (`spec.md` §8 invariant 4, scenario F).
    pub fn attach(&mut self, prefix: &str, other: &Router<V>) -> Result<(), RouterError> {
        self.trie.attach(prefix, &other.trie)?;
        Ok(())
    }

    /// Creates an empty sub-router, attaches it at `prefix`, and returns
    /// it. Calling this twice with the same prefix returns two distinct
    /// `Router` handles sharing the identical underlying subtree.
    pub fn group(&mut self, prefix: &str) -> Result<Router<V>, RouterError> {
        let trie = self.trie.subtree(prefix)?;
        tracing::debug!("router group created at {prefix:?}");
        Ok(Router {
            trie,
            fallback: None,
            path_cache: RefCell::new(LruCache::with_capacity(DEFAULT_PATH_CACHE_CAPACITY)?),
        })
    }

    pub fn set_fallback(&mut self, value: V) {
        self.fallback = Some(value);
    }

    pub fn fallback(&self) -> Option<&V> {
        self.fallback.as_ref()
    }

    /// The methods registered at `path`, with `ANY` expanded: the same
    /// computation `lookup`'s `MethodNotAllowed` outcome uses to build the
    /// `Allow` header. Exposed as a read-only introspection helper since it
    /// costs nothing beyond what 405-handling already computes.
    pub fn methods(&self, path: &str) -> Option<Vec<Method>> {
        let normalized = self.normalize(path);
        self.trie
            .lookup(&normalized)
            .map(|result| result.value.allowed_methods())
    }

    /// Resolves `method`/`path` to a `Match`, `MethodNotAllowed`, or
    /// `NotFound` outcome. This is the *only* lookup entry point the
    /// router exposes; unlike `PathTrie::lookup`, method dispatch is
    /// never bypassable (`spec.md` §9's open question on this).
    pub fn lookup(&self, method: &Method, path: &str) -> LookupOutcome<V> {
        let normalized = self.normalize(path);
        match self.trie.lookup(&normalized) {
            Some(result) => match result.value.get(method) {
                Some(value) => LookupOutcome::Match {
                    value: value.clone(),
                    parameters: result.parameters,
                    matched: result.matched,
                    remaining: result.remaining,
                },
                None => LookupOutcome::MethodNotAllowed {
                    allowed: result.value.allowed_methods(),
                },
            },
            None => LookupOutcome::NotFound,
        }
    }
}

fn not_found_response() -> Response {
    http::Response::builder()
        .status(http::StatusCode::NOT_FOUND)
        .body(Body::empty())
        .expect("a status-only response always builds")
}

fn method_not_allowed_response(allowed: &[Method]) -> Response {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    http::Response::builder()
        .status(http::StatusCode::METHOD_NOT_ALLOWED)
        .header(http::header::ALLOW, allow)
        .body(Body::empty())
        .expect("a status + Allow header response always builds")
}

impl Router<Handler> {
    /// Converts this `Router<Handler>` into a single [`Handler`]
    /// (`spec.md` §4.4.1): normalize the request path, dispatch by method,
    /// and on a match populate the context's route-match fields before
    /// invoking the resolved handler.
    pub fn as_handler(self) -> Handler {
        let router = Rc::new(self);
        handler_fn(move |mut ctx: NewContext| {
            let router = router.clone();
            async move {
                let method = ctx.request().method().clone();
                let path = ctx.request().uri().path().to_string();
                match router.lookup(&method, &path) {
                    LookupOutcome::Match {
                        value,
                        parameters,
                        matched,
                        remaining,
                    } => {
                        ctx.set_route_match(parameters, matched, remaining);
                        value(ctx).await
                    }
                    LookupOutcome::MethodNotAllowed { allowed } => {
                        tracing::debug!("method not allowed: {method} {path}");
                        Context::Response(ctx.respond(method_not_allowed_response(&allowed)))
                    }
                    LookupOutcome::NotFound => match router.fallback() {
                        Some(fallback) => {
                            tracing::debug!("no route matched for {path}, invoking fallback");
                            fallback.clone()(ctx).await
                        }
                        None => {
                            tracing::debug!("no route matched for {path}, no fallback");
                            Context::Response(ctx.respond(not_found_response()))
                        }
                    },
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use relic_core::context::ResponseContext;
    use std::future::Future;
    use std::task::{Context as TaskContext, Poll};

    fn block_on<F: Future>(fut: F) -> F::Output {
        let waker = futures_util::task::noop_waker();
        let mut cx = TaskContext::from_waker(&waker);
        let mut fut = Box::pin(fut);
        loop {
            if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }

    fn ok_handler(tag: &'static str) -> Handler {
        handler_fn(move |ctx| async move {
            Context::Response(
                ctx.respond(
                    http::Response::builder()
                        .status(200)
                        .header("x-tag", tag)
                        .body(Body::empty())
                        .unwrap(),
                ),
            )
        })
    }

    fn blank_request(method: &str, path: &str) -> relic_core::http::Request {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    fn as_response(ctx: Context) -> ResponseContext {
        match ctx {
            Context::Response(rc) => rc,
            Context::Connect(_) => panic!("expected a response context"),
        }
    }

    #[test]
    fn scenario_a_param_capture_invokes_registered_handler() {
        let mut router: Router<Handler> = Router::new();
        router
            .get(
                "/users/:id",
                handler_fn(|ctx| async move {
                    assert_eq!(ctx.path_parameters().get("id"), Some(&"42".to_string()));
                    Context::Response(ctx.respond(http::Response::builder().status(200).body(Body::empty()).unwrap()))
                }),
            )
            .unwrap();
        let handler = router.as_handler();
        let ctx = NewContext::new(blank_request("GET", "/users/42"));
        let response = as_response(block_on(handler(ctx)));
        assert_eq!(response.path_parameters().get("id"), Some(&"42".to_string()));
        assert_eq!(response.response().status(), 200);
    }

    #[test]
    fn scenario_b_method_mismatch_and_not_found() {
        let mut router: Router<Handler> = Router::new();
        router.get("/a", ok_handler("a")).unwrap();
        let handler = router.as_handler();

        let resp = as_response(block_on(handler(NewContext::new(blank_request("POST", "/a")))));
        assert_eq!(resp.response().status(), 405);
        assert_eq!(
            resp.response().headers().get(http::header::ALLOW).unwrap(),
            "GET"
        );

        let resp = as_response(block_on(handler(NewContext::new(blank_request("GET", "/b")))));
        assert_eq!(resp.response().status(), 404);
    }

    #[test]
    fn scenario_b_fallback_invoked_on_not_found() {
        let mut router: Router<Handler> = Router::new();
        router.set_fallback(ok_handler("fallback"));
        let handler = router.as_handler();
        let resp = as_response(block_on(handler(NewContext::new(blank_request("GET", "/nope")))));
        assert_eq!(resp.response().headers().get("x-tag").unwrap(), "fallback");
    }

    #[test]
    fn scenario_c_tail_wildcard_reports_matched_and_remaining_path() {
        let mut router: Router<Handler> = Router::new();
        router.get("/static/**", ok_handler("static")).unwrap();
        let handler = router.as_handler();
        let resp = as_response(block_on(handler(NewContext::new(blank_request(
            "GET",
            "/static/css/app.css",
        )))));
        assert_eq!(resp.response().headers().get("x-tag").unwrap(), "static");
        assert_eq!(resp.matched_path().to_string(), "/static");
        assert_eq!(resp.remaining_path().to_string(), "/css/app.css");
    }

    #[test]
    fn scenario_d_literal_beats_param_with_empty_parameters() {
        let mut router: Router<Handler> = Router::new();
        router.get("/users/me", ok_handler("literal")).unwrap();
        router
            .get(
                "/users/:id",
                handler_fn(|ctx| async move {
                    Context::Response(
                        ctx.respond(
                            http::Response::builder()
                                .status(200)
                                .header("x-tag", "param")
                                .body(Body::empty())
                                .unwrap(),
                        ),
                    )
                }),
            )
            .unwrap();
        let handler = router.as_handler();
        let resp = as_response(block_on(handler(NewContext::new(blank_request("GET", "/users/me")))));
        assert_eq!(resp.response().headers().get("x-tag").unwrap(), "literal");
        assert!(resp.path_parameters().is_empty());

        let resp = as_response(block_on(handler(NewContext::new(blank_request("GET", "/users/42")))));
        assert_eq!(resp.response().headers().get("x-tag").unwrap(), "param");
        assert_eq!(resp.path_parameters().get("id"), Some(&"42".to_string()));
    }

    #[test]
    fn scenario_e_middleware_runs_outermost_first() {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let mk_mw = |tag: &'static str, log: Rc<RefCell<Vec<&'static str>>>| -> Middleware {
            crate::handler::middleware_fn(move |ctx, next| {
                let log = log.clone();
                async move {
                    log.borrow_mut().push(tag);
                    next(ctx).await
                }
            })
        };

        let mut router: Router<Handler> = Router::new();
        router.use_middleware("/", mk_mw("m1", log.clone())).unwrap();
        router.use_middleware("/api", mk_mw("m2", log.clone())).unwrap();
        router
            .get(
                "/api/u",
                handler_fn({
                    let log = log.clone();
                    move |ctx| {
                        let log = log.clone();
                        async move {
                            log.borrow_mut().push("handler");
                            Context::Response(ctx.respond(http::Response::builder().status(200).body(Body::empty()).unwrap()))
                        }
                    }
                }),
            )
            .unwrap();

        let handler = router.as_handler();
        let _ = block_on(handler(NewContext::new(blank_request("GET", "/api/u"))));
        assert_eq!(*log.borrow(), vec!["m1", "m2", "handler"]);
    }

    #[test]
    fn scenario_f_attach_then_register_on_attached_router_is_visible() {
        let mut router_a: Router<Handler> = Router::new();
        let mut router_b: Router<Handler> = Router::new();
        router_b.get("/users", ok_handler("users")).unwrap();
        router_a.attach("/api", &router_b).unwrap();

        router_b.get("/posts", ok_handler("posts")).unwrap();

        let handler = router_a.as_handler();
        let resp = as_response(block_on(handler(NewContext::new(blank_request("GET", "/api/posts")))));
        assert_eq!(resp.response().headers().get("x-tag").unwrap(), "posts");
    }

    #[test]
    fn scenario_g_duplicate_registration_rejected_first_value_intact() {
        let mut router: Router<Handler> = Router::new();
        router.get("/x", ok_handler("first")).unwrap();
        let err = router.get("/x", ok_handler("second"));
        assert!(matches!(err, Err(RouterError::Method(MethodMapError::MethodAlreadyRegistered(_)))));

        let handler = router.as_handler();
        let resp = as_response(block_on(handler(NewContext::new(blank_request("GET", "/x")))));
        assert_eq!(resp.response().headers().get("x-tag").unwrap(), "first");
    }

    #[test]
    fn group_called_twice_shares_one_subtree() {
        let mut router: Router<Handler> = Router::new();
        let mut g1 = router.group("/admin").unwrap();
        let mut g2 = router.group("/admin").unwrap();
        g1.get("/ping", ok_handler("ping")).unwrap();
        g2.get("/pong", ok_handler("pong")).unwrap();

        let handler = router.as_handler();
        let resp = as_response(block_on(handler(NewContext::new(blank_request("GET", "/admin/ping")))));
        assert_eq!(resp.response().headers().get("x-tag").unwrap(), "ping");
        let resp = as_response(block_on(handler(NewContext::new(blank_request("GET", "/admin/pong")))));
        assert_eq!(resp.response().headers().get("x-tag").unwrap(), "pong");
    }
}
