//! The per-request state machine: `NewContext` transitions to exactly one
//! terminal state, `ResponseContext` or `ConnectContext`. Rust's ownership
//! rules do the enforcement for us: `respond`/`connect` consume `self` by
//! value, so the compiler rejects a second transition attempt; there is no
//! runtime "already consumed" check to write because there is no way to
//! reach it.
pub mod property;

use std::any::Any;
use std::collections::HashMap;

use futures_util::future::LocalBoxFuture;

pub use property::{ContextProperty, PropertyBag};

use crate::http::{Request, Response};
use crate::path::NormalizedPath;

/// Invoked by the adapter once it has the raw connection in hand, with the
/// connection type-erased since the core has no knowledge of it (TLS vs.
/// plain TCP, the concrete `monoio` stream type, etc.). The adapter is the
/// only party that knows what to downcast it to.
pub type UpgradeCallback = Box<dyn FnOnce(Box<dyn Any>) -> LocalBoxFuture<'static, ()>>;

struct ContextBase {
    request: Request,
    path_parameters: HashMap<String, String>,
    matched_path: NormalizedPath,
    remaining_path: NormalizedPath,
    properties: PropertyBag,
}

impl ContextBase {
    fn new(request: Request) -> Self {
        Self {
            request,
            path_parameters: HashMap::new(),
            matched_path: NormalizedPath::root(),
            remaining_path: NormalizedPath::root(),
            properties: PropertyBag::default(),
        }
    }
}

/// The terminal state of a request: either it has been answered, or the
/// connection has been handed off to an upgrade callback.
pub enum Context {
    Response(ResponseContext),
    Connect(ConnectContext),
}

/// A fresh, unhandled request. The only way out is `respond` or `connect`.
pub struct NewContext {
    base: ContextBase,
}

impl NewContext {
    pub fn new(request: Request) -> Self {
        Self {
            base: ContextBase::new(request),
        }
    }

    pub fn request(&self) -> &Request {
        &self.base.request
    }

    pub fn path_parameters(&self) -> &HashMap<String, String> {
        &self.base.path_parameters
    }

    pub fn matched_path(&self) -> &NormalizedPath {
        &self.base.matched_path
    }

    pub fn remaining_path(&self) -> &NormalizedPath {
        &self.base.remaining_path
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.base.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.base.properties
    }

    /// Populated by the router on a route match; see `spec.md` §4.4.1.
    pub fn set_route_match(
        &mut self,
        path_parameters: HashMap<String, String>,
        matched_path: NormalizedPath,
        remaining_path: NormalizedPath,
    ) {
        self.base.path_parameters = path_parameters;
        self.base.matched_path = matched_path;
        self.base.remaining_path = remaining_path;
    }

    pub fn respond(self, response: Response) -> ResponseContext {
        ResponseContext {
            base: self.base,
            response,
        }
    }

    pub fn connect(self, upgrade: UpgradeCallback) -> ConnectContext {
        ConnectContext {
            base: self.base,
            upgrade,
        }
    }
}

/// A request that has been answered. Middleware may re-wrap the response by
/// calling `respond` again; the other shared fields are untouched.
pub struct ResponseContext {
    base: ContextBase,
    response: Response,
}

impl ResponseContext {
    pub fn request(&self) -> &Request {
        &self.base.request
    }

    pub fn path_parameters(&self) -> &HashMap<String, String> {
        &self.base.path_parameters
    }

    pub fn matched_path(&self) -> &NormalizedPath {
        &self.base.matched_path
    }

    pub fn remaining_path(&self) -> &NormalizedPath {
        &self.base.remaining_path
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.base.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.base.properties
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }

    /// Replaces the carried response, producing another `ResponseContext`
    /// with the same request/parameters/properties. This is the only
    /// mutation point available to outgoing middleware.
    pub fn respond(self, response: Response) -> ResponseContext {
        ResponseContext {
            base: self.base,
            response,
        }
    }
}

/// A request whose connection has been handed off. Terminal: there is no
/// further transition, so there is nothing to consume it but `Drop`.
pub struct ConnectContext {
    base: ContextBase,
    upgrade: UpgradeCallback,
}

impl ConnectContext {
    pub fn request(&self) -> &Request {
        &self.base.request
    }

    pub fn path_parameters(&self) -> &HashMap<String, String> {
        &self.base.path_parameters
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.base.properties
    }

    /// Hands the stored callback to the adapter, which owns invoking it
    /// with the concrete connection object once ready.
    pub fn into_upgrade(self) -> UpgradeCallback {
        self.upgrade
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Body;
    use http::Response as HttpResponse;

    fn blank_request() -> Request {
        http::Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap()
    }

    fn blank_response() -> Response {
        HttpResponse::builder().status(200).body(Body::empty()).unwrap()
    }

    #[test]
    fn respond_carries_exactly_the_given_response_without_touching_other_fields() {
        let mut ctx = NewContext::new(blank_request());
        ctx.set_route_match(
            [("id".to_string(), "42".to_string())].into_iter().collect(),
            NormalizedPath::new("/users"),
            NormalizedPath::root(),
        );
        let responded = ctx.respond(blank_response());
        assert_eq!(responded.response().status(), 200);

        let rewrapped = responded.respond(
            HttpResponse::builder()
                .status(201)
                .body(Body::empty())
                .unwrap(),
        );
        assert_eq!(rewrapped.response().status(), 201);
        assert_eq!(
            rewrapped.path_parameters().get("id"),
            Some(&"42".to_string())
        );
        assert_eq!(rewrapped.matched_path().to_string(), "/users");
    }

    #[test]
    fn properties_survive_the_response_transition() {
        let mut ctx = NewContext::new(blank_request());
        let prop: ContextProperty<u32> = ContextProperty::new();
        prop.set(ctx.properties_mut(), 7);
        let mut responded = ctx.respond(blank_response());
        assert_eq!(prop.get(responded.properties()), Some(&7));
        prop.set(responded.properties_mut(), 8);
        assert_eq!(prop.get(responded.properties()), Some(&8));
    }
}
