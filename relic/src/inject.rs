//! `HandlerObject`/`MiddlewareObject`: polymorphic units that know how to
//! install themselves into a [`Router`], for modular route assembly
//! (`spec.md` §4.4.3). Pure syntactic sugar over `Router::add`/`any` and
//! `Router::use_middleware`; nothing here a caller couldn't write by hand.
use http::Method;

use crate::handler::{Handler, Middleware};
use crate::router::{Router, RouterError};

/// A self-describing handler: knows the method and path it wants to be
/// registered under, and how to build its [`Handler`]. The defaults
/// (`GET` at `/`) match a bare handler registered with no further
/// configuration.
pub trait HandlerObject {
    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> &str {
        "/"
    }

    fn handler(&self) -> Handler;

    fn inject_in(&self, router: &mut Router<Handler>) -> Result<(), RouterError> {
        router.add(self.method(), self.path(), self.handler())
    }
}

/// A self-describing middleware: knows the path it scopes itself to
/// (`/` by default, every request) and how to build its [`Middleware`].
pub trait MiddlewareObject {
    fn path(&self) -> &str {
        "/"
    }

    fn middleware(&self) -> Middleware;

    fn inject_in(&self, router: &mut Router<Handler>) -> Result<(), RouterError> {
        router.use_middleware(self.path(), self.middleware())
    }
}
