//! `relic`: a method-aware router and handler pipeline layered on
//! `relic-core`'s path trie. See `relic-core` for the trie/context/path
//! primitives; this crate adds per-method dispatch, middleware
//! composition, router groups, and the injection sugar over them.
pub mod handler;
pub mod inject;
pub mod method;
pub mod router;
pub mod runtime;

pub use handler::{handler_fn, middleware_fn, Handler, Middleware};
pub use inject::{HandlerObject, MiddlewareObject};
pub use method::{MethodMap, MethodMapError};
pub use router::{LookupOutcome, Router, RouterError};
pub use runtime::{RuntimeConfig, RuntimeType};
