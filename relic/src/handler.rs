//! `Handler` and `Middleware`: the value types a [`crate::router::Router`]
//! actually stores. A `Handler` transitions a `NewContext` to a terminal
//! state; a `Middleware` is a function from one `Handler` to another,
//! composed via [`relic_core::trie::Transform`] at lookup time (see
//! `spec.md` §4.4.2).
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use relic_core::context::{Context, NewContext};
use relic_core::trie::Transform;

/// `Context -> Context`, async. Handlers are single-threaded (`Rc`, not
/// `Arc`) to match the cooperative, non-`Send` scheduling model in
/// `spec.md` §5, the same reason the teacher's own service stack is built
/// around `monoio`'s thread-per-core runtime rather than a work-stealing
/// executor.
pub type Handler = Rc<dyn Fn(NewContext) -> LocalBoxFuture<'static, Context>>;

/// `Handler -> Handler`. The router-level instantiation of the generic
/// [`Transform`] the trie applies at lookup.
pub type Middleware = Transform<Handler>;

/// Lifts a plain async function into a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
    F: Fn(NewContext) -> Fut + 'static,
    Fut: Future<Output = Context> + 'static,
{
    Rc::new(move |ctx| Box::pin(f(ctx)) as Pin<Box<dyn Future<Output = Context>>>)
}

/// Lifts a `(NewContext, next: Handler) -> Context` async function into a
/// [`Middleware`], i.e. a value-level "before/after the handler" wrapper.
/// `next` is the handler this middleware wraps; call it to continue the
/// chain, or skip it to short-circuit.
pub fn middleware_fn<F, Fut>(f: F) -> Middleware
where
    F: Fn(NewContext, Handler) -> Fut + 'static,
    Fut: Future<Output = Context> + 'static,
{
    let f = Rc::new(f);
    Rc::new(move |next: Handler| {
        let f = f.clone();
        handler_fn(move |ctx| {
            let f = f.clone();
            let next = next.clone();
            async move { f(ctx, next).await }
        })
    })
}
