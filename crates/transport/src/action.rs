//! The sink contract a transport wraps.
//!
//! An action receives a [`Message`] and reports `Ok(true)`/`Ok(false)`,
//! either immediately or from a future, or fails with an error. Synchronous
//! and asynchronous closures are adapted to the same [`Action`] trait so the
//! transport only ever deals with one shape.

use std::{future::Future, sync::Arc};

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::{BoxError, Message};

/// Value produced by an action once it settles.
pub type ActionResult = Result<bool, BoxError>;

/// A log sink.
pub trait Action: Send + Sync + 'static {
    fn call(&self, message: Arc<Message>) -> BoxFuture<'static, ActionResult>;
}

/// Adapts a synchronous closure into an [`Action`].
pub struct SyncFn<F>(pub F);

impl<F> Action for SyncFn<F>
where
    F: Fn(&Message) -> ActionResult + Send + Sync + 'static,
{
    fn call(&self, message: Arc<Message>) -> BoxFuture<'static, ActionResult> {
        future::ready((self.0)(&message)).boxed()
    }
}

/// Adapts a closure returning a future into an [`Action`].
pub struct AsyncFn<F>(pub F);

impl<F, Fut> Action for AsyncFn<F>
where
    F: Fn(Arc<Message>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    fn call(&self, message: Arc<Message>) -> BoxFuture<'static, ActionResult> {
        (self.0)(message).boxed()
    }
}
