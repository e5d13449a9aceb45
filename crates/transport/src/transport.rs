use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use futures_util::FutureExt;
use level::{Level, LevelValue};
use tracing::trace;

use crate::{
    ActionError, Message, TransportError,
    action::{Action, ActionResult, AsyncFn, SyncFn},
};

/// A named, leveled sink.
///
/// A transport only knows how to run its action. Whether it should run for a
/// given message is decided by the group it belongs to. Transports are shared
/// as `Arc<Transport>`; groups track membership by pointer identity.
pub struct Transport {
    id: String,
    levels: Level,
    action: Arc<dyn Action>,
}

impl Transport {
    /// Builds a transport in one call.
    ///
    /// An invalid `levels` value is coerced to [`level::LogLevels::DEFAULT`]
    /// rather than rejected.
    pub fn new(
        id: impl Into<String>,
        levels: impl LevelValue,
        action: impl Action,
    ) -> Result<Self, TransportError> {
        Self::builder().id(id).levels(levels).action(action).build()
    }

    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    pub(crate) fn from_parts(id: &str, levels: Level, action: impl Action) -> Self {
        Self { id: id.to_owned(), levels, action: Arc::new(action) }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn levels(&self) -> &Level {
        &self.levels
    }

    /// Returns the transport's own mask.
    pub fn level(&self) -> u64 {
        self.levels.get()
    }

    /// Runs the action for `message` and settles it into a single outcome.
    ///
    /// An `Err` from the action, and a panic raised either while calling it or
    /// while polling its future, both surface as [`ActionError`].
    pub async fn execute(&self, message: Arc<Message>) -> Result<bool, ActionError> {
        trace!(transport = %self.id, level = message.level(), "executing transport");
        let action = Arc::clone(&self.action);
        let pending = match panic::catch_unwind(AssertUnwindSafe(move || action.call(message))) {
            Ok(pending) => pending,
            Err(payload) => return Err(ActionError::Panicked(panic_message(payload.as_ref()))),
        };

        match AssertUnwindSafe(pending).catch_unwind().await {
            Ok(Ok(delivered)) => Ok(delivered),
            Ok(Err(error)) => Err(ActionError::Failed(error)),
            Err(payload) => Err(ActionError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport").field("id", &self.id).field("levels", &self.levels).finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

/// Step-by-step construction of a [`Transport`].
#[derive(Default)]
pub struct TransportBuilder {
    id: Option<String>,
    levels: Level,
    action: Option<Arc<dyn Action>>,
}

impl TransportBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn levels(mut self, levels: impl LevelValue) -> Self {
        self.levels = Level::new(levels);
        self
    }

    pub fn action(mut self, action: impl Action) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    /// Uses a synchronous closure as the action.
    pub fn sync_action<F>(self, action: F) -> Self
    where
        F: Fn(&Message) -> ActionResult + Send + Sync + 'static,
    {
        self.action(SyncFn(action))
    }

    /// Uses a closure returning a future as the action.
    pub fn async_action<F, Fut>(self, action: F) -> Self
    where
        F: Fn(Arc<Message>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        self.action(AsyncFn(action))
    }

    pub fn build(self) -> Result<Transport, TransportError> {
        let id = self.id.ok_or(TransportError::MissingId)?;
        if id.trim().is_empty() {
            return Err(TransportError::EmptyId);
        }
        let action = self.action.ok_or(TransportError::MissingAction)?;
        Ok(Transport { id, levels: self.levels, action })
    }
}
