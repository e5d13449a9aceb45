//! Log records and the sinks that receive them.
//!
//! - [`Message`] is the immutable record built once per logging call.
//! - [`Transport`] wraps an [`Action`] under an id and a level mask and
//!   normalises every way an action can settle into one
//!   `Result<bool, ActionError>`.
//! - [`console`] is the built-in console sink.

pub mod action;
mod console;
mod error;
mod message;
mod transport;

pub use action::{Action, ActionResult, AsyncFn, SyncFn};
pub use console::{CONSOLE_TRANSPORT_ID, console};
pub use error::{ActionError, BoxError, TransportError};
pub use message::{Message, timestamp};
pub use transport::{Transport, TransportBuilder};
