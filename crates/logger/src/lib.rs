//! Group-routed logging.
//!
//! A [`Logger`] owns named [`Group`]s of shared transports. Whether a
//! transport fires for a message is decided by its group from the union of
//! the global, group and transport masks. Matching transports of a group run
//! one after another; a failing one is reported through `tracing` and never
//! stops its siblings or reaches the caller.

mod group;
mod logger;
mod logging;
mod options;
mod report;

pub use group::{DEFAULT_GROUP_LEVEL, Group};
pub use level::{Level, LevelValue, LogLevels};
pub use logger::{ALL_GROUP, GLOBAL_GROUP, Logger};
pub use logging::Logging;
pub use options::{GroupOptions, LoggerOptions};
pub use report::DispatchReport;
pub use transport::{Message, Transport, TransportError};
