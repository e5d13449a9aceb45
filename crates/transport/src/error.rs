/// Boxed error produced by a transport action.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned when a transport is built with invalid arguments.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid argument: transport id is required")]
    MissingId,

    #[error("invalid argument: transport id must be a non-empty string")]
    EmptyId,

    #[error("invalid argument: transport action is required")]
    MissingAction,
}

/// Failure outcome of executing a transport action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("transport action failed: {0}")]
    Failed(#[source] BoxError),

    #[error("transport action panicked: {0}")]
    Panicked(String),
}
