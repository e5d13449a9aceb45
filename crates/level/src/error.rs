/// Error returned when a textual level specification cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelParseError {
    #[error("level specification is empty")]
    Empty,

    #[error("unknown level name: {0:?}")]
    UnknownName(String),

    #[error("numeric level {0:?} is not a non-negative safe integer")]
    InvalidNumber(String),
}
