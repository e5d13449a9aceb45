use std::fmt::{self, Display, Write};

use chrono::{SecondsFormat, Utc};

/// Separator placed between the parts of a message body.
const PART_SEPARATOR: char = ' ';

/// An emitted log record.
///
/// Built once per logging call and shared read-only by every transport that
/// fires for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    date: String,
    level: u64,
    message: String,
}

impl Message {
    /// Builds a message from `parts` joined by a single space. Zero parts
    /// yield an empty body.
    pub fn create<I>(date: impl Into<String>, level: u64, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut message = String::new();
        for (index, part) in parts.into_iter().enumerate() {
            if index > 0 {
                message.push(PART_SEPARATOR);
            }
            // Writing into a String cannot fail.
            let _ = write!(message, "{part}");
        }
        Self { date: date.into(), level, message }
    }

    /// Same as [`Message::create`], stamped with the current UTC time.
    pub fn now<I>(level: u64, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        Self::create(timestamp(), level, parts)
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.date, level::LogLevels::label(self.level), self.message)
    }
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
