use crate::{LevelParseError, LevelValue};

/// Fixed bit assignment for each severity.
///
/// Bits are independent flags and combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevels;

impl LogLevels {
    pub const NONE: u64 = 0x0;
    pub const ERROR: u64 = 0x1;
    pub const WARN: u64 = 0x2;
    pub const INFO: u64 = 0x4;
    pub const DEBUG: u64 = 0x8;
    pub const TRACE: u64 = 0x10;
    pub const ALL: u64 = 0x1F;

    /// `ALL` without `DEBUG` and `TRACE`.
    pub const DEFAULT: u64 = Self::ALL & !Self::DEBUG & !Self::TRACE;

    /// Severity bits ordered from most to least severe.
    const NAMED: [(u64, &'static str); 5] = [
        (Self::ERROR, "ERROR"),
        (Self::WARN, "WARN"),
        (Self::INFO, "INFO"),
        (Self::DEBUG, "DEBUG"),
        (Self::TRACE, "TRACE"),
    ];

    /// Returns the name of the most severe bit set in `mask`, or `"NONE"`
    /// when no severity bit is set.
    pub fn label(mask: u64) -> &'static str {
        Self::NAMED
            .iter()
            .find(|(bit, _)| mask & bit != 0)
            .map(|(_, name)| *name)
            .unwrap_or("NONE")
    }

    /// Parses a level specification.
    ///
    /// Accepts a numeric mask (`"5"`) or level names separated by `|` or `,`
    /// (`"error|warn"`), case-insensitively. `none` and `all` are recognised.
    pub fn parse(spec: &str) -> Result<u64, LevelParseError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(LevelParseError::Empty);
        }

        if spec.bytes().all(|byte| byte.is_ascii_digit()) {
            return spec
                .parse::<u64>()
                .ok()
                .and_then(LevelValue::to_mask)
                .ok_or_else(|| LevelParseError::InvalidNumber(spec.to_owned()));
        }

        let mut mask = Self::NONE;
        for name in spec.split(['|', ',']).map(str::trim).filter(|name| !name.is_empty()) {
            mask |= Self::bit_for_name(name)
                .ok_or_else(|| LevelParseError::UnknownName(name.to_owned()))?;
        }
        Ok(mask)
    }

    fn bit_for_name(name: &str) -> Option<u64> {
        if name.eq_ignore_ascii_case("none") {
            return Some(Self::NONE);
        }
        if name.eq_ignore_ascii_case("all") {
            return Some(Self::ALL);
        }
        Self::NAMED
            .iter()
            .find(|(_, label)| label.eq_ignore_ascii_case(name))
            .map(|(bit, _)| *bit)
    }
}
