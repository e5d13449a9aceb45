//! Severity bitmasks for the group logger.
//!
//! - [`LogLevels`] holds the fixed bit assignment for each severity.
//! - [`Level`] is a mutable mask register whose every mutation is validated
//!   against the same rule, so groups, transports and the logger itself never
//!   disagree about what a usable mask is.
//!
//! A candidate mask is valid iff it is a whole number in
//! `0..=MAX_SAFE_INTEGER`. Invalid input never panics: it is rejected and the
//! stored mask is left exactly as it was.

mod error;
mod levels;

pub use error::LevelParseError;
pub use levels::LogLevels;

/// Largest integer that survives a round trip through an IEEE-754 double.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// A value that may be offered as a level mask.
///
/// Integer types convert when they are non-negative and within
/// [`MAX_SAFE_INTEGER`]; floating point values additionally have to be finite
/// and have no fractional part.
pub trait LevelValue {
    /// Returns the mask this value denotes, or `None` if it is not a valid level.
    fn to_mask(self) -> Option<u64>;
}

macro_rules! integer_level_value {
    ($($ty:ty),*) => {$(
        impl LevelValue for $ty {
            fn to_mask(self) -> Option<u64> {
                u64::try_from(self).ok().filter(|value| *value <= MAX_SAFE_INTEGER)
            }
        }
    )*};
}

integer_level_value!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl LevelValue for f64 {
    fn to_mask(self) -> Option<u64> {
        if !self.is_finite() || self.fract() != 0.0 {
            return None;
        }
        if self < 0.0 || self > MAX_SAFE_INTEGER as f64 {
            return None;
        }
        Some(self as u64)
    }
}

impl LevelValue for f32 {
    fn to_mask(self) -> Option<u64> {
        f64::from(self).to_mask()
    }
}

impl LevelValue for Level {
    fn to_mask(self) -> Option<u64> {
        Some(self.get())
    }
}

impl LevelValue for &Level {
    fn to_mask(self) -> Option<u64> {
        Some(self.get())
    }
}

impl<V: LevelValue> LevelValue for Option<V> {
    fn to_mask(self) -> Option<u64> {
        self.and_then(LevelValue::to_mask)
    }
}

/// Returns whether `candidate` is a usable level mask.
pub fn is_valid_level(candidate: impl LevelValue) -> bool {
    candidate.to_mask().is_some()
}

/// Returns the mask `candidate` denotes, treating anything invalid as
/// [`LogLevels::NONE`].
pub fn mask_or_zero(candidate: impl LevelValue) -> u64 {
    candidate.to_mask().unwrap_or(LogLevels::NONE)
}

/// Mutable level mask register.
///
/// Every operation validates both its argument and the resulting mask; a
/// rejected operation returns `false` and leaves the register untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    value: u64,
    fallback: u64,
}

impl Level {
    /// Creates a register holding `initial`, falling back to
    /// [`LogLevels::DEFAULT`] when `initial` is not a valid level.
    pub fn new(initial: impl LevelValue) -> Self {
        Self::with_fallback(initial, LogLevels::DEFAULT)
    }

    /// Creates a register holding `initial`, or `fallback` when `initial` is
    /// invalid. `fallback` is also what [`Level::get`] reports should the
    /// stored mask ever be out of range.
    pub fn with_fallback(initial: impl LevelValue, fallback: impl LevelValue) -> Self {
        let fallback = fallback.to_mask().unwrap_or(LogLevels::DEFAULT);
        let value = initial.to_mask().unwrap_or(fallback);
        Self { value, fallback }
    }

    /// Returns the current mask.
    pub fn get(&self) -> u64 {
        if self.value <= MAX_SAFE_INTEGER { self.value } else { self.fallback }
    }

    /// Returns the mask reported when the stored one is unusable.
    pub fn fallback(&self) -> u64 {
        self.fallback
    }

    /// Replaces the mask. Returns `false` and keeps the old mask if `value`
    /// is not a valid level.
    pub fn set(&mut self, value: impl LevelValue) -> bool {
        match value.to_mask() {
            Some(mask) => {
                self.value = mask;
                true
            }
            None => false,
        }
    }

    /// ORs `bit` into the mask.
    pub fn enable(&mut self, bit: impl LevelValue) -> bool {
        let Some(bit) = bit.to_mask() else {
            return false;
        };
        self.apply(self.get() | bit)
    }

    /// Enables each entry of `bits`, skipping invalid ones. Returns how many
    /// entries were applied.
    pub fn enable_multiple<I>(&mut self, bits: I) -> usize
    where
        I: IntoIterator,
        I::Item: LevelValue,
    {
        bits.into_iter().map(|bit| self.enable(bit)).filter(|applied| *applied).count()
    }

    /// XORs `bit` out of the mask.
    ///
    /// This clears `bit` when it is set. Disabling a bit that is currently
    /// clear toggles it on.
    pub fn disable(&mut self, bit: impl LevelValue) -> bool {
        let Some(bit) = bit.to_mask() else {
            return false;
        };
        self.apply(self.get() ^ bit)
    }

    /// Disables each entry of `bits`, skipping invalid ones. Returns how many
    /// entries were applied.
    pub fn disable_multiple<I>(&mut self, bits: I) -> usize
    where
        I: IntoIterator,
        I::Item: LevelValue,
    {
        bits.into_iter().map(|bit| self.disable(bit)).filter(|applied| *applied).count()
    }

    /// Returns whether the mask shares at least one bit with `bits`.
    pub fn intersects(&self, bits: u64) -> bool {
        self.get() & bits != 0
    }

    fn apply(&mut self, candidate: u64) -> bool {
        if candidate > MAX_SAFE_INTEGER {
            return false;
        }
        self.value = candidate;
        true
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new(LogLevels::DEFAULT)
    }
}

impl From<Level> for u64 {
    fn from(level: Level) -> Self {
        level.get()
    }
}
