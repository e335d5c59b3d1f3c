use derive_more::Display;
use serde::Serialize;
use std::num::NonZeroU32;

///
/// Limit
///
/// Maximum number of records a query may return. Always positive;
/// an absent limit means unbounded.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Limit(NonZeroU32);

impl Limit {
    /// Return `None` for zero.
    #[must_use]
    pub const fn new(max_results: u32) -> Option<Self> {
        match NonZeroU32::new(max_results) {
            Some(max_results) => Some(Self(max_results)),
            None => None,
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Limit as a `usize` bound for truncating in-memory results.
    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::try_from(self.get()).unwrap_or(usize::MAX)
    }
}

impl From<NonZeroU32> for Limit {
    fn from(max_results: NonZeroU32) -> Self {
        Self(max_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_limit() {
        assert_eq!(Limit::new(0), None);
        assert_eq!(Limit::new(5).map(Limit::get), Some(5));
    }

    #[test]
    fn display_shows_the_bound() {
        assert_eq!(Limit::new(10).map(|l| l.to_string()).as_deref(), Some("10"));
    }
}
