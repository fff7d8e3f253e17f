//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Agent ids are *not* dense: the
//! population mutator appends duplicates after the largest existing id, and
//! deactivated agents keep their id, so agents live in ordered maps rather
//! than index-addressed `Vec`s.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for use as a `Vec` index or counter.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// A simulated resource.  Original agents come from discovery; duplicates
    /// are allocated by the population mutator above the current maximum.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of an activity in the configuration's activity registry.
    /// `u16` keeps history and transition keys compact (max 65,535 activities).
    pub struct ActivityId(u16);
}

typed_id! {
    /// Zero-based, contiguous case number assigned in admission order.
    pub struct CaseId(u32);
}

impl ActivityId {
    /// The reserved terminal activity.  Always registered first, so it is
    /// index 0 in every registry.
    pub const TERMINAL: ActivityId = ActivityId(0);

    #[inline]
    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }
}
