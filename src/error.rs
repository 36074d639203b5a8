//! Error types shared by [`BiVec`](crate::BiVec) and its cursors.

use core::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// How badly a cursor's snapshot disagrees with its parent.
///
/// Ordered from most to least serious. `Warning` is part of the taxonomy but
/// is never produced by the current protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// The cursor's slot was removed from the live range.
    Severe,
    /// The backing block was replaced; the cursor's slot no longer exists.
    Moderate,
    /// Something else changed; the slot is still nominally live.
    Mild,
    /// Reserved.
    Warning,
}

impl Severity {
    /// Name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Severe => "Severe",
            Severity::Moderate => "Moderate",
            Severity::Mild => "Mild",
            Severity::Warning => "Warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way a `BiVec` or cursor operation can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The allocator could not provide a block for `capacity` elements.
    #[error("failed to allocate storage for {capacity} elements")]
    OutOfMemory {
        /// Requested element capacity.
        capacity: usize,
    },

    /// Indexed access outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Live length at the time of the call.
        len: usize,
    },

    /// `pop_back` / `pop_front` on an empty sequence.
    #[error("no element to pop from an empty sequence")]
    EmptyContainer,

    /// The parent mutated since the cursor was created.
    #[error("invalid cursor ({severity})")]
    InvalidCursor {
        /// Classification of the staleness.
        severity: Severity,
    },

    /// A fresh cursor pointing outside the live range was dereferenced.
    #[error("cursor position {position} is outside the live range of length {len}")]
    CursorOutOfRange {
        /// Relative position of the cursor.
        position: isize,
        /// Live length at the time of the call.
        len: usize,
    },

    /// The cursor was used with a sequence that did not create it.
    #[error("cursor belongs to a different sequence")]
    ForeignCursor,
}

impl Error {
    /// Severity carried by an [`Error::InvalidCursor`], if any.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Error::InvalidCursor { severity } => Some(*severity),
            _ => None,
        }
    }
}
