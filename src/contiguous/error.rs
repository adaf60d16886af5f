//! Error types reported by [`Collection`](super::Collection).
//!
//! Each cause of failure is its own struct, and each operation that can fail in more than one way
//! gets an enum over the structs it can produce. Operations with a single "nothing there" outcome
//! (`pop`, `shift`, `find`) report it through [`Option`] instead.

use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant};

/// The requested capacity doesn't fit in a valid [`Layout`](std::alloc::Layout).
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("capacity of {requested} slots would exceed isize::MAX bytes")]
pub struct CapacityOverflow {
    /// The number of slots that was asked for, saturated at [`usize::MAX`] when the count itself
    /// doesn't fit in a `usize`.
    pub requested: usize,
}

/// The global allocator returned null.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("allocator failed to provide {bytes} bytes")]
pub struct AllocationFailure {
    /// The size of the refused allocation.
    pub bytes: usize,
}

/// The reasons storage growth can fail. The Collection is unchanged whenever one is returned.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq, From, IsVariant)]
pub enum GrowError {
    CapacityOverflow(CapacityOverflow),
    AllocationFailure(AllocationFailure),
}

/// An index at or past the length of the Collection.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("index {index} out of bounds for collection with length {len}")]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

/// The slot was already a hole, so there was nothing to unset.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("slot {index} is already a hole")]
pub struct AlreadyHole {
    pub index: usize,
}

/// The reasons a single slot can't be unset.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq, From, IsVariant)]
pub enum UnsetError {
    IndexOutOfBounds(IndexOutOfBounds),
    AlreadyHole(AlreadyHole),
}

/// A range of slots that extends past the length of the Collection.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("range of {count} slots from {start} exceeds collection length {len}")]
pub struct RangeOutOfBounds {
    pub start: usize,
    pub count: usize,
    pub len: usize,
}

/// Some slots in the range couldn't be unset. Every other slot in the range *was* unset, and
/// stays that way.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("{failed} of {attempted} slots could not be unset")]
pub struct PartialUnset {
    /// The number of slots in the range that were already holes.
    pub failed: usize,
    /// The number of slots in the range.
    pub attempted: usize,
}

/// The reasons a range of slots can't be (fully) unset.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq, From, IsVariant)]
pub enum UnsetMultiError {
    RangeOutOfBounds(RangeOutOfBounds),
    PartialUnset(PartialUnset),
}

/// Returned when an element couldn't be inserted because the Collection failed to grow. The
/// element is handed back so that ownership never silently ends inside the Collection.
#[derive(Clone, PartialEq, Eq)]
pub struct PushError<T> {
    /// The element that wasn't inserted.
    pub element: T,
    /// Why the Collection couldn't make room for it.
    pub error: GrowError,
}

impl<T> PushError<T> {
    /// Returns the element that wasn't inserted.
    pub fn into_inner(self) -> T {
        self.element
    }
}

impl<T> Debug for PushError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> Display for PushError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unable to insert element: {}", self.error)
    }
}

impl<T> Error for PushError<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}
