use std::mem;

use derive_more::IsVariant;

/// A single logical position of a [`Collection`](super::Collection).
///
/// A slot inside the Collection's length is either `Occupied` by an element or a `Hole` left behind
/// by [`unset`](super::Collection::unset). Storage past the length is never exposed as a Slot at
/// all, so a hole and unused capacity can't be mistaken for one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum Slot<T> {
    /// A slot holding an element.
    Occupied(T),
    /// A slot whose element was unset.
    Hole,
}

impl<T> Slot<T> {
    /// Converts from `&Slot<T>` to `Slot<&T>`.
    pub const fn as_ref(&self) -> Slot<&T> {
        match self {
            Slot::Occupied(value) => Slot::Occupied(value),
            Slot::Hole => Slot::Hole,
        }
    }

    /// Converts from `&mut Slot<T>` to `Slot<&mut T>`.
    pub const fn as_mut(&mut self) -> Slot<&mut T> {
        match self {
            Slot::Occupied(value) => Slot::Occupied(value),
            Slot::Hole => Slot::Hole,
        }
    }

    /// Converts the Slot into an [`Option`], mapping `Hole` to `None`.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Slot;
    /// assert_eq!(Slot::Occupied(3).into_option(), Some(3));
    /// assert_eq!(Slot::<u8>::Hole.into_option(), None);
    /// ```
    pub fn into_option(self) -> Option<T> {
        match self {
            Slot::Occupied(value) => Some(value),
            Slot::Hole => None,
        }
    }

    /// Takes the element out of the Slot, leaving a `Hole` in its place.
    pub const fn take(&mut self) -> Slot<T> {
        mem::replace(self, Slot::Hole)
    }

    /// Returns the contained element.
    ///
    /// # Panics
    /// Panics if the Slot is a `Hole`.
    pub fn unwrap(self) -> T {
        match self {
            Slot::Occupied(value) => value,
            Slot::Hole => panic!("called `Slot::unwrap()` on a `Hole` value"),
        }
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Slot::Occupied(value),
            None => Slot::Hole,
        }
    }
}

impl<T> From<Slot<T>> for Option<T> {
    fn from(value: Slot<T>) -> Self {
        value.into_option()
    }
}
