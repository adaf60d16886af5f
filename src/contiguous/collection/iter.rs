use std::iter::FusedIterator;
use std::mem::{self, ManuallyDrop};
use std::ptr;
use std::slice;

use super::{Collection, Slot};
use crate::contiguous::buffer::Buffer;

/// A borrowed iterator over every slot of a [`Collection`], holes included.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, Slot<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(slots: &'a [Slot<T>]) -> Iter<'a, T> {
        Iter {
            inner: slots.iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = Slot<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Slot::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Slot::as_ref)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// A borrowed iterator over the elements of a [`Collection`], skipping holes.
#[derive(Debug, Clone)]
pub struct Elements<'a, T> {
    inner: slice::Iter<'a, Slot<T>>,
}

impl<'a, T> Elements<'a, T> {
    pub(crate) fn new(slots: &'a [Slot<T>]) -> Elements<'a, T> {
        Elements {
            inner: slots.iter(),
        }
    }
}

impl<'a, T> Iterator for Elements<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|slot| slot.as_ref().into_option())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<T> DoubleEndedIterator for Elements<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.rfind(|slot| slot.is_occupied())?.as_ref().into_option()
    }
}

impl<T> FusedIterator for Elements<'_, T> {}

/// An owned iterator over every slot of a [`Collection`], holes included. Slots that are never
/// yielded are dropped along with the iterator.
pub struct IntoIter<T> {
    buf: Buffer<Slot<T>>,
    start: usize,
    end: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = Slot<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        // SAFETY: Slots in start..end are initialized, and start is moved past this one so it is
        // never read again.
        let slot = unsafe { self.buf.read(self.start) };
        self.start += 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        self.end -= 1;
        // SAFETY: The slot at the old end - 1 is initialized and is now outside start..end.
        Some(unsafe { self.buf.read(self.end) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: Slots in start..end are initialized and haven't been yielded. The Buffer frees
        // the memory afterwards.
        unsafe {
            let remaining =
                ptr::slice_from_raw_parts_mut(self.buf.slot_ptr(self.start), self.end - self.start);
            ptr::drop_in_place(remaining);
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = Slot<T>;

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        // The Collection must not run its own Drop, the slots now belong to the iterator.
        let mut col = ManuallyDrop::new(self);

        IntoIter {
            buf: mem::take(&mut col.buf),
            start: 0,
            end: col.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = Slot<&'a T>;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
