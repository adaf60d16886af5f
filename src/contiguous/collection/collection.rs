use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::ops::ControlFlow;
use std::ptr;

use super::{Elements, Iter, Slot};
use crate::contiguous::buffer::Buffer;
use crate::contiguous::error::{
    AlreadyHole, CapacityOverflow, GrowError, IndexOutOfBounds, PartialUnset, PushError,
    RangeOutOfBounds, UnsetError, UnsetMultiError,
};
use crate::util::result::ResultExtension;
use crate::util::trace::{debug_event, trace_event};

/// The capacity allocated by the first insertion into an empty Collection.
pub const INITIAL_CAP: usize = 4;

/// The factor applied to the capacity each time a full Collection grows.
pub const GROWTH_FACTOR: usize = 2;

/// A resizable contiguous collection of element references, which can leave holes behind when
/// elements are unset and close them again later with [`compact`](Collection::compact).
///
/// Elements are usually references or other handles (`&T`, [`Box<T>`], [`Rc<T>`](std::rc::Rc))
/// to values owned elsewhere. The Collection only ever moves them around. Anything that removes or
/// overwrites elements comes in two flavours: a plain one that drops what it removes (a no-op for
/// borrowed elements) and a `_with` variant that hands each removed [`Slot`] to a destructor
/// instead.
///
/// The capacity is always 0 or [`INITIAL_CAP`] multiplied by a power of [`GROWTH_FACTOR`]. It only
/// changes when an insertion finds the Collection full and it never shrinks.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The length of the Collection.
/// - `m`: The number of slots in the affected range.
///
/// | Method | Complexity |
/// |-|-|
/// | `get` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `pop` | `O(1)` |
/// | `unshift` | `O(n)` |
/// | `shift` | `O(n)` |
/// | `unset` | `O(1)` |
/// | `unset_multi` | `O(m)` |
/// | `reset` | `O(n)` |
/// | `compact` | `O(n)` |
/// | `walk` | `O(n)` |
/// | `sort` | `O(n log n)` |
/// | `find` | `O(log n)` |
///
/// \* If the Collection is full, `push` has to move every element into a larger allocation.
pub struct Collection<T> {
    pub(crate) buf: Buffer<Slot<T>>,
    pub(crate) len: usize,
}

impl<T> Collection<T> {
    /// Creates a new Collection with length and capacity 0. Memory is only allocated on the first
    /// insertion.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Collection;
    /// let col: Collection<&str> = Collection::new();
    /// assert_eq!(col.len(), 0);
    /// assert_eq!(col.cap(), 0);
    /// ```
    pub const fn new() -> Collection<T> {
        Collection {
            buf: Buffer::new(),
            len: 0,
        }
    }

    /// Returns the number of slots in use, holes included.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the Collection has no slots in use. A Collection holding only holes isn't
    /// empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots.
    pub const fn cap(&self) -> usize {
        self.buf.size()
    }

    /// Returns the number of holes within the length of the Collection.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Collection;
    /// let mut col: Collection<_> = ["a", "b", "c"].into_iter().collect();
    /// col.unset(1).unwrap();
    /// assert_eq!(col.holes(), 1);
    /// assert_eq!(col.len(), 3);
    /// ```
    pub fn holes(&self) -> usize {
        self.as_slots().iter().filter(|slot| slot.is_hole()).count()
    }

    /// Returns every slot in use as a slice.
    pub const fn as_slots(&self) -> &[Slot<T>] {
        // SAFETY: All slots below len are initialized and len never exceeds the Buffer's size.
        unsafe { self.buf.as_slice(self.len) }
    }

    pub(crate) const fn as_slots_mut(&mut self) -> &mut [Slot<T>] {
        // SAFETY: All slots below len are initialized and len never exceeds the Buffer's size.
        unsafe { self.buf.as_mut_slice(self.len) }
    }

    /// Returns the slot at `index`, or `None` if `index` is past the length. Unlike
    /// [`get`](Collection::get), this tells a hole apart from unused capacity.
    pub fn slot(&self, index: usize) -> Option<Slot<&T>> {
        self.as_slots().get(index).map(Slot::as_ref)
    }

    /// Returns a reference to the element at `index`, or `None` if the slot is a hole or past the
    /// length.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slot(index)?.into_option()
    }

    /// Returns a mutable reference to the element at `index`, or `None` if the slot is a hole or
    /// past the length.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_slots_mut().get_mut(index)?.as_mut().into_option()
    }

    /// Returns an iterator over every slot in use, holes included.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.as_slots())
    }

    /// Returns an iterator over the elements only, skipping holes.
    pub fn elements(&self) -> Elements<'_, T> {
        Elements::new(self.as_slots())
    }

    /// Appends `element` to the end of the Collection, growing it first if it is full.
    ///
    /// # Errors
    /// If the Collection needs to grow and can't, the element is handed back inside a
    /// [`PushError`] and the Collection is left unchanged.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Collection;
    /// let mut col = Collection::new();
    /// for word in ["one", "two", "three", "four", "five"] {
    ///     col.push(word).unwrap();
    /// }
    /// assert_eq!(col.len(), 5);
    /// assert_eq!(col.cap(), 8);
    /// ```
    pub fn push(&mut self, element: T) -> Result<(), PushError<T>> {
        if self.len == self.cap() {
            if let Err(error) = self.grow() {
                return Err(PushError { element, error });
            }
        }

        // SAFETY: There is at least one unused slot at len, because len < cap.
        unsafe { self.buf.write(self.len, Slot::Occupied(element)) };
        self.len += 1;
        Ok(())
    }

    /// Removes the last slot and returns it, or `None` if the Collection is empty. The returned
    /// slot may be a hole.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::{Collection, Slot};
    /// let mut col: Collection<_> = (0..3).collect();
    /// assert_eq!(col.pop(), Some(Slot::Occupied(2)));
    /// assert_eq!(col.pop(), Some(Slot::Occupied(1)));
    /// assert_eq!(col.pop(), Some(Slot::Occupied(0)));
    /// assert_eq!(col.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<Slot<T>> {
        if self.len == 0 {
            return None;
        }

        // Decrement len before reading, so the slot is no longer considered initialized.
        self.len -= 1;

        // SAFETY: The slot at the old len - 1 was initialized, and is now past len.
        Some(unsafe { self.buf.read(self.len) })
    }

    /// Inserts `element` at the front of the Collection, moving every slot one position towards
    /// the end.
    ///
    /// # Errors
    /// Fails in the same way as [`push`](Collection::push).
    pub fn unshift(&mut self, element: T) -> Result<(), PushError<T>> {
        if self.len == self.cap() {
            if let Err(error) = self.grow() {
                return Err(PushError { element, error });
            }
        }

        // SAFETY: len < cap, so both 0..len and 1..len + 1 are in bounds. The value at 0 has been
        // copied to 1 before being overwritten.
        unsafe {
            self.buf.shift(0, 1, self.len);
            self.buf.write(0, Slot::Occupied(element));
        }
        self.len += 1;
        Ok(())
    }

    /// Removes the first slot and returns it, moving the remaining slots one position towards the
    /// front. Returns `None` if the Collection is empty.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::{Collection, Slot};
    /// let mut col = Collection::new();
    /// col.push('b').unwrap();
    /// col.unshift('a').unwrap();
    /// assert_eq!(col.shift(), Some(Slot::Occupied('a')));
    /// assert_eq!(col.shift(), Some(Slot::Occupied('b')));
    /// assert_eq!(col.shift(), None);
    /// ```
    pub fn shift(&mut self) -> Option<Slot<T>> {
        if self.len == 0 {
            return None;
        }

        // SAFETY: len > 0, so the slot at 0 is initialized. It is moved out here and immediately
        // overwritten by the shift below (or falls past len when it was the only slot).
        let slot = unsafe { self.buf.read(0) };
        self.len -= 1;
        // SAFETY: 1..len + 1 and 0..len are both within the old length.
        unsafe { self.buf.shift(1, 0, self.len) };

        Some(slot)
    }

    /// Removes every slot, dropping the elements. The capacity is kept for reuse.
    pub fn reset(&mut self) {
        self.reset_with(drop)
    }

    /// Removes every slot, handing each one to `destructor` in ascending order, holes included.
    /// The capacity is kept for reuse.
    ///
    /// If `destructor` panics, the Collection is left empty and the slots it hadn't reached yet
    /// are leaked.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Collection;
    /// let mut col: Collection<_> = (0..6).collect();
    /// col.unset(2).unwrap();
    /// let cap = col.cap();
    ///
    /// let mut seen = Vec::new();
    /// col.reset_with(|slot| seen.push(slot.into_option()));
    ///
    /// assert_eq!(seen, [Some(0), Some(1), None, Some(3), Some(4), Some(5)]);
    /// assert_eq!(col.len(), 0);
    /// assert_eq!(col.cap(), cap);
    /// ```
    pub fn reset_with<F: FnMut(Slot<T>)>(&mut self, mut destructor: F) {
        let len = mem::replace(&mut self.len, 0);

        for index in 0..len {
            // SAFETY: index is below the old len, so the slot is initialized. len is already 0, so
            // each slot is read exactly once.
            destructor(unsafe { self.buf.read(index) });
        }

        trace_event!(cleared = len, cap = self.cap(), "collection reset");
    }

    /// Consumes the Collection, dropping its elements and releasing its storage. Equivalent to
    /// dropping it.
    pub fn destroy(self) {
        drop(self)
    }

    /// Consumes the Collection, handing every slot to `destructor` in ascending order (holes
    /// included) before releasing the storage.
    pub fn destroy_with<F: FnMut(Slot<T>)>(mut self, destructor: F) {
        self.reset_with(destructor);
    }

    /// Turns the slot at `index` into a hole, dropping the element it held. Neither the length
    /// nor any other slot changes.
    ///
    /// # Errors
    /// Fails without changing anything if `index` is past the length or the slot is already a
    /// hole.
    pub fn unset(&mut self, index: usize) -> Result<(), UnsetError> {
        self.take(index).map(drop)
    }

    /// Turns the slot at `index` into a hole, handing the element it held to `destructor` as
    /// [`Slot::Occupied`].
    ///
    /// # Errors
    /// Fails without changing anything (and without calling `destructor`) if `index` is past the
    /// length or the slot is already a hole.
    pub fn unset_with<F: FnOnce(Slot<T>)>(
        &mut self,
        index: usize,
        destructor: F,
    ) -> Result<(), UnsetError> {
        let element = self.take(index)?;
        destructor(Slot::Occupied(element));
        Ok(())
    }

    /// Turns the slot at `index` into a hole and returns the element it held, leaving the caller
    /// in charge of it.
    ///
    /// # Errors
    /// Fails without changing anything if `index` is past the length or the slot is already a
    /// hole.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Collection;
    /// let mut col: Collection<_> = ["a", "b"].into_iter().collect();
    /// assert_eq!(col.take(0), Ok("a"));
    /// assert!(col.take(0).unwrap_err().is_already_hole());
    /// assert!(col.take(2).unwrap_err().is_index_out_of_bounds());
    /// ```
    pub fn take(&mut self, index: usize) -> Result<T, UnsetError> {
        let len = self.len;
        let slot = self
            .as_slots_mut()
            .get_mut(index)
            .ok_or(IndexOutOfBounds { index, len })?;

        match slot.take() {
            Slot::Occupied(element) => Ok(element),
            Slot::Hole => Err(AlreadyHole { index }.into()),
        }
    }

    /// Unsets every slot in `start..start + count`, dropping the elements. See
    /// [`unset_multi_with`](Collection::unset_multi_with) for the failure semantics.
    ///
    /// # Errors
    /// See [`unset_multi_with`](Collection::unset_multi_with).
    pub fn unset_multi(&mut self, start: usize, count: usize) -> Result<(), UnsetMultiError> {
        self.unset_multi_with(start, count, drop)
    }

    /// Unsets every slot in `start..start + count` in ascending order, handing each element to
    /// `destructor`.
    ///
    /// This is best-effort rather than atomic. Every slot in the range is attempted even after
    /// one fails (because it was already a hole), and slots that were unset successfully stay
    /// unset when the call reports failure.
    ///
    /// # Errors
    /// Returns [`RangeOutOfBounds`] without changing anything if the range extends past the
    /// length, and [`PartialUnset`] if at least one slot in the range was already a hole.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Collection;
    /// # use slot_collection::contiguous::error::{PartialUnset, UnsetMultiError};
    /// let mut col: Collection<_> = (0..5).collect();
    /// col.unset(2).unwrap();
    ///
    /// let mut destroyed = Vec::new();
    /// let result = col.unset_multi_with(1, 3, |slot| destroyed.push(slot.unwrap()));
    ///
    /// assert_eq!(
    ///     result,
    ///     Err(UnsetMultiError::PartialUnset(PartialUnset { failed: 1, attempted: 3 }))
    /// );
    /// assert_eq!(destroyed, [1, 3]);
    /// assert_eq!(col.holes(), 3);
    /// ```
    pub fn unset_multi_with<F: FnMut(Slot<T>)>(
        &mut self,
        start: usize,
        count: usize,
        mut destructor: F,
    ) -> Result<(), UnsetMultiError> {
        let len = self.len;
        let end = start
            .checked_add(count)
            .filter(|&end| end <= len)
            .ok_or(RangeOutOfBounds { start, count, len })?;

        let mut failed = 0;
        for index in start..end {
            if self.unset_with(index, &mut destructor).is_err() {
                failed += 1;
            }
        }

        if failed == 0 {
            Ok(())
        } else {
            Err(PartialUnset { failed, attempted: count }.into())
        }
    }

    /// Removes every hole, moving the remaining elements towards the front without changing their
    /// relative order. Returns the number of holes removed, which is also the amount the length
    /// shrank by. The capacity is unchanged.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Collection;
    /// let mut col: Collection<_> = "abcde".chars().collect();
    /// col.unset_multi(1, 3).unwrap();
    ///
    /// assert_eq!(col.compact(), 3);
    /// assert_eq!(col.elements().collect::<String>(), "ae");
    /// assert_eq!(col.len(), 2);
    /// ```
    pub fn compact(&mut self) -> usize {
        let slots = self.as_slots_mut();

        // Occupied slots are swapped down to the write cursor, so holes collect at the end.
        let mut write = 0;
        for read in 0..slots.len() {
            if slots[read].is_occupied() {
                slots.swap(write, read);
                write += 1;
            }
        }

        // Everything from write to len is a hole, which holds nothing to drop.
        let removed = self.len - write;
        self.len = write;

        trace_event!(removed, len = self.len, "collection compacted");
        removed
    }

    /// Calls `visitor` with each slot and `context`, in ascending order, until it returns
    /// [`ControlFlow::Break`]. Returns the index at which the walk stopped, which is the length
    /// when `visitor` never breaks.
    ///
    /// # Examples
    /// ```
    /// # use std::ops::ControlFlow;
    /// # use slot_collection::contiguous::Collection;
    /// let col: Collection<u32> = (1..=10).collect();
    ///
    /// let mut sum = 0;
    /// let stopped = col.walk(&mut sum, |slot, sum| {
    ///     let value = *slot.unwrap();
    ///     if value > 4 {
    ///         return ControlFlow::Break(());
    ///     }
    ///     *sum += value;
    ///     ControlFlow::Continue(())
    /// });
    ///
    /// assert_eq!(stopped, 4);
    /// assert_eq!(sum, 1 + 2 + 3 + 4);
    /// ```
    pub fn walk<C, F>(&self, context: &mut C, mut visitor: F) -> usize
    where
        C: ?Sized,
        F: FnMut(Slot<&T>, &mut C) -> ControlFlow<()>,
    {
        for (index, slot) in self.iter().enumerate() {
            if visitor(slot, &mut *context).is_break() {
                return index;
            }
        }

        self.len
    }

    /// Sorts the slots in use with `comparator`. Holes are placed after every element. The sort
    /// isn't stable.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Collection;
    /// let mut col: Collection<_> = [3, 1, 4, 1, 5].into_iter().collect();
    /// col.unset(2).unwrap();
    /// col.sort(|a, b| a.cmp(b));
    ///
    /// assert_eq!(col.elements().copied().collect::<Vec<_>>(), [1, 1, 3, 5]);
    /// assert!(col.slot(4).unwrap().is_hole());
    /// ```
    pub fn sort<F>(&mut self, mut comparator: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.as_slots_mut().sort_unstable_by(|a, b| match (a, b) {
            (Slot::Occupied(a), Slot::Occupied(b)) => comparator(a, b),
            (Slot::Occupied(_), Slot::Hole) => Ordering::Less,
            (Slot::Hole, Slot::Occupied(_)) => Ordering::Greater,
            (Slot::Hole, Slot::Hole) => Ordering::Equal,
        });
    }

    /// Binary searches for an element that `comparator` considers equal to `key`, returning it or
    /// `None` if there is no match.
    ///
    /// The Collection must already be sorted in an order consistent with `comparator`, for example
    /// by calling [`sort`](Collection::sort) with a comparator over the same field. If it isn't,
    /// the result is unspecified (but never a dangling reference). When several elements match,
    /// any one of them may be returned.
    ///
    /// # Examples
    /// ```
    /// # use slot_collection::contiguous::Collection;
    /// let mut col: Collection<_> = [("jane", 27), ("john", 31), ("eve", 6)].into_iter().collect();
    /// col.sort(|a, b| a.0.cmp(b.0));
    ///
    /// assert_eq!(col.find("john", |key, person| key.cmp(person.0)), Some(&("john", 31)));
    /// assert_eq!(col.find("jim", |key, person| key.cmp(person.0)), None);
    /// ```
    pub fn find<K, F>(&self, key: &K, comparator: F) -> Option<&T>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> Ordering,
    {
        self.get(self.find_index(key, comparator)?)
    }

    /// Like [`find`](Collection::find), but returns the index of the match.
    pub fn find_index<K, F>(&self, key: &K, mut comparator: F) -> Option<usize>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> Ordering,
    {
        self.as_slots()
            .binary_search_by(|slot| match slot {
                // binary_search_by wants the ordering of the probe relative to the key.
                Slot::Occupied(element) => comparator(key, element).reverse(),
                Slot::Hole => Ordering::Greater,
            })
            .ok()
    }

    /// Grows the Buffer so that at least one more slot fits: to [`INITIAL_CAP`] from empty,
    /// otherwise by [`GROWTH_FACTOR`].
    ///
    /// # Errors
    /// Returns the cause if the new capacity can't be represented or allocated. The Collection is
    /// unchanged in that case.
    pub(crate) fn grow(&mut self) -> Result<(), GrowError> {
        let old_cap = self.cap();
        let new_cap = match old_cap {
            0 => INITIAL_CAP,
            _ => old_cap.checked_mul(GROWTH_FACTOR).ok_or(CapacityOverflow {
                requested: old_cap.saturating_mul(GROWTH_FACTOR),
            })?,
        };

        // SAFETY: The first len slots are initialized and len <= old_cap < new_cap.
        match unsafe { self.buf.try_resize(new_cap, self.len) } {
            Ok(()) => {
                trace_event!(old_cap, new_cap, "collection grew");
                Ok(())
            },
            Err(error) => {
                debug_event!(requested = new_cap, %error, "collection failed to grow");
                Err(error)
            },
        }
    }
}

impl<T> Extend<T> for Collection<T> {
    /// # Panics
    /// Panics if the Collection fails to grow.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.push(element).map_err(|e| e.error).throw();
        }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut col = Collection::new();
        col.extend(iter);
        col
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Collection<T> {
    fn drop(&mut self) {
        // SAFETY: Every slot below len is initialized and dropped exactly once here. The Buffer
        // releases the memory itself afterwards.
        unsafe { ptr::drop_in_place(self.as_slots_mut()) }
    }
}

impl<T: Clone> Clone for Collection<T> {
    /// Clones every slot, holes included, into a Collection with the same capacity.
    fn clone(&self) -> Self {
        let mut col = Collection::new();
        // SAFETY: Nothing is kept from the empty Buffer.
        unsafe { col.buf.try_resize(self.cap(), 0) }.throw();

        for slot in self.as_slots() {
            // SAFETY: col has the same capacity as self, so there is room for every slot.
            unsafe { col.buf.write(col.len, slot.clone()) };
            col.len += 1;
        }

        col
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slots() == other.as_slots()
    }
}

impl<T: Eq> Eq for Collection<T> {}

impl<T: Debug> Debug for Collection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("slots", &self.as_slots())
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}
