use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use crate::contiguous::error::{AllocationFailure, CapacityOverflow, GrowError};

/// A fixed-size run of uninitialized slots for values of type `T`, allocated in the global
/// allocator. The Buffer never reads, writes or drops its contents by itself: tracking which slots
/// are initialized is left to the owner, which is why most of the methods here are unsafe.
///
/// Unlike [`Vec`], resizing never goes through [`alloc::realloc`]. A resize allocates a fresh block,
/// moves the initialized prefix across and only then releases the old block, so a failed
/// allocation leaves the Buffer exactly as it was.
pub(crate) struct Buffer<T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) size: usize,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> Buffer<T> {
    /// Creates a new Buffer with size 0. No memory is allocated.
    pub const fn new() -> Buffer<T> {
        Buffer {
            ptr: NonNull::dangling(),
            size: 0,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of slots in the Buffer.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Resizes the Buffer to `new_size` slots, moving the first `keep` slots into the new block.
    ///
    /// # Errors
    /// Returns [`CapacityOverflow`] if the new layout would exceed [`isize::MAX`] bytes and
    /// [`AllocationFailure`] if the allocator refuses the request. In both cases the Buffer, its
    /// pointer and its contents are left untouched.
    ///
    /// # Safety
    /// The first `keep` slots must be initialized and `keep` must be no greater than `new_size`.
    /// Slots in `keep..self.size` are abandoned without being dropped.
    pub unsafe fn try_resize(&mut self, new_size: usize, keep: usize) -> Result<(), GrowError> {
        debug_assert!(keep <= new_size && keep <= self.size);

        if new_size == self.size {
            return Ok(());
        }

        let new_layout = Buffer::<T>::make_layout(new_size)?;
        let new_ptr = Buffer::<T>::make_ptr(new_layout)?;

        // SAFETY: Both blocks are valid for at least keep slots, properly aligned and come from
        // distinct allocations (or are dangling for zero-sized layouts, where the copy is a no-op).
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr().cast_const(), new_ptr.as_ptr(), keep);
        }

        self.dealloc();

        self.ptr = new_ptr;
        self.size = new_size;
        Ok(())
    }

    /// Returns a raw pointer to the slot at `index`.
    ///
    /// # Safety
    /// `index` must be no greater than the size of the Buffer.
    pub const unsafe fn slot_ptr(&self, index: usize) -> *mut T {
        // SAFETY: The caller guarantees that index is within (or one past) the allocation.
        unsafe { self.ptr.add(index).as_ptr() }
    }

    /// Moves the value out of the slot at `index`, leaving the slot logically uninitialized.
    ///
    /// # Safety
    /// The slot at `index` must be in bounds and initialized.
    pub const unsafe fn read(&self, index: usize) -> T {
        // SAFETY: Upheld by the caller.
        unsafe { self.slot_ptr(index).read() }
    }

    /// Writes `value` into the slot at `index` without dropping its previous contents.
    ///
    /// # Safety
    /// `index` must be in bounds. Any value previously in the slot is leaked.
    pub const unsafe fn write(&mut self, index: usize, value: T) {
        // SAFETY: Upheld by the caller.
        unsafe { self.slot_ptr(index).write(value) }
    }

    /// Copies `count` slots starting at `src` to start at `dst`. The ranges may overlap.
    ///
    /// # Safety
    /// Both `src..src + count` and `dst..dst + count` must be in bounds. Afterwards, slots in the
    /// source range that aren't covered by the destination range are logically uninitialized.
    pub const unsafe fn shift(&mut self, src: usize, dst: usize, count: usize) {
        // SAFETY: Upheld by the caller. ptr::copy handles overlapping ranges.
        unsafe { ptr::copy(self.slot_ptr(src).cast_const(), self.slot_ptr(dst), count) }
    }

    /// Views the first `len` slots as a slice.
    ///
    /// # Safety
    /// The first `len` slots must be initialized and `len` must not exceed the size of the Buffer.
    pub const unsafe fn as_slice(&self, len: usize) -> &[T] {
        // SAFETY: Upheld by the caller. The pointer is nonnull and aligned, including when dangling.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast_const(), len) }
    }

    /// Views the first `len` slots as a mutable slice.
    ///
    /// # Safety
    /// The first `len` slots must be initialized and `len` must not exceed the size of the Buffer.
    pub const unsafe fn as_mut_slice(&mut self, len: usize) -> &mut [T] {
        // SAFETY: Upheld by the caller. The pointer is nonnull and aligned, including when dangling.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), len) }
    }

    /// A helper function to create a [`Layout`] for `size` slots of `T`.
    pub(crate) fn make_layout(size: usize) -> Result<Layout, CapacityOverflow> {
        Layout::array::<T>(size).map_err(|_| CapacityOverflow { requested: size })
    }

    /// A helper function to allocate a block for the provided [`Layout`]. Returns a dangling
    /// pointer for a zero-sized layout, which covers both zero sizes and zero-sized types.
    ///
    /// Unlike [`alloc::handle_alloc_error`], a null return from the allocator is reported to the
    /// caller instead of aborting.
    pub(crate) fn make_ptr(layout: Layout) -> Result<NonNull<T>, AllocationFailure> {
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: Zero-sized layouts have been guarded against.
        NonNull::new(unsafe { alloc::alloc(layout) }.cast()).ok_or(AllocationFailure {
            bytes: layout.size(),
        })
    }

    /// Releases the current block, if any, without touching its contents. The Buffer must not be
    /// used again until its pointer and size are replaced.
    fn dealloc(&mut self) {
        let bytes = self.size * size_of::<T>();

        if bytes != 0 {
            // SAFETY: This exact layout was validated by make_layout when the block was allocated,
            // so it has a valid size and alignment for T.
            let layout = unsafe { Layout::from_size_align_unchecked(bytes, align_of::<T>()) };

            // SAFETY: ptr was allocated in the global allocator with this layout. Zero-sized
            // layouts are never allocated and are guarded against here.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Buffer<T> {
    fn drop(&mut self) {
        // Contents are the owner's responsibility, only the memory is released here.
        self.dealloc();
    }
}

// SAFETY: A Buffer uniquely owns its allocation, so it is Send when the values it may hold are.
unsafe impl<T: Send> Send for Buffer<T> {}
// SAFETY: Buffer offers no interior mutability, all mutation requires &mut self.
unsafe impl<T: Sync> Sync for Buffer<T> {}
