//! Uninitialised, exactly-sized heap storage.
//!
//! [`RawBlock`] owns memory for `capacity` values of `T` but never constructs
//! or drops them on its own. The owning collection decides which slots are
//! live and uses the placement primitives below to move values in and out.
//! Dropping a block only returns the memory to the allocator.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};
use std::alloc;

use tracing::debug;

use crate::error::{Error, Result};

/// Heap memory for `capacity` values of `T`, none of them tracked.
pub struct RawBlock<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _owns: PhantomData<T>,
}

impl<T> RawBlock<T> {
    /// A block with no capacity that owns no memory.
    #[inline(always)]
    pub const fn dangling() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Obtains memory for `capacity` elements without constructing any.
    ///
    /// Zero capacity and zero-sized `T` never touch the allocator.
    pub fn allocate(capacity: usize) -> Result<Self> {
        let layout = Layout::array::<T>(capacity).map_err(|_| Error::OutOfMemory { capacity })?;
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let raw = unsafe { alloc::alloc(layout) } as *mut T;
            match NonNull::new(raw) {
                Some(ptr) => ptr,
                None => {
                    debug!(capacity, bytes = layout.size(), "block allocation failed");
                    return Err(Error::OutOfMemory { capacity });
                }
            }
        };
        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    /// Infallible counterpart of [`allocate`](RawBlock::allocate) for trait
    /// impls that cannot return an error.
    ///
    /// # Panics
    /// Panics with "capacity overflow" when the byte size does not fit in
    /// `isize`; aborts through [`std::alloc::handle_alloc_error`] when the
    /// allocator refuses.
    pub fn allocate_or_abort(capacity: usize) -> Self {
        match Layout::array::<T>(capacity) {
            Ok(layout) => match Self::allocate(capacity) {
                Ok(block) => block,
                Err(_) => alloc::handle_alloc_error(layout),
            },
            Err(_) => panic!("capacity overflow"),
        }
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Raw pointer to `slot`. Computing the pointer is safe; using it is not.
    ///
    /// # Safety
    /// `slot <= capacity`.
    #[inline(always)]
    pub unsafe fn slot_ptr(&self, slot: usize) -> *mut T {
        debug_assert!(slot <= self.capacity);
        unsafe { self.ptr.as_ptr().add(slot) }
    }

    /// Constructs `value` in `slot`.
    ///
    /// # Safety
    /// `slot < capacity` and the slot is currently vacant; an occupied slot
    /// would be overwritten without dropping.
    #[inline(always)]
    pub unsafe fn write(&mut self, slot: usize, value: T) {
        debug_assert!(slot < self.capacity);
        unsafe { ptr::write(self.slot_ptr(slot), value) }
    }

    /// Moves the value out of `slot`, leaving it vacant.
    ///
    /// # Safety
    /// `slot < capacity` and the slot holds a live value.
    #[inline(always)]
    pub unsafe fn read(&mut self, slot: usize) -> T {
        debug_assert!(slot < self.capacity);
        unsafe { ptr::read(self.slot_ptr(slot)) }
    }

    /// Drops `count` live values starting at `start`.
    ///
    /// # Safety
    /// `start + count <= capacity` and every slot in the range is live.
    pub unsafe fn drop_range(&mut self, start: usize, count: usize) {
        debug_assert!(start + count <= self.capacity);
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.slot_ptr(start), count));
        }
    }

    /// Bitwise-moves `count` values from `src[src_start..]` into
    /// `self[dst_start..]`. The source slots are vacant afterwards.
    ///
    /// # Safety
    /// Both ranges are in bounds, the source range is live and the
    /// destination range is vacant.
    pub unsafe fn relocate_from(
        &mut self,
        src: &mut RawBlock<T>,
        src_start: usize,
        dst_start: usize,
        count: usize,
    ) {
        debug_assert!(src_start + count <= src.capacity);
        debug_assert!(dst_start + count <= self.capacity);
        unsafe {
            ptr::copy_nonoverlapping(src.slot_ptr(src_start), self.slot_ptr(dst_start), count);
        }
    }

    /// Shared view of `count` live values starting at `start`.
    ///
    /// # Safety
    /// Same as [`drop_range`](RawBlock::drop_range).
    #[inline(always)]
    pub unsafe fn slice(&self, start: usize, count: usize) -> &[T] {
        unsafe { core::slice::from_raw_parts(self.slot_ptr(start), count) }
    }

    /// Exclusive view of `count` live values starting at `start`.
    ///
    /// # Safety
    /// Same as [`drop_range`](RawBlock::drop_range).
    #[inline(always)]
    pub unsafe fn slice_mut(&mut self, start: usize, count: usize) -> &mut [T] {
        unsafe { core::slice::from_raw_parts_mut(self.slot_ptr(start), count) }
    }
}

impl<T> Drop for RawBlock<T> {
    fn drop(&mut self) {
        if let Ok(layout) = Layout::array::<T>(self.capacity) {
            if layout.size() != 0 {
                unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) }
            }
        }
    }
}

unsafe impl<T: Send> Send for RawBlock<T> {}
unsafe impl<T: Sync> Sync for RawBlock<T> {}
