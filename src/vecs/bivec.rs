//! Contiguous vector with amortised O(1) pushes and pops at both ends.
//!
//! # Layout
//! A [`BiVec`] owns exactly one [`RawBlock`] and keeps its live elements in
//! the window `[front, front + len)` of that block. Slots before the window
//! are *front spare*, slots after it are *back spare*.
//!
//! ```text
//!  block:  [ . . . | a b c d | . . . . . ]
//!            front    live      back spare
//! ```
//!
//! # Growth
//! Each end only ever grows its own spare. When the back runs out the block
//! doubles and the live window keeps its front offset, so the whole added
//! capacity lands behind it. When the front runs out the block doubles and
//! the window is shifted right by the added capacity, so the whole addition
//! lands in front of it. Pushing on one end never pays for spare on the
//! other.
//!
//! # Ledger
//! Every push, pop and assignment is recorded in a [`MutationLedger`]. The
//! cursors in [`crate::vecs::cursor`] compare their snapshot of it against
//! the live one to decide whether, and how badly, they have gone stale.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem;
use core::ops::{Index, IndexMut};
use core::ptr;
use core::slice;
use std::sync::atomic::{self, AtomicU64};

use tracing::trace;

use crate::config::BiVecConfig;
use crate::error::{Error, Result};
use crate::utils::raw_block::RawBlock;
use crate::vecs::cursor::{ConstCursor, Cursor, MutCursor};
use crate::vecs::ledger::{Mutation, MutationLedger};

/// Process-unique identity of a [`BiVec`]; cursors use it to recognise their
/// parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceId(u64);

impl SequenceId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// A growable, contiguous, double-ended vector.
///
/// ```rust
/// use bivec::BiVec;
///
/// let mut v: BiVec<i32> = BiVec::new();
/// v.push_back(2).unwrap();
/// v.push_front(1).unwrap();
/// v.push_back(3).unwrap();
/// assert_eq!(v.as_slice(), &[1, 2, 3]);
/// assert_eq!(v.pop_front(), Ok(1));
/// assert_eq!(*v.get(1).unwrap(), 3);
/// ```
pub struct BiVec<T> {
    block: RawBlock<T>,
    front: usize,
    len: usize,
    min_capacity: usize,
    ledger: MutationLedger,
    id: SequenceId,
}

impl<T> BiVec<T> {
    /// Creates an empty sequence with the default minimum capacity.
    pub fn new() -> Self {
        Self::with_config(BiVecConfig::default())
    }

    /// Creates an empty sequence whose initial block (and the floor used when
    /// a moved-from shell grows again) is `config.min_capacity()`.
    pub fn with_config(config: BiVecConfig) -> Self {
        let min_capacity = config.min_capacity();
        Self::from_parts(RawBlock::allocate_or_abort(min_capacity), 0, 0, min_capacity)
    }

    /// Creates an empty sequence with exactly `capacity` slots, all of them
    /// back spare. Zero falls back to the default minimum.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_config(capacity, BiVecConfig::default())
    }

    /// Creates an empty sequence with exactly `capacity` slots and an
    /// injected minimum. Zero falls back to `config.min_capacity()`.
    pub fn with_capacity_and_config(capacity: usize, config: BiVecConfig) -> Self {
        let capacity = Self::initial_capacity(capacity, &config);
        Self::from_parts(RawBlock::allocate_or_abort(capacity), 0, 0, config.min_capacity())
    }

    /// Fallible counterpart of [`with_capacity`](BiVec::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let config = BiVecConfig::default();
        let capacity = Self::initial_capacity(capacity, &config);
        Ok(Self::from_parts(RawBlock::allocate(capacity)?, 0, 0, config.min_capacity()))
    }

    /// Creates a sequence holding `len` default values in a block of exactly
    /// `len` slots.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        if len == 0 {
            return Self::new();
        }
        let mut out = Self::from_parts(
            RawBlock::allocate_or_abort(len),
            0,
            0,
            BiVecConfig::default().min_capacity(),
        );
        while out.len < len {
            unsafe { out.block.write(out.len, T::default()) };
            out.len += 1;
        }
        out
    }

    /// Clones `items` into a block of exactly `items.len()` slots.
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        let mut out = Self::with_capacity(items.len());
        out.fill_from(items);
        out
    }

    #[inline(always)]
    fn initial_capacity(capacity: usize, config: &BiVecConfig) -> usize {
        if capacity == 0 {
            config.min_capacity()
        } else {
            capacity
        }
    }

    fn from_parts(block: RawBlock<T>, front: usize, len: usize, min_capacity: usize) -> Self {
        debug_assert!(front + len <= block.capacity());
        Self {
            block,
            front,
            len,
            min_capacity,
            ledger: MutationLedger::new(),
            id: SequenceId::next(),
        }
    }

    /// Clones `items` behind the live window. Capacity must already be there.
    /// A panicking `clone` leaves `self` holding what was written so far.
    fn fill_from(&mut self, items: &[T])
    where
        T: Clone,
    {
        debug_assert!(self.back_spare() >= items.len());
        for item in items {
            unsafe { self.block.write(self.front + self.len, item.clone()) };
            self.len += 1;
        }
    }

    // ─── observers ───────────────────────────────────────────────────────────

    /// Number of live elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slots in the current block.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.block.capacity()
    }

    /// Vacant slots before the first element.
    #[inline(always)]
    pub fn front_spare(&self) -> usize {
        self.front
    }

    /// Vacant slots after the last element.
    #[inline(always)]
    pub fn back_spare(&self) -> usize {
        self.block.capacity() - self.front - self.len
    }

    /// Floor used when a zero-capacity shell grows.
    #[inline(always)]
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Number of structural mutations so far.
    #[inline(always)]
    pub fn generation(&self) -> u64 {
        self.ledger.generation()
    }

    /// Number of times the backing block was replaced.
    #[inline(always)]
    pub fn reallocations(&self) -> u64 {
        self.ledger.reallocations()
    }

    #[inline(always)]
    pub(crate) fn id(&self) -> SequenceId {
        self.id
    }

    #[inline(always)]
    pub(crate) fn ledger(&self) -> &MutationLedger {
        &self.ledger
    }

    // ─── element access ──────────────────────────────────────────────────────

    /// Bounds-checked access to logical index `index`.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Bounds-checked exclusive access to logical index `index`.
    #[inline(always)]
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    #[inline(always)]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    #[inline(always)]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { self.block.slice(self.front, self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { self.block.slice_mut(self.front, self.len) }
    }

    /// Borrow-checked iteration; use cursors when you need to survive (and
    /// diagnose) mutation in between.
    #[inline(always)]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    // ─── cursors ─────────────────────────────────────────────────────────────

    /// Read-only cursor at the first element.
    pub fn begin(&self) -> ConstCursor<T> {
        Cursor::capture(self, 0)
    }

    /// Read-only cursor one past the last element.
    pub fn end(&self) -> ConstCursor<T> {
        Cursor::capture(self, self.len as isize)
    }

    /// Read-write cursor at the first element.
    pub fn begin_mut(&mut self) -> MutCursor<T> {
        Cursor::capture(self, 0)
    }

    /// Read-write cursor one past the last element.
    pub fn end_mut(&mut self) -> MutCursor<T> {
        Cursor::capture(self, self.len as isize)
    }

    // ─── push / pop ──────────────────────────────────────────────────────────

    /// Appends `value`, doubling the block first if the back spare is used up.
    ///
    /// On `OutOfMemory` the sequence is unchanged and `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        let mutation = if self.front + self.len == self.block.capacity() {
            self.grow_back()?;
            Mutation::Relocate
        } else {
            Mutation::Reshape
        };
        unsafe { self.block.write(self.front + self.len, value) };
        self.len += 1;
        self.ledger.record(mutation);
        Ok(())
    }

    /// Prepends `value`, doubling the block first if the front spare is used
    /// up.
    ///
    /// On `OutOfMemory` the sequence is unchanged and `value` is dropped.
    pub fn push_front(&mut self, value: T) -> Result<()> {
        let mutation = if self.front == 0 {
            self.grow_front()?;
            Mutation::Relocate
        } else {
            Mutation::Reshape
        };
        self.front -= 1;
        unsafe { self.block.write(self.front, value) };
        self.len += 1;
        self.ledger.record(mutation);
        Ok(())
    }

    /// Removes and returns the last element. Never shrinks the block.
    pub fn pop_back(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(Error::EmptyContainer);
        }
        self.len -= 1;
        let value = unsafe { self.block.read(self.front + self.len) };
        self.ledger.record(Mutation::Reshape);
        Ok(value)
    }

    /// Removes and returns the first element. The vacated slot becomes front
    /// spare.
    pub fn pop_front(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(Error::EmptyContainer);
        }
        let value = unsafe { self.block.read(self.front) };
        self.front += 1;
        self.len -= 1;
        self.ledger.record(Mutation::Reshape);
        Ok(value)
    }

    /// Drops every element, keeping the block and its spare layout.
    pub fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        let len = mem::replace(&mut self.len, 0);
        self.ledger.record(Mutation::Reshape);
        unsafe { self.block.drop_range(self.front, len) };
    }

    // ─── growth ──────────────────────────────────────────────────────────────

    fn grown_capacity(&self) -> Result<usize> {
        doubled_capacity(self.block.capacity(), self.min_capacity)
    }

    /// Cold path: doubles the block, keeping the front offset.
    #[inline(never)]
    fn grow_back(&mut self) -> Result<()> {
        let old_capacity = self.block.capacity();
        let new_capacity = self.grown_capacity()?;
        let mut block = RawBlock::allocate(new_capacity)?;
        unsafe { block.relocate_from(&mut self.block, self.front, self.front, self.len) };
        self.block = block;
        trace!(end = "back", old_capacity, new_capacity, len = self.len, "reallocated");
        Ok(())
    }

    /// Cold path: doubles the block, shifting the live window right by the
    /// old capacity (by `min_capacity` for an empty shell).
    #[inline(never)]
    fn grow_front(&mut self) -> Result<()> {
        let old_capacity = self.block.capacity();
        let new_capacity = self.grown_capacity()?;
        let new_front = self.front + (new_capacity - old_capacity);
        let mut block = RawBlock::allocate(new_capacity)?;
        unsafe { block.relocate_from(&mut self.block, self.front, new_front, self.len) };
        self.block = block;
        self.front = new_front;
        trace!(end = "front", old_capacity, new_capacity, len = self.len, "reallocated");
        Ok(())
    }

    // ─── copy / move ─────────────────────────────────────────────────────────

    /// Deep copy into a block with the same capacity and front spare.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        Ok(self.clone_into_block(RawBlock::allocate(self.block.capacity())?))
    }

    fn clone_into_block(&self, block: RawBlock<T>) -> Self
    where
        T: Clone,
    {
        let mut out = Self::from_parts(block, self.front, 0, self.min_capacity);
        out.fill_from(self.as_slice());
        out
    }

    fn swap_storage(&mut self, other: &mut Self) {
        mem::swap(&mut self.block, &mut other.block);
        mem::swap(&mut self.front, &mut other.front);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves the contents out into a new sequence with its own identity and
    /// a fresh ledger. `self` is left as an empty shell that owns no memory
    /// and grows back to `min_capacity` on the next push.
    ///
    /// Cursors taken from `self` before the call report
    /// [`Severity::Moderate`](crate::Severity::Moderate).
    pub fn take(&mut self) -> Self {
        let mut out = Self::from_parts(RawBlock::dangling(), 0, 0, self.min_capacity);
        self.swap_storage(&mut out);
        self.ledger.record(Mutation::Relocate);
        trace!(len = out.len, capacity = out.capacity(), "moved out");
        out
    }

    /// Move assignment: drops the current contents and takes over
    /// `source`'s block. Both sequences record a reallocation, and `source`
    /// becomes an empty shell.
    pub fn move_from(&mut self, source: &mut Self) {
        let mut incoming = source.take();
        self.swap_storage(&mut incoming);
        self.ledger.record(Mutation::Relocate);
        drop(incoming);
    }
}

/// Capacity after one growth step: strict doubling, except that an empty
/// shell restarts at `min_capacity`.
fn doubled_capacity(old_capacity: usize, min_capacity: usize) -> Result<usize> {
    if old_capacity == 0 {
        return Ok(min_capacity);
    }
    old_capacity.checked_mul(2).ok_or(Error::OutOfMemory {
        capacity: usize::MAX,
    })
}

impl<T> Drop for BiVec<T> {
    fn drop(&mut self) {
        unsafe { self.block.drop_range(self.front, self.len) };
    }
}

impl<T: Clone> Clone for BiVec<T> {
    fn clone(&self) -> Self {
        self.clone_into_block(RawBlock::allocate_or_abort(self.block.capacity()))
    }

    /// Copy assignment. Keeps `self`'s identity, so its outstanding cursors
    /// see a reallocation.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone_into_block(RawBlock::allocate_or_abort(source.block.capacity()));
        self.swap_storage(&mut copy);
        self.ledger.record(Mutation::Relocate);
        drop(copy);
    }
}

impl<T> Default for BiVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for BiVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Index<usize> for BiVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for BiVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: PartialEq> PartialEq for BiVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for BiVec<T> {}

impl<T: PartialEq> PartialEq<[T]> for BiVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for BiVec<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd> PartialOrd for BiVec<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for BiVec<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for BiVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> Extend<T> for BiVec<T> {
    /// # Panics
    /// Panics if growing the block fails.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            if let Err(err) = self.push_back(item) {
                panic!("BiVec::extend: {err}");
            }
        }
    }
}

impl<T> FromIterator<T> for BiVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut out = Self::with_capacity(iter.size_hint().0);
        out.extend(iter);
        out
    }
}

impl<T> From<Vec<T>> for BiVec<T> {
    fn from(mut items: Vec<T>) -> Self {
        let count = items.len();
        let mut out = Self::with_capacity(count);
        unsafe {
            ptr::copy_nonoverlapping(items.as_ptr(), out.block.slot_ptr(0), count);
            items.set_len(0);
        }
        out.len = count;
        out
    }
}

impl<T: Clone> From<&[T]> for BiVec<T> {
    fn from(items: &[T]) -> Self {
        Self::from_slice(items)
    }
}

impl<'a, T> IntoIterator for &'a BiVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut BiVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Owning iterator returned by `BiVec::into_iter`.
pub struct IntoIter<T> {
    inner: BiVec<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.len, Some(self.inner.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for BiVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { inner: self }
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for BiVec<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for BiVec<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        <Vec<T> as serde::Deserialize>::deserialize(deserializer).map(BiVec::from)
    }
}
