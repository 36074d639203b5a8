//! Random-access cursors that diagnose staleness instead of dangling.
//!
//! A [`Cursor`] does not borrow its [`BiVec`]. It remembers which sequence
//! created it, a snapshot of that sequence's [`MutationLedger`], and a
//! position relative to the first live element. Every operation takes the
//! sequence as an argument and re-validates first:
//!
//! | Situation since capture | Result |
//! |---|---|
//! | nothing mutated | operation proceeds |
//! | block replaced | [`Severity::Moderate`] |
//! | position fell out of a range it was inside | [`Severity::Severe`] |
//! | anything else | [`Severity::Mild`] |
//!
//! Arithmetic moves the position and re-evaluates whether it is inside the
//! live range, but never refreshes the snapshot: once stale, a cursor stays
//! stale. Take a new one from [`BiVec::begin`] or [`BiVec::end`].
//!
//! Two flavours exist: [`ConstCursor`] reads, [`MutCursor`] can also hand
//! out `&mut T` given `&mut BiVec<T>`.
//!
//! ```rust
//! use bivec::{BiVec, Error, Severity};
//!
//! let mut v: BiVec<i32> = (0..4).collect();
//! let last = v.begin().offset(&v, 3).unwrap();
//! assert_eq!(last.get(&v), Ok(&3));
//!
//! v.pop_back().unwrap();
//! assert_eq!(last.get(&v), Err(Error::InvalidCursor { severity: Severity::Severe }));
//! ```
//!
//! [`MutationLedger`]: crate::vecs::ledger::MutationLedger
//! [`Severity::Moderate`]: crate::Severity::Moderate
//! [`Severity::Severe`]: crate::Severity::Severe
//! [`Severity::Mild`]: crate::Severity::Mild

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;

use crate::error::{Error, Result};
use crate::vecs::bivec::{BiVec, SequenceId};
use crate::vecs::ledger::{LedgerSnapshot, in_range};

mod sealed {
    pub trait Sealed {}
}

/// Access level of a cursor. Sealed; see [`ReadOnly`] and [`ReadWrite`].
pub trait Access: sealed::Sealed {}

/// Marker for cursors that only read.
#[derive(Debug)]
pub enum ReadOnly {}

/// Marker for cursors that may also write through the parent.
#[derive(Debug)]
pub enum ReadWrite {}

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for ReadWrite {}
impl Access for ReadOnly {}
impl Access for ReadWrite {}

/// Read-only cursor, returned by [`BiVec::begin`] and [`BiVec::end`].
pub type ConstCursor<T> = Cursor<T, ReadOnly>;

/// Read-write cursor, returned by [`BiVec::begin_mut`] and [`BiVec::end_mut`].
pub type MutCursor<T> = Cursor<T, ReadWrite>;

/// Detached position into a [`BiVec`], checked against its parent on every use.
pub struct Cursor<T, A: Access = ReadOnly> {
    owner: SequenceId,
    snapshot: LedgerSnapshot,
    /// Front spare of the parent at capture; `origin + index` is the block slot.
    origin: usize,
    index: isize,
    /// Whether `index` was inside the live range the last time it was set.
    in_bounds: bool,
    _marker: PhantomData<(fn() -> T, A)>,
}

impl<T, A: Access> Cursor<T, A> {
    pub(crate) fn capture(seq: &BiVec<T>, index: isize) -> Self {
        Self {
            owner: seq.id(),
            snapshot: seq.ledger().snapshot(),
            origin: seq.front_spare(),
            index,
            in_bounds: in_range(index, seq.len()),
            _marker: PhantomData,
        }
    }

    /// Position relative to the first live element at capture time. Does not
    /// validate.
    #[inline(always)]
    pub fn position(&self) -> isize {
        self.index
    }

    #[inline(always)]
    fn slot(&self) -> isize {
        (self.origin as isize).saturating_add(self.index)
    }

    /// Validates the cursor against `seq`, classifying any staleness.
    pub fn check(&self, seq: &BiVec<T>) -> Result<()> {
        if self.owner != seq.id() {
            return Err(Error::ForeignCursor);
        }
        match seq
            .ledger()
            .classify(&self.snapshot, self.index, self.in_bounds, seq.len())
        {
            None => Ok(()),
            Some(severity) => Err(Error::InvalidCursor { severity }),
        }
    }

    /// `true` when `seq` created this cursor and has not mutated since.
    pub fn is_fresh(&self, seq: &BiVec<T>) -> bool {
        self.check(seq).is_ok()
    }

    fn live_index(&self, seq: &BiVec<T>, position: isize) -> Result<usize> {
        if in_range(position, seq.len()) {
            Ok(position as usize)
        } else {
            Err(Error::CursorOutOfRange {
                position,
                len: seq.len(),
            })
        }
    }

    #[inline(always)]
    fn shift(&mut self, len: usize, by: isize) {
        self.index = self.index.saturating_add(by);
        self.in_bounds = in_range(self.index, len);
    }

    // ─── access ──────────────────────────────────────────────────────────────

    /// Dereferences the cursor.
    pub fn get<'s>(&self, seq: &'s BiVec<T>) -> Result<&'s T> {
        self.check(seq)?;
        let index = self.live_index(seq, self.index)?;
        Ok(&seq.as_slice()[index])
    }

    /// Reads the element `k` positions away without moving the cursor.
    pub fn at<'s>(&self, seq: &'s BiVec<T>, k: isize) -> Result<&'s T> {
        self.check(seq)?;
        let index = self.live_index(seq, self.index.saturating_add(k))?;
        Ok(&seq.as_slice()[index])
    }

    // ─── arithmetic ──────────────────────────────────────────────────────────

    /// Moves one element forward (`++it`).
    pub fn increment(&mut self, seq: &BiVec<T>) -> Result<()> {
        self.advance_by(seq, 1)
    }

    /// Moves one element forward and returns the cursor as it was (`it++`).
    pub fn post_increment(&mut self, seq: &BiVec<T>) -> Result<Self> {
        let before = *self;
        self.increment(seq)?;
        Ok(before)
    }

    /// Moves one element back (`--it`).
    pub fn decrement(&mut self, seq: &BiVec<T>) -> Result<()> {
        self.retreat_by(seq, 1)
    }

    /// Moves one element back and returns the cursor as it was (`it--`).
    pub fn post_decrement(&mut self, seq: &BiVec<T>) -> Result<Self> {
        let before = *self;
        self.decrement(seq)?;
        Ok(before)
    }

    /// `it += k`.
    pub fn advance_by(&mut self, seq: &BiVec<T>, k: isize) -> Result<()> {
        self.check(seq)?;
        self.shift(seq.len(), k);
        Ok(())
    }

    /// `it -= k`.
    pub fn retreat_by(&mut self, seq: &BiVec<T>, k: isize) -> Result<()> {
        self.advance_by(seq, k.saturating_neg())
    }

    /// `it + k`.
    pub fn offset(&self, seq: &BiVec<T>, k: isize) -> Result<Self> {
        let mut out = *self;
        out.advance_by(seq, k)?;
        Ok(out)
    }

    /// `it - k`.
    pub fn offset_back(&self, seq: &BiVec<T>, k: isize) -> Result<Self> {
        self.offset(seq, k.saturating_neg())
    }

    /// `self - other`, in elements. Both cursors must belong to `seq`.
    pub fn distance_from<B: Access>(&self, seq: &BiVec<T>, other: &Cursor<T, B>) -> Result<isize> {
        self.check(seq)?;
        other.check(seq)?;
        Ok(self.slot() - other.slot())
    }

    // ─── comparison ──────────────────────────────────────────────────────────

    /// `true` when both cursors name the same slot of `seq`'s block.
    pub fn try_eq<B: Access>(&self, seq: &BiVec<T>, other: &Cursor<T, B>) -> Result<bool> {
        self.check(seq)?;
        other.check(seq)?;
        Ok(self.slot() == other.slot())
    }

    /// Negation of [`try_eq`](Cursor::try_eq).
    pub fn try_ne<B: Access>(&self, seq: &BiVec<T>, other: &Cursor<T, B>) -> Result<bool> {
        self.try_eq(seq, other).map(|eq| !eq)
    }

    /// Orders two cursors of `seq` by position.
    pub fn try_cmp<B: Access>(&self, seq: &BiVec<T>, other: &Cursor<T, B>) -> Result<Ordering> {
        self.check(seq)?;
        other.check(seq)?;
        Ok(self.index.cmp(&other.index))
    }

    /// `true` when `self` comes strictly before `other`.
    pub fn try_lt<B: Access>(&self, seq: &BiVec<T>, other: &Cursor<T, B>) -> Result<bool> {
        self.try_cmp(seq, other).map(Ordering::is_lt)
    }

    /// `true` when `self` does not come after `other`.
    pub fn try_le<B: Access>(&self, seq: &BiVec<T>, other: &Cursor<T, B>) -> Result<bool> {
        self.try_cmp(seq, other).map(Ordering::is_le)
    }

    /// `true` when `self` comes strictly after `other`.
    pub fn try_gt<B: Access>(&self, seq: &BiVec<T>, other: &Cursor<T, B>) -> Result<bool> {
        self.try_cmp(seq, other).map(Ordering::is_gt)
    }

    /// `true` when `self` does not come before `other`.
    pub fn try_ge<B: Access>(&self, seq: &BiVec<T>, other: &Cursor<T, B>) -> Result<bool> {
        self.try_cmp(seq, other).map(Ordering::is_ge)
    }
}

impl<T> Cursor<T, ReadWrite> {
    /// Exclusive dereference.
    pub fn get_mut<'s>(&self, seq: &'s mut BiVec<T>) -> Result<&'s mut T> {
        self.check(seq)?;
        let index = self.live_index(seq, self.index)?;
        Ok(&mut seq.as_mut_slice()[index])
    }

    /// Exclusive access to the element `k` positions away.
    pub fn at_mut<'s>(&self, seq: &'s mut BiVec<T>, k: isize) -> Result<&'s mut T> {
        self.check(seq)?;
        let index = self.live_index(seq, self.index.saturating_add(k))?;
        Ok(&mut seq.as_mut_slice()[index])
    }
}

impl<T, A: Access> Clone for Cursor<T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Access> Copy for Cursor<T, A> {}

impl<T, A: Access> fmt::Debug for Cursor<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("owner", &self.owner)
            .field("snapshot", &self.snapshot)
            .field("index", &self.index)
            .field("in_bounds", &self.in_bounds)
            .finish()
    }
}

impl<T> From<MutCursor<T>> for ConstCursor<T> {
    fn from(cursor: MutCursor<T>) -> Self {
        Self {
            owner: cursor.owner,
            snapshot: cursor.snapshot,
            origin: cursor.origin,
            index: cursor.index,
            in_bounds: cursor.in_bounds,
            _marker: PhantomData,
        }
    }
}
