//! # BiVec
//!
//! A contiguous, growable vector with amortised O(1) push and pop at **both** ends, and
//! random-access cursors that report *how* they went stale instead of silently dangling.
//!
//! ## Key Features
//!
//! * **One block:** Elements live in a single contiguous allocation, so `as_slice()` is free.
//! * **Asymmetric growth:** Each end doubles only its own spare capacity. A stream of
//!   `push_back` calls never pays for front spare it does not use, and vice versa.
//! * **Checked cursors:** Cursors snapshot a generation/reallocation ledger and re-validate on
//!   every operation, failing with a classified [`Severity`] once the parent has mutated.
//! * **Injected configuration:** The minimum capacity comes from [`BiVecConfig`], not from
//!   global state.
//!
//! ## Staleness levels
//!
//! | Severity | Meaning |
//! |----------|---------|
//! | `Moderate` | The backing block was replaced; the cursor's slot no longer exists. |
//! | `Severe` | The cursor's slot was popped off the live range. |
//! | `Mild` | Something else changed; the slot is still nominally live. |
//! | `Warning` | Reserved; never raised. |
//!
//! ## Examples
//!
//! ### Both ends
//!
//! ```rust
//! use bivec::BiVec;
//!
//! let mut v: BiVec<&str> = BiVec::new();
//! v.push_back("b").unwrap();
//! v.push_front("a").unwrap();
//! v.push_back("c").unwrap();
//!
//! assert_eq!(v.as_slice(), &["a", "b", "c"]);
//! assert_eq!(v.pop_back(), Ok("c"));
//! assert_eq!(v.len(), 2);
//! ```
//!
//! ### Cursors
//!
//! ```rust
//! use bivec::{BiVec, Error, Severity};
//!
//! let mut v: BiVec<i32> = BiVec::with_capacity(8);
//! for i in 0..4 {
//!     v.push_back(i).unwrap();
//! }
//! let it = v.begin().offset(&v, 2).unwrap();
//! assert_eq!(it.get(&v), Ok(&2));
//!
//! // Five more pushes overflow the 8-slot block.
//! for i in 4..9 {
//!     v.push_back(i).unwrap();
//! }
//! assert_eq!(
//!     it.get(&v),
//!     Err(Error::InvalidCursor { severity: Severity::Moderate })
//! );
//! ```

// --- Module Declarations ---

pub mod config;
pub mod error;
pub mod utils;
pub mod vecs;

// --- Re-exports ---

pub use config::{BiVecConfig, DEFAULT_MIN_CAPACITY};
pub use error::{Error, Result, Severity};
pub use vecs::bivec::{BiVec, IntoIter};
pub use vecs::cursor::{Access, ConstCursor, Cursor, MutCursor, ReadOnly, ReadWrite};
