//! # Error Types for the Red-Black Tree Map
//!
//! This module defines the error type returned by fallible map, view and
//! cursor operations.
//!
//! ## Error Handling Strategy
//!
//! Every error signals either a programmer error (a key the comparator
//! cannot order, a mutation outside a view, a misused cursor) or legitimate
//! emptiness. None of them are transient: retrying the same call with the
//! same arguments fails the same way.
//!
//! Validation always happens before any structural change, so an operation
//! that returns an error has left the tree exactly as it found it.
//!
//! ## Error Flow
//!
//! ```text
//! put(key, value) on a view
//!      │
//!      ▼
//! Comparator admits key? ──── no ──► Err(InvalidKey)
//!      │ yes
//!      ▼
//! Key inside view bounds? ─── no ──► Err(OutOfRange)
//!      │ yes
//!      ▼
//! Engine insert + fixup
//!      │
//!      ▼
//! Ok(previous value)
//! ```
//!
//! Cursors follow the same shape: the modification snapshot is compared
//! before the cursor touches any node, and a stale snapshot yields
//! [`Error::ConcurrentModification`].

use thiserror::Error;

/// Errors returned by tree, view and cursor operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// The comparator cannot order this key.
	///
	/// Natural ordering admits every key. Comparators over optional keys
	/// (see [`crate::compare::NoneRejected`]) refuse the absent key, which
	/// is how an absent key is reported.
	#[error("key is not admitted by the comparator")]
	InvalidKey,

	/// A mutation or a narrower view was requested outside a view's bounds.
	#[error("key lies outside the bounds of this view")]
	OutOfRange,

	/// A range was requested whose lower bound is above its upper bound.
	#[error("range start is greater than range end")]
	InvalidRange,

	/// Input handed to a sorted bulk build was not in strictly ascending
	/// comparator order.
	#[error("entries are not in strictly ascending order")]
	Unsorted,

	/// The structure (or the cursor's remaining range) has no more entries.
	///
	/// Returned by `first_key` / `last_key` on an empty map or view, and by
	/// [`crate::iter::Cursor::next`] past the end.
	#[error("no more entries")]
	Exhausted,

	/// `remove` was called on a cursor without a preceding successful `next`.
	///
	/// A cursor can remove each yielded entry at most once.
	#[error("cursor has no current entry to remove")]
	InvalidCursorState,

	/// The map was structurally modified after the cursor took its snapshot.
	///
	/// This is a detection mechanism, not a prevention mechanism. It compares
	/// the cursor's snapshot of the modification counter with the map's live
	/// counter on every step, which catches mutations made by the same owner
	/// between cursor steps. It is also returned when a cursor is handed a map
	/// that does not contain the node it was positioned on.
	#[error("map was structurally modified during iteration")]
	ConcurrentModification,
}

/// A Result type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
