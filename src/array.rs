//! Contains the [`DynArray`] type, which is the main type of this crate.

use core::fmt::{self, Debug, Formatter};
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr;
use core::slice;
use std::alloc::handle_alloc_error;

use crate::error::TryReserveError;
use crate::raw::{assert_element_sized, RawBuf};

/// A [`DynArray`] is a contiguous, growable sequence of values. It is a
/// from-scratch dynamic array: the first `len` slots of its block are live
/// values, the remaining slots are raw memory that is never read or dropped.
///
/// Zero-sized element types are not supported and are rejected at
/// construction.
pub struct DynArray<T> {
	pub(crate) buf: RawBuf<T>,
	pub(crate) len: usize,
}

impl<T> DynArray<T> {
	/// Creates a new, empty [`DynArray`]. Does not allocate.
	#[inline]
	#[must_use]
	pub const fn new() -> Self {
		assert_element_sized::<T>();

		Self {
			buf: RawBuf::dangling(),
			len: 0,
		}
	}

	/// Creates a new, empty [`DynArray`] with at least the specified capacity.
	#[inline]
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		assert_element_sized::<T>();

		Self {
			buf: RawBuf::with_capacity(capacity),
			len: 0,
		}
	}

	/// Returns the number of elements in the [`DynArray`].
	#[inline]
	#[must_use]
	pub const fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the [`DynArray`] contains no elements.
	#[inline]
	#[must_use]
	pub const fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the total number of elements the [`DynArray`] can hold
	/// without reallocating.
	#[inline]
	#[must_use]
	pub const fn capacity(&self) -> usize {
		self.buf.cap()
	}

	/// Returns a slice over the live elements.
	#[inline]
	#[must_use]
	pub fn as_slice(&self) -> &[T] {
		// SAFETY: slots `[0, len)` are initialized; the pointer is dangling
		// only when `len == 0`, which a zero-length slice permits.
		unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
	}

	/// Returns a mutable slice over the live elements.
	#[inline]
	#[must_use]
	pub fn as_mut_slice(&mut self) -> &mut [T] {
		// SAFETY: as in `as_slice`, plus we hold the unique borrow.
		unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
	}

	/// Returns a reference to the element at `index`, or [`None`] if the
	/// index is out of range.
	#[inline]
	#[must_use]
	pub fn get(&self, index: usize) -> Option<&T> {
		self.as_slice().get(index)
	}

	/// Returns a mutable reference to the element at `index`, or [`None`]
	/// if the index is out of range.
	#[inline]
	#[must_use]
	pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
		self.as_mut_slice().get_mut(index)
	}

	/// Returns a reference to the element at `index` without a bounds check.
	///
	/// # Safety
	///
	/// `index` must be less than [`len`](Self::len); anything else reads
	/// uninitialized or out-of-bounds memory.
	#[inline]
	#[must_use]
	pub unsafe fn get_unchecked(&self, index: usize) -> &T {
		debug_assert!(index < self.len);

		// SAFETY: the caller promises `index < len`, so the slot is live.
		unsafe { &*self.buf.ptr().add(index) }
	}

	/// Returns a mutable reference to the element at `index` without a
	/// bounds check.
	///
	/// # Safety
	///
	/// `index` must be less than [`len`](Self::len).
	#[inline]
	#[must_use]
	pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
		debug_assert!(index < self.len);

		// SAFETY: the caller promises `index < len`, so the slot is live.
		unsafe { &mut *self.buf.ptr().add(index) }
	}

	/// Returns a reference to the first element, or [`None`] if the
	/// [`DynArray`] is empty.
	#[inline]
	#[must_use]
	pub fn first(&self) -> Option<&T> {
		self.as_slice().first()
	}

	/// Returns a mutable reference to the first element, or [`None`] if the
	/// [`DynArray`] is empty.
	#[inline]
	#[must_use]
	pub fn first_mut(&mut self) -> Option<&mut T> {
		self.as_mut_slice().first_mut()
	}

	/// Returns a reference to the last element, or [`None`] if the
	/// [`DynArray`] is empty.
	#[inline]
	#[must_use]
	pub fn last(&self) -> Option<&T> {
		self.as_slice().last()
	}

	/// Returns a mutable reference to the last element, or [`None`] if the
	/// [`DynArray`] is empty.
	#[inline]
	#[must_use]
	pub fn last_mut(&mut self) -> Option<&mut T> {
		self.as_mut_slice().last_mut()
	}

	/// Moves every live element into a freshly allocated block of `new_cap`
	/// slots, then releases the old block. The old block is untouched until
	/// the move has fully succeeded, so a failed allocation leaves the array
	/// exactly as it was.
	fn reallocate(&mut self, new_cap: usize) -> Result<(), TryReserveError> {
		debug_assert!(new_cap >= self.len);

		let new_buf = RawBuf::allocate(new_cap)?;

		// SAFETY: the blocks are distinct, the source holds `len` live
		// values, and the destination has room for at least `len`.
		unsafe { ptr::copy_nonoverlapping(self.buf.ptr(), new_buf.ptr(), self.len) };

		// The old block now holds moved-out bytes; replacing the buffer
		// frees it without running destructors.
		self.buf = new_buf;

		Ok(())
	}

	/// Attempts to reserve capacity for at least `additional` more elements.
	/// The collection may reserve more space to amortize future growth.
	///
	/// # Errors
	///
	/// Returns an error if the new capacity overflows or the allocator fails;
	/// the array is unchanged in either case.
	pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
		let required = self
			.len
			.checked_add(additional)
			.ok_or(TryReserveError::CapacityOverflow)?;

		if required <= self.capacity() {
			return Ok(());
		}

		let amortized = self
			.len
			.checked_add(1)
			.and_then(|len| len.checked_mul(2))
			.ok_or(TryReserveError::CapacityOverflow)?;

		self.reallocate(required.max(amortized))
	}

	/// Reserves capacity for at least `additional` more elements to be
	/// inserted in the given [`DynArray`].
	///
	/// # Panics
	///
	/// Panics on capacity overflow; aborts if the allocator fails.
	pub fn reserve(&mut self, additional: usize) {
		match self.try_reserve(additional) {
			Ok(()) => {}
			Err(TryReserveError::CapacityOverflow) => panic!("capacity overflow"),
			Err(TryReserveError::AllocFailed { layout }) => handle_alloc_error(layout),
		}
	}

	/// Shrinks the capacity of the [`DynArray`] to match its length,
	/// releasing the block entirely when empty. Kept as-is if the
	/// reallocation fails.
	pub fn shrink_to_fit(&mut self) {
		if self.len < self.capacity() {
			let _ = self.reallocate(self.len);
		}
	}

	/// Appends an element to the back of the [`DynArray`], returning a
	/// reference to its slot. The value is written directly into the slot,
	/// so the reference stays valid until the next reallocation.
	#[inline]
	pub fn push(&mut self, value: T) -> &mut T {
		if self.len == self.capacity() {
			self.reserve(1);
		}

		let index = self.len;

		// SAFETY: `index < capacity` after the reservation above, and the
		// slot at `index` is raw memory, so nothing is overwritten.
		unsafe { ptr::write(self.buf.ptr().add(index), value) };

		self.len = index + 1;

		// SAFETY: the slot was just initialized.
		unsafe { &mut *self.buf.ptr().add(index) }
	}

	/// Removes the last element and returns it, or [`None`] if the
	/// [`DynArray`] is empty.
	#[inline]
	pub fn pop(&mut self) -> Option<T> {
		if self.len == 0 {
			return None;
		}

		self.len -= 1;

		// SAFETY: the slot at the old `len - 1` was live; decrementing `len`
		// first means no other path will touch it again.
		Some(unsafe { ptr::read(self.buf.ptr().add(self.len)) })
	}

	/// Inserts an element at `index`, shifting every element after it one
	/// slot to the right.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	pub fn insert(&mut self, index: usize, value: T) {
		assert!(index <= self.len, "insertion index out of bounds");

		if self.len == self.capacity() {
			self.reserve(1);
		}

		// SAFETY: capacity exceeds `len`, so the shifted range and the slot
		// at `index` stay inside the block. `ptr::copy` handles the overlap.
		unsafe {
			let slot = self.buf.ptr().add(index);

			ptr::copy(slot, slot.add(1), self.len - index);
			ptr::write(slot, value);
		}

		self.len += 1;
	}

	/// Attempts to remove the element at `index`, shifting every element
	/// after it one slot to the left. Returns [`None`] if the index is out
	/// of range.
	pub fn try_remove(&mut self, index: usize) -> Option<T> {
		if index >= self.len {
			return None;
		}

		self.len -= 1;

		// SAFETY: the slot at `index` is live and read out exactly once; the
		// shift moves the remaining `len - index` live values down over it.
		unsafe {
			let slot = self.buf.ptr().add(index);
			let value = ptr::read(slot);

			ptr::copy(slot.add(1), slot, self.len - index);

			Some(value)
		}
	}

	/// Removes the element at `index`, returning it.
	///
	/// # Panics
	///
	/// Panics if `index >= len`.
	#[inline]
	pub fn remove(&mut self, index: usize) -> T {
		self.try_remove(index).expect("removal index out of bounds")
	}

	/// Clears the [`DynArray`], dropping all elements in order. The capacity
	/// is unchanged.
	pub fn clear(&mut self) {
		let live: *mut [T] = self.as_mut_slice();

		// Zeroing `len` first keeps the array valid if an element's drop
		// panics partway; the tail is leaked rather than double-dropped.
		self.len = 0;

		// SAFETY: `live` covers exactly the slots that were live, and `len`
		// is already zero so no other path can observe them.
		unsafe { ptr::drop_in_place(live) };
	}
}

impl<T> Default for DynArray<T> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Clone> Clone for DynArray<T> {
	fn clone(&self) -> Self {
		let mut copy = Self::with_capacity(self.len);

		// If an element's clone panics, `copy` unwinds through its own drop:
		// every clone made so far is dropped and the block released, while
		// `self` is untouched.
		for value in self {
			copy.push(value.clone());
		}

		copy
	}
}

impl<T: Debug> Debug for DynArray<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

impl<T> Deref for DynArray<T> {
	type Target = [T];

	#[inline]
	fn deref(&self) -> &Self::Target {
		self.as_slice()
	}
}

impl<T> DerefMut for DynArray<T> {
	#[inline]
	fn deref_mut(&mut self) -> &mut Self::Target {
		self.as_mut_slice()
	}
}

impl<T> Index<usize> for DynArray<T> {
	type Output = T;

	#[inline]
	fn index(&self, index: usize) -> &Self::Output {
		self.get(index).expect("index out of bounds")
	}
}

impl<T> IndexMut<usize> for DynArray<T> {
	#[inline]
	fn index_mut(&mut self, index: usize) -> &mut Self::Output {
		self.get_mut(index).expect("index out of bounds")
	}
}

impl<T> Drop for DynArray<T> {
	fn drop(&mut self) {
		self.clear();

		// `buf` drops afterwards and releases the block.
	}
}

// SAFETY: the array uniquely owns its elements and block; transferring it
// between threads is sound whenever the elements can be transferred.
unsafe impl<T: Send> Send for DynArray<T> {}

// SAFETY: shared access to the array only hands out `&T`.
unsafe impl<T: Sync> Sync for DynArray<T> {}
