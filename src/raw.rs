//! Contains the [`RawBuf`] type, the allocation half of the array.
//!
//! A [`RawBuf`] owns a block of raw memory sized in element units and nothing
//! else: it does not know how many slots hold live values and never runs
//! element destructors. Dropping it releases the block as-is, which is what
//! lets the array move values out bitwise and then discard the old block.

use core::alloc::Layout;
use core::mem;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc, handle_alloc_error};

use crate::error::TryReserveError;

pub(crate) struct RawBuf<T> {
	ptr: NonNull<T>,
	cap: usize,
}

impl<T> RawBuf<T> {
	/// A buffer with no allocation behind it. The pointer is dangling and
	/// must not be dereferenced until the buffer is replaced by a real one.
	pub const fn dangling() -> Self {
		Self {
			ptr: NonNull::dangling(),
			cap: 0,
		}
	}

	/// Attempts to allocate a block for exactly `cap` elements.
	///
	/// A `cap` of zero succeeds without touching the allocator.
	pub fn allocate(cap: usize) -> Result<Self, TryReserveError> {
		if cap == 0 {
			return Ok(Self::dangling());
		}

		let layout = Layout::array::<T>(cap).map_err(|_| TryReserveError::CapacityOverflow)?;

		if layout.size() > isize::MAX as usize {
			return Err(TryReserveError::CapacityOverflow);
		}

		// SAFETY: the layout is non-zero sized; `T` is not a ZST (checked at
		// array construction) and `cap > 0`.
		let ptr = unsafe { alloc(layout) };

		NonNull::new(ptr.cast::<T>())
			.map(|ptr| Self { ptr, cap })
			.ok_or(TryReserveError::AllocFailed { layout })
	}

	/// Allocates a block for exactly `cap` elements, aborting on failure.
	pub fn with_capacity(cap: usize) -> Self {
		match Self::allocate(cap) {
			Ok(buf) => buf,
			Err(TryReserveError::CapacityOverflow) => panic!("capacity overflow"),
			Err(TryReserveError::AllocFailed { layout }) => handle_alloc_error(layout),
		}
	}

	#[inline]
	pub const fn ptr(&self) -> *mut T {
		self.ptr.as_ptr()
	}

	#[inline]
	pub const fn cap(&self) -> usize {
		self.cap
	}
}

impl<T> Drop for RawBuf<T> {
	fn drop(&mut self) {
		if self.cap != 0 {
			// The layout was validated when the block was allocated.
			let layout = Layout::array::<T>(self.cap).unwrap_or_else(|_| unreachable!());

			// SAFETY: `cap != 0` means this block came from `alloc` with the
			// same layout. Element destructors are the array's concern, not
			// ours; by the time a `RawBuf` drops, its live values have either
			// been dropped in place or moved to another block.
			unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
		}
	}
}

// SAFETY: a `RawBuf` is just an owned block; sending it between threads is
// sound whenever the elements themselves can be sent or shared.
unsafe impl<T: Send> Send for RawBuf<T> {}

// SAFETY: as above, shared access to the block is as safe as shared access
// to the elements.
unsafe impl<T: Sync> Sync for RawBuf<T> {}

/// Zero-sized element types are rejected up front: the block is sized in
/// element units and a unit of zero bytes has no meaningful capacity.
pub(crate) const fn assert_element_sized<T>() {
	assert!(mem::size_of::<T>() != 0, "zero-sized element types are not supported");
}
