//! Contains the array iterator types and conversions.

use core::iter::FusedIterator;
use core::mem::ManuallyDrop;
use core::ptr;
use core::slice;

use crate::{array::DynArray, raw::RawBuf};

impl<T> DynArray<T> {
	/// Returns an iterator over the elements of the [`DynArray`].
	#[must_use]
	pub fn iter(&self) -> slice::Iter<'_, T> {
		self.as_slice().iter()
	}

	/// Returns a mutable iterator over the elements of the [`DynArray`].
	#[must_use]
	pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
		self.as_mut_slice().iter_mut()
	}
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
	type Item = &'a T;
	type IntoIter = slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
	type Item = &'a mut T;
	type IntoIter = slice::IterMut<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter_mut()
	}
}

/// An owning iterator over the elements of a [`DynArray`].
///
/// The iterator keeps the block alive for as long as it exists; dropping it
/// partway drops the elements that were never yielded and then releases the
/// block.
pub struct IntoIter<T> {
	_buf: RawBuf<T>,
	start: *const T,
	end: *const T,
}

impl<T> IntoIter<T> {
	#[inline]
	fn remaining(&self) -> usize {
		// Byte distance rather than `offset_from`: the pointers are dangling
		// (but equal) when the array never allocated.
		(self.end as usize - self.start as usize) / core::mem::size_of::<T>()
	}
}

impl<T> IntoIterator for DynArray<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		let this = ManuallyDrop::new(self);

		// SAFETY: `this` is never dropped, so ownership of the block moves
		// into the iterator exactly once.
		let buf = unsafe { ptr::read(&this.buf) };

		let start = buf.ptr().cast_const();

		// SAFETY: `len <= capacity`, so one past the last live slot is in
		// bounds of the block (or equals `start` when empty).
		let end = unsafe { start.add(this.len) };

		IntoIter { _buf: buf, start, end }
	}
}

impl<T> Iterator for IntoIter<T> {
	type Item = T;

	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		if self.start == self.end {
			return None;
		}

		// SAFETY: the range `[start, end)` holds live values not yet read
		// out; `start` advances past each one exactly once.
		unsafe {
			let value = ptr::read(self.start);

			self.start = self.start.add(1);

			Some(value)
		}
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.remaining();

		(remaining, Some(remaining))
	}

	#[inline]
	fn count(self) -> usize {
		self.remaining()
	}
}

impl<T> DoubleEndedIterator for IntoIter<T> {
	#[inline]
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.start == self.end {
			return None;
		}

		// SAFETY: `end` is one past the last unread live value, so stepping
		// it back lands on a live value that is read out exactly once.
		unsafe {
			self.end = self.end.sub(1);

			Some(ptr::read(self.end))
		}
	}
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
	fn drop(&mut self) {
		let remaining = ptr::slice_from_raw_parts_mut(self.start.cast_mut(), self.remaining());

		// SAFETY: `[start, end)` holds the values that were never yielded;
		// nothing else will read them, and `_buf` frees the block afterwards.
		unsafe { ptr::drop_in_place(remaining) };
	}
}

// SAFETY: the iterator uniquely owns the unread elements and the block.
unsafe impl<T: Send> Send for IntoIter<T> {}

// SAFETY: shared access to the iterator hands out nothing element-related.
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> FromIterator<T> for DynArray<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut array = Self::new();

		array.extend(iter);
		array
	}
}

impl<T> Extend<T> for DynArray<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		let iter = iter.into_iter();

		self.reserve(iter.size_hint().0);

		for value in iter {
			self.push(value);
		}
	}
}
