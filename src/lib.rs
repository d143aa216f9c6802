#![deny(unsafe_op_in_unsafe_fn)]

//! A [`DynArray`](array::DynArray) is a contiguous, growable sequence container built from scratch
//! over a block of raw storage. The first `len` slots of the block hold live values; the rest are
//! uninitialized memory that is never read or dropped. Growth allocates a fresh block, moves every
//! live value across in order, and only then releases the old block.
//!
//! ## Example
//!
//! ```rust
//! # use dynarray::array::DynArray;
//! let mut array = DynArray::new();
//!
//! for i in 0..5 {
//! 	array.push(i);
//! }
//!
//! let last = array.push(20);
//!
//! assert_eq!(*last, 20);
//! assert_eq!(array.as_slice(), &[0, 1, 2, 3, 4, 20]);
//! ```
//!
//! ## Features
//!
//! - Amortized `O(1)` append, with the inserted slot handed back by reference
//! - Checked access by default, with an `unsafe` unchecked escape hatch
//! - Strong exception safety: a reallocation that fails leaves the array untouched
//! - Fallible capacity requests via [`try_reserve`](array::DynArray::try_reserve)

pub mod array;
pub mod error;
pub mod iter;
mod raw;
