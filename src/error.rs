//! Contains the error type reported by fallible capacity requests.

use core::alloc::Layout;
use core::fmt::{self, Display, Formatter};
use std::error::Error;

/// The error returned when a capacity request cannot be satisfied.
///
/// The infallible reservation paths turn these into a panic or an allocation
/// abort; [`try_reserve`](crate::array::DynArray::try_reserve) hands them to
/// the caller instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TryReserveError {
	/// The requested capacity does not fit the address space; no allocation
	/// was attempted.
	CapacityOverflow,

	/// The allocator refused the request for this layout. The container is
	/// unchanged.
	AllocFailed {
		/// The layout of the block that could not be allocated.
		layout: Layout,
	},
}

impl Display for TryReserveError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::CapacityOverflow => write!(f, "requested capacity exceeds the maximum"),
			Self::AllocFailed { layout } => {
				write!(f, "allocation of {} bytes failed", layout.size())
			}
		}
	}
}

impl Error for TryReserveError {}
