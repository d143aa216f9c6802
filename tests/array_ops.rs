//! Lifetime accounting across every teardown path, and the rollback
//! behaviour when an element's clone panics mid-copy.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dynarray::array::DynArray;

/// An element that keeps a live count: incremented on every construction
/// and clone, decremented on every drop.
#[derive(Debug)]
struct Counted {
	value: usize,
	live: Arc<AtomicUsize>,
}

impl Counted {
	fn new(value: usize, live: &Arc<AtomicUsize>) -> Self {
		live.fetch_add(1, Ordering::SeqCst);

		Self {
			value,
			live: live.clone(),
		}
	}
}

impl Clone for Counted {
	fn clone(&self) -> Self {
		Self::new(self.value, &self.live)
	}
}

impl Drop for Counted {
	fn drop(&mut self) {
		self.live.fetch_sub(1, Ordering::SeqCst);
	}
}

/// An element whose clone panics once a shared budget runs out.
struct FaultyClone {
	counted: Counted,
	budget: Arc<AtomicUsize>,
}

impl Clone for FaultyClone {
	fn clone(&self) -> Self {
		if self.budget.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_err() {
			panic!("clone budget exhausted");
		}

		Self {
			counted: self.counted.clone(),
			budget: self.budget.clone(),
		}
	}
}

#[test]
fn demo_scenario() {
	let mut array = DynArray::new();

	for i in 0..5 {
		array.push(i);
	}

	assert_eq!(array.len(), 5);
	assert_eq!(array.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);

	let last = array.push(20);

	assert_eq!(*last, 20);
	assert_eq!(array.len(), 6);
	assert_eq!(array.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4, 20]);
}

#[test]
fn pop_scenario() {
	let mut array = DynArray::new();

	array.push(1);

	assert!(array.pop().is_some());
	assert_eq!(array.len(), 0);
	assert!(array.is_empty());
	assert!(array.pop().is_none());
}

#[test]
fn drop_accounting() {
	let live = Arc::new(AtomicUsize::new(0));

	{
		let mut array = DynArray::new();

		for i in 0..10 {
			array.push(Counted::new(i, &live));
		}

		assert_eq!(live.load(Ordering::SeqCst), 10);

		array.pop();
		array.remove(0);

		assert_eq!(live.load(Ordering::SeqCst), 8);

		array.clear();

		assert_eq!(live.load(Ordering::SeqCst), 0);

		for i in 0..5 {
			array.push(Counted::new(i, &live));
		}
	}

	assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[test]
fn growth_drops_nothing() {
	let live = Arc::new(AtomicUsize::new(0));
	let mut array = DynArray::new();

	for i in 0..100 {
		array.push(Counted::new(i, &live));

		assert_eq!(live.load(Ordering::SeqCst), i + 1);
	}

	let values = array.iter().map(|counted| counted.value).collect::<Vec<_>>();
	let expected = (0..100).collect::<Vec<_>>();

	assert_eq!(values, expected);

	drop(array);

	assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[test]
fn partial_into_iter_drops_rest() {
	let live = Arc::new(AtomicUsize::new(0));
	let mut array = DynArray::new();

	for i in 0..10 {
		array.push(Counted::new(i, &live));
	}

	let mut iter = array.into_iter();

	let first = iter.next().unwrap();
	let second = iter.next().unwrap();

	assert_eq!((first.value, second.value), (0, 1));

	drop(iter);

	assert_eq!(live.load(Ordering::SeqCst), 2);

	drop(first);
	drop(second);

	assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[test]
fn clone_panic_rolls_back() {
	let live = Arc::new(AtomicUsize::new(0));
	let budget = Arc::new(AtomicUsize::new(4));
	let mut array = DynArray::new();

	for i in 0..8 {
		array.push(FaultyClone {
			counted: Counted::new(i, &live),
			budget: budget.clone(),
		});
	}

	let len = array.len();
	let capacity = array.capacity();

	assert_eq!(live.load(Ordering::SeqCst), 8);

	// The fifth element clone panics; the four copies already made must be
	// dropped and their storage released before the panic escapes.
	let result = catch_unwind(AssertUnwindSafe(|| array.clone()));

	assert!(result.is_err());
	assert_eq!(array.len(), len);
	assert_eq!(array.capacity(), capacity);
	assert_eq!(live.load(Ordering::SeqCst), 8, "partial copies leaked");

	let values = array.iter().map(|faulty| faulty.counted.value).collect::<Vec<_>>();

	assert_eq!(values, [0, 1, 2, 3, 4, 5, 6, 7]);

	drop(array);

	assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[test]
fn clone_within_budget_is_independent() {
	let live = Arc::new(AtomicUsize::new(0));
	let budget = Arc::new(AtomicUsize::new(usize::MAX));
	let mut array = DynArray::new();

	for i in 0..4 {
		array.push(FaultyClone {
			counted: Counted::new(i, &live),
			budget: budget.clone(),
		});
	}

	let mut copy = array.clone();

	assert_eq!(live.load(Ordering::SeqCst), 8);

	copy.pop();
	copy.pop();

	assert_eq!(array.len(), 4);
	assert_eq!(live.load(Ordering::SeqCst), 6);

	drop(array);
	drop(copy);

	assert_eq!(live.load(Ordering::SeqCst), 0);
}
