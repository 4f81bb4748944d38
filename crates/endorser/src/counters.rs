//! Endorsement counters.
//!
//! Every table owns a [`Counters`] and shares an aggregate [`Counters`] with
//! every other table of its registry. Both are bumped with relaxed atomics, so
//! a reader may briefly see a table counter ahead of the aggregate.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Monotonic endorsement counters.
#[derive(Debug, Default)]
pub struct Counters {
	inserts: AtomicU64,
	removals: AtomicU64,
	verify_failures: AtomicU64,
	verify_successes: AtomicU64,
}

impl Counters {
	/// Creates zeroed counters.
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn inc_inserts(&self) {
		self.inserts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn inc_removals(&self) {
		self.removals.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn inc_verify(&self, matched: bool) {
		let counter = if matched {
			&self.verify_successes
		} else {
			&self.verify_failures
		};
		counter.fetch_add(1, Ordering::Relaxed);
	}

	/// Returns the insert count.
	pub fn inserts(&self) -> u64 {
		self.inserts.load(Ordering::Relaxed)
	}

	/// Returns the removal count.
	pub fn removals(&self) -> u64 {
		self.removals.load(Ordering::Relaxed)
	}

	/// Returns the failed verify count, absent keys included.
	pub fn verify_failures(&self) -> u64 {
		self.verify_failures.load(Ordering::Relaxed)
	}

	/// Returns the successful verify count.
	pub fn verify_successes(&self) -> u64 {
		self.verify_successes.load(Ordering::Relaxed)
	}

	/// Reads all four counters. The reads are not atomic as a group.
	pub fn snapshot(&self) -> CounterSnapshot {
		CounterSnapshot {
			inserts: self.inserts(),
			removals: self.removals(),
			verify_failures: self.verify_failures(),
			verify_successes: self.verify_successes(),
		}
	}
}

/// Point-in-time copy of [`Counters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
	pub inserts: u64,
	pub removals: u64,
	pub verify_failures: u64,
	pub verify_successes: u64,
}

impl CounterSnapshot {
	/// Counter names paired with their values, in display order.
	pub fn fields(&self) -> [(&'static str, u64); 4] {
		[
			("inserts", self.inserts),
			("removals", self.removals),
			("verify_failures", self.verify_failures),
			("verify_successes", self.verify_successes),
		]
	}
}
