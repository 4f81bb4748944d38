//! The endorser table engine.
//!
//! A [`Table`] is a fixed-width hash table of endorsements. Entry `key` lives
//! in bucket `key mod 2^bits`; each bucket is a singly-linked [`Chain`]. One
//! reader/writer lock guards the whole bucket array:
//!
//! - [`Table::find`] and [`Table::verify`] take it shared and run in parallel.
//!   Neither hands out a borrow that outlives the call, so callers never hold
//!   the lock between operations.
//! - [`Table::record`], [`Table::remove`] and [`Table::drain`] take it
//!   exclusive.
//!
//! Payloads are built before the lock is taken and released after it is
//! dropped, so critical sections only link, unlink and compare.
//!
//! Keys are unique. Recording an existing key follows the table's
//! [`DuplicatePolicy`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::config::TableConfig;
use crate::counters::Counters;
use crate::error::{Error, Result};
use crate::retention::{AppendOnly, Evictable, Retention, RetentionKind};
use crate::variant::{MAX_NAME_CAPACITY, Payload, Probe, Value, Variant};


/// Largest accepted bucket width (16Mi buckets).
pub const MAX_BITS: u8 = 24;

/// What recording an already endorsed key does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
	/// Keep the existing endorsement and fail the record.
	Reject,
	/// Swap in the new payload and release the old one.
	#[default]
	Replace,
}

/// Result of a successful record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
	/// Key was new.
	Inserted,
	/// Key existed; its payload was replaced.
	Replaced,
}

/// Outcome of an insert under the write lock.
enum Insert {
	Inserted,
	Replaced(Payload),
	Occupied,
}

struct Buckets {
	chains: Box<[Chain]>,
	live: usize,
}

/// A named, fixed-width endorsement table.
///
/// The retention marker `R` decides whether the table offers
/// [`remove`](Table::remove) ([`Evictable`]) or
/// [`add_if_absent`](Table::add_if_absent) ([`AppendOnly`]).
pub struct Table<R: Retention> {
	name: String,
	bits: u8,
	variant: Variant,
	duplicates: DuplicatePolicy,
	buckets: RwLock<Buckets>,
	counters: Counters,
	global: Arc<Counters>,
	_retention: PhantomData<fn() -> R>,
}

impl<R: Retention> Table<R> {
	/// Creates a standalone table with `2^bits` buckets.
	///
	/// The table gets its own aggregate counters; tables built by a
	/// [`Registry`](crate::Registry) share the registry's.
	pub fn create(name: impl Into<String>, bits: u8, variant: Variant) -> Result<Self> {
		let config = TableConfig::new(name, bits, variant).retention(R::KIND);
		Self::with_config(&config, Arc::new(Counters::new()))
	}

	pub(crate) fn with_config(config: &TableConfig, global: Arc<Counters>) -> Result<Self> {
		if config.bits > MAX_BITS {
			return Err(Error::InvalidBits {
				table: config.name.clone(),
				bits: config.bits,
				max: MAX_BITS,
			});
		}
		if let Variant::Name { capacity } = config.variant
			&& !(1..=MAX_NAME_CAPACITY).contains(&capacity)
		{
			return Err(Error::InvalidCapacity {
				table: config.name.clone(),
				capacity,
				max: MAX_NAME_CAPACITY,
			});
		}

		let chains = (0..1usize << config.bits).map(|_| Chain::default()).collect();
		tracing::debug!(
			table = %config.name,
			bits = config.bits,
			variant = %config.variant,
			retention = %R::KIND,
			"endorser.create"
		);

		Ok(Self {
			name: config.name.clone(),
			bits: config.bits,
			variant: config.variant,
			duplicates: config.duplicates,
			buckets: RwLock::new(Buckets { chains, live: 0 }),
			counters: Counters::new(),
			global,
			_retention: PhantomData,
		})
	}

	/// Sets the duplicate policy of a freshly created table.
	pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
		self.duplicates = policy;
		self
	}

	/// Name the table was declared under.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Bucket width: the table has `2^bits` buckets.
	pub fn bits(&self) -> u8 {
		self.bits
	}

	/// Number of buckets.
	pub fn bucket_count(&self) -> usize {
		1 << self.bits
	}

	/// Payload variant every entry follows.
	pub fn variant(&self) -> Variant {
		self.variant
	}

	/// Runtime name of the retention marker `R`.
	pub fn retention(&self) -> RetentionKind {
		R::KIND
	}

	/// What recording an already endorsed key does.
	pub fn duplicates(&self) -> DuplicatePolicy {
		self.duplicates
	}

	/// This table's counters.
	pub fn counters(&self) -> &Counters {
		&self.counters
	}

	/// Aggregate counters shared with the other tables of the registry.
	pub fn global_counters(&self) -> &Counters {
		&self.global
	}

	/// Number of live entries.
	pub fn len(&self) -> usize {
		self.buckets.read().live
	}

	/// Whether the table holds no live entries.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Length of the longest bucket chain.
	pub fn longest_chain(&self) -> usize {
		let buckets = self.buckets.read();
		buckets.chains.iter().map(Chain::len).max().unwrap_or(0)
	}

	fn bucket_of(&self, key: u64) -> usize {
		let mask = (1u64 << self.bits) - 1;
		(key & mask) as usize
	}

	/// Records an endorsement for `key`, taking ownership of `value`.
	///
	/// Fails with [`Error::PayloadShape`] when the value does not fit the
	/// table's variant, and with [`Error::Duplicate`] when the key is present
	/// and the table rejects duplicates. Counters only move on success.
	pub fn record(&self, key: u64, value: impl Into<Value>) -> Result<Recorded> {
		let payload = self.admit(value.into())?;

		match self.insert(key, payload, self.duplicates) {
			Insert::Inserted => {
				self.bump_inserts();
				tracing::trace!(table = %self.name, key, "endorser.record");
				Ok(Recorded::Inserted)
			}
			Insert::Replaced(old) => {
				drop(old);
				self.bump_inserts();
				tracing::trace!(table = %self.name, key, "endorser.record.replaced");
				Ok(Recorded::Replaced)
			}
			Insert::Occupied => {
				tracing::warn!(table = %self.name, key, "endorser.record.duplicate");
				Err(Error::Duplicate {
					table: self.name.clone(),
					key,
				})
			}
		}
	}

	/// Returns a copy of the live payload for `key`.
	///
	/// The copy is taken under the shared lock, which is released before
	/// returning. Counters are not touched.
	pub fn find(&self, key: u64) -> Option<Payload> {
		let bucket = self.bucket_of(key);
		let found = self.buckets.read().chains[bucket].find(key).cloned();
		tracing::trace!(table = %self.name, key, found = found.is_some(), "endorser.find");
		found
	}

	/// Whether `key` has a live endorsement.
	pub fn contains(&self, key: u64) -> bool {
		let bucket = self.bucket_of(key);
		self.buckets.read().chains[bucket].find(key).is_some()
	}

	/// Checks that the endorsement for `key` still matches `probe`.
	///
	/// Absent keys and mismatches both return `false` and both count as a
	/// verify failure.
	pub fn verify<'a>(&self, key: u64, probe: impl Into<Probe<'a>>) -> bool {
		let probe = probe.into();
		let bucket = self.bucket_of(key);
		let matched = {
			let buckets = self.buckets.read();
			buckets.chains[bucket]
				.find(key)
				.is_some_and(|payload| payload.matches(probe))
		};

		self.counters.inc_verify(matched);
		self.global.inc_verify(matched);
		if matched {
			tracing::trace!(table = %self.name, key, "endorser.verify");
		} else {
			tracing::debug!(table = %self.name, key, "endorser.verify.failed");
		}
		matched
	}

	/// Releases every entry, returning how many were released.
	///
	/// Teardown is not a removal: the removal counters are left alone.
	pub fn drain(&self) -> usize {
		let released = {
			let mut buckets = self.buckets.write();
			let released: usize = buckets.chains.iter_mut().map(Chain::drain).sum();
			buckets.live = 0;
			released
		};
		tracing::debug!(table = %self.name, released, "endorser.drain");
		released
	}

	/// Drains and drops the table, returning how many entries were released.
	pub fn destroy(self) -> usize {
		self.drain()
	}

	fn admit(&self, value: Value) -> Result<Payload> {
		self.variant.admit(value).map_err(|given| {
			tracing::warn!(table = %self.name, variant = %self.variant, given, "endorser.record.shape");
			Error::PayloadShape {
				table: self.name.clone(),
				variant: self.variant,
				given,
			}
		})
	}

	fn insert(&self, key: u64, payload: Payload, policy: DuplicatePolicy) -> Insert {
		let bucket = self.bucket_of(key);
		let mut buckets = self.buckets.write();
		let buckets = &mut *buckets;
		let chain = &mut buckets.chains[bucket];

		match (chain.find_mut(key), policy) {
			(Some(_), DuplicatePolicy::Reject) => Insert::Occupied,
			(Some(slot), DuplicatePolicy::Replace) => {
				Insert::Replaced(std::mem::replace(slot, payload))
			}
			(None, _) => {
				chain.push_front(key, payload);
				buckets.live += 1;
				Insert::Inserted
			}
		}
	}

	fn bump_inserts(&self) {
		self.counters.inc_inserts();
		self.global.inc_inserts();
	}
}

impl Table<Evictable> {
	/// Removes the endorsement for `key`.
	///
	/// Returns whether an entry was removed; only then is the removal counter
	/// bumped.
	pub fn remove(&self, key: u64) -> bool {
		let bucket = self.bucket_of(key);
		let removed = {
			let mut buckets = self.buckets.write();
			let removed = buckets.chains[bucket].unlink(key);
			if removed.is_some() {
				buckets.live -= 1;
			}
			removed
		};

		let Some(payload) = removed else {
			tracing::trace!(table = %self.name, key, "endorser.remove.absent");
			return false;
		};
		drop(payload);
		self.counters.inc_removals();
		self.global.inc_removals();
		tracing::trace!(table = %self.name, key, "endorser.remove");
		true
	}
}

impl Table<AppendOnly> {
	/// Records `value` unless `key` is already endorsed.
	///
	/// Probes under the shared lock first, so the common already-present case
	/// never takes the write lock. The insert section keeps whatever a racing
	/// caller recorded in between. Returns `Ok(true)` when this call inserted.
	///
	/// Only append-only tables offer this: with removals, a key could vanish
	/// between the two sections.
	pub fn add_if_absent(&self, key: u64, value: impl Into<Value>) -> Result<bool> {
		if self.contains(key) {
			tracing::trace!(table = %self.name, key, "endorser.add_if_absent.present");
			return Ok(false);
		}

		let payload = self.admit(value.into())?;
		match self.insert(key, payload, DuplicatePolicy::Reject) {
			Insert::Inserted => {
				self.bump_inserts();
				tracing::trace!(table = %self.name, key, "endorser.add_if_absent");
				Ok(true)
			}
			Insert::Replaced(_) | Insert::Occupied => {
				tracing::trace!(table = %self.name, key, "endorser.add_if_absent.raced");
				Ok(false)
			}
		}
	}
}

impl<R: Retention> fmt::Debug for Table<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Table")
			.field("name", &self.name)
			.field("bits", &self.bits)
			.field("variant", &self.variant)
			.field("retention", &R::KIND)
			.field("duplicates", &self.duplicates)
			.field("len", &self.len())
			.finish()
	}
}
