//! Read-only statistics for inspectors.
//!
//! [`StatsSnapshot`] is what a host renders on its debug or stats endpoint.
//! `Display` prints one `table.counter value` line per value, and
//! [`StatsSnapshot::to_json`] emits the same data as JSON.

use std::fmt;

use serde::Serialize;

use crate::counters::CounterSnapshot;
use crate::registry::{Registry, Slot};
use crate::retention::{Retention, RetentionKind};
use crate::table::Table;
use crate::variant::Variant;


/// Statistics of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStats {
	pub name: String,
	pub bits: u8,
	pub buckets: usize,
	pub variant: Variant,
	pub retention: RetentionKind,
	/// Live entries.
	pub live: usize,
	/// Longest bucket chain; a long chain means `bits` is too small.
	pub longest_chain: usize,
	#[serde(flatten)]
	pub counters: CounterSnapshot,
}

/// Statistics of every table of a registry plus the aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
	pub tables: Vec<TableStats>,
	pub global: CounterSnapshot,
}

impl StatsSnapshot {
	pub fn table(&self, name: &str) -> Option<&TableStats> {
		self.tables.iter().find(|table| table.name == name)
	}

	/// Pretty-printed JSON.
	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}
}

impl fmt::Display for StatsSnapshot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for table in &self.tables {
			let name = &table.name;
			writeln!(f, "{name}.variant {}", table.variant)?;
			writeln!(f, "{name}.buckets {}", table.buckets)?;
			writeln!(f, "{name}.live {}", table.live)?;
			writeln!(f, "{name}.longest_chain {}", table.longest_chain)?;
			for (counter, value) in table.counters.fields() {
				writeln!(f, "{name}.{counter} {value}")?;
			}
		}
		for (counter, value) in self.global.fields() {
			writeln!(f, "global.{counter} {value}")?;
		}
		Ok(())
	}
}

impl<R: Retention> Table<R> {
	pub fn stats(&self) -> TableStats {
		TableStats {
			name: self.name().to_owned(),
			bits: self.bits(),
			buckets: self.bucket_count(),
			variant: self.variant(),
			retention: R::KIND,
			live: self.len(),
			longest_chain: self.longest_chain(),
			counters: self.counters().snapshot(),
		}
	}
}

impl Slot {
	pub fn stats(&self) -> TableStats {
		match self {
			Self::AppendOnly(table) => table.stats(),
			Self::Evictable(table) => table.stats(),
		}
	}
}

impl Registry {
	/// Snapshot of every table, in declaration order.
	pub fn stats(&self) -> StatsSnapshot {
		StatsSnapshot {
			tables: self.iter().map(Slot::stats).collect(),
			global: self.global_counters().snapshot(),
		}
	}
}
