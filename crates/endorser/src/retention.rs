//! Retention markers.
//!
//! A table's retention is part of its type. [`AppendOnly`] tables never lose a
//! key once recorded, which is what makes
//! [`Table::add_if_absent`](crate::Table::add_if_absent) sound without holding
//! one lock across its probe and its insert. [`Evictable`] tables support
//! [`Table::remove`](crate::Table::remove) and therefore do not offer
//! add-if-absent.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::registry::Slot;
use crate::table::Table;

mod sealed {
	pub trait Sealed {}
	impl Sealed for super::AppendOnly {}
	impl Sealed for super::Evictable {}
}

/// Runtime name of a retention marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionKind {
	/// Keys are never removed.
	AppendOnly,
	/// Keys may be removed.
	#[default]
	Evictable,
}

impl RetentionKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AppendOnly => "append_only",
			Self::Evictable => "evictable",
		}
	}
}

impl fmt::Display for RetentionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Type-level retention of a [`Table`].
pub trait Retention: sealed::Sealed + Send + Sync + Sized + 'static {
	/// The matching runtime kind.
	const KIND: RetentionKind;

	#[doc(hidden)]
	fn into_slot(table: Arc<Table<Self>>) -> Slot;

	#[doc(hidden)]
	fn from_slot(slot: &Slot) -> Option<&Arc<Table<Self>>>;
}

/// Marker for tables whose keys are never removed.
#[derive(Debug)]
pub enum AppendOnly {}

/// Marker for tables whose keys may be removed.
#[derive(Debug)]
pub enum Evictable {}

impl Retention for AppendOnly {
	const KIND: RetentionKind = RetentionKind::AppendOnly;

	fn into_slot(table: Arc<Table<Self>>) -> Slot {
		Slot::AppendOnly(table)
	}

	fn from_slot(slot: &Slot) -> Option<&Arc<Table<Self>>> {
		match slot {
			Slot::AppendOnly(table) => Some(table),
			Slot::Evictable(_) => None,
		}
	}
}

impl Retention for Evictable {
	const KIND: RetentionKind = RetentionKind::Evictable;

	fn into_slot(table: Arc<Table<Self>>) -> Slot {
		Slot::Evictable(table)
	}

	fn from_slot(slot: &Slot) -> Option<&Arc<Table<Self>>> {
		match slot {
			Slot::Evictable(table) => Some(table),
			Slot::AppendOnly(_) => None,
		}
	}
}
