//! The set of named tables a host creates at startup.
//!
//! A [`Registry`] is built once, either declaration by declaration through
//! [`RegistryBuilder`] or from a [`RegistryConfig`], and then passed by
//! reference. Call sites fetch their typed [`Table`] handle by name once and
//! keep it; there is no process-wide lookup.
//!
//! All tables of a registry share one set of aggregate counters.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::config::{RegistryConfig, TableConfig};
use crate::counters::Counters;
use crate::error::{Error, Result};
use crate::retention::{AppendOnly, Evictable, Retention, RetentionKind};
use crate::table::Table;


/// A registered table of either retention.
#[derive(Debug, Clone)]
pub enum Slot {
	AppendOnly(Arc<Table<AppendOnly>>),
	Evictable(Arc<Table<Evictable>>),
}

impl Slot {
	pub fn name(&self) -> &str {
		match self {
			Self::AppendOnly(table) => table.name(),
			Self::Evictable(table) => table.name(),
		}
	}

	pub fn retention(&self) -> RetentionKind {
		match self {
			Self::AppendOnly(_) => RetentionKind::AppendOnly,
			Self::Evictable(_) => RetentionKind::Evictable,
		}
	}

	pub fn len(&self) -> usize {
		match self {
			Self::AppendOnly(table) => table.len(),
			Self::Evictable(table) => table.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Releases every entry of the table.
	pub fn drain(&self) -> usize {
		match self {
			Self::AppendOnly(table) => table.drain(),
			Self::Evictable(table) => table.drain(),
		}
	}
}

/// Collects table declarations for a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	tables: Vec<Slot>,
	index: FxHashMap<String, usize>,
	global: Arc<Counters>,
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a table with retention `R` and returns its handle.
	///
	/// The declaration's `retention` must agree with `R`.
	pub fn declare<R: Retention>(&mut self, config: TableConfig) -> Result<Arc<Table<R>>> {
		if config.retention != R::KIND {
			return Err(Error::RetentionMismatch {
				table: config.name,
				expected: R::KIND,
				actual: config.retention,
			});
		}
		if self.index.contains_key(&config.name) {
			return Err(Error::DuplicateTable(config.name));
		}

		let table = Arc::new(Table::<R>::with_config(&config, Arc::clone(&self.global))?);
		self.index.insert(config.name, self.tables.len());
		self.tables.push(R::into_slot(Arc::clone(&table)));
		Ok(table)
	}

	/// Creates a table with the retention its declaration names.
	pub fn declare_config(&mut self, config: TableConfig) -> Result<&mut Self> {
		match config.retention {
			RetentionKind::AppendOnly => self.declare::<AppendOnly>(config).map(drop)?,
			RetentionKind::Evictable => self.declare::<Evictable>(config).map(drop)?,
		}
		Ok(self)
	}

	pub fn build(self) -> Registry {
		tracing::info!(tables = self.tables.len(), "endorser.registry.build");
		Registry {
			tables: self.tables,
			index: self.index,
			global: self.global,
		}
	}
}

/// Named endorser tables sharing aggregate counters.
#[derive(Debug)]
pub struct Registry {
	tables: Vec<Slot>,
	index: FxHashMap<String, usize>,
	global: Arc<Counters>,
}

impl Registry {
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::new()
	}

	/// Creates every table a configuration declares.
	pub fn from_config(config: &RegistryConfig) -> Result<Self> {
		let mut builder = RegistryBuilder::new();
		for table in &config.tables {
			builder.declare_config(table.clone())?;
		}
		Ok(builder.build())
	}

	/// Returns the handle of table `name`, which must have retention `R`.
	pub fn table<R: Retention>(&self, name: &str) -> Result<Arc<Table<R>>> {
		let slot = self
			.slot(name)
			.ok_or_else(|| Error::UnknownTable(name.to_owned()))?;
		R::from_slot(slot).cloned().ok_or_else(|| Error::RetentionMismatch {
			table: name.to_owned(),
			expected: R::KIND,
			actual: slot.retention(),
		})
	}

	pub fn append_only(&self, name: &str) -> Result<Arc<Table<AppendOnly>>> {
		self.table(name)
	}

	pub fn evictable(&self, name: &str) -> Result<Arc<Table<Evictable>>> {
		self.table(name)
	}

	pub fn slot(&self, name: &str) -> Option<&Slot> {
		self.index.get(name).map(|&i| &self.tables[i])
	}

	/// Tables in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &Slot> {
		self.tables.iter()
	}

	pub fn len(&self) -> usize {
		self.tables.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tables.is_empty()
	}

	/// Aggregate counters of every table.
	pub fn global_counters(&self) -> &Counters {
		&self.global
	}

	/// Drains every table, returning the number of entries released.
	///
	/// Handles still held elsewhere stay usable but start out empty.
	pub fn shutdown(self) -> usize {
		let released: usize = self.tables.iter().map(Slot::drain).sum();
		tracing::info!(tables = self.tables.len(), released, "endorser.registry.shutdown");
		released
	}
}
