//! Table declarations and their TOML form.
//!
//! A [`RegistryConfig`] lists every table a registry creates at startup:
//!
//! ```toml
//! [[tables]]
//! name = "fname"
//! bits = 13
//! variant = { kind = "name", capacity = 256 }
//! retention = "append_only"
//!
//! [[tables]]
//! name = "task_cred"
//! bits = 10
//! variant = { kind = "blob" }
//! duplicates = "reject"
//! ```
//!
//! `retention` defaults to `evictable` and `duplicates` to `replace`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::retention::RetentionKind;
use crate::table::DuplicatePolicy;
use crate::variant::Variant;

#[cfg(test)]
mod tests;

/// Declaration of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
	/// Unique table name.
	pub name: String,
	/// Bucket width; the table has `2^bits` buckets.
	pub bits: u8,
	/// Whether keys may be removed.
	#[serde(default)]
	pub retention: RetentionKind,
	/// What recording an existing key does.
	#[serde(default)]
	pub duplicates: DuplicatePolicy,
	/// Payload variant. Kept last so it serializes after the plain values.
	pub variant: Variant,
}

impl TableConfig {
	/// Declares an evictable table that replaces duplicates.
	pub fn new(name: impl Into<String>, bits: u8, variant: Variant) -> Self {
		Self {
			name: name.into(),
			bits,
			retention: RetentionKind::default(),
			duplicates: DuplicatePolicy::default(),
			variant,
		}
	}

	pub fn retention(mut self, retention: RetentionKind) -> Self {
		self.retention = retention;
		self
	}

	pub fn duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
		self.duplicates = duplicates;
		self
	}
}

/// Every table of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
	#[serde(default)]
	pub tables: Vec<TableConfig>,
}

impl RegistryConfig {
	/// A configuration without tables.
	pub fn empty() -> Self {
		Self { tables: Vec::new() }
	}

	/// Parses a TOML configuration.
	pub fn from_toml(src: &str) -> Result<Self> {
		Ok(toml::from_str(src)?)
	}

	/// Reads and parses a TOML configuration file.
	pub fn load(path: &Path) -> Result<Self> {
		let src = std::fs::read_to_string(path).map_err(|error| Error::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml(&src)?;
		tracing::debug!(path = %path.display(), tables = config.tables.len(), "endorser.config.load");
		Ok(config)
	}

	/// Looks up a declaration by table name.
	pub fn get(&self, name: &str) -> Option<&TableConfig> {
		self.tables.iter().find(|table| table.name == name)
	}
}

/// The built-in table set: the pathname, credential and label snapshots plus
/// one scalar table per [`ObjectKind`].
impl Default for RegistryConfig {
	fn default() -> Self {
		let mut tables = vec![
			TableConfig::new(FNAME_TABLE, 13, Variant::name(256)).retention(RetentionKind::AppendOnly),
			TableConfig::new(TASK_CRED_TABLE, 10, Variant::Blob),
			TableConfig::new(TASK_LABEL_TABLE, 10, Variant::Blob),
		];
		tables.extend(
			ObjectKind::ALL
				.iter()
				.map(|kind| TableConfig::new(kind.table_name(), 8, Variant::Scalar)),
		);
		Self { tables }
	}
}

/// Interned pathnames.
pub const FNAME_TABLE: &str = "fname";
/// Task credential snapshots.
pub const TASK_CRED_TABLE: &str = "task_cred";
/// Task security label snapshots.
pub const TASK_LABEL_TABLE: &str = "task_label";

/// Subject and object kinds with a scalar table in the built-in set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
	Subject,
	Object,
	Inode,
	Dentry,
	File,
	Superblock,
	Ipc,
	Key,
	Shm,
	Sem,
	Namespace,
}

impl ObjectKind {
	pub const ALL: [ObjectKind; 11] = [
		Self::Subject,
		Self::Object,
		Self::Inode,
		Self::Dentry,
		Self::File,
		Self::Superblock,
		Self::Ipc,
		Self::Key,
		Self::Shm,
		Self::Sem,
		Self::Namespace,
	];

	/// Name of the kind's table in the built-in set.
	pub const fn table_name(self) -> &'static str {
		match self {
			Self::Subject => "subject",
			Self::Object => "object",
			Self::Inode => "inode",
			Self::Dentry => "dentry",
			Self::File => "file",
			Self::Superblock => "superblock",
			Self::Ipc => "ipc",
			Self::Key => "key",
			Self::Shm => "shm",
			Self::Sem => "sem",
			Self::Namespace => "namespace",
		}
	}
}

impl fmt::Display for ObjectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.table_name())
	}
}
