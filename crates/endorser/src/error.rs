//! Error types for endorser tables and their configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::retention::RetentionKind;
use crate::variant::Variant;

/// Errors raised while building or mutating endorser tables.
///
/// Verify never produces an error: mismatches and absent keys are ordinary
/// negative results.
#[derive(Debug, Error)]
pub enum Error {
	/// The payload's shape does not fit the table's variant.
	#[error("table {table}: {variant} table cannot store a {given} payload")]
	PayloadShape {
		/// Table that rejected the payload.
		table: String,
		/// The table's variant.
		variant: Variant,
		/// Shape of the rejected payload ("bytes" or "scalar").
		given: &'static str,
	},

	/// The key is already endorsed and the table rejects duplicates.
	#[error("table {table}: key {key:#x} is already endorsed")]
	Duplicate {
		/// Table that rejected the record.
		table: String,
		/// The duplicate key.
		key: u64,
	},

	/// The bucket width is outside the supported range.
	#[error("table {table}: {bits} bucket bits exceeds the maximum of {max}")]
	InvalidBits {
		/// Table being declared.
		table: String,
		/// Requested bucket bits.
		bits: u8,
		/// Largest accepted value.
		max: u8,
	},

	/// The name capacity is outside the supported range.
	#[error("table {table}: name capacity {capacity} is outside 1..={max}")]
	InvalidCapacity {
		/// Table being declared.
		table: String,
		/// Requested capacity.
		capacity: usize,
		/// Largest accepted value.
		max: usize,
	},

	/// Two tables were declared under the same name.
	#[error("table {0} is declared more than once")]
	DuplicateTable(String),

	/// No table exists under the requested name.
	#[error("unknown table: {0}")]
	UnknownTable(String),

	/// The table exists but was declared with a different retention.
	#[error("table {table} is {actual}, not {expected}")]
	RetentionMismatch {
		/// Table that was looked up.
		table: String,
		/// Retention the caller asked for.
		expected: RetentionKind,
		/// Retention the table was declared with.
		actual: RetentionKind,
	},

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML configuration.
	#[error("config parse error: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Result type for endorser operations.
pub type Result<T> = std::result::Result<T, Error>;
