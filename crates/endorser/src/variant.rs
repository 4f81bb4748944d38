//! Payload variants an endorser table can hold.
//!
//! A table picks one [`Variant`] at creation. The variant decides how an
//! incoming [`Value`] becomes a stored [`Payload`] and how a stored payload is
//! compared against a [`Probe`]:
//!
//! | Variant | Stored as | Matches when |
//! |---|---|---|
//! | [`Variant::Blob`] | the caller's buffer, moved in | lengths and bytes are equal |
//! | [`Variant::Name`] | truncated, NUL-bounded inline buffer | bounded C-string compare over the capacity |
//! | [`Variant::Scalar`] | `u64` | integers are equal |

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;


/// Names up to this many bytes are stored without a heap allocation.
pub const NAME_INLINE: usize = 64;

/// Name capacity used when a configuration omits one.
pub const DEFAULT_NAME_CAPACITY: usize = 64;

/// Largest accepted name capacity, terminator included.
pub const MAX_NAME_CAPACITY: usize = 4096;

fn default_name_capacity() -> usize {
	DEFAULT_NAME_CAPACITY
}

/// Payload representation and comparison rule of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variant {
	/// Opaque byte buffer of any length.
	Blob,
	/// Fixed-capacity string. `capacity` counts the terminator, so at most
	/// `capacity - 1` bytes are kept.
	Name {
		#[serde(default = "default_name_capacity")]
		capacity: usize,
	},
	/// 64-bit unsigned integer.
	Scalar,
}

impl Variant {
	/// Name variant with the given capacity.
	pub const fn name(capacity: usize) -> Self {
		Self::Name { capacity }
	}

	/// Short lowercase label (`blob`, `name`, `scalar`).
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Blob => "blob",
			Self::Name { .. } => "name",
			Self::Scalar => "scalar",
		}
	}

	/// Turns an owned value into the payload this variant stores.
	///
	/// On a shape mismatch the value is dropped and the rejected shape is
	/// returned.
	pub(crate) fn admit(self, value: Value) -> Result<Payload, &'static str> {
		match (self, value) {
			(Self::Blob, Value::Bytes(bytes)) => Ok(Payload::Blob(bytes.into_boxed_slice())),
			(Self::Name { capacity }, Value::Bytes(bytes)) => {
				Ok(Payload::Name(InlineName::truncate(&bytes, capacity)))
			}
			(Self::Scalar, Value::Scalar(value)) => Ok(Payload::Scalar(value)),
			(_, value) => Err(value.shape()),
		}
	}
}

impl fmt::Display for Variant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Name { capacity } => write!(f, "name[{capacity}]"),
			other => f.write_str(other.as_str()),
		}
	}
}

/// Owned input to a record.
///
/// Recording consumes the value: a blob table keeps the buffer itself, so the
/// caller cannot observe or mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	/// Bytes for blob and name tables.
	Bytes(Vec<u8>),
	/// Integer for scalar tables.
	Scalar(u64),
}

impl Value {
	pub(crate) const fn shape(&self) -> &'static str {
		match self {
			Self::Bytes(_) => "bytes",
			Self::Scalar(_) => "scalar",
		}
	}
}

impl From<Vec<u8>> for Value {
	fn from(bytes: Vec<u8>) -> Self {
		Self::Bytes(bytes)
	}
}

impl From<Box<[u8]>> for Value {
	fn from(bytes: Box<[u8]>) -> Self {
		Self::Bytes(bytes.into_vec())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::Bytes(s.into_bytes())
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Self::Scalar(value)
	}
}

/// Borrowed input to a verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe<'a> {
	/// Bytes compared against blob and name payloads.
	Bytes(&'a [u8]),
	/// Integer compared against scalar payloads.
	Scalar(u64),
}

impl<'a> From<&'a [u8]> for Probe<'a> {
	fn from(bytes: &'a [u8]) -> Self {
		Self::Bytes(bytes)
	}
}

impl<'a, const N: usize> From<&'a [u8; N]> for Probe<'a> {
	fn from(bytes: &'a [u8; N]) -> Self {
		Self::Bytes(bytes)
	}
}

impl<'a> From<&'a Vec<u8>> for Probe<'a> {
	fn from(bytes: &'a Vec<u8>) -> Self {
		Self::Bytes(bytes)
	}
}

impl<'a> From<&'a str> for Probe<'a> {
	fn from(s: &'a str) -> Self {
		Self::Bytes(s.as_bytes())
	}
}

impl From<u64> for Probe<'_> {
	fn from(value: u64) -> Self {
		Self::Scalar(value)
	}
}

/// A stored endorsement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
	/// Owned byte buffer.
	Blob(Box<[u8]>),
	/// Truncated name.
	Name(InlineName),
	/// Integer.
	Scalar(u64),
}

impl Payload {
	/// Applies the variant's comparison rule.
	///
	/// A probe of the wrong shape never matches.
	pub fn matches(&self, probe: Probe<'_>) -> bool {
		match (self, probe) {
			(Self::Blob(stored), Probe::Bytes(probe)) => {
				stored.len() == probe.len() && **stored == *probe
			}
			(Self::Name(stored), Probe::Bytes(probe)) => stored.matches(probe),
			(Self::Scalar(stored), Probe::Scalar(probe)) => *stored == probe,
			_ => false,
		}
	}

	/// Stored bytes for blob and name payloads.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::Blob(bytes) => Some(bytes),
			Self::Name(name) => Some(name.as_bytes()),
			Self::Scalar(_) => None,
		}
	}

	/// Stored integer for scalar payloads.
	pub fn as_scalar(&self) -> Option<u64> {
		match self {
			Self::Scalar(value) => Some(*value),
			_ => None,
		}
	}
}

/// Name truncated to a fixed capacity.
///
/// Holds at most `capacity - 1` bytes and never a NUL; the terminator is
/// implied by the length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineName {
	bytes: SmallVec<[u8; NAME_INLINE]>,
}

impl InlineName {
	/// Copies `src` up to its first NUL, keeping at most `capacity - 1` bytes.
	pub fn truncate(src: &[u8], capacity: usize) -> Self {
		let end = c_prefix(src).len().min(capacity.saturating_sub(1));
		Self {
			bytes: SmallVec::from_slice(&src[..end]),
		}
	}

	/// Stored bytes without the terminator.
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Stored name as UTF-8, if it is valid.
	pub fn as_str(&self) -> Option<&str> {
		std::str::from_utf8(&self.bytes).ok()
	}

	/// Whether the name spilled out of its inline buffer.
	pub fn spilled(&self) -> bool {
		self.bytes.spilled()
	}

	/// Bounded C-string comparison against `probe`.
	///
	/// The stored name always terminates inside the capacity, so comparing
	/// over the capacity reduces to equality with the probe's NUL-bounded
	/// prefix.
	fn matches(&self, probe: &[u8]) -> bool {
		self.bytes.as_slice() == c_prefix(probe)
	}
}

/// Bytes of `src` before its first NUL.
fn c_prefix(src: &[u8]) -> &[u8] {
	match src.iter().position(|&b| b == 0) {
		Some(end) => &src[..end],
		None => src,
	}
}
