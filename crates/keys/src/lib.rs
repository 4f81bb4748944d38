//! Key construction for endorser tables.
//!
//! Endorser tables are keyed by an opaque `u64`. Most security objects are
//! identified by a pair of 32-bit fields (a coarse id and a fine id), so the
//! helpers here pack the coarse field into the high half and the fine field
//! into the low half. Packing is lossless for 32-bit inputs; narrowing wider
//! identifiers is the caller's job.
//!
//! Keys that collide after packing are still correct: the table engine chains
//! entries and compares full keys.

use xxhash_rust::xxh64::xxh64;

#[cfg(test)]
mod tests;

/// Packs `hi` into the upper 32 bits and `lo` into the lower 32 bits.
#[inline]
pub const fn compose(hi: u32, lo: u32) -> u64 {
	((hi as u64) << 32) | lo as u64
}

/// Splits a composed key back into its `(hi, lo)` halves.
#[inline]
pub const fn split(key: u64) -> (u32, u32) {
	((key >> 32) as u32, key as u32)
}

/// Key for a task: thread-group id high, thread id low.
#[inline]
pub const fn task_key(tgid: u32, pid: u32) -> u64 {
	compose(tgid, pid)
}

/// Key for an inode: device number high, inode number low.
#[inline]
pub const fn inode_key(rdev: u32, ino: u32) -> u64 {
	compose(rdev, ino)
}

/// Key for a namespace, hashed from its name with XXH64.
///
/// The same name under different seeds yields unrelated keys, which lets one
/// table hold several namespace families.
pub fn namespace_key(name: &[u8], seed: u64) -> u64 {
	xxh64(name, seed)
}
