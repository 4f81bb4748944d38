use proptest::prelude::*;

use super::*;

#[test]
fn test_compose_places_halves() {
	assert_eq!(compose(0, 0), 0);
	assert_eq!(compose(1, 0), 1 << 32);
	assert_eq!(compose(0, 7), 7);
	assert_eq!(compose(u32::MAX, u32::MAX), u64::MAX);
	assert_eq!(compose(0xdead_beef, 0x1234_5678), 0xdead_beef_1234_5678);
}

#[test]
fn test_task_and_inode_keys() {
	assert_eq!(task_key(100, 101), (100u64 << 32) | 101);
	assert_eq!(inode_key(8, 42), (8u64 << 32) | 42);
	// Swapping fields gives a different key.
	assert_ne!(task_key(1, 2), task_key(2, 1));
}

#[test]
fn test_namespace_key_is_seeded() {
	let a = namespace_key(b"mnt", 0);
	assert_eq!(a, namespace_key(b"mnt", 0));
	assert_ne!(a, namespace_key(b"mnt", 1));
	assert_ne!(a, namespace_key(b"net", 0));
}

proptest! {
	#[test]
	fn prop_split_inverts_compose(hi in any::<u32>(), lo in any::<u32>()) {
		prop_assert_eq!(split(compose(hi, lo)), (hi, lo));
	}

	#[test]
	fn prop_compose_is_injective(a in any::<(u32, u32)>(), b in any::<(u32, u32)>()) {
		prop_assume!(a != b);
		prop_assert_ne!(compose(a.0, a.1), compose(b.0, b.1));
	}
}
