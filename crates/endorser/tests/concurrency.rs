//! Parallel access to endorser tables.

use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use amulet_endorser::{AppendOnly, Evictable, Registry, RegistryConfig, Table, Variant};
use amulet_keys::{inode_key, task_key};

const READERS: usize = 100;

#[test]
fn readers_share_the_lock() {
	let table = Table::<Evictable>::create("task_label", 6, Variant::Blob).unwrap();
	let key = task_key(100, 101);
	table.record(key, b"system_u:system_r:init_t".to_vec()).unwrap();

	let held = table.find(key).unwrap();
	thread::scope(|s| {
		let handles: Vec<_> = (0..READERS)
			.map(|_| s.spawn(|| table.verify(key, b"system_u:system_r:init_t")))
			.collect();
		for handle in handles {
			assert!(handle.join().unwrap());
		}
	});
	assert_eq!(held.as_bytes(), Some(&b"system_u:system_r:init_t"[..]));

	assert_eq!(table.counters().verify_successes(), READERS as u64);
	assert_eq!(table.counters().verify_failures(), 0);
}

#[test]
fn find_then_verify_with_a_writer_queued() {
	let table = Table::<Evictable>::create("subject", 4, Variant::Scalar).unwrap();
	table.record(1, 10u64).unwrap();
	let found = Barrier::new(2);
	let written = AtomicBool::new(false);

	thread::scope(|s| {
		let reader = s.spawn(|| {
			let payload = table.find(1);
			found.wait();
			while !written.load(Ordering::Acquire) {
				assert!(table.verify(1, 10u64));
			}
			table.record(3, 30u64).unwrap();
			(payload, table.verify(1, 10u64))
		});

		found.wait();
		table.record(2, 20u64).unwrap();
		written.store(true, Ordering::Release);

		let (payload, matched) = reader.join().unwrap();
		assert_eq!(payload.and_then(|p| p.as_scalar()), Some(10));
		assert!(matched);
	});

	assert_eq!(table.len(), 3);
	assert_eq!(table.counters().inserts(), 3);
}

#[test]
fn writer_on_another_key_does_not_disturb_readers() {
	let table = Table::<Evictable>::create("subject", 8, Variant::Scalar).unwrap();
	let endorsed = task_key(1, 1);
	let churned = task_key(2, 2);
	table.record(endorsed, 0xfeed_u64).unwrap();

	let barrier = Barrier::new(READERS + 1);
	let done = AtomicBool::new(false);
	let churns = AtomicUsize::new(0);

	thread::scope(|s| {
		s.spawn(|| {
			barrier.wait();
			while !done.load(Ordering::Relaxed) {
				table.record(churned, 1u64).unwrap();
				assert!(table.remove(churned));
				churns.fetch_add(1, Ordering::Relaxed);
			}
		});

		let readers: Vec<_> = (0..READERS)
			.map(|_| {
				s.spawn(|| {
					barrier.wait();
					(0..50).all(|_| table.verify(endorsed, 0xfeed_u64))
				})
			})
			.collect();
		for reader in readers {
			assert!(reader.join().unwrap());
		}
		done.store(true, Ordering::Relaxed);
	});

	let churns = churns.load(Ordering::Relaxed) as u64;
	let counters = table.counters().snapshot();
	assert_eq!(counters.verify_successes, READERS as u64 * 50);
	assert_eq!(counters.verify_failures, 0);
	assert_eq!(counters.removals, churns);
	assert_eq!(counters.inserts, churns + 1);
	assert!(table.verify(endorsed, 0xfeed_u64));
}

#[test]
fn racing_add_if_absent_inserts_once() {
	let table = Table::<AppendOnly>::create("fname", 4, Variant::name(64)).unwrap();
	let key = inode_key(8, 4242);
	let barrier = Barrier::new(16);

	let winners: Vec<usize> = thread::scope(|s| {
		let handles: Vec<_> = (0..16)
			.map(|i| {
				let (table, barrier) = (&table, &barrier);
				s.spawn(move || {
					barrier.wait();
					table.add_if_absent(key, format!("/proc/{i}")).unwrap().then_some(i)
				})
			})
			.collect();
		handles
			.into_iter()
			.filter_map(|handle| handle.join().unwrap())
			.collect()
	});

	assert_eq!(winners.len(), 1);
	assert!(table.verify(key, format!("/proc/{}", winners[0]).as_str()));
	assert_eq!(table.counters().inserts(), 1);
	assert_eq!(table.len(), 1);
}

#[test]
fn tables_are_independent() {
	let registry = Registry::from_config(&RegistryConfig::default()).unwrap();
	let inode = registry.evictable("inode").unwrap();
	let file = registry.evictable("file").unwrap();

	thread::scope(|s| {
		for t in 0..4u32 {
			let (inode, file) = (&inode, &file);
			s.spawn(move || {
				for i in 0..256u32 {
					let key = inode_key(t, i);
					inode.record(key, u64::from(i)).unwrap();
					file.record(key, u64::from(t)).unwrap();
				}
			});
		}
	});

	assert_eq!(inode.len(), 4 * 256);
	assert_eq!(file.len(), 4 * 256);
	assert!(inode.verify(inode_key(3, 7), 7u64));
	assert!(file.verify(inode_key(3, 7), 3u64));
	assert_eq!(registry.global_counters().inserts(), 2 * 4 * 256);
	assert_eq!(registry.shutdown(), 2 * 4 * 256);
}
