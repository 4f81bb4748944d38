use super::*;

fn scalar_chain(keys: &[u64]) -> Chain {
	let mut chain = Chain::default();
	for &key in keys {
		chain.push_front(key, Payload::Scalar(key * 10));
	}
	chain
}

#[test]
fn test_push_front_orders_newest_first() {
	let chain = scalar_chain(&[1, 2, 3]);
	assert_eq!(chain.keys(), vec![3, 2, 1]);
	assert_eq!(chain.len(), 3);
}

#[test]
fn test_find_and_find_mut() {
	let mut chain = scalar_chain(&[1, 9, 17]);
	assert_eq!(chain.find(9), Some(&Payload::Scalar(90)));
	assert_eq!(chain.find(2), None);

	*chain.find_mut(17).unwrap() = Payload::Scalar(5);
	assert_eq!(chain.find(17), Some(&Payload::Scalar(5)));
	assert!(chain.find_mut(4).is_none());
}

#[test]
fn test_unlink_head_middle_tail() {
	let mut chain = scalar_chain(&[1, 2, 3, 4]);

	assert_eq!(chain.unlink(4), Some(Payload::Scalar(40)));
	assert_eq!(chain.keys(), vec![3, 2, 1]);

	assert_eq!(chain.unlink(2), Some(Payload::Scalar(20)));
	assert_eq!(chain.keys(), vec![3, 1]);

	assert_eq!(chain.unlink(1), Some(Payload::Scalar(10)));
	assert_eq!(chain.keys(), vec![3]);

	assert_eq!(chain.unlink(1), None);
	assert_eq!(chain.unlink(3), Some(Payload::Scalar(30)));
	assert_eq!(chain.len(), 0);
	assert_eq!(chain.unlink(3), None);
}

#[test]
fn test_drain_releases_everything() {
	let mut chain = scalar_chain(&[5, 6, 7]);
	assert_eq!(chain.drain(), 3);
	assert_eq!(chain.len(), 0);
	assert_eq!(chain.drain(), 0);
}

#[test]
fn test_long_chain_drops_without_recursion() {
	let mut chain = Chain::default();
	for key in 0..200_000 {
		chain.push_front(key, Payload::Scalar(key));
	}
	drop(chain);
}
