//! Singly-linked bucket chains.
//!
//! Each bucket of a table is a [`Chain`]: a list of nodes linked through a
//! `next` field stored in the node itself. New entries go to the head. Keys are
//! unique within a table, so at most one node in a chain carries a given key.

use crate::variant::Payload;

#[cfg(test)]
mod tests;

type Link = Option<Box<Node>>;

struct Node {
	key: u64,
	payload: Payload,
	next: Link,
}

/// One hash bucket.
#[derive(Default)]
pub(crate) struct Chain {
	head: Link,
}

impl Chain {
	/// Links a new node at the head of the chain.
	pub(crate) fn push_front(&mut self, key: u64, payload: Payload) {
		let next = self.head.take();
		self.head = Some(Box::new(Node { key, payload, next }));
	}

	pub(crate) fn find(&self, key: u64) -> Option<&Payload> {
		let mut link = self.head.as_deref();
		while let Some(node) = link {
			if node.key == key {
				return Some(&node.payload);
			}
			link = node.next.as_deref();
		}
		None
	}

	pub(crate) fn find_mut(&mut self, key: u64) -> Option<&mut Payload> {
		let mut link = self.head.as_deref_mut();
		while let Some(node) = link {
			if node.key == key {
				return Some(&mut node.payload);
			}
			link = node.next.as_deref_mut();
		}
		None
	}

	/// Unlinks the node for `key` and hands back its payload.
	pub(crate) fn unlink(&mut self, key: u64) -> Option<Payload> {
		let mut cursor = &mut self.head;
		while cursor.as_ref().is_some_and(|node| node.key != key) {
			cursor = &mut cursor.as_mut()?.next;
		}
		let node = cursor.take()?;
		let Node { payload, next, .. } = *node;
		*cursor = next;
		Some(payload)
	}

	/// Releases every node, returning how many were released.
	pub(crate) fn drain(&mut self) -> usize {
		let mut released = 0;
		let mut link = self.head.take();
		while let Some(mut node) = link {
			link = node.next.take();
			released += 1;
		}
		released
	}

	pub(crate) fn len(&self) -> usize {
		let mut len = 0;
		let mut link = self.head.as_deref();
		while let Some(node) = link {
			len += 1;
			link = node.next.as_deref();
		}
		len
	}

	/// Keys from head to tail.
	#[cfg(test)]
	pub(crate) fn keys(&self) -> Vec<u64> {
		let mut keys = Vec::new();
		let mut link = self.head.as_deref();
		while let Some(node) = link {
			keys.push(node.key);
			link = node.next.as_deref();
		}
		keys
	}
}

impl Drop for Chain {
	// Iterative so long chains cannot overflow the stack through nested drops.
	fn drop(&mut self) {
		self.drain();
	}
}
