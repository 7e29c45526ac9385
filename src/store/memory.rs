use super::TransactionStore;
use crate::gateway::TransactionRecord;
use crate::utils::normalize_address;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-lifetime store kept entirely in memory.
///
/// The watermark lives in an atomic since it has a single writer; subscriptions and logs sit
/// behind one reader-writer lock. Every critical section leaves the map consistent, so a
/// poisoned lock is recovered rather than propagated.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
	watermark: AtomicU64,
	logs: RwLock<HashMap<String, Vec<TransactionRecord>>>,
}

impl InMemoryTransactionStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<TransactionRecord>>> {
		self.logs.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<TransactionRecord>>> {
		self.logs.write().unwrap_or_else(PoisonError::into_inner)
	}
}

impl TransactionStore for InMemoryTransactionStore {
	fn watermark(&self) -> u64 {
		self.watermark.load(Ordering::Acquire)
	}

	fn set_watermark(&self, block: u64) {
		self.watermark.store(block, Ordering::Release);
	}

	fn subscribe(&self, address: &str) {
		self.write().entry(normalize_address(address)).or_default();
	}

	fn subscribed_addresses(&self) -> HashSet<String> {
		self.read().keys().cloned().collect()
	}

	fn append_transaction(&self, address: &str, record: TransactionRecord) {
		self.write()
			.entry(normalize_address(address))
			.or_default()
			.push(record);
	}

	fn transactions(&self, address: &str) -> Vec<TransactionRecord> {
		self.read()
			.get(&normalize_address(address))
			.cloned()
			.unwrap_or_default()
	}

	fn subscription_count(&self) -> usize {
		self.read().len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::thread;

	fn record(hash: &str) -> TransactionRecord {
		TransactionRecord {
			hash: hash.to_string(),
			from: "0xaaa".to_string(),
			to: Some("0xbbb".to_string()),
			..Default::default()
		}
	}

	#[test]
	fn watermark_starts_unset_and_is_not_clamped() {
		let store = InMemoryTransactionStore::new();
		assert_eq!(store.watermark(), 0);

		store.set_watermark(100);
		assert_eq!(store.watermark(), 100);

		// The store takes whatever it is given; ordering is the engine's job.
		store.set_watermark(90);
		assert_eq!(store.watermark(), 90);
	}

	#[test]
	fn subscribe_is_idempotent_and_case_insensitive() {
		let store = InMemoryTransactionStore::new();
		store.subscribe("0xABC");
		assert_eq!(store.subscription_count(), 1);
		assert!(store.transactions("0xabc").is_empty());

		store.append_transaction("0xabc", record("0x01"));
		store.subscribe("0xabc");
		store.subscribe("0xAbC");

		assert_eq!(store.subscription_count(), 1);
		assert_eq!(store.transactions("0xABC"), vec![record("0x01")]);
		assert_eq!(store.transactions("0xABC"), store.transactions("0xabc"));
	}

	#[test]
	fn append_auto_subscribes_and_keeps_duplicates() {
		let store = InMemoryTransactionStore::new();
		store.append_transaction("0xDEF", record("0x01"));
		store.append_transaction("0xdef", record("0x01"));

		assert_eq!(
			store.subscribed_addresses(),
			HashSet::from(["0xdef".to_string()])
		);
		assert_eq!(store.transactions("0xdef").len(), 2);
	}

	#[test]
	fn unknown_address_reads_empty() {
		let store = InMemoryTransactionStore::new();
		assert!(store.transactions("0x404").is_empty());
		assert_eq!(store.subscription_count(), 0);
	}

	#[test]
	fn snapshots_do_not_observe_later_writes() {
		let store = InMemoryTransactionStore::new();
		store.subscribe("0xaaa");
		store.append_transaction("0xaaa", record("0x01"));

		let addresses = store.subscribed_addresses();
		let log = store.transactions("0xaaa");

		store.subscribe("0xccc");
		store.append_transaction("0xaaa", record("0x02"));

		assert_eq!(addresses.len(), 1);
		assert_eq!(log.len(), 1);
		assert_eq!(store.transactions("0xaaa").len(), 2);
	}

	#[test]
	fn log_preserves_append_order() {
		let store = InMemoryTransactionStore::new();
		for hash in ["0x10", "0x11", "0x12"] {
			store.append_transaction("0xaaa", record(hash));
		}
		let hashes: Vec<String> = store
			.transactions("0xaaa")
			.into_iter()
			.map(|tx| tx.hash)
			.collect();
		assert_eq!(hashes, vec!["0x10", "0x11", "0x12"]);
	}

	#[test]
	fn concurrent_readers_and_writers() {
		const WRITERS: usize = 8;
		const PER_WRITER: usize = 200;

		let store = Arc::new(InMemoryTransactionStore::new());
		let mut handles = Vec::new();

		for writer in 0..WRITERS {
			let store = store.clone();
			handles.push(thread::spawn(move || {
				let address = format!("0xW{}", writer);
				store.subscribe(&address);
				for i in 0..PER_WRITER {
					store.append_transaction(&address, record(&format!("{}-{}", writer, i)));
				}
			}));
		}

		for _ in 0..4 {
			let store = store.clone();
			handles.push(thread::spawn(move || {
				for _ in 0..PER_WRITER {
					for address in store.subscribed_addresses() {
						let log = store.transactions(&address);
						assert!(log.len() <= PER_WRITER);
					}
				}
			}));
		}

		for handle in handles {
			handle.join().unwrap();
		}

		assert_eq!(store.subscription_count(), WRITERS);
		for writer in 0..WRITERS {
			let log = store.transactions(&format!("0xw{}", writer));
			assert_eq!(log.len(), PER_WRITER);
			let expected: Vec<String> = (0..PER_WRITER)
				.map(|i| format!("{}-{}", writer, i))
				.collect();
			let hashes: Vec<String> = log.into_iter().map(|tx| tx.hash).collect();
			assert_eq!(hashes, expected);
		}
	}
}
