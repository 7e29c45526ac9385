//! Subscription and transaction storage.
//!
//! The store is the only state shared between the sync engine (the single writer of
//! transactions and of the watermark) and the query facade (subscriptions and reads).
//! Implementations must be safe to call from any number of threads at once.

use crate::gateway::TransactionRecord;
use std::collections::HashSet;

mod memory;

pub use memory::InMemoryTransactionStore;

/// Storage contract for subscriptions, per-address transaction logs and the sync watermark.
///
/// Address arguments are normalized by every implementation, so `0xABC` and `0xabc` name the
/// same subscription.
pub trait TransactionStore: Send + Sync {
	/// Highest fully processed block, `0` if nothing has been synced yet.
	fn watermark(&self) -> u64;

	/// Replace the watermark.
	///
	/// Monotonicity is not checked here. The sync engine is the only writer and only ever
	/// moves it forward.
	fn set_watermark(&self, block: u64);

	/// Track `address`, creating an empty log if it is not tracked yet.
	fn subscribe(&self, address: &str);

	/// Snapshot of the tracked addresses at call time.
	fn subscribed_addresses(&self) -> HashSet<String>;

	/// Append `record` to the log of `address`, subscribing the address if needed.
	/// Records are not deduplicated.
	fn append_transaction(&self, address: &str, record: TransactionRecord);

	/// Snapshot of the log of `address`, empty if it was never subscribed.
	fn transactions(&self, address: &str) -> Vec<TransactionRecord>;

	/// Number of tracked addresses.
	fn subscription_count(&self) -> usize {
		self.subscribed_addresses().len()
	}
}
