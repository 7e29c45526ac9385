//! Query facade over the transaction store.
//!
//! `Parser` is the contract offered to callers such as a notification service that polls for
//! new transactions. Its operations never fail: upstream outages only show up as a block number
//! that stops advancing and transactions that stop arriving.

mod types;

pub use types::Transaction;

use crate::gateway::ChainDataSource;
use crate::store::{InMemoryTransactionStore, TransactionStore};
use crate::sync::{SyncConfig, SyncEngine};
use crate::utils::normalize_address;

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Operations exposed to callers.
pub trait Parser: Send + Sync {
	/// Last fully processed block, `0` before the first sync.
	fn current_block(&self) -> u64;

	/// Start observing `address`. Case-insensitive and idempotent; always returns `true`.
	fn subscribe(&self, address: &str) -> bool;

	/// Inbound and outbound transactions of `address` observed since it was subscribed,
	/// in chain order. Empty if the address was never subscribed.
	fn transactions(&self, address: &str) -> Vec<Transaction>;
}

/// `Parser` backed by a shared transaction store.
#[derive(Clone)]
pub struct EthParser {
	store: Arc<dyn TransactionStore>,
}

impl EthParser {
	pub fn new(store: Arc<dyn TransactionStore>) -> Self {
		Self { store }
	}

	/// Build an in-memory store, start the sync engine on the current tokio runtime, and
	/// return the parser together with the engine task.
	pub fn start(source: Arc<dyn ChainDataSource>, config: SyncConfig) -> (Self, JoinHandle<()>) {
		let store: Arc<dyn TransactionStore> = Arc::new(InMemoryTransactionStore::new());
		let engine = SyncEngine::new(source, store.clone(), config);
		let handle = engine.spawn();

		info!("Parser started");
		(Self::new(store), handle)
	}
}

impl Parser for EthParser {
	fn current_block(&self) -> u64 {
		self.store.watermark()
	}

	fn subscribe(&self, address: &str) -> bool {
		let address = normalize_address(address);
		self.store.subscribe(&address);
		info!("Subscribed {}", address);
		true
	}

	fn transactions(&self, address: &str) -> Vec<Transaction> {
		self.store
			.transactions(&normalize_address(address))
			.iter()
			.map(Transaction::from)
			.collect()
	}
}
