//! Event system for block synchronization.
//!
//! The engine reports what it does as `SyncEvent`s: the first watermark, every processed
//! block, every transaction matched to a subscription, and failures. Events go through an
//! `EventDispatcher` to every registered `SyncEventHandler`, which keeps observers (logging,
//! notifications, tests) out of the engine's control flow.

use super::SyncError;
use tracing::{debug, info};

/// Events that occur during block synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
	/// First sync: tracking starts at `block`, earlier history is skipped
	WatermarkInitialized { block: u64 },
	/// A block was fully ingested and the watermark moved to it
	BlockProcessed {
		block: u64,
		transactions: usize,
		matched: usize,
	},
	/// A transaction was appended to the log of a subscribed address
	TransactionMatched {
		address: String,
		block: u64,
		hash: String,
	},
	/// Fetching a block failed; the rest of the pass was abandoned
	BlockFetchFailed { block: u64, error: String },
	/// A whole pass failed before any block could be processed
	PassFailed { error: String },
}

/// Trait for handling sync events.
///
/// Implementors receive all sync events and can perform side effects.
#[async_trait::async_trait]
pub trait SyncEventHandler: Send + Sync {
	/// Handle a sync event.
	async fn handle(&mut self, event: &SyncEvent) -> Result<(), SyncError>;

	/// Get the name of this handler for logging and diagnostics.
	fn name(&self) -> &'static str;
}

/// Event dispatcher that manages multiple event handlers.
///
/// Errors from handlers are logged and never stop the other handlers or the engine.
#[derive(Default)]
pub struct EventDispatcher {
	handlers: Vec<Box<dyn SyncEventHandler>>,
}

impl EventDispatcher {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a new event handler. Handlers run in registration order.
	pub fn register_handler(&mut self, handler: Box<dyn SyncEventHandler>) {
		self.handlers.push(handler);
	}

	pub fn handler_count(&self) -> usize {
		self.handlers.len()
	}

	/// Dispatch an event to all registered handlers.
	pub async fn dispatch(&mut self, event: &SyncEvent) {
		for handler in &mut self.handlers {
			if let Err(e) = handler.handle(event).await {
				tracing::error!("Handler {} failed to process event: {}", handler.name(), e);
			}
		}
	}
}

/// Default handler that reports sync activity through `tracing`.
pub struct LoggingEventHandler;

#[async_trait::async_trait]
impl SyncEventHandler for LoggingEventHandler {
	async fn handle(&mut self, event: &SyncEvent) -> Result<(), SyncError> {
		match event {
			SyncEvent::WatermarkInitialized { block } => {
				info!("Tracking starts at block {}", block);
			}
			SyncEvent::BlockProcessed {
				block,
				transactions,
				matched,
			} => {
				debug!(
					"Processed block {}: {} transactions, {} matched",
					block, transactions, matched
				);
			}
			SyncEvent::TransactionMatched {
				address,
				block,
				hash,
			} => {
				info!("Transaction {} in block {} matched {}", hash, block, address);
			}
			// Failures are already reported by the engine.
			SyncEvent::BlockFetchFailed { .. } | SyncEvent::PassFailed { .. } => {}
		}
		Ok(())
	}

	fn name(&self) -> &'static str {
		"LoggingEventHandler"
	}
}
