//! Block synchronization engine.
//!
//! The `SyncEngine` owns the only writer path into the store. Each pass:
//!
//! 1. asks the chain data source for the current height,
//! 2. derives the range to process from the watermark (a fresh store starts at the chain head,
//!    with no backfill),
//! 3. snapshots the subscriptions once for the whole pass,
//! 4. fetches blocks strictly in increasing order, appends every transaction whose sender or
//!    recipient is subscribed, and moves the watermark to a block only after all of its matches
//!    have been appended.
//!
//! A failed block fetch ends the pass on that block, so the watermark never skips a block and
//! the next pass starts again from it. Passes never terminate the engine: failures are reported
//! and the next pass is scheduled on the fast retry delay.

use crate::gateway::{ChainDataSource, GatewayError, TransactionRecord};
use crate::store::TransactionStore;
use crate::sync::{
	EventDispatcher, LoggingEventHandler, PassOutcome, PassScheduler, SyncConfig, SyncError,
	SyncEvent, SyncEventHandler, SyncProgressTracker, SyncStats,
};
use crate::utils::normalize_address;

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Background synchronizer between a chain data source and a transaction store.
pub struct SyncEngine {
	source: Arc<dyn ChainDataSource>,
	store: Arc<dyn TransactionStore>,
	config: SyncConfig,
	event_dispatcher: EventDispatcher,
	progress_tracker: SyncProgressTracker,
}

impl SyncEngine {
	/// Create an engine with the default logging handler registered.
	pub fn new(
		source: Arc<dyn ChainDataSource>,
		store: Arc<dyn TransactionStore>,
		config: SyncConfig,
	) -> Self {
		let mut event_dispatcher = EventDispatcher::new();
		event_dispatcher.register_handler(Box::new(LoggingEventHandler));

		Self {
			source,
			store,
			config,
			event_dispatcher,
			progress_tracker: SyncProgressTracker::new(),
		}
	}

	/// Register an additional observer for sync events.
	pub fn register_handler(&mut self, handler: Box<dyn SyncEventHandler>) {
		self.event_dispatcher.register_handler(handler);
	}

	pub fn config(&self) -> &SyncConfig {
		&self.config
	}

	pub fn stats(&self) -> SyncStats {
		self.progress_tracker.get_stats()
	}

	/// Run the engine on its own tokio task.
	pub fn spawn(self) -> JoinHandle<()> {
		tokio::spawn(self.run())
	}

	/// Run passes forever.
	pub async fn run(mut self) {
		info!(
			"Starting block sync (poll every {:?}, retry after {:?}, request timeout {:?})",
			self.config.poll_interval, self.config.retry_interval, self.config.request_timeout
		);

		let mut scheduler = PassScheduler::new(&self.config);

		loop {
			let delay = match self.run_pass().await {
				Ok(outcome) if outcome.needs_retry() => scheduler.after_failure(),
				Ok(_) => scheduler.after_success(),
				Err(e) => {
					error!("Sync pass failed: {}", e);
					self.progress_tracker.record_failed_pass();
					self.event_dispatcher
						.dispatch(&SyncEvent::PassFailed {
							error: e.to_string(),
						})
						.await;
					scheduler.after_failure()
				}
			};

			debug!("Next sync pass in {:?}", delay);
			tokio::time::sleep(delay).await;
		}
	}

	/// Run a single discover-and-process pass.
	///
	/// # Errors
	/// Returns `SyncError` when the chain height cannot be discovered or the block range cannot be
	/// computed. Block fetch failures are not errors: they end the pass with
	/// `PassOutcome::Interrupted`.
	pub async fn run_pass(&mut self) -> Result<PassOutcome, SyncError> {
		self.progress_tracker.record_pass();

		let height = bounded(self.config.request_timeout, self.source.current_height()).await?;
		let watermark = self.store.watermark();
		let first_sync = watermark == 0;

		if first_sync && height == 0 {
			debug!("Chain is still at genesis, nothing to track yet");
			return Ok(PassOutcome::Idle { height, watermark });
		}

		if !first_sync && height <= watermark {
			if height < watermark {
				warn!(
					"Upstream reports height {} below synced block {}, waiting for it to catch up",
					height, watermark
				);
			} else {
				debug!("Already synced to block {}", watermark);
			}
			return Ok(PassOutcome::Idle { height, watermark });
		}

		let from = if first_sync {
			info!("No block synced yet, starting from chain head {}", height);
			height
		} else {
			watermark.checked_add(1).ok_or_else(|| {
				SyncError::Internal(format!("watermark {} cannot advance", watermark))
			})?
		};

		let subscriptions = self.store.subscribed_addresses();
		debug!(
			"Syncing blocks {} to {} against {} subscriptions",
			from,
			height,
			subscriptions.len()
		);

		for block in from..=height {
			let transactions =
				match bounded(self.config.request_timeout, self.source.block_transactions(block))
					.await
				{
					Ok(transactions) => transactions,
					Err(e) => {
						warn!("Failed to fetch block {}: {}", block, e);
						self.progress_tracker.record_fetch_failure();
						self.event_dispatcher
							.dispatch(&SyncEvent::BlockFetchFailed {
								block,
								error: e.to_string(),
							})
							.await;
						return Ok(PassOutcome::Interrupted {
							failed_block: block,
							watermark: self.store.watermark(),
							error: e,
						});
					}
				};

			let scanned = transactions.len();
			let matched = self.ingest_block(block, transactions, &subscriptions).await;

			self.store.set_watermark(block);
			self.progress_tracker.record_block(block, scanned, matched);

			if first_sync {
				self.event_dispatcher
					.dispatch(&SyncEvent::WatermarkInitialized { block })
					.await;
			}
			self.event_dispatcher
				.dispatch(&SyncEvent::BlockProcessed {
					block,
					transactions: scanned,
					matched,
				})
				.await;
		}

		self.progress_tracker.log_progress(false);

		if first_sync {
			Ok(PassOutcome::Initialized { height })
		} else {
			Ok(PassOutcome::Advanced { from, to: height })
		}
	}

	/// Append the transactions of `block` that touch a subscribed address.
	///
	/// Sender and recipient are matched independently, so a transaction between two subscribed
	/// addresses (or from an address to itself) is appended once per role.
	async fn ingest_block(
		&mut self,
		block: u64,
		transactions: Vec<TransactionRecord>,
		subscriptions: &HashSet<String>,
	) -> usize {
		let mut matched = 0;

		for transaction in transactions {
			let sender = normalize_address(&transaction.from);
			let recipient = transaction.to.as_deref().map(normalize_address);

			let parties = [Some(sender), recipient];
			for address in parties.into_iter().flatten() {
				if !subscriptions.contains(&address) {
					continue;
				}

				self.store
					.append_transaction(&address, transaction.clone());
				matched += 1;

				self.event_dispatcher
					.dispatch(&SyncEvent::TransactionMatched {
						address,
						block,
						hash: transaction.hash.clone(),
					})
					.await;
			}
		}

		matched
	}
}

/// Bound an upstream call by `timeout`; an elapsed timeout counts as a failed call.
async fn bounded<T>(
	timeout: Duration,
	call: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, SyncError> {
	match tokio::time::timeout(timeout, call).await {
		Ok(result) => Ok(result?),
		Err(_) => Err(SyncError::Timeout(timeout)),
	}
}
