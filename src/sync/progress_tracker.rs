//! Progress tracking for block synchronization.
//!
//! This module provides the `SyncProgressTracker`, which counts passes, processed blocks,
//! scanned and matched transactions, and failures over the life of the engine. It also
//! records any break in block contiguity so the no-gap property can be observed.

use tracing::{info, warn};

/// How many processed blocks between two progress log lines.
const LOG_EVERY_BLOCKS: u64 = 100;

/// Service for tracking synchronization progress
#[derive(Debug, Clone, Default)]
pub struct SyncProgressTracker {
	/// First block processed by this engine
	start_block: Option<u64>,
	/// The highest block we've processed
	highest_processed_block: Option<u64>,
	/// Ranges `(last, next)` where `next` did not directly follow `last`
	gaps: Vec<(u64, u64)>,
	passes: usize,
	failed_passes: usize,
	fetch_failures: usize,
	blocks_processed: usize,
	transactions_scanned: usize,
	transactions_matched: usize,
	/// Block at which we last logged progress
	last_logged_block: u64,
}

impl SyncProgressTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record_pass(&mut self) {
		self.passes += 1;
	}

	pub fn record_failed_pass(&mut self) {
		self.failed_passes += 1;
	}

	pub fn record_fetch_failure(&mut self) {
		self.fetch_failures += 1;
	}

	/// Record a fully ingested block.
	pub fn record_block(&mut self, block: u64, scanned: usize, matched: usize) {
		match self.highest_processed_block {
			None => {
				self.start_block = Some(block);
				self.last_logged_block = block;
			}
			Some(previous) if block != previous + 1 => {
				warn!(
					"Block {} processed after block {}, contiguity broken",
					block, previous
				);
				self.gaps.push((previous, block));
			}
			Some(_) => {}
		}

		self.highest_processed_block = Some(block);
		self.blocks_processed += 1;
		self.transactions_scanned += scanned;
		self.transactions_matched += matched;
	}

	/// Log progress every `LOG_EVERY_BLOCKS` blocks, or now when forced
	pub fn log_progress(&mut self, force: bool) {
		let Some(highest) = self.highest_processed_block else {
			return;
		};

		if force || highest.saturating_sub(self.last_logged_block) >= LOG_EVERY_BLOCKS {
			info!("Sync progress: {}", self.get_stats().summary());
			self.last_logged_block = highest;
		}
	}

	pub fn get_stats(&self) -> SyncStats {
		SyncStats {
			start_block: self.start_block,
			highest_processed_block: self.highest_processed_block,
			passes: self.passes,
			failed_passes: self.failed_passes,
			fetch_failures: self.fetch_failures,
			blocks_processed: self.blocks_processed,
			transactions_scanned: self.transactions_scanned,
			transactions_matched: self.transactions_matched,
			gaps: self.gaps.clone(),
		}
	}
}

/// Statistics about the sync progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStats {
	pub start_block: Option<u64>,
	pub highest_processed_block: Option<u64>,
	pub passes: usize,
	pub failed_passes: usize,
	pub fetch_failures: usize,
	pub blocks_processed: usize,
	pub transactions_scanned: usize,
	pub transactions_matched: usize,
	pub gaps: Vec<(u64, u64)>,
}

impl SyncStats {
	/// Get a human-readable summary of the sync statistics
	pub fn summary(&self) -> String {
		let range = match (self.start_block, self.highest_processed_block) {
			(Some(start), Some(end)) => format!("blocks {} to {}", start, end),
			_ => "no blocks".to_string(),
		};

		format!(
			"{}: {} blocks, {} transactions scanned, {} matched, {} passes ({} failed, {} fetch failures){}",
			range,
			self.blocks_processed,
			self.transactions_scanned,
			self.transactions_matched,
			self.passes,
			self.failed_passes,
			self.fetch_failures,
			if self.gaps.is_empty() {
				String::new()
			} else {
				format!(" ({} gaps)", self.gaps.len())
			}
		)
	}
}
