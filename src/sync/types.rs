use crate::gateway::GatewayError;
use std::time::Duration;

/// Errors raised while running a sync pass
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
	#[error("Gateway error: {0}")]
	Gateway(#[from] GatewayError),

	#[error("Upstream call timed out after {0:?}")]
	Timeout(Duration),

	#[error("Internal sync error: {0}")]
	Internal(String),
}

/// Result of a single discover-and-process pass.
#[derive(Debug)]
pub enum PassOutcome {
	/// Nothing new: the watermark is already at (or ahead of) the chain head.
	Idle { height: u64, watermark: u64 },
	/// First pass: tracking starts at the chain head, with no backfill.
	Initialized { height: u64 },
	/// Blocks `from..=to` were processed and the watermark now equals `to`.
	Advanced { from: u64, to: u64 },
	/// Fetching `failed_block` failed; the watermark stays on the last complete block.
	Interrupted {
		failed_block: u64,
		watermark: u64,
		error: SyncError,
	},
}

impl PassOutcome {
	/// Whether the next pass should come after the fast retry delay.
	pub fn needs_retry(&self) -> bool {
		matches!(self, PassOutcome::Interrupted { .. })
	}
}
