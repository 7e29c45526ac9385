//! Block Synchronization Module
//!
//! This module contains the background process that keeps the store in step with the chain.
//! It is composed of several submodules:
//!
//! - `engine`: The long-running pass loop. Discovers the chain head, walks the unsynced block range
//!   in order, matches transactions against the subscriptions and advances the watermark.
//! - `events`: Event types and handler traits used to observe the engine without touching its control flow.
//! - `progress_tracker`: Counters and contiguity checks over the engine's lifetime.
//! - `schedule`: Engine configuration and the delay policy between passes.
//! - `types`: Sync errors and pass outcomes.

/// The pass loop
pub mod engine;
/// Event system for observing sync activity
pub mod events;
/// Tracks synchronization progress and statistics
pub mod progress_tracker;
/// Configuration and delay policy between passes
pub mod schedule;
mod types;

pub use engine::SyncEngine;
pub use events::{EventDispatcher, LoggingEventHandler, SyncEvent, SyncEventHandler};
pub use progress_tracker::{SyncProgressTracker, SyncStats};
pub use schedule::{PassScheduler, SyncConfig};
pub use types::*;
