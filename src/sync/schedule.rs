//! Pass scheduling for the sync engine.
//!
//! Healthy passes are spaced by the chain's expected block interval. After a failed pass the
//! engine retries sooner, on an exponential schedule that starts at `retry_interval`, is capped
//! at `max_retry_interval`, and resets as soon as a pass succeeds. Retry delays are always kept
//! at or below half the poll interval, so a failing upstream is retried faster than a healthy one
//! is polled.

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use std::time::Duration;

/// Configuration for the sync engine
#[derive(Debug, Clone)]
pub struct SyncConfig {
	/// Delay between healthy passes, matching the expected block interval (12s on Ethereum)
	pub poll_interval: Duration,
	/// First delay after a failed pass
	pub retry_interval: Duration,
	/// Upper bound for consecutive failure delays, clamped to half of `poll_interval`
	pub max_retry_interval: Duration,
	/// Upper bound for a single upstream call
	pub request_timeout: Duration,
}

impl Default for SyncConfig {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_secs(12),
			retry_interval: Duration::from_secs(1),
			max_retry_interval: Duration::from_secs(6),
			request_timeout: Duration::from_secs(2),
		}
	}
}

/// Chooses the sleep between two passes.
pub struct PassScheduler {
	poll_interval: Duration,
	retry: ExponentialBackoff,
}

impl PassScheduler {
	pub fn new(config: &SyncConfig) -> Self {
		let max_interval = config
			.max_retry_interval
			.max(config.retry_interval)
			.min(config.poll_interval / 2);
		let initial_interval = config.retry_interval.min(max_interval);
		let retry = ExponentialBackoff {
			current_interval: initial_interval,
			initial_interval,
			randomization_factor: 0.0,
			multiplier: 2.0,
			max_interval,
			max_elapsed_time: None,
			..Default::default()
		};

		Self {
			poll_interval: config.poll_interval,
			retry,
		}
	}

	/// Delay after a pass that completed normally. Clears the failure streak.
	pub fn after_success(&mut self) -> Duration {
		self.retry.reset();
		self.poll_interval
	}

	/// Delay after a failed or interrupted pass.
	pub fn after_failure(&mut self) -> Duration {
		self.retry
			.next_backoff()
			.unwrap_or(self.retry.max_interval)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn millis(delay: Duration) -> u128 {
		delay.as_millis()
	}

	#[test]
	fn healthy_passes_use_poll_interval() {
		let mut scheduler = PassScheduler::new(&SyncConfig::default());
		assert_eq!(scheduler.after_success(), Duration::from_secs(12));
		assert_eq!(scheduler.after_success(), Duration::from_secs(12));
	}

	#[test]
	fn failures_back_off_up_to_the_cap() {
		let mut scheduler = PassScheduler::new(&SyncConfig::default());
		let delays: Vec<u128> = (0..6).map(|_| millis(scheduler.after_failure())).collect();
		assert_eq!(delays, vec![1_000, 2_000, 4_000, 6_000, 6_000, 6_000]);
	}

	#[test]
	fn retries_stay_shorter_than_poll() {
		let configs = [
			SyncConfig::default(),
			SyncConfig {
				max_retry_interval: Duration::from_secs(60),
				..Default::default()
			},
			SyncConfig {
				poll_interval: Duration::from_secs(4),
				retry_interval: Duration::from_secs(10),
				max_retry_interval: Duration::from_secs(30),
				..Default::default()
			},
		];

		for config in configs {
			let mut scheduler = PassScheduler::new(&config);
			for _ in 0..10 {
				let delay = scheduler.after_failure();
				assert!(
					delay < config.poll_interval,
					"retry after {:?} with poll every {:?}",
					delay,
					config.poll_interval
				);
			}
		}
	}

	#[test]
	fn success_resets_the_failure_streak() {
		let mut scheduler = PassScheduler::new(&SyncConfig::default());
		scheduler.after_failure();
		scheduler.after_failure();
		scheduler.after_success();
		assert_eq!(millis(scheduler.after_failure()), 1_000);
	}

	#[test]
	fn cap_never_drops_below_first_retry() {
		let config = SyncConfig {
			retry_interval: Duration::from_secs(5),
			max_retry_interval: Duration::from_secs(1),
			..Default::default()
		};
		let mut scheduler = PassScheduler::new(&config);
		assert_eq!(millis(scheduler.after_failure()), 5_000);
		assert_eq!(millis(scheduler.after_failure()), 5_000);
	}
}
