//! Process configuration.
//!
//! Defaults target Ethereum mainnet through a public gateway. Every value can be overridden
//! through an `ETH_WATCHER_*` environment variable.

use crate::gateway::DEFAULT_GATEWAY_URL;
use crate::sync::SyncConfig;
use std::time::Duration;

/// Address watched by the demo driver when none is configured.
pub const DEFAULT_WATCH_ADDRESS: &str = "0x95222290DD7278Aa3Ddd389Cc1E1d165CC4BAfe5";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{name} must be a whole number of seconds, got {value:?}")]
	InvalidSeconds { name: &'static str, value: String },

	#[error("{name} must not be empty")]
	Empty { name: &'static str },
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
	/// JSON-RPC endpoint of the chain data gateway
	pub gateway_url: String,
	/// Address the demo driver subscribes to
	pub watch_address: String,
	/// How often the demo driver reads the watched address
	pub display_interval: Duration,
	pub sync: SyncConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			gateway_url: DEFAULT_GATEWAY_URL.to_string(),
			watch_address: DEFAULT_WATCH_ADDRESS.to_string(),
			display_interval: Duration::from_secs(2),
			sync: SyncConfig::default(),
		}
	}
}

impl AppConfig {
	/// Defaults overridden by the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Defaults overridden by `lookup`, which maps a variable name to its value.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let mut config = Self::default();

		if let Some(url) = string_var(&lookup, "ETH_WATCHER_GATEWAY_URL")? {
			config.gateway_url = url;
		}
		if let Some(address) = string_var(&lookup, "ETH_WATCHER_ADDRESS")? {
			config.watch_address = address;
		}
		if let Some(timeout) = seconds_var(&lookup, "ETH_WATCHER_REQUEST_TIMEOUT_SECS")? {
			config.sync.request_timeout = timeout;
		}
		if let Some(poll) = seconds_var(&lookup, "ETH_WATCHER_POLL_INTERVAL_SECS")? {
			config.sync.poll_interval = poll;
		}
		if let Some(retry) = seconds_var(&lookup, "ETH_WATCHER_RETRY_INTERVAL_SECS")? {
			config.sync.retry_interval = retry;
		}
		if let Some(max_retry) = seconds_var(&lookup, "ETH_WATCHER_MAX_RETRY_INTERVAL_SECS")? {
			config.sync.max_retry_interval = max_retry;
		}

		Ok(config)
	}
}

fn string_var(
	lookup: &impl Fn(&str) -> Option<String>,
	name: &'static str,
) -> Result<Option<String>, ConfigError> {
	match lookup(name) {
		None => Ok(None),
		Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { name }),
		Some(value) => Ok(Some(value.trim().to_string())),
	}
}

fn seconds_var(
	lookup: &impl Fn(&str) -> Option<String>,
	name: &'static str,
) -> Result<Option<Duration>, ConfigError> {
	let Some(value) = lookup(name) else {
		return Ok(None);
	};

	match value.trim().parse::<u64>() {
		Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
		_ => Err(ConfigError::InvalidSeconds { name, value }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn defaults_without_overrides() {
		let config = AppConfig::from_lookup(lookup(&[])).unwrap();
		assert_eq!(config.gateway_url, DEFAULT_GATEWAY_URL);
		assert_eq!(config.watch_address, DEFAULT_WATCH_ADDRESS);
		assert_eq!(config.sync.poll_interval, Duration::from_secs(12));
		assert_eq!(config.sync.retry_interval, Duration::from_secs(1));
		assert_eq!(config.sync.max_retry_interval, Duration::from_secs(6));
		assert_eq!(config.sync.request_timeout, Duration::from_secs(2));
	}

	#[test]
	fn overrides_from_environment() {
		let config = AppConfig::from_lookup(lookup(&[
			("ETH_WATCHER_GATEWAY_URL", "http://localhost:8545"),
			("ETH_WATCHER_POLL_INTERVAL_SECS", "2"),
			("ETH_WATCHER_RETRY_INTERVAL_SECS", " 3 "),
			("ETH_WATCHER_ADDRESS", "0xabc"),
		]))
		.unwrap();
		assert_eq!(config.gateway_url, "http://localhost:8545");
		assert_eq!(config.watch_address, "0xabc");
		assert_eq!(config.sync.poll_interval, Duration::from_secs(2));
		assert_eq!(config.sync.retry_interval, Duration::from_secs(3));
	}

	#[test]
	fn rejects_bad_durations() {
		for bad in ["soon", "0", "-1"] {
			let result =
				AppConfig::from_lookup(lookup(&[("ETH_WATCHER_REQUEST_TIMEOUT_SECS", bad)]));
			assert!(matches!(
				result,
				Err(ConfigError::InvalidSeconds {
					name: "ETH_WATCHER_REQUEST_TIMEOUT_SECS",
					..
				})
			));
		}
	}

	#[test]
	fn rejects_empty_gateway() {
		let result = AppConfig::from_lookup(lookup(&[("ETH_WATCHER_GATEWAY_URL", "  ")]));
		assert!(matches!(result, Err(ConfigError::Empty { .. })));
	}
}
