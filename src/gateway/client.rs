//!
//! JSON-RPC client for Ethereum-compatible chain data gateways.
//!
//! This module defines the `ChainDataSource` contract consumed by the sync engine and the
//! `EthGatewayClient` implementation that speaks JSON-RPC 2.0 over HTTP. Only two methods are
//! used: `eth_blockNumber` to discover the chain height and `eth_getBlockByNumber` (with full
//! transaction objects) to fetch the transactions of a block.

use super::types::*;
use crate::utils::{parse_hex_quantity, to_hex_quantity};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Public Ethereum mainnet gateway used when nothing else is configured.
pub const DEFAULT_GATEWAY_URL: &str = "https://cloudflare-eth.com";

/// Source of chain height and per-block transaction lists.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
	/// The most recent block number known to the chain.
	async fn current_height(&self) -> Result<u64, GatewayError>;

	/// All transactions contained in `block`, in block order. Empty for an empty block.
	async fn block_transactions(&self, block: u64) -> Result<Vec<TransactionRecord>, GatewayError>;
}

/// Ethereum JSON-RPC gateway client
pub struct EthGatewayClient {
	/// The underlying HTTP client.
	http_client: Client,
	/// The JSON-RPC endpoint.
	gateway_url: String,
	/// Source of JSON-RPC request ids.
	next_request_id: AtomicU64,
}

impl EthGatewayClient {
	/// Create a new gateway client.
	///
	/// # Arguments
	/// * `gateway_url` - The JSON-RPC HTTP endpoint.
	/// * `timeout` - Upper bound for a single request, connect included.
	///
	/// # Errors
	/// Returns `GatewayError::HttpError` if the HTTP client cannot be built.
	pub fn new(gateway_url: String, timeout: Duration) -> Result<Self, GatewayError> {
		let http_client = Client::builder().timeout(timeout).build()?;

		Ok(Self {
			http_client,
			gateway_url,
			next_request_id: AtomicU64::new(1),
		})
	}

	pub fn gateway_url(&self) -> &str {
		&self.gateway_url
	}

	/// Execute a JSON-RPC call and return the decoded `result`.
	///
	/// # Errors
	/// Returns `GatewayError` on transport failures, non-success HTTP statuses, JSON-RPC error
	/// objects, `null` results and bodies that do not decode into `T`.
	pub async fn call<T: DeserializeOwned>(
		&self,
		method: &str,
		params: serde_json::Value,
	) -> Result<T, GatewayError> {
		let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
		let request_body = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});

		let response = self
			.http_client
			.post(&self.gateway_url)
			.header("Content-Type", "application/json")
			.json(&request_body)
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(GatewayError::HttpStatus(response.status().as_u16()));
		}

		let body = response.bytes().await?;
		decode_response(&body)
	}
}

#[async_trait]
impl ChainDataSource for EthGatewayClient {
	async fn current_height(&self) -> Result<u64, GatewayError> {
		let height: String = self.call("eth_blockNumber", json!([])).await?;
		block_number_from(&height)
	}

	async fn block_transactions(&self, block: u64) -> Result<Vec<TransactionRecord>, GatewayError> {
		let block_hex = to_hex_quantity(block);
		debug!("Fetching block {} ({})", block, block_hex);

		let block: BlockWithTransactions = self
			.call("eth_getBlockByNumber", json!([block_hex, true]))
			.await?;
		debug!(
			"Block {} ({}) has {} transactions",
			block_hex,
			block.hash.as_deref().unwrap_or("unknown hash"),
			block.transactions.len()
		);
		Ok(block.transactions)
	}
}

/// Decode a JSON-RPC response body into its result.
pub(crate) fn decode_response<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
	let response: RpcResponse<T> = serde_json::from_slice(body)?;
	debug!("JSON-RPC response id {:?}", response.id);
	response.into_result()
}

/// Decode the hex quantity returned by `eth_blockNumber`.
pub(crate) fn block_number_from(quantity: &str) -> Result<u64, GatewayError> {
	Ok(parse_hex_quantity(quantity)?)
}
