//! Types for the Ethereum JSON-RPC gateway

use serde::{Deserialize, Serialize};

use crate::utils::HexQuantityError;

/// One entry of an EIP-2930 access list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListEntry {
	pub address: String,
	#[serde(default)]
	pub storage_keys: Vec<String>,
}

/// A transaction as returned by `eth_getBlockByNumber` with full transaction objects.
///
/// Every quantity is kept in its hex-encoded wire form. The record is never mutated after
/// it has been decoded; the public projection exposed to callers is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
	/// Hash of the block containing the transaction.
	#[serde(default)]
	pub block_hash: String,
	/// Hex-encoded number of the block containing the transaction.
	#[serde(default)]
	pub block_number: String,
	/// Sender address.
	pub from: String,
	/// Gas limit supplied by the sender.
	#[serde(default)]
	pub gas: String,
	#[serde(default)]
	pub gas_price: String,
	#[serde(default)]
	pub max_priority_fee_per_gas: Option<String>,
	#[serde(default)]
	pub max_fee_per_gas: Option<String>,
	#[serde(default)]
	pub max_fee_per_blob_gas: Option<String>,
	/// Transaction hash, unique per transaction.
	pub hash: String,
	#[serde(default)]
	pub input: String,
	#[serde(default)]
	pub nonce: String,
	/// Recipient address, `None` for contract creations.
	#[serde(default)]
	pub to: Option<String>,
	#[serde(default)]
	pub transaction_index: String,
	#[serde(default)]
	pub value: String,
	#[serde(rename = "type", default)]
	pub tx_type: String,
	#[serde(default)]
	pub access_list: Vec<AccessListEntry>,
	#[serde(default)]
	pub chain_id: Option<String>,
	#[serde(default)]
	pub v: String,
	#[serde(default)]
	pub r: String,
	#[serde(default)]
	pub s: String,
	#[serde(default)]
	pub y_parity: Option<String>,
	#[serde(default)]
	pub blob_versioned_hashes: Vec<String>,
}

/// The subset of a block object the gateway needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockWithTransactions {
	#[serde(default)]
	pub number: Option<String>,
	#[serde(default)]
	pub hash: Option<String>,
	#[serde(default)]
	pub transactions: Vec<TransactionRecord>,
}

/// Error object of a JSON-RPC 2.0 response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
	pub code: i64,
	pub message: String,
}

/// Envelope of a JSON-RPC 2.0 response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse<T> {
	#[serde(default)]
	pub id: Option<serde_json::Value>,
	pub result: Option<T>,
	#[serde(default)]
	pub error: Option<RpcErrorObject>,
}

impl<T> RpcResponse<T> {
	/// Turn the envelope into its result, mapping RPC errors and `null` results to errors.
	pub fn into_result(self) -> Result<T, GatewayError> {
		if let Some(error) = self.error {
			return Err(GatewayError::RpcError {
				code: error.code,
				message: error.message,
			});
		}
		self.result.ok_or(GatewayError::NoData)
	}
}

/// Error types for gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
	#[error("HTTP error: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("HTTP status {0}")]
	HttpStatus(u16),

	#[error("JSON parse error: {0}")]
	JsonError(#[from] serde_json::Error),

	#[error("JSON-RPC error {code}: {message}")]
	RpcError { code: i64, message: String },

	#[error("No data returned")]
	NoData,

	#[error("Invalid quantity: {0}")]
	InvalidQuantity(#[from] HexQuantityError),
}
