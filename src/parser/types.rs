use crate::gateway::TransactionRecord;
use serde::{Deserialize, Serialize};

/// Transaction shape exposed to callers of the parser.
///
/// A projection of the internal `TransactionRecord` that leaves out the access list,
/// the signature and the fee-market fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	pub block_hash: String,
	pub block_number: String,
	pub from: String,
	pub gas: String,
	pub gas_price: String,
	pub hash: String,
	pub input: String,
	pub nonce: String,
	pub to: Option<String>,
	pub transaction_index: String,
	pub value: String,
	#[serde(rename = "type")]
	pub tx_type: String,
	pub chain_id: Option<String>,
}

impl From<&TransactionRecord> for Transaction {
	fn from(record: &TransactionRecord) -> Self {
		Self {
			block_hash: record.block_hash.clone(),
			block_number: record.block_number.clone(),
			from: record.from.clone(),
			gas: record.gas.clone(),
			gas_price: record.gas_price.clone(),
			hash: record.hash.clone(),
			input: record.input.clone(),
			nonce: record.nonce.clone(),
			to: record.to.clone(),
			transaction_index: record.transaction_index.clone(),
			value: record.value.clone(),
			tx_type: record.tx_type.clone(),
			chain_id: record.chain_id.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gateway::AccessListEntry;

	#[test]
	fn projection_drops_internal_fields() {
		let record = TransactionRecord {
			block_hash: "0xbeef".to_string(),
			block_number: "0x64".to_string(),
			from: "0xaaa".to_string(),
			gas: "0x5208".to_string(),
			gas_price: "0x1".to_string(),
			max_fee_per_gas: Some("0x2".to_string()),
			hash: "0x01".to_string(),
			to: Some("0xbbb".to_string()),
			value: "0x10".to_string(),
			tx_type: "0x2".to_string(),
			access_list: vec![AccessListEntry {
				address: "0xccc".to_string(),
				storage_keys: vec!["0x00".to_string()],
			}],
			chain_id: Some("0x1".to_string()),
			v: "0x1".to_string(),
			r: "0x2".to_string(),
			s: "0x3".to_string(),
			..Default::default()
		};

		let public = Transaction::from(&record);
		assert_eq!(public.hash, "0x01");
		assert_eq!(public.to.as_deref(), Some("0xbbb"));
		assert_eq!(public.chain_id.as_deref(), Some("0x1"));

		let json = serde_json::to_value(&public).unwrap();
		let object = json.as_object().unwrap();
		assert_eq!(object["blockNumber"], "0x64");
		assert_eq!(object["type"], "0x2");
		for hidden in ["accessList", "v", "r", "s", "maxFeePerGas", "yParity"] {
			assert!(!object.contains_key(hidden), "{} should not be exposed", hidden);
		}
	}
}
