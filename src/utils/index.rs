use thiserror::Error;

/// Number of decimals between wei and ether.
pub const ETHER_DECIMALS: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexQuantityError {
	#[error("hex quantity is missing the 0x prefix: {0:?}")]
	MissingPrefix(String),

	#[error("hex quantity has no digits: {0:?}")]
	Empty(String),

	#[error("invalid hex quantity {0:?}")]
	Invalid(String),
}

fn hex_digits(value: &str) -> Result<&str, HexQuantityError> {
	let digits = value
		.strip_prefix("0x")
		.or_else(|| value.strip_prefix("0X"))
		.ok_or_else(|| HexQuantityError::MissingPrefix(value.to_string()))?;
	if digits.is_empty() {
		return Err(HexQuantityError::Empty(value.to_string()));
	}
	Ok(digits)
}

/// Parse a JSON-RPC hex quantity such as `0x1b4` into a number.
pub fn parse_hex_quantity(value: &str) -> Result<u64, HexQuantityError> {
	let digits = hex_digits(value)?;
	u64::from_str_radix(digits, 16).map_err(|_| HexQuantityError::Invalid(value.to_string()))
}

/// Same as [`parse_hex_quantity`] but wide enough for wei amounts.
pub fn parse_hex_u128(value: &str) -> Result<u128, HexQuantityError> {
	let digits = hex_digits(value)?;
	u128::from_str_radix(digits, 16).map_err(|_| HexQuantityError::Invalid(value.to_string()))
}

/// Encode a block number as a JSON-RPC hex quantity.
pub fn to_hex_quantity(value: u64) -> String {
	format!("{:#x}", value)
}

/// Canonical form of an address key: trimmed and lowercased.
pub fn normalize_address(address: &str) -> String {
	address.trim().to_ascii_lowercase()
}

/// Render a base-unit amount (e.g. wei) as a decimal with exactly `decimals` fractional digits.
pub fn format_token_amount(amount: u128, decimals: u32) -> String {
	let width = decimals as usize;
	match 10u128.checked_pow(decimals) {
		Some(1) => amount.to_string(),
		Some(unit) => format!("{}.{:0width$}", amount / unit, amount % unit, width = width),
		// Wider than any u128, so the whole amount is fractional.
		None => format!("0.{:0width$}", amount, width = width),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_quantities() {
		assert_eq!(parse_hex_quantity("0x0"), Ok(0));
		assert_eq!(parse_hex_quantity("0x1b4"), Ok(436));
		assert_eq!(parse_hex_quantity("0X10"), Ok(16));
		assert_eq!(
			parse_hex_u128("0xde0b6b3a7640000"),
			Ok(1_000_000_000_000_000_000)
		);
	}

	#[test]
	fn rejects_malformed_quantities() {
		assert!(matches!(
			parse_hex_quantity("1b4"),
			Err(HexQuantityError::MissingPrefix(_))
		));
		assert!(matches!(
			parse_hex_quantity("0x"),
			Err(HexQuantityError::Empty(_))
		));
		assert!(matches!(
			parse_hex_quantity("0xzz"),
			Err(HexQuantityError::Invalid(_))
		));
	}

	#[test]
	fn encodes_block_numbers() {
		assert_eq!(to_hex_quantity(0), "0x0");
		assert_eq!(to_hex_quantity(20_000_000), "0x1312d00");
	}

	#[test]
	fn normalizes_addresses() {
		assert_eq!(
			normalize_address(" 0x95222290DD7278Aa3Ddd389Cc1E1d165CC4BAfe5 "),
			"0x95222290dd7278aa3ddd389cc1e1d165cc4bafe5"
		);
	}

	#[test]
	fn formats_ether_amounts() {
		assert_eq!(format_token_amount(1_500_000_000_000_000_000, ETHER_DECIMALS), "1.500000000000000000");
		assert_eq!(format_token_amount(0, 2), "0.00");
		assert_eq!(format_token_amount(42, 0), "42");
	}

	#[test]
	fn formats_amounts_beyond_float_precision() {
		// 2^53 + 1 wei and a large balance both keep every digit.
		assert_eq!(format_token_amount(9_007_199_254_740_993, ETHER_DECIMALS), "0.009007199254740993");
		assert_eq!(
			format_token_amount(123_456_789_012_345_678_901_234_567_890, ETHER_DECIMALS),
			"123456789012.345678901234567890"
		);
		assert_eq!(format_token_amount(u128::MAX, 40), format!("0.{:040}", u128::MAX));
	}
}
