//!
//! Utility module for the transaction watcher.
//!
//! Hex quantity codecs, address normalization and display formatting shared by the
//! gateway, store and demo driver.
/// Utility functions for parsing and display
pub mod index;

pub use index::{
	ETHER_DECIMALS, HexQuantityError, format_token_amount, normalize_address, parse_hex_quantity,
	parse_hex_u128, to_hex_quantity,
};
