//! Chain data gateway module.
//!
//! This module provides the contract the sync engine consumes to learn about the chain
//! (`ChainDataSource`) and its implementation over the Ethereum JSON-RPC API.
//! The gateway is trusted for raw block and transaction data; it performs no validation
//! beyond decoding the response shape.

/// JSON-RPC client for Ethereum-compatible gateways
mod client;
/// Wire types and errors for gateway responses
mod types;

pub use client::{ChainDataSource, DEFAULT_GATEWAY_URL, EthGatewayClient};
pub use types::*;
