//! Ethereum address transaction watcher.
//!
//! Tracks a set of subscribed addresses and records every transaction sent from or to them
//! since subscription, by polling a JSON-RPC gateway block by block.
//!
//! - [`gateway`]: chain data source contract and the JSON-RPC client.
//! - [`store`]: concurrency-safe subscription and transaction storage.
//! - [`sync`]: the background engine that walks new blocks and fills the store.
//! - [`parser`]: the query facade handed to callers.

pub mod config;
pub mod gateway;
pub mod parser;
pub mod store;
pub mod sync;
pub mod utils;

pub use parser::{EthParser, Parser, Transaction};
