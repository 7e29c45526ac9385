use eth_tx_watcher::config::AppConfig;
use eth_tx_watcher::gateway::EthGatewayClient;
use eth_tx_watcher::utils::{ETHER_DECIMALS, format_token_amount, parse_hex_u128};
use eth_tx_watcher::{EthParser, Parser, Transaction};

use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.with_target(false)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_file(false)
		.with_line_number(false)
		.with_timer(tracing_subscriber::fmt::time::time())
		.init();

	let config = match AppConfig::from_env() {
		Ok(config) => config,
		Err(e) => {
			error!("Invalid configuration: {}", e);
			return ExitCode::FAILURE;
		}
	};

	info!("Starting transaction watcher against {}", config.gateway_url);

	let gateway = match EthGatewayClient::new(config.gateway_url.clone(), config.sync.request_timeout)
	{
		Ok(gateway) => gateway,
		Err(e) => {
			error!("Failed to create gateway client: {}", e);
			return ExitCode::FAILURE;
		}
	};

	let (parser, engine) = EthParser::start(Arc::new(gateway), config.sync.clone());
	parser.subscribe(&config.watch_address);

	// Poll the parser the way a notification service would, printing whatever is new.
	let mut seen = 0;
	loop {
		if engine.is_finished() {
			error!("Sync engine stopped unexpectedly");
			return ExitCode::FAILURE;
		}

		let transactions = parser.transactions(&config.watch_address);
		if transactions.len() != seen {
			info!(
				"Got {} new transactions (synced to block {})",
				transactions.len() - seen,
				parser.current_block()
			);
			for (i, tx) in transactions.iter().enumerate().skip(seen) {
				println!("\tTransaction #{}: {}", i + 1, describe(tx));
			}
			seen = transactions.len();
		}

		tokio::time::sleep(config.display_interval).await;
	}
}

fn describe(tx: &Transaction) -> String {
	let value = parse_hex_u128(&tx.value)
		.map(|wei| format!("{} ETH", format_token_amount(wei, ETHER_DECIMALS)))
		.unwrap_or_else(|_| tx.value.clone());

	format!(
		"[Hash: {}, From: {}, To: {}, Value: {}, Gas Price: {}]",
		tx.hash,
		tx.from,
		tx.to.as_deref().unwrap_or("(contract creation)"),
		value,
		tx.gas_price
	)
}
