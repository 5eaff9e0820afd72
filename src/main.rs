use tracing_subscriber::EnvFilter;

use chainwatch_analyzer::analyzer::AddressAnalyzer;
use chainwatch_analyzer::config::Config;
use chainwatch_analyzer::source::load_transactions;

const USAGE: &str = "Usage:
  chainwatch-analyzer serve [config.toml]
  chainwatch-analyzer analyze <address> <transactions.json|csv> [config.toml]";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Initialize structured logging (set RUST_LOG=debug for rule details)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("serve") => {
            let config_path = args.get(1).map(String::as_str).unwrap_or("config.toml");
            serve(config_path).await
        }
        Some("analyze") => {
            let (address, path) = match (args.get(1), args.get(2)) {
                (Some(address), Some(path)) => (address, path),
                _ => return Err(eyre::eyre!("Missing arguments\n{}", USAGE)),
            };
            let config_path = args.get(3).map(String::as_str).unwrap_or("config.toml");
            analyze(address, path, config_path)
        }
        _ => Err(eyre::eyre!("Unknown command\n{}", USAGE)),
    }
}

async fn serve(config_path: &str) -> eyre::Result<()> {
    tracing::info!("ChainWatch Analyzer starting");

    let config = Config::load_or_default(config_path)?;
    tracing::info!(
        enabled = config.anomaly_detection.enabled,
        "Configuration loaded from {}",
        config_path
    );

    if !config.api.enabled {
        tracing::warn!("API disabled in configuration, nothing to serve");
        return Ok(());
    }

    let analyzer = AddressAnalyzer::new(config.anomaly_detection.clone());

    tracing::info!("Press Ctrl+C to stop.");

    chainwatch_analyzer::api::run(
        analyzer,
        &config.api.host,
        config.api.port,
        tokio::signal::ctrl_c(),
    )
    .await?;

    tracing::info!("ChainWatch Analyzer stopped gracefully");
    Ok(())
}

fn analyze(address: &str, path: &str, config_path: &str) -> eyre::Result<()> {
    let config = Config::load_or_default(config_path)?;
    let transactions = load_transactions(path)?;

    let analysis = AddressAnalyzer::new(config.anomaly_detection)
        .analyze_now(address, &transactions)
        .map_err(|e| eyre::eyre!("Analysis of {} failed: {}", address, e))?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
