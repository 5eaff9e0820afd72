use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::Path;

use crate::transaction::Transaction;

/// Message explorers send with status "0" when an address has no history.
const NO_TRANSACTIONS: &str = "No transactions found";

/// Block-explorer response envelope, as returned by `module=account&action=txlist`.
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    #[serde(default)]
    message: String,
    result: JsonValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Snapshot {
    List(Vec<Transaction>),
    Envelope(ExplorerResponse),
}

/// Load a transaction snapshot from disk.
/// `.csv` files need a header row with the transaction field names;
/// anything else is read as JSON (bare array or explorer envelope).
pub fn load_transactions(path: &str) -> eyre::Result<Vec<Transaction>> {
    let is_csv = Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let transactions = if is_csv {
        parse_csv_snapshot(path)?
    } else {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read transactions file '{}': {}", path, e))?;
        parse_json_snapshot(&content)?
    };

    tracing::info!(path, transactions = transactions.len(), "Loaded transaction snapshot");
    Ok(transactions)
}

/// Parse a JSON snapshot. Explorer error envelopes surface as errors unchanged.
pub fn parse_json_snapshot(content: &str) -> eyre::Result<Vec<Transaction>> {
    let snapshot: Snapshot = serde_json::from_str(content)
        .map_err(|e| eyre::eyre!("Failed to parse transactions JSON: {}", e))?;

    match snapshot {
        Snapshot::List(transactions) => Ok(transactions),
        Snapshot::Envelope(response) => unwrap_envelope(response),
    }
}

fn unwrap_envelope(response: ExplorerResponse) -> eyre::Result<Vec<Transaction>> {
    if response.status != "1" {
        let empty = response.result.as_array().map(|a| a.is_empty()).unwrap_or(false);
        if empty && response.message == NO_TRANSACTIONS {
            return Ok(Vec::new());
        }
        // Error details come back in `result` as a string.
        let detail = response.result.as_str().unwrap_or_default();
        return Err(eyre::eyre!(
            "Explorer returned status {}: {} {}",
            response.status,
            response.message,
            detail
        ));
    }

    serde_json::from_value(response.result)
        .map_err(|e| eyre::eyre!("Malformed explorer result: {}", e))
}

fn parse_csv_snapshot(path: &str) -> eyre::Result<Vec<Transaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("Failed to open transactions CSV '{}': {}", path, e))?;

    let mut transactions = Vec::new();
    for (row, result) in reader.deserialize::<Transaction>().enumerate() {
        let tx = result.map_err(|e| eyre::eyre!("Invalid transaction on CSV row {}: {}", row + 1, e))?;
        transactions.push(tx);
    }
    Ok(transactions)
}
