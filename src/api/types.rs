use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

// ============================================================
// Address helpers
// ============================================================

/// Accepts `0x` followed by 40 hex characters, in any case.
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(body) => body.len() == 40 && hex::decode(body).is_ok(),
        None => false,
    }
}

// ============================================================
// Request types
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub address: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Unix seconds closing the frequency window; the server clock when absent.
    pub reference_time: Option<i64>,
}

// ============================================================
// Response types
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address() {
        assert!(is_valid_address("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
        assert!(!is_valid_address("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
        assert!(!is_valid_address("0x1234"));
        assert!(!is_valid_address("0xZZb86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
    }

    #[test]
    fn test_request_defaults() {
        let req: AnalyzeRequest =
            serde_json::from_str(r#"{"address": "0xabc"}"#).unwrap();
        assert!(req.transactions.is_empty());
        assert!(req.reference_time.is_none());
    }
}
