use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anomaly::{AnomalyEngine, Finding};
use crate::config::AnomalyDetectionConfig;
use crate::error::Result;
use crate::metrics;
use crate::transaction::Transaction;

/// Result of analyzing one address: summary metrics plus anomaly findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressAnalysis {
    pub address: String,
    pub total_transactions: usize,
    pub total_volume: f64,
    /// `null` for an address with no transactions.
    pub average_transaction_value: Option<f64>,
    pub anomalies: Vec<Finding>,
}

/// Orchestrates the analysis of one address:
/// 1. Metrics aggregation (count, volume, average)
/// 2. Anomaly detection
pub struct AddressAnalyzer {
    pub anomaly_engine: AnomalyEngine,
}

impl AddressAnalyzer {
    pub fn new(config: AnomalyDetectionConfig) -> Self {
        Self {
            anomaly_engine: AnomalyEngine::new(config),
        }
    }

    /// Analyze a snapshot of `address`'s transactions as of `reference_time`.
    ///
    /// Fails on the first transaction with an unparseable numeric field.
    pub fn analyze(
        &self,
        address: &str,
        transactions: &[Transaction],
        reference_time: DateTime<Utc>,
    ) -> Result<AddressAnalysis> {
        // Step 1: Metrics
        let metrics = metrics::aggregate(transactions)?;

        // Step 2: Anomaly detection
        let anomalies = self.anomaly_engine.analyze(transactions, reference_time)?;

        for anomaly in &anomalies {
            tracing::warn!(
                address,
                anomaly_type = anomaly.anomaly_type.as_str(),
                severity = anomaly.severity.as_str(),
                "ANOMALY DETECTED"
            );
        }

        tracing::info!(
            address,
            transactions = metrics.count,
            anomalies = anomalies.len(),
            "Address analysis complete"
        );

        Ok(AddressAnalysis {
            address: address.to_string(),
            total_transactions: metrics.count,
            total_volume: metrics.total_volume,
            average_transaction_value: metrics.average_value,
            anomalies,
        })
    }

    /// Analyze as of the current wall-clock time.
    pub fn analyze_now(&self, address: &str, transactions: &[Transaction]) -> Result<AddressAnalysis> {
        self.analyze(address, transactions, Utc::now())
    }
}

impl Default for AddressAnalyzer {
    fn default() -> Self {
        Self::new(AnomalyDetectionConfig::default())
    }
}
