use chrono::{DateTime, Utc};

use crate::config::AnomalyDetectionConfig;
use crate::error::Result;
use crate::transaction::Transaction;

use super::rules::{self, TransferSample};
use super::types::Finding;

/// The anomaly detection engine. Runs all configured rules against one account's transactions.
#[derive(Debug, Clone)]
pub struct AnomalyEngine {
    config: AnomalyDetectionConfig,
}

impl AnomalyEngine {
    pub fn new(config: AnomalyDetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyDetectionConfig {
        &self.config
    }

    /// Analyze a transaction snapshot for anomalies.
    ///
    /// Findings come back in rule order: frequency, value outliers, gas.
    /// `reference_time` is the end of the frequency window.
    pub fn analyze(
        &self,
        transactions: &[Transaction],
        reference_time: DateTime<Utc>,
    ) -> Result<Vec<Finding>> {
        let samples = rules::samples_from(transactions)?;
        Ok(self.analyze_samples(&samples, reference_time))
    }

    /// Same as [`AnomalyEngine::analyze`] over already-parsed samples.
    pub fn analyze_samples(
        &self,
        samples: &[TransferSample],
        reference_time: DateTime<Utc>,
    ) -> Vec<Finding> {
        if !self.config.enabled || samples.is_empty() {
            return Vec::new();
        }

        let mut anomalies = Vec::new();

        // Rule 1: High-frequency burst
        if let Some(anomaly) =
            rules::check_high_frequency(samples, reference_time, &self.config.frequency)
        {
            anomalies.push(anomaly);
        }

        // Rule 2: Value outliers
        if let Some(anomaly) = rules::check_unusual_values(samples, &self.config.value_outlier) {
            anomalies.push(anomaly);
        }

        // Rule 3: Gas price spike
        if let Some(anomaly) = rules::check_gas_anomaly(samples, &self.config.gas) {
            anomalies.push(anomaly);
        }

        anomalies
    }
}

impl Default for AnomalyEngine {
    fn default() -> Self {
        Self::new(AnomalyDetectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::AnomalyType;
    use crate::error::AnalysisError;
    use chrono::TimeZone;

    const NOW: i64 = 1_700_000_000;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(NOW, 0).unwrap()
    }

    fn make_tx(i: usize, value: &str, gas_price: &str, timestamp: i64) -> Transaction {
        Transaction {
            hash: format!("0x{:04x}", i),
            from: "0x1111111111111111111111111111111111111111".to_string(),
            to: "0x2222222222222222222222222222222222222222".to_string(),
            value: value.to_string(),
            timestamp,
            gas_price: gas_price.to_string(),
            gas_used: "21000".to_string(),
        }
    }

    /// 101 recent transfers, one huge value, six gas spikes: trips every rule.
    fn noisy_history() -> Vec<Transaction> {
        (0..101)
            .map(|i| {
                let value = if i == 50 { "1000" } else { "1" };
                let gas = if i < 6 { "100" } else { "1" };
                make_tx(i, value, gas, NOW - 60 - i as i64)
            })
            .collect()
    }

    #[test]
    fn test_all_rules_in_fixed_order() {
        let engine = AnomalyEngine::default();
        let findings = engine.analyze(&noisy_history(), now()).unwrap();
        let types: Vec<AnomalyType> = findings.iter().map(|f| f.anomaly_type).collect();
        assert_eq!(
            types,
            vec![
                AnomalyType::HighFrequency,
                AnomalyType::UnusualValues,
                AnomalyType::GasAnomaly
            ]
        );
    }

    #[test]
    fn test_quiet_history() {
        let engine = AnomalyEngine::default();
        let txs: Vec<Transaction> = (0..10)
            .map(|i| make_tx(i, "5", "20", NOW - 3600 * i as i64))
            .collect();
        assert!(engine.analyze(&txs, now()).unwrap().is_empty());
    }

    #[test]
    fn test_empty_input() {
        let engine = AnomalyEngine::default();
        assert!(engine.analyze(&[], now()).unwrap().is_empty());
    }

    #[test]
    fn test_single_transaction() {
        let engine = AnomalyEngine::default();
        let txs = vec![make_tx(0, "99999999999999999999", "1", NOW)];
        assert!(engine.analyze(&txs, now()).unwrap().is_empty());
    }

    #[test]
    fn test_disabled_engine() {
        let engine = AnomalyEngine::new(AnomalyDetectionConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(engine.analyze(&noisy_history(), now()).unwrap().is_empty());
    }

    #[test]
    fn test_reference_time_moves_window() {
        let engine = AnomalyEngine::default();
        let history = noisy_history();
        let later = Utc.timestamp_opt(NOW + 2 * 86_400, 0).unwrap();
        let findings = engine.analyze(&history, later).unwrap();
        assert!(findings
            .iter()
            .all(|f| f.anomaly_type != AnomalyType::HighFrequency));
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let engine = AnomalyEngine::default();
        let history = noisy_history();
        assert_eq!(
            engine.analyze(&history, now()).unwrap(),
            engine.analyze(&history, now()).unwrap()
        );
    }

    #[test]
    fn test_parse_failure() {
        let engine = AnomalyEngine::default();
        let mut txs = noisy_history();
        txs[3].value = "not-a-number".to_string();
        match engine.analyze(&txs, now()) {
            Err(AnalysisError::Parse { hash, .. }) => assert_eq!(hash, "0x0003"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
