use chrono::{DateTime, Utc};

use crate::config::{FrequencyConfig, GasConfig, ValueOutlierConfig};
use crate::error::Result;
use crate::transaction::Transaction;

use super::types::{AnomalyType, Finding};

/// The numeric view of a transaction that the rules operate on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferSample {
    pub value: f64,
    pub gas_price: f64,
    pub timestamp: i64,
}

impl TransferSample {
    pub fn from_transaction(tx: &Transaction) -> Result<Self> {
        Ok(Self {
            value: tx.value_f64()?,
            gas_price: tx.gas_price_f64()?,
            timestamp: tx.timestamp,
        })
    }
}

/// Parse every transaction up front so a malformed field fails the whole batch.
pub fn samples_from(transactions: &[Transaction]) -> Result<Vec<TransferSample>> {
    transactions.iter().map(TransferSample::from_transaction).collect()
}

/// Check whether more than `max_transactions` landed inside the trailing window
/// ending at `reference_time`.
pub fn check_high_frequency(
    samples: &[TransferSample],
    reference_time: DateTime<Utc>,
    config: &FrequencyConfig,
) -> Option<Finding> {
    let now = reference_time.timestamp();
    let window = i64::try_from(config.window_secs).unwrap_or(i64::MAX);

    let recent = samples
        .iter()
        .filter(|s| now.saturating_sub(s.timestamp) < window)
        .count();

    tracing::debug!(
        recent,
        window_secs = config.window_secs,
        max = config.max_transactions,
        "Frequency check"
    );

    if recent > config.max_transactions {
        return Some(AnomalyType::HighFrequency.into());
    }

    None
}

/// Check whether any value deviates from the mean by more than
/// `sigma_threshold` population standard deviations.
///
/// Reports a single finding no matter how many values are outliers.
pub fn check_unusual_values(
    samples: &[TransferSample],
    config: &ValueOutlierConfig,
) -> Option<Finding> {
    let raw: Vec<f64> = samples.iter().map(|s| s.value).collect();
    let (values, scale) = rescale(&raw);
    let (mean, std) = mean_std(&values)?;
    let limit = config.sigma_threshold * std;

    let outliers = values.iter().filter(|v| (*v - mean).abs() > limit).count();

    tracing::debug!(
        mean = mean * scale,
        std = std * scale,
        outliers,
        "Value outlier check"
    );

    if outliers > 0 {
        return Some(AnomalyType::UnusualValues.into());
    }

    None
}

/// Check whether more than `max_high_gas_transactions` paid over
/// `price_multiplier` times the mean gas price.
pub fn check_gas_anomaly(samples: &[TransferSample], config: &GasConfig) -> Option<Finding> {
    if samples.is_empty() {
        return None;
    }

    let raw: Vec<f64> = samples.iter().map(|s| s.gas_price).collect();
    let (prices, scale) = rescale(&raw);
    let mean_gas = prices.iter().sum::<f64>() / prices.len() as f64;
    let limit = mean_gas * config.price_multiplier;

    let high_gas = prices.iter().filter(|p| **p > limit).count();

    tracing::debug!(mean_gas = mean_gas * scale, high_gas, "Gas price check");

    if high_gas > config.max_high_gas_transactions {
        return Some(AnomalyType::GasAnomaly.into());
    }

    None
}

/// Divide by the power of two at or below the largest magnitude, so sums and
/// squared deviations stay finite. Power-of-two division is exact, so
/// comparisons between rescaled values match the unscaled ones.
fn rescale(vals: &[f64]) -> (Vec<f64>, f64) {
    let max = vals.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if max <= 1.0 {
        return (vals.to_vec(), 1.0);
    }
    // log2(f64::MAX) rounds up to 1024.
    let scale = 2f64.powi(max.log2().floor().min(1023.0) as i32);
    (vals.iter().map(|v| v / scale).collect(), scale)
}

/// Mean and population standard deviation, or None for an empty slice.
fn mean_std(vals: &[f64]) -> Option<(f64, f64)> {
    if vals.is_empty() {
        return None;
    }
    let n = vals.len() as f64;
    let mean = vals.iter().sum::<f64>() / n;
    let sq_diff: f64 = vals.iter().map(|v| (v - mean).powi(2)).sum();
    Some((mean, (sq_diff / n).sqrt()))
}
