use bigdecimal::{BigDecimal, Zero};

use crate::error::{AnalysisError, Result};
use crate::transaction::amount::to_finite_f64;
use crate::transaction::Transaction;

/// Summary statistics over one account's transaction snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionMetrics {
    pub count: usize,
    pub total_volume: f64,
    /// `None` when there are no transactions to average over.
    pub average_value: Option<f64>,
}

/// Reduce a transaction list to count, total volume and mean value.
///
/// Each value is range-checked as it is parsed; the sum is taken over exact
/// decimals and narrowed to f64 once at the end.
pub fn aggregate(transactions: &[Transaction]) -> Result<TransactionMetrics> {
    let mut total = BigDecimal::zero();
    for tx in transactions {
        total += tx.value_decimal()?;
    }

    let count = transactions.len();
    let total_volume = narrow(&total, transactions)?;
    let average_value = (count > 0).then(|| total_volume / count as f64);

    tracing::debug!(count, total_volume, ?average_value, "Aggregated transaction metrics");

    Ok(TransactionMetrics {
        count,
        total_volume,
        average_value,
    })
}

/// An aggregate overflowing f64 is blamed on the largest contributor.
fn narrow(decimal: &BigDecimal, transactions: &[Transaction]) -> Result<f64> {
    to_finite_f64(decimal).ok_or_else(|| {
        let hash = transactions
            .iter()
            .filter_map(|tx| tx.value_decimal().ok().map(|v| (v, &tx.hash)))
            .max_by(|a, b| a.0.abs().cmp(&b.0.abs()))
            .map(|(_, hash)| hash.clone())
            .unwrap_or_default();
        AnalysisError::NonFinite {
            hash,
            field: "value",
        }
    })
}
