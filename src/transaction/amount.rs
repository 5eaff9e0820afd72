use bigdecimal::{BigDecimal, ToPrimitive};
use std::str::FromStr;

use crate::error::{AnalysisError, Result};

use super::Transaction;

/// Largest decimal exponent (either sign) accepted from input. f64 spans
/// roughly 1e-324..1e308; anything past this bound is rejected before it can
/// be expanded by decimal arithmetic.
pub const MAX_DECIMAL_SCALE: i64 = 1_100;

/// Parse a decimal string field of `tx` exactly.
///
/// Empty or malformed strings are rejected instead of coerced to zero or NaN,
/// and so are exponents beyond [`MAX_DECIMAL_SCALE`].
pub fn parse_decimal(tx: &Transaction, field: &'static str, raw: &str) -> Result<BigDecimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(parse_error(tx, field, raw));
    }
    let decimal = BigDecimal::from_str(trimmed).map_err(|_| parse_error(tx, field, raw))?;

    let (_, scale) = decimal.as_bigint_and_exponent();
    if scale.unsigned_abs() > MAX_DECIMAL_SCALE as u64 {
        return Err(AnalysisError::OutOfRange {
            hash: tx.hash.clone(),
            field,
            scale,
        });
    }
    Ok(decimal)
}

/// Parse a decimal string field of `tx`, keeping the exact decimal alongside
/// its f64 narrowing. Fails when the value does not fit a finite f64.
pub fn parse_amount(tx: &Transaction, field: &'static str, raw: &str) -> Result<(BigDecimal, f64)> {
    let decimal = parse_decimal(tx, field, raw)?;
    let narrowed = to_finite_f64(&decimal).ok_or_else(|| AnalysisError::NonFinite {
        hash: tx.hash.clone(),
        field,
    })?;
    Ok((decimal, narrowed))
}

pub fn parse_f64(tx: &Transaction, field: &'static str, raw: &str) -> Result<f64> {
    parse_amount(tx, field, raw).map(|(_, narrowed)| narrowed)
}

/// Convert an exact decimal to f64, or None when it falls outside the finite range.
pub fn to_finite_f64(decimal: &BigDecimal) -> Option<f64> {
    decimal.to_f64().filter(|v| v.is_finite())
}

fn parse_error(tx: &Transaction, field: &'static str, raw: &str) -> AnalysisError {
    AnalysisError::Parse {
        hash: tx.hash.clone(),
        field,
        value: raw.to_string(),
    }
}

impl Transaction {
    /// Transfer amount as an exact decimal. Rejects amounts outside the finite f64 range.
    pub fn value_decimal(&self) -> Result<BigDecimal> {
        parse_amount(self, "value", &self.value).map(|(decimal, _)| decimal)
    }

    pub fn value_f64(&self) -> Result<f64> {
        parse_f64(self, "value", &self.value)
    }

    pub fn gas_price_f64(&self) -> Result<f64> {
        parse_f64(self, "gasPrice", &self.gas_price)
    }
}
