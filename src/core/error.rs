//! Failure values returned by the conversion operations

use chrono::NaiveDate;
use thiserror::Error;

use super::units::Dimension;

/// Reasons a unit conversion cannot be carried out.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
    #[error("cannot convert from '{from}' ({from_dimension}) to '{to}' ({to_dimension})")]
    IncompatibleDimensions {
        from: String,
        from_dimension: Dimension,
        to: String,
        to_dimension: Dimension,
    },
}

/// Tagged failure of a unit conversion, currency conversion or rate history fetch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvertError {
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("unsupported currency '{0}'")]
    UnsupportedCurrency(String),

    #[error("rate unavailable for {symbol}: {reason}")]
    RateUnavailable { symbol: String, reason: String },

    #[error("amount must be a finite, non-negative number: {0}")]
    InvalidAmount(f64),

    #[error("invalid date range: {start} to {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl ConvertError {
    pub(crate) fn rate_unavailable(symbol: &str, reason: impl ToString) -> Self {
        ConvertError::RateUnavailable {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Rejects NaN, infinities and negative values at the core boundary.
pub(crate) fn check_amount(amount: f64) -> Result<f64, ConvertError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(ConvertError::InvalidAmount(amount))
    }
}
