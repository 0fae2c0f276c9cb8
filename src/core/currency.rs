//! Currency conversion at the latest spot rate

use tracing::{debug, instrument};

use super::catalog::{Catalog, CurrencyCode};
use super::error::{ConvertError, check_amount};
use super::market::MarketDataProvider;

/// Outcome of a successful currency conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
    pub converted: f64,
}

pub struct CurrencyConverter<'a> {
    provider: &'a dyn MarketDataProvider,
    catalog: &'a Catalog,
}

impl<'a> CurrencyConverter<'a> {
    pub fn new(provider: &'a dyn MarketDataProvider, catalog: &'a Catalog) -> Self {
        CurrencyConverter { provider, catalog }
    }

    /// Converts `amount` of `from` into `to`.
    ///
    /// Identical currencies convert at a rate of exactly 1.0 without asking the provider.
    #[instrument(name = "CurrencyConvert", skip(self))]
    pub async fn convert(
        &self,
        amount: f64,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Conversion, ConvertError> {
        let amount = check_amount(amount)?;
        for code in [from, to] {
            if !self.catalog.is_supported(code) {
                return Err(ConvertError::UnsupportedCurrency(code.to_string()));
            }
        }

        let rate = if from == to {
            debug!("Identical currencies, using rate 1.0");
            1.0
        } else {
            let symbol = from.pair_symbol(to);
            let rate = self
                .provider
                .latest_close(&symbol)
                .await
                .map_err(|e| ConvertError::rate_unavailable(&symbol, format!("{e:#}")))?;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConvertError::rate_unavailable(
                    &symbol,
                    format!("invalid rate {rate}"),
                ));
            }
            rate
        };

        Ok(Conversion {
            amount,
            from,
            to,
            rate,
            converted: amount * rate,
        })
    }
}
