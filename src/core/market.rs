//! Market data abstractions

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest daily closing price for `symbol`.
    async fn latest_close(&self, symbol: &str) -> Result<f64>;

    /// Daily closing prices for `symbol` between `start` and `end`, both inclusive.
    async fn close_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>>;
}
