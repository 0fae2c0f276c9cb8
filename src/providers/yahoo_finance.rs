use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{RetryPolicy, with_retry};
use crate::core::MarketDataProvider;
use crate::core::config::YahooProviderConfig;

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    #[serde(alias = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    /// Seconds east of UTC for the exchange the symbol trades on.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

impl ChartItem {
    fn closes(&self) -> &[Option<f64>] {
        self.indicators
            .as_ref()
            .and_then(|inds| inds.quote.first())
            .and_then(|q| q.close.as_deref())
            .unwrap_or_default()
    }

    /// Closing prices keyed by the exchange-local trading date, skipping empty bars.
    fn daily_closes(&self) -> Vec<(NaiveDate, f64)> {
        let Some(timestamps) = self.timestamp.as_ref() else {
            return Vec::new();
        };
        timestamps
            .iter()
            .zip(self.closes())
            .filter_map(|(ts, close)| {
                let close = (*close)?;
                let date = DateTime::from_timestamp(ts + self.meta.gmtoffset, 0)?.date_naive();
                Some((date, close))
            })
            .collect()
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Market data from the Yahoo Finance chart API.
pub struct YahooFinanceProvider {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("xconv/1.0")
            .timeout(timeout)
            .build()?;
        Ok(YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retry,
        })
    }

    pub fn from_config(config: &YahooProviderConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            RetryPolicy {
                retries: config.retries,
                ..RetryPolicy::default()
            },
        )
    }

    async fn fetch_chart(&self, symbol: &str, query: &str) -> Result<ChartItem> {
        let url = format!("{}/v8/finance/chart/{}?{}", self.base_url, symbol, query);
        debug!("Requesting chart data from {}", url);

        let response = with_retry(|| self.client.get(&url).send(), self.retry)
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Yahoo explains unknown symbols in the body of a 404
            let detail = serde_json::from_str::<YahooChartResponse>(&text)
                .ok()
                .and_then(|data| data.chart.error)
                .and_then(|e| e.description)
                .map(|d| format!(" ({d})"))
                .unwrap_or_default();
            return Err(anyhow!("HTTP error: {} for symbol: {}{}", status, symbol, detail));
        }

        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        if let Some(error) = data.chart.error {
            return Err(anyhow!(
                "Yahoo error for {}: {}{}",
                symbol,
                error.code,
                error.description.map(|d| format!(": {d}")).unwrap_or_default()
            ));
        }

        data.chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| anyhow!("No chart data found for symbol: {}", symbol))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    #[instrument(name = "YahooLatestClose", skip(self), fields(symbol = %symbol))]
    async fn latest_close(&self, symbol: &str) -> Result<f64> {
        let item = self.fetch_chart(symbol, "interval=1d&range=1d").await?;

        let close = item.closes().iter().rev().find_map(|c| *c);
        close
            .or(item.meta.regular_market_price)
            .ok_or_else(|| anyhow!("No closing price found for symbol: {}", symbol))
    }

    #[instrument(name = "YahooCloseSeries", skip(self), fields(symbol = %symbol))]
    async fn close_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        // Widen the window by a day each side so bars stamped in the
        // exchange's local midnight are not cut off.
        let period1 = midnight_utc(start - Days::new(1));
        let period2 = midnight_utc(end + Days::new(2));
        let query = format!("interval=1d&period1={period1}&period2={period2}");

        let item = self.fetch_chart(symbol, &query).await?;
        let closes = item
            .daily_closes()
            .into_iter()
            .filter(|(date, _)| *date >= start && *date <= end)
            .collect::<Vec<_>>();
        debug!(count = closes.len(), "Parsed daily closes");
        Ok(closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn provider(mock_server: &MockServer) -> YahooFinanceProvider {
        YahooFinanceProvider::new(
            &mock_server.uri(),
            Duration::from_secs(2),
            RetryPolicy {
                retries: 0,
                delay: Duration::from_millis(1),
            },
        )
        .unwrap()
    }

    pub async fn create_mock_server(
        symbol: &str,
        status: u16,
        mock_response: &str,
    ) -> wiremock::MockServer {
        let mock_server = wiremock::MockServer::start().await;
        let request_path = format!("/v8/finance/chart/{symbol}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_latest_close_uses_last_close() {
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "meta": { "regularMarketPrice": 278.9, "gmtoffset": 3600 },
                    "timestamp": [1709506800, 1709593200],
                    "indicators": { "quote": [{ "close": [278.1, null] }] }
                }],
                "error": null
            }
        }"#;
        let mock_server = create_mock_server("USDPKR=X", 200, mock_response).await;

        let rate = provider(&mock_server)
            .latest_close("USDPKR=X")
            .await
            .unwrap();
        assert_eq!(rate, 278.1);
    }

    #[tokio::test]
    async fn test_latest_close_falls_back_to_market_price() {
        let mock_response = r#"{
            "chart": {
                "result": [{ "meta": { "regularMarketPrice": 1.2345 } }]
            }
        }"#;
        let mock_server = create_mock_server("USDEUR=X", 200, mock_response).await;

        let rate = provider(&mock_server)
            .latest_close("USDEUR=X")
            .await
            .unwrap();
        assert_eq!(rate, 1.2345);
    }

    #[tokio::test]
    async fn test_latest_close_requests_one_day_window() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/EURGBP=X"))
            .and(query_param("interval", "1d"))
            .and(query_param("range", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"chart": {"result": [{"meta": {"regularMarketPrice": 0.85}}]}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let rate = provider(&mock_server)
            .latest_close("EURGBP=X")
            .await
            .unwrap();
        assert_eq!(rate, 0.85);
    }

    #[tokio::test]
    async fn test_no_chart_result() {
        let mock_server = create_mock_server("USDEUR=X", 200, r#"{"chart": {"result": []}}"#).await;

        let result = provider(&mock_server).latest_close("USDEUR=X").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No chart data found for symbol: USDEUR=X"
        );
    }

    #[tokio::test]
    async fn test_no_price_at_all() {
        let mock_server =
            create_mock_server("USDEUR=X", 200, r#"{"chart": {"result": [{"meta": {}}]}}"#).await;

        let result = provider(&mock_server).latest_close("USDEUR=X").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No closing price found for symbol: USDEUR=X"
        );
    }

    #[tokio::test]
    async fn test_server_error() {
        let mock_server = create_mock_server("USDEUR=X", 500, "").await;

        let result = provider(&mock_server).latest_close("USDEUR=X").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for symbol: USDEUR=X"
        );
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let mock_response = r#"{
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        }"#;
        let mock_server = create_mock_server("USDXYZ=X", 404, mock_response).await;

        let result = provider(&mock_server).latest_close("USDXYZ=X").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 404 Not Found for symbol: USDXYZ=X (No data found, symbol may be delisted)"
        );
    }

    #[tokio::test]
    async fn test_error_in_successful_response() {
        let mock_response = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Bad Request", "description": "Invalid input" }
            }
        }"#;
        let mock_server = create_mock_server("USDEUR=X", 200, mock_response).await;

        let result = provider(&mock_server).latest_close("USDEUR=X").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Yahoo error for USDEUR=X: Bad Request: Invalid input"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_response = r#"{"chart": {"results": []}"#;
        let mock_server = create_mock_server("USDEUR=X", 200, mock_response).await;

        let result = provider(&mock_server).latest_close("USDEUR=X").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for USDEUR=X")
        );
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/USDEUR=X"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let provider = YahooFinanceProvider::new(
            &mock_server.uri(),
            Duration::from_millis(50),
            RetryPolicy {
                retries: 1,
                delay: Duration::from_millis(1),
            },
        )
        .unwrap();

        let result = provider.latest_close("USDEUR=X").await;
        assert!(result.unwrap_err().to_string().starts_with("Request error"));
    }

    #[tokio::test]
    async fn test_close_series_uses_exchange_dates() {
        // Bars at 00:00 Europe/London (UTC+1 in summer), i.e. 23:00 UTC the day before.
        let start = date(2024, 6, 3);
        let end = date(2024, 6, 5);
        let ts = |d: NaiveDate| midnight_utc(d) - 3600;
        let mock_response = format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "meta": {{ "regularMarketPrice": 1.09, "gmtoffset": 3600 }},
                        "timestamp": [{}, {}, {}, {}, {}],
                        "indicators": {{ "quote": [{{ "close": [1.07, 1.08, null, 1.085, 1.1] }}] }}
                    }}]
                }}
            }}"#,
            ts(date(2024, 5, 31)),
            ts(start),
            ts(date(2024, 6, 4)),
            ts(end),
            ts(date(2024, 6, 6)),
        );

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/EURUSD=X"))
            .and(query_param("interval", "1d"))
            .and(query_param(
                "period1",
                midnight_utc(date(2024, 6, 2)).to_string(),
            ))
            .and(query_param(
                "period2",
                midnight_utc(date(2024, 6, 7)).to_string(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        let series = provider(&mock_server)
            .close_series("EURUSD=X", start, end)
            .await
            .unwrap();
        assert_eq!(series, vec![(start, 1.08), (end, 1.085)]);
    }

    #[tokio::test]
    async fn test_close_series_without_bars_is_empty() {
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "meta": { "regularMarketPrice": 1.09, "gmtoffset": 0 },
                    "indicators": { "quote": [{}] }
                }]
            }
        }"#;
        let mock_server = create_mock_server("EURUSD=X", 200, mock_response).await;

        let series = provider(&mock_server)
            .close_series("EURUSD=X", date(2024, 6, 8), date(2024, 6, 8))
            .await
            .unwrap();
        assert!(series.is_empty());
    }
}
