//! Historical exchange rate series

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, instrument};

use super::catalog::CurrencyCode;
use super::error::ConvertError;
use super::market::MarketDataProvider;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Daily closing rates in ascending date order, at most one per date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSeries {
    points: Vec<RatePoint>,
}

impl RateSeries {
    /// Builds a series from unordered points. Later duplicates of a date win,
    /// non-finite rates are dropped.
    pub fn from_points(points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let mut points: Vec<RatePoint> = points
            .into_iter()
            .filter(|(_, rate)| rate.is_finite())
            .map(|(date, rate)| RatePoint { date, rate })
            .collect();
        points.reverse();
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        RateSeries { points }
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&RatePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&RatePoint> {
        self.points.last()
    }

    pub fn min(&self) -> Option<&RatePoint> {
        self.points.iter().min_by(|a, b| a.rate.total_cmp(&b.rate))
    }

    pub fn max(&self) -> Option<&RatePoint> {
        self.points.iter().max_by(|a, b| a.rate.total_cmp(&b.rate))
    }

    /// Percentage change from the first to the last rate.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.first()?.rate;
        let last = self.last()?.rate;
        if first > 0.0 {
            Some(((last - first) / first) * 100.0)
        } else {
            None
        }
    }
}

/// Preset look-back windows ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendRange {
    OneMonth,
    SixMonths,
    OneYear,
}

impl Display for TrendRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TrendRange::OneMonth => "1M",
                TrendRange::SixMonths => "6M",
                TrendRange::OneYear => "1Y",
            }
        )
    }
}

impl TrendRange {
    pub fn to_duration(&self) -> Duration {
        match self {
            TrendRange::OneMonth => Duration::days(30),
            TrendRange::SixMonths => Duration::days(180),
            TrendRange::OneYear => Duration::days(365),
        }
    }

    pub fn start_from(&self, today: NaiveDate) -> NaiveDate {
        today - self.to_duration()
    }
}

impl FromStr for TrendRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1M" => Ok(TrendRange::OneMonth),
            "6M" => Ok(TrendRange::SixMonths),
            "1Y" => Ok(TrendRange::OneYear),
            _ => Err(anyhow::anyhow!("Invalid trend range: {}", s)),
        }
    }
}

pub struct HistoricalRateFetcher<'a> {
    provider: &'a dyn MarketDataProvider,
    today: NaiveDate,
}

impl<'a> HistoricalRateFetcher<'a> {
    pub fn new(provider: &'a dyn MarketDataProvider) -> Self {
        Self::with_today(provider, Local::now().date_naive())
    }

    /// Uses `today` as the latest date a range may end on.
    pub fn with_today(provider: &'a dyn MarketDataProvider, today: NaiveDate) -> Self {
        HistoricalRateFetcher { provider, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Fetches daily closing rates of `from` in `to` over `[start, end]`.
    ///
    /// Days without trading are simply absent. A range containing no trading
    /// day gives an empty series.
    #[instrument(name = "HistoricalRateFetch", skip(self))]
    pub async fn fetch(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, ConvertError> {
        if start > end || end > self.today {
            return Err(ConvertError::InvalidRange { start, end });
        }

        if from == to {
            debug!("Identical currencies, using a flat series");
            return Ok(flat_weekday_series(start, end));
        }

        let symbol = from.pair_symbol(to);
        let points = self
            .provider
            .close_series(&symbol, start, end)
            .await
            .map_err(|e| ConvertError::rate_unavailable(&symbol, format!("{e:#}")))?;

        let series = RateSeries::from_points(
            points
                .into_iter()
                .filter(|(date, _)| *date >= start && *date <= end),
        );
        debug!(points = series.len(), "Fetched rate series");
        Ok(series)
    }
}

fn flat_weekday_series(start: NaiveDate, end: NaiveDate) -> RateSeries {
    RateSeries::from_points(
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .map(|d| (d, 1.0)),
    )
}
