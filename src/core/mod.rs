//! Conversion logic and its supporting types

pub mod catalog;
pub mod config;
pub mod currency;
pub mod error;
pub mod history;
pub mod log;
pub mod market;
pub mod units;

// Re-export main types for cleaner imports
pub use catalog::{Catalog, CurrencyCode, UnitCategory};
pub use currency::{Conversion, CurrencyConverter};
pub use error::{ConversionError, ConvertError};
pub use history::{HistoricalRateFetcher, RatePoint, RateSeries, TrendRange};
pub use market::MarketDataProvider;
pub use units::{Dimension, Quantity, Unit, UnitConverter, UnitRegistry};
