//! Static unit categories and the supported currency list

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::error::ConvertError;
use super::units::{Dimension, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Pkr,
    Gbp,
    Jpy,
    Inr,
    Cad,
    Aud,
    Cny,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 9] = [
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Pkr,
        CurrencyCode::Gbp,
        CurrencyCode::Jpy,
        CurrencyCode::Inr,
        CurrencyCode::Cad,
        CurrencyCode::Aud,
        CurrencyCode::Cny,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Pkr => "PKR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Inr => "INR",
            CurrencyCode::Cad => "CAD",
            CurrencyCode::Aud => "AUD",
            CurrencyCode::Cny => "CNY",
        }
    }

    /// Market symbol for the `self` to `quote` pair, e.g. `USDEUR=X`.
    pub fn pair_symbol(&self, quote: CurrencyCode) -> String {
        format!("{}{}=X", self.code(), quote.code())
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        CurrencyCode::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| ConvertError::UnsupportedCurrency(s.trim().to_string()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> String {
        code.code().to_string()
    }
}

/// A named group of mutually convertible units.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCategory {
    pub name: &'static str,
    pub dimension: Dimension,
    pub units: Vec<Unit>,
}

impl UnitCategory {
    fn new(name: &'static str, dimension: Dimension) -> Self {
        UnitCategory {
            name,
            dimension,
            units: Unit::ALL
                .into_iter()
                .filter(|u| u.dimension() == dimension)
                .collect(),
        }
    }
}

/// Immutable catalog of unit categories and supported currencies.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<UnitCategory>,
    currencies: Vec<CurrencyCode>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog {
            categories: vec![
                UnitCategory::new("Length", Dimension::Length),
                UnitCategory::new("Weight", Dimension::Mass),
                UnitCategory::new("Temperature", Dimension::Temperature),
                UnitCategory::new("Speed", Dimension::Speed),
                UnitCategory::new("Volume", Dimension::Volume),
            ],
            currencies: CurrencyCode::ALL.to_vec(),
        }
    }

    pub fn categories(&self) -> &[UnitCategory] {
        &self.categories
    }

    pub fn currencies(&self) -> &[CurrencyCode] {
        &self.currencies
    }

    pub fn category(&self, name: &str) -> Option<&UnitCategory> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn category_of(&self, unit: Unit) -> Option<&UnitCategory> {
        self.categories.iter().find(|c| c.units.contains(&unit))
    }

    pub fn is_supported(&self, currency: CurrencyCode) -> bool {
        self.currencies.contains(&currency)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
