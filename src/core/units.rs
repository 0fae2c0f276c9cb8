//! Dimensional analysis for the supported physical units

use std::collections::HashMap;
use std::fmt::Display;
use tracing::debug;

use super::error::{ConversionError, ConvertError, check_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Dimension {
    Length,
    Mass,
    Temperature,
    Speed,
    Volume,
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Dimension::Length => "length",
                Dimension::Mass => "mass",
                Dimension::Temperature => "temperature",
                Dimension::Speed => "speed",
                Dimension::Volume => "volume",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Meter,
    Kilometer,
    Mile,
    Yard,
    Foot,
    Inch,
    Gram,
    Kilogram,
    Pound,
    Ounce,
    Ton,
    Celsius,
    Fahrenheit,
    Kelvin,
    MeterPerSecond,
    KilometerPerHour,
    MilePerHour,
    FootPerSecond,
    Liter,
    Milliliter,
    Gallon,
    CubicMeter,
    CubicFoot,
}

const METERS_PER_MILE: f64 = 1609.344;
const METERS_PER_FOOT: f64 = 0.3048;
const KILOGRAMS_PER_POUND: f64 = 0.45359237;
const SECONDS_PER_HOUR: f64 = 3600.0;

impl Unit {
    pub const ALL: [Unit; 23] = [
        Unit::Meter,
        Unit::Kilometer,
        Unit::Mile,
        Unit::Yard,
        Unit::Foot,
        Unit::Inch,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Pound,
        Unit::Ounce,
        Unit::Ton,
        Unit::Celsius,
        Unit::Fahrenheit,
        Unit::Kelvin,
        Unit::MeterPerSecond,
        Unit::KilometerPerHour,
        Unit::MilePerHour,
        Unit::FootPerSecond,
        Unit::Liter,
        Unit::Milliliter,
        Unit::Gallon,
        Unit::CubicMeter,
        Unit::CubicFoot,
    ];

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Meter | Unit::Kilometer | Unit::Mile | Unit::Yard | Unit::Foot | Unit::Inch => {
                Dimension::Length
            }
            Unit::Gram | Unit::Kilogram | Unit::Pound | Unit::Ounce | Unit::Ton => Dimension::Mass,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => Dimension::Temperature,
            Unit::MeterPerSecond
            | Unit::KilometerPerHour
            | Unit::MilePerHour
            | Unit::FootPerSecond => Dimension::Speed,
            Unit::Liter
            | Unit::Milliliter
            | Unit::Gallon
            | Unit::CubicMeter
            | Unit::CubicFoot => Dimension::Volume,
        }
    }

    /// Canonical identifier, as listed in the unit catalog.
    pub fn id(&self) -> &'static str {
        match self {
            Unit::Meter => "meter",
            Unit::Kilometer => "kilometer",
            Unit::Mile => "mile",
            Unit::Yard => "yard",
            Unit::Foot => "foot",
            Unit::Inch => "inch",
            Unit::Gram => "gram",
            Unit::Kilogram => "kilogram",
            Unit::Pound => "pound",
            Unit::Ounce => "ounce",
            Unit::Ton => "ton",
            Unit::Celsius => "celsius",
            Unit::Fahrenheit => "fahrenheit",
            Unit::Kelvin => "kelvin",
            Unit::MeterPerSecond => "meter/second",
            Unit::KilometerPerHour => "kilometer/hour",
            Unit::MilePerHour => "mile/hour",
            Unit::FootPerSecond => "foot/second",
            Unit::Liter => "liter",
            Unit::Milliliter => "milliliter",
            Unit::Gallon => "gallon",
            Unit::CubicMeter => "cubic meter",
            Unit::CubicFoot => "cubic foot",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Meter => "m",
            Unit::Kilometer => "km",
            Unit::Mile => "mi",
            Unit::Yard => "yd",
            Unit::Foot => "ft",
            Unit::Inch => "in",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Pound => "lb",
            Unit::Ounce => "oz",
            Unit::Ton => "ton",
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Kelvin => "K",
            Unit::MeterPerSecond => "m/s",
            Unit::KilometerPerHour => "km/h",
            Unit::MilePerHour => "mph",
            Unit::FootPerSecond => "ft/s",
            Unit::Liter => "L",
            Unit::Milliliter => "mL",
            Unit::Gallon => "gal",
            Unit::CubicMeter => "m³",
            Unit::CubicFoot => "ft³",
        }
    }

    /// Alternative spellings accepted when parsing, besides `id` and `symbol`.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Unit::Meter => &["meters", "metre", "metres"],
            Unit::Kilometer => &["kilometers", "kilometre", "kilometres"],
            Unit::Mile => &["miles"],
            Unit::Yard => &["yards"],
            Unit::Foot => &["feet"],
            Unit::Inch => &["inches"],
            Unit::Gram => &["grams", "gramme", "grammes"],
            Unit::Kilogram => &["kilograms", "kilogramme", "kilogrammes"],
            Unit::Pound => &["pounds", "lbs"],
            Unit::Ounce => &["ounces"],
            Unit::Ton => &["tons", "short ton", "short tons"],
            Unit::Celsius => &["c", "degc", "degree celsius", "degrees celsius"],
            Unit::Fahrenheit => &["f", "degf", "degree fahrenheit", "degrees fahrenheit"],
            Unit::Kelvin => &["kelvins"],
            Unit::MeterPerSecond => &[
                "meters/second",
                "meter per second",
                "meters per second",
                "metre per second",
                "metres per second",
            ],
            Unit::KilometerPerHour => &[
                "kilometers/hour",
                "kilometer per hour",
                "kilometers per hour",
                "kilometre per hour",
                "kilometres per hour",
                "kph",
                "kmh",
            ],
            Unit::MilePerHour => &["miles/hour", "mile per hour", "miles per hour", "mi/h"],
            Unit::FootPerSecond => &["feet/second", "foot per second", "feet per second", "fps"],
            Unit::Liter => &["liters", "litre", "litres"],
            Unit::Milliliter => &["milliliters", "millilitre", "millilitres"],
            Unit::Gallon => &["gallons"],
            Unit::CubicMeter => &["cubic meters", "cubic metre", "cubic metres", "m3", "m^3"],
            Unit::CubicFoot => &["cubic feet", "ft3", "ft^3"],
        }
    }

    /// Affine mapping onto the dimension's base unit: `base = (value + offset) * scale`.
    ///
    /// Base units are meter, kilogram, kelvin, meter/second and cubic meter.
    fn to_base_params(&self) -> (f64, f64) {
        match self {
            Unit::Meter => (0.0, 1.0),
            Unit::Kilometer => (0.0, 1000.0),
            Unit::Mile => (0.0, METERS_PER_MILE),
            Unit::Yard => (0.0, 3.0 * METERS_PER_FOOT),
            Unit::Foot => (0.0, METERS_PER_FOOT),
            Unit::Inch => (0.0, METERS_PER_FOOT / 12.0),
            Unit::Gram => (0.0, 0.001),
            Unit::Kilogram => (0.0, 1.0),
            Unit::Pound => (0.0, KILOGRAMS_PER_POUND),
            Unit::Ounce => (0.0, KILOGRAMS_PER_POUND / 16.0),
            Unit::Ton => (0.0, 2000.0 * KILOGRAMS_PER_POUND),
            Unit::Celsius => (273.15, 1.0),
            Unit::Fahrenheit => (459.67, 5.0 / 9.0),
            Unit::Kelvin => (0.0, 1.0),
            Unit::MeterPerSecond => (0.0, 1.0),
            Unit::KilometerPerHour => (0.0, 1000.0 / SECONDS_PER_HOUR),
            Unit::MilePerHour => (0.0, METERS_PER_MILE / SECONDS_PER_HOUR),
            Unit::FootPerSecond => (0.0, METERS_PER_FOOT),
            Unit::Liter => (0.0, 0.001),
            Unit::Milliliter => (0.0, 1e-6),
            Unit::Gallon => (0.0, 0.003_785_411_784),
            Unit::CubicMeter => (0.0, 1.0),
            Unit::CubicFoot => (0.0, METERS_PER_FOOT * METERS_PER_FOOT * METERS_PER_FOOT),
        }
    }

    fn to_base(&self, value: f64) -> f64 {
        let (offset, scale) = self.to_base_params();
        (value + offset) * scale
    }

    fn from_base(&self, base: f64) -> f64 {
        let (offset, scale) = self.to_base_params();
        base / scale - offset
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A magnitude tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub magnitude: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Quantity { magnitude, unit }
    }

    /// Re-expresses the quantity in `target`, which must share its dimension.
    pub fn to(&self, target: Unit) -> Result<Quantity, ConversionError> {
        if self.unit == target {
            return Ok(*self);
        }
        if self.unit.dimension() != target.dimension() {
            return Err(ConversionError::IncompatibleDimensions {
                from: self.unit.id().to_string(),
                from_dimension: self.unit.dimension(),
                to: target.id().to_string(),
                to_dimension: target.dimension(),
            });
        }
        let base = self.unit.to_base(self.magnitude);
        Ok(Quantity::new(target.from_base(base), target))
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit.symbol())
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Lookup table from unit spellings to units, built once at start-up.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    names: HashMap<String, Unit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut names = HashMap::new();
        for unit in Unit::ALL {
            let spellings = [unit.id(), unit.symbol()]
                .into_iter()
                .chain(unit.aliases().iter().copied());
            for name in spellings {
                names.insert(normalize(name), unit);
            }
        }
        debug!(count = names.len(), "Built unit registry");
        UnitRegistry { names }
    }

    pub fn parse(&self, name: &str) -> Result<Unit, ConversionError> {
        self.names
            .get(&normalize(name))
            .copied()
            .ok_or_else(|| ConversionError::UnknownUnit(name.trim().to_string()))
    }

    pub fn quantity(&self, magnitude: f64, unit: &str) -> Result<Quantity, ConversionError> {
        Ok(Quantity::new(magnitude, self.parse(unit)?))
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts values between units of the same dimension.
pub struct UnitConverter<'a> {
    registry: &'a UnitRegistry,
}

impl<'a> UnitConverter<'a> {
    pub fn new(registry: &'a UnitRegistry) -> Self {
        UnitConverter { registry }
    }

    /// Converts `value` from the unit named `from` to the unit named `to`.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConvertError> {
        let value = check_amount(value)?;
        let target = self.registry.parse(to)?;
        let quantity = self.registry.quantity(value, from)?;
        let converted = quantity.to(target)?;
        debug!(%quantity, %converted, "Converted units");
        Ok(converted.magnitude)
    }

    pub fn convert_units(&self, value: f64, from: Unit, to: Unit) -> Result<f64, ConvertError> {
        let value = check_amount(value)?;
        Ok(Quantity::new(value, from).to(to)?.magnitude)
    }
}
