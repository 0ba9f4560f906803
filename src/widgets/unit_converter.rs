//! Length, weight and temperature conversion.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;

use super::input::{parse_f64_or, split_command};
use super::{Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Length,
    Weight,
    Temperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Meters,
    Km,
    Miles,
    Feet,
    Inches,
    Kg,
    Grams,
    Lbs,
    Oz,
    Celsius,
    Fahrenheit,
    Kelvin,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("Cannot convert {from} to {to}")]
    Incompatible { from: Unit, to: Unit },
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
    #[error("Unknown quantity: {0}")]
    UnknownQuantity(String),
}

impl Quantity {
    /// Units in declaration order. The first two are the defaults.
    pub fn units(self) -> &'static [Unit] {
        match self {
            Quantity::Length => &[Unit::Meters, Unit::Km, Unit::Miles, Unit::Feet, Unit::Inches],
            Quantity::Weight => &[Unit::Kg, Unit::Grams, Unit::Lbs, Unit::Oz],
            Quantity::Temperature => &[Unit::Celsius, Unit::Fahrenheit, Unit::Kelvin],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quantity::Length => "length",
            Quantity::Weight => "weight",
            Quantity::Temperature => "temperature",
        }
    }
}

impl FromStr for Quantity {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "length" => Ok(Quantity::Length),
            "weight" => Ok(Quantity::Weight),
            "temperature" | "temp" => Ok(Quantity::Temperature),
            _ => Err(ConvertError::UnknownQuantity(s.to_string())),
        }
    }
}

impl Unit {
    pub fn name(self) -> &'static str {
        match self {
            Unit::Meters => "meters",
            Unit::Km => "km",
            Unit::Miles => "miles",
            Unit::Feet => "feet",
            Unit::Inches => "inches",
            Unit::Kg => "kg",
            Unit::Grams => "grams",
            Unit::Lbs => "lbs",
            Unit::Oz => "oz",
            Unit::Celsius => "celsius",
            Unit::Fahrenheit => "fahrenheit",
            Unit::Kelvin => "kelvin",
        }
    }

    pub fn quantity(self) -> Quantity {
        match self {
            Unit::Meters | Unit::Km | Unit::Miles | Unit::Feet | Unit::Inches => Quantity::Length,
            Unit::Kg | Unit::Grams | Unit::Lbs | Unit::Oz => Quantity::Weight,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => Quantity::Temperature,
        }
    }

    /// Units per base unit (meters, kilograms). Temperatures have none.
    pub fn factor(self) -> Option<f64> {
        match self {
            Unit::Meters => Some(1.0),
            Unit::Km => Some(0.001),
            Unit::Miles => Some(0.000621371),
            Unit::Feet => Some(3.28084),
            Unit::Inches => Some(39.3701),
            Unit::Kg => Some(1.0),
            Unit::Grams => Some(1000.0),
            Unit::Lbs => Some(2.20462),
            Unit::Oz => Some(35.274),
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_lowercase().as_str() {
            "meters" | "meter" | "m" => Unit::Meters,
            "km" | "kilometers" => Unit::Km,
            "miles" | "mile" | "mi" => Unit::Miles,
            "feet" | "foot" | "ft" => Unit::Feet,
            "inches" | "inch" | "in" => Unit::Inches,
            "kg" | "kilograms" => Unit::Kg,
            "grams" | "gram" | "g" => Unit::Grams,
            "lbs" | "lb" | "pounds" => Unit::Lbs,
            "oz" | "ounces" => Unit::Oz,
            "celsius" | "c" => Unit::Celsius,
            "fahrenheit" | "f" => Unit::Fahrenheit,
            "kelvin" | "k" => Unit::Kelvin,
            _ => return Err(ConvertError::UnknownUnit(s.to_string())),
        };
        Ok(unit)
    }
}

/// Convert `value` between two units of the same quantity.
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, ConvertError> {
    if from.quantity() != to.quantity() {
        return Err(ConvertError::Incompatible { from, to });
    }
    if from == to {
        return Ok(value);
    }

    match (from.factor(), to.factor()) {
        (Some(f), Some(t)) => Ok(value / f * t),
        _ => Ok(from_celsius(to_celsius(value, from), to)),
    }
}

fn to_celsius(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        Unit::Kelvin => value - 273.15,
        _ => value,
    }
}

fn from_celsius(celsius: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        Unit::Kelvin => celsius + 273.15,
        _ => celsius,
    }
}

/// Converter form state.
#[derive(Debug, Clone, PartialEq)]
pub struct Converter {
    pub quantity: Quantity,
    pub value: f64,
    pub from: Unit,
    pub to: Unit,
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            quantity: Quantity::Length,
            value: 1.0,
            from: Unit::Meters,
            to: Unit::Km,
        }
    }
}

impl Converter {
    /// Switch quantity, resetting units to its first two.
    pub fn set_quantity(&mut self, quantity: Quantity) {
        let units = quantity.units();
        self.quantity = quantity;
        self.from = units[0];
        self.to = units[1];
    }

    pub fn set_from(&mut self, unit: Unit) -> Result<(), ConvertError> {
        self.check(unit)?;
        self.from = unit;
        Ok(())
    }

    pub fn set_to(&mut self, unit: Unit) -> Result<(), ConvertError> {
        self.check(unit)?;
        self.to = unit;
        Ok(())
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    fn check(&self, unit: Unit) -> Result<(), ConvertError> {
        if unit.quantity() != self.quantity {
            return Err(ConvertError::Incompatible {
                from: unit,
                to: self.quantity.units()[0],
            });
        }
        Ok(())
    }

    pub fn result(&self) -> f64 {
        convert(self.value, self.from, self.to).unwrap_or(f64::NAN)
    }

    /// Result rounded to four places for display.
    pub fn display(&self) -> String {
        format!("{:.4}", self.result())
    }
}

const USAGE: &[(&str, &str)] = &[
    ("type <length|weight|temperature>", "Switch quantity"),
    ("value <number>", "Set the input value"),
    ("from <unit>", "Set the source unit"),
    ("to <unit>", "Set the target unit"),
    ("swap", "Swap source and target"),
    ("<number> <from> <to>", "Convert in one step"),
    ("show", "Show the result"),
];

pub struct ConverterWidget {
    state: Converter,
}

impl ConverterWidget {
    pub fn new() -> Self {
        Self {
            state: Converter::default(),
        }
    }

    pub fn state(&self) -> &Converter {
        &self.state
    }

    fn quick_convert(&mut self, input: &str) -> Result<bool, WidgetError> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let [value, from, to] = parts.as_slice() else {
            return Ok(false);
        };
        let Ok(value) = value.parse::<f64>() else {
            return Ok(false);
        };
        let from: Unit = from.parse().map_err(invalid)?;
        let to: Unit = to.parse().map_err(invalid)?;
        convert(value, from, to).map_err(invalid)?;

        self.state.set_quantity(from.quantity());
        self.state.from = from;
        self.state.to = to;
        self.state.value = value;
        Ok(true)
    }
}

impl Default for ConverterWidget {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(err: ConvertError) -> WidgetError {
    WidgetError::Invalid(err.to_string())
}

#[async_trait]
impl Widget for ConverterWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::UnitConverter
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        let s = &self.state;
        let units: Vec<&str> = s.quantity.units().iter().map(|u| u.name()).collect();
        Message::panel(
            format!("Unit Converter ({})", s.quantity.label()),
            [
                format!("{} {} = {} {}", s.value, s.from, s.display(), s.to),
                format!("Units: {}", units.join(", ")),
            ],
        )
    }

    async fn handle(
        &mut self,
        input: &str,
        _ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        if self.quick_convert(input)? {
            return Ok(vec![self.render()]);
        }

        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "type" | "quantity" => {
                let quantity: Quantity = arg.parse().map_err(invalid)?;
                self.state.set_quantity(quantity);
            }
            "value" => self.state.value = parse_f64_or(arg, 0.0),
            "from" => self.state.set_from(arg.parse().map_err(invalid)?).map_err(invalid)?,
            "to" => self.state.set_to(arg.parse().map_err(invalid)?).map_err(invalid)?,
            "swap" => self.state.swap(),
            "show" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}
