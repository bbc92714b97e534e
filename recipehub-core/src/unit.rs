//! Measurement units accepted for recipe ingredients.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HubError;

/// Broad kind of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCategory {
    Mass,
    Volume,
    Count,
}

/// A unit an ingredient amount can be recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "mL")]
    Milliliter,
    #[serde(rename = "dL")]
    Deciliter,
    #[serde(rename = "L")]
    Liter,
    #[serde(rename = "tsp")]
    Teaspoon,
    #[serde(rename = "tbsp")]
    Tablespoon,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "pcs")]
    Piece,
    #[serde(rename = "pinch")]
    Pinch,
    #[serde(rename = "clove")]
    Clove,
}

impl Unit {
    pub const ALL: &'static [Unit] = &[
        Unit::Milligram,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Ounce,
        Unit::Pound,
        Unit::Milliliter,
        Unit::Deciliter,
        Unit::Liter,
        Unit::Teaspoon,
        Unit::Tablespoon,
        Unit::Cup,
        Unit::Piece,
        Unit::Pinch,
        Unit::Clove,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Milligram => "mg",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::Milliliter => "mL",
            Unit::Deciliter => "dL",
            Unit::Liter => "L",
            Unit::Teaspoon => "tsp",
            Unit::Tablespoon => "tbsp",
            Unit::Cup => "cup",
            Unit::Piece => "pcs",
            Unit::Pinch => "pinch",
            Unit::Clove => "clove",
        }
    }

    pub fn category(&self) -> UnitCategory {
        match self {
            Unit::Milligram | Unit::Gram | Unit::Kilogram | Unit::Ounce | Unit::Pound => {
                UnitCategory::Mass
            }
            Unit::Milliliter
            | Unit::Deciliter
            | Unit::Liter
            | Unit::Teaspoon
            | Unit::Tablespoon
            | Unit::Cup => UnitCategory::Volume,
            Unit::Piece | Unit::Pinch | Unit::Clove => UnitCategory::Count,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = HubError;

    /// Parses the canonical symbol exactly, falling back to a few common
    /// spellings ("grams", "ml", "tablespoons", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(unit) = Unit::ALL.iter().find(|u| u.as_str() == trimmed) {
            return Ok(*unit);
        }

        let unit = match trimmed.to_lowercase().as_str() {
            "milligram" | "milligrams" => Unit::Milligram,
            "gram" | "grams" => Unit::Gram,
            "kilogram" | "kilograms" => Unit::Kilogram,
            "ounce" | "ounces" => Unit::Ounce,
            "pound" | "pounds" | "lbs" => Unit::Pound,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Unit::Milliliter
            }
            "dl" | "deciliter" | "deciliters" | "decilitre" | "decilitres" => Unit::Deciliter,
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
            "teaspoon" | "teaspoons" => Unit::Teaspoon,
            "tablespoon" | "tablespoons" => Unit::Tablespoon,
            "cups" => Unit::Cup,
            "piece" | "pieces" => Unit::Piece,
            "pinches" => Unit::Pinch,
            "cloves" => Unit::Clove,
            _ => return Err(HubError::Argument(format!("Unknown unit: {:?}", s))),
        };
        Ok(unit)
    }
}
