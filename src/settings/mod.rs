//! Static per-quantity chart settings
//!
//! Every plotted hormone measure has a display unit, a minimum axis floor and a
//! normal range. Floors and ranges differ between the two simulator variants.
//! The table is built once on first access and never mutated afterwards.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// One of the five plotted hormone measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quantity {
    FT4,
    FT3,
    T4,
    T3,
    TSH,
}

impl Quantity {
    /// All quantities in chart order (top to bottom)
    pub const ALL: [Quantity; 5] = [
        Quantity::FT4,
        Quantity::FT3,
        Quantity::T4,
        Quantity::T3,
        Quantity::TSH,
    ];

    /// Display key, e.g. `FT4`
    pub fn key(&self) -> &'static str {
        match self {
            Quantity::FT4 => "FT4",
            Quantity::FT3 => "FT3",
            Quantity::T4 => "T4",
            Quantity::T3 => "T3",
            Quantity::TSH => "TSH",
        }
    }

    /// Solver-internal compartment key for this quantity
    pub fn compartment(&self) -> &'static str {
        match self {
            Quantity::FT4 => "ft4",
            Quantity::FT3 => "ft3",
            Quantity::T4 => "1",
            Quantity::T3 => "4",
            Quantity::TSH => "7",
        }
    }

    /// Inverse of [Quantity::compartment]
    pub fn from_compartment(key: &str) -> Option<Quantity> {
        Quantity::ALL.into_iter().find(|q| q.compartment() == key)
    }

    /// The static settings record for this quantity
    pub fn settings(&self) -> &'static QuantitySettings {
        &SETTINGS[self]
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::ALL
            .into_iter()
            .find(|q| q.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown quantity '{s}'"))
    }
}

/// The simulator variant selected on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Variant {
    /// Adult model (`Thyrosim`)
    #[default]
    #[serde(alias = "Thyrosim")]
    Standard,
    /// Pediatric model (`ThyrosimJr`)
    #[serde(alias = "ThyrosimJr")]
    Junior,
}

impl Variant {
    /// Name sent to the solver in the `thysim` field
    pub fn wire_name(&self) -> &'static str {
        match self {
            Variant::Standard => "Thyrosim",
            Variant::Junior => "ThyrosimJr",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Variant> {
        match name {
            "Thyrosim" => Some(Variant::Standard),
            "ThyrosimJr" => Some(Variant::Junior),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Normal (reference) range of a quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalRange {
    pub lo: f64,
    pub hi: f64,
}

impl NormalRange {
    const fn new(lo: f64, hi: f64) -> Self {
        NormalRange { lo, hi }
    }
}

/// A pair of values, one per simulator variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerVariant<T> {
    pub standard: T,
    pub junior: T,
}

impl<T: Copy> PerVariant<T> {
    pub fn get(&self, variant: Variant) -> T {
        match variant {
            Variant::Standard => self.standard,
            Variant::Junior => self.junior,
        }
    }
}

/// Display unit, axis floor and normal range of a quantity
#[derive(Debug, Clone, PartialEq)]
pub struct QuantitySettings {
    unit: &'static str,
    floor: PerVariant<f64>,
    range: PerVariant<NormalRange>,
}

impl QuantitySettings {
    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// Smallest value the y axis is allowed to scale down to
    pub fn floor(&self, variant: Variant) -> f64 {
        self.floor.get(variant)
    }

    pub fn range(&self, variant: Variant) -> NormalRange {
        self.range.get(variant)
    }
}

lazy_static! {
    static ref SETTINGS: HashMap<Quantity, QuantitySettings> = {
        let mut table = HashMap::with_capacity(Quantity::ALL.len());
        table.insert(
            Quantity::FT4,
            QuantitySettings {
                unit: "ng/L",
                floor: PerVariant { standard: 17.0, junior: 15.0 },
                range: PerVariant {
                    standard: NormalRange::new(8.0, 17.0),
                    junior: NormalRange::new(10.0, 14.0),
                },
            },
        );
        table.insert(
            Quantity::FT3,
            QuantitySettings {
                unit: "ng/L",
                floor: PerVariant { standard: 4.0, junior: 7.0 },
                range: PerVariant {
                    standard: NormalRange::new(2.22, 3.83),
                    junior: NormalRange::new(2.32, 7.07),
                },
            },
        );
        table.insert(
            Quantity::T4,
            QuantitySettings {
                unit: "\u{3bc}g/L",
                floor: PerVariant { standard: 110.0, junior: 120.0 },
                range: PerVariant {
                    standard: NormalRange::new(45.0, 105.0),
                    junior: NormalRange::new(59.0, 119.0),
                },
            },
        );
        table.insert(
            Quantity::T3,
            QuantitySettings {
                unit: "\u{3bc}g/L",
                floor: PerVariant { standard: 1.0, junior: 2.0 },
                range: PerVariant {
                    standard: NormalRange::new(0.6, 1.8),
                    junior: NormalRange::new(1.0, 2.15),
                },
            },
        );
        table.insert(
            Quantity::TSH,
            QuantitySettings {
                unit: "mU/L",
                floor: PerVariant { standard: 4.0, junior: 4.0 },
                range: PerVariant {
                    standard: NormalRange::new(0.3, 4.0),
                    junior: NormalRange::new(0.6, 4.0),
                },
            },
        );
        table
    };
}
