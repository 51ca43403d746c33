//! Physical unit tags for lengths and potentials.
//!
//! The estimator works in a single internal unit system: millimetres for
//! lengths and millivolts for potentials. These tags exist so that the
//! dispatch layer can normalize externally supplied values once, up
//! front, and reject anything that arrives without a unit.

use serde::{Deserialize, Serialize};

/// Linear length unit of an electrode coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    /// 1e-3 mm.
    Micrometers,
    /// Internal reference unit.
    Millimeters,
    /// 10 mm.
    Centimeters,
    /// 1000 mm.
    Meters,
}

impl LengthUnit {
    /// Rescale a value in this unit to millimetres.
    pub fn to_millimeters(self, value: f64) -> f64 {
        match self {
            LengthUnit::Micrometers => value * 1e-3,
            LengthUnit::Millimeters => value,
            LengthUnit::Centimeters => value * 10.0,
            LengthUnit::Meters => value * 1e3,
        }
    }
}

/// Electric potential unit of a recorded signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotentialUnit {
    /// 1e-3 mV.
    Microvolts,
    /// Internal reference unit.
    Millivolts,
    /// 1000 mV.
    Volts,
}

impl PotentialUnit {
    /// Rescale a value in this unit to millivolts.
    pub fn to_millivolts(self, value: f64) -> f64 {
        match self {
            PotentialUnit::Microvolts => value * 1e-3,
            PotentialUnit::Millivolts => value,
            PotentialUnit::Volts => value * 1e3,
        }
    }
}
