//! Method tags and input data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::{LengthUnit, PotentialUnit};

/// Estimation method, constrained by electrode dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Kernel CSD for laminar probes (1D).
    Kcsd1d,
    /// Kernel CSD for planar multi-electrode arrays (2D).
    Kcsd2d,
    /// Kernel CSD for arrays of laminar probes (3D).
    Kcsd3d,
    /// Kernel CSD for planar arrays near a tissue/saline boundary,
    /// corrected with mirror-image sources (2D).
    MoiKcsd,
}

/// Methods valid for 1D electrode geometries.
pub static AVAILABLE_1D: &[Method] = &[Method::Kcsd1d];

/// Methods valid for 2D electrode geometries.
pub static AVAILABLE_2D: &[Method] = &[Method::Kcsd2d, Method::MoiKcsd];

/// Methods valid for 3D electrode geometries.
pub static AVAILABLE_3D: &[Method] = &[Method::Kcsd3d];

impl Method {
    /// Coordinate dimensionality this method requires.
    pub fn dimensionality(&self) -> usize {
        match self {
            Method::Kcsd1d => 1,
            Method::Kcsd2d | Method::MoiKcsd => 2,
            Method::Kcsd3d => 3,
        }
    }

    /// Methods valid for electrodes of the given dimensionality.
    ///
    /// Returns an empty slice outside the supported 1..=3 range.
    pub fn available_for(dimensionality: usize) -> &'static [Method] {
        match dimensionality {
            1 => AVAILABLE_1D,
            2 => AVAILABLE_2D,
            3 => AVAILABLE_3D,
            _ => &[],
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Kcsd1d => "KCSD1D",
            Method::Kcsd2d => "KCSD2D",
            Method::Kcsd3d => "KCSD3D",
            Method::MoiKcsd => "MoIKCSD",
        };
        f.write_str(name)
    }
}

/// Spatial position of one electrode, with an optional length unit.
///
/// Positions arriving from acquisition files often carry no unit; the
/// dispatch layer rejects those instead of guessing a scale. Use the
/// unit-tagged constructors for anything that should actually estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectrodePosition {
    components: Vec<f64>,
    unit: Option<LengthUnit>,
}

impl ElectrodePosition {
    /// Position in millimetres.
    pub fn millimeters(components: &[f64]) -> Self {
        Self { components: components.to_vec(), unit: Some(LengthUnit::Millimeters) }
    }

    /// Position in micrometres.
    pub fn micrometers(components: &[f64]) -> Self {
        Self { components: components.to_vec(), unit: Some(LengthUnit::Micrometers) }
    }

    /// Position with an explicit unit.
    pub fn with_unit(components: &[f64], unit: LengthUnit) -> Self {
        Self { components: components.to_vec(), unit: Some(unit) }
    }

    /// Position without a unit tag. Rejected by the dispatch layer.
    pub fn untagged(components: &[f64]) -> Self {
        Self { components: components.to_vec(), unit: None }
    }

    /// Number of coordinate components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the position has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Unit tag, if any.
    pub fn unit(&self) -> Option<LengthUnit> {
        self.unit
    }

    /// Components rescaled to millimetres, or `None` when untagged.
    pub fn to_millimeters(&self) -> Option<Vec<f64>> {
        let unit = self.unit?;
        Some(self.components.iter().map(|&c| unit.to_millimeters(c)).collect())
    }
}

/// One channel of recorded extracellular potential.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectrodeSignal {
    samples: Vec<f64>,
    unit: Option<PotentialUnit>,
    t_start: f64,
    sampling_period: f64,
}

impl ElectrodeSignal {
    /// Signal in millivolts with sampling metadata in seconds.
    pub fn millivolts(samples: Vec<f64>, t_start: f64, sampling_period: f64) -> Self {
        Self { samples, unit: Some(PotentialUnit::Millivolts), t_start, sampling_period }
    }

    /// Signal in microvolts with sampling metadata in seconds.
    pub fn microvolts(samples: Vec<f64>, t_start: f64, sampling_period: f64) -> Self {
        Self { samples, unit: Some(PotentialUnit::Microvolts), t_start, sampling_period }
    }

    /// Signal with an explicit unit.
    pub fn with_unit(
        samples: Vec<f64>,
        unit: PotentialUnit,
        t_start: f64,
        sampling_period: f64,
    ) -> Self {
        Self { samples, unit: Some(unit), t_start, sampling_period }
    }

    /// Signal without a unit tag. Rejected by the dispatch layer.
    pub fn untagged(samples: Vec<f64>, t_start: f64, sampling_period: f64) -> Self {
        Self { samples, unit: None, t_start, sampling_period }
    }

    /// Number of time samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the signal holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Unit tag, if any.
    pub fn unit(&self) -> Option<PotentialUnit> {
        self.unit
    }

    /// Start time of the first sample, in seconds.
    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    /// Sampling period, in seconds.
    pub fn sampling_period(&self) -> f64 {
        self.sampling_period
    }

    /// Samples rescaled to millivolts, or `None` when untagged.
    pub fn to_millivolts(&self) -> Option<Vec<f64>> {
        let unit = self.unit?;
        Some(self.samples.iter().map(|&v| unit.to_millivolts(v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_dimensionality_tables_agree() {
        for dim in 1..=3 {
            for method in Method::available_for(dim) {
                assert_eq!(method.dimensionality(), dim);
            }
        }
        assert!(Method::available_for(4).is_empty());
    }

    #[test]
    fn moi_is_planar() {
        assert_eq!(Method::MoiKcsd.dimensionality(), 2);
        assert!(AVAILABLE_2D.contains(&Method::MoiKcsd));
        assert!(!AVAILABLE_3D.contains(&Method::MoiKcsd));
    }

    #[test]
    fn untagged_position_does_not_rescale() {
        let pos = ElectrodePosition::untagged(&[0.5]);
        assert!(pos.to_millimeters().is_none());
    }

    #[test]
    fn micrometer_position_rescales() {
        let pos = ElectrodePosition::micrometers(&[500.0, 1000.0]);
        let mm = pos.to_millimeters().unwrap();
        assert!((mm[0] - 0.5).abs() < 1e-12);
        assert!((mm[1] - 1.0).abs() < 1e-12);
    }
}
