//! Error types for the estimation pipeline.
//!
//! Every violation is detected before kernel computation starts and is
//! terminal for that invocation: there are no retries and no partial
//! results. The three [`ErrorKind`] groups mirror the failure surface of
//! the public API (missing physical units, inconsistent inputs, and
//! malformed configuration).

use std::fmt;

use crate::types::Method;

/// Broad classification of an estimation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A coordinate or signal value was supplied without a physical unit.
    Unit,
    /// Inputs are mutually inconsistent or incompatible with the method.
    Validation,
    /// A hyperparameter or cross-validation setting is malformed.
    Config,
}

/// Failure reasons from CSD estimation.
#[derive(Debug, Clone)]
pub enum CsdError {
    /// An input value carries no unit tag and cannot be normalized.
    MissingUnit {
        /// What lacked the unit ("electrode position" or "signal").
        what: &'static str,
        /// Channel index of the offending input.
        index: usize,
    },
    /// Electrode count and signal channel count differ.
    ChannelCountMismatch {
        /// Number of electrode positions supplied.
        electrodes: usize,
        /// Number of signal channels supplied.
        signals: usize,
    },
    /// An electrode position has an unsupported number of components,
    /// or positions disagree on dimensionality.
    InvalidCoordinates {
        /// Channel index of the offending position.
        index: usize,
        /// Component count found at that index.
        components: usize,
        /// Component count required (0 means "between 1 and 3").
        expected: usize,
    },
    /// No estimation method was specified.
    UnspecifiedMethod,
    /// The requested method does not apply to the electrode geometry.
    IncompatibleMethod {
        /// The rejected method.
        method: Method,
        /// Dimensionality inferred from the electrode positions.
        dimensionality: usize,
        /// Methods valid for that dimensionality.
        available: &'static [Method],
    },
    /// Signal channels disagree on sample count.
    SampleCountMismatch {
        /// Sample count of the first channel.
        expected: usize,
        /// Channel index of the offending signal.
        index: usize,
        /// Sample count found at that index.
        found: usize,
    },
    /// A signal channel contains no samples.
    EmptySignal {
        /// Channel index of the empty signal.
        index: usize,
    },
    /// A cross-validation entry uses a key outside `{Rs, lambdas}`.
    UnknownCvKey {
        /// The rejected key.
        key: String,
    },
    /// Cross-validation candidates are unusable (empty, non-finite, or
    /// non-positive regularization values).
    InvalidCrossValidation {
        /// Description of the violation.
        reason: String,
    },
    /// A hyperparameter is out of range or non-finite.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of the violation.
        reason: String,
    },
}

impl CsdError {
    /// Classify this error into the coarse taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CsdError::MissingUnit { .. } => ErrorKind::Unit,
            CsdError::ChannelCountMismatch { .. }
            | CsdError::InvalidCoordinates { .. }
            | CsdError::UnspecifiedMethod
            | CsdError::IncompatibleMethod { .. }
            | CsdError::SampleCountMismatch { .. }
            | CsdError::EmptySignal { .. } => ErrorKind::Validation,
            CsdError::UnknownCvKey { .. }
            | CsdError::InvalidCrossValidation { .. }
            | CsdError::InvalidParameter { .. } => ErrorKind::Config,
        }
    }
}

impl fmt::Display for CsdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsdError::MissingUnit { what, index } => {
                write!(f, "no units given for {} at channel {}", what, index)
            }
            CsdError::ChannelCountMismatch { electrodes, signals } => write!(
                f,
                "number of signals and electrode positions is not the same ({} positions, {} signals)",
                electrodes, signals
            ),
            CsdError::InvalidCoordinates { index, components, expected } => {
                if *expected == 0 {
                    write!(
                        f,
                        "invalid number of coordinate components at channel {}: got {}, supported range is 1 to 3",
                        index, components
                    )
                } else {
                    write!(
                        f,
                        "inconsistent coordinate dimensionality at channel {}: got {} components, expected {}",
                        index, components, expected
                    )
                }
            }
            CsdError::UnspecifiedMethod => {
                write!(f, "must specify a method of CSD implementation")
            }
            CsdError::IncompatibleMethod { method, dimensionality, available } => write!(
                f,
                "method {} is invalid for {}D electrodes, available options are: {:?}",
                method, dimensionality, available
            ),
            CsdError::SampleCountMismatch { expected, index, found } => write!(
                f,
                "signal at channel {} has {} samples, expected {}",
                index, found, expected
            ),
            CsdError::EmptySignal { index } => {
                write!(f, "signal at channel {} contains no samples", index)
            }
            CsdError::UnknownCvKey { key } => {
                write!(f, "invalid cross-validation argument: unknown key {:?}", key)
            }
            CsdError::InvalidCrossValidation { reason } => {
                write!(f, "invalid cross-validation candidates: {}", reason)
            }
            CsdError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {:?}: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for CsdError {}
