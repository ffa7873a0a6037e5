//! Fluid property errors.

use hv_core::HvError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during equation-of-state evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value outside the model's validity envelope.
    #[error("Value out of range for {what}: {value} not in [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// CoolProp backend error.
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Convergence failure (e.g., solving for density given P,T).
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },
}

impl From<FluidError> for HvError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => HvError::Invariant { what },
            FluidError::OutOfRange {
                what,
                value,
                min,
                max,
            } => HvError::OutOfBounds {
                what,
                value,
                min,
                max,
            },
            FluidError::InvalidArg { what } => HvError::InvalidArg { what },
            FluidError::Backend { .. } => HvError::Invariant {
                what: "fluid backend error",
            },
            FluidError::ConvergenceFailed { what } => HvError::Invariant { what },
        }
    }
}
