//! Error types for vessel balance evaluation.

use hv_core::{HvError, PortId};
use hv_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while evaluating a vessel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VesselError {
    /// Liquid extent outside [0, capacity]; the run cannot continue.
    #[error("Geometric violation: {what} (extent={extent}, capacity={capacity})")]
    GeometricViolation {
        what: &'static str,
        extent: f64,
        capacity: f64,
    },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Port {port} static pressure is not positive: {pressure_pa} Pa")]
    NegativePressure { port: PortId, pressure_pa: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Initialization failed: {what}")]
    InitializationFailed { what: String },

    #[error("Equation of state error: {0}")]
    Fluid(#[from] FluidError),
}

pub type VesselResult<T> = Result<T, VesselError>;

impl From<VesselError> for HvError {
    fn from(e: VesselError) -> Self {
        match e {
            VesselError::GeometricViolation {
                what,
                extent,
                capacity,
            } => HvError::OutOfBounds {
                what,
                value: extent,
                min: 0.0,
                max: capacity,
            },
            VesselError::NonPhysical { what } => HvError::Invariant { what },
            VesselError::NegativePressure { .. } => HvError::Invariant {
                what: "port pressure",
            },
            VesselError::InvalidArg { what } => HvError::InvalidArg { what },
            VesselError::InitializationFailed { .. } => HvError::Invariant {
                what: "initialization",
            },
            VesselError::Fluid(e) => e.into(),
        }
    }
}
