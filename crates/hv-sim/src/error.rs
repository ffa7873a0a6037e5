//! Error types for simulation operations.

use hv_core::HvError;
use hv_fluids::FluidError;
use hv_vessel::VesselError;
use thiserror::Error;

/// Errors encountered during transient simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Event location failed at t={t}: {what}")]
    EventLocation { what: &'static str, t: f64 },

    #[error("Step limit of {max_steps} reached at t={t} before t_end={t_end}")]
    StepLimit { t: f64, t_end: f64, max_steps: usize },

    #[error("Mode switch chattering at t={t}: {events} events within one time step")]
    EventChatter { t: f64, events: usize },

    #[error("Vessel error: {0}")]
    Vessel(#[from] VesselError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<HvError> for SimError {
    fn from(e: HvError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
