//! hv-vessel: lumped-volume balance engine for hydraulic storage vessels.
//!
//! One [`Vessel`] type covers the open tank, the nitrogen accumulator and
//! the air-cushion tank; the variants differ in their [`CushionKind`].
//!
//! Each evaluation is a pure function of the state and the latched regime:
//! - [`balance`]: volume partition, boundary work, state derivatives
//! - [`regime`]: compression / rest pressure closure
//! - [`port`]: static pressure per port
//! - [`init`]: start-time closure (fixed, steady-state, free)

pub mod balance;
pub mod cushion;
pub mod error;
pub mod geometry;
pub mod init;
pub mod port;
pub mod regime;
pub mod vessel;

pub use balance::{BalanceOutputs, Derivatives, EnergyDynamics, GasSnapshot, VesselState};
pub use cushion::{CushionKind, GasCushion};
pub use error::{VesselError, VesselResult};
pub use geometry::{ExtentKind, Geometry};
pub use init::{InitialConditions, InitializationPolicy};
pub use port::{Port, PortResistance};
pub use regime::Regime;
pub use vessel::{BoundaryCondition, Vessel, VesselBuilder};
