//! hv-fluids: equation-of-state models for hydrovessel.
//!
//! Provides:
//! - Cushion gas species (N2, air) with constant property data
//! - `GasModel` trait: density and internal energy from (p, T), plus the
//!   inverses the balance core needs
//! - CoolProp real-gas backend (default for cushions)
//! - Closed-form ideal gas and van der Waals models
//! - Incompressible working liquid
//!
//! # Example
//!
//! ```
//! use hv_fluids::{CoolPropGas, GasModel};
//! use hv_core::units::{k, pa};
//!
//! let n2 = CoolPropGas::nitrogen();
//! let rho = n2.density(pa(5.0e6), k(293.15)).unwrap();
//! assert!(rho.value > 50.0);
//! ```

pub mod coolprop;
pub mod error;
pub mod ideal_gas;
pub mod liquid;
pub mod model;
pub mod species;
pub mod van_der_waals;

// Re-exports for ergonomics
pub use coolprop::CoolPropGas;
pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGas;
pub use liquid::IncompressibleLiquid;
pub use model::{GasModel, GasState, SpecInternalEnergy};
pub use species::GasSpecies;
pub use van_der_waals::VanDerWaals;
