//! Incompressible working liquid.

use crate::error::{FluidError, FluidResult};
use hv_core::units::{Density, kgpm3};

/// Incompressible liquid filling the lower part of a vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct IncompressibleLiquid {
    name: String,
    density: Density,
    /// The medium has one thermodynamic state (pressure does not enter
    /// its energy), so boundary work on it is not tracked.
    pub single_state: bool,
}

impl IncompressibleLiquid {
    pub fn new(name: impl Into<String>, density: Density) -> FluidResult<Self> {
        if !density.value.is_finite() || density.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "liquid density must be positive and finite",
            });
        }
        Ok(Self {
            name: name.into(),
            density,
            single_state: false,
        })
    }

    /// Liquid water near 20 °C.
    pub fn water() -> Self {
        Self {
            name: "water".to_string(),
            density: kgpm3(998.2),
            single_state: false,
        }
    }

    /// Mineral hydraulic oil (ISO VG 46 class).
    pub fn hydraulic_oil() -> Self {
        Self {
            name: "hydraulic-oil".to_string(),
            density: kgpm3(870.0),
            single_state: false,
        }
    }

    pub fn with_single_state(mut self, single_state: bool) -> Self {
        self.single_state = single_state;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn density(&self) -> Density {
        self.density
    }
}
