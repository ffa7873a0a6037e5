//! Ideal gas with constant specific heat.

use crate::error::FluidResult;
use crate::model::validation::{
    validate_density, validate_internal_energy, validate_pressure, validate_temperature,
};
use crate::model::{GasModel, SpecInternalEnergy};
use crate::species::GasSpecies;
use hv_core::units::{Density, Pressure, Temperature, k, kgpm3, pa};

/// Reference temperature where the specific internal energy is zero [K].
pub const T_REF_K: f64 = 298.15;

/// Ideal gas model: p = ρ·R·T, u = cv·(T − T_ref).
///
/// Suitable for air cushions at moderate pressure where real gas effects
/// are negligible.
#[derive(Debug, Clone)]
pub struct IdealGas {
    species: GasSpecies,
    r: f64,
    cv: f64,
}

impl IdealGas {
    /// Ideal gas with the species' tabulated R and cv.
    pub fn new(species: GasSpecies) -> Self {
        Self {
            species,
            r: species.gas_constant(),
            cv: species.cv(),
        }
    }

    /// Ideal dry air.
    pub fn air() -> Self {
        Self::new(GasSpecies::Air)
    }

    /// Specific gas constant [J/(kg·K)].
    pub fn gas_constant(&self) -> f64 {
        self.r
    }

    /// Constant-volume specific heat [J/(kg·K)].
    pub fn cv(&self) -> f64 {
        self.cv
    }
}

impl GasModel for IdealGas {
    fn name(&self) -> &str {
        "ideal-gas"
    }

    fn species(&self) -> GasSpecies {
        self.species
    }

    fn temperature_range(&self) -> (Temperature, Temperature) {
        (k(60.0), k(2000.0))
    }

    fn max_pressure(&self) -> Pressure {
        pa(1.0e9)
    }

    fn density(&self, p: Pressure, t: Temperature) -> FluidResult<Density> {
        validate_pressure(p, self.max_pressure())?;
        validate_temperature(t, self.temperature_range())?;
        Ok(kgpm3(p.value / (self.r * t.value)))
    }

    fn specific_internal_energy(
        &self,
        p: Pressure,
        t: Temperature,
    ) -> FluidResult<SpecInternalEnergy> {
        validate_pressure(p, self.max_pressure())?;
        validate_temperature(t, self.temperature_range())?;
        Ok(self.cv * (t.value - T_REF_K))
    }

    fn pressure(&self, rho: Density, t: Temperature) -> FluidResult<Pressure> {
        validate_density(rho)?;
        validate_temperature(t, self.temperature_range())?;
        let p = pa(rho.value * self.r * t.value);
        validate_pressure(p, self.max_pressure())?;
        Ok(p)
    }

    fn temperature_from_rho_u(
        &self,
        rho: Density,
        u: SpecInternalEnergy,
    ) -> FluidResult<Temperature> {
        validate_density(rho)?;
        validate_internal_energy(u)?;
        let t = k(u / self.cv + T_REF_K);
        validate_temperature(t, self.temperature_range())?;
        Ok(t)
    }
}
