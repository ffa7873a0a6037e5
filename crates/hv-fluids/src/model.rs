//! Gas equation-of-state trait and validation helpers.

use crate::error::{FluidError, FluidResult};
use crate::species::GasSpecies;
use hv_core::units::{Density, Pressure, Temperature};

/// Specific internal energy [J/kg].
///
/// Kept as a plain f64 alongside the uom quantities, like other specific
/// energies in this workspace.
pub type SpecInternalEnergy = f64;

/// Snapshot of a gas state with all properties the balance core needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasState {
    /// Pressure [Pa]
    pub p: Pressure,
    /// Temperature [K]
    pub t: Temperature,
    /// Density [kg/m³]
    pub rho: Density,
    /// Specific internal energy [J/kg]
    pub u: SpecInternalEnergy,
}

impl GasState {
    /// Return a summary string of all contained properties (for debugging).
    pub fn summary(&self) -> String {
        format!(
            "Gas(P={:.0}Pa,T={:.2}K,ρ={:.4}kg/m³,u={:.1}J/kg)",
            self.p.value, self.t.value, self.rho.value, self.u
        )
    }
}

/// Equation of state for a cushion gas.
///
/// Implementations are pure functions of the instantaneous state and must
/// reject inputs outside their validity envelope instead of extrapolating.
pub trait GasModel: Send + Sync + std::fmt::Debug {
    /// Get the model name (for logging).
    fn name(&self) -> &str;

    /// Gas described by this model.
    fn species(&self) -> GasSpecies;

    /// Temperature validity envelope (min, max).
    fn temperature_range(&self) -> (Temperature, Temperature);

    /// Upper pressure limit of the model.
    fn max_pressure(&self) -> Pressure;

    /// Density at pressure and temperature.
    fn density(&self, p: Pressure, t: Temperature) -> FluidResult<Density>;

    /// Specific internal energy at pressure and temperature.
    fn specific_internal_energy(
        &self,
        p: Pressure,
        t: Temperature,
    ) -> FluidResult<SpecInternalEnergy>;

    /// Pressure at density and temperature.
    fn pressure(&self, rho: Density, t: Temperature) -> FluidResult<Pressure>;

    /// Temperature at density and specific internal energy.
    fn temperature_from_rho_u(
        &self,
        rho: Density,
        u: SpecInternalEnergy,
    ) -> FluidResult<Temperature>;

    /// Full state from pressure and temperature.
    fn state_from_pt(&self, p: Pressure, t: Temperature) -> FluidResult<GasState> {
        let rho = self.density(p, t)?;
        let u = self.specific_internal_energy(p, t)?;
        Ok(GasState { p, t, rho, u })
    }

    /// Full state from density and specific internal energy.
    ///
    /// This is the direction the balance core needs: mass and energy are
    /// integrated, the volume follows from the liquid extent.
    fn state_from_rho_u(&self, rho: Density, u: SpecInternalEnergy) -> FluidResult<GasState> {
        let t = self.temperature_from_rho_u(rho, u)?;
        let p = self.pressure(rho, t)?;
        Ok(GasState { p, t, rho, u })
    }
}

/// Validation helpers for gas properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive, finite and below the model limit.
    pub fn validate_pressure(p: Pressure, p_max: Pressure) -> FluidResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        if p.value > p_max.value {
            return Err(FluidError::OutOfRange {
                what: "pressure",
                value: p.value,
                min: 0.0,
                max: p_max.value,
            });
        }
        Ok(())
    }

    /// Ensure temperature is above absolute zero and inside the envelope.
    pub fn validate_temperature(t: Temperature, range: (Temperature, Temperature)) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be above absolute zero",
            });
        }
        let (t_min, t_max) = range;
        if t.value < t_min.value || t.value > t_max.value {
            return Err(FluidError::OutOfRange {
                what: "temperature",
                value: t.value,
                min: t_min.value,
                max: t_max.value,
            });
        }
        Ok(())
    }

    /// Ensure density is positive and finite.
    pub fn validate_density(rho: Density) -> FluidResult<()> {
        if !rho.value.is_finite() || rho.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure specific internal energy is finite (can be negative).
    pub fn validate_internal_energy(u: f64) -> FluidResult<()> {
        if !u.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "internal energy must be finite",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use hv_core::units::{k, kgpm3, pa};

    #[test]
    fn validate_positive_pressure() {
        let p_max = pa(1e9);
        assert!(validate_pressure(pa(101325.0), p_max).is_ok());
        assert!(validate_pressure(pa(-100.0), p_max).is_err());
        assert!(validate_pressure(pa(0.0), p_max).is_err());
        assert!(validate_pressure(pa(f64::NAN), p_max).is_err());
        assert!(validate_pressure(pa(2e9), p_max).is_err());
    }

    #[test]
    fn validate_temperature_envelope() {
        let range = (k(60.0), k(2000.0));
        assert!(validate_temperature(k(300.0), range).is_ok());
        assert!(validate_temperature(k(-10.0), range).is_err());
        assert!(validate_temperature(k(0.0), range).is_err());
        assert!(validate_temperature(k(30.0), range).is_err());
    }

    #[test]
    fn validate_density_positive() {
        assert!(validate_density(kgpm3(1.2)).is_ok());
        assert!(validate_density(kgpm3(-1.0)).is_err());
        assert!(validate_density(kgpm3(0.0)).is_err());
    }
}
