//! CoolProp-backed cushion gas properties.

use crate::error::{FluidError, FluidResult};
use crate::model::validation::{
    validate_density, validate_internal_energy, validate_pressure, validate_temperature,
};
use crate::model::{GasModel, GasState, SpecInternalEnergy};
use crate::species::GasSpecies;
use hv_core::units::{Density, Pressure, Temperature, k, kgpm3, pa};
use rfluids::prelude::*;

/// Temperature search bounds [K]; the lower one sits above the critical
/// point of both species so every bracket stays single phase
const T_MIN: f64 = 150.0;
const T_MAX: f64 = 2000.0;
const MAX_ITER: usize = 100;
/// Internal energy tolerance [J/kg]
const U_TOL: f64 = 1e-6;
/// Bracket width tolerance [K]
const T_TOL: f64 = 1e-9;

/// Real-gas cushion model evaluated by CoolProp through rfluids.
///
/// Stateless: a fresh `Fluid` is created for every query, so the model can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct CoolPropGas {
    species: GasSpecies,
}

impl CoolPropGas {
    pub fn new(species: GasSpecies) -> Self {
        Self { species }
    }

    pub fn nitrogen() -> Self {
        Self::new(GasSpecies::N2)
    }

    pub fn air() -> Self {
        Self::new(GasSpecies::Air)
    }

    fn fluid_at_pt(&self, p_pa: f64, t_k: f64) -> FluidResult<Fluid> {
        Fluid::from(self.species.rfluids_pure())
            .in_state(FluidInput::pressure(p_pa), FluidInput::temperature(t_k))
            .map_err(|e| FluidError::Backend {
                message: format!("rfluids error at P={} Pa, T={} K: {}", p_pa, t_k, e),
            })
    }

    fn fluid_at_rho_t(&self, rho_kg_m3: f64, t_k: f64) -> FluidResult<Fluid> {
        Fluid::from(self.species.rfluids_pure())
            .in_state(FluidInput::density(rho_kg_m3), FluidInput::temperature(t_k))
            .map_err(|e| FluidError::Backend {
                message: format!(
                    "rfluids error at rho={} kg/m³, T={} K: {}",
                    rho_kg_m3, t_k, e
                ),
            })
    }

    /// u = h − p/ρ from one backend state.
    fn internal_energy(fluid: &mut Fluid) -> FluidResult<SpecInternalEnergy> {
        let h = fluid.enthalpy().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting enthalpy: {}", e),
        })?;
        let p = fluid.pressure().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting pressure: {}", e),
        })?;
        let rho = fluid.density().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting density: {}", e),
        })?;
        let u = h - p / rho;
        validate_internal_energy(u)?;
        Ok(u)
    }

    fn energy_residual(&self, rho_kg_m3: f64, t_k: f64, u_target: f64) -> FluidResult<f64> {
        let mut fluid = self.fluid_at_rho_t(rho_kg_m3, t_k)?;
        Ok(Self::internal_energy(&mut fluid)? - u_target)
    }
}

impl GasModel for CoolPropGas {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn species(&self) -> GasSpecies {
        self.species
    }

    fn temperature_range(&self) -> (Temperature, Temperature) {
        (k(T_MIN), k(T_MAX))
    }

    fn max_pressure(&self) -> Pressure {
        pa(1.0e9)
    }

    fn density(&self, p: Pressure, t: Temperature) -> FluidResult<Density> {
        validate_pressure(p, self.max_pressure())?;
        validate_temperature(t, self.temperature_range())?;
        let mut fluid = self.fluid_at_pt(p.value, t.value)?;
        let rho = fluid.density().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting density: {}", e),
        })?;
        let rho = kgpm3(rho);
        validate_density(rho)?;
        Ok(rho)
    }

    fn specific_internal_energy(
        &self,
        p: Pressure,
        t: Temperature,
    ) -> FluidResult<SpecInternalEnergy> {
        validate_pressure(p, self.max_pressure())?;
        validate_temperature(t, self.temperature_range())?;
        let mut fluid = self.fluid_at_pt(p.value, t.value)?;
        Self::internal_energy(&mut fluid)
    }

    fn pressure(&self, rho: Density, t: Temperature) -> FluidResult<Pressure> {
        validate_density(rho)?;
        validate_temperature(t, self.temperature_range())?;
        let mut fluid = self.fluid_at_rho_t(rho.value, t.value)?;
        let p = fluid.pressure().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting pressure: {}", e),
        })?;
        let p = pa(p);
        validate_pressure(p, self.max_pressure())?;
        Ok(p)
    }

    /// Regula falsi (Illinois variant) on T at fixed density.
    ///
    /// u(ρ, T) is nearly linear in T for a supercritical gas, so this
    /// converges in a handful of backend calls.
    fn temperature_from_rho_u(
        &self,
        rho: Density,
        u: SpecInternalEnergy,
    ) -> FluidResult<Temperature> {
        validate_density(rho)?;
        validate_internal_energy(u)?;

        let mut t_low = T_MIN;
        let mut t_high = T_MAX;
        let mut g_low = self.energy_residual(rho.value, t_low, u)?;
        let mut g_high = self.energy_residual(rho.value, t_high, u)?;

        if g_low > 0.0 || g_high < 0.0 {
            return Err(FluidError::OutOfRange {
                what: "internal energy at given density",
                value: u,
                min: u + g_low,
                max: u + g_high,
            });
        }
        if g_low == 0.0 {
            return Ok(k(t_low));
        }
        if g_high == 0.0 {
            return Ok(k(t_high));
        }

        let mut side = 0_i8;
        let mut t_best = 0.5 * (t_low + t_high);
        for _ in 0..MAX_ITER {
            let t_mid = (t_low * g_high - t_high * g_low) / (g_high - g_low);
            t_best = t_mid;
            let g_mid = self.energy_residual(rho.value, t_mid, u)?;

            if g_mid.abs() < U_TOL || t_high - t_low < T_TOL {
                return Ok(k(t_mid));
            }

            if g_mid < 0.0 {
                t_low = t_mid;
                g_low = g_mid;
                if side == -1 {
                    g_high *= 0.5;
                }
                side = -1;
            } else {
                t_high = t_mid;
                g_high = g_mid;
                if side == 1 {
                    g_low *= 0.5;
                }
                side = 1;
            }
        }

        // Return best estimate if we hit max iterations
        Ok(k(t_best))
    }

    fn state_from_pt(&self, p: Pressure, t: Temperature) -> FluidResult<GasState> {
        validate_pressure(p, self.max_pressure())?;
        validate_temperature(t, self.temperature_range())?;
        let mut fluid = self.fluid_at_pt(p.value, t.value)?;
        let rho = fluid.density().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting density: {}", e),
        })?;
        let rho = kgpm3(rho);
        validate_density(rho)?;
        let u = Self::internal_energy(&mut fluid)?;
        Ok(GasState { p, t, rho, u })
    }
}
