//! Van der Waals real-gas model for high-pressure cushions.
//!
//! Accumulator precharge pressures reach tens of MPa where the ideal gas
//! law overpredicts the gas volume. The van der Waals form keeps a closed
//! form for p(ρ, T) and T(ρ, u), and solves ρ(p, T) by bisection.

use crate::error::{FluidError, FluidResult};
use crate::ideal_gas::T_REF_K;
use crate::model::validation::{
    validate_density, validate_internal_energy, validate_pressure, validate_temperature,
};
use crate::model::{GasModel, SpecInternalEnergy};
use crate::species::GasSpecies;
use hv_core::units::{Density, Pressure, Temperature, k, kgpm3, pa};

const MAX_ITER: usize = 200;
const REL_TOL: f64 = 1e-13;

/// Van der Waals gas: p = ρRT/(1 − bρ) − aρ², u = cv·(T − T_ref) − aρ.
///
/// Valid only above the model's critical temperature, where p(ρ) is
/// strictly increasing and the density root is unique.
#[derive(Debug, Clone)]
pub struct VanDerWaals {
    species: GasSpecies,
    r: f64,
    cv: f64,
    /// Specific attraction constant [Pa·m⁶/kg²]
    a: f64,
    /// Specific co-volume [m³/kg]
    b: f64,
}

impl VanDerWaals {
    pub fn new(species: GasSpecies) -> Self {
        let (a_molar, b_molar) = species.van_der_waals_molar();
        let mm = species.molar_mass();
        Self {
            species,
            r: species.gas_constant(),
            cv: species.cv(),
            a: a_molar / (mm * mm),
            b: b_molar / mm,
        }
    }

    /// Nitrogen, the default accumulator precharge gas.
    pub fn nitrogen() -> Self {
        Self::new(GasSpecies::N2)
    }

    /// Critical temperature implied by the constants: 8a / (27 R b).
    pub fn critical_temperature(&self) -> Temperature {
        k(8.0 * self.a / (27.0 * self.r * self.b))
    }

    /// Density limit set by the co-volume.
    pub fn max_density(&self) -> Density {
        kgpm3(1.0 / self.b)
    }

    fn pressure_unchecked(&self, rho: f64, t: f64) -> f64 {
        rho * self.r * t / (1.0 - self.b * rho) - self.a * rho * rho
    }

    fn validate_rho(&self, rho: Density) -> FluidResult<()> {
        validate_density(rho)?;
        if rho.value * self.b >= 1.0 {
            return Err(FluidError::OutOfRange {
                what: "density (co-volume limit)",
                value: rho.value,
                min: 0.0,
                max: 1.0 / self.b,
            });
        }
        Ok(())
    }
}

impl GasModel for VanDerWaals {
    fn name(&self) -> &str {
        "van-der-waals"
    }

    fn species(&self) -> GasSpecies {
        self.species
    }

    fn temperature_range(&self) -> (Temperature, Temperature) {
        (self.critical_temperature(), k(1500.0))
    }

    fn max_pressure(&self) -> Pressure {
        pa(1.0e8)
    }

    fn density(&self, p: Pressure, t: Temperature) -> FluidResult<Density> {
        validate_pressure(p, self.max_pressure())?;
        validate_temperature(t, self.temperature_range())?;

        // f(0) = -p < 0 and f -> +inf at the co-volume; monotonic above Tc.
        let mut lo = 0.0;
        let mut hi = (1.0 - 1e-12) / self.b;
        for _ in 0..MAX_ITER {
            let mid = 0.5 * (lo + hi);
            let f_mid = self.pressure_unchecked(mid, t.value) - p.value;
            if f_mid > 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
            if hi - lo <= REL_TOL * hi {
                return Ok(kgpm3(0.5 * (lo + hi)));
            }
        }
        Err(FluidError::ConvergenceFailed {
            what: "van der Waals density from (p, T)",
        })
    }

    fn specific_internal_energy(
        &self,
        p: Pressure,
        t: Temperature,
    ) -> FluidResult<SpecInternalEnergy> {
        let rho = self.density(p, t)?;
        Ok(self.cv * (t.value - T_REF_K) - self.a * rho.value)
    }

    fn pressure(&self, rho: Density, t: Temperature) -> FluidResult<Pressure> {
        self.validate_rho(rho)?;
        validate_temperature(t, self.temperature_range())?;
        let p = pa(self.pressure_unchecked(rho.value, t.value));
        validate_pressure(p, self.max_pressure())?;
        Ok(p)
    }

    fn temperature_from_rho_u(
        &self,
        rho: Density,
        u: SpecInternalEnergy,
    ) -> FluidResult<Temperature> {
        self.validate_rho(rho)?;
        validate_internal_energy(u)?;
        let t = k((u + self.a * rho.value) / self.cv + T_REF_K);
        validate_temperature(t, self.temperature_range())?;
        Ok(t)
    }
}
