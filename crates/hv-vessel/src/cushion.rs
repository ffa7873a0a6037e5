//! Sealed gas cushion above the liquid.

use std::sync::Arc;

use crate::error::{VesselError, VesselResult};
use hv_core::units::{Pressure, Temperature, kgpm3};
use hv_fluids::{CoolPropGas, GasModel, GasState};

/// Gas-cushion policy of a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CushionKind {
    /// No cushion: open top at ambient pressure.
    None,
    /// Sealed nitrogen charge (accumulator).
    SealedGas,
    /// Sealed air pocket (air-cushion tank).
    SealedAir,
}

impl CushionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CushionKind::None => "none",
            CushionKind::SealedGas => "sealed-gas",
            CushionKind::SealedAir => "sealed-air",
        }
    }
}

/// Sealed, compressible gas pocket filling the capacity the liquid leaves.
#[derive(Debug, Clone)]
pub struct GasCushion {
    kind: CushionKind,
    model: Arc<dyn GasModel>,
    /// Regime threshold (nominal fill pressure)
    pub threshold: Pressure,
    /// Gas pressure at t = 0
    pub p_start: Pressure,
    /// Gas temperature at t = 0
    pub t_start: Temperature,
    /// Liquid-side pressure while the gas rests; `None` means ambient
    pub rest_pressure: Option<Pressure>,
}

impl GasCushion {
    /// Cushion of the given kind with an explicit gas model.
    ///
    /// The gas starts at the threshold pressure.
    pub fn new(
        kind: CushionKind,
        model: Arc<dyn GasModel>,
        threshold: Pressure,
        t_start: Temperature,
    ) -> VesselResult<Self> {
        if kind == CushionKind::None {
            return Err(VesselError::InvalidArg {
                what: "a gas cushion needs a sealed cushion kind",
            });
        }
        if !threshold.value.is_finite() || threshold.value <= 0.0 {
            return Err(VesselError::InvalidArg {
                what: "cushion threshold pressure must be positive",
            });
        }
        Ok(Self {
            kind,
            model,
            threshold,
            p_start: threshold,
            t_start,
            rest_pressure: None,
        })
    }

    /// Nitrogen precharge with CoolProp real-gas properties.
    pub fn nitrogen(filled_pressure: Pressure, t_start: Temperature) -> VesselResult<Self> {
        Self::new(
            CushionKind::SealedGas,
            Arc::new(CoolPropGas::nitrogen()),
            filled_pressure,
            t_start,
        )
    }

    /// Air pocket with CoolProp real-gas properties.
    pub fn air(threshold: Pressure, t_start: Temperature) -> VesselResult<Self> {
        Self::new(
            CushionKind::SealedAir,
            Arc::new(CoolPropGas::air()),
            threshold,
            t_start,
        )
    }

    /// Swap the equation of state, e.g. for a closed-form model.
    pub fn with_model(mut self, model: Arc<dyn GasModel>) -> Self {
        self.model = model;
        self
    }

    pub fn with_threshold(mut self, threshold: Pressure) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_start_pressure(mut self, p_start: Pressure) -> Self {
        self.p_start = p_start;
        self
    }

    pub fn with_rest_pressure(mut self, p_rest: Pressure) -> Self {
        self.rest_pressure = Some(p_rest);
        self
    }

    pub fn kind(&self) -> CushionKind {
        self.kind
    }

    pub fn model(&self) -> &dyn GasModel {
        self.model.as_ref()
    }

    /// Gas mass [kg] and internal energy [J] of the start charge filling
    /// `gas_volume` [m³].
    pub fn charge(&self, gas_volume: f64) -> VesselResult<(f64, f64)> {
        if !gas_volume.is_finite() || gas_volume <= 0.0 {
            return Err(VesselError::NonPhysical {
                what: "gas volume must be positive to charge the cushion",
            });
        }
        let start = self.model.state_from_pt(self.p_start, self.t_start)?;
        let mass = start.rho.value * gas_volume;
        Ok((mass, mass * start.u))
    }

    /// Gas state from the conserved mass [kg], internal energy [J] and the
    /// volume the liquid leaves free [m³].
    pub fn state(&self, mass: f64, energy: f64, gas_volume: f64) -> VesselResult<GasState> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(VesselError::NonPhysical {
                what: "gas mass must be positive",
            });
        }
        if !gas_volume.is_finite() || gas_volume <= 0.0 {
            return Err(VesselError::NonPhysical {
                what: "gas volume must be positive",
            });
        }
        let rho = kgpm3(mass / gas_volume);
        Ok(self.model.state_from_rho_u(rho, energy / mass)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_core::units::{k, pa};
    use hv_fluids::IdealGas;

    #[test]
    fn charge_then_state_recovers_start_conditions() {
        let cushion = GasCushion::nitrogen(pa(5e6), k(293.15)).unwrap();
        assert_eq!(cushion.model().name(), "CoolProp");
        let (mass, energy) = cushion.charge(1e-3).unwrap();
        let s = cushion.state(mass, energy, 1e-3).unwrap();
        assert!((s.p.value - 5e6).abs() / 5e6 < 1e-8);
        assert!((s.t.value - 293.15).abs() < 1e-6);
    }

    #[test]
    fn halving_volume_at_fixed_energy_doubles_ideal_pressure() {
        let cushion = GasCushion::air(pa(2e5), k(293.15))
            .unwrap()
            .with_model(Arc::new(IdealGas::air()));
        let (mass, energy) = cushion.charge(1.0).unwrap();
        let squeezed = cushion.state(mass, energy, 0.5).unwrap();
        assert!((squeezed.p.value - 4e5).abs() < 1e-6);
        assert!((squeezed.t.value - 293.15).abs() < 1e-9);
    }

    #[test]
    fn rejects_open_kind_and_bad_threshold() {
        let model: Arc<dyn GasModel> = Arc::new(IdealGas::air());
        assert!(GasCushion::new(CushionKind::None, model.clone(), pa(1e5), k(300.0)).is_err());
        assert!(GasCushion::new(CushionKind::SealedAir, model, pa(0.0), k(300.0)).is_err());
    }

    #[test]
    fn start_temperature_outside_envelope_is_fatal() {
        let cushion = GasCushion::nitrogen(pa(5e6), k(80.0)).unwrap();
        assert!(matches!(
            cushion.charge(1e-3),
            Err(VesselError::Fluid(_))
        ));
    }
}
