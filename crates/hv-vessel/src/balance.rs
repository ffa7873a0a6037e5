//! Volume partition and mass/energy balance.
//!
//! Relations evaluated at every solver call:
//! - gas volume = capacity − liquid volume (never set on its own)
//! - d(gas mass)/dt = 0 for a sealed cushion
//! - Wb_flow = −p_liquid · dV_liquid/dt
//! - d(gas energy)/dt = −Wb_flow, or both zero when mechanical work is
//!   neglected (steady energy dynamics or a single-state medium)

use crate::error::{VesselError, VesselResult};
use crate::geometry::Geometry;
use crate::regime::Regime;
use hv_fluids::GasState;

/// Energy balance formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyDynamics {
    /// Gas internal energy is integrated.
    #[default]
    Dynamic,
    /// Energy storage neglected; boundary work forced to zero.
    SteadyState,
}

/// Continuous state of one vessel.
///
/// Gas fields are zero for vessels without a cushion.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct VesselState {
    /// Level [m] or liquid volume [m³], depending on the geometry
    pub extent: f64,
    /// Cushion gas mass [kg]
    pub gas_mass_kg: f64,
    /// Cushion gas internal energy [J]
    pub gas_energy_j: f64,
}

/// Cushion properties after the regime has closed the pressure equations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasSnapshot {
    /// State from the equation of state at the current mass, energy and volume
    pub eos: GasState,
    /// Gas pressure selected by the regime [Pa]
    pub pressure_pa: f64,
    pub mass_kg: f64,
    pub energy_j: f64,
    pub volume_m3: f64,
}

/// Algebraic outputs of one balance evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct BalanceOutputs {
    pub regime: Regime,
    /// Pressure at the liquid surface [Pa]
    pub liquid_pressure_pa: f64,
    pub liquid_volume_m3: f64,
    pub gas_volume_m3: f64,
    pub level_m: f64,
    pub gas: Option<GasSnapshot>,
    /// Static pressure per port [Pa]
    pub port_pressures_pa: Vec<f64>,
}

/// Time derivatives plus the boundary work that produced them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Derivatives {
    pub state: VesselState,
    /// dV_liquid/dt [m³/s]
    pub volume_rate_m3ps: f64,
    /// Boundary work term Wb_flow [W]
    pub wb_flow_w: f64,
}

/// Split the capacity into `(liquid_volume, gas_volume)` [m³].
///
/// The extent is checked against [0, capacity], never clamped. A sealed
/// cushion additionally needs some gas volume left.
pub fn partition(geometry: &Geometry, extent: f64, sealed: bool) -> VesselResult<(f64, f64)> {
    let capacity = geometry.capacity();
    if !extent.is_finite() {
        return Err(VesselError::NonPhysical {
            what: "liquid extent must be finite",
        });
    }
    if extent < 0.0 {
        return Err(VesselError::GeometricViolation {
            what: "liquid extent below zero",
            extent,
            capacity,
        });
    }
    if extent > capacity {
        return Err(VesselError::GeometricViolation {
            what: "liquid overfills vessel",
            extent,
            capacity,
        });
    }
    let liquid = geometry.liquid_volume(extent);
    let gas = geometry.capacity_volume() - liquid;
    if sealed && gas <= 0.0 {
        return Err(VesselError::GeometricViolation {
            what: "no gas volume left for the cushion",
            extent,
            capacity,
        });
    }
    Ok((liquid, gas))
}

/// Boundary work rate Wb_flow [W] for liquid-side pressure `p_liquid` and
/// liquid volume rate `volume_rate`.
pub fn boundary_work(p_liquid: f64, volume_rate: f64, work_neglected: bool) -> f64 {
    if work_neglected {
        0.0
    } else {
        -p_liquid * volume_rate
    }
}

/// Assemble state derivatives from port mass flows (positive into the
/// vessel, kg/s).
pub fn derivatives(
    geometry: &Geometry,
    liquid_density: f64,
    outputs: &BalanceOutputs,
    port_mass_flows: &[f64],
    cushioned: bool,
    work_neglected: bool,
) -> VesselResult<Derivatives> {
    let mut net = 0.0;
    for &mdot in port_mass_flows {
        if !mdot.is_finite() {
            return Err(VesselError::NonPhysical {
                what: "port mass flow must be finite",
            });
        }
        net += mdot;
    }
    let volume_rate = net / liquid_density;
    let wb_flow = boundary_work(outputs.liquid_pressure_pa, volume_rate, work_neglected);
    let gas_energy_rate = if cushioned { -wb_flow } else { 0.0 };

    Ok(Derivatives {
        state: VesselState {
            extent: geometry.extent_rate(volume_rate),
            gas_mass_kg: 0.0,
            gas_energy_j: gas_energy_rate,
        },
        volume_rate_m3ps: volume_rate,
        wb_flow_w: wb_flow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_core::units::{m, m2, m3};

    fn outputs(p: f64) -> BalanceOutputs {
        BalanceOutputs {
            regime: Regime::Compression,
            liquid_pressure_pa: p,
            liquid_volume_m3: 0.0,
            gas_volume_m3: 0.0,
            level_m: 0.0,
            gas: None,
            port_pressures_pa: vec![],
        }
    }

    #[test]
    fn partition_closes_volume() {
        let g = Geometry::shell(m3(1e-3), m(0.1));
        let (liq, gas) = partition(&g, 4e-4, true).unwrap();
        assert!((liq + gas - 1e-3).abs() < 1e-18);
    }

    #[test]
    fn partition_rejects_overfill_and_negative() {
        let g = Geometry::prismatic(m(1.0), m2(1.0));
        assert!(matches!(
            partition(&g, 1.0 + 1e-9, false),
            Err(VesselError::GeometricViolation { .. })
        ));
        assert!(matches!(
            partition(&g, -1e-9, false),
            Err(VesselError::GeometricViolation { .. })
        ));
        // open tank may be brim full, a sealed vessel may not
        assert!(partition(&g, 1.0, false).is_ok());
        assert!(partition(&g, 1.0, true).is_err());
    }

    #[test]
    fn filling_does_work_on_the_cushion() {
        let g = Geometry::shell(m3(1e-3), m(0.1));
        let d = derivatives(&g, 870.0, &outputs(6e6), &[0.087], true, false).unwrap();
        assert!((d.volume_rate_m3ps - 1e-4).abs() < 1e-15);
        assert!((d.wb_flow_w + 600.0).abs() < 1e-9);
        assert!((d.state.gas_energy_j - 600.0).abs() < 1e-9);
        assert_eq!(d.state.gas_mass_kg, 0.0);
    }

    #[test]
    fn neglected_work_zeroes_energy_terms() {
        let g = Geometry::shell(m3(1e-3), m(0.1));
        let d = derivatives(&g, 870.0, &outputs(6e6), &[0.5, -0.1], true, true).unwrap();
        assert_eq!(d.wb_flow_w, 0.0);
        assert_eq!(d.state.gas_energy_j, 0.0);
        assert!(d.state.extent > 0.0);
    }

    #[test]
    fn non_finite_flow_is_rejected() {
        let g = Geometry::prismatic(m(1.0), m2(1.0));
        assert!(derivatives(&g, 1000.0, &outputs(1e5), &[f64::NAN], false, false).is_err());
    }
}
