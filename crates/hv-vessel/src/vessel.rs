//! The polymorphic vessel: open tank, nitrogen accumulator, air-cushion tank.
//!
//! All three variants share one balance core; they differ only in their
//! geometry, ports and gas-cushion policy.

use crate::balance::{
    self, BalanceOutputs, Derivatives, EnergyDynamics, GasSnapshot, VesselState,
};
use crate::cushion::{CushionKind, GasCushion};
use crate::error::{VesselError, VesselResult};
use crate::geometry::Geometry;
use crate::init::{self, InitialConditions, InitializationPolicy};
use crate::port::{self, Port, PortResistance};
use crate::regime::Regime;
use hv_core::EXTENT_EPS;
use hv_core::units::{Accel, Area, Length, Pressure, Temperature, Volume, constants, k, m};
use hv_fluids::IncompressibleLiquid;

/// Ambient values supplied once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryCondition {
    pub p_ambient: Pressure,
    pub t_ambient: Temperature,
    pub g: Accel,
}

impl Default for BoundaryCondition {
    fn default() -> Self {
        Self {
            p_ambient: constants::p_atm(),
            t_ambient: k(constants::T_STD_K),
            g: constants::g0(),
        }
    }
}

impl BoundaryCondition {
    fn validate(&self) -> VesselResult<()> {
        if !self.p_ambient.value.is_finite() || self.p_ambient.value <= 0.0 {
            return Err(VesselError::InvalidArg {
                what: "ambient pressure must be positive",
            });
        }
        if !self.t_ambient.value.is_finite() || self.t_ambient.value <= 0.0 {
            return Err(VesselError::InvalidArg {
                what: "ambient temperature must be above absolute zero",
            });
        }
        if !self.g.value.is_finite() || self.g.value < 0.0 {
            return Err(VesselError::InvalidArg {
                what: "gravity must be non-negative",
            });
        }
        Ok(())
    }
}

/// Builder that validates a vessel configuration as a whole.
#[derive(Debug, Clone)]
pub struct VesselBuilder {
    name: String,
    geometry: Geometry,
    liquid: IncompressibleLiquid,
    boundary: BoundaryCondition,
    cushion: Option<GasCushion>,
    /// Cushion threshold follows the ambient pressure of `boundary`
    ambient_threshold: bool,
    ports: Vec<Port>,
    energy_dynamics: EnergyDynamics,
    initial: InitialConditions,
}

impl VesselBuilder {
    pub fn new(name: impl Into<String>, geometry: Geometry, liquid: IncompressibleLiquid) -> Self {
        Self {
            name: name.into(),
            geometry,
            liquid,
            boundary: BoundaryCondition::default(),
            cushion: None,
            ambient_threshold: false,
            ports: Vec::new(),
            energy_dynamics: EnergyDynamics::default(),
            initial: InitialConditions::fixed(0.0),
        }
    }

    /// Open tank with ambient pressure on the surface.
    pub fn open_tank(height: Length, cross_area: Area, level_start: f64) -> Self {
        Self::new(
            "open-tank",
            Geometry::prismatic(height, cross_area),
            IncompressibleLiquid::water(),
        )
        .extent_start(level_start)
    }

    /// Oil accumulator with a nitrogen precharge at `filled_pressure`.
    pub fn nitrogen_accumulator(
        total_volume: Volume,
        inner_diameter: Length,
        filled_pressure: Pressure,
        v_oil_start: f64,
    ) -> VesselResult<Self> {
        let cushion = GasCushion::nitrogen(filled_pressure, k(constants::T_STD_K))?;
        Ok(Self::new(
            "nitrogen-accumulator",
            Geometry::shell(total_volume, inner_diameter),
            IncompressibleLiquid::hydraulic_oil(),
        )
        .cushion(cushion)
        .extent_start(v_oil_start))
    }

    /// Water tank with a sealed air pocket starting at `p_start`.
    ///
    /// The threshold is the ambient pressure of the boundary the vessel is
    /// finally built with: the pocket compresses as soon as it is above
    /// ambient. Inlet and outlet sit at the bottom and both carry
    /// `resistance`.
    pub fn air_cushion_tank(
        height: Length,
        cross_area: Area,
        p_start: Pressure,
        level_start: f64,
        resistance: PortResistance,
    ) -> VesselResult<Self> {
        let cushion = GasCushion::air(constants::p_atm(), k(constants::T_STD_K))?
            .with_start_pressure(p_start);
        Ok(Self::new(
            "air-cushion-tank",
            Geometry::prismatic(height, cross_area),
            IncompressibleLiquid::water(),
        )
        .cushion(cushion)
        .ambient_threshold()
        .port(Port::new("inlet", m(0.0)).with_resistance(resistance.clone()))
        .port(Port::new("outlet", m(0.0)).with_resistance(resistance))
        .extent_start(level_start))
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn liquid(mut self, liquid: IncompressibleLiquid) -> Self {
        self.liquid = liquid;
        self
    }

    /// Use `cushion` as given, including its threshold.
    pub fn cushion(mut self, cushion: GasCushion) -> Self {
        self.cushion = Some(cushion);
        self.ambient_threshold = false;
        self
    }

    /// Tie the cushion threshold to the ambient pressure at build time.
    pub fn ambient_threshold(mut self) -> Self {
        self.ambient_threshold = true;
        self
    }

    pub fn port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    pub fn energy_dynamics(mut self, energy_dynamics: EnergyDynamics) -> Self {
        self.energy_dynamics = energy_dynamics;
        self
    }

    pub fn policy(mut self, policy: InitializationPolicy) -> Self {
        self.initial.policy = policy;
        self
    }

    pub fn extent_start(mut self, extent_start: f64) -> Self {
        self.initial.extent_start = extent_start;
        self
    }

    pub fn build(mut self) -> VesselResult<Vessel> {
        self.geometry.validate()?;
        self.boundary.validate()?;

        if self.ambient_threshold {
            let p_ambient = self.boundary.p_ambient;
            self.cushion = self.cushion.map(|c| c.with_threshold(p_ambient));
        }

        let capacity = self.geometry.capacity();
        let max_level = self.geometry.level(capacity);
        for p in &self.ports {
            let h = p.height.value;
            if !h.is_finite() || h < 0.0 || h > max_level {
                return Err(VesselError::InvalidArg {
                    what: "port height must lie between vessel bottom and top",
                });
            }
        }

        if let Some(c) = &self.cushion {
            let p_rest = c.rest_pressure.unwrap_or(self.boundary.p_ambient);
            if !p_rest.value.is_finite() || p_rest.value <= 0.0 {
                return Err(VesselError::InvalidArg {
                    what: "rest pressure must be positive",
                });
            }
            if p_rest.value > c.threshold.value {
                return Err(VesselError::InvalidArg {
                    what: "rest pressure must not exceed the cushion threshold",
                });
            }
            if !c.p_start.value.is_finite() || c.p_start.value <= 0.0 {
                return Err(VesselError::InvalidArg {
                    what: "cushion start pressure must be positive",
                });
            }
        }

        let x0 = self.initial.extent_start;
        if !x0.is_finite() || x0 < 0.0 || x0 > capacity {
            return Err(VesselError::GeometricViolation {
                what: "start extent outside [0, capacity]",
                extent: x0,
                capacity,
            });
        }
        if self.cushion.is_some() && self.initial.floored_start() >= capacity {
            return Err(VesselError::GeometricViolation {
                what: "start extent leaves no gas volume",
                extent: x0,
                capacity,
            });
        }

        Ok(Vessel {
            name: self.name,
            geometry: self.geometry,
            liquid: self.liquid,
            boundary: self.boundary,
            cushion: self.cushion,
            ports: self.ports,
            energy_dynamics: self.energy_dynamics,
            initial: self.initial,
        })
    }
}

/// A validated storage vessel.
#[derive(Debug, Clone)]
pub struct Vessel {
    name: String,
    geometry: Geometry,
    liquid: IncompressibleLiquid,
    boundary: BoundaryCondition,
    cushion: Option<GasCushion>,
    ports: Vec<Port>,
    energy_dynamics: EnergyDynamics,
    initial: InitialConditions,
}

impl Vessel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn liquid(&self) -> &IncompressibleLiquid {
        &self.liquid
    }

    pub fn boundary(&self) -> &BoundaryCondition {
        &self.boundary
    }

    pub fn cushion(&self) -> Option<&GasCushion> {
        self.cushion.as_ref()
    }

    pub fn cushion_kind(&self) -> CushionKind {
        self.cushion
            .as_ref()
            .map_or(CushionKind::None, GasCushion::kind)
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn energy_dynamics(&self) -> EnergyDynamics {
        self.energy_dynamics
    }

    pub fn initial_conditions(&self) -> &InitialConditions {
        &self.initial
    }

    /// Mechanical work is neglected for steady energy dynamics or a
    /// single-state medium.
    pub fn work_neglected(&self) -> bool {
        self.energy_dynamics == EnergyDynamics::SteadyState || self.liquid.single_state
    }

    /// Liquid-side pressure while the cushion rests (or the open surface).
    pub fn rest_pressure(&self) -> f64 {
        self.cushion
            .as_ref()
            .and_then(|c| c.rest_pressure)
            .unwrap_or(self.boundary.p_ambient)
            .value
    }

    /// State at `extent` with the cushion holding its start charge.
    pub fn charge(&self, extent: f64) -> VesselResult<VesselState> {
        let sealed = self.cushion.is_some();
        let (_, gas_volume) = balance::partition(&self.geometry, extent, sealed)?;
        let (gas_mass_kg, gas_energy_j) = match &self.cushion {
            Some(c) => c.charge(gas_volume)?,
            None => (0.0, 0.0),
        };
        Ok(VesselState {
            extent,
            gas_mass_kg,
            gas_energy_j,
        })
    }

    /// Apply the initialization policy.
    ///
    /// `extent_rate` returns d(extent)/dt for a candidate start state; it is
    /// only called for `SteadyStateInitial`. Steady-state candidates all
    /// carry the cushion charge of the start extent, so the gas is
    /// compressed or expanded as the solver moves the liquid.
    pub fn initial_state<F>(&self, mut extent_rate: F) -> VesselResult<VesselState>
    where
        F: FnMut(&VesselState) -> VesselResult<f64>,
    {
        let capacity = self.geometry.capacity();
        let hi = if self.cushion.is_some() {
            capacity * (1.0 - 1e-9)
        } else {
            capacity
        };
        let steady = self.initial.policy == InitializationPolicy::SteadyStateInitial;
        let reference = if steady {
            self.charge(self.initial.floored_start().clamp(EXTENT_EPS, hi))?
        } else {
            VesselState::default()
        };

        let extent = init::resolve_extent(&self.initial, EXTENT_EPS, hi, |x| {
            extent_rate(&VesselState {
                extent: x,
                ..reference
            })
        })?;
        tracing::debug!(
            vessel = %self.name,
            policy = self.initial.policy.as_str(),
            extent,
            "initial extent resolved"
        );

        if steady {
            Ok(VesselState {
                extent,
                ..reference
            })
        } else {
            self.charge(extent)
        }
    }

    /// Pressure the cushion's equation of state imposes, if any.
    pub fn cushion_pressure(&self, state: &VesselState) -> VesselResult<Option<f64>> {
        let Some(c) = &self.cushion else {
            return Ok(None);
        };
        let (_, gas_volume) = balance::partition(&self.geometry, state.extent, true)?;
        let gas = c.state(state.gas_mass_kg, state.gas_energy_j, gas_volume)?;
        Ok(Some(gas.p.value))
    }

    /// Switching function `p_cushion − threshold`; `None` for an open tank.
    pub fn switching_function(&self, state: &VesselState) -> VesselResult<Option<f64>> {
        let Some(c) = &self.cushion else {
            return Ok(None);
        };
        let p = self.cushion_pressure(state)?.unwrap_or(c.threshold.value);
        Ok(Some(Regime::switching_function(p, c.threshold.value)))
    }

    /// Regime implied by the current state.
    pub fn select_regime(&self, state: &VesselState) -> VesselResult<Regime> {
        match &self.cushion {
            None => Ok(Regime::Ambient),
            Some(c) => {
                let p = self.cushion_pressure(state)?.unwrap_or(c.threshold.value);
                Ok(Regime::select(p, c.threshold.value))
            }
        }
    }

    /// Evaluate all algebraic relations for `state` under `regime`.
    pub fn evaluate(&self, state: &VesselState, regime: Regime) -> VesselResult<BalanceOutputs> {
        let sealed = self.cushion.is_some();
        let (liquid_volume, gas_volume) =
            balance::partition(&self.geometry, state.extent, sealed)?;
        let p_rest = self.rest_pressure();

        let (regime, liquid_pressure, gas) = match &self.cushion {
            None => (Regime::Ambient, p_rest, None),
            Some(c) => {
                if regime == Regime::Ambient {
                    return Err(VesselError::InvalidArg {
                        what: "ambient regime requested for a cushioned vessel",
                    });
                }
                let eos = c.state(state.gas_mass_kg, state.gas_energy_j, gas_volume)?;
                let (p_liq, p_gas) = regime.close(eos.p.value, c.threshold.value, p_rest);
                let snapshot = GasSnapshot {
                    eos,
                    pressure_pa: p_gas,
                    mass_kg: state.gas_mass_kg,
                    energy_j: state.gas_energy_j,
                    volume_m3: gas_volume,
                };
                (regime, p_liq, Some(snapshot))
            }
        };

        let level = self.geometry.level(state.extent);
        let port_pressures = port::port_pressures(
            &self.ports,
            level,
            self.liquid.density().value,
            self.boundary.g.value,
            liquid_pressure,
        )?;

        Ok(BalanceOutputs {
            regime,
            liquid_pressure_pa: liquid_pressure,
            liquid_volume_m3: liquid_volume,
            gas_volume_m3: gas_volume,
            level_m: level,
            gas,
            port_pressures_pa: port_pressures,
        })
    }

    /// State derivatives for the given port mass flows (kg/s, positive in).
    pub fn derivatives(
        &self,
        outputs: &BalanceOutputs,
        port_mass_flows: &[f64],
    ) -> VesselResult<Derivatives> {
        if port_mass_flows.len() != self.ports.len() {
            return Err(VesselError::InvalidArg {
                what: "one mass flow per port is required",
            });
        }
        balance::derivatives(
            &self.geometry,
            self.liquid.density().value,
            outputs,
            port_mass_flows,
            self.cushion.is_some(),
            self.work_neglected(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_core::units::{m2, m3, pa};

    fn open_tank() -> Vessel {
        VesselBuilder::open_tank(m(1.0), m2(1.0), 0.5)
            .port(Port::new("bottom", m(0.0)))
            .port(Port::new("side", m(0.75)))
            .build()
            .unwrap()
    }

    fn accumulator() -> Vessel {
        VesselBuilder::nitrogen_accumulator(m3(0.001), m(0.1), pa(5e6), 1e-6)
            .unwrap()
            .port(Port::new("oil", m(0.0)))
            .build()
            .unwrap()
    }

    #[test]
    fn open_tank_surface_is_ambient() {
        let v = open_tank();
        let s = v.initial_state(|_| Ok(0.0)).unwrap();
        let out = v.evaluate(&s, Regime::Ambient).unwrap();
        assert_eq!(out.regime, Regime::Ambient);
        assert_eq!(out.liquid_pressure_pa, 101_325.0);
        assert!(out.gas.is_none());
        let rho_g = 998.2 * constants::G0_MPS2;
        assert!((out.port_pressures_pa[0] - (101_325.0 + 0.5 * rho_g)).abs() < 1e-9);
        assert_eq!(out.port_pressures_pa[1], 101_325.0);
    }

    #[test]
    fn open_tank_ignores_requested_regime() {
        let v = open_tank();
        let s = v.charge(0.5).unwrap();
        let out = v.evaluate(&s, Regime::Compression).unwrap();
        assert_eq!(out.regime, Regime::Ambient);
    }

    #[test]
    fn accumulator_starts_at_rest_with_gas_at_fill_pressure() {
        let v = accumulator();
        let s = v.initial_state(|_| Ok(0.0)).unwrap();
        assert_eq!(s.extent, 1e-6);
        assert_eq!(v.select_regime(&s).unwrap(), Regime::Rest);
        let out = v.evaluate(&s, Regime::Rest).unwrap();
        let gas = out.gas.unwrap();
        assert_eq!(gas.pressure_pa, 5e6);
        assert!((gas.eos.p.value - 5e6).abs() / 5e6 < 1e-8);
        assert!(out.liquid_pressure_pa <= 5e6);
    }

    #[test]
    fn squeezing_the_cushion_selects_compression() {
        let v = accumulator();
        let s0 = v.charge(1e-6).unwrap();
        let s1 = VesselState {
            extent: 2e-4,
            ..s0
        };
        assert_eq!(v.select_regime(&s1).unwrap(), Regime::Compression);
        let out = v.evaluate(&s1, Regime::Compression).unwrap();
        let gas = out.gas.unwrap();
        assert_eq!(gas.pressure_pa, out.liquid_pressure_pa);
        assert!(out.liquid_pressure_pa > 5e6);
    }

    #[test]
    fn derivatives_need_one_flow_per_port() {
        let v = open_tank();
        let s = v.charge(0.5).unwrap();
        let out = v.evaluate(&s, Regime::Ambient).unwrap();
        assert!(v.derivatives(&out, &[0.0]).is_err());
        let d = v.derivatives(&out, &[0.0, 0.0]).unwrap();
        assert_eq!(d.state.extent, 0.0);
    }

    #[test]
    fn builder_rejects_start_beyond_capacity() {
        let err = VesselBuilder::open_tank(m(1.0), m2(1.0), 1.5).build().unwrap_err();
        assert!(matches!(err, VesselError::GeometricViolation { .. }));

        let err = VesselBuilder::nitrogen_accumulator(m3(0.001), m(0.1), pa(5e6), 0.001)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, VesselError::GeometricViolation { .. }));
    }

    #[test]
    fn builder_rejects_rest_pressure_above_threshold() {
        let cushion = GasCushion::air(pa(1e5), k(293.15)).unwrap();
        let err = VesselBuilder::new(
            "t",
            Geometry::prismatic(m(1.0), m2(1.0)),
            IncompressibleLiquid::water(),
        )
        .cushion(cushion)
        .extent_start(0.5)
        .build()
        .unwrap_err();
        assert!(matches!(err, VesselError::InvalidArg { .. }));
    }

    #[test]
    fn builder_rejects_port_above_top() {
        let err = VesselBuilder::open_tank(m(1.0), m2(1.0), 0.5)
            .port(Port::new("high", m(1.5)))
            .build()
            .unwrap_err();
        assert!(matches!(err, VesselError::InvalidArg { .. }));
    }

    #[test]
    fn air_cushion_tank_ports_pass_internal_pressure() {
        let r = PortResistance::new(m(0.05), 0.5, 1.0).unwrap();
        let v = VesselBuilder::air_cushion_tank(m(4.0), m2(2.0), pa(3e5), 2.0, r)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(v.cushion_kind(), CushionKind::SealedAir);
        let s = v.initial_state(|_| Ok(0.0)).unwrap();
        assert_eq!(v.select_regime(&s).unwrap(), Regime::Compression);
        let out = v.evaluate(&s, Regime::Compression).unwrap();
        assert!((out.liquid_pressure_pa - 3e5).abs() < 1e-3);
        assert_eq!(out.port_pressures_pa, vec![out.liquid_pressure_pa; 2]);
    }

    #[test]
    fn air_cushion_threshold_follows_ambient_set_later() {
        let r = PortResistance::new(m(0.05), 0.5, 1.0).unwrap();
        let boundary = BoundaryCondition {
            p_ambient: pa(1.5e5),
            ..BoundaryCondition::default()
        };
        let v = VesselBuilder::air_cushion_tank(m(4.0), m2(2.0), pa(3e5), 2.0, r)
            .unwrap()
            .boundary(boundary)
            .build()
            .unwrap();
        let c = v.cushion().unwrap();
        assert_eq!(c.threshold.value, 1.5e5);
        assert_eq!(v.rest_pressure(), 1.5e5);

        let s = v.charge(2.0).unwrap();
        let squeezed = VesselState {
            extent: 3.0,
            ..s
        };
        assert_eq!(v.select_regime(&squeezed).unwrap(), Regime::Compression);
    }

    #[test]
    fn explicit_cushion_keeps_its_threshold() {
        let cushion = GasCushion::air(pa(2e5), k(293.15)).unwrap();
        let v = VesselBuilder::air_cushion_tank(
            m(4.0),
            m2(2.0),
            pa(3e5),
            2.0,
            PortResistance::new(m(0.05), 0.5, 1.0).unwrap(),
        )
        .unwrap()
        .cushion(cushion)
        .build()
        .unwrap();
        assert_eq!(v.cushion().unwrap().threshold.value, 2e5);
    }
}
