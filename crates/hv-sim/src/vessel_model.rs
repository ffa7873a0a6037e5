//! Transient model of one vessel driven by port boundary sources.

use hv_vessel::{
    BalanceOutputs, Derivatives, Regime, Vessel, VesselError, VesselResult, VesselState,
};

use crate::boundary::{PortBoundary, PortContext};
use crate::error::{SimError, SimResult};
use crate::model::TransientModel;
use crate::sim::SimRecord;

/// A vessel plus one boundary source per port.
///
/// The pressure-closure regime is latched here and only changes at located
/// switching events.
#[derive(Debug)]
pub struct VesselModel {
    vessel: Vessel,
    boundaries: Vec<Box<dyn PortBoundary>>,
    regime: Regime,
}

impl VesselModel {
    pub fn new(vessel: Vessel, boundaries: Vec<Box<dyn PortBoundary>>) -> SimResult<Self> {
        if boundaries.len() != vessel.ports().len() {
            return Err(SimError::InvalidArg {
                what: "one boundary source per vessel port is required",
            });
        }
        let regime = match vessel.cushion() {
            None => Regime::Ambient,
            Some(_) => Regime::Rest,
        };
        Ok(Self {
            vessel,
            boundaries,
            regime,
        })
    }

    pub fn vessel(&self) -> &Vessel {
        &self.vessel
    }

    /// Currently latched regime.
    pub fn regime(&self) -> Regime {
        self.regime
    }

    fn port_flows(&self, t: f64, outputs: &BalanceOutputs) -> SimResult<Vec<f64>> {
        let rho = self.vessel.liquid().density().value;
        self.vessel
            .ports()
            .iter()
            .zip(&self.boundaries)
            .zip(&outputs.port_pressures_pa)
            .map(|((port, boundary), &p)| {
                let ctx = PortContext {
                    port,
                    pressure_pa: p,
                    liquid_density: rho,
                };
                boundary.mass_flow(t, &ctx)
            })
            .collect()
    }

    /// Balance outputs and derivatives at `(t, x)` under `regime`.
    pub fn evaluate(
        &self,
        t: f64,
        x: &VesselState,
        regime: Regime,
    ) -> SimResult<(BalanceOutputs, Derivatives)> {
        let outputs = self.vessel.evaluate(x, regime)?;
        let flows = self.port_flows(t, &outputs)?;
        let derivatives = self.vessel.derivatives(&outputs, &flows)?;
        Ok((outputs, derivatives))
    }

    /// Balance outputs for every recorded sample.
    ///
    /// The regime is re-selected from each state; between events it equals
    /// the regime that was latched during the run.
    pub fn sample_outputs(&self, record: &SimRecord<VesselState>) -> SimResult<Vec<BalanceOutputs>> {
        record
            .x
            .iter()
            .map(|x| -> SimResult<BalanceOutputs> {
                let regime = self.vessel.select_regime(x)?;
                Ok(self.vessel.evaluate(x, regime)?)
            })
            .collect()
    }

    fn extent_rate(&self, x: &VesselState) -> VesselResult<f64> {
        let regime = self.vessel.select_regime(x)?;
        match self.evaluate(0.0, x, regime) {
            Ok((_, d)) => Ok(d.state.extent),
            Err(SimError::Vessel(e)) => Err(e),
            Err(e) => Err(VesselError::InitializationFailed {
                what: e.to_string(),
            }),
        }
    }
}

impl TransientModel for VesselModel {
    type State = VesselState;

    fn initial_state(&mut self) -> SimResult<VesselState> {
        let x0 = self.vessel.initial_state(|x| self.extent_rate(x))?;
        self.regime = self.vessel.select_regime(&x0)?;
        tracing::info!(
            vessel = self.vessel.name(),
            cushion = self.vessel.cushion_kind().as_str(),
            regime = self.regime.as_str(),
            extent = x0.extent,
            "vessel initialized"
        );
        Ok(x0)
    }

    fn rhs(&mut self, t: f64, x: &VesselState) -> SimResult<VesselState> {
        let (_, d) = self.evaluate(t, x, self.regime)?;
        Ok(d.state)
    }

    fn add(&self, a: &VesselState, b: &VesselState) -> VesselState {
        VesselState {
            extent: a.extent + b.extent,
            gas_mass_kg: a.gas_mass_kg + b.gas_mass_kg,
            gas_energy_j: a.gas_energy_j + b.gas_energy_j,
        }
    }

    fn scale(&self, a: &VesselState, scale: f64) -> VesselState {
        VesselState {
            extent: a.extent * scale,
            gas_mass_kg: a.gas_mass_kg * scale,
            gas_energy_j: a.gas_energy_j * scale,
        }
    }

    fn switching_function(&self, _t: f64, x: &VesselState) -> SimResult<Option<f64>> {
        Ok(self.vessel.switching_function(x)?)
    }

    fn on_event(&mut self, t: f64, x: &VesselState) -> SimResult<()> {
        let next = self.vessel.select_regime(x)?;
        if next != self.regime {
            tracing::info!(
                t,
                from = self.regime.as_str(),
                to = next.as_str(),
                "regime switch"
            );
        }
        self.regime = next;
        Ok(())
    }
}
