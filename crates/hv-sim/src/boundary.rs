//! Port boundary sources used to drive vessel scenarios.
//!
//! Each source sets the mass flow through one port (positive into the
//! vessel) from the time and the static pressure the vessel presents.

use hv_vessel::Port;

use crate::error::{SimError, SimResult};

/// Pressure difference below which an orifice carries no flow [Pa].
pub const EPSILON_PRESSURE: f64 = 1e-3;

/// What a boundary source sees of its vessel port.
#[derive(Debug, Clone, Copy)]
pub struct PortContext<'a> {
    pub port: &'a Port,
    /// Static pressure at the port [Pa]
    pub pressure_pa: f64,
    /// Density of the stored liquid [kg/m³]
    pub liquid_density: f64,
}

/// Mass-flow boundary attached to one vessel port.
pub trait PortBoundary: std::fmt::Debug + Send {
    /// Mass flow into the vessel [kg/s].
    fn mass_flow(&self, t: f64, ctx: &PortContext<'_>) -> SimResult<f64>;
}

/// Port closed off: no flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedPort;

impl PortBoundary for ClosedPort {
    fn mass_flow(&self, _t: f64, _ctx: &PortContext<'_>) -> SimResult<f64> {
        Ok(0.0)
    }
}

/// Constant mass flow.
#[derive(Debug, Clone, Copy)]
pub struct MassFlowSource {
    pub mdot_kgps: f64,
}

impl MassFlowSource {
    pub fn new(mdot_kgps: f64) -> SimResult<Self> {
        if !mdot_kgps.is_finite() {
            return Err(SimError::InvalidArg {
                what: "mass flow must be finite",
            });
        }
        Ok(Self { mdot_kgps })
    }
}

impl PortBoundary for MassFlowSource {
    fn mass_flow(&self, _t: f64, _ctx: &PortContext<'_>) -> SimResult<f64> {
        Ok(self.mdot_kgps)
    }
}

/// Linear ramp from `from_kgps` to `to_kgps` over `[t_start, t_start + duration]`.
#[derive(Debug, Clone, Copy)]
pub struct FlowRamp {
    pub from_kgps: f64,
    pub to_kgps: f64,
    pub t_start: f64,
    pub duration: f64,
}

impl FlowRamp {
    pub fn new(from_kgps: f64, to_kgps: f64, t_start: f64, duration: f64) -> SimResult<Self> {
        if !from_kgps.is_finite() || !to_kgps.is_finite() || !t_start.is_finite() {
            return Err(SimError::InvalidArg {
                what: "ramp values must be finite",
            });
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(SimError::InvalidArg {
                what: "ramp duration must be non-negative",
            });
        }
        Ok(Self {
            from_kgps,
            to_kgps,
            t_start,
            duration,
        })
    }

    pub fn value(&self, t: f64) -> f64 {
        if t <= self.t_start {
            self.from_kgps
        } else if t >= self.t_start + self.duration {
            self.to_kgps
        } else {
            let frac = (t - self.t_start) / self.duration;
            self.from_kgps + frac * (self.to_kgps - self.from_kgps)
        }
    }
}

impl PortBoundary for FlowRamp {
    fn mass_flow(&self, t: f64, _ctx: &PortContext<'_>) -> SimResult<f64> {
        Ok(self.value(t))
    }
}

/// Piecewise-linear mass flow over `(time, kg/s)` points; held constant
/// outside the table.
#[derive(Debug, Clone)]
pub struct FlowTable {
    points: Vec<(f64, f64)>,
}

impl FlowTable {
    pub fn new(points: Vec<(f64, f64)>) -> SimResult<Self> {
        if points.is_empty() {
            return Err(SimError::InvalidArg {
                what: "flow table needs at least one point",
            });
        }
        if points.iter().any(|(t, m)| !t.is_finite() || !m.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "flow table entries must be finite",
            });
        }
        if points.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(SimError::InvalidArg {
                what: "flow table times must be strictly increasing",
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn value(&self, t: f64) -> f64 {
        let idx = self.points.partition_point(|(ti, _)| *ti <= t);
        match idx {
            0 => self.points[0].1,
            n if n == self.points.len() => self.points[n - 1].1,
            n => {
                let (t0, m0) = self.points[n - 1];
                let (t1, m1) = self.points[n];
                m0 + (t - t0) / (t1 - t0) * (m1 - m0)
            }
        }
    }
}

impl PortBoundary for FlowTable {
    fn mass_flow(&self, t: f64, _ctx: &PortContext<'_>) -> SimResult<f64> {
        Ok(self.value(t))
    }
}

/// Liquid reservoir at fixed pressure behind the port's resistance.
///
/// Incompressible orifice relation with the loss coefficient picked by
/// flow direction: `mdot = sign(dp) * A * sqrt(2 * rho * |dp| / zeta)`.
#[derive(Debug, Clone, Copy)]
pub struct OrificeSource {
    pub pressure_pa: f64,
}

impl OrificeSource {
    pub fn new(pressure_pa: f64) -> SimResult<Self> {
        if !pressure_pa.is_finite() || pressure_pa <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "reservoir pressure must be positive",
            });
        }
        Ok(Self { pressure_pa })
    }
}

impl PortBoundary for OrificeSource {
    fn mass_flow(&self, _t: f64, ctx: &PortContext<'_>) -> SimResult<f64> {
        let resistance = ctx.port.resistance.as_ref().ok_or(SimError::InvalidArg {
            what: "orifice source needs a port with resistance data",
        })?;
        let dp = self.pressure_pa - ctx.pressure_pa;
        if dp.abs() < EPSILON_PRESSURE {
            return Ok(0.0);
        }
        let inflow = dp > 0.0;
        let zeta = resistance.zeta(inflow);
        let area = resistance.area().value;
        let mdot = dp.signum() * area * (2.0 * ctx.liquid_density * dp.abs() / zeta).sqrt();
        if !mdot.is_finite() {
            return Err(SimError::NonPhysical {
                what: "orifice mass flow",
            });
        }
        Ok(mdot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_core::units::m;
    use hv_vessel::PortResistance;

    fn ctx(port: &Port, p: f64) -> PortContext<'_> {
        PortContext {
            port,
            pressure_pa: p,
            liquid_density: 1000.0,
        }
    }

    #[test]
    fn ramp_interpolates_and_holds() {
        let ramp = FlowRamp::new(0.0, 2.0, 1.0, 2.0).unwrap();
        assert_eq!(ramp.value(0.0), 0.0);
        assert_eq!(ramp.value(2.0), 1.0);
        assert_eq!(ramp.value(5.0), 2.0);
        let step = FlowRamp::new(0.0, 2.0, 1.0, 0.0).unwrap();
        assert_eq!(step.value(1.0), 0.0);
        assert_eq!(step.value(1.0 + 1e-12), 2.0);
    }

    #[test]
    fn table_is_piecewise_linear() {
        let table = FlowTable::new(vec![(0.0, 0.0), (1.0, 1.0), (3.0, -1.0)]).unwrap();
        assert_eq!(table.value(-1.0), 0.0);
        assert_eq!(table.value(0.5), 0.5);
        assert_eq!(table.value(1.0), 1.0);
        assert_eq!(table.value(2.0), 0.0);
        assert_eq!(table.value(10.0), -1.0);
        assert!(FlowTable::new(vec![(1.0, 0.0), (1.0, 1.0)]).is_err());
        assert!(FlowTable::new(vec![]).is_err());
    }

    #[test]
    fn orifice_flows_down_the_pressure_gradient() {
        let port = Port::new("in", m(0.0))
            .with_resistance(PortResistance::new(m(0.02), 0.5, 2.0).unwrap());
        let src = OrificeSource::new(3e5).unwrap();
        let q_in = src.mass_flow(0.0, &ctx(&port, 2e5)).unwrap();
        let q_out = OrificeSource::new(1e5)
            .unwrap()
            .mass_flow(0.0, &ctx(&port, 2e5))
            .unwrap();
        assert!(q_in > 0.0);
        assert!(q_out < 0.0);
        // same |dp|, outflow sees four times the loss coefficient
        assert!((q_in / -q_out - 2.0).abs() < 1e-12);
        assert_eq!(src.mass_flow(0.0, &ctx(&port, 3e5)).unwrap(), 0.0);
    }

    #[test]
    fn orifice_needs_resistance_data() {
        let port = Port::new("plain", m(0.0));
        let src = OrificeSource::new(3e5).unwrap();
        assert!(src.mass_flow(0.0, &ctx(&port, 2e5)).is_err());
    }
}
