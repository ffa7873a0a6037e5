//! Port static-pressure model.

use std::f64::consts::PI;

use crate::error::{VesselError, VesselResult};
use hv_core::PortId;
use hv_core::units::{Area, Length, m2};

/// Hydraulic resistance data for a port connection.
///
/// The vessel only carries the descriptor; the connected component uses it
/// to model the dissipative pressure drop.
#[derive(Debug, Clone, PartialEq)]
pub struct PortResistance {
    /// Orifice diameter
    pub diameter: Length,
    /// Loss coefficient for flow into the vessel
    pub zeta_in: f64,
    /// Loss coefficient for flow out of the vessel
    pub zeta_out: f64,
}

impl PortResistance {
    pub fn new(diameter: Length, zeta_in: f64, zeta_out: f64) -> VesselResult<Self> {
        if !diameter.value.is_finite() || diameter.value <= 0.0 {
            return Err(VesselError::InvalidArg {
                what: "port diameter must be positive",
            });
        }
        if !zeta_in.is_finite() || zeta_in <= 0.0 || !zeta_out.is_finite() || zeta_out <= 0.0 {
            return Err(VesselError::InvalidArg {
                what: "port loss coefficients must be positive",
            });
        }
        Ok(Self {
            diameter,
            zeta_in,
            zeta_out,
        })
    }

    /// Orifice flow area.
    pub fn area(&self) -> Area {
        let d = self.diameter.value;
        m2(0.25 * PI * d * d)
    }

    /// Loss coefficient for the given flow direction.
    pub fn zeta(&self, inflow: bool) -> f64 {
        if inflow { self.zeta_in } else { self.zeta_out }
    }
}

/// A vessel port.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub name: String,
    /// Height of the port above the vessel bottom
    pub height: Length,
    pub resistance: Option<PortResistance>,
}

impl Port {
    /// Port without resistance data at the given height.
    pub fn new(name: impl Into<String>, height: Length) -> Self {
        Self {
            name: name.into(),
            height,
            resistance: None,
        }
    }

    pub fn with_resistance(mut self, resistance: PortResistance) -> Self {
        self.resistance = Some(resistance);
        self
    }

    /// Static pressure [Pa] presented to the connected component.
    ///
    /// Without resistance data the hydrostatic head above the port is added
    /// to `base_pa`; the head is zero when the port is above the surface.
    /// With resistance data the internal pressure is passed through.
    pub fn static_pressure(&self, level_m: f64, rho: f64, g: f64, base_pa: f64) -> f64 {
        match self.resistance {
            Some(_) => base_pa,
            None => (level_m - self.height.value).max(0.0) * g * rho + base_pa,
        }
    }
}

/// Static pressure of every port; fails on a non-positive absolute pressure.
pub fn port_pressures(
    ports: &[Port],
    level_m: f64,
    rho: f64,
    g: f64,
    base_pa: f64,
) -> VesselResult<Vec<f64>> {
    ports
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let p = port.static_pressure(level_m, rho, g, base_pa);
            if !p.is_finite() || p <= 0.0 {
                return Err(VesselError::NegativePressure {
                    port: PortId::from_index(i as u32),
                    pressure_pa: p,
                });
            }
            Ok(p)
        })
        .collect()
}
