//! Project schema definitions.
//!
//! Every physical field carries its SI unit in the name. The start extent
//! is a level in metres for prismatic geometry and a liquid volume in cubic
//! metres for shells.

use serde::{Deserialize, Serialize};

/// Newest schema version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselProject {
    pub version: u32,
    pub name: String,
    pub vessel: VesselDef,
    #[serde(default)]
    pub ambient: AmbientDef,
    #[serde(default)]
    pub run: RunDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselDef {
    pub name: String,
    pub geometry: GeometryDef,
    pub liquid: LiquidDef,
    #[serde(default)]
    pub cushion: CushionDef,
    #[serde(default)]
    pub ports: Vec<PortDef>,
    #[serde(default)]
    pub initialization: InitializationDef,
    #[serde(default)]
    pub energy_dynamics: EnergyDynamicsDef,
    /// Treat the medium as single-state (no boundary work on the cushion).
    #[serde(default)]
    pub single_state_medium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum GeometryDef {
    Prismatic {
        height_m: f64,
        cross_area_m2: f64,
    },
    Shell {
        total_volume_m3: f64,
        inner_diameter_m: f64,
    },
    /// Cylindrical shell sized from its length.
    ShellLength {
        inner_diameter_m: f64,
        length_m: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LiquidDef {
    Water,
    HydraulicOil,
    Custom { name: String, density_kg_m3: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum CushionDef {
    /// Open top at ambient pressure.
    #[default]
    None,
    /// Sealed nitrogen.
    Nitrogen {
        filled_pressure_pa: f64,
        #[serde(default)]
        eos: GasModelDef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_pressure_pa: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature_k: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_pressure_pa: Option<f64>,
    },
    /// Sealed air; the threshold defaults to ambient.
    Air {
        start_pressure_pa: f64,
        #[serde(default)]
        eos: GasModelDef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold_pressure_pa: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature_k: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_pressure_pa: Option<f64>,
    },
}

/// Equation of state for the cushion gas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum GasModelDef {
    #[default]
    CoolProp,
    IdealGas,
    VanDerWaals,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortDef {
    pub name: String,
    pub height_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<ResistanceDef>,
    #[serde(default)]
    pub boundary: PortBoundaryDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResistanceDef {
    pub diameter_m: f64,
    pub zeta_in: f64,
    pub zeta_out: f64,
}

/// Source driving the flow through one port (positive into the vessel).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum PortBoundaryDef {
    #[default]
    Closed,
    MassFlow {
        mdot_kg_s: f64,
    },
    Ramp {
        from_kg_s: f64,
        to_kg_s: f64,
        start_s: f64,
        duration_s: f64,
    },
    /// Piecewise-linear `[time_s, mdot_kg_s]` pairs.
    Table {
        points: Vec<[f64; 2]>,
    },
    /// Reservoir at fixed pressure behind the port resistance.
    Orifice {
        pressure_pa: f64,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum InitializationPolicyDef {
    #[default]
    FixedInitial,
    SteadyStateInitial,
    Free,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InitializationDef {
    #[serde(default)]
    pub policy: InitializationPolicyDef,
    /// Level [m] or liquid volume [m³]
    #[serde(default)]
    pub start_extent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EnergyDynamicsDef {
    #[default]
    Dynamic,
    SteadyState,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmbientDef {
    pub pressure_pa: f64,
    pub temperature_k: f64,
    pub gravity_m_s2: f64,
}

impl Default for AmbientDef {
    fn default() -> Self {
        Self {
            pressure_pa: hv_core::constants::P_ATM_PA,
            temperature_k: hv_core::constants::T_STD_K,
            gravity_m_s2: hv_core::constants::G0_MPS2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum IntegratorDef {
    #[default]
    RK4,
    ForwardEuler,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    pub dt_s: f64,
    pub t_end_s: f64,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
    #[serde(default)]
    pub integrator: IntegratorDef,
    #[serde(default = "default_event_tol_s")]
    pub event_tol_s: f64,
}

fn default_record_every() -> usize {
    1
}

fn default_event_tol_s() -> f64 {
    1e-9
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            dt_s: 1e-2,
            t_end_s: 1.0,
            record_every: default_record_every(),
            integrator: IntegratorDef::default(),
            event_tol_s: default_event_tol_s(),
        }
    }
}
