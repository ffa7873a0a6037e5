//! Turn a validated project into a runnable vessel model.

use hv_core::units::{k, kgpm3, m, m2, m3, mps2, pa};
use std::sync::Arc;

use hv_fluids::{CoolPropGas, GasModel, GasSpecies, IdealGas, IncompressibleLiquid, VanDerWaals};
use hv_sim::{
    ClosedPort, FlowRamp, FlowTable, IntegratorType, MassFlowSource, OrificeSource, PortBoundary,
    SimOptions, VesselModel,
};
use hv_vessel::{
    BoundaryCondition, EnergyDynamics, GasCushion, Geometry, InitializationPolicy, Port,
    PortResistance, Vessel, VesselBuilder,
};

use crate::schema::{
    CushionDef, EnergyDynamicsDef, GasModelDef, GeometryDef, InitializationPolicyDef, IntegratorDef, LiquidDef,
    PortBoundaryDef, PortDef, RunDef, VesselProject,
};
use crate::validate::validate_project;
use crate::{ProjectError, ProjectResult};

/// Validate the project and build its vessel.
pub fn build_vessel(project: &VesselProject) -> ProjectResult<Vessel> {
    validate_project(project)?;

    let def = &project.vessel;
    let boundary = BoundaryCondition {
        p_ambient: pa(project.ambient.pressure_pa),
        t_ambient: k(project.ambient.temperature_k),
        g: mps2(project.ambient.gravity_m_s2),
    };

    let liquid = match &def.liquid {
        LiquidDef::Water => IncompressibleLiquid::water(),
        LiquidDef::HydraulicOil => IncompressibleLiquid::hydraulic_oil(),
        LiquidDef::Custom {
            name,
            density_kg_m3,
        } => IncompressibleLiquid::new(name.clone(), kgpm3(*density_kg_m3))
            .map_err(hv_vessel::VesselError::from)?,
    }
    .with_single_state(def.single_state_medium);

    let mut builder = VesselBuilder::new(def.name.clone(), geometry(&def.geometry), liquid)
        .boundary(boundary)
        .energy_dynamics(match def.energy_dynamics {
            EnergyDynamicsDef::Dynamic => EnergyDynamics::Dynamic,
            EnergyDynamicsDef::SteadyState => EnergyDynamics::SteadyState,
        })
        .policy(match def.initialization.policy {
            InitializationPolicyDef::FixedInitial => InitializationPolicy::FixedInitial,
            InitializationPolicyDef::SteadyStateInitial => InitializationPolicy::SteadyStateInitial,
            InitializationPolicyDef::Free => InitializationPolicy::Free,
        })
        .extent_start(def.initialization.start_extent);

    if let Some(cushion) = cushion(&def.cushion, &boundary)? {
        builder = builder.cushion(cushion);
    }
    for p in &def.ports {
        builder = builder.port(port(p)?);
    }

    let vessel = builder.build()?;
    tracing::debug!(
        project = %project.name,
        vessel = vessel.name(),
        cushion = vessel.cushion_kind().as_str(),
        ports = vessel.ports().len(),
        "vessel built"
    );
    Ok(vessel)
}

/// Validate the project and build the transient model with its boundaries.
pub fn build_model(project: &VesselProject) -> ProjectResult<VesselModel> {
    let vessel = build_vessel(project)?;
    let boundaries = project
        .vessel
        .ports
        .iter()
        .map(|p| boundary(&p.boundary))
        .collect::<ProjectResult<Vec<_>>>()?;
    Ok(VesselModel::new(vessel, boundaries)?)
}

/// Simulation options from the run section.
pub fn sim_options(run: &RunDef) -> SimOptions {
    let steps = (run.t_end_s / run.dt_s).ceil();
    SimOptions {
        dt: run.dt_s,
        t_end: run.t_end_s,
        // room for halved trial steps and event sub-steps on top of the grid
        max_steps: (steps as usize).saturating_mul(4).saturating_add(64),
        record_every: run.record_every,
        integrator: match run.integrator {
            IntegratorDef::RK4 => IntegratorType::RK4,
            IntegratorDef::ForwardEuler => IntegratorType::ForwardEuler,
        },
        event_tol: run.event_tol_s,
        ..SimOptions::default()
    }
}

fn geometry(def: &GeometryDef) -> Geometry {
    match def {
        GeometryDef::Prismatic {
            height_m,
            cross_area_m2,
        } => Geometry::prismatic(m(*height_m), m2(*cross_area_m2)),
        GeometryDef::Shell {
            total_volume_m3,
            inner_diameter_m,
        } => Geometry::shell(m3(*total_volume_m3), m(*inner_diameter_m)),
        GeometryDef::ShellLength {
            inner_diameter_m,
            length_m,
        } => Geometry::shell_from_length(m(*inner_diameter_m), m(*length_m)),
    }
}

fn cushion(def: &CushionDef, boundary: &BoundaryCondition) -> ProjectResult<Option<GasCushion>> {
    let t_of = |t: Option<f64>| k(t.unwrap_or(boundary.t_ambient.value));
    let cushion = match def {
        CushionDef::None => return Ok(None),
        CushionDef::Nitrogen {
            filled_pressure_pa,
            eos,
            start_pressure_pa,
            temperature_k,
            rest_pressure_pa,
        } => {
            let c = GasCushion::nitrogen(pa(*filled_pressure_pa), t_of(*temperature_k))?
                .with_model(gas_model(*eos, GasSpecies::N2));
            with_pressures(c, *start_pressure_pa, *rest_pressure_pa)
        }
        CushionDef::Air {
            start_pressure_pa,
            eos,
            threshold_pressure_pa,
            temperature_k,
            rest_pressure_pa,
        } => {
            let threshold = threshold_pressure_pa.unwrap_or(boundary.p_ambient.value);
            let c = GasCushion::air(pa(threshold), t_of(*temperature_k))?
                .with_model(gas_model(*eos, GasSpecies::Air));
            with_pressures(c, Some(*start_pressure_pa), *rest_pressure_pa)
        }
    };
    Ok(Some(cushion))
}

fn gas_model(def: GasModelDef, species: GasSpecies) -> Arc<dyn GasModel> {
    match def {
        GasModelDef::CoolProp => Arc::new(CoolPropGas::new(species)),
        GasModelDef::IdealGas => Arc::new(IdealGas::new(species)),
        GasModelDef::VanDerWaals => Arc::new(VanDerWaals::new(species)),
    }
}

fn with_pressures(mut c: GasCushion, start: Option<f64>, rest: Option<f64>) -> GasCushion {
    if let Some(p) = start {
        c = c.with_start_pressure(pa(p));
    }
    if let Some(p) = rest {
        c = c.with_rest_pressure(pa(p));
    }
    c
}

fn port(def: &PortDef) -> ProjectResult<Port> {
    let mut port = Port::new(def.name.clone(), m(def.height_m));
    if let Some(r) = &def.resistance {
        port = port.with_resistance(PortResistance::new(m(r.diameter_m), r.zeta_in, r.zeta_out)?);
    }
    Ok(port)
}

fn boundary(def: &PortBoundaryDef) -> ProjectResult<Box<dyn PortBoundary>> {
    let b: Box<dyn PortBoundary> = match def {
        PortBoundaryDef::Closed => Box::new(ClosedPort),
        PortBoundaryDef::MassFlow { mdot_kg_s } => Box::new(MassFlowSource::new(*mdot_kg_s)?),
        PortBoundaryDef::Ramp {
            from_kg_s,
            to_kg_s,
            start_s,
            duration_s,
        } => Box::new(FlowRamp::new(*from_kg_s, *to_kg_s, *start_s, *duration_s)?),
        PortBoundaryDef::Table { points } => Box::new(FlowTable::new(
            points.iter().map(|[t, q]| (*t, *q)).collect(),
        )?),
        PortBoundaryDef::Orifice { pressure_pa } => Box::new(OrificeSource::new(*pressure_pa)?),
    };
    Ok(b)
}

impl From<hv_vessel::VesselError> for ProjectError {
    fn from(e: hv_vessel::VesselError) -> Self {
        ProjectError::Build {
            what: e.to_string(),
        }
    }
}

impl From<hv_sim::SimError> for ProjectError {
    fn from(e: hv_sim::SimError) -> Self {
        ProjectError::Build {
            what: e.to_string(),
        }
    }
}
