//! Project validation logic.

use std::collections::HashSet;

use crate::schema::{
    CushionDef, GeometryDef, LiquidDef, PortBoundaryDef, PortDef, RunDef, VesselProject,
};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn positive(field: impl Into<String>, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            value: v.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn non_negative(field: impl Into<String>, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() || v < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            value: v.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}

fn optional_positive(field: &str, v: Option<f64>) -> Result<(), ValidationError> {
    match v {
        Some(v) => positive(field, v),
        None => Ok(()),
    }
}

pub fn validate_project(project: &VesselProject) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > crate::schema::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let ambient = &project.ambient;
    positive("ambient pressure_pa", ambient.pressure_pa)?;
    positive("ambient temperature_k", ambient.temperature_k)?;
    non_negative("ambient gravity_m_s2", ambient.gravity_m_s2)?;

    let vessel = &project.vessel;
    let (capacity, max_level) = validate_geometry(&vessel.geometry)?;

    if let LiquidDef::Custom { density_kg_m3, .. } = &vessel.liquid {
        positive("liquid density_kg_m3", *density_kg_m3)?;
    }

    let sealed = validate_cushion(&vessel.cushion, ambient.pressure_pa)?;

    let start = vessel.initialization.start_extent;
    non_negative("initialization start_extent", start)?;
    if start > capacity || (sealed && start >= capacity) {
        return Err(ValidationError::InvalidValue {
            field: "initialization start_extent".to_string(),
            value: start.to_string(),
            reason: format!("must leave room in a vessel of capacity {capacity}"),
        });
    }

    let mut names = HashSet::new();
    for port in &vessel.ports {
        if !names.insert(&port.name) {
            return Err(ValidationError::DuplicateId {
                id: port.name.clone(),
                context: format!("vessel '{}' ports", vessel.name),
            });
        }
        validate_port(port, max_level)?;
    }

    validate_run(&project.run)
}

/// Returns `(capacity in extent units, maximum level in m)`.
fn validate_geometry(geometry: &GeometryDef) -> Result<(f64, f64), ValidationError> {
    match geometry {
        GeometryDef::Prismatic {
            height_m,
            cross_area_m2,
        } => {
            positive("geometry height_m", *height_m)?;
            positive("geometry cross_area_m2", *cross_area_m2)?;
            Ok((*height_m, *height_m))
        }
        GeometryDef::Shell {
            total_volume_m3,
            inner_diameter_m,
        } => {
            positive("geometry total_volume_m3", *total_volume_m3)?;
            positive("geometry inner_diameter_m", *inner_diameter_m)?;
            let area = 0.25 * std::f64::consts::PI * inner_diameter_m * inner_diameter_m;
            Ok((*total_volume_m3, total_volume_m3 / area))
        }
        GeometryDef::ShellLength {
            inner_diameter_m,
            length_m,
        } => {
            positive("geometry inner_diameter_m", *inner_diameter_m)?;
            positive("geometry length_m", *length_m)?;
            let area = 0.25 * std::f64::consts::PI * inner_diameter_m * inner_diameter_m;
            Ok((area * length_m, *length_m))
        }
    }
}

/// Returns whether the cushion is sealed.
fn validate_cushion(cushion: &CushionDef, p_ambient: f64) -> Result<bool, ValidationError> {
    let (threshold, start, temperature, rest) = match cushion {
        CushionDef::None => return Ok(false),
        CushionDef::Nitrogen {
            filled_pressure_pa,
            start_pressure_pa,
            temperature_k,
            rest_pressure_pa,
            ..
        } => (
            *filled_pressure_pa,
            *start_pressure_pa,
            *temperature_k,
            *rest_pressure_pa,
        ),
        CushionDef::Air {
            start_pressure_pa,
            threshold_pressure_pa,
            temperature_k,
            rest_pressure_pa,
            ..
        } => (
            threshold_pressure_pa.unwrap_or(p_ambient),
            Some(*start_pressure_pa),
            *temperature_k,
            *rest_pressure_pa,
        ),
    };

    positive("cushion threshold pressure", threshold)?;
    optional_positive("cushion start_pressure_pa", start)?;
    optional_positive("cushion temperature_k", temperature)?;
    optional_positive("cushion rest_pressure_pa", rest)?;

    let rest = rest.unwrap_or(p_ambient);
    if rest > threshold {
        return Err(ValidationError::InvalidValue {
            field: "cushion rest pressure".to_string(),
            value: rest.to_string(),
            reason: format!("must not exceed the threshold pressure {threshold}"),
        });
    }
    Ok(true)
}

fn validate_port(port: &PortDef, max_level: f64) -> Result<(), ValidationError> {
    let field = |name: &str| format!("port '{}' {}", port.name, name);

    non_negative(field("height_m"), port.height_m)?;
    if port.height_m > max_level {
        return Err(ValidationError::InvalidValue {
            field: field("height_m"),
            value: port.height_m.to_string(),
            reason: format!("must not be above the vessel top at {max_level} m"),
        });
    }

    if let Some(r) = &port.resistance {
        positive(field("diameter_m"), r.diameter_m)?;
        positive(field("zeta_in"), r.zeta_in)?;
        positive(field("zeta_out"), r.zeta_out)?;
    }

    match &port.boundary {
        PortBoundaryDef::Closed => {}
        PortBoundaryDef::MassFlow { mdot_kg_s } => {
            if !mdot_kg_s.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: field("mdot_kg_s"),
                    value: mdot_kg_s.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }
        PortBoundaryDef::Ramp {
            from_kg_s,
            to_kg_s,
            start_s,
            duration_s,
        } => {
            for (name, v) in [("from_kg_s", from_kg_s), ("to_kg_s", to_kg_s), ("start_s", start_s)] {
                if !v.is_finite() {
                    return Err(ValidationError::InvalidValue {
                        field: field(name),
                        value: v.to_string(),
                        reason: "must be finite".to_string(),
                    });
                }
            }
            non_negative(field("duration_s"), *duration_s)?;
        }
        PortBoundaryDef::Table { points } => {
            if points.is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: field("points"),
                    value: "[]".to_string(),
                    reason: "needs at least one point".to_string(),
                });
            }
            if points.iter().flatten().any(|v| !v.is_finite())
                || points.windows(2).any(|w| w[1][0] <= w[0][0])
            {
                return Err(ValidationError::InvalidValue {
                    field: field("points"),
                    value: format!("{points:?}"),
                    reason: "times must be finite and strictly increasing".to_string(),
                });
            }
        }
        PortBoundaryDef::Orifice { pressure_pa } => {
            positive(field("pressure_pa"), *pressure_pa)?;
            if port.resistance.is_none() {
                return Err(ValidationError::MissingReference {
                    id: port.name.clone(),
                    context: "orifice boundary needs port resistance data".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    positive("run dt_s", run.dt_s)?;
    non_negative("run t_end_s", run.t_end_s)?;
    positive("run event_tol_s", run.event_tol_s)?;
    if run.record_every == 0 {
        return Err(ValidationError::InvalidValue {
            field: "run record_every".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}
