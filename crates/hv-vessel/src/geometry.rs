//! Vessel geometry and the liquid extent it implies.
//!
//! A vessel stores its liquid as one scalar extent: a level for upright
//! prismatic tanks, a liquid volume for closed shells. Everything else
//! (liquid volume, level seen by the ports, gas volume) is derived here.

use std::f64::consts::PI;

use crate::error::{VesselError, VesselResult};
use hv_core::units::{Area, Length, Volume, m2, m3};

/// Unit of the stored-liquid state variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtentKind {
    /// Level above the vessel bottom [m]
    Level,
    /// Liquid volume [m³]
    Volume,
}

/// Vessel shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Upright tank with constant cross section; extent is the level.
    Prismatic { height: Length, cross_area: Area },
    /// Closed cylindrical shell; extent is the liquid volume.
    Shell {
        total_volume: Volume,
        inner_diameter: Length,
    },
}

impl Geometry {
    pub fn prismatic(height: Length, cross_area: Area) -> Self {
        Geometry::Prismatic { height, cross_area }
    }

    pub fn shell(total_volume: Volume, inner_diameter: Length) -> Self {
        Geometry::Shell {
            total_volume,
            inner_diameter,
        }
    }

    /// Shell whose volume follows from its inner diameter and shell length.
    pub fn shell_from_length(inner_diameter: Length, shell_length: Length) -> Self {
        let d = inner_diameter.value;
        Geometry::Shell {
            total_volume: m3(0.25 * PI * d * d * shell_length.value),
            inner_diameter,
        }
    }

    /// Check all dimensions are positive and finite.
    pub fn validate(&self) -> VesselResult<()> {
        let dims: [(f64, &'static str); 2] = match self {
            Geometry::Prismatic { height, cross_area } => [
                (height.value, "height must be positive"),
                (cross_area.value, "cross_area must be positive"),
            ],
            Geometry::Shell {
                total_volume,
                inner_diameter,
            } => [
                (total_volume.value, "total_volume must be positive"),
                (inner_diameter.value, "inner_diameter must be positive"),
            ],
        };
        for (v, what) in dims {
            if !v.is_finite() || v <= 0.0 {
                return Err(VesselError::InvalidArg { what });
            }
        }
        Ok(())
    }

    pub fn extent_kind(&self) -> ExtentKind {
        match self {
            Geometry::Prismatic { .. } => ExtentKind::Level,
            Geometry::Shell { .. } => ExtentKind::Volume,
        }
    }

    /// Largest admissible extent (height or total volume).
    pub fn capacity(&self) -> f64 {
        match self {
            Geometry::Prismatic { height, .. } => height.value,
            Geometry::Shell { total_volume, .. } => total_volume.value,
        }
    }

    /// Total internal volume [m³].
    pub fn capacity_volume(&self) -> f64 {
        match self {
            Geometry::Prismatic { height, cross_area } => height.value * cross_area.value,
            Geometry::Shell { total_volume, .. } => total_volume.value,
        }
    }

    /// Horizontal cross section used to convert between level and volume.
    pub fn cross_area(&self) -> Area {
        match self {
            Geometry::Prismatic { cross_area, .. } => *cross_area,
            Geometry::Shell { inner_diameter, .. } => {
                let d = inner_diameter.value;
                m2(0.25 * PI * d * d)
            }
        }
    }

    /// Liquid volume [m³] for a given extent.
    pub fn liquid_volume(&self, extent: f64) -> f64 {
        match self {
            Geometry::Prismatic { cross_area, .. } => cross_area.value * extent,
            Geometry::Shell { .. } => extent,
        }
    }

    /// Liquid level above the bottom [m] for a given extent.
    pub fn level(&self, extent: f64) -> f64 {
        match self {
            Geometry::Prismatic { .. } => extent,
            Geometry::Shell { .. } => extent / self.cross_area().value,
        }
    }

    /// Extent rate for a liquid volume rate [m³/s].
    pub fn extent_rate(&self, volume_rate: f64) -> f64 {
        match self {
            Geometry::Prismatic { cross_area, .. } => volume_rate / cross_area.value,
            Geometry::Shell { .. } => volume_rate,
        }
    }
}
