//! Cushion gas species and their constant property data.

use std::fmt;
use std::str::FromStr;

use crate::error::FluidError;

/// Universal gas constant [J/(mol·K)].
pub const R_UNIVERSAL: f64 = 8.314_462_618;

/// Gas species usable as a vessel cushion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GasSpecies {
    /// Nitrogen (N2), the usual accumulator precharge gas.
    N2,
    /// Dry air, used by air-cushion surge tanks.
    Air,
}

impl GasSpecies {
    /// Canonical key used in configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            GasSpecies::N2 => "N2",
            GasSpecies::Air => "Air",
        }
    }

    /// Molar mass [kg/mol].
    pub fn molar_mass(&self) -> f64 {
        match self {
            GasSpecies::N2 => 0.028_013_4,
            GasSpecies::Air => 0.028_964_7,
        }
    }

    /// Specific gas constant R = R_u / M [J/(kg·K)].
    pub fn gas_constant(&self) -> f64 {
        R_UNIVERSAL / self.molar_mass()
    }

    /// Constant-volume specific heat near room temperature [J/(kg·K)].
    pub fn cv(&self) -> f64 {
        match self {
            GasSpecies::N2 => 743.0,
            GasSpecies::Air => 718.0,
        }
    }

    /// Matching CoolProp fluid.
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            GasSpecies::N2 => Pure::Nitrogen,
            GasSpecies::Air => Pure::Air,
        }
    }

    /// Molar van der Waals constants (a [Pa·m⁶/mol²], b [m³/mol]).
    pub fn van_der_waals_molar(&self) -> (f64, f64) {
        match self {
            GasSpecies::N2 => (0.137_0, 3.87e-5),
            GasSpecies::Air => (0.135_8, 3.64e-5),
        }
    }
}

impl fmt::Display for GasSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GasSpecies {
    type Err = FluidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n2" | "nitrogen" => Ok(GasSpecies::N2),
            "air" => Ok(GasSpecies::Air),
            _ => Err(FluidError::InvalidArg {
                what: "unknown gas species (expected N2 or Air)",
            }),
        }
    }
}
