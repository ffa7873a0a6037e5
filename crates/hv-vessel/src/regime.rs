//! Pressure-closure regime switch.
//!
//! A cushioned vessel closes its pressure equations one of two ways:
//! - **Compression**: the cushion is squeezed above its fill pressure and
//!   the liquid-side pressure equals the gas pressure.
//! - **Rest**: the gas sits at its fill pressure and the liquid side takes
//!   the rest pressure supplied from outside (ambient by default).
//!
//! An open tank never switches: its surface is at ambient pressure.
//!
//! The regime is latched between evaluations. The integrator watches the
//! switching function `p_cushion - threshold`
//! (offset by a round-off band) and re-selects the regime at
//! each sign change.

/// Relative band above the threshold that still counts as rest.
///
/// Absorbs the flash tolerance of the equation-of-state backend when the
/// gas sits exactly at its fill pressure.
pub const THRESHOLD_BAND: f64 = 1e-6;

/// Active pressure-closure equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Liquid-side pressure fixed to ambient (open tank).
    Ambient,
    /// Gas pinned to its threshold pressure.
    Rest,
    /// Liquid-side pressure equals gas pressure.
    Compression,
}

impl Regime {
    /// Select the regime for a cushion that would impose `p_cushion` [Pa].
    ///
    /// Compression needs the pressure strictly above the threshold band.
    pub fn select(p_cushion: f64, threshold: f64) -> Regime {
        if Self::switching_function(p_cushion, threshold) > 0.0 {
            Regime::Compression
        } else {
            Regime::Rest
        }
    }

    /// Switching function; its sign change marks a regime transition.
    pub fn switching_function(p_cushion: f64, threshold: f64) -> f64 {
        p_cushion - threshold * (1.0 + THRESHOLD_BAND)
    }

    /// Close the pressure equations: returns `(p_liquid, p_gas)` in Pa.
    ///
    /// `p_cushion` is the gas pressure from the equation of state,
    /// `p_rest` the liquid-side pressure used while the gas rests.
    pub fn close(self, p_cushion: f64, threshold: f64, p_rest: f64) -> (f64, f64) {
        match self {
            Regime::Compression => (p_cushion, p_cushion),
            Regime::Rest => (p_rest, threshold),
            Regime::Ambient => (p_rest, p_rest),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Ambient => "ambient",
            Regime::Rest => "rest",
            Regime::Compression => "compression",
        }
    }
}
