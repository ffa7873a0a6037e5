//! hv-core: stable foundation for hydrovessel.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact port IDs)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HvError, HvResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
