//! # Auto mapper module
//!
//! This module maps the currently active waypoint of an autonomous mission onto the position,
//! velocity and thrust setpoints (and the kinematic constraints) consumed by the position
//! controller each cycle.
//!
//! Each waypoint type has its own setpoint generator (the `calc_*` modules), the [`AutoMapper`]
//! itself decides which generator to run, what must be reset when the type changes, and raises
//! the landing gear once the vehicle is high enough.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod alt_est;
mod calc_idle;
mod calc_land;
mod calc_line;
mod calc_takeoff;
mod calc_velocity;
mod params;
mod setpoint;
mod state;
mod waypoint;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector3;

// Internal
pub use alt_est::AltSource;
pub use calc_idle::calc_idle;
pub use calc_land::calc_land;
pub use calc_line::calc_line;
pub use calc_takeoff::calc_takeoff;
pub use calc_velocity::calc_velocity;
pub use params::*;
pub use setpoint::*;
pub use state::*;
pub use waypoint::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Altitude above ground above which the landing gear is raised.
///
/// Units: meters
pub const GEAR_UP_ALT_M: f64 = 2.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Everything a setpoint generator may read during a cycle.
#[derive(Clone, Copy, Debug)]
pub struct GenContext<'a> {
    /// Current estimated state of the vehicle
    pub vehicle: &'a VehicleState,

    /// Target position of the active waypoint
    ///
    /// Units: meters,
    /// Frame: Local NED
    pub target_m: &'a Vector3<f64>,

    /// Current parameters
    pub params: &'a Params,

    /// Altitude above ground computed this cycle
    ///
    /// Units: meters
    pub alt_above_ground_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during AutoMapper operation.
#[derive(Debug, thiserror::Error)]
pub enum AutoMapperError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Could not initialise the archives: {0}")]
    ArchiveInitError(util::archive::ArchiveError),

    #[error("The mapper must be activated before it can be processed")]
    NotActive,
}
