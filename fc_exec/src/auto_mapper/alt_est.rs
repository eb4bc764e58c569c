//! Altitude above ground estimation
//!
//! The altitude above ground is taken from the best source available this
//! cycle, in priority order:
//!
//! 1. A direct distance to ground measurement (e.g. a rangefinder)
//! 2. The local position relative to the home position's altitude
//! 3. The local position relative to the local frame origin
//!
//! Every source is a valid operating mode, the estimate must be recomputed
//! each cycle as the distance sensor can drop out and the home position can
//! become valid at any time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Source used for an altitude above ground estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AltSource {
    /// Direct distance to ground measurement
    DistSensor,
    /// Local position relative to the home altitude
    Home,
    /// Local position relative to the local frame origin
    LocalOrigin,
}

impl Default for AltSource {
    fn default() -> Self {
        AltSource::LocalOrigin
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Estimate the altitude above ground.
///
/// # Inputs
/// - `position_down_m`: Local down position of the vehicle (NED, positive down)
/// - `dist_to_ground_m`: Distance to ground measurement, `None` or NaN if not
///   available
/// - `home_alt_m`: Down position of the home position, `None` if the home
///   altitude is not valid
pub fn estimate(
    position_down_m: f64,
    dist_to_ground_m: Option<f64>,
    home_alt_m: Option<f64>,
) -> f64 {
    estimate_with_source(position_down_m, dist_to_ground_m, home_alt_m).0
}

/// Estimate the altitude above ground, also returning which source was used.
pub fn estimate_with_source(
    position_down_m: f64,
    dist_to_ground_m: Option<f64>,
    home_alt_m: Option<f64>,
) -> (f64, AltSource) {
    match (dist_to_ground_m.filter(|d| d.is_finite()), home_alt_m) {
        (Some(d), _) => (d, AltSource::DistSensor),
        (None, Some(home)) => (-position_down_m + home, AltSource::Home),
        (None, None) => (-position_down_m, AltSource::LocalOrigin),
    }
}
