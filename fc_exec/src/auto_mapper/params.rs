//! Parameters structure for the AutoMapper

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the AutoMapper.
///
/// Parameters must be passed through [`Params::validated`] before use, which
/// the mapper does whenever they are loaded or reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Params {

    // ---- LANDING ----

    /// Descent speed while landing.
    ///
    /// Units: meters/second
    pub land_speed_ms: f64,

    /// Maximum tilt while landing.
    ///
    /// Units: radians
    pub tilt_max_land_rad: f64,

    /// Altitude above which the full takeoff speed is used. Always at least
    /// `land_alt2_m`.
    ///
    /// Units: meters
    pub land_alt1_m: f64,

    /// Altitude below which the default ascent speed limit is used.
    ///
    /// Units: meters
    pub land_alt2_m: f64,

    // ---- TAKEOFF AND CRUISE ----

    /// Ascent speed limit once above `land_alt1_m` during takeoff.
    ///
    /// Units: meters/second
    pub takeoff_speed_ms: f64,

    /// Horizontal speed used for velocity waypoints.
    ///
    /// Units: meters/second
    pub cruise_speed_ms: f64,

    // ---- DEFAULT CONSTRAINTS ----

    /// Units: meters/second
    pub xy_vel_max_ms: f64,

    /// Units: meters/second
    pub z_vel_max_up_ms: f64,

    /// Units: meters/second
    pub z_vel_max_down_ms: f64,

    /// Units: radians
    pub tilt_max_air_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            land_speed_ms: 0.7,
            tilt_max_land_rad: 12f64.to_radians(),
            land_alt1_m: 10.0,
            land_alt2_m: 5.0,
            takeoff_speed_ms: 1.5,
            cruise_speed_ms: 5.0,
            xy_vel_max_ms: 12.0,
            z_vel_max_up_ms: 3.0,
            z_vel_max_down_ms: 1.0,
            tilt_max_air_rad: 45f64.to_radians(),
        }
    }
}

impl Params {
    /// Enforce the consistency between parameters.
    ///
    /// `land_alt1_m` is raised to `land_alt2_m` if it is below it, so that the
    /// takeoff speed ramp is always well ordered. The parameters are corrected
    /// rather than rejected.
    pub fn validated(mut self) -> Self {
        let land_alt1_m = self.land_alt1_m.max(self.land_alt2_m);

        if land_alt1_m != self.land_alt1_m {
            warn!(
                "land_alt1_m ({}) is below land_alt2_m ({}), raising it to {}",
                self.land_alt1_m, self.land_alt2_m, land_alt1_m
            );
            self.land_alt1_m = land_alt1_m;
        }

        self
    }
}
