//! Waypoint types and commands passed into the AutoMapper

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command to fly a particular waypoint, as found in mission scripts.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct WaypointCmd {
    /// The behaviour to perform at this waypoint
    pub wp_type: WaypointType,

    /// Target position of the waypoint.
    ///
    /// Units: meters,
    /// Frame: Local NED
    pub target_m: [f64; 3],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Behaviour to be performed for the active waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointType {
    /// Motors idle on the ground, only a zero thrust is demanded.
    Idle,
    /// Descend at the landing speed above the target's horizontal position.
    Land,
    /// Climb to the target position.
    Takeoff,
    /// Hold position at the target.
    Loiter,
    /// Fly a line towards the target.
    Position,
    /// Hold altitude and continue in the current direction of travel.
    Velocity,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for WaypointType {
    fn default() -> Self {
        WaypointType::Idle
    }
}

impl WaypointType {
    /// Loiter and Position both follow a line towards the target, and are
    /// treated as the same state when deciding whether to reset.
    pub fn is_line_following(&self) -> bool {
        matches!(self, WaypointType::Loiter | WaypointType::Position)
    }
}

impl WaypointCmd {
    /// Get the target as a vector.
    pub fn target(&self) -> Vector3<f64> {
        Vector3::new(self.target_m[0], self.target_m[1], self.target_m[2])
    }
}
