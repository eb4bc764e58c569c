//! Setpoints and constraints produced by the AutoMapper

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::Serialize;

use super::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A three axis setpoint where each axis may be left unconstrained.
///
/// Frame: Local NED
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SetpointVector(pub [AxisSetpoint; 3]);

/// The full setpoint handed to the position controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Setpoint {
    /// Position setpoint.
    ///
    /// Units: meters
    pub position_m: SetpointVector,

    /// Velocity setpoint.
    ///
    /// Units: meters/second
    pub velocity_ms: SetpointVector,

    /// Normalised thrust setpoint. Only ever constrained while idle.
    pub thrust: SetpointVector,
}

/// Kinematic limits the position controller must respect while achieving the
/// setpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Constraints {
    /// Maximum tilt angle.
    ///
    /// Units: radians
    pub tilt_rad: f64,

    /// Maximum horizontal speed.
    ///
    /// Units: meters/second
    pub speed_xy_ms: f64,

    /// Maximum ascent speed.
    ///
    /// Units: meters/second
    pub speed_up_ms: f64,

    /// Maximum descent speed.
    ///
    /// Units: meters/second
    pub speed_down_ms: f64,

    /// Landing gear demand.
    pub landing_gear: LandingGear,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Demand on a single setpoint axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum AxisSetpoint {
    /// The controller shall track this value.
    Constrained(f64),

    /// The controller shall not enforce anything on this axis.
    Unconstrained,
}

/// Landing gear demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LandingGear {
    /// No demand, keep the gear where it is.
    Keep,
    Up,
    Down,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for AxisSetpoint {
    fn default() -> Self {
        AxisSetpoint::Unconstrained
    }
}

impl Default for LandingGear {
    fn default() -> Self {
        LandingGear::Keep
    }
}

impl AxisSetpoint {
    /// Build from a raw value where NaN means unconstrained.
    pub fn from_nan(value: f64) -> Self {
        if value.is_nan() {
            AxisSetpoint::Unconstrained
        }
        else {
            AxisSetpoint::Constrained(value)
        }
    }

    /// Convert to a raw value where NaN means unconstrained.
    pub fn to_nan(self) -> f64 {
        match self {
            AxisSetpoint::Constrained(v) => v,
            AxisSetpoint::Unconstrained => f64::NAN,
        }
    }

    /// The constrained value, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            AxisSetpoint::Constrained(v) => Some(v),
            AxisSetpoint::Unconstrained => None,
        }
    }

    pub fn is_constrained(self) -> bool {
        matches!(self, AxisSetpoint::Constrained(_))
    }
}

impl Default for SetpointVector {
    fn default() -> Self {
        Self::unconstrained()
    }
}

impl SetpointVector {
    pub fn new(x: AxisSetpoint, y: AxisSetpoint, z: AxisSetpoint) -> Self {
        Self([x, y, z])
    }

    /// A setpoint with no axis constrained.
    pub fn unconstrained() -> Self {
        Self([AxisSetpoint::Unconstrained; 3])
    }

    /// A setpoint with every axis constrained to zero.
    pub fn zeros() -> Self {
        Self([AxisSetpoint::Constrained(0.0); 3])
    }

    /// Constrain each axis to the given vector. NaN components are left
    /// unconstrained.
    pub fn from_vector(v: &Vector3<f64>) -> Self {
        Self([
            AxisSetpoint::from_nan(v.x),
            AxisSetpoint::from_nan(v.y),
            AxisSetpoint::from_nan(v.z),
        ])
    }

    pub fn x(&self) -> AxisSetpoint {
        self.0[0]
    }

    pub fn y(&self) -> AxisSetpoint {
        self.0[1]
    }

    pub fn z(&self) -> AxisSetpoint {
        self.0[2]
    }

    /// True if no axis is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.0.iter().all(|a| !a.is_constrained())
    }

    /// Convert to the raw NaN-as-unconstrained form used by the position
    /// controller.
    pub fn to_nan_array(&self) -> [f64; 3] {
        [self.0[0].to_nan(), self.0[1].to_nan(), self.0[2].to_nan()]
    }
}

impl Default for Setpoint {
    fn default() -> Self {
        Self {
            position_m: SetpointVector::unconstrained(),
            velocity_ms: SetpointVector::unconstrained(),
            thrust: SetpointVector::unconstrained(),
        }
    }
}

impl Constraints {
    /// The baseline constraints applied at the start of each cycle, with all
    /// limits at their configured maxima and no landing gear demand.
    pub fn defaults(params: &Params) -> Self {
        Self {
            tilt_rad: params.tilt_max_air_rad,
            speed_xy_ms: params.xy_vel_max_ms,
            speed_up_ms: params.z_vel_max_up_ms,
            speed_down_ms: params.z_vel_max_down_ms,
            landing_gear: LandingGear::Keep,
        }
    }
}
