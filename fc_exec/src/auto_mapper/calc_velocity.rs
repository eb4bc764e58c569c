//! Velocity setpoint generation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use util::maths::unit_or_zero;

use super::{AxisSetpoint, Constraints, GenContext, Setpoint, SetpointVector};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate the setpoints for a velocity waypoint.
///
/// The current altitude is held and the vehicle continues at cruise speed in
/// its current horizontal direction of travel. If the vehicle has no
/// horizontal velocity a zero horizontal velocity is demanded.
pub fn calc_velocity(
    ctx: &GenContext,
    setpoint: Setpoint,
    constraints: Constraints,
) -> (Setpoint, Constraints) {
    let vel = &ctx.vehicle.velocity_ms;
    let vel_sp_xy = unit_or_zero(&Vector2::new(vel.x, vel.y)) * ctx.params.cruise_speed_ms;

    let setpoint = Setpoint {
        position_m: SetpointVector::new(
            AxisSetpoint::Unconstrained,
            AxisSetpoint::Unconstrained,
            AxisSetpoint::from_nan(ctx.vehicle.position_m.z),
        ),
        velocity_ms: SetpointVector::new(
            AxisSetpoint::from_nan(vel_sp_xy.x),
            AxisSetpoint::from_nan(vel_sp_xy.y),
            AxisSetpoint::Unconstrained,
        ),
        ..setpoint
    };

    (setpoint, constraints)
}
